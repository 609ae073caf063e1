//! # Text-based user interface (TUI)
//!
//! Terminal setup and teardown for the game. The terminal is switched to the
//! alternate screen in raw mode for the duration of a single call to [`tui`],
//! and switched back afterward, even if the game panics.

use std::{
	io::{self, stdout, Stdout},
	panic,
	sync::{Arc, Mutex},
	thread
};

use crossterm::{
	execute,
	terminal::{
		disable_raw_mode, enable_raw_mode,
		EnterAlternateScreen, LeaveAlternateScreen
	}
};
use log::{trace, warn};
use ratatui::{backend::{Backend, CrosstermBackend}, Terminal};

////////////////////////////////////////////////////////////////////////////////
//                         Text-based user interface.                         //
////////////////////////////////////////////////////////////////////////////////

/// The text-based user interface (TUI) type.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Apply `f` to a freshly initialized terminal, then restore the terminal.
/// While `f` runs, a panic on the calling thread restores the terminal before
/// the previous panic hook reports it. Other threads only reach the previous
/// hook.
///
/// # Arguments
///
/// * `f` - The function to apply to the TUI.
///
/// # Returns
///
/// The result of applying `f` to the TUI.
///
/// # Errors
///
/// Any error that occurs while initializing, driving, or restoring the TUI.
pub fn tui<F, T>(f: F) -> io::Result<T>
	where F: FnOnce(&mut Tui) -> io::Result<T>
{
	// The hook slot is shared between this frame and the installed hook, which
	// outlives it. It is only vacated once `f` has returned.
	let previous = Arc::new(Mutex::new(Some(panic::take_hook())));
	let hook_slot = Arc::clone(&previous);
	let ui_thread = thread::current().id();
	panic::set_hook(Box::new(move |info| {
		if thread::current().id() == ui_thread
		{
			// Already panicking, so a failure here is not actionable.
			let _ = restore();
		}
		if let Ok(slot) = hook_slot.lock()
		{
			if let Some(hook) = slot.as_ref()
			{
				hook(info);
			}
		}
	}));
	// Initialization can fail halfway, so restore unconditionally below.
	let result = init().and_then(|mut terminal| f(&mut terminal));
	// Reinstate the previous hook before restoring, so that a panic during
	// restoration does not try to restore again.
	let hook = previous.lock().ok().and_then(|mut slot| slot.take());
	match hook
	{
		Some(hook) => panic::set_hook(hook),
		None => warn!("Previous panic hook was lost")
	}
	restore()?;
	result
}

/// Initialize the terminal: alternate screen, raw mode.
///
/// # Errors
///
/// Any error that occurs while initializing the terminal.
fn init() -> io::Result<Tui>
{
	trace!("Entering alternate screen");
	let mut stdout = stdout();
	execute!(stdout, EnterAlternateScreen)?;
	enable_raw_mode()?;
	Terminal::new(CrosstermBackend::new(stdout))
}

/// Restore the terminal to its original state, cursor included.
///
/// # Errors
///
/// Any error that occurs while restoring the terminal.
fn restore() -> io::Result<()>
{
	trace!("Leaving alternate screen");
	let mut stdout = stdout();
	execute!(stdout, LeaveAlternateScreen)?;
	disable_raw_mode()?;
	CrosstermBackend::new(stdout).show_cursor()
}
