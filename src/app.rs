//! # Application
//!
//! The application state and logic, including the text-based user interface
//! (TUI). The application owns the current game [`Session`] and plays the
//! part of its presentation layer: it shows the letters, collects guesses,
//! reports the outcome of each, and celebrates milestones.

use std::{io, rc::Rc, time::{Duration, Instant}};

use crossterm::event::{
	poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers
};
use fixedstr::str32;
use letter_ring::{
	dictionary::Dictionary,
	game::{Acceptance, Rejection, Session}
};
use log::{debug, trace};
use rand::rngs::StdRng;
use ratatui::{
	buffer::Buffer,
	layout::{Alignment, Constraint, Direction, Layout, Rect},
	style::{Color, Modifier, Style, Stylize},
	text::{Line, Span},
	widgets::{
		block::{Position, Title},
		Block, BorderType, Borders, List, ListItem, ListState, Paragraph,
		StatefulWidget, Widget, Wrap
	},
	Frame
};

use crate::tui::Tui;

/// The longest guess that can be typed.
const MAX_GUESS_LENGTH: usize = 24;

////////////////////////////////////////////////////////////////////////////////
//                                Application.                                //
////////////////////////////////////////////////////////////////////////////////

/// The application state.
#[must_use]
pub struct App
{
	/// Whether the application is running, and whether it is celebrating.
	state: ExecutionState,

	/// How long (in ms) to show a celebration banner.
	celebration_duration_ms: u64,

	/// The source of randomness for new games.
	rng: StdRng,

	/// The current game.
	session: Session,

	/// The guess being typed.
	guess: str32,

	/// The outcome of the most recent guess, if any.
	feedback: Option<Feedback>,

	/// The index of the found word to highlight, if any.
	highlight: Option<usize>
}

// Public interface.
impl App
{
	/// Create a new application state, starting a new game at once.
	///
	/// # Arguments
	///
	/// * `celebration_duration_ms` - How long (in ms) to show a celebration
	///   banner.
	/// * `dictionary` - The dictionary, shared by every game.
	/// * `rng` - The source of randomness for puzzle generation.
	///
	/// # Returns
	///
	/// The new application state.
	pub fn new(
		celebration_duration_ms: u64,
		dictionary: Rc<Dictionary>,
		mut rng: StdRng
	) -> Self
	{
		let session = Session::new(dictionary, &mut rng);
		Self {
			state: ExecutionState::Playing,
			celebration_duration_ms,
			rng,
			session,
			guess: str32::new(),
			feedback: None,
			highlight: None
		}
	}

	/// Run the application. This amounts to:
	///
	/// * Expiring any celebration banner.
	/// * Rendering the application frame.
	/// * Processing events.
	///
	/// # Arguments
	///
	/// * `tui` - The text-based user interface (TUI).
	///
	/// # Returns
	///
	/// The final game session.
	///
	/// # Errors
	///
	/// Any error that occurs while running the application.
	pub fn run(mut self, tui: &mut Tui) -> io::Result<Session>
	{
		while self.is_running()
		{
			self.process_systems();
			tui.draw(|frame| self.render_frame(frame))?;
			self.process_event()?;
		}
		Ok(self.session)
	}

	/// Check if the application is running.
	#[inline]
	#[must_use]
	pub fn is_running(&self) -> bool
	{
		!matches!(self.state, ExecutionState::Exiting)
	}
}

// Private implementation details.
impl App
{
	/// Append the given alphabetic character to the guess, uppercased. If the
	/// guess is full, do nothing.
	///
	/// # Panics
	///
	/// If the character is not alphabetic.
	fn append(&mut self, c: char)
	{
		assert!(c.is_ascii_alphabetic());
		if self.guess.len() < MAX_GUESS_LENGTH
		{
			self.guess.push_char(c.to_ascii_uppercase());
		}
	}

	/// Delete the last character of the guess.
	fn delete(&mut self)
	{
		self.guess.truncate(self.guess.len().saturating_sub(1));
	}

	/// Clear the guess.
	fn clear(&mut self)
	{
		self.guess.clear();
	}

	/// Submit the guess, record the outcome, and start a celebration if the
	/// guess earned one.
	fn submit(&mut self)
	{
		let guess = self.guess;
		self.guess.clear();
		let outcome = self.session.submit(guess.as_str());
		if !matches!(outcome, Ok(None))
			&& matches!(self.state, ExecutionState::Celebrating { .. })
		{
			// The banner would hide the outcome of this guess.
			trace!("celebration ended by guess");
			self.state = ExecutionState::Playing;
		}
		match outcome
		{
			Ok(None) => {},
			Ok(Some(acceptance)) =>
			{
				if acceptance.milestone || acceptance.seed_found()
				{
					let until = Instant::now()
						+ Duration::from_millis(self.celebration_duration_ms);
					let milestone = acceptance.milestone
						.then(|| self.session.found().len());
					debug!(
						"celebrating: milestone {:?}, seed {}",
						milestone,
						acceptance.seed_found()
					);
					self.state = ExecutionState::Celebrating {
						until,
						milestone,
						seed_found: acceptance.seed_found()
					};
				}
				self.feedback = Some(Feedback::Accepted(acceptance));
			},
			Err(rejection) =>
			{
				trace!("rejected: {}", rejection);
				self.feedback = Some(Feedback::Rejected(rejection));
			}
		}
	}

	/// Replace the game with a new one.
	fn new_game(&mut self)
	{
		self.session.new_game(&mut self.rng);
		self.state = ExecutionState::Playing;
		self.guess.clear();
		self.feedback = None;
		self.highlight = None;
	}

	/// Move the highlight through the found words. If nothing is highlighted,
	/// use the sign of the change to determine which end of the list to start
	/// from, i.e., positive for the beginning and negative for the end.
	///
	/// If the change would move the highlight out of bounds, remove it.
	///
	/// # Arguments
	///
	/// * `di` - The change in the word index.
	fn move_word_index(&mut self, di: isize)
	{
		let len = self.session.found().len();
		self.highlight = match self.highlight
		{
			Some(index) => index.checked_add_signed(di).filter(|&i| i < len),
			None if di > 0 => di.checked_sub(1)
				.and_then(|i| usize::try_from(i).ok())
				.filter(|&i| i < len),
			None if di < 0 => len.checked_sub(di.unsigned_abs()),
			None => None
		};
	}

	/// Render the application frame.
	///
	/// # Arguments
	///
	/// * `frame` - The target frame.
	fn render_frame(&self, frame: &mut Frame)
	{
		frame.render_widget(self, frame.area());
	}

	/// Render the game: the puzzle on the left, the found words on the right.
	///
	/// # Arguments
	///
	/// * `area` - The target area.
	/// * `buf` - The target buffer.
	fn render_playing(&self, area: Rect, buf: &mut Buffer)
	{
		let outer = Layout::default()
			.direction(Direction::Horizontal)
			.margin(1)
			.constraints([
				Constraint::Percentage(100),
				Constraint::Min(24)
			])
			.split(area);
		self.render_puzzle(outer[0], buf);
		self.render_found(outer[1], buf);
	}

	/// Render the puzzle pane.
	///
	/// # Arguments
	///
	/// * `area` - The target area.
	/// * `buf` - The target buffer.
	fn render_puzzle(&self, area: Rect, buf: &mut Buffer)
	{
		let rows = Layout::default()
			.direction(Direction::Vertical)
			.margin(2)
			.constraints([
				Constraint::Ratio(1, 4),
				Constraint::Length(3),
				Constraint::Length(1),
				Constraint::Length(3),
				Constraint::Length(1),
				Constraint::Length(1),
				Constraint::Length(1),
				Constraint::Min(2),
				Constraint::Ratio(1, 4)
			])
			.split(area);
		Block::default()
			.borders(Borders::ALL)
			.border_style(Style::default().fg(Color::White))
			.title(
				Title::default()
					.content("LetterRing")
					.position(Position::Top)
					.alignment(Alignment::Center)
			)
			.title(
				Title::default()
					.content("⎋ – exit".yellow().bold())
					.position(Position::Top)
					.alignment(Alignment::Left)
			)
			.title(
				Title::default()
					.content("↵ – submit".green().bold())
					.position(Position::Top)
					.alignment(Alignment::Right)
			)
			.title(
				Title::default()
					.content(
						"\
							A-Z - type \
							⌫ - delete \
							⌦ - clear \
							^N - new game \
							^P - show pangrams\
						".cyan()
					)
					.position(Position::Bottom)
					.alignment(Alignment::Center)
			)
			.render(area, buf);
		self.render_letters(rows[1], buf);
		let mandatory = self.session.letters().mandatory();
		Paragraph::new(
			format!("Mandatory letter: {}", mandatory).red().bold()
		)
			.alignment(Alignment::Center)
			.render(rows[2], buf);
		let border_color =
			if self.guess.is_empty() { Color::DarkGray }
			else { Color::White };
		Paragraph::new(self.guess.as_str())
			.block(
				Block::new()
					.title("Your guess")
					.border_type(BorderType::Rounded)
					.borders(Borders::ALL)
					.border_style(Style::default().fg(border_color))
			)
			.alignment(Alignment::Center)
			.render(rows[3], buf);
		self.feedback_line()
			.alignment(Alignment::Center)
			.render(rows[4], buf);
		Paragraph::new(format!("Score: {}", self.session.score()))
			.alignment(Alignment::Center)
			.style(Style::default().add_modifier(Modifier::BOLD))
			.render(rows[5], buf);
		Paragraph::new(format!(
			"Words found: {} ({} to go)",
			self.session.found().len(),
			self.session.remaining()
		))
			.alignment(Alignment::Center)
			.render(rows[6], buf);
		self.pangram_lines()
			.alignment(Alignment::Center)
			.wrap(Wrap { trim: true })
			.render(rows[7], buf);
	}

	/// Render the seven letters as a row of cells, with the mandatory letter
	/// in the centre.
	///
	/// # Arguments
	///
	/// * `area` - The target area.
	/// * `buf` - The target buffer.
	fn render_letters(&self, area: Rect, buf: &mut Buffer)
	{
		let letters = self.session.letters();
		let display = letters.display_order();
		let columns = Layout::default()
			.direction(Direction::Horizontal)
			.constraints(display.map(|_| Constraint::Ratio(1, 7)))
			.split(area);
		for (column, &letter) in display.iter().enumerate()
		{
			let (text_style, border_color) =
				if letter == letters.mandatory()
				{
					(
						Style::default()
							.fg(Color::Red)
							.add_modifier(Modifier::BOLD),
						Color::Red
					)
				}
				else
				{
					(Style::default().fg(Color::White), Color::White)
				};
			let block = Block::new()
				.border_type(BorderType::Rounded)
				.borders(Borders::ALL)
				.border_style(Style::default().fg(border_color));
			Paragraph::new(letter.to_string())
				.block(block)
				.alignment(Alignment::Center)
				.style(text_style)
				.render(columns[column], buf);
		}
	}

	/// Build the feedback line: the celebration banner if one is showing,
	/// otherwise the outcome of the most recent guess. The next guess ends any
	/// celebration, so the banner never hides its outcome.
	#[must_use]
	fn feedback_line(&self) -> Paragraph<'static>
	{
		if let ExecutionState::Celebrating { milestone, seed_found, .. } =
			self.state
		{
			let mut banner = Vec::new();
			if seed_found
			{
				banner.push("You found the seed word!".to_string());
			}
			if let Some(count) = milestone
			{
				banner.push(format!("{} words found!", count));
			}
			let banner = format!("🎉 {} 🎉", banner.join(" "));
			return Paragraph::new(banner.black().on_yellow().bold())
		}
		let line = match &self.feedback
		{
			None => Line::from(""),
			Some(Feedback::Accepted(acceptance)) =>
				Line::from(acceptance_message(acceptance).green().bold()),
			Some(Feedback::Rejected(rejection @ Rejection::Duplicate(_))) =>
				Line::from(rejection.to_string().yellow()),
			Some(Feedback::Rejected(rejection)) =>
				Line::from(rejection.to_string().red())
		};
		Paragraph::new(line)
	}

	/// Build the pangram report: the pangrams found so far, and every pangram
	/// of the puzzle if the player asked to see them.
	#[must_use]
	fn pangram_lines(&self) -> Paragraph<'static>
	{
		let mut lines = Vec::new();
		let found = self.session.pangrams_found();
		if !found.is_empty()
		{
			lines.push(Line::from(
				format!("Pangram found: {}", found.join(", ")).yellow()
			));
		}
		match self.session.revealed_pangrams()
		{
			Some(all) if all.is_empty() => lines.push(Line::from(
				"No pangrams available for this letter set.".cyan()
			)),
			Some(all) => lines.push(Line::from(
				format!("Pangrams ({}): {}", all.len(), all.join(", ")).cyan()
			)),
			None => {}
		}
		Paragraph::new(lines)
	}

	/// Render the found words, alphabetically, with pangrams emphasized.
	///
	/// # Arguments
	///
	/// * `area` - The target area.
	/// * `buf` - The target buffer.
	fn render_found(&self, area: Rect, buf: &mut Buffer)
	{
		let letters = self.session.letters();
		let items = self.session.found_sorted().into_iter()
			.map(|word| {
				let style =
					if letters.is_pangram(word)
					{
						Style::default()
							.fg(Color::Yellow)
							.add_modifier(Modifier::BOLD)
					}
					else
					{
						Style::default().fg(Color::White)
					};
				ListItem::new(Span::styled(word.to_string(), style))
			})
			.collect::<Vec<_>>();
		let mut list_state = ListState::default();
		list_state.select(self.highlight);
		let list = List::new(items)
			.block(
				Block::default()
					.borders(Borders::ALL)
					.title(
						Title::default()
							.content("Found")
							.alignment(Alignment::Center)
					)
					.title(
						Title::default()
							.content("↑↓ - move".cyan())
							.position(Position::Bottom)
							.alignment(Alignment::Center)
					)
			)
			.highlight_style(
				Style::default()
					.fg(Color::Black)
					.bg(Color::Cyan)
			);
		StatefulWidget::render(&list, area, buf, &mut list_state);
	}

	/// Run any background tasks, i.e., expire the celebration banner.
	fn process_systems(&mut self)
	{
		if let ExecutionState::Celebrating { until, .. } = self.state
		{
			if Instant::now() >= until
			{
				trace!("celebration over");
				self.state = ExecutionState::Playing;
			}
		}
	}

	/// Process events. Block for only a few milliseconds, so that the
	/// celebration banner expires on time.
	///
	/// # Errors
	///
	/// Any error that occurs while processing events.
	fn process_event(&mut self) -> io::Result<()>
	{
		if poll(Duration::from_millis(50))?
		{
			match read()?
			{
				Event::Key(event) if event.kind == KeyEventKind::Press =>
					self.process_key_event(event),
				_ => {}
			}
		}
		Ok(())
	}

	/// Process a key event:
	///
	/// * Escape - Exit the application.
	/// * Enter - Submit the guess.
	/// * Backspace - Delete the last character of the guess.
	/// * Delete - Clear the guess.
	/// * Ctrl+N - Start a new game.
	/// * Ctrl+P - Reveal every pangram.
	/// * Up - Highlight the previous found word.
	/// * Down - Highlight the next found word.
	/// * A-Z - Append the corresponding letter to the guess.
	///
	/// # Arguments
	///
	/// * `event` - The key event to process.
	fn process_key_event(&mut self, event: KeyEvent)
	{
		if !self.is_running()
		{
			return
		}
		let control = event.modifiers.contains(KeyModifiers::CONTROL);
		match event.code
		{
			KeyCode::Esc => self.exit(),
			KeyCode::Enter => self.submit(),
			KeyCode::Backspace => self.delete(),
			KeyCode::Delete => self.clear(),
			KeyCode::Up => self.move_word_index(-1),
			KeyCode::Down => self.move_word_index(1),
			KeyCode::Char('n') | KeyCode::Char('N') if control =>
				self.new_game(),
			KeyCode::Char('p') | KeyCode::Char('P') if control =>
				self.session.reveal_pangrams(),
			KeyCode::Char(c) if !control && c.is_ascii_alphabetic() =>
				self.append(c),
			_ => {}
		}
	}

	/// Mark the application for exit. The application will exit after the next
	/// iteration of the main loop.
	fn exit(&mut self)
	{
		self.state = ExecutionState::Exiting;
	}
}

impl Widget for &App
{
	fn render(self, area: Rect, buf: &mut Buffer)
	{
		match self.state
		{
			ExecutionState::Playing | ExecutionState::Celebrating { .. } =>
				self.render_playing(area, buf),
			ExecutionState::Exiting => {}
		}
	}
}

/// Describe an accepted guess for the player.
#[must_use]
fn acceptance_message(acceptance: &Acceptance) -> String
{
	if acceptance.seed_found()
	{
		format!(
			"Seed word! +{} +{} bonus points!",
			acceptance.points,
			acceptance.bonus
		)
	}
	else if acceptance.pangram
	{
		format!("Pangram! +{} points!", acceptance.points)
	}
	else
	{
		format!("Nice! +{} points!", acceptance.points)
	}
}

/// The outcome of the most recent guess.
#[derive(Clone, Debug)]
enum Feedback
{
	/// The guess was accepted.
	Accepted(Acceptance),

	/// The guess was rejected.
	Rejected(Rejection)
}

/// The execution state of the application.
#[derive(Clone, Copy, Debug)]
enum ExecutionState
{
	/// The player is playing.
	Playing,

	/// The player is playing, and a celebration banner is showing. Will
	/// momentarily return to the [Playing](ExecutionState::Playing) state.
	Celebrating {
		/// When to transition back to the
		/// [Playing](ExecutionState::Playing) state.
		until: Instant,

		/// The number of words found, if a milestone was reached.
		milestone: Option<usize>,

		/// Whether the player reconstructed the seed word.
		seed_found: bool
	},

	/// The application is exiting.
	Exiting
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
