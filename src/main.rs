//! # LetterRing
//!
//! A spelling bee word game for the terminal. Via command line options, the
//! user can specify the dictionary to play against and how much of it to use.
//! Then the user can play through a text-based user interface (TUI), typing
//! words built from the seven letters on display. The words found and the
//! final score are written to standard output on exit.

mod app;
mod tui;

use std::{fs::File, io, path::{Path, PathBuf}, process::ExitCode, rc::Rc};

use clap::{Parser, Subcommand};
use letter_ring::{
	dictionary::{Dictionary, DEFAULT_LIMIT},
	game::Session
};
use log::{debug, error, trace};
use rand::{rngs::StdRng, SeedableRng};

use app::App;
use tui::tui;

////////////////////////////////////////////////////////////////////////////////
//                           Command line options.                            //
////////////////////////////////////////////////////////////////////////////////

/// CLI for playing LetterRing puzzles.
#[derive(Clone, Debug, Parser)]
#[command(version = "1.0", author = "Todd L Smith")]
struct Opts
{
	/// The path to the directory containing the dictionary files.
	#[arg(short = 'd', long, default_value = "dict")]
	directory: String,

	/// The name of the dictionary. This is the name shared by the text and
	/// binary files, sans the extension.
	#[arg(short = 'n', long, default_value = "english")]
	dictionary: String,

	/// How many entries to take from the dictionary, which is ordered by
	/// frequency. Smaller dictionaries make for easier puzzles.
	#[arg(short = 'l', long, default_value_t = DEFAULT_LIMIT)]
	limit: usize,

	/// Seed the random number generator, to replay the same puzzles.
	#[arg(short = 's', long)]
	rng_seed: Option<u64>,

	/// Write log messages to this file instead of standard error. Logging is
	/// controlled by `RUST_LOG`.
	#[arg(long)]
	log_file: Option<PathBuf>,

	#[command(subcommand)]
	command: Command
}

/// The subcommands of the CLI.
#[derive(Copy, Clone, Debug, Subcommand)]
enum Command
{
	/// Just generate the binary dictionary and exit.
	Generate,

	/// Open the text-based user interface (TUI) and play. The words found and
	/// the final score will be written to standard output.
	Play {
		/// How long (in ms) to show a celebration banner.
		#[arg(short = 'c', long, default_value = "1500")]
		celebration_duration: u64,

		/// Suppress emission of the words found and the score to standard
		/// output.
		#[arg(short = 'q', long)]
		quiet: bool
	},

	/// Generate a single puzzle and print its letters and every valid word,
	/// with pangrams marked by an asterisk.
	Answers
}

////////////////////////////////////////////////////////////////////////////////
//                               Main program.                                //
////////////////////////////////////////////////////////////////////////////////

/// Parse the command line options and execute the appropriate subcommand.
fn main() -> ExitCode
{
	// Parse the command line options.
	let opts = Opts::parse();
	if let Err(e) = init_logging(opts.log_file.as_deref())
	{
		eprintln!("Failed to open log file: {}", e);
		return ExitCode::FAILURE
	}
	debug!("Command line options: {:?}", opts);

	// Open the dictionary, creating the binary dictionary if necessary. No
	// puzzle can be played without it.
	let dictionary =
		match Dictionary::open(&opts.directory, &opts.dictionary, opts.limit)
		{
			Ok(dictionary) => Rc::new(dictionary),
			Err(e) =>
			{
				error!("{}", e);
				eprintln!("Failed to open dictionary: {}", e);
				return ExitCode::FAILURE
			}
		};
	let mut rng = match opts.rng_seed
	{
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy()
	};

	// Execute the appropriate subcommand.
	match opts.command
	{
		Command::Generate =>
		{
			trace!("Exiting after generating binary dictionary");
		},
		Command::Play { celebration_duration, quiet } =>
		{
			trace!("Opening TUI");
			let app = App::new(celebration_duration, dictionary, rng);
			match tui(|tui| app.run(tui))
			{
				Ok(session) if !quiet => print_summary(&session),
				Ok(_) => {},
				Err(e) =>
				{
					error!("Failed to drive TUI: {}", e);
					eprintln!("Failed to drive TUI: {}", e);
					return ExitCode::FAILURE
				}
			}
		},
		Command::Answers =>
		{
			let session = Session::new(dictionary, &mut rng);
			print_answers(&session);
		}
	}
	ExitCode::SUCCESS
}

/// Initialize logging from `RUST_LOG`, optionally redirected to a file.
///
/// # Arguments
///
/// * `log_file` - The file to log to, if not standard error.
///
/// # Errors
///
/// If the log file cannot be created.
fn init_logging(log_file: Option<&Path>) -> io::Result<()>
{
	let mut builder = env_logger::Builder::from_default_env();
	if let Some(path) = log_file
	{
		let file = File::create(path)?;
		builder.target(env_logger::Target::Pipe(Box::new(file)));
	}
	builder.init();
	Ok(())
}

/// Print the words found, in order of discovery, and the score to standard
/// output.
///
/// # Arguments
///
/// * `session` - The final game session.
fn print_summary(session: &Session)
{
	for word in session.found()
	{
		println!("{}", word);
	}
	println!("Score: {}", session.score());
}

/// Print the letters of the puzzle and every valid word to standard output.
/// Pangrams are marked with an asterisk.
///
/// # Arguments
///
/// * `session` - A fresh game session.
fn print_answers(session: &Session)
{
	let letters = session.letters();
	println!("Letters: {}", letters.display_order().iter().collect::<String>());
	println!("Mandatory: {}", letters.mandatory());
	for word in session.valid_words()
	{
		let mark = if letters.is_pangram(word) { "*" } else { "" };
		println!("{}{}", word, mark);
	}
}
