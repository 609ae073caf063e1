//! # Game
//!
//! Herein is the game session: the guess validator and scorer. A session owns
//! a [`Puzzle`] and shares the [`Dictionary`] with every other session. It
//! accepts raw guesses, rejects the unacceptable ones with a
//! [reason](Rejection), and scores the rest. A session never ends on its own;
//! a new game simply replaces it.

use std::{
	error::Error,
	fmt::{self, Display, Formatter},
	rc::Rc
};

use log::{debug, trace};
use rand::Rng;

use crate::{
	dictionary::{normalize, Dictionary},
	puzzle::{LetterSet, Puzzle, SEEDS}
};

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The bonus for reconstructing the seed word.
pub const SEED_BONUS: u32 = 10;

/// A milestone is reached whenever the number of found words is a multiple of
/// this.
pub const MILESTONE_INTERVAL: usize = 5;

////////////////////////////////////////////////////////////////////////////////
//                                 Sessions.                                  //
////////////////////////////////////////////////////////////////////////////////

/// A game session. Always active: it accepts guesses until it is replaced.
#[derive(Clone, Debug)]
#[must_use]
pub struct Session
{
	/// The dictionary, shared with every other session.
	dictionary: Rc<Dictionary>,

	/// The puzzle being played.
	puzzle: Puzzle,

	/// The accepted words, in order of discovery.
	found: Vec<String>,

	/// The cumulative score.
	score: u32,

	/// Whether the player has asked to see every pangram.
	pangrams_revealed: bool
}

impl Session
{
	/// Start a session with a freshly generated puzzle drawn from the
	/// standard [seeds](SEEDS).
	///
	/// # Arguments
	///
	/// * `dictionary` - The dictionary.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// The new session.
	pub fn new<R: Rng + ?Sized>(dictionary: Rc<Dictionary>, rng: &mut R) -> Self
	{
		let puzzle = Puzzle::generate(rng, &SEEDS, &dictionary);
		Self::with_puzzle(dictionary, puzzle)
	}

	/// Start a session for a known puzzle.
	///
	/// # Arguments
	///
	/// * `dictionary` - The dictionary, which should be the one from which
	///   the puzzle was built.
	/// * `puzzle` - The puzzle.
	///
	/// # Returns
	///
	/// The new session.
	pub fn with_puzzle(dictionary: Rc<Dictionary>, puzzle: Puzzle) -> Self
	{
		Self {
			dictionary,
			puzzle,
			found: Vec::new(),
			score: 0,
			pangrams_revealed: false
		}
	}

	/// Replace this session with a fresh one for a new puzzle, keeping the
	/// dictionary.
	///
	/// # Arguments
	///
	/// * `rng` - The source of randomness.
	pub fn new_game<R: Rng + ?Sized>(&mut self, rng: &mut R)
	{
		*self = Self::new(Rc::clone(&self.dictionary), rng);
		debug!("New game: {}", self.puzzle.letters().letters());
	}

	/// Submit a guess. Surrounding whitespace is ignored, and a blank guess
	/// is ignored altogether. Otherwise the guess is normalized and checked,
	/// in order, for being a repeat, for being a dictionary word, and for
	/// fitting the letter set. Rejections leave the session untouched.
	///
	/// # Arguments
	///
	/// * `raw` - The guess, as typed.
	///
	/// # Returns
	///
	/// The [`Acceptance`], or `None` if the guess was blank.
	///
	/// # Errors
	///
	/// * [`Rejection::Duplicate`] if the word was already found.
	/// * [`Rejection::UnknownWord`] if the word is not in the dictionary.
	/// * [`Rejection::Invalid`] if the word is too short, uses a letter
	///   outside the letter set, or lacks the mandatory letter.
	pub fn submit(&mut self, raw: &str) -> Result<Option<Acceptance>, Rejection>
	{
		let guess = raw.trim().to_uppercase();
		if guess.is_empty()
		{
			trace!("ignoring blank guess");
			return Ok(None)
		}
		let word = normalize(&guess);
		if self.found.contains(&word)
		{
			return Err(Rejection::Duplicate(word))
		}
		if !self.dictionary.contains(&word)
		{
			return Err(Rejection::UnknownWord(word))
		}
		if !self.puzzle.letters().accepts(&word)
		{
			return Err(Rejection::Invalid(word))
		}
		// Normalized words are pure ASCII, so the byte length is the letter
		// count.
		let points = word.len() as u32;
		let bonus = if self.puzzle.is_seed(&word) { SEED_BONUS } else { 0 };
		let pangram = self.puzzle.letters().is_pangram(&word);
		self.found.push(word.clone());
		self.score += points + bonus;
		let milestone = self.found.len() % MILESTONE_INTERVAL == 0;
		debug!(
			"accepted {} for {}+{} (score {}, found {})",
			word,
			points,
			bonus,
			self.score,
			self.found.len()
		);
		Ok(Some(Acceptance { word, points, bonus, pangram, milestone }))
	}

	/// Get the letter set.
	#[inline]
	pub fn letters(&self) -> &LetterSet { self.puzzle.letters() }

	/// Get the cumulative score.
	#[inline]
	#[must_use]
	pub fn score(&self) -> u32 { self.score }

	/// Get the found words, in order of discovery.
	#[inline]
	#[must_use]
	pub fn found(&self) -> &[String] { &self.found }

	/// Get the found words, sorted lexicographically.
	#[must_use]
	pub fn found_sorted(&self) -> Vec<&str>
	{
		let mut found =
			self.found.iter().map(String::as_str).collect::<Vec<_>>();
		found.sort_unstable();
		found
	}

	/// Get the found words that are pangrams, in order of discovery.
	#[must_use]
	pub fn pangrams_found(&self) -> Vec<&str>
	{
		self.found.iter()
			.filter(|w| self.puzzle.letters().is_pangram(w))
			.map(String::as_str)
			.collect()
	}

	/// Get the valid words of the puzzle.
	#[inline]
	#[must_use]
	pub fn valid_words(&self) -> &[String] { self.puzzle.valid_words() }

	/// Answer how many valid words remain to be found.
	#[must_use]
	pub fn remaining(&self) -> usize
	{
		self.puzzle.valid_words().iter()
			.filter(|w| !self.found.contains(w))
			.count()
	}

	/// Check if the given normalized word is the seed.
	#[inline]
	#[must_use]
	pub fn is_seed(&self, word: &str) -> bool { self.puzzle.is_seed(word) }

	/// Reveal every pangram of the puzzle.
	#[inline]
	pub fn reveal_pangrams(&mut self) { self.pangrams_revealed = true; }

	/// Get every pangram of the puzzle if the player asked to see them, or
	/// `None` if they remain hidden. An empty list means that the letter set
	/// admits no pangram at all.
	#[must_use]
	pub fn revealed_pangrams(&self) -> Option<Vec<&str>>
	{
		self.pangrams_revealed.then(|| self.puzzle.pangrams())
	}
}

/// The outcome of an accepted guess, including the signals that the
/// presentation layer should act upon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Acceptance
{
	/// The normalized word.
	pub word: String,

	/// The points for the word itself, i.e., its length.
	pub points: u32,

	/// The seed bonus, which is either `0` or [`SEED_BONUS`].
	pub bonus: u32,

	/// Whether the word uses every letter of the letter set.
	pub pangram: bool,

	/// Whether this acceptance brought the found count to a multiple of
	/// [`MILESTONE_INTERVAL`].
	pub milestone: bool
}

impl Acceptance
{
	/// Answer the total score delta.
	#[inline]
	#[must_use]
	pub fn total(&self) -> u32 { self.points + self.bonus }

	/// Check if the player reconstructed the seed.
	#[inline]
	#[must_use]
	pub fn seed_found(&self) -> bool { self.bonus > 0 }
}

/// The complete enumeration of reasons for rejecting a guess. Each carries
/// the normalized guess. None is fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection
{
	/// The word was already found.
	Duplicate(String),

	/// The word is not in the dictionary.
	UnknownWord(String),

	/// The word is too short, uses a letter outside the letter set, or lacks
	/// the mandatory letter.
	Invalid(String)
}

impl Display for Rejection
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Duplicate(word) => write!(f, "Already found: {}", word),
			Self::UnknownWord(word) =>
				write!(f, "Not a recognized word: {}", word),
			Self::Invalid(word) => write!(f, "Not valid: {}", word)
		}
	}
}

impl Error for Rejection {}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use std::rc::Rc;

	use rand::{rngs::StdRng, SeedableRng};

	use crate::{
		dictionary::Dictionary,
		game::{Acceptance, Rejection, Session, SEED_BONUS},
		puzzle::{LetterSet, Puzzle}
	};

	/// A session for the letters of "RELATES" plus "I", with "R" mandatory.
	fn session() -> Session
	{
		let dictionary = Rc::new(Dictionary::from_words(&[
			"stare", "seal", "relates", "realist", "tear", "rats", "star",
			"trail", "liar", "raise", "tires", "ear", "re", "dog", "orbit",
			"retails", "rates", "aster"
		]));
		let letters = LetterSet::new("RELATSI", 'R').unwrap();
		let puzzle = Puzzle::new("RELATES", letters, &dictionary);
		Session::with_puzzle(dictionary, puzzle)
	}

	/// Play through the canonical example.
	#[test]
	fn test_example()
	{
		let mut session = session();
		assert_eq!(session.score(), 0);

		let accepted = session.submit("STARE").unwrap().unwrap();
		assert_eq!(accepted.word, "STARE");
		assert_eq!(accepted.points, 5);
		assert_eq!(accepted.bonus, 0);
		assert_eq!(accepted.total(), 5);
		assert!(!accepted.seed_found());
		assert_eq!(session.score(), 5);

		assert_eq!(
			session.submit("STARE"),
			Err(Rejection::Duplicate("STARE".to_string()))
		);
		assert_eq!(session.score(), 5);

		assert_eq!(
			session.submit("XYLOPHONE"),
			Err(Rejection::UnknownWord("XYLOPHONE".to_string()))
		);
		assert_eq!(
			session.submit("SEAL"),
			Err(Rejection::Invalid("SEAL".to_string()))
		);
		assert_eq!(session.score(), 5);
		assert_eq!(session.found(), &["STARE"]);

		let accepted = session.submit("relates").unwrap().unwrap();
		assert_eq!(accepted.points, 7);
		assert_eq!(accepted.bonus, SEED_BONUS);
		assert!(accepted.seed_found());
		assert!(!accepted.pangram);
		assert_eq!(session.score(), 5 + 7 + SEED_BONUS);
	}

	/// Ensure that guesses are trimmed and normalized, and that blank guesses
	/// are ignored without touching the session.
	#[test]
	fn test_normalization()
	{
		let mut session = session();
		assert_eq!(session.submit(""), Ok(None));
		assert_eq!(session.submit("   \t"), Ok(None));
		assert_eq!(session.score(), 0);
		let accepted = session.submit("  t-e-a-r! ").unwrap().unwrap();
		assert_eq!(accepted.word, "TEAR");
		assert_eq!(
			session.submit("Tear"),
			Err(Rejection::Duplicate("TEAR".to_string()))
		);
		assert_eq!(
			session.submit("123"),
			Err(Rejection::UnknownWord(String::new()))
		);
		assert!(session.found().iter().all(|w| !w.is_empty()));
	}

	/// Ensure that dictionary membership is checked before the letter
	/// constraints, and that every letter constraint is enforced.
	#[test]
	fn test_rejection_order()
	{
		let mut session = session();
		// Neither a word nor made of the right letters.
		assert_eq!(
			session.submit("QZX"),
			Err(Rejection::UnknownWord("QZX".to_string()))
		);
		// Made of the right letters, but not a word.
		assert_eq!(
			session.submit("RRR"),
			Err(Rejection::UnknownWord("RRR".to_string()))
		);
		// Too short.
		assert_eq!(
			session.submit("re"),
			Err(Rejection::Invalid("RE".to_string()))
		);
		// Foreign letters.
		assert_eq!(
			session.submit("orbit"),
			Err(Rejection::Invalid("ORBIT".to_string()))
		);
		assert_eq!(
			session.submit("dog"),
			Err(Rejection::Invalid("DOG".to_string()))
		);
		// No mandatory letter.
		assert_eq!(
			session.submit("seal"),
			Err(Rejection::Invalid("SEAL".to_string()))
		);
		assert_eq!(session.score(), 0);
		assert!(session.found().is_empty());
		// The session remains usable.
		assert!(session.submit("ear").unwrap().is_some());
		assert_eq!(session.score(), 3);
	}

	/// Ensure that pangrams are detected independently of the seed bonus.
	#[test]
	fn test_pangrams()
	{
		let mut session = session();
		let accepted = session.submit("REALIST").unwrap().unwrap();
		assert!(accepted.pangram);
		assert_eq!(accepted.bonus, 0);
		assert_eq!(accepted.total(), 7);
		let accepted = session.submit("RELATES").unwrap().unwrap();
		assert!(!accepted.pangram);
		assert_eq!(accepted.bonus, SEED_BONUS);
		session.submit("STAR").unwrap();
		assert_eq!(session.pangrams_found(), vec!["REALIST"]);
		assert!(session.is_seed("RELATES"));
		assert!(!session.is_seed("REALIST"));
	}

	/// Ensure that the milestone fires on the fifth and tenth acceptance and
	/// never otherwise, and that rejections do not count.
	#[test]
	fn test_milestone()
	{
		let mut session = session();
		let words = [
			"stare", "tear", "rats", "star", "trail", "liar", "raise",
			"tires", "ear", "rates"
		];
		let mut milestones = Vec::new();
		for (index, word) in words.iter().enumerate()
		{
			if index == 4
			{
				// A rejection right before the fifth word changes nothing.
				assert!(session.submit("stare").is_err());
			}
			let accepted = session.submit(word).unwrap().unwrap();
			if accepted.milestone
			{
				milestones.push(session.found().len());
			}
		}
		assert_eq!(milestones, vec![5, 10]);
	}

	/// Ensure that the score only ever grows, by exactly the length of each
	/// accepted word plus any seed bonus.
	#[test]
	fn test_score_monotonic()
	{
		let mut session = session();
		let guesses = [
			"stare", "stare", "xylophone", "relates", "seal", "realist",
			"relates", "aster", "", "re"
		];
		let mut previous = session.score();
		for guess in guesses
		{
			match session.submit(guess)
			{
				Ok(Some(Acceptance { word, bonus, .. })) =>
				{
					let expected = word.len() as u32
						+ if word == "RELATES" { SEED_BONUS } else { 0 };
					assert_eq!(bonus > 0, word == "RELATES");
					assert_eq!(session.score(), previous + expected);
				},
				Ok(None) | Err(_) => assert_eq!(session.score(), previous)
			}
			assert!(session.score() >= previous);
			previous = session.score();
		}
		assert_eq!(session.score(), 5 + 17 + 7 + 5);
	}

	/// Ensure the bookkeeping views of the session.
	#[test]
	fn test_views()
	{
		let mut session = session();
		let total = session.valid_words().len();
		assert_eq!(session.remaining(), total);
		session.submit("tear").unwrap();
		session.submit("ear").unwrap();
		assert_eq!(session.remaining(), total - 2);
		assert_eq!(session.found(), &["TEAR", "EAR"]);
		assert_eq!(session.found_sorted(), vec!["EAR", "TEAR"]);
		assert_eq!(session.letters().mandatory(), 'R');
	}

	/// Ensure that pangrams stay hidden until revealed.
	#[test]
	fn test_reveal_pangrams()
	{
		let mut session = session();
		assert_eq!(session.revealed_pangrams(), None);
		session.reveal_pangrams();
		assert_eq!(
			session.revealed_pangrams(),
			Some(vec!["REALIST", "RETAILS"])
		);
	}

	/// Ensure that a new game starts from scratch but keeps the dictionary.
	#[test]
	fn test_new_game()
	{
		let mut session = session();
		session.submit("stare").unwrap();
		session.reveal_pangrams();
		let dictionary = Rc::clone(&session.dictionary);
		let mut rng = StdRng::seed_from_u64(11);
		session.new_game(&mut rng);
		assert_eq!(session.score(), 0);
		assert!(session.found().is_empty());
		assert_eq!(session.revealed_pangrams(), None);
		assert!(Rc::ptr_eq(&dictionary, &session.dictionary));
		let letters = session.letters();
		assert!(letters.letters().contains(letters.mandatory()));
	}
}
