//! # Puzzle
//!
//! Herein is the puzzle generator. A puzzle is derived from a seed word: the
//! seed's distinct letters form the [letter set](LetterSet), one of which is
//! chosen as the mandatory letter, and the dictionary is filtered down to the
//! words that can be built from the letter set.

use std::{
	error::Error,
	fmt::{self, Display, Formatter}
};

use fixedstr::str8;
use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

use crate::dictionary::{normalize, Dictionary};

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The number of distinct letters in every puzzle.
pub const LETTER_COUNT: usize = 7;

/// The minimum length of an acceptable word.
pub const MIN_WORD_LENGTH: usize = 3;

/// How many times to redraw a seed that does not have exactly
/// [`LETTER_COUNT`] distinct letters before falling back to padding.
pub const MAX_SEED_ATTEMPTS: usize = 50;

/// The curated seed words. Most, but not all, have exactly seven distinct
/// letters; the generator copes with the rest.
pub const SEEDS: [&str; 50] = [
	"RAINBOW", "SILENCE", "CAPTURE", "NETWORK", "ORCHARD",
	"TREASON", "BALANCE", "HARMONY", "LIBRARY", "MOUNTAIN",
	"FANTASY", "TRIANGLE", "NOTEBOOK", "FIREPLACE", "SUNLIGHT",
	"PAINTER", "CARTOON", "MIRACLE", "FOREIGN", "GLACIER",
	"WHISPER", "JOURNAL", "KITCHEN", "MONSTER", "PICTURE",
	"ROCKETS", "SCARLET", "THEATER", "VICTORY", "WEALTHY",
	"ADVENTURE", "BRILLIANT", "CREATION", "DISCOVER", "ELEGANCE",
	"FREEDOM", "GARDENS", "HORIZON", "IMAGINE", "JUNCTION",
	"KINGDOMS", "LANGUAGE", "MOMENTS", "NATURAL", "PASSION",
	"QUANTUM", "RESCUE", "SEASONS", "THOUGHT", "WONDER"
];

////////////////////////////////////////////////////////////////////////////////
//                                Letter sets.                                //
////////////////////////////////////////////////////////////////////////////////

/// Seven distinct uppercase letters, one of which is mandatory. The letters
/// are kept in presentation order, which carries no meaning for validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct LetterSet
{
	/// The letters, in presentation order.
	letters: str8,

	/// The letter that every acceptable word must contain.
	mandatory: char,

	/// One bit per letter of the alphabet, `A` in the least significant bit.
	mask: u32
}

impl LetterSet
{
	/// Construct a letter set, validating every invariant.
	///
	/// # Arguments
	///
	/// * `letters` - Exactly seven distinct uppercase ASCII letters.
	/// * `mandatory` - The mandatory letter, which must be one of `letters`.
	///
	/// # Returns
	///
	/// The letter set.
	///
	/// # Errors
	///
	/// The first [`LetterSetError`] found, checking the count, then the
	/// individual letters, then the mandatory letter.
	pub fn new(letters: &str, mandatory: char) -> Result<Self, LetterSetError>
	{
		let chars = letters.chars().collect::<Vec<_>>();
		if chars.len() != LETTER_COUNT
		{
			return Err(LetterSetError::WrongCount(chars.len()))
		}
		let mut mask = 0;
		for &c in &chars
		{
			if !c.is_ascii_uppercase()
			{
				return Err(LetterSetError::NotALetter(c))
			}
			if mask & bit(c) != 0
			{
				return Err(LetterSetError::Repeated(c))
			}
			mask |= bit(c);
		}
		if !chars.contains(&mandatory)
		{
			return Err(LetterSetError::MandatoryMissing(mandatory))
		}
		Ok(Self::assemble(&chars, mandatory))
	}

	/// Construct a letter set from parts already known to be valid.
	fn assemble(letters: &[char], mandatory: char) -> Self
	{
		debug_assert_eq!(letters.len(), LETTER_COUNT);
		debug_assert!(letters.contains(&mandatory));
		Self {
			letters: str8::make(&letters.iter().collect::<String>()),
			mandatory,
			mask: letters.iter().fold(0, |mask, &c| mask | bit(c))
		}
	}

	/// Get the letters, in presentation order.
	#[inline]
	#[must_use]
	pub fn letters(&self) -> &str { self.letters.as_str() }

	/// Get the mandatory letter.
	#[inline]
	#[must_use]
	pub fn mandatory(&self) -> char { self.mandatory }

	/// Check if the given letter belongs to the set.
	#[inline]
	#[must_use]
	pub fn contains(&self, c: char) -> bool
	{
		c.is_ascii_uppercase() && self.mask & bit(c) != 0
	}

	/// Check if every letter of the given word belongs to the set.
	#[must_use]
	pub fn admits(&self, word: &str) -> bool
	{
		word.chars().all(|c| self.contains(c))
	}

	/// Check if the given normalized word is acceptable for this letter set:
	/// long enough, containing the mandatory letter, and using no other
	/// letters.
	#[must_use]
	pub fn accepts(&self, word: &str) -> bool
	{
		word.len() >= MIN_WORD_LENGTH
			&& word.contains(self.mandatory)
			&& self.admits(word)
	}

	/// Check if the given word is a pangram, i.e., if its letters are a
	/// superset of the letter set. Whether the word is the seed is irrelevant.
	#[must_use]
	pub fn is_pangram(&self, word: &str) -> bool
	{
		let used = word.chars()
			.filter(char::is_ascii_uppercase)
			.fold(0, |mask, c| mask | bit(c));
		used & self.mask == self.mask
	}

	/// Arrange the letters for display, with the mandatory letter in the
	/// centre and the others around it in presentation order.
	#[must_use]
	pub fn display_order(&self) -> [char; LETTER_COUNT]
	{
		let mut others = self.letters().chars().filter(|&c| c != self.mandatory);
		let mut display = [self.mandatory; LETTER_COUNT];
		for (index, slot) in display.iter_mut().enumerate()
		{
			if index != LETTER_COUNT / 2
			{
				*slot = others.next().unwrap_or(self.mandatory);
			}
		}
		display
	}
}

/// The bit of a letter mask corresponding to the given uppercase letter.
#[inline]
#[must_use]
fn bit(c: char) -> u32 { 1 << (c as u32 - 'A' as u32) }

/// The complete enumeration of [`LetterSet`] construction errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterSetError
{
	/// The wrong number of letters was supplied.
	WrongCount(usize),

	/// A character is not an uppercase ASCII letter.
	NotALetter(char),

	/// A letter occurs more than once.
	Repeated(char),

	/// The mandatory letter is not among the letters.
	MandatoryMissing(char)
}

impl Display for LetterSetError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::WrongCount(n) =>
				write!(f, "expected {} letters, got {}", LETTER_COUNT, n),
			Self::NotALetter(c) => write!(f, "not an uppercase letter: {}", c),
			Self::Repeated(c) => write!(f, "repeated letter: {}", c),
			Self::MandatoryMissing(c) =>
				write!(f, "mandatory letter not in set: {}", c)
		}
	}
}

impl Error for LetterSetError {}

////////////////////////////////////////////////////////////////////////////////
//                                  Puzzles.                                  //
////////////////////////////////////////////////////////////////////////////////

/// A puzzle: the seed, the letter set derived from it, and every dictionary
/// word that the letter set accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Puzzle
{
	/// The normalized seed word. Never shown to the player.
	seed: String,

	/// The letter set.
	letters: LetterSet,

	/// The acceptable dictionary words, deduplicated and sorted.
	valid_words: Vec<String>
}

impl Puzzle
{
	/// Construct a puzzle from a known seed and letter set.
	///
	/// # Arguments
	///
	/// * `seed` - The seed word, which will be normalized.
	/// * `letters` - The letter set.
	/// * `dictionary` - The dictionary from which to draw valid words.
	///
	/// # Returns
	///
	/// The puzzle.
	pub fn new(seed: &str, letters: LetterSet, dictionary: &Dictionary) -> Self
	{
		let valid_words = valid_words(&letters, dictionary);
		debug!(
			"Puzzle {} (mandatory {}) admits {} words",
			letters.letters(),
			letters.mandatory(),
			valid_words.len()
		);
		Self {
			seed: normalize(seed),
			letters,
			valid_words
		}
	}

	/// Generate a random puzzle. Seeds are drawn from `seeds` until one with
	/// exactly [`LETTER_COUNT`] distinct letters turns up or
	/// [`MAX_SEED_ATTEMPTS`] redraws have been spent. The seed's distinct
	/// letters are then truncated or padded with random unused letters, so a
	/// well-formed letter set always results, even from an empty seed list.
	///
	/// # Arguments
	///
	/// * `rng` - The source of randomness.
	/// * `seeds` - The candidate seed words.
	/// * `dictionary` - The dictionary from which to draw valid words.
	///
	/// # Returns
	///
	/// The puzzle.
	pub fn generate<R: Rng + ?Sized>(
		rng: &mut R,
		seeds: &[&str],
		dictionary: &Dictionary
	) -> Self
	{
		let seed = choose_seed(rng, seeds);
		let mut letters = distinct_letters(&seed);
		letters.truncate(LETTER_COUNT);
		if letters.len() < LETTER_COUNT
		{
			let missing = LETTER_COUNT - letters.len();
			let mut unused = ('A' ..= 'Z')
				.filter(|c| !letters.contains(c))
				.collect::<Vec<_>>();
			unused.shuffle(rng);
			trace!("padding seed {:?} with {} letters", seed, missing);
			letters.extend(unused.into_iter().take(missing));
		}
		letters.shuffle(rng);
		let mandatory = letters[rng.gen_range(0 .. letters.len())];
		Self::new(&seed, LetterSet::assemble(&letters, mandatory), dictionary)
	}

	/// Get the normalized seed word.
	#[inline]
	#[must_use]
	pub fn seed(&self) -> &str { &self.seed }

	/// Check if the given normalized word is exactly the seed.
	#[inline]
	#[must_use]
	pub fn is_seed(&self, word: &str) -> bool
	{
		!self.seed.is_empty() && self.seed == word
	}

	/// Get the letter set.
	#[inline]
	pub fn letters(&self) -> &LetterSet { &self.letters }

	/// Get the valid words, sorted lexicographically.
	#[inline]
	#[must_use]
	pub fn valid_words(&self) -> &[String] { &self.valid_words }

	/// Get every valid word that is a pangram.
	#[must_use]
	pub fn pangrams(&self) -> Vec<&str>
	{
		self.valid_words.iter()
			.filter(|w| self.letters.is_pangram(w))
			.map(String::as_str)
			.collect()
	}
}

/// Draw a seed, redrawing up to [`MAX_SEED_ATTEMPTS`] times while the seed
/// does not have exactly [`LETTER_COUNT`] distinct letters.
fn choose_seed<R: Rng + ?Sized>(rng: &mut R, seeds: &[&str]) -> String
{
	let mut seed = seeds.choose(rng).map(|s| normalize(s)).unwrap_or_default();
	let mut attempts = 0;
	while distinct_letters(&seed).len() != LETTER_COUNT
		&& attempts < MAX_SEED_ATTEMPTS
	{
		match seeds.choose(rng)
		{
			Some(s) => seed = normalize(s),
			None => break
		}
		attempts += 1;
	}
	trace!("chose seed {:?} after {} redraws", seed, attempts);
	seed
}

/// Get the distinct letters of the given normalized word, in order of first
/// appearance.
#[must_use]
fn distinct_letters(word: &str) -> Vec<char>
{
	let mut letters = Vec::with_capacity(LETTER_COUNT);
	for c in word.chars()
	{
		if !letters.contains(&c)
		{
			letters.push(c);
		}
	}
	letters
}

/// Compute the valid words for the given letter set: the dictionary words
/// that the letter set [accepts](LetterSet::accepts), deduplicated and
/// sorted.
#[must_use]
fn valid_words(letters: &LetterSet, dictionary: &Dictionary) -> Vec<String>
{
	let mut valid = dictionary.words().iter()
		.filter(|w| letters.accepts(w))
		.cloned()
		.collect::<Vec<_>>();
	valid.sort();
	valid.dedup();
	valid
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
