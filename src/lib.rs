//! # LetterRing
//!
//! LetterRing is a word puzzle game in the style of a spelling bee. The player
//! is shown seven distinct letters, one of which is mandatory, and must find
//! dictionary words of at least three letters that use only those letters and
//! always include the mandatory one. Every word scores its length. A word that
//! uses all seven letters is a pangram. The letters are derived from a hidden
//! seed word, and reconstructing the seed word itself earns a bonus.
//!
//! The library comprises the game logic only:
//!
//! * [`dictionary`] loads and normalizes the word source.
//! * [`puzzle`] generates letter sets and computes their valid words.
//! * [`game`] validates and scores guesses against a puzzle.

pub mod dictionary;
pub mod game;
pub mod puzzle;
