//! # Dictionary
//!
//! Herein is support for dictionary construction and lookup. The word source
//! is a plain text file with one word per line, ordered by frequency. Every
//! entry is [normalized](normalize) on the way in, so all runtime operations
//! are performed against uppercase, purely alphabetic words. Membership checks
//! go through a prefix tree; enumeration goes through the ordered word list.

use std::{
	error::Error,
	fmt::{self, Display, Formatter},
	fs::File,
	io::{self, BufRead, BufReader, ErrorKind, Read, Write},
	path::{Path, PathBuf}
};

use log::{debug, trace, warn};
use pfx::PrefixTreeSet;
use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
//                               Normalization.                               //
////////////////////////////////////////////////////////////////////////////////

/// Normalize a word for comparison: uppercase it, then strip every character
/// that is not an ASCII letter. Non-ASCII letters do not survive.
///
/// # Arguments
///
/// * `word` - The word to normalize.
///
/// # Returns
///
/// The normalized word, which may be empty.
#[must_use]
pub fn normalize(word: &str) -> String
{
	word.chars()
		.flat_map(char::to_uppercase)
		.filter(char::is_ascii_uppercase)
		.collect()
}

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// The default number of entries to take from the word source. The binary
/// dictionary remembers the limit it was built with, so every consumer of the
/// default dictionary should agree on this value.
pub const DEFAULT_LIMIT: usize = 200_000;

/// A dictionary of normalized words. The ordered word list preserves the
/// order of the word source, and the [`PrefixTreeSet`] answers membership
/// queries.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Dictionary
{
	/// The maximum number of source entries that were read to build the
	/// dictionary. Used to decide whether a binary dictionary is stale.
	limit: usize,

	/// The normalized words, in source order.
	words: Vec<String>,

	/// Every normalized word, for fast lookup.
	lookup: PrefixTreeSet<String>
}

impl Default for Dictionary
{
	fn default() -> Self
	{
		Self {
			limit: usize::MAX,
			words: Vec::new(),
			lookup: Default::default()
		}
	}
}

impl Dictionary
{
	/// Construct an empty dictionary. Same as [`Default::default`].
	#[inline]
	pub fn new() -> Self { Self::default() }

	/// Construct a dictionary from the given raw words.
	///
	/// # Arguments
	///
	/// * `words` - The raw words, which will be normalized.
	///
	/// # Returns
	///
	/// The populated dictionary.
	pub fn from_words<T: AsRef<str>>(words: &[T]) -> Self
	{
		let mut dictionary = Self::new();
		dictionary.populate(words);
		dictionary
	}

	/// Check if the dictionary is empty.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.words.is_empty() }

	/// Answer the number of entries in the dictionary. Distinct raw words that
	/// normalize identically are counted separately.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize { self.words.len() }

	/// Check if the dictionary contains the given word. The word must already
	/// be [normalized](normalize).
	///
	/// # Arguments
	///
	/// * `word` - The word to check.
	///
	/// # Returns
	///
	/// `true` if the dictionary contains the word, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn contains(&self, word: &str) -> bool
	{
		!word.is_empty() && self.lookup.contains(word)
	}

	/// Get the normalized words of the dictionary, in source order.
	#[inline]
	#[must_use]
	pub fn words(&self) -> &[String] { &self.words }

	/// Populate the dictionary with the given raw words. Each word is
	/// [normalized](normalize) first, and words that normalize to nothing are
	/// skipped.
	///
	/// # Arguments
	///
	/// * `words` - The intended content of the dictionary.
	pub fn populate<T: AsRef<str>>(&mut self, words: &[T])
	{
		for word in words
		{
			let word = normalize(word.as_ref());
			if word.is_empty()
			{
				continue
			}
			self.lookup.insert(word.clone());
			self.words.push(word);
		}
	}

	/// Open a dictionary with the given name. Only the specified directory will
	/// be searched. `name` denotes the dictionary file, sans the extension. If
	/// a binary dictionary (`<name>.dict`) exists, is newer than the text file
	/// (`<name>.txt`), and was built from the same number of source entries, it
	/// will be read; otherwise, the text file will be read and a binary
	/// dictionary will be created (to optimize future reads).
	///
	/// # Arguments
	///
	/// * `dir` - The directory to search.
	/// * `name` - The name of the dictionary file.
	/// * `limit` - The maximum number of source entries to read.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// * [`DictionaryError::Unavailable`] if the text file cannot be opened or
	///   read.
	/// * [`DictionaryError::Empty`] if the dictionary has no usable words.
	pub fn open<T: AsRef<Path>>(
		dir: T,
		name: &str,
		limit: usize
	) -> Result<Self, DictionaryError>
	{
		let dict_path = dir.as_ref().join(format!("{}.dict", name));
		let txt_path = dir.as_ref().join(format!("{}.txt", name));
		// Any failure to stat either file just means that the binary
		// dictionary cannot be trusted.
		let fresh = dict_path
			.metadata()
			.and_then(|m| m.modified())
			.and_then(|dict_time| {
				txt_path
					.metadata()
					.and_then(|n| n.modified())
					.map(|txt_time| dict_time > txt_time)
			})
			.unwrap_or(false);
		if fresh
		{
			match Self::deserialize_from_file(&dict_path)
			{
				Ok(dictionary) if dictionary.limit == limit =>
				{
					trace!("Read binary dictionary: {}", dict_path.display());
					return dictionary.check(&dict_path)
				},
				Ok(dictionary) => debug!(
					"Binary dictionary built with limit {}, wanted {}: {}",
					dictionary.limit,
					limit,
					dict_path.display()
				),
				Err(e) => warn!(
					"Failed to read binary dictionary: {}: {}",
					dict_path.display(),
					e
				)
			}
		}
		let dictionary = Self::read_from_file(&txt_path, limit)
			.map_err(|source| DictionaryError::Unavailable {
				path: txt_path.clone(),
				source
			})?;
		trace!("Read text dictionary: {}", txt_path.display());
		let dictionary = dictionary.check(&txt_path)?;
		match dictionary.serialize_to_file(&dict_path)
		{
			Ok(_) =>
			{
				trace!("Wrote binary dictionary: {}", dict_path.display())
			},
			Err(e) => warn!(
				"Failed to write binary dictionary: {}: {}",
				dict_path.display(),
				e
			)
		}
		Ok(dictionary)
	}

	/// Construct a dictionary from the contents of the given file. Each line
	/// in the file is considered a single raw word. Only the first `limit`
	/// lines are read.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	/// * `limit` - The maximum number of lines to read.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// If the file cannot be opened or read, an error is returned.
	pub fn read_from_file<T: AsRef<Path>>(
		path: T,
		limit: usize
	) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let reader = BufReader::new(file);
		let words = reader.lines()
			.take(limit)
			.collect::<Result<Vec<_>, _>>()?;
		let mut dictionary = Self::new();
		dictionary.limit = limit;
		dictionary.populate(&words);
		Ok(dictionary)
	}

	/// Deserialize a dictionary from the given file. The file must contain a
	/// serialized dictionary in [`bincode`](bincode) format.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// A dictionary deserialized from the file.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or read, an error is returned.
	/// * If the file contains invalid data, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn deserialize_from_file<T: AsRef<Path>>(
		path: T
	) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let mut reader = BufReader::new(file);
		let mut content = Vec::new();
		reader.read_to_end(&mut content)?;
		let dictionary = bincode::deserialize(&content)
			.map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
		Ok(dictionary)
	}

	/// Serialize the dictionary to the given file. The dictionary is serialized
	/// in [`bincode`](bincode) format.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Errors
	///
	/// * If the file cannot be created or written, an error is returned.
	/// * If the dictionary cannot be encoded, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn serialize_to_file<T: AsRef<Path>>(
		&self,
		path: T
	) -> Result<(), io::Error>
	{
		let content = bincode::serialize(self)
			.map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
		let mut file = File::create(path)?;
		file.write_all(&content)?;
		Ok(())
	}

	/// Reject a dictionary that has no usable words, since no puzzle could
	/// ever be played against it.
	fn check(self, path: &Path) -> Result<Self, DictionaryError>
	{
		if self.is_empty()
		{
			Err(DictionaryError::Empty { path: path.to_path_buf() })
		}
		else
		{
			debug!("Dictionary holds {} words", self.len());
			Ok(self)
		}
	}
}

/// The complete enumeration of [`Dictionary`] loading errors. Any of these
/// means that no puzzle can be started.
#[derive(Debug)]
pub enum DictionaryError
{
	/// The word source could not be opened or read.
	Unavailable {
		/// The path of the word source.
		path: PathBuf,

		/// The underlying I/O error.
		source: io::Error
	},

	/// The word source contained no usable words.
	Empty {
		/// The path of the word source.
		path: PathBuf
	}
}

impl Display for DictionaryError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Unavailable { path, source } => write!(
				f,
				"dictionary unavailable: {}: {}",
				path.display(),
				source
			),
			Self::Empty { path } =>
				write!(f, "dictionary is empty: {}", path.display())
		}
	}
}

impl Error for DictionaryError
{
	fn source(&self) -> Option<&(dyn Error + 'static)>
	{
		match self
		{
			Self::Unavailable { source, .. } => Some(source),
			Self::Empty { .. } => None
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use std::{
		fs::{self, File},
		path::Path,
		time::{Duration, SystemTime}
	};

	use crate::dictionary::{normalize, Dictionary, DictionaryError};
	use tempfile::{tempdir, NamedTempFile};

	/// The path to the sample word list.
	#[inline]
	#[must_use]
	const fn test_path() -> &'static str { "dict/english.txt" }

	/// Push the modification time of the given file well past that of its
	/// sibling text file, so that coarse file system timestamps cannot make
	/// the two look simultaneous.
	///
	/// # Arguments
	///
	/// * `path` - The file to touch.
	fn age_after_text(path: &Path)
	{
		let txt_time = fs::metadata(path.with_extension("txt"))
			.unwrap()
			.modified()
			.unwrap();
		let later = txt_time.max(SystemTime::now()) + Duration::from_secs(60);
		File::options()
			.write(true)
			.open(path)
			.unwrap()
			.set_modified(later)
			.unwrap();
	}

	/// Ensure that normalization uppercases and strips everything that is not
	/// an ASCII letter.
	#[test]
	fn test_normalize()
	{
		assert_eq!(normalize("stare"), "STARE");
		assert_eq!(normalize("  Rock-n-Roll! "), "ROCKNROLL");
		assert_eq!(normalize("don't"), "DONT");
		assert_eq!(normalize("café"), "CAF");
		assert_eq!(normalize("42"), "");
		assert_eq!(normalize(""), "");
	}

	/// Test basic functionality of [`Dictionary`]:
	///
	/// * [`Dictionary::new`]
	/// * [`Dictionary::is_empty`]
	/// * [`Dictionary::populate`]
	/// * [`Dictionary::contains`]
	/// * [`Dictionary::words`]
	#[test]
	fn test_populate()
	{
		let mut dictionary = Dictionary::new();
		assert!(dictionary.is_empty());
		assert!(!dictionary.contains("HELLO"));
		dictionary.populate(&["hello", "world", "o'clock", "123", "Hello"]);
		assert!(dictionary.contains("HELLO"));
		assert!(dictionary.contains("WORLD"));
		assert!(dictionary.contains("OCLOCK"));
		assert!(!dictionary.contains("hello"));
		assert!(!dictionary.contains(""));
		assert_eq!(dictionary.len(), 4);
		assert_eq!(
			dictionary.words(),
			&["HELLO", "WORLD", "OCLOCK", "HELLO"]
		);
	}

	/// Test reading a dictionary from a file:
	///
	/// * [`Dictionary::read_from_file`]
	#[test]
	fn test_read_from_file()
	{
		let dictionary =
			Dictionary::read_from_file(test_path(), usize::MAX).unwrap();
		assert!(!dictionary.is_empty());
		// These words had better be in the dictionary…
		assert!(dictionary.contains("HELLO"));
		assert!(dictionary.contains("WORLD"));
		assert!(dictionary.words().iter().all(|w| w == &normalize(w)));
		// A playable default source needs several thousand words.
		assert!(dictionary.len() >= 5000);
		assert_eq!(&dictionary.words()[.. 3], &["THE", "OF", "AND"]);
	}

	/// Ensure that only the first `limit` entries of the word source are read.
	#[test]
	fn test_read_limit()
	{
		let full = Dictionary::read_from_file(test_path(), usize::MAX).unwrap();
		let partial = Dictionary::read_from_file(test_path(), 10).unwrap();
		assert!(partial.len() <= 10);
		assert_eq!(partial.words(), &full.words()[..partial.len()]);
	}

	/// Test serializing and deserializing a dictionary:
	///
	/// * [`Dictionary::serialize_to_file`]
	/// * [`Dictionary::deserialize_from_file`]
	#[test]
	fn test_serialize_to_file()
	{
		let dictionary =
			Dictionary::read_from_file(test_path(), usize::MAX).unwrap();
		let file = NamedTempFile::new().unwrap();
		dictionary.serialize_to_file(file.path()).unwrap();
		let deserialized =
			Dictionary::deserialize_from_file(file.path()).unwrap();
		assert_eq!(dictionary, deserialized);
	}

	/// Ensure that [`Dictionary::open`] honors the limit even when a binary
	/// dictionary built with a different limit is lying around.
	#[test]
	fn test_open_limit()
	{
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("words.txt"), "ant\nbee\ncat\ndog\n")
			.unwrap();
		let dictionary = Dictionary::open(dir.path(), "words", 2).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE"]);
		assert!(dir.path().join("words.dict").exists());
		let dictionary = Dictionary::open(dir.path(), "words", 3).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE", "CAT"]);
		let dictionary = Dictionary::open(dir.path(), "words", 3).unwrap();
		assert!(dictionary.contains("CAT"));
		assert!(!dictionary.contains("DOG"));
	}

	/// Ensure that a binary dictionary that is newer than the text file, but
	/// was built with a different limit, is rebuilt rather than trusted.
	#[test]
	fn test_open_limit_fresh_cache()
	{
		let dir = tempdir().unwrap();
		let dict_path = dir.path().join("words.dict");
		fs::write(dir.path().join("words.txt"), "ant\nbee\ncat\ndog\n")
			.unwrap();
		let dictionary = Dictionary::open(dir.path(), "words", 2).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE"]);
		age_after_text(&dict_path);
		let cached = Dictionary::deserialize_from_file(&dict_path).unwrap();
		assert_eq!(cached.limit, 2);
		let dictionary = Dictionary::open(dir.path(), "words", 3).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE", "CAT"]);
		let cached = Dictionary::deserialize_from_file(&dict_path).unwrap();
		assert_eq!(cached.limit, 3);
		assert_eq!(cached.words(), &["ANT", "BEE", "CAT"]);
	}

	/// Ensure that a corrupt binary dictionary that is newer than the text
	/// file falls back to the text file, and is then replaced.
	#[test]
	fn test_open_corrupt_cache()
	{
		let dir = tempdir().unwrap();
		let dict_path = dir.path().join("words.dict");
		fs::write(dir.path().join("words.txt"), "ant\nbee\ncat\n").unwrap();
		fs::write(&dict_path, b"\xff\xfe not a dictionary").unwrap();
		age_after_text(&dict_path);
		assert!(Dictionary::deserialize_from_file(&dict_path).is_err());
		let dictionary = Dictionary::open(dir.path(), "words", 3).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE", "CAT"]);
		let cached = Dictionary::deserialize_from_file(&dict_path).unwrap();
		assert_eq!(cached, dictionary);
	}

	/// Ensure that failing to write the binary dictionary is not fatal.
	#[test]
	fn test_open_unwritable_cache()
	{
		let dir = tempdir().unwrap();
		let dict_path = dir.path().join("words.dict");
		fs::write(dir.path().join("words.txt"), "ant\nbee\n").unwrap();
		fs::create_dir(&dict_path).unwrap();
		let dictionary = Dictionary::open(dir.path(), "words", 10).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE"]);
		assert!(dict_path.is_dir());
		let dictionary = Dictionary::open(dir.path(), "words", 10).unwrap();
		assert_eq!(dictionary.words(), &["ANT", "BEE"]);
	}

	/// Ensure that a missing or useless word source is fatal.
	#[test]
	fn test_open_unavailable()
	{
		let dir = tempdir().unwrap();
		match Dictionary::open(dir.path(), "missing", 100)
		{
			Err(DictionaryError::Unavailable { path, .. }) =>
				assert!(path.ends_with("missing.txt")),
			other => panic!("unexpected: {:?}", other)
		}
		fs::write(dir.path().join("junk.txt"), "123\n--\n\n").unwrap();
		match Dictionary::open(dir.path(), "junk", 100)
		{
			Err(DictionaryError::Empty { path }) =>
				assert!(path.ends_with("junk.txt")),
			other => panic!("unexpected: {:?}", other)
		}
	}
}
