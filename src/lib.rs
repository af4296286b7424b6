//! Multi-pattern sensitive-word scanning with skip-transparent matching.
//!
//! A dictionary of forbidden terms is compiled into a code-point trie with
//! Aho-Corasick failure links; scanning then locates every occurrence of any
//! term in a UTF-8 input, optionally treating configurable "noise" code
//! points as transparent, so `T*M*D` still matches the term `TMD` while the
//! reported span keeps the noise.
//!
//! ```
//! use sensieve::from_words;
//!
//! let search = from_words(&["dog", "鸭子"]);
//! let input = "a d.o.g and a duck (鸭子)".as_bytes();
//!
//! let matches = search.find(input);
//! assert_eq!(matches[0].word(), "dog");
//! assert_eq!(matches[0].matched_str(), "d.o.g");
//!
//! assert_eq!(search.replace(input, b'*'),
//!            "a ***** and a duck (******)".as_bytes());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io;

mod builder;
mod decode;
mod search;
mod sink;
mod skip;
mod swap;
mod trie;

pub use crate::builder::SearchBuilder;
pub use crate::search::Search;
pub use crate::sink::{CountSink, ListSink, MatchSink};
pub use crate::skip::{SkipSet, SORTED_SKIP_LIST};
pub use crate::swap::SharedSearch;

/// Errors surfaced by dictionary ingestion. Scanning never fails: malformed
/// UTF-8 in the input is absorbed by replacement-character decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O failure from the underlying reader. Terms inserted before the
    /// failure remain in the builder.
    #[error("dictionary read failed: {0}")]
    Io(#[from] io::Error),
}

/// One occurrence of a dictionary term in the scanned input.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Match<'t, 'i> {
    word: &'t str,
    matched: &'i [u8],
    start: usize,
    end: usize,
}

impl<'t, 'i> Match<'t, 'i> {
    pub(crate) fn new(word: &'t str, matched: &'i [u8], start: usize, end: usize) -> Match<'t, 'i> {
        Match {
            word,
            matched,
            start,
            end,
        }
    }

    /// The dictionary term that matched, in its skip-stripped form.
    #[inline]
    pub fn word(&self) -> &'t str {
        self.word
    }

    /// The exact input bytes of the match, skip code points included.
    /// Always equal to `input[start..end]`.
    #[inline]
    pub fn matched(&self) -> &'i [u8] {
        self.matched
    }

    /// [`matched`](Match::matched) as text. Borrows unless the span contains
    /// malformed UTF-8.
    pub fn matched_str(&self) -> Cow<'i, str> {
        String::from_utf8_lossy(self.matched)
    }

    /// Byte offset where the first non-skip code point of the match begins.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the last code point of the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }
}

impl fmt::Display for Match<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {:?} {}..{})",
            self.word,
            self.matched_str(),
            self.start,
            self.end
        )
    }
}

/// Serializes to the interchange form `{word, matched, start, end}`, with
/// `matched` rendered lossily as text.
#[cfg(feature = "serde")]
impl serde::Serialize for Match<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("Match", 4)?;
        st.serialize_field("word", self.word)?;
        st.serialize_field("matched", &self.matched_str())?;
        st.serialize_field("start", &self.start)?;
        st.serialize_field("end", &self.end)?;
        st.end()
    }
}

/// Build a frozen engine from an in-memory word list, with the default skip
/// set.
pub fn from_words<I>(words: I) -> Search
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    from_words_with_skip(words, SkipSet::default())
}

/// Build a frozen engine from an in-memory word list and a caller-provided
/// skip set.
pub fn from_words_with_skip<I>(words: I, skip: SkipSet) -> Search
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut builder = SearchBuilder::with_skip(skip);
    builder.insert_words(words);
    builder.build()
}

/// Build a frozen engine from `sep`-delimited terms read off `reader`, with
/// the default skip set.
pub fn from_reader<R: io::Read>(reader: R, sep: u8) -> Result<Search, Error> {
    let mut builder = SearchBuilder::new();
    let mut workbuf = [0u8; 8 * 1024];
    builder.insert_reader(reader, &mut workbuf, sep)?;
    Ok(builder.build())
}
