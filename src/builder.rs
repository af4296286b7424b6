use std::io;

use log::debug;

use crate::search::Search;
use crate::skip::SkipSet;
use crate::trie::Trie;
use crate::Error;

/// Collects dictionary terms and freezes them into a [`Search`].
///
/// Terms are inserted with skip code points already stripped, so the trie
/// only ever stores the normalized form that scanning compares against.
/// `build` consumes the builder: once failure links exist, the dictionary
/// cannot be mutated except by building a fresh engine.
///
/// ```
/// use sensieve::SearchBuilder;
///
/// let mut builder = SearchBuilder::new();
/// builder.insert("dog").insert("鸭子");
/// let search = builder.build();
/// assert!(search.has_sens("a d.o.g".as_bytes()));
/// ```
pub struct SearchBuilder {
    trie: Trie,
    skip: SkipSet,
    /// Partial line carried between `io::Write` calls.
    pending: Vec<u8>,
}

impl SearchBuilder {
    /// A builder with the default skip set.
    pub fn new() -> SearchBuilder {
        SearchBuilder::with_skip(SkipSet::default())
    }

    pub fn with_skip(skip: SkipSet) -> SearchBuilder {
        SearchBuilder {
            trie: Trie::new(),
            skip,
            pending: Vec::new(),
        }
    }

    /// Insert one term. Code points present in the skip set are dropped
    /// first; a term that strips to nothing is ignored. Duplicates are
    /// idempotent.
    pub fn insert(&mut self, term: &str) -> &mut SearchBuilder {
        let skip = &self.skip;
        let word: String = term.chars().filter(|&c| !skip.contains(c)).collect();
        if !word.is_empty() {
            self.trie.insert(&word);
        }
        self
    }

    /// Insert every term in `words`.
    pub fn insert_words<I>(&mut self, words: I) -> &mut SearchBuilder
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for word in words {
            self.insert(word.as_ref());
        }
        self
    }

    /// Split `buf` on the byte `sep` and insert each non-empty chunk.
    /// Separators are ASCII by contract so they cannot land inside a
    /// multibyte sequence; chunks with invalid UTF-8 are decoded lossily.
    pub fn insert_bytes(&mut self, buf: &[u8], sep: u8) -> &mut SearchBuilder {
        debug_assert!(sep.is_ascii(), "separator must be ASCII");
        for chunk in buf.split(move |&b| b == sep) {
            if !chunk.is_empty() {
                self.insert(&String::from_utf8_lossy(chunk));
            }
        }
        self
    }

    /// Ingest `sep`-delimited terms from `reader`, using `workbuf` as the
    /// reusable read buffer. Terms may straddle reads; the final chunk is
    /// inserted even without a trailing separator. I/O errors propagate and
    /// leave already-inserted terms in place. Returns the number of terms
    /// newly inserted.
    pub fn insert_reader<R: io::Read>(
        &mut self,
        mut reader: R,
        workbuf: &mut [u8],
        sep: u8,
    ) -> Result<usize, Error> {
        debug_assert!(sep.is_ascii(), "separator must be ASCII");
        debug_assert!(!workbuf.is_empty());
        let before = self.trie.len();
        let mut carry: Vec<u8> = Vec::new();
        loop {
            let n = match reader.read(workbuf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let mut rest = &workbuf[..n];
            while let Some(pos) = rest.iter().position(|&b| b == sep) {
                carry.extend_from_slice(&rest[..pos]);
                self.flush_chunk(&mut carry);
                rest = &rest[pos + 1..];
            }
            carry.extend_from_slice(rest);
        }
        self.flush_chunk(&mut carry);
        Ok(self.trie.len() - before)
    }

    fn flush_chunk(&mut self, chunk: &mut Vec<u8>) {
        if !chunk.is_empty() {
            self.insert(&String::from_utf8_lossy(chunk));
            chunk.clear();
        }
    }

    /// Number of terms inserted so far.
    pub fn size(&self) -> usize {
        self.trie.len()
    }

    pub fn skip(&self) -> &SkipSet {
        &self.skip
    }

    /// Compile failure and dictionary links and freeze the dictionary. Any
    /// bytes still pending from `io::Write` ingestion are committed first.
    pub fn build(mut self) -> Search {
        let mut pending = std::mem::take(&mut self.pending);
        self.flush_chunk(&mut pending);
        self.trie.compile();
        debug!(
            "compiled dictionary: {} terms, {} trie nodes",
            self.trie.len(),
            self.trie.node_count()
        );
        Search::new(self.trie, self.skip)
    }
}

impl Default for SearchBuilder {
    fn default() -> SearchBuilder {
        SearchBuilder::new()
    }
}

/// Newline-delimited ingestion, so a dictionary stream can be piped straight
/// into the builder with `io::copy`. Partial trailing lines carry across
/// calls; `flush` (or `build`) commits the remainder.
impl io::Write for SearchBuilder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let mut line = std::mem::take(&mut self.pending);
            line.extend_from_slice(&rest[..pos]);
            self.flush_chunk(&mut line);
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut pending = std::mem::take(&mut self.pending);
        self.flush_chunk(&mut pending);
        Ok(())
    }
}
