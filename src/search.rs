use crate::decode::decode;
use crate::sink::{CountSink, ListSink, MatchSink};
use crate::skip::SkipSet;
use crate::trie::{Trie, NONE, ROOT};
use crate::Match;

/// A compiled, immutable matching engine.
///
/// Built by [`SearchBuilder::build`](crate::SearchBuilder::build). Every
/// operation here is a read-only traversal, so a `Search` can be shared
/// across threads and driven by any number of concurrent scans.
pub struct Search {
    trie: Trie,
    skip: SkipSet,
}

impl Search {
    pub(crate) fn new(trie: Trie, skip: SkipSet) -> Search {
        Search { trie, skip }
    }

    /// Find every match in `input`, in ascending start order.
    pub fn find<'t, 'i>(&'t self, input: &'i [u8]) -> Vec<Match<'t, 'i>> {
        let mut sink = ListSink::new();
        self.find_into(input, &mut sink);
        sink.into_vec()
    }

    /// Scan `input`, emitting each match into `sink`.
    ///
    /// This is the canonical restart-on-miss scan. At each start position the
    /// candidate walk extends greedily, decoding one code point at a time and
    /// stepping over skip code points between (never before) candidate
    /// characters. The longest terminal seen during the walk wins; when
    /// extension fails it is emitted and scanning resumes just past the last
    /// consumed code point, so emitted matches never overlap. A walk that
    /// never reached a terminal restarts one byte after its origin.
    pub fn find_into<'t, 'i, S>(&'t self, input: &'i [u8], sink: &mut S)
    where
        S: MatchSink<'t, 'i>,
    {
        let n = input.len();
        let mut i = 0;
        'scan: while i < n {
            let (v, l) = match decode(&input[i..]) {
                Some(first) => first,
                None => break,
            };
            let mut node = match self.trie.child(ROOT, v) {
                Some(id) => id,
                None => {
                    i += l;
                    continue;
                }
            };
            let mut j = i;
            let mut len = l;
            let mut last: Option<Match<'t, 'i>> = None;
            loop {
                if let Some(term) = self.trie.term(node) {
                    last = Some(Match::new(term, &input[i..j + len], i, j + len));
                }
                j += len;
                // Transparent code points between candidate characters.
                let mut next = decode(&input[j..]);
                while let Some((c, cl)) = next {
                    if !self.skip.contains(c) {
                        break;
                    }
                    j += cl;
                    next = decode(&input[j..]);
                }
                let step = next.and_then(|(c, cl)| {
                    self.trie.child(node, c).map(|child| (child, cl))
                });
                match step {
                    Some((child, cl)) => {
                        node = child;
                        len = cl;
                    }
                    None => {
                        match last.take() {
                            Some(m) => {
                                if sink.write(m) {
                                    return;
                                }
                                i = j;
                            }
                            None => i += 1,
                        }
                        continue 'scan;
                    }
                }
            }
        }
    }

    /// Whether `input` contains at least one match. Stops at the first hit.
    pub fn has_sens(&self, input: &[u8]) -> bool {
        let mut sink = CountSink::with_limit(1);
        self.find_into(input, &mut sink);
        !MatchSink::is_empty(&sink)
    }

    /// A copy of `input` with every byte inside a matched span overwritten by
    /// `fill`. Byte length is preserved; spans of equal-start matches union.
    pub fn replace(&self, input: &[u8], fill: u8) -> Vec<u8> {
        let mut out = input.to_vec();
        let mut sink = FillSink {
            out: &mut out,
            fill,
            count: 0,
        };
        self.find_into(input, &mut sink);
        out
    }

    /// A copy of `input` with every matched span replaced by `fill` repeated
    /// once per code point of the *term*. The matched span may be longer than
    /// the term because of skips, so this does not preserve byte length.
    pub fn replace_char(&self, input: &[u8], fill: char) -> Vec<u8> {
        let mut enc = [0u8; 4];
        let mut sink = SpliceSink {
            input,
            out: Vec::with_capacity(input.len()),
            tail: 0,
            fill: fill.encode_utf8(&mut enc).as_bytes(),
            count: 0,
        };
        self.find_into(input, &mut sink);
        let SpliceSink {
            input, mut out, tail, ..
        } = sink;
        out.extend_from_slice(&input[tail..]);
        out
    }

    /// Aho-Corasick traversal over the compiled failure links, reporting
    /// *every* dictionary term ending at each position, overlaps included.
    ///
    /// This is a strict superset of [`find`](Search::find): the canonical
    /// scan reports at most one (longest) match per start position, while
    /// this reports all dictionary suffixes. Skip code points are transparent
    /// exactly as in the canonical scan. On dictionaries where no term
    /// occurs inside another's matched span the two agree.
    pub fn find_all<'t, 'i>(&'t self, input: &'i [u8]) -> Vec<Match<'t, 'i>> {
        let mut sink = ListSink::new();
        self.find_all_into(input, &mut sink);
        sink.into_vec()
    }

    /// Generic form of [`find_all`](Search::find_all).
    pub fn find_all_into<'t, 'i, S>(&'t self, input: &'i [u8], sink: &mut S)
    where
        S: MatchSink<'t, 'i>,
    {
        // Byte offset of every code point fed to the automaton. The last
        // depth(node) entries always spell the path to the current node, so
        // a terminal of depth d starts at fed[fed.len() - d].
        let mut fed: Vec<usize> = Vec::new();
        let mut node = ROOT;
        let mut i = 0;
        while let Some((c, l)) = decode(&input[i..]) {
            if node != ROOT && self.skip.contains(c) {
                i += l;
                continue;
            }
            loop {
                if let Some(next) = self.trie.child(node, c) {
                    node = next;
                    break;
                }
                if node == ROOT {
                    break;
                }
                node = self.trie.fail(node);
            }
            fed.push(i);
            let end = i + l;
            let mut t = if self.trie.term(node).is_some() {
                node
            } else {
                self.trie.dict_link(node)
            };
            while t != NONE {
                if let Some(term) = self.trie.term(t) {
                    let depth = self.trie.depth(t) as usize;
                    let start = fed[fed.len() - depth];
                    let m = Match::new(term, &input[start..end], start, end);
                    if sink.write(m) {
                        return;
                    }
                }
                t = self.trie.dict_link(t);
            }
            i += l;
        }
    }

    /// Number of dictionary terms.
    pub fn size(&self) -> usize {
        self.trie.len()
    }

    /// All dictionary terms, in a deterministic (but unspecified) order.
    pub fn terms(&self) -> Vec<&str> {
        self.trie.terms()
    }

    pub fn skip(&self) -> &SkipSet {
        &self.skip
    }
}

/// Overwrites matched spans in a pre-copied output buffer.
struct FillSink<'o> {
    out: &'o mut Vec<u8>,
    fill: u8,
    count: usize,
}

impl<'t, 'i, 'o> MatchSink<'t, 'i> for FillSink<'o> {
    fn write(&mut self, m: Match<'t, 'i>) -> bool {
        for b in &mut self.out[m.start()..m.end()] {
            *b = self.fill;
        }
        self.count += 1;
        false
    }

    fn len(&self) -> usize {
        self.count
    }
}

/// Rebuilds the output as gap bytes plus one fill character per term code
/// point. Matches arrive non-overlapping in ascending order, so `tail` only
/// moves forward.
struct SpliceSink<'i, 'f> {
    input: &'i [u8],
    out: Vec<u8>,
    tail: usize,
    fill: &'f [u8],
    count: usize,
}

impl<'t, 'i, 'f> MatchSink<'t, 'i> for SpliceSink<'i, 'f> {
    fn write(&mut self, m: Match<'t, 'i>) -> bool {
        if m.start() > self.tail {
            self.out.extend_from_slice(&self.input[self.tail..m.start()]);
        }
        for _ in 0..m.word().chars().count() {
            self.out.extend_from_slice(self.fill);
        }
        self.tail = self.tail.max(m.end());
        self.count += 1;
        false
    }

    fn len(&self) -> usize {
        self.count
    }
}
