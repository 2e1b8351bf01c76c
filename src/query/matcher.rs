//! Matcher implementations for query execution.
//!
//! Matchers start positioned before their first document: call
//! [`Matcher::next`] or [`Matcher::skip_to`] before reading
//! [`Matcher::doc_id`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::sync::Arc;

use bit_vec::BitVec;

use crate::error::Result;
use crate::util::bits::{cardinality, next_set_bit};

/// Doc id reported by an exhausted matcher.
pub const NO_MORE_DOCS: u64 = u64::MAX;

/// Trait for document matchers.
pub trait Matcher: Send + Debug {
    /// Get the current document ID.
    fn doc_id(&self) -> u64;

    /// Move to the next matching document.
    fn next(&mut self) -> Result<bool>;

    /// Skip to the first document >= target. Never moves backwards.
    fn skip_to(&mut self, target: u64) -> Result<bool>;

    /// Get the cost of iterating through this matcher.
    fn cost(&self) -> u64;

    /// Check if this matcher is exhausted.
    fn is_exhausted(&self) -> bool;
}

/// A matcher that matches no documents.
#[derive(Debug, Default)]
pub struct EmptyMatcher;

impl EmptyMatcher {
    /// Create a new empty matcher.
    pub fn new() -> Self {
        EmptyMatcher
    }
}

impl Matcher for EmptyMatcher {
    fn doc_id(&self) -> u64 {
        NO_MORE_DOCS
    }

    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn skip_to(&mut self, _target: u64) -> Result<bool> {
        Ok(false)
    }

    fn cost(&self) -> u64 {
        0
    }

    fn is_exhausted(&self) -> bool {
        true
    }
}

/// A matcher over a sorted posting list of segment-local doc ids.
#[derive(Debug)]
pub struct PostingMatcher {
    docs: Arc<[u64]>,
    doc_base: u64,
    /// Index of the current posting; `None` before the first call.
    position: Option<usize>,
}

impl PostingMatcher {
    /// Create a new posting matcher reporting `doc_base + local` ids.
    pub fn new(docs: Arc<[u64]>, doc_base: u64) -> Self {
        PostingMatcher {
            docs,
            doc_base,
            position: None,
        }
    }
}

impl Matcher for PostingMatcher {
    fn doc_id(&self) -> u64 {
        match self.position {
            Some(pos) if pos < self.docs.len() => self.doc_base + self.docs[pos],
            _ => NO_MORE_DOCS,
        }
    }

    fn next(&mut self) -> Result<bool> {
        let next = match self.position {
            None => 0,
            Some(pos) if pos < self.docs.len() => pos + 1,
            Some(_) => return Ok(false),
        };
        self.position = Some(next);
        Ok(next < self.docs.len())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        let start = self.position.unwrap_or(0);
        if start >= self.docs.len() {
            self.position = Some(self.docs.len());
            return Ok(false);
        }
        let local = target.saturating_sub(self.doc_base);
        let offset = self.docs[start..].partition_point(|doc| *doc < local);
        self.position = Some(start + offset);
        Ok(start + offset < self.docs.len())
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }

    fn is_exhausted(&self) -> bool {
        matches!(self.position, Some(pos) if pos >= self.docs.len())
    }
}

/// A matcher over a per-segment bitset of local doc ids.
#[derive(Debug)]
pub struct BitSetMatcher {
    bits: BitVec,
    doc_base: u64,
    current: Option<usize>,
    started: bool,
    cost: u64,
}

impl BitSetMatcher {
    /// Create a new bitset matcher reporting `doc_base + local` ids.
    pub fn new(bits: BitVec, doc_base: u64) -> Self {
        let cost = cardinality(&bits) as u64;
        BitSetMatcher {
            bits,
            doc_base,
            current: None,
            started: false,
            cost,
        }
    }
}

impl Matcher for BitSetMatcher {
    fn doc_id(&self) -> u64 {
        match self.current {
            Some(doc) => self.doc_base + doc as u64,
            None => NO_MORE_DOCS,
        }
    }

    fn next(&mut self) -> Result<bool> {
        let from = match (self.started, self.current) {
            (false, _) => 0,
            (true, Some(doc)) => doc + 1,
            (true, None) => return Ok(false),
        };
        self.started = true;
        self.current = next_set_bit(&self.bits, from);
        Ok(self.current.is_some())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.started {
            match self.current {
                None => return Ok(false),
                Some(doc) if self.doc_base + doc as u64 >= target => return Ok(true),
                Some(_) => {}
            }
        }
        self.started = true;
        let from = target.saturating_sub(self.doc_base) as usize;
        self.current = next_set_bit(&self.bits, from);
        Ok(self.current.is_some())
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn is_exhausted(&self) -> bool {
        self.started && self.current.is_none()
    }
}

/// A helper struct for tracking matchers in the disjunction heap.
#[derive(Debug)]
struct MatcherEntry {
    matcher: Box<dyn Matcher>,
}

impl PartialEq for MatcherEntry {
    fn eq(&self, other: &Self) -> bool {
        self.matcher.doc_id() == other.matcher.doc_id()
    }
}

impl Eq for MatcherEntry {}

impl PartialOrd for MatcherEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatcherEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower doc IDs come first
        other.matcher.doc_id().cmp(&self.matcher.doc_id())
    }
}

/// A matcher that implements disjunction (OR) of multiple matchers.
#[derive(Debug)]
pub struct DisjunctionMatcher {
    /// Sub-matchers not yet positioned.
    pending: Vec<Box<dyn Matcher>>,
    /// Min-heap of positioned matchers, ordered by current doc_id.
    heap: BinaryHeap<MatcherEntry>,
    current_doc: u64,
    started: bool,
    exhausted: bool,
    cost: u64,
}

impl DisjunctionMatcher {
    /// Create a new disjunction matcher from multiple matchers.
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        let cost = matchers.iter().map(|m| m.cost()).sum();
        DisjunctionMatcher {
            pending: matchers,
            heap: BinaryHeap::new(),
            current_doc: NO_MORE_DOCS,
            started: false,
            exhausted: false,
            cost,
        }
    }

    /// Position every sub-matcher on its first document >= target.
    fn start(&mut self, target: u64) -> Result<()> {
        self.started = true;
        for mut matcher in self.pending.drain(..) {
            if matcher.skip_to(target)? {
                self.heap.push(MatcherEntry { matcher });
            }
        }
        self.update_current();
        Ok(())
    }

    fn update_current(&mut self) {
        match self.heap.peek() {
            Some(entry) => self.current_doc = entry.matcher.doc_id(),
            None => {
                self.current_doc = NO_MORE_DOCS;
                self.exhausted = true;
            }
        }
    }

    /// Advance to the next document, skipping duplicates.
    fn advance_to_next_doc(&mut self) -> Result<()> {
        let current_doc = self.current_doc;

        // Advance all matchers that are at the current document
        let mut matchers_to_reinsert = Vec::new();
        while self
            .heap
            .peek()
            .is_some_and(|entry| entry.matcher.doc_id() == current_doc)
        {
            if let Some(mut entry) = self.heap.pop() {
                if entry.matcher.next()? {
                    matchers_to_reinsert.push(entry);
                }
            }
        }

        self.heap.extend(matchers_to_reinsert);
        self.update_current();
        Ok(())
    }
}

impl Matcher for DisjunctionMatcher {
    fn doc_id(&self) -> u64 {
        self.current_doc
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if !self.started {
            self.start(0)?;
        } else {
            self.advance_to_next_doc()?;
        }
        Ok(!self.exhausted)
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if !self.started {
            self.start(target)?;
            return Ok(!self.exhausted);
        }
        if target <= self.current_doc {
            return Ok(true);
        }

        // Skip all matchers to target or beyond
        let mut matchers_to_reinsert = Vec::new();
        while let Some(mut entry) = self.heap.pop() {
            if entry.matcher.skip_to(target)? {
                matchers_to_reinsert.push(entry);
            }
        }

        self.heap.extend(matchers_to_reinsert);
        self.update_current();
        Ok(!self.exhausted)
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
