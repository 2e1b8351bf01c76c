//! Automaton-union query.
//!
//! The query keys are compiled into a minimal acyclic automaton (an
//! `fst::Set`), which is intersected with each segment's term dictionary.

use std::sync::Arc;

use bit_vec::BitVec;
use fst::raw::CompiledAddr;
use fst::{Automaton, Set};

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{BitSetMatcher, Matcher};
use crate::query::query::{Query, Weight};
use crate::util::bytes::SortedTermSet;

/// Automaton accepting exactly a set of keys.
#[derive(Debug)]
pub struct UnionAutomaton {
    set: Set<Vec<u8>>,
}

impl UnionAutomaton {
    /// Compile sorted, deduplicated keys.
    pub fn new(terms: &SortedTermSet) -> Result<Self> {
        let set = Set::from_iter(terms.iter().map(|t| t.as_bytes()))?;
        Ok(UnionAutomaton { set })
    }

    /// Number of accepted keys.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Automaton for UnionAutomaton {
    type State = Option<CompiledAddr>;

    fn start(&self) -> Self::State {
        Some(self.set.as_fst().root().addr())
    }

    fn is_match(&self, state: &Self::State) -> bool {
        state.is_some_and(|addr| self.set.as_fst().node(addr).is_final())
    }

    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        let node = self.set.as_fst().node((*state)?);
        node.find_input(byte).map(|i| node.transition(i).addr)
    }
}

/// Matches documents holding any term accepted by a [`UnionAutomaton`].
#[derive(Debug, Clone)]
pub struct AutomatonQuery {
    field: String,
    automaton: Arc<UnionAutomaton>,
}

impl AutomatonQuery {
    /// Build the query; `terms` is already sorted as automaton construction requires.
    pub fn new<F: Into<String>>(field: F, terms: &SortedTermSet) -> Result<Self> {
        Ok(AutomatonQuery {
            field: field.into(),
            automaton: Arc::new(UnionAutomaton::new(terms)?),
        })
    }

    pub fn automaton(&self) -> &UnionAutomaton {
        &self.automaton
    }
}

impl Query for AutomatonQuery {
    fn create_weight(&self, _reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(AutomatonWeight {
            field: self.field.clone(),
            automaton: Arc::clone(&self.automaton),
        }))
    }

    fn description(&self) -> String {
        format!("{}:<automaton of {} terms>", self.field, self.automaton.len())
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

#[derive(Debug)]
struct AutomatonWeight {
    field: String,
    automaton: Arc<UnionAutomaton>,
}

impl Weight for AutomatonWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        if self.automaton.is_empty() {
            return Ok(None);
        }
        let Some(dictionary) = leaf.segment.term_dictionary(&self.field) else {
            return Ok(None);
        };

        let hits = dictionary.search(self.automaton.as_ref());
        if hits.is_empty() {
            return Ok(None);
        }

        let mut docs = BitVec::from_elem(leaf.max_doc() as usize, false);
        for postings in hits {
            for doc in postings.iter() {
                docs.set(*doc as usize, true);
            }
        }
        Ok(Some(Box::new(BitSetMatcher::new(docs, leaf.doc_base))))
    }
}
