//! Two-phase iteration.
//!
//! A [`TwoPhaseIterator`] splits matching into a cheap approximation that
//! may return false positives and a [`TwoPhaseIterator::matches`] check that
//! confirms the approximation's current document. [`TwoPhaseMatcher`] turns
//! one into a plain [`Matcher`].

use std::fmt::Debug;

use crate::error::Result;
use crate::query::matcher::{Matcher, NO_MORE_DOCS};

/// Approximate-then-confirm matching.
pub trait TwoPhaseIterator: Send + Debug {
    /// The approximation. It may return documents that do not match, but
    /// never skips one that does.
    fn approximation(&mut self) -> &mut dyn Matcher;

    /// Confirm the approximation's current document.
    ///
    /// Called at most once per document.
    fn matches(&mut self) -> Result<bool>;

    /// Estimated cost of one [`TwoPhaseIterator::matches`] call.
    fn match_cost(&self) -> f32;
}

/// Adapts a [`TwoPhaseIterator`] to the [`Matcher`] interface.
#[derive(Debug)]
pub struct TwoPhaseMatcher<T: TwoPhaseIterator> {
    inner: T,
    doc: u64,
    started: bool,
    exhausted: bool,
    cost: u64,
}

impl<T: TwoPhaseIterator> TwoPhaseMatcher<T> {
    pub fn new(mut inner: T) -> Self {
        let cost = inner.approximation().cost();
        TwoPhaseMatcher {
            inner,
            doc: NO_MORE_DOCS,
            started: false,
            exhausted: false,
            cost,
        }
    }

    /// The wrapped iterator.
    pub fn two_phase(&self) -> &T {
        &self.inner
    }

    /// Confirm the approximation's current document, moving forward until a
    /// confirmed match or exhaustion.
    fn confirm(&mut self, mut found: bool) -> Result<bool> {
        while found {
            if self.inner.matches()? {
                self.doc = self.inner.approximation().doc_id();
                return Ok(true);
            }
            found = self.inner.approximation().next()?;
        }
        self.exhausted = true;
        self.doc = NO_MORE_DOCS;
        Ok(false)
    }
}

impl<T: TwoPhaseIterator> Matcher for TwoPhaseMatcher<T> {
    fn doc_id(&self) -> u64 {
        self.doc
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.started = true;
        let found = self.inner.approximation().next()?;
        self.confirm(found)
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if self.started && self.doc >= target {
            return Ok(true);
        }
        self.started = true;
        let found = self.inner.approximation().skip_to(target)?;
        self.confirm(found)
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
