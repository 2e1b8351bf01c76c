//! Resolution of query terms to dictionary ordinals.

use bit_vec::BitVec;
use log::debug;

use crate::error::Result;
use crate::lexical::doc_values::{OrdinalDictionary, TermLookup};
use crate::util::bits::next_set_bit;
use crate::util::bytes::SortedTermSet;

/// Ordinals of a dictionary that hold one of the query terms.
///
/// Built once per query execution and only read afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedOrdinals {
    bits: BitVec,
    matched: usize,
}

impl ResolvedOrdinals {
    /// Look every term up in `dictionary`.
    ///
    /// Terms are probed in ascending order, and each binary search only
    /// covers the dictionary suffix starting at the previous hit or insertion
    /// point. Terms absent from the dictionary are ignored.
    pub fn resolve<D: OrdinalDictionary + ?Sized>(
        dictionary: &D,
        terms: &SortedTermSet,
    ) -> Result<Self> {
        let value_count = dictionary.value_count();
        let mut bits = BitVec::from_elem(value_count as usize, false);
        let mut matched = 0;
        let mut low = 0;

        for term in terms {
            if low >= value_count {
                break;
            }
            match dictionary.lookup_term_from(term.as_bytes(), low)? {
                TermLookup::Found(ord) => {
                    if !bits[ord as usize] {
                        bits.set(ord as usize, true);
                        matched += 1;
                    }
                    low = ord;
                }
                TermLookup::NotFound { insertion_point } => low = insertion_point,
            }
        }

        debug!(
            "Resolved {} terms to {} of {} ordinals",
            terms.len(),
            matched,
            value_count
        );

        Ok(ResolvedOrdinals { bits, matched })
    }

    /// Whether any query term exists in the dictionary.
    pub fn matches_at_least_one_term(&self) -> bool {
        self.matched > 0
    }

    /// Whether `ord` holds a query term.
    pub fn contains(&self, ord: u64) -> bool {
        self.bits.get(ord as usize).unwrap_or(false)
    }

    /// Number of distinct matched ordinals.
    pub fn matched_count(&self) -> usize {
        self.matched
    }

    /// Size of the dictionary the terms were resolved against.
    pub fn value_count(&self) -> u64 {
        self.bits.len() as u64
    }

    /// Matched ordinals in ascending order.
    pub fn ordinals(&self) -> impl Iterator<Item = u64> + '_ {
        std::iter::successors(next_set_bit(&self.bits, 0), move |ord| {
            next_set_bit(&self.bits, ord + 1)
        })
        .map(|ord| ord as u64)
    }
}
