//! Mapping between per-segment ordinals and a global ordinal space.
//!
//! The global dictionary is the sorted, deduplicated union of every
//! segment's dictionary. It is never materialised: for each global ordinal
//! the map remembers the first segment holding the value and the value's
//! ordinal there, so the value itself is always read back from a segment.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;

use crate::error::{DocTermsError, Result};
use crate::lexical::doc_values::OrdinalDictionary;

/// Segment ordinal -> global ordinal for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SegmentOrds {
    /// Segment ordinals equal global ordinals.
    Identity(u64),
    Mapped(Vec<u64>),
}

impl SegmentOrds {
    fn get(&self, segment_ord: u64) -> Option<u64> {
        match self {
            SegmentOrds::Identity(count) => (segment_ord < *count).then_some(segment_ord),
            SegmentOrds::Mapped(ords) => ords.get(segment_ord as usize).copied(),
        }
    }
}

/// Maps per-segment ordinals to and from the global ordinal space.
#[derive(Debug, Clone)]
pub struct OrdinalMap {
    /// global ord -> first segment containing the value.
    first_segments: Vec<u32>,
    /// global ord -> global ord minus the ordinal in the first segment.
    global_ord_deltas: Vec<u64>,
    /// per segment, segment ord -> global ord.
    segment_to_global: Vec<SegmentOrds>,
}

impl OrdinalMap {
    /// Merge segment dictionaries, in segment order.
    pub fn build<D: OrdinalDictionary>(dictionaries: &[D]) -> Result<Self> {
        let mut heap: BinaryHeap<Reverse<(&[u8], usize)>> = BinaryHeap::new();
        let mut positions = vec![0u64; dictionaries.len()];
        let mut segment_ords: Vec<Vec<u64>> = dictionaries
            .iter()
            .map(|d| Vec::with_capacity(d.value_count() as usize))
            .collect();

        for (segment, dictionary) in dictionaries.iter().enumerate() {
            if dictionary.value_count() > 0 {
                heap.push(Reverse((dictionary.lookup_ord(0)?, segment)));
            }
        }

        let mut first_segments = Vec::new();
        let mut global_ord_deltas = Vec::new();
        let mut global_ord = 0u64;

        // Ties pop in segment order, so the first pop of a value is its first segment.
        while let Some(Reverse((term, segment))) = heap.pop() {
            first_segments.push(segment as u32);
            global_ord_deltas.push(global_ord - positions[segment]);
            Self::advance(dictionaries, &mut heap, &mut positions, &mut segment_ords, segment, global_ord)?;

            loop {
                match heap.peek() {
                    Some(Reverse((next, _))) if *next == term => {}
                    _ => break,
                }
                if let Some(Reverse((_, other))) = heap.pop() {
                    Self::advance(dictionaries, &mut heap, &mut positions, &mut segment_ords, other, global_ord)?;
                }
            }

            global_ord += 1;
        }

        let segment_to_global = segment_ords
            .into_iter()
            .map(|ords| {
                let identity = ords.iter().enumerate().all(|(i, g)| i as u64 == *g);
                if identity {
                    SegmentOrds::Identity(ords.len() as u64)
                } else {
                    SegmentOrds::Mapped(ords)
                }
            })
            .collect();

        debug!(
            "Built ordinal map over {} segments with {} global values",
            dictionaries.len(),
            global_ord
        );

        Ok(OrdinalMap {
            first_segments,
            global_ord_deltas,
            segment_to_global,
        })
    }

    /// Record `global_ord` for the current value of `segment` and queue its next value.
    fn advance<'a, D: OrdinalDictionary>(
        dictionaries: &'a [D],
        heap: &mut BinaryHeap<Reverse<(&'a [u8], usize)>>,
        positions: &mut [u64],
        segment_ords: &mut [Vec<u64>],
        segment: usize,
        global_ord: u64,
    ) -> Result<()> {
        segment_ords[segment].push(global_ord);
        positions[segment] += 1;

        let dictionary = &dictionaries[segment];
        if positions[segment] < dictionary.value_count() {
            heap.push(Reverse((dictionary.lookup_ord(positions[segment])?, segment)));
        }
        Ok(())
    }

    /// Number of distinct values across all segments.
    pub fn value_count(&self) -> u64 {
        self.first_segments.len() as u64
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segment_to_global.len()
    }

    /// The first segment holding a global ordinal's value.
    pub fn first_segment(&self, global_ord: u64) -> Result<usize> {
        self.first_segments
            .get(global_ord as usize)
            .map(|segment| *segment as usize)
            .ok_or_else(|| self.out_of_range(global_ord))
    }

    /// The value's ordinal within its first segment.
    pub fn first_segment_ord(&self, global_ord: u64) -> Result<u64> {
        self.global_ord_deltas
            .get(global_ord as usize)
            .map(|delta| global_ord - delta)
            .ok_or_else(|| self.out_of_range(global_ord))
    }

    /// Translate a segment ordinal to a global ordinal.
    pub fn global_ord(&self, segment: usize, segment_ord: u64) -> Result<u64> {
        self.segment_to_global
            .get(segment)
            .and_then(|ords| ords.get(segment_ord))
            .ok_or_else(|| {
                DocTermsError::index(format!(
                    "No global ordinal for ordinal {segment_ord} of segment {segment}"
                ))
            })
    }

    fn out_of_range(&self, global_ord: u64) -> DocTermsError {
        DocTermsError::index(format!(
            "Global ordinal {global_ord} out of range (value count {})",
            self.value_count()
        ))
    }
}
