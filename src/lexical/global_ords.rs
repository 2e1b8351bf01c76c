//! Global ordinal view over a field.
//!
//! [`GlobalOrdinalView`] exposes the merged dictionary of a field across all
//! segments of a reader, plus per-document iteration in global doc ids and
//! global ordinals.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use crate::error::{DocTermsError, Result};
use crate::lexical::doc_values::{
    OrdinalDictionary, SortedSetColumn, SortedSetColumnIter, SortedSetDocValues,
};
use crate::lexical::ordinal_map::OrdinalMap;
use crate::lexical::reader::IndexReader;
use crate::lexical::segment::SegmentTable;
use crate::query::matcher::{Matcher, NO_MORE_DOCS};

#[derive(Debug)]
struct Shared {
    columns: Vec<Arc<SortedSetColumn>>,
    table: SegmentTable,
    ordinal_map: OrdinalMap,
}

/// Merged sorted-set doc values of one field over a whole reader.
#[derive(Debug)]
pub struct GlobalOrdinalView {
    field: String,
    shared: Arc<Shared>,
    iterators_created: AtomicUsize,
}

impl GlobalOrdinalView {
    /// Merge the doc-values columns of `field` over every segment of `reader`.
    ///
    /// Segments without values for the field contribute empty columns; a
    /// field absent from the whole index yields a view with no values.
    pub fn open(reader: &IndexReader, field: &str) -> Result<Self> {
        let columns: Vec<Arc<SortedSetColumn>> = reader
            .segments()
            .iter()
            .map(|segment| segment.sorted_set(field))
            .collect();
        let ordinal_map = OrdinalMap::build(&columns)?;

        Ok(GlobalOrdinalView {
            field: field.to_string(),
            shared: Arc::new(Shared {
                columns,
                table: reader.segment_table().clone(),
                ordinal_map,
            }),
            iterators_created: AtomicUsize::new(0),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn segment_table(&self) -> &SegmentTable {
        &self.shared.table
    }

    /// Create a per-document iterator positioned before the first document.
    pub fn iterator(&self) -> GlobalOrdinalIter {
        self.iterators_created.fetch_add(1, Ordering::Relaxed);
        trace!("Creating global ordinal iterator for field '{}'", self.field);
        GlobalOrdinalIter {
            shared: Arc::clone(&self.shared),
            segment: 0,
            current: None,
            doc: 0,
            started: false,
            exhausted: false,
        }
    }

    /// Number of iterators created through [`GlobalOrdinalView::iterator`].
    pub fn iterators_created(&self) -> usize {
        self.iterators_created.load(Ordering::Relaxed)
    }
}

impl OrdinalDictionary for GlobalOrdinalView {
    fn value_count(&self) -> u64 {
        self.shared.ordinal_map.value_count()
    }

    fn lookup_ord(&self, ord: u64) -> Result<&[u8]> {
        let map = &self.shared.ordinal_map;
        let segment = map.first_segment(ord)?;
        let segment_ord = map.first_segment_ord(ord)?;
        self.shared
            .columns
            .get(segment)
            .ok_or_else(|| DocTermsError::index(format!("Segment {segment} out of range")))?
            .lookup_ord(segment_ord)
    }
}

/// Forward-only iterator over every document of the index that holds a
/// value, reporting global doc ids and global ordinals.
#[derive(Debug)]
pub struct GlobalOrdinalIter {
    shared: Arc<Shared>,
    segment: usize,
    current: Option<SortedSetColumnIter>,
    doc: u64,
    started: bool,
    exhausted: bool,
}

impl GlobalOrdinalIter {
    fn exhaust(&mut self) -> bool {
        self.exhausted = true;
        self.current = None;
        self.doc = NO_MORE_DOCS;
        false
    }

    /// Position on the first document with values, starting in `segment` at
    /// local doc `local_target` (or after the current document when `None`).
    fn seek(&mut self, mut segment: usize, mut local_target: Option<u64>) -> Result<bool> {
        loop {
            if segment >= self.shared.columns.len() {
                return Ok(self.exhaust());
            }
            if self.segment != segment || self.current.is_none() {
                self.segment = segment;
                self.current = Some(self.shared.columns[segment].iter());
            }

            let iter = self
                .current
                .as_mut()
                .ok_or_else(|| DocTermsError::internal("segment iterator missing"))?;
            let found = match local_target.take() {
                Some(target) => iter.skip_to(target)?,
                None => iter.next()?,
            };
            if found {
                self.doc = self.shared.table.doc_base(segment) + iter.doc_id();
                return Ok(true);
            }

            segment += 1;
        }
    }
}

impl Matcher for GlobalOrdinalIter {
    fn doc_id(&self) -> u64 {
        if self.exhausted { NO_MORE_DOCS } else { self.doc }
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.started = true;
        self.seek(self.segment, None)
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if self.started && self.doc >= target {
            return Ok(true);
        }
        self.started = true;

        let Some(segment) = self.shared.table.segment_for(target) else {
            return Ok(self.exhaust());
        };
        let local = target - self.shared.table.doc_base(segment);
        self.seek(segment.max(self.segment), Some(local))
    }

    fn cost(&self) -> u64 {
        self.shared.columns.iter().map(|c| c.docs_with_values()).sum()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl SortedSetDocValues for GlobalOrdinalIter {
    fn next_ord(&mut self) -> Result<Option<u64>> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(iter) = self.current.as_mut() else {
            return Ok(None);
        };
        match iter.next_ord()? {
            Some(local) => Ok(Some(self.shared.ordinal_map.global_ord(self.segment, local)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::lexical::writer::IndexWriter;
    use crate::schema::{FieldDefinition, FieldType, Schema};

    fn reader() -> IndexReader {
        let schema = Arc::new(
            Schema::new()
                .with_field("fruit", FieldDefinition::new(FieldType::String))
                .unwrap(),
        );
        let mut writer = IndexWriter::with_schema(schema);
        let doc = |values: &[&str]| Document::builder().add_all("fruit", values.iter().copied()).build();

        writer.add_document(doc(&["cherry", "apple"])).unwrap();
        writer.add_document(doc(&[])).unwrap();
        writer.flush().unwrap();
        writer.add_document(doc(&["banana"])).unwrap();
        writer.add_document(doc(&["date", "cherry"])).unwrap();
        writer.commit().unwrap()
    }

    #[test]
    fn test_merged_dictionary() {
        let view = GlobalOrdinalView::open(&reader(), "fruit").unwrap();

        assert_eq!(view.value_count(), 4);
        let values: Vec<&[u8]> = (0..4).map(|ord| view.lookup_ord(ord).unwrap()).collect();
        assert_eq!(values, vec![&b"apple"[..], b"banana", b"cherry", b"date"]);
        assert!(view.lookup_ord(4).is_err());
    }

    #[test]
    fn test_iterator_reports_global_ids_and_ords() {
        let view = GlobalOrdinalView::open(&reader(), "fruit").unwrap();
        let mut iter = view.iterator();
        let mut seen = Vec::new();

        while iter.next().unwrap() {
            let mut ords = Vec::new();
            while let Some(ord) = iter.next_ord().unwrap() {
                ords.push(ord);
            }
            seen.push((iter.doc_id(), ords));
        }

        assert_eq!(seen, vec![(0, vec![0, 2]), (2, vec![1]), (3, vec![2, 3])]);
        assert_eq!(iter.doc_id(), NO_MORE_DOCS);
        assert_eq!(view.iterators_created(), 1);
    }

    #[test]
    fn test_iterator_skip_across_segments() {
        let view = GlobalOrdinalView::open(&reader(), "fruit").unwrap();
        let mut iter = view.iterator();

        assert!(iter.skip_to(1).unwrap());
        assert_eq!(iter.doc_id(), 2);
        assert!(iter.skip_to(3).unwrap());
        assert_eq!(iter.next_ord().unwrap(), Some(2));
        assert!(!iter.skip_to(4).unwrap());
    }

    #[test]
    fn test_missing_field() {
        let view = GlobalOrdinalView::open(&reader(), "missing").unwrap();
        assert_eq!(view.value_count(), 0);
        let mut iter = view.iterator();
        assert!(!iter.next().unwrap());
    }
}
