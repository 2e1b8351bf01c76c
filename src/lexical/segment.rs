//! Immutable index segments and the segment table.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::document::Document;
use crate::error::{DocTermsError, Result};
use crate::lexical::doc_values::{SortedSetColumn, SortedSetColumnBuilder};
use crate::lexical::points::PointValues;
use crate::lexical::term_dict::TermDictionary;
use crate::query::matcher::NO_MORE_DOCS;
use crate::schema::{Schema, ValueEncoder};
use crate::util::bytes::BytesRef;

/// Per-field structures of a segment.
#[derive(Debug, Default)]
pub struct SegmentField {
    terms: Option<TermDictionary>,
    sorted_set: Option<Arc<SortedSetColumn>>,
    points: Option<PointValues>,
}

#[derive(Default)]
struct SegmentFieldBuilder {
    terms: BTreeMap<BytesRef, Vec<u64>>,
    sorted_set: Option<SortedSetColumnBuilder>,
    points: Option<Vec<(i64, u64)>>,
}

/// An immutable group of documents with segment-local doc ids `0..max_doc`.
#[derive(Debug)]
pub struct Segment {
    name: String,
    max_doc: u64,
    fields: AHashMap<String, SegmentField>,
}

impl Segment {
    /// Build a segment from documents; doc `i` of `docs` gets local id `i`.
    pub fn build<S: Into<String>>(name: S, schema: &Schema, docs: &[Document]) -> Result<Self> {
        let name = name.into();
        let max_doc = docs.len() as u64;
        let mut builders: AHashMap<String, SegmentFieldBuilder> = AHashMap::new();

        for (doc_id, doc) in docs.iter().enumerate() {
            let doc_id = doc_id as u64;
            for (field, values) in doc.fields() {
                let definition = schema
                    .get_field(field)
                    .ok_or_else(|| DocTermsError::schema(format!("Unknown field '{field}'")))?;
                if !definition.multi_valued && values.len() > 1 {
                    return Err(DocTermsError::schema(format!(
                        "Field '{field}' is single-valued but document {doc_id} has {} values",
                        values.len()
                    )));
                }

                let builder = builders.entry(field.to_string()).or_default();
                let field_type = definition.field_type;

                for value in values {
                    if field_type.is_point_field() {
                        let point = field_type.parse_point(value)?;
                        builder.points.get_or_insert_with(Vec::new).push((point, doc_id));
                        continue;
                    }

                    let indexed = field_type.readable_to_indexed(value)?;
                    if definition.doc_values {
                        builder
                            .sorted_set
                            .get_or_insert_with(SortedSetColumnBuilder::new)
                            .add_value(doc_id, indexed.clone());
                    }
                    if definition.indexed {
                        builder.terms.entry(indexed).or_default().push(doc_id);
                    }
                }
            }
        }

        let mut fields = AHashMap::with_capacity(builders.len());
        for (field, builder) in builders {
            let terms = if builder.terms.is_empty() {
                None
            } else {
                Some(TermDictionary::build(builder.terms)?)
            };
            fields.insert(
                field,
                SegmentField {
                    terms,
                    sorted_set: builder.sorted_set.map(|b| Arc::new(b.build(max_doc))),
                    points: builder.points.map(PointValues::from_unsorted),
                },
            );
        }

        debug!("Built segment {name} with {max_doc} docs and {} fields", fields.len());

        Ok(Segment {
            name,
            max_doc,
            fields,
        })
    }

    /// Segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents in this segment.
    pub fn max_doc(&self) -> u64 {
        self.max_doc
    }

    /// Term dictionary of a field, if any document indexed terms for it.
    pub fn term_dictionary(&self, field: &str) -> Option<&TermDictionary> {
        self.fields.get(field).and_then(|f| f.terms.as_ref())
    }

    /// Whether this segment holds a doc-values column for a field.
    pub fn has_doc_values(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .is_some_and(|f| f.sorted_set.is_some())
    }

    /// Doc-values column of a field; an empty column if the segment has none.
    pub fn sorted_set(&self, field: &str) -> Arc<SortedSetColumn> {
        self.fields
            .get(field)
            .and_then(|f| f.sorted_set.clone())
            .unwrap_or_else(|| Arc::new(SortedSetColumn::empty(self.max_doc)))
    }

    /// Point values of a field.
    pub fn points(&self, field: &str) -> Option<&PointValues> {
        self.fields.get(field).and_then(|f| f.points.as_ref())
    }
}

/// Position of one segment within the global doc id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
    pub doc_base: u64,
    pub max_doc: u64,
}

/// Ordered segment spans; global doc id = `doc_base + local doc id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTable {
    spans: Vec<SegmentSpan>,
}

impl SegmentTable {
    /// Build a table from per-segment document counts, in segment order.
    pub fn from_sizes<I: IntoIterator<Item = u64>>(sizes: I) -> Self {
        let mut doc_base = 0;
        let spans = sizes
            .into_iter()
            .map(|max_doc| {
                let span = SegmentSpan { doc_base, max_doc };
                doc_base += max_doc;
                span
            })
            .collect();
        SegmentTable { spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[SegmentSpan] {
        &self.spans
    }

    /// First global doc id of a segment.
    pub fn doc_base(&self, segment: usize) -> u64 {
        self.spans.get(segment).map_or(self.max_doc(), |s| s.doc_base)
    }

    /// Doc base of the following segment, or [`NO_MORE_DOCS`] for the last one.
    pub fn next_doc_base(&self, segment: usize) -> u64 {
        if segment + 1 >= self.spans.len() {
            NO_MORE_DOCS
        } else {
            self.spans[segment + 1].doc_base
        }
    }

    /// Total number of documents.
    pub fn max_doc(&self) -> u64 {
        self.spans.last().map_or(0, |s| s.doc_base + s.max_doc)
    }

    /// The segment holding a global doc id.
    pub fn segment_for(&self, doc: u64) -> Option<usize> {
        if doc >= self.max_doc() {
            return None;
        }
        Some(self.spans.partition_point(|s| s.doc_base <= doc) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::doc_values::OrdinalDictionary;
    use crate::schema::{FieldDefinition, FieldType};

    fn schema() -> Schema {
        Schema::new()
            .with_field("tags", FieldDefinition::new(FieldType::String))
            .unwrap()
            .with_field(
                "id",
                FieldDefinition::new(FieldType::String).multi_valued(false),
            )
            .unwrap()
            .with_field("price", FieldDefinition::new(FieldType::LongPoint))
            .unwrap()
    }

    #[test]
    fn test_build_segment() {
        let docs = vec![
            Document::builder().add("tags", "b").add("tags", "a").build(),
            Document::builder().add("id", "x").add("price", "42").build(),
            Document::builder().add("tags", "a").build(),
        ];
        let segment = Segment::build("seg_0", &schema(), &docs).unwrap();

        assert_eq!(segment.name(), "seg_0");
        assert_eq!(segment.max_doc(), 3);
        assert_eq!(&*segment.term_dictionary("tags").unwrap().get(b"a").unwrap(), &[0, 2]);

        let column = segment.sorted_set("tags");
        assert_eq!(column.value_count(), 2);
        assert_eq!(column.doc_ords(0), &[0, 1]);
        assert!(column.doc_ords(1).is_empty());

        let points = segment.points("price").unwrap();
        assert_eq!(points.docs_with_value(42).collect::<Vec<_>>(), vec![1]);

        // missing column is empty but sized
        assert!(!segment.has_doc_values("missing"));
        assert_eq!(segment.sorted_set("missing").max_doc(), 3);
    }

    #[test]
    fn test_build_rejects_bad_documents() {
        let unknown = vec![Document::builder().add("nope", "x").build()];
        assert!(Segment::build("s", &schema(), &unknown).is_err());

        let multi = vec![Document::builder().add("id", "x").add("id", "y").build()];
        assert!(Segment::build("s", &schema(), &multi).is_err());

        let bad_point = vec![Document::builder().add("price", "abc").build()];
        assert!(Segment::build("s", &schema(), &bad_point).is_err());
    }

    #[test]
    fn test_segment_table() {
        let table = SegmentTable::from_sizes([3, 0, 2]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.max_doc(), 5);
        assert_eq!(table.doc_base(2), 3);
        assert_eq!(table.next_doc_base(0), 3);
        assert_eq!(table.next_doc_base(2), NO_MORE_DOCS);
        assert_eq!(table.segment_for(2), Some(0));
        assert_eq!(table.segment_for(3), Some(2));
        assert_eq!(table.segment_for(5), None);
    }
}
