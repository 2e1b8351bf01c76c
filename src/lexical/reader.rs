//! Point-in-time reader over a list of segments.

use std::sync::Arc;

use crate::lexical::segment::{Segment, SegmentTable};
use crate::schema::Schema;

/// Immutable view over an ordered list of segments.
#[derive(Debug, Clone)]
pub struct IndexReader {
    schema: Arc<Schema>,
    segments: Vec<Arc<Segment>>,
    table: SegmentTable,
}

impl IndexReader {
    /// Create a reader; segment order defines the global doc id numbering.
    pub fn new(schema: Arc<Schema>, segments: Vec<Arc<Segment>>) -> Self {
        let table = SegmentTable::from_sizes(segments.iter().map(|s| s.max_doc()));
        IndexReader {
            schema,
            segments,
            table,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    pub fn segment_table(&self) -> &SegmentTable {
        &self.table
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total number of documents.
    pub fn max_doc(&self) -> u64 {
        self.table.max_doc()
    }

    /// One context per segment, in order.
    pub fn leaves(&self) -> Vec<LeafContext<'_>> {
        self.segments
            .iter()
            .zip(self.table.spans())
            .enumerate()
            .map(|(ord, (segment, span))| LeafContext {
                ord,
                doc_base: span.doc_base,
                segment: segment.as_ref(),
                table: &self.table,
            })
            .collect()
    }
}

/// A segment together with its place in the index.
#[derive(Debug, Clone, Copy)]
pub struct LeafContext<'a> {
    /// Position of the segment in the reader.
    pub ord: usize,
    /// Global doc id of the segment's first document.
    pub doc_base: u64,
    pub segment: &'a Segment,
    pub table: &'a SegmentTable,
}

impl LeafContext<'_> {
    /// Doc base of the next segment, or `NO_MORE_DOCS` for the last one.
    pub fn next_doc_base(&self) -> u64 {
        self.table.next_doc_base(self.ord)
    }

    pub fn max_doc(&self) -> u64 {
        self.segment.max_doc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::query::matcher::NO_MORE_DOCS;
    use crate::schema::{FieldDefinition, FieldType};

    #[test]
    fn test_leaves() {
        let schema = Arc::new(
            Schema::new()
                .with_field("tags", FieldDefinition::new(FieldType::String))
                .unwrap(),
        );
        let doc = || Document::builder().add("tags", "x").build();
        let first = Segment::build("a", &schema, &[doc(), doc()]).unwrap();
        let second = Segment::build("b", &schema, &[doc()]).unwrap();
        let reader = IndexReader::new(schema, vec![Arc::new(first), Arc::new(second)]);

        let leaves = reader.leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].doc_base, 0);
        assert_eq!(leaves[0].next_doc_base(), 2);
        assert_eq!(leaves[1].doc_base, 2);
        assert_eq!(leaves[1].next_doc_base(), NO_MORE_DOCS);
        assert_eq!(reader.max_doc(), 3);
    }
}
