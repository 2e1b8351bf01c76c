//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::document::Document;
use crate::lexical::reader::IndexReader;
use crate::lexical::writer::IndexWriter;
use crate::query::Query;
use crate::schema::{FieldDefinition, FieldType, Schema};

pub(crate) fn schema() -> Arc<Schema> {
    Arc::new(
        Schema::new()
            .with_field("fruit", FieldDefinition::new(FieldType::String))
            .unwrap()
            .with_field("count", FieldDefinition::new(FieldType::Long))
            .unwrap()
            .with_field("flag", FieldDefinition::new(FieldType::Boolean))
            .unwrap()
            .with_field("price", FieldDefinition::new(FieldType::LongPoint))
            .unwrap(),
    )
}

/// Two segments:
///
/// | doc | fruit           | count | flag  | price |
/// |-----|-----------------|-------|-------|-------|
/// | 0   | apple, cherry   | 1     | true  | 10    |
/// | 1   | banana          | 2     |       |       |
/// | 2   |                 | 3     | false |       |
/// | 3   | date            |       |       | 20    |
/// | 4   | cherry, banana  | -1    | true  | 10    |
/// | 5   | elderberry      |       |       |       |
pub(crate) fn fruit_reader() -> IndexReader {
    let mut writer = IndexWriter::with_schema(schema());
    let docs = [
        Document::builder()
            .add_all("fruit", ["apple", "cherry"])
            .add("count", "1")
            .add("flag", "true")
            .add("price", "10")
            .build(),
        Document::builder().add("fruit", "banana").add("count", "2").build(),
        Document::builder().add("count", "3").add("flag", "false").build(),
    ];
    writer.add_documents(docs).unwrap();
    writer.flush().unwrap();

    let docs = [
        Document::builder().add("fruit", "date").add("price", "20").build(),
        Document::builder()
            .add_all("fruit", ["cherry", "banana"])
            .add("count", "-1")
            .add("flag", "true")
            .add("price", "10")
            .build(),
        Document::builder().add("fruit", "elderberry").build(),
    ];
    writer.add_documents(docs).unwrap();
    writer.commit().unwrap()
}

/// Run a query over every segment and return the matching global doc ids.
pub(crate) fn matching_docs(query: &dyn Query, reader: &IndexReader) -> Vec<u64> {
    let weight = query.create_weight(reader).unwrap();
    let mut docs = Vec::new();
    for leaf in reader.leaves() {
        if let Some(mut matcher) = weight.matcher(&leaf).unwrap() {
            while matcher.next().unwrap() {
                docs.push(matcher.doc_id());
            }
        }
    }
    docs
}
