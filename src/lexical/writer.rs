//! Index writer.
//!
//! Documents are buffered and frozen into an immutable [`Segment`] once the
//! buffer reaches `max_docs_per_segment`, or on an explicit [`IndexWriter::flush`].

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{DocTermsError, Result};
use crate::lexical::reader::IndexReader;
use crate::lexical::segment::Segment;
use crate::schema::Schema;

/// Configuration for [`IndexWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexWriterConfig {
    /// Maximum number of documents buffered before a segment is flushed.
    pub max_docs_per_segment: usize,

    /// Segment name prefix.
    pub segment_prefix: String,
}

impl Default for IndexWriterConfig {
    fn default() -> Self {
        IndexWriterConfig {
            max_docs_per_segment: 10_000,
            segment_prefix: "segment".to_string(),
        }
    }
}

/// Builds an in-memory, segmented index.
#[derive(Debug)]
pub struct IndexWriter {
    schema: Arc<Schema>,
    config: IndexWriterConfig,
    pending: Vec<Document>,
    segments: Vec<Arc<Segment>>,
}

impl IndexWriter {
    /// Create a new writer.
    pub fn new(schema: Arc<Schema>, config: IndexWriterConfig) -> Result<Self> {
        if config.max_docs_per_segment == 0 {
            return Err(DocTermsError::index("max_docs_per_segment must be at least 1"));
        }
        Ok(IndexWriter {
            schema,
            config,
            pending: Vec::new(),
            segments: Vec::new(),
        })
    }

    /// Create a writer with the default configuration.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        IndexWriter {
            schema,
            config: IndexWriterConfig::default(),
            pending: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Add a document, flushing a segment when the buffer is full.
    pub fn add_document(&mut self, doc: Document) -> Result<()> {
        if let Some((field, _)) = doc.fields().find(|(field, _)| !self.schema.has_field(field)) {
            return Err(DocTermsError::schema(format!("Unknown field '{field}'")));
        }

        self.pending.push(doc);
        if self.pending.len() >= self.config.max_docs_per_segment {
            self.flush()?;
        }
        Ok(())
    }

    /// Add several documents.
    pub fn add_documents<I: IntoIterator<Item = Document>>(&mut self, docs: I) -> Result<()> {
        for doc in docs {
            self.add_document(doc)?;
        }
        Ok(())
    }

    /// Freeze buffered documents into a new segment. No-op if nothing is buffered.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let name = format!("{}_{}", self.config.segment_prefix, self.segments.len());
        let segment = Segment::build(name, &self.schema, &self.pending)?;
        debug!("Flushed {} documents into {}", self.pending.len(), segment.name());

        self.pending.clear();
        self.segments.push(Arc::new(segment));
        Ok(())
    }

    /// Number of buffered documents.
    pub fn pending_docs(&self) -> usize {
        self.pending.len()
    }

    /// Number of flushed segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Flush and open a reader over every segment written so far.
    pub fn commit(&mut self) -> Result<IndexReader> {
        self.flush()?;
        let reader = IndexReader::new(Arc::clone(&self.schema), self.segments.clone());
        info!(
            "Committed {} segments, {} documents",
            reader.segment_count(),
            reader.max_doc()
        );
        Ok(reader)
    }
}
