//! Command implementations for the docterms CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::Document;
use crate::error::{DocTermsError, Result};
use crate::lexical::doc_values::OrdinalDictionary;
use crate::lexical::global_ords::GlobalOrdinalView;
use crate::lexical::reader::IndexReader;
use crate::lexical::writer::{IndexWriter, IndexWriterConfig};
use crate::query::terms::{TermsParams, TermsQueryConfig, TermsQueryParser};
use crate::schema::{FieldDefinition, Schema};
use crate::search::{IndexSearcher, SearcherConfig};

/// On-disk corpus: a schema and documents already split into segments.
#[derive(Debug, Deserialize)]
struct CorpusFile {
    schema: BTreeMap<String, FieldDefinition>,
    #[serde(default)]
    segments: Vec<Vec<Value>>,
}

/// Execute a CLI command.
pub fn execute_command(args: DocTermsArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TermsQueryConfig::from_file(path)?,
        None => TermsQueryConfig::default(),
    };

    match &args.command {
        Command::Search(search_args) => {
            let results = run_search(search_args, &config)?;
            output_result("Search results", &results, &args)
        }
        Command::Stats(stats_args) => {
            let stats = corpus_stats(stats_args)?;
            output_result("Corpus statistics", &stats, &args)
        }
    }
}

/// Load a corpus file, keeping its segment boundaries.
///
/// Empty segments are skipped.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<IndexReader> {
    let corpus: CorpusFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    let schema = Arc::new(Schema::from_definitions(corpus.schema)?);

    let largest = corpus.segments.iter().map(Vec::len).max().unwrap_or(0);
    let config = IndexWriterConfig {
        max_docs_per_segment: largest.max(1),
        ..Default::default()
    };
    let mut writer = IndexWriter::new(schema, config)?;

    for segment in &corpus.segments {
        for value in segment {
            writer.add_document(Document::from_json(value)?)?;
        }
        writer.flush()?;
    }

    writer.commit()
}

/// Run a terms query against a corpus file.
pub fn run_search(args: &SearchArgs, config: &TermsQueryConfig) -> Result<SearchOutput> {
    let reader = Arc::new(load_corpus(&args.corpus)?);

    let mut params = TermsParams::new(args.field.as_str(), args.values.as_str());
    params.separator = args.separator.clone();
    params.method = args.method.clone();
    params.submethod = args.submethod.clone();

    let parser = TermsQueryParser::with_config(Arc::new(reader.schema().clone()), config.clone());
    let query = parser.parse(&params)?;

    let searcher = if args.sequential {
        IndexSearcher::sequential(Arc::clone(&reader))
    } else {
        IndexSearcher::new(
            Arc::clone(&reader),
            SearcherConfig {
                thread_pool_size: args.threads,
                parallel: true,
            },
        )?
    };

    let start = Instant::now();
    let results = searcher.search(query.as_ref(), args.limit)?;
    let duration = start.elapsed();
    info!("Searched {} documents in {duration:?}", reader.max_doc());

    Ok(SearchOutput {
        query: query.description(),
        total_hits: results.total_hits,
        doc_ids: results.doc_ids,
        duration_ms: duration.as_millis() as u64,
    })
}

/// Describe the segments and fields of a corpus file.
pub fn corpus_stats(args: &StatsArgs) -> Result<CorpusStats> {
    let reader = load_corpus(&args.corpus)?;

    let segments = reader
        .segments()
        .iter()
        .map(|segment| SegmentStats {
            name: segment.name().to_string(),
            documents: segment.max_doc(),
        })
        .collect();

    let mut fields = Vec::new();
    for name in reader.schema().field_names() {
        let definition = reader
            .schema()
            .get_field(name)
            .ok_or_else(|| DocTermsError::internal(format!("Schema lost field '{name}'")))?;
        let global_values = if definition.doc_values && !definition.field_type.is_point_field() {
            Some(GlobalOrdinalView::open(&reader, name)?.value_count())
        } else {
            None
        };
        fields.push(FieldStats {
            name: name.clone(),
            field_type: definition.field_type.type_name().to_string(),
            global_values,
        });
    }

    Ok(CorpusStats {
        documents: reader.max_doc(),
        segments,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CORPUS: &str = r#"{
        "schema": {
            "tags": {"type": "string"},
            "year": {"type": "long_point"}
        },
        "segments": [
            [{"tags": ["a", "b"], "year": 2001}, {"tags": "c"}],
            [],
            [{"tags": ["b", "d"]}, {"year": 1999}]
        ]
    }"#;

    fn corpus_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CORPUS.as_bytes()).unwrap();
        file
    }

    fn search_args(corpus: &Path, values: &str) -> SearchArgs {
        SearchArgs {
            corpus: corpus.to_path_buf(),
            field: "tags".to_string(),
            values: values.to_string(),
            separator: None,
            method: None,
            submethod: None,
            limit: None,
            sequential: true,
            threads: None,
        }
    }

    #[test]
    fn test_load_corpus_keeps_segments() {
        let file = corpus_file();
        let reader = load_corpus(file.path()).unwrap();
        assert_eq!(reader.segment_count(), 2);
        assert_eq!(reader.max_doc(), 4);
    }

    #[test]
    fn test_run_search() {
        let file = corpus_file();
        let output = run_search(&search_args(file.path(), "b,z"), &TermsQueryConfig::default()).unwrap();
        assert_eq!(output.doc_ids, vec![0, 2]);
        assert_eq!(output.total_hits, 2);

        let mut args = search_args(file.path(), "d,c");
        args.method = Some("docValuesTermsFilter".to_string());
        args.submethod = Some("toplevel".to_string());
        args.sequential = false;
        args.threads = Some(2);
        let output = run_search(&args, &TermsQueryConfig::default()).unwrap();
        assert_eq!(output.doc_ids, vec![1, 2]);
    }

    #[test]
    fn test_run_search_bad_request() {
        let file = corpus_file();
        let mut args = search_args(file.path(), "a");
        args.field = "missing".to_string();
        let err = run_search(&args, &TermsQueryConfig::default()).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_corpus_stats() {
        let file = corpus_file();
        let stats = corpus_stats(&StatsArgs {
            corpus: file.path().to_path_buf(),
        })
        .unwrap();

        assert_eq!(stats.documents, 4);
        assert_eq!(stats.segments.len(), 2);
        let tags = stats.fields.iter().find(|f| f.name == "tags").unwrap();
        assert_eq!(tags.global_values, Some(4));
        let year = stats.fields.iter().find(|f| f.name == "year").unwrap();
        assert_eq!(year.global_values, None);
    }

    #[test]
    fn test_invalid_corpus() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"segments": []}"#).unwrap();
        assert!(load_corpus(file.path()).is_err());
    }
}
