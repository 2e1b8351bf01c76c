//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::cli::args::{DocTermsArgs, OutputFormat};
use crate::error::Result;

/// Result of the `search` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_hits: u64,
    pub doc_ids: Vec<u64>,
    pub duration_ms: u64,
}

/// Result of the `stats` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorpusStats {
    pub documents: u64,
    pub segments: Vec<SegmentStats>,
    pub fields: Vec<FieldStats>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentStats {
    pub name: String,
    pub documents: u64,
}

/// Field-specific statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldStats {
    pub name: String,
    pub field_type: String,
    /// Distinct values across all segments; `None` without doc values.
    pub global_values: Option<u64>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

impl HumanOutput for SearchOutput {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Query: {}", self.query);
        let _ = writeln!(
            out,
            "Found {} matching documents in {}ms",
            self.total_hits, self.duration_ms
        );
        if !self.doc_ids.is_empty() {
            let ids: Vec<String> = self.doc_ids.iter().map(u64::to_string).collect();
            let _ = writeln!(out, "Doc ids: {}", ids.join(" "));
        }
        if (self.doc_ids.len() as u64) < self.total_hits {
            let _ = writeln!(out, "({} more not shown)", self.total_hits - self.doc_ids.len() as u64);
        }
        out
    }
}

impl HumanOutput for CorpusStats {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Documents: {}", self.documents);
        let _ = writeln!(out, "Segments: {}", self.segments.len());
        for segment in &self.segments {
            let _ = writeln!(out, "  {:<16} {:>8} docs", segment.name, segment.documents);
        }
        let _ = writeln!(out, "Fields:");
        for field in &self.fields {
            let values = match field.global_values {
                Some(count) => format!("{count} values"),
                None => "no doc values".to_string(),
            };
            let _ = writeln!(out, "  {:<16} {:<12} {values}", field.name, field.field_type);
        }
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &DocTermsArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            print!("{}", result.render_human());
        }
        OutputFormat::Json => println!("{}", format_json(result, args.pretty)?),
    }
    Ok(())
}

/// Serialize a result as JSON.
pub fn format_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}
