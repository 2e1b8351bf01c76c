//! Terms query configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocTermsError, Result};
use crate::query::terms::method::TermsMethod;
use crate::query::top_level::DEFAULT_MATCH_COST;

/// Defaults applied when a request leaves a parameter out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsQueryConfig {
    /// Separator between values.
    pub default_separator: String,

    /// Method used when the request names none.
    pub default_method: String,

    /// `docValuesTermsFilter` without a submethod switches to the top-level
    /// strategy above this many distinct values.
    pub top_level_threshold: usize,

    /// Match cost reported by top-level matchers.
    pub top_level_match_cost: f32,
}

impl Default for TermsQueryConfig {
    fn default() -> Self {
        TermsQueryConfig {
            default_separator: ",".to_string(),
            default_method: TermsMethod::TermsFilter.name().to_string(),
            top_level_threshold: 700,
            top_level_match_cost: DEFAULT_MATCH_COST,
        }
    }
}

impl TermsQueryConfig {
    /// Parse a JSON configuration; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TermsQueryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check the defaults are usable.
    pub fn validate(&self) -> Result<()> {
        if self.default_separator.is_empty() {
            return Err(DocTermsError::bad_request("default_separator must not be empty"));
        }
        TermsMethod::parse(&self.default_method, None)?;
        if !(self.top_level_match_cost.is_finite() && self.top_level_match_cost >= 0.0) {
            return Err(DocTermsError::bad_request(
                "top_level_match_cost must be a non-negative number",
            ));
        }
        Ok(())
    }
}
