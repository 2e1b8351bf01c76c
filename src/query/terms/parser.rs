//! Terms query parser.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DocTermsError, Result};
use crate::query::Query;
use crate::query::match_none::MatchNoDocsQuery;
use crate::query::point_set::PointInSetQuery;
use crate::query::terms::config::TermsQueryConfig;
use crate::query::terms::method::TermsMethod;
use crate::query::top_level::QueryCacheHints;
use crate::schema::{Schema, ValueEncoder};
use crate::util::bytes::SortedTermSet;

/// Parameters of one terms query request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsParams {
    /// Field to match.
    #[serde(rename = "f")]
    pub field: Option<String>,

    /// Separated raw values.
    #[serde(rename = "v", default)]
    pub value: String,

    #[serde(default)]
    pub separator: Option<String>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub submethod: Option<String>,

    #[serde(default)]
    pub cache: Option<bool>,

    #[serde(rename = "cache_sep", default)]
    pub cache_separately: Option<bool>,

    #[serde(default)]
    pub cost: Option<i32>,
}

impl TermsParams {
    pub fn new<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        TermsParams {
            field: Some(field.into()),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_method<S: Into<String>>(mut self, method: S) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_submethod<S: Into<String>>(mut self, submethod: S) -> Self {
        self.submethod = Some(submethod.into());
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_cache_separately(mut self, cache_separately: bool) -> Self {
        self.cache_separately = Some(cache_separately);
        self
    }

    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    fn hints(&self) -> QueryCacheHints {
        let defaults = QueryCacheHints::default();
        QueryCacheHints {
            cache: self.cache.unwrap_or(defaults.cache),
            cache_separately: self.cache_separately.unwrap_or(defaults.cache_separately),
            cost: self.cost.unwrap_or(defaults.cost),
        }
    }
}

/// Split raw input into values.
///
/// A lone space separator trims the input and splits on runs of whitespace.
/// Any other separator splits literally and keeps empty values. Empty input
/// yields no values.
pub fn split_values<'a>(input: &'a str, separator: &str) -> Vec<&'a str> {
    if separator == " " {
        return input.split_whitespace().collect();
    }
    if input.is_empty() {
        return Vec::new();
    }
    input.split(separator).collect()
}

/// Builds terms queries against a schema.
#[derive(Debug, Clone)]
pub struct TermsQueryParser {
    schema: Arc<Schema>,
    config: TermsQueryConfig,
}

impl TermsQueryParser {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, TermsQueryConfig::default())
    }

    pub fn with_config(schema: Arc<Schema>, config: TermsQueryConfig) -> Self {
        TermsQueryParser { schema, config }
    }

    pub fn config(&self) -> &TermsQueryConfig {
        &self.config
    }

    /// Validate a request and build its query.
    ///
    /// Every configuration error surfaces here as a bad request; the
    /// returned query never fails on account of its parameters.
    pub fn parse(&self, params: &TermsParams) -> Result<Box<dyn Query>> {
        let field = params
            .field
            .as_deref()
            .ok_or_else(|| DocTermsError::bad_request("Missing required parameter 'f'"))?;
        let definition = self.schema.get_field(field).ok_or_else(|| {
            DocTermsError::bad_request(format!("Field name [{field}] does not exist"))
        })?;

        let separator = params
            .separator
            .as_deref()
            .unwrap_or(&self.config.default_separator);
        if separator.is_empty() {
            return Err(DocTermsError::bad_request("Terms 'separator' must not be empty"));
        }

        let method = TermsMethod::parse(
            params.method.as_deref().unwrap_or(&self.config.default_method),
            params.submethod.as_deref(),
        )?;

        let values = split_values(&params.value, separator);
        if values.is_empty() {
            return Ok(Box::new(MatchNoDocsQuery::new("No terms supplied")));
        }

        let field_type = definition.field_type;
        if field_type.is_point_field() {
            if let Some(method) = &params.method {
                return Err(DocTermsError::bad_request(format!(
                    "Method '{method}' not supported in terms query when using point fields"
                )));
            }
            let points = values
                .iter()
                .map(|value| field_type.parse_point(value))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Box::new(PointInSetQuery::new(field, points)));
        }

        let terms = values
            .iter()
            .map(|value| field_type.readable_to_indexed(value))
            .collect::<Result<Vec<_>>>()?;
        let terms = SortedTermSet::new(terms);

        debug!(
            "Terms query on '{field}': {} values, {} distinct, method {}",
            values.len(),
            terms.len(),
            method.name()
        );

        method.make_filter(field, terms, &self.config, params.hints())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::automaton::AutomatonQuery;
    use crate::query::boolean::BooleanQuery;
    use crate::query::doc_values_terms::DocValuesTermsQuery;
    use crate::query::term_in_set::TermInSetQuery;
    use crate::query::top_level::TopLevelDocValuesTermsQuery;
    use crate::testing::{fruit_reader, matching_docs, schema};
    use crate::util::bytes::BytesRef;

    fn parser() -> TermsQueryParser {
        TermsQueryParser::new(schema())
    }

    #[test]
    fn test_split_values() {
        assert_eq!(split_values(" a  b   c ", " "), vec!["a", "b", "c"]);
        assert_eq!(split_values("a,,c", ","), vec!["a", "", "c"]);
        assert_eq!(split_values("a,b,", ","), vec!["a", "b", ""]);
        assert_eq!(split_values("a||b", "||"), vec!["a", "b"]);
        assert!(split_values("   ", " ").is_empty());
        assert!(split_values("", ",").is_empty());
        assert_eq!(split_values(" ", ","), vec![" "]);
    }

    #[test]
    fn test_default_method_is_terms_filter() {
        let query = parser().parse(&TermsParams::new("fruit", "banana,date")).unwrap();
        let query = query.as_any().downcast_ref::<TermInSetQuery>().unwrap();
        assert_eq!(query.terms().len(), 2);
    }

    #[test]
    fn test_methods_dispatch() {
        let parse = |method: &str| {
            parser()
                .parse(&TermsParams::new("fruit", "banana,date").with_method(method))
                .unwrap()
        };

        assert!(parse("booleanQuery").as_any().is::<BooleanQuery>());
        assert!(parse("automaton").as_any().is::<AutomatonQuery>());
        assert!(parse("docValuesTermsFilter").as_any().is::<DocValuesTermsQuery>());
    }

    #[test]
    fn test_all_methods_agree() {
        let reader = fruit_reader();
        let params = TermsParams::new("fruit", "date,banana,fig");
        let methods = [
            params.clone(),
            params.clone().with_method("booleanQuery"),
            params.clone().with_method("automaton"),
            params.clone().with_method("docValuesTermsFilter").with_submethod("toplevel"),
            params.clone().with_method("docValuesTermsFilter").with_submethod("persegment"),
        ];

        for params in methods {
            let query = parser().parse(&params).unwrap();
            assert_eq!(matching_docs(query.as_ref(), &reader), vec![1, 3, 4], "{params:?}");
        }
    }

    #[test]
    fn test_encoded_field_types() {
        let reader = fruit_reader();

        let query = parser().parse(&TermsParams::new("count", "2,-1")).unwrap();
        assert_eq!(matching_docs(query.as_ref(), &reader), vec![1, 4]);

        let query = parser()
            .parse(&TermsParams::new("flag", "false").with_method("docValuesTermsFilter"))
            .unwrap();
        assert_eq!(matching_docs(query.as_ref(), &reader), vec![2]);
    }

    #[test]
    fn test_point_field() {
        let reader = fruit_reader();
        let query = parser().parse(&TermsParams::new("price", "20 10").with_separator(" ")).unwrap();
        assert!(query.as_any().is::<PointInSetQuery>());
        assert_eq!(matching_docs(query.as_ref(), &reader), vec![0, 3, 4]);

        let err = parser()
            .parse(&TermsParams::new("price", "10").with_method("termsFilter"))
            .unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.to_string().contains("Method 'termsFilter'"));

        let err = parser().parse(&TermsParams::new("price", "ten")).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_empty_input_matches_nothing() {
        for params in [
            TermsParams::new("fruit", ""),
            TermsParams::new("fruit", "   ").with_separator(" "),
            TermsParams::new("price", "").with_method("termsFilter"),
        ] {
            let query = parser().parse(&params).unwrap();
            assert!(query.as_any().is::<MatchNoDocsQuery>());
        }
    }

    #[test]
    fn test_empty_value_is_a_term() {
        let query = parser().parse(&TermsParams::new("fruit", "a,,c")).unwrap();
        let query = query.as_any().downcast_ref::<TermInSetQuery>().unwrap();
        let terms: Vec<&BytesRef> = query.terms().iter().collect();
        assert_eq!(terms, vec![&BytesRef::from(""), &BytesRef::from("a"), &BytesRef::from("c")]);
    }

    #[test]
    fn test_request_errors() {
        let err = parser().parse(&TermsParams::new("nope", "a")).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "Bad request: Field name [nope] does not exist");

        let err = parser().parse(&TermsParams::default()).unwrap_err();
        assert!(err.is_bad_request());

        let err = parser()
            .parse(
                &TermsParams::new("fruit", "a")
                    .with_method("docValuesTermsFilter")
                    .with_submethod("sometimes"),
            )
            .unwrap_err();
        assert!(err.is_bad_request());

        let err = parser()
            .parse(&TermsParams::new("fruit", "a").with_separator(""))
            .unwrap_err();
        assert!(err.is_bad_request());

        let err = parser()
            .parse(&TermsParams::new("count", "abc"))
            .unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_threshold_and_hints() {
        let config = TermsQueryConfig {
            top_level_threshold: 1,
            default_method: "docValuesTermsFilter".to_string(),
            ..Default::default()
        };
        let parser = TermsQueryParser::with_config(schema(), config);

        let query = parser
            .parse(
                &TermsParams::new("fruit", "a,b")
                    .with_cache(false)
                    .with_cache_separately(true)
                    .with_cost(101),
            )
            .unwrap();
        let query = query
            .as_any()
            .downcast_ref::<TopLevelDocValuesTermsQuery>()
            .unwrap();
        assert!(!query.cache());
        assert!(query.cache_separately());
        assert_eq!(query.cost(), 101);

        // duplicates count once
        let query = parser.parse(&TermsParams::new("fruit", "a,a")).unwrap();
        assert!(query.as_any().is::<DocValuesTermsQuery>());
    }

    #[test]
    fn test_params_from_json() {
        let params: TermsParams = serde_json::from_str(
            r#"{"f": "fruit", "v": "a b", "separator": " ", "cache_sep": true}"#,
        )
        .unwrap();
        assert_eq!(params.field.as_deref(), Some("fruit"));
        assert_eq!(params.cache_separately, Some(true));
        assert!(params.method.is_none());
    }
}
