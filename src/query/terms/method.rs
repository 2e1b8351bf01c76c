//! Terms query strategies.

use log::debug;

use crate::error::{DocTermsError, Result};
use crate::query::Query;
use crate::query::automaton::AutomatonQuery;
use crate::query::boolean::BooleanQuery;
use crate::query::doc_values_terms::DocValuesTermsQuery;
use crate::query::term::TermQuery;
use crate::query::term_in_set::TermInSetQuery;
use crate::query::terms::config::TermsQueryConfig;
use crate::query::top_level::{QueryCacheHints, TopLevelDocValuesTermsQuery};
use crate::util::bytes::SortedTermSet;

const TOP_LEVEL: &str = "toplevel";
const PER_SEGMENT: &str = "persegment";

/// Evaluation mode of the dictionary-ordinal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMethod {
    /// One resolution over the index-wide ordinal space.
    TopLevel,
    /// Independent resolution inside each segment.
    PerSegment,
}

impl SubMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SubMethod::TopLevel => TOP_LEVEL,
            SubMethod::PerSegment => PER_SEGMENT,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            TOP_LEVEL => Ok(SubMethod::TopLevel),
            PER_SEGMENT => Ok(SubMethod::PerSegment),
            _ => Err(DocTermsError::bad_request(format!(
                "Invalid terms 'submethod' specified; only '{TOP_LEVEL}' and '{PER_SEGMENT}' supported"
            ))),
        }
    }

    /// Mode used when the request names none.
    pub fn choose(distinct_terms: usize, top_level_threshold: usize) -> Self {
        if distinct_terms > top_level_threshold {
            SubMethod::TopLevel
        } else {
            SubMethod::PerSegment
        }
    }
}

/// How a terms query is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsMethod {
    /// Exact term-set membership over postings.
    TermsFilter,
    /// Disjunction of term queries.
    BooleanQuery,
    /// Union automaton intersected with the term dictionary.
    Automaton,
    /// Dictionary ordinals of sorted-set doc values.
    DocValuesTermsFilter(Option<SubMethod>),
}

impl TermsMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TermsMethod::TermsFilter => "termsFilter",
            TermsMethod::BooleanQuery => "booleanQuery",
            TermsMethod::Automaton => "automaton",
            TermsMethod::DocValuesTermsFilter(_) => "docValuesTermsFilter",
        }
    }

    /// Parse a method name. The submethod is only read by `docValuesTermsFilter`.
    pub fn parse(method: &str, submethod: Option<&str>) -> Result<Self> {
        match method {
            "termsFilter" => Ok(TermsMethod::TermsFilter),
            "booleanQuery" => Ok(TermsMethod::BooleanQuery),
            "automaton" => Ok(TermsMethod::Automaton),
            "docValuesTermsFilter" => Ok(TermsMethod::DocValuesTermsFilter(
                submethod.map(SubMethod::parse).transpose()?,
            )),
            _ => Err(DocTermsError::bad_request(format!(
                "Method '{method}' not supported in terms query; expected one of \
                 termsFilter, booleanQuery, automaton, docValuesTermsFilter"
            ))),
        }
    }

    /// Build the query for encoded `terms`.
    pub fn make_filter(
        &self,
        field: &str,
        terms: SortedTermSet,
        config: &TermsQueryConfig,
        hints: QueryCacheHints,
    ) -> Result<Box<dyn Query>> {
        let query: Box<dyn Query> = match self {
            TermsMethod::TermsFilter => Box::new(TermInSetQuery::new(field, terms)),
            TermsMethod::BooleanQuery => {
                let mut query = BooleanQuery::new();
                for term in terms.iter() {
                    query.add_should(Box::new(TermQuery::new(field, term.clone())));
                }
                Box::new(query)
            }
            TermsMethod::Automaton => Box::new(AutomatonQuery::new(field, &terms)?),
            TermsMethod::DocValuesTermsFilter(submethod) => {
                let submethod = submethod
                    .unwrap_or_else(|| SubMethod::choose(terms.len(), config.top_level_threshold));
                match submethod {
                    SubMethod::TopLevel => Box::new(
                        TopLevelDocValuesTermsQuery::new(field, terms)
                            .with_match_cost(config.top_level_match_cost)
                            .with_hints(hints),
                    ),
                    SubMethod::PerSegment => Box::new(DocValuesTermsQuery::new(field, terms)),
                }
            }
        };

        debug!("Terms method {} built {}", self.name(), query.description());
        Ok(query)
    }
}
