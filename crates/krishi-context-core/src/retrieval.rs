//! Domain-aware retrieval over a pluggable search backend.
//!
//! A router classifies each user query into a [`QueryDomain`]; this module
//! turns that decision into a backend query (adding a document-type filter
//! for annual reports) and renders whatever comes back through
//! [`format_results`]. Every failure mode resolves to a readable sentinel
//! string so the result can be dropped straight into a model prompt.
//!
//! Backends implement [`SearchBackend`]. [`memory::InMemoryBackend`] is a
//! deterministic term-overlap backend for tests and offline use.

pub mod memory;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::search::{format_results, normalize, RawSearchResults, SearchHit};

pub const NO_BACKEND: &str = "No vector database available.";
pub const GENERAL_QUERY: &str = "No additional context needed for general queries.";
pub const NO_KNOWLEDGE_BASE_RESULTS: &str = "No relevant context found in knowledge base.";

/// Metadata key and value added for [`QueryDomain::AnnualReport`] queries.
pub const DOCUMENT_TYPE_KEY: &str = "document_type";
pub const ANNUAL_REPORT_TYPE: &str = "annual_report";

/// Routing category for a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryDomain {
    #[serde(rename = "general")]
    General,
    #[serde(rename = "annual_report")]
    AnnualReport,
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "false")]
    OffTopic,
}

impl QueryDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryDomain::General => "general",
            QueryDomain::AnnualReport => ANNUAL_REPORT_TYPE,
            QueryDomain::Search => "search",
            QueryDomain::OffTopic => "false",
        }
    }

    /// Parse a wire name; `None` for anything unrecognized.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "general" => Some(QueryDomain::General),
            "annual_report" => Some(QueryDomain::AnnualReport),
            "search" => Some(QueryDomain::Search),
            "false" => Some(QueryDomain::OffTopic),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A similarity query with exact-match metadata filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub text: String,
    pub n_results: usize,
    pub filters: BTreeMap<String, String>,
}

/// Similarity search over an external knowledge base.
///
/// Implementations must be `Send + Sync` so a single backend can be shared
/// by concurrent requests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a query, returning the raw (possibly batched) payload.
    async fn search(&self, query: &SearchQuery) -> Result<RawSearchResults>;
}

/// Prompt-ready context plus the hits it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedContext {
    pub text: String,
    pub hits: Vec<SearchHit>,
}

impl RetrievedContext {
    fn sentinel(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hits: Vec::new(),
        }
    }
}

/// Retrieve context for `query` according to its routed `domain`.
///
/// [`QueryDomain::General`] never touches the backend.
pub async fn retrieve_context(
    backend: Option<&dyn SearchBackend>,
    query: &str,
    domain: QueryDomain,
    max_results: usize,
    filters: BTreeMap<String, String>,
) -> RetrievedContext {
    let Some(backend) = backend else {
        return RetrievedContext::sentinel(NO_BACKEND);
    };

    let mut filters = filters;
    match domain {
        QueryDomain::General => return RetrievedContext::sentinel(GENERAL_QUERY),
        QueryDomain::AnnualReport => {
            filters.insert(DOCUMENT_TYPE_KEY.to_string(), ANNUAL_REPORT_TYPE.to_string());
        }
        QueryDomain::Search | QueryDomain::OffTopic => {}
    }

    let request = SearchQuery {
        text: query.to_string(),
        n_results: max_results,
        filters,
    };
    tracing::info!(%domain, n_results = max_results, filters = ?request.filters, "retrieving context");

    let raw = match backend.search(&request).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "context retrieval failed");
            return RetrievedContext::sentinel(format!("Error retrieving context: {}", e));
        }
    };

    // No documents key at all is a knowledge-base miss; an empty list is
    // rendered by `format_results` like any other payload.
    if !raw.has_documents_key() {
        tracing::info!("retrieval returned no documents field");
        return RetrievedContext::sentinel(NO_KNOWLEDGE_BASE_RESULTS);
    }

    let hits = normalize(&raw).unwrap_or_default();
    tracing::info!(hits = hits.len(), "retrieved context");
    RetrievedContext {
        text: format_results(&raw, max_results),
        hits,
    }
}

/// Raw search results as a serializable summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchSummary {
    Results {
        query: String,
        filters: BTreeMap<String, String>,
        total_results: usize,
        results: Vec<SearchHit>,
    },
    Failed {
        error: String,
        results: Vec<SearchHit>,
    },
}

/// Search without formatting, for callers that post-process hits.
pub async fn search_only(
    backend: Option<&dyn SearchBackend>,
    query: &str,
    max_results: usize,
    filters: BTreeMap<String, String>,
) -> SearchSummary {
    let Some(backend) = backend else {
        return SearchSummary::Failed {
            error: NO_BACKEND.to_string(),
            results: Vec::new(),
        };
    };

    let request = SearchQuery {
        text: query.to_string(),
        n_results: max_results,
        filters,
    };
    match backend.search(&request).await {
        Ok(raw) => {
            let results = normalize(&raw).unwrap_or_default();
            SearchSummary::Results {
                query: request.text,
                filters: request.filters,
                total_results: results.len(),
                results,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            SearchSummary::Failed {
                error: e.to_string(),
                results: Vec::new(),
            }
        }
    }
}
