//! Integration tests for the search-backend and web-search traits.
//!
//! These drive routing, retrieval, and market formatting end-to-end
//! through custom trait implementations, the way an embedding application
//! would plug in its own vector store or search provider.

use anyhow::Result;
use async_trait::async_trait;
use krishi_context::market::{gather_market_lookups, WebSearch};
use krishi_context_core::retrieval::memory::InMemoryBackend;
use krishi_context_core::retrieval::{
    retrieve_context, QueryDomain, SearchBackend, SearchQuery,
};
use krishi_context_core::route::RouteDecision;
use krishi_context_core::search::{RawSearchResults, CONTEXT_FOOTER, CONTEXT_HEADER, NO_RESULTS};
use krishi_context_core::web::{format_market_analysis, WebHit};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

// ─── Test Backends ──────────────────────────────────────────────────

fn meta(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}

fn knowledge_base() -> InMemoryBackend {
    let kb = InMemoryBackend::new();
    kb.add(
        "NABARD disbursed record rural credit to farmers in 2023.",
        meta(json!({"organization": "NABARD", "document_type": "annual_report", "filename": "nabard_2023.pdf", "page_number": 12})),
    );
    kb.add(
        "Ginger cultivation guide for hill farmers.",
        meta(json!({"organization": "ICAR", "document_type": "guide"})),
    );
    kb.add(
        "Apple orchards in Uttarakhand need chilling hours.",
        meta(json!({"document_type": "guide"})),
    );
    kb
}

/// Backend that returns a flat, unbatched payload.
struct FlatBackend;

#[async_trait]
impl SearchBackend for FlatBackend {
    async fn search(&self, _query: &SearchQuery) -> Result<RawSearchResults> {
        Ok(serde_json::from_value(json!({
            "documents": ["Paddy transplanting starts in June."],
            "metadatas": [{"organization": "KVK Dehradun"}],
            "distances": [0.35]
        }))?)
    }
}

struct FixedWeb;

#[async_trait]
impl WebSearch for FixedWeb {
    async fn search(&self, query: &str) -> Result<Vec<WebHit>> {
        if query.starts_with("saffron") {
            anyhow::bail!("HTTP 503");
        }
        Ok(vec![WebHit {
            title: "Dehradun mandi rates".to_string(),
            url: "https://example.org/mandi".to_string(),
            snippet: format!("Latest prices for {}", query),
        }])
    }
}

// ─── Routing + Retrieval ────────────────────────────────────────────

#[tokio::test]
async fn test_routed_annual_report_query() {
    let kb = knowledge_base();
    let decision = RouteDecision::parse(
        r#"Routing: {"domain": "annual_report", "reason": "asks about credit", "year": 2023, "keywords": ["credit"]}"#,
    );
    assert_eq!(decision.domain, QueryDomain::AnnualReport);

    let ctx = retrieve_context(
        Some(&kb),
        "rural credit farmers",
        decision.domain,
        5,
        BTreeMap::new(),
    )
    .await;

    assert!(ctx.text.starts_with(CONTEXT_HEADER));
    assert!(ctx.text.ends_with(CONTEXT_FOOTER));
    assert!(ctx
        .text
        .contains("(Org: NABARD | Type: annual_report | File: nabard_2023.pdf | Page: 12)"));
    // The guide also mentions farmers but is excluded by the annual-report filter.
    assert!(!ctx.text.contains("Ginger"));
    assert_eq!(ctx.hits.len(), 1);
}

#[tokio::test]
async fn test_search_domain_ranks_by_overlap() {
    let kb = knowledge_base();
    let ctx = retrieve_context(
        Some(&kb),
        "ginger hill farmers",
        QueryDomain::Search,
        5,
        BTreeMap::new(),
    )
    .await;

    assert_eq!(ctx.hits[0].document, "Ginger cultivation guide for hill farmers.");
    assert_eq!(ctx.hits[0].relevance(), Some(1.0));
    assert!(ctx.text.contains("[Context 1] (Org: ICAR | Type: guide)\nRelevance Score: 1.000"));
}

#[tokio::test]
async fn test_unmatched_query_sentinel() {
    let kb = knowledge_base();
    let ctx = retrieve_context(Some(&kb), "cricket", QueryDomain::OffTopic, 5, BTreeMap::new())
        .await;
    // The backend answered with an empty list, not a missing field.
    assert_eq!(ctx.text, NO_RESULTS);
    assert!(ctx.hits.is_empty());
}

#[tokio::test]
async fn test_flat_payload_backend() {
    let ctx = retrieve_context(
        Some(&FlatBackend),
        "paddy",
        QueryDomain::Search,
        5,
        BTreeMap::new(),
    )
    .await;
    assert!(ctx
        .text
        .contains("[Context 1] (Org: KVK Dehradun)\nRelevance Score: 0.650\nPaddy transplanting starts in June.\n"));
}

// ─── Market ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_market_batch_with_one_failure() {
    let crops = vec!["wheat".to_string(), "saffron".to_string()];
    let lookups = gather_market_lookups(&FixedWeb, &crops, "Uttarakhand", Duration::ZERO).await;
    let out = format_market_analysis(&lookups, "Uttarakhand");

    assert!(out.contains("📊 WHEAT\n   Market Information Found: 1 results"));
    assert!(out.contains("Details: Latest prices for wheat market price Uttarakhand..."));
    assert!(out.contains("📊 SAFFRON\n   Status: Error fetching data - HTTP 503"));
}
