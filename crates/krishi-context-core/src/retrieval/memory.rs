//! In-memory [`SearchBackend`] for tests and offline use.
//!
//! Scores each stored document by the fraction of query terms it contains
//! and reports `1 − fraction` as the distance. Results come back in the
//! batched (nested) shape, the same as a vector database would return.

use std::collections::HashSet;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{SearchBackend, SearchQuery};
use crate::search::{Batched, RawSearchResults};

struct Entry {
    document: String,
    metadata: Map<String, Value>,
    terms: HashSet<String>,
}

/// Term-overlap backend over a list of (document, metadata) entries.
pub struct InMemoryBackend {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn add(&self, document: impl Into<String>, metadata: Map<String, Value>) {
        let document = document.into();
        let terms = tokenize(&document).into_iter().collect();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.push(Entry {
            document,
            metadata,
            terms,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased alphanumeric tokens of at least two characters, deduplicated
/// in first-seen order.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .chars()
        .flat_map(|ch| {
            if ch.is_alphanumeric() {
                ch.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![' ']
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for token in normalized.split_whitespace() {
        if token.chars().count() < 2 {
            continue;
        }
        if seen.insert(token) {
            out.push(token.to_string());
        }
    }
    out
}

fn matches_filters(metadata: &Map<String, Value>, query: &SearchQuery) -> bool {
    query.filters.iter().all(|(key, expected)| match metadata.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == *expected,
    })
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn search(&self, query: &SearchQuery) -> Result<RawSearchResults> {
        let terms = tokenize(&query.text);
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("in-memory index lock poisoned"))?;

        let mut scored: Vec<(f64, &Entry)> = Vec::new();
        if !terms.is_empty() {
            for entry in entries.iter() {
                if !matches_filters(&entry.metadata, query) {
                    continue;
                }
                let overlap = terms.iter().filter(|t| entry.terms.contains(*t)).count();
                if overlap == 0 {
                    continue;
                }
                let distance = 1.0 - overlap as f64 / terms.len() as f64;
                scored.push((distance, entry));
            }
        }

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(query.n_results);

        let documents = scored.iter().map(|(_, e)| Some(e.document.clone())).collect();
        let metadatas = scored.iter().map(|(_, e)| Some(e.metadata.clone())).collect();
        let distances = scored.iter().map(|(d, _)| Some(*d)).collect();

        Ok(RawSearchResults {
            documents: Some(Batched::Nested(vec![documents])),
            metadatas: Batched::Nested(vec![metadatas]),
            distances: Batched::Nested(vec![distances]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::normalize;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn query(text: &str, n: usize) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            n_results: n,
            filters: BTreeMap::new(),
        }
    }

    fn meta(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Wheat, wheat & RICE a 12"),
            vec!["wheat".to_string(), "rice".to_string(), "12".to_string()]
        );
        assert!(tokenize("a b c").is_empty());
    }

    #[tokio::test]
    async fn test_ranked_by_overlap() {
        let backend = InMemoryBackend::new();
        backend.add("rice paddy irrigation", Map::new());
        backend.add("wheat rust control", Map::new());
        backend.add("wheat sowing in rabi", Map::new());
        assert_eq!(backend.len(), 3);

        let raw = backend.search(&query("wheat rust", 5)).await.unwrap();
        assert!(matches!(raw.documents, Some(Batched::Nested(_))));
        let hits = normalize(&raw).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document, "wheat rust control");
        assert_eq!(hits[0].distance, Some(0.0));
        assert_eq!(hits[1].distance, Some(0.5));
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order_and_truncate() {
        let backend = InMemoryBackend::new();
        for i in 0..4 {
            backend.add(format!("maize note {}", i), Map::new());
        }
        let raw = backend.search(&query("maize", 2)).await.unwrap();
        let hits = normalize(&raw).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document, "maize note 0");
        assert_eq!(hits[1].document, "maize note 1");
    }

    #[tokio::test]
    async fn test_filters_exact_match() {
        let backend = InMemoryBackend::new();
        backend.add("crop report", meta(json!({"document_type": "annual_report", "year": 2023})));
        backend.add("crop guide", meta(json!({"document_type": "guide"})));

        let mut q = query("crop", 5);
        q.filters.insert("document_type".to_string(), "annual_report".to_string());
        q.filters.insert("year".to_string(), "2023".to_string());
        let hits = normalize(&backend.search(&q).await.unwrap()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document, "crop report");
    }

    #[tokio::test]
    async fn test_no_overlap_is_empty() {
        let backend = InMemoryBackend::new();
        backend.add("tea gardens", Map::new());
        let raw = backend.search(&query("apple", 5)).await.unwrap();
        assert!(raw.is_empty());
        assert!(normalize(&raw).is_none());
    }
}
