//! Normalization and formatting of vector/web search payloads.
//!
//! Search backends return three positionally aligned arrays: documents,
//! metadata maps, and distances. Batched backends wrap each array in an
//! extra single-element list (`[["a", "b"]]` instead of `["a", "b"]`).
//! [`Batched`] accepts both shapes and every accessor here goes through
//! the unwrapped slice, so callers never index a nested list by mistake.
//!
//! Metadata and distance arrays may be shorter than the document list;
//! missing entries read as an empty map and no distance. An absent
//! `documents` key is kept distinct from an empty list, see
//! [`RawSearchResults::has_documents_key`].
//!
//! # Relevance
//!
//! `relevance = 1 − distance`, which is only meaningful for cosine
//! distances in `[0, 1]`. Other metrics produce out-of-range values; they
//! are reported as-is, not clamped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NO_RESULTS: &str = "No relevant context found.";
pub const CONTEXT_HEADER: &str = "=== RELEVANT CONTEXT ===";
pub const CONTEXT_FOOTER: &str = "=== END CONTEXT ===";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Metadata keys shown in a source descriptor, with their labels.
pub const SOURCE_FIELDS: [(&str, &str); 4] = [
    ("organization", "Org"),
    ("document_type", "Type"),
    ("filename", "File"),
    ("page_number", "Page"),
];

/// An array that may arrive flat or wrapped in a batch list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Batched<T> {
    Nested(Vec<Vec<T>>),
    Flat(Vec<T>),
}

impl<T> Batched<T> {
    /// The first batch of a nested array, or the flat array itself.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Batched::Nested(batches) => batches.first().map(Vec::as_slice).unwrap_or(&[]),
            Batched::Flat(items) => items,
        }
    }
}

impl<T> Default for Batched<T> {
    fn default() -> Self {
        Batched::Flat(Vec::new())
    }
}

/// Raw payload as returned by a search backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawSearchResults {
    pub documents: Option<Batched<Option<String>>>,
    pub metadatas: Batched<Option<Map<String, Value>>>,
    pub distances: Batched<Option<f64>>,
}

impl RawSearchResults {
    /// Build from a flat list of documents with aligned metadata and distances.
    pub fn flat(
        documents: Vec<String>,
        metadatas: Vec<Map<String, Value>>,
        distances: Vec<f64>,
    ) -> Self {
        Self {
            documents: Some(Batched::Flat(documents.into_iter().map(Some).collect())),
            metadatas: Batched::Flat(metadatas.into_iter().map(Some).collect()),
            distances: Batched::Flat(distances.into_iter().map(Some).collect()),
        }
    }

    /// Parse an arbitrary JSON payload field by field.
    ///
    /// A field with an unexpected shape is logged and treated as empty, so
    /// a malformed `distances` array does not discard the documents.
    pub fn from_value(value: &Value) -> Self {
        fn field<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Batched<T> {
            match value.get(key) {
                None | Some(Value::Null) => Batched::default(),
                Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
                    tracing::warn!(field = key, error = %e, "ignoring malformed search field");
                    Batched::default()
                }),
            }
        }

        Self {
            documents: match value.get("documents") {
                None | Some(Value::Null) => None,
                Some(_) => Some(field(value, "documents")),
            },
            metadatas: field(value, "metadatas"),
            distances: field(value, "distances"),
        }
    }

    /// Documents after unwrapping.
    pub fn documents(&self) -> &[Option<String>] {
        self.documents.as_ref().map(Batched::as_slice).unwrap_or(&[])
    }

    /// Whether the backend sent a `documents` field at all, even an empty one.
    pub fn has_documents_key(&self) -> bool {
        self.documents.is_some()
    }

    /// Metadata at `i`, or `None` past the end of the metadata array.
    pub fn metadata_at(&self, i: usize) -> Option<&Map<String, Value>> {
        self.metadatas.as_slice().get(i).and_then(Option::as_ref)
    }

    /// Distance at `i`, or `None` past the end of the distance array.
    pub fn distance_at(&self, i: usize) -> Option<f64> {
        self.distances.as_slice().get(i).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }
}

/// One normalized (document, metadata, distance) triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub document: String,
    pub metadata: Map<String, Value>,
    pub distance: Option<f64>,
}

impl SearchHit {
    /// `1 − distance`, when a distance is known.
    pub fn relevance(&self) -> Option<f64> {
        self.distance.map(|d| 1.0 - d)
    }

    /// Pipe-separated provenance built from [`SOURCE_FIELDS`], or
    /// [`UNKNOWN_SOURCE`] when none are present.
    pub fn source_descriptor(&self) -> String {
        source_descriptor(&self.metadata)
    }
}

/// Flatten a payload into aligned triples.
///
/// Returns `None` (the "no results" case) when there are no documents.
/// Every document is kept, including blank ones; [`format_results`] is the
/// place that skips blanks.
pub fn normalize(raw: &RawSearchResults) -> Option<Vec<SearchHit>> {
    let documents = raw.documents();
    if documents.is_empty() {
        return None;
    }

    let hits = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| SearchHit {
            document: doc.clone().unwrap_or_default(),
            metadata: raw.metadata_at(i).cloned().unwrap_or_default(),
            distance: raw.distance_at(i),
        })
        .collect();
    Some(hits)
}

/// Render up to `max_results` documents between [`CONTEXT_HEADER`] and
/// [`CONTEXT_FOOTER`], or [`NO_RESULTS`] when there are no documents.
///
/// Blank documents are skipped but still count toward `max_results`, and
/// chunk labels keep the document's original position.
pub fn format_results(raw: &RawSearchResults, max_results: usize) -> String {
    let Some(hits) = normalize(raw) else {
        return NO_RESULTS.to_string();
    };

    let mut parts = vec![format!("{}\n", CONTEXT_HEADER)];
    for (i, hit) in hits.iter().take(max_results).enumerate() {
        let text = hit.document.trim();
        if text.is_empty() {
            continue;
        }
        parts.push(format!("[Context {}] ({})", i + 1, hit.source_descriptor()));
        if let Some(relevance) = hit.relevance() {
            parts.push(format!("Relevance Score: {:.3}", relevance));
        }
        parts.push(format!("{}\n", text));
    }
    parts.push(CONTEXT_FOOTER.to_string());
    parts.join("\n")
}

/// See [`SearchHit::source_descriptor`].
pub fn source_descriptor(metadata: &Map<String, Value>) -> String {
    let parts: Vec<String> = SOURCE_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            metadata
                .get(*key)
                .filter(|v| is_present(v))
                .map(|v| format!("{}: {}", label, display_value(v)))
        })
        .collect();
    if parts.is_empty() {
        UNKNOWN_SOURCE.to_string()
    } else {
        parts.join(" | ")
    }
}

/// Null, `false`, zero, and empty strings/collections count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> RawSearchResults {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_nested_shape_unwrapped() {
        let raw = parse(json!({
            "documents": [["a", "b"]],
            "metadatas": [[{}, {}]],
            "distances": [[0.1, 0.9]]
        }));
        let hits = normalize(&raw).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document, "a");
        assert!((hits[0].relevance().unwrap() - 0.9).abs() < 1e-9);
        assert!((hits[1].relevance().unwrap() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_flat_shape() {
        let raw = parse(json!({
            "documents": ["a", "b"],
            "metadatas": [{"organization": "FAO"}],
            "distances": [0.25]
        }));
        let hits = normalize(&raw).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source_descriptor(), "Org: FAO");
        assert_eq!(hits[1].metadata, Map::new());
        assert_eq!(hits[1].distance, None);
    }

    #[test]
    fn test_empty_documents_sentinel() {
        let raw = parse(json!({"documents": []}));
        assert!(normalize(&raw).is_none());
        assert_eq!(format_results(&raw, 5), "No relevant context found.");
    }

    #[test]
    fn test_missing_documents_sentinel() {
        let raw = parse(json!({}));
        assert!(!raw.has_documents_key());
        assert_eq!(format_results(&raw, 5), NO_RESULTS);
        assert!(parse(json!({"documents": []})).has_documents_key());
        assert!(!RawSearchResults::from_value(&json!({"documents": null})).has_documents_key());
        let nested_empty = parse(json!({"documents": [[]]}));
        assert_eq!(format_results(&nested_empty, 5), NO_RESULTS);
    }

    #[test]
    fn test_from_value_tolerates_bad_fields() {
        let raw = RawSearchResults::from_value(&json!({
            "documents": [["kept"]],
            "distances": "not-a-list",
            "metadatas": null
        }));
        let hits = normalize(&raw).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, None);
    }

    #[test]
    fn test_null_entries() {
        let raw = parse(json!({
            "documents": ["a", null],
            "metadatas": [null, {"filename": "x.pdf"}],
            "distances": [null, 0.5]
        }));
        let hits = normalize(&raw).unwrap();
        assert_eq!(hits[0].distance, None);
        assert_eq!(hits[1].document, "");
        assert_eq!(hits[1].source_descriptor(), "File: x.pdf");
    }

    #[test]
    fn test_source_descriptor_order_and_default() {
        let meta = json!({
            "page_number": 12,
            "filename": "report.pdf",
            "organization": "ICAR",
            "document_type": "annual_report",
            "language": "en"
        });
        let meta = meta.as_object().unwrap();
        assert_eq!(
            source_descriptor(meta),
            "Org: ICAR | Type: annual_report | File: report.pdf | Page: 12"
        );
        assert_eq!(source_descriptor(&Map::new()), UNKNOWN_SOURCE);

        let zero_page = json!({"page_number": 0, "organization": ""});
        assert_eq!(source_descriptor(zero_page.as_object().unwrap()), UNKNOWN_SOURCE);
    }

    #[test]
    fn test_format_skips_blank_and_keeps_positions() {
        let raw = RawSearchResults::flat(
            vec!["first".into(), "   ".into(), " third ".into()],
            vec![],
            vec![0.2, 0.3, 0.4],
        );
        let out = format_results(&raw, 5);
        assert!(out.starts_with(CONTEXT_HEADER));
        assert!(out.ends_with(CONTEXT_FOOTER));
        assert!(out.contains("[Context 1] (Unknown source)\nRelevance Score: 0.800\nfirst\n"));
        assert!(!out.contains("[Context 2]"));
        assert!(out.contains("[Context 3] (Unknown source)\nRelevance Score: 0.600\nthird\n"));
    }

    #[test]
    fn test_format_respects_max_results() {
        let raw = RawSearchResults::flat(
            (0..10).map(|i| format!("doc {}", i)).collect(),
            vec![],
            vec![],
        );
        let out = format_results(&raw, 3);
        assert!(out.contains("[Context 3]"));
        assert!(!out.contains("[Context 4]"));
        assert!(!out.contains("Relevance Score"));
    }

    #[test]
    fn test_out_of_range_distance_not_clamped() {
        let raw = RawSearchResults::flat(vec!["a".into()], vec![], vec![1.75]);
        let hits = normalize(&raw).unwrap();
        assert!((hits[0].relevance().unwrap() + 0.75).abs() < 1e-9);
        assert!(format_results(&raw, 1).contains("Relevance Score: -0.750"));
    }
}
