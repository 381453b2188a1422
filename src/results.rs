//! Offline inspection commands: `krishi format-results` and `krishi route`.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use krishi_context_core::route::RouteDecision;
use krishi_context_core::search::{format_results, normalize, RawSearchResults, NO_RESULTS};

/// Read a raw search payload from a JSON file. Either nesting shape is
/// accepted.
pub fn read_payload(path: &Path) -> Result<RawSearchResults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read search results: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(RawSearchResults::from_value(&value))
}

/// Normalized hits as JSON, or the no-results object.
pub fn results_json(raw: &RawSearchResults) -> Value {
    match normalize(raw) {
        Some(hits) => json!({ "results": hits }),
        None => json!({ "results": [], "message": NO_RESULTS }),
    }
}

pub fn run_format_results(path: &Path, max: usize, as_json: bool) -> Result<()> {
    let raw = read_payload(path)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&results_json(&raw))?);
    } else {
        println!("{}", format_results(&raw, max));
    }
    Ok(())
}

pub fn run_route(text: &str) -> Result<()> {
    let decision = RouteDecision::parse(text);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_results_json_sentinel() {
        let v = results_json(&RawSearchResults::default());
        assert_eq!(v["results"], json!([]));
        assert_eq!(v["message"], "No relevant context found.");
    }

    #[test]
    fn test_read_payload_nested() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("raw.json");
        fs::write(
            &path,
            r#"{"ids": [["1"]], "documents": [["Apple scab control"]], "metadatas": [[{"organization": "ICAR"}]], "distances": [[0.3]]}"#,
        )
        .unwrap();

        let raw = read_payload(&path).unwrap();
        let v = results_json(&raw);
        assert_eq!(v["results"][0]["document"], "Apple scab control");
        assert_eq!(v["results"][0]["metadata"]["organization"], "ICAR");
    }

    #[test]
    fn test_read_payload_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("raw.json");
        fs::write(&path, "not json").unwrap();
        let err = read_payload(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
