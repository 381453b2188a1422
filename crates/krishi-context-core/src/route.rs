//! Parsing of a model's routing decision.
//!
//! The router prompt asks the model for a JSON object like
//! `{"domain": "annual_report", "reason": "...", "year": "2023", "keywords": [...]}`.
//! Models wrap that object in prose or code fences often enough that the
//! parser takes the outermost `{...}` span and ignores the rest.

use serde::Serialize;
use serde_json::Value;

use crate::retrieval::QueryDomain;

pub const PARSE_FAILURE_REASON: &str = "Failed to parse routing response, defaulting to general";
pub const INVALID_DOMAIN_SUFFIX: &str = " (Invalid domain returned, defaulting to general)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDecision {
    pub domain: QueryDomain,
    pub reason: String,
    pub year: Option<String>,
    pub keywords: Vec<String>,
}

impl RouteDecision {
    /// Parse model output. Never fails; anything unusable routes to
    /// [`QueryDomain::General`].
    pub fn parse(model_text: &str) -> Self {
        let candidate = json_span(model_text).unwrap_or(model_text);
        let object = match serde_json::from_str::<Value>(candidate.trim()) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::debug!("routing response is not a JSON object");
                return Self::fallback();
            }
        };

        let mut reason = object
            .get("reason")
            .map(value_text)
            .unwrap_or_default();

        let domain = match object.get("domain").and_then(Value::as_str).and_then(QueryDomain::from_wire) {
            Some(domain) => domain,
            None => {
                reason.push_str(INVALID_DOMAIN_SUFFIX);
                QueryDomain::General
            }
        };

        let year = object
            .get("year")
            .filter(|v| !v.is_null())
            .map(value_text);

        let keywords = match object.get("keywords") {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            _ => Vec::new(),
        };

        Self {
            domain,
            reason,
            year,
            keywords,
        }
    }

    fn fallback() -> Self {
        Self {
            domain: QueryDomain::General,
            reason: PARSE_FAILURE_REASON.to_string(),
            year: None,
            keywords: Vec::new(),
        }
    }
}

/// Substring from the first `{` to the last `}`, inclusive.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
