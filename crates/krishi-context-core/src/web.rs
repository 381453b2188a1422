//! Prompt blocks built from web-search hits: current market signals and
//! regional cultivation practices for a list of crops.
//!
//! Fetching lives in the application; this module only builds queries and
//! formats what came back.

use serde::{Deserialize, Serialize};

use crate::extract::truncate_chars;

pub const MARKET_SOURCES_SHOWN: usize = 3;
pub const MARKET_SNIPPET_MAX_CHARS: usize = 150;
pub const PATTERN_HITS_SHOWN: usize = 2;
pub const PATTERN_SNIPPET_MAX_CHARS: usize = 200;

pub const MARKET_FOOTER: &str = "=== END MARKET ANALYSIS ===";
pub const PATTERNS_FOOTER: &str = "=== END CULTIVATION PATTERNS ===";
pub const NO_PATTERN_DATA: &str = "No specific pattern data found. Use general practices.";

/// One web search result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebHit {
    pub title: String,
    pub url: String,
    #[serde(alias = "content")]
    pub snippet: String,
}

/// Outcome of one crop's market lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CropLookup {
    Found(Vec<WebHit>),
    NoResults,
    Failed(String),
}

impl CropLookup {
    pub fn from_hits(hits: Vec<WebHit>) -> Self {
        if hits.is_empty() {
            CropLookup::NoResults
        } else {
            CropLookup::Found(hits)
        }
    }
}

pub fn market_query(crop: &str, region: &str) -> String {
    format!("{} market price {}", crop, region)
}

pub fn pattern_query(crop: &str, region: &str) -> String {
    format!("{} cultivation {} best practices timing planting", crop, region)
}

/// Market block: per crop a status line, or the hit count and the first
/// [`MARKET_SOURCES_SHOWN`] sources.
pub fn format_market_analysis(lookups: &[(String, CropLookup)], region: &str) -> String {
    let mut out = format!(
        "\n=== CURRENT MARKET ANALYSIS FOR {} CROPS ===\n\n",
        region.to_uppercase()
    );

    for (crop, lookup) in lookups {
        out.push_str(&format!("📊 {}\n", crop.to_uppercase()));
        match lookup {
            CropLookup::Failed(error) => {
                out.push_str(&format!("   Status: Error fetching data - {}\n", error));
            }
            CropLookup::NoResults => out.push_str("   Status: No recent market data found\n"),
            CropLookup::Found(hits) if hits.is_empty() => {
                out.push_str("   Status: No search results available\n");
            }
            CropLookup::Found(hits) => {
                out.push_str(&format!(
                    "   Market Information Found: {} results\n",
                    hits.len()
                ));
                for (i, hit) in hits.iter().take(MARKET_SOURCES_SHOWN).enumerate() {
                    out.push_str(&format!("\n   Source {}: {}\n", i + 1, hit.title));
                    if !hit.snippet.is_empty() {
                        out.push_str(&format!(
                            "   Details: {}...\n",
                            truncate_chars(&hit.snippet, MARKET_SNIPPET_MAX_CHARS)
                        ));
                    }
                    if !hit.url.is_empty() {
                        out.push_str(&format!("   URL: {}\n", hit.url));
                    }
                }
            }
        }
        out.push('\n');
    }

    out.push_str(MARKET_FOOTER);
    out.push('\n');
    out
}

/// Cultivation-practice block with up to [`PATTERN_HITS_SHOWN`] hits per crop.
pub fn format_cultivation_patterns(patterns: &[(String, Vec<WebHit>)], region: &str) -> String {
    let mut out = format!(
        "\n=== {} CULTIVATION PATTERNS & BEST PRACTICES ===\n\n",
        region.to_uppercase()
    );

    for (crop, hits) in patterns {
        out.push_str(&format!("🌾 {}\n", crop.to_uppercase()));
        if hits.is_empty() {
            out.push_str(&format!("   {}\n", NO_PATTERN_DATA));
        } else {
            out.push_str(&format!("   Recommended Practices (from {} sources):\n", region));
            for hit in hits.iter().take(PATTERN_HITS_SHOWN) {
                if !hit.title.is_empty() {
                    out.push_str(&format!("   • {}\n", hit.title));
                }
                if !hit.snippet.is_empty() {
                    out.push_str(&format!(
                        "     {}...\n",
                        truncate_chars(&hit.snippet, PATTERN_SNIPPET_MAX_CHARS)
                    ));
                }
            }
        }
        out.push('\n');
    }

    out.push_str(PATTERNS_FOOTER);
    out.push('\n');
    out
}
