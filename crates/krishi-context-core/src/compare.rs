//! Compact renderings of a ranked crop list.
//!
//! Two independent views are produced from the same ranking:
//!
//! - [`render_recommendations`]: ranked list with yield, profit, demand and
//!   the relevance reason.
//! - [`render_comparison`]: flat key-value comparison (no markdown tables,
//!   which models tend to mangle) with formatted cost and a short risk note.

use crate::extract::{extract_numeric_value, extract_percentage, format_rupees, truncate_chars};
use crate::models::ScoredCrop;

/// Longest risk note shown in the comparison view.
pub const RISK_NOTE_MAX_CHARS: usize = 40;

pub const NO_CROPS_FOR_COMPARISON: &str = "No crops available for comparison.";

/// `value` trimmed, or `fallback` when blank.
pub(crate) fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

/// First comma-separated risk, cut to [`RISK_NOTE_MAX_CHARS`]; `"Low"` when
/// no risk text is recorded.
pub fn risk_note(risk_factors: &str) -> String {
    let trimmed = risk_factors.trim();
    if trimmed.is_empty() {
        return "Low".to_string();
    }
    let first = trimmed.split(',').next().unwrap_or(trimmed);
    truncate_chars(first, RISK_NOTE_MAX_CHARS)
}

/// Ranked recommendation view, one block per crop.
pub fn render_recommendations(crops: &[ScoredCrop]) -> String {
    let blocks: Vec<String> = crops
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            let crop = &scored.crop;
            let profit = extract_percentage(&crop.profit_margin);
            format!(
                "{}. **{}**\n   ├─ Yield: {}\n   ├─ Profit Margin: {}%\n   ├─ Market Demand: {}\n   └─ Reason: {}\n",
                i + 1,
                or_fallback(&crop.name, "Unknown"),
                or_fallback(&crop.yield_per_acre, "N/A"),
                profit as i64,
                or_fallback(&crop.market_demand, "N/A"),
                scored.reason,
            )
        })
        .collect();
    blocks.join("\n")
}

/// Flat comparison view used for side-by-side decisions.
pub fn render_comparison(crops: &[ScoredCrop]) -> String {
    if crops.is_empty() {
        return NO_CROPS_FOR_COMPARISON.to_string();
    }

    let blocks: Vec<String> = crops
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            let crop = &scored.crop;
            let cost = extract_numeric_value(&crop.cultivation_cost);
            let profit = extract_percentage(&crop.profit_margin);
            format!(
                "\n{}. {}\n   • Yield per acre: {}\n   • Cost of cultivation: {}\n   • Profit margin: {}%\n   • Market demand: {}\n   • Risk factor: {}",
                i + 1,
                or_fallback(&crop.name, "Unknown"),
                or_fallback(&crop.yield_per_acre, "N/A"),
                format_rupees(cost),
                profit as i64,
                or_fallback(&crop.market_demand, "N/A"),
                risk_note(&crop.risk_factors),
            )
        })
        .collect();
    blocks.join("\n")
}
