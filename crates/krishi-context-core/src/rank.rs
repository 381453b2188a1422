//! Crop ranking.
//!
//! Scores every crop with [`score_crop`] against the fixed
//! [`WEATHER_KEYWORDS`] vocabulary, sorts by score (descending), and keeps
//! the first `top_n`. The sort is stable: crops with equal scores keep
//! their dataset order.

use std::cmp::Ordering;

use crate::models::{CropRecord, ScoredCrop};
use crate::scoring::{score_crop, WEATHER_KEYWORDS};

/// Number of crops kept when the caller does not choose.
pub const DEFAULT_TOP_CROPS: usize = 10;

/// Rank crops for the given weather conditions.
///
/// `weather_context` is accepted for the caller's display purposes only;
/// scoring uses the static keyword vocabulary, not the weather text. An
/// empty input yields an empty ranking, which callers must treat as
/// "unable to process" rather than proceed.
pub fn rank_crops(crops: &[CropRecord], weather_context: &str, top_n: usize) -> Vec<ScoredCrop> {
    tracing::debug!(
        crops = crops.len(),
        top_n,
        weather_len = weather_context.len(),
        "ranking crops"
    );

    let mut ranked: Vec<ScoredCrop> = crops
        .iter()
        .map(|crop| {
            let relevance = score_crop(crop, &WEATHER_KEYWORDS);
            ScoredCrop {
                crop: crop.clone(),
                score: relevance.score,
                reason: relevance.reason(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop(name: &str, suitability: &str, profit: &str, demand: &str) -> CropRecord {
        CropRecord {
            name: name.to_string(),
            suitability: suitability.to_string(),
            profit_margin: profit.to_string(),
            market_demand: demand.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_crops(&[], "any weather", 10).is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let crops = vec![
            crop("Low", "", "10%", ""),
            crop("High", "loam soil", "60%", "Very High"),
            crop("Mid", "", "40%", "High"),
        ];
        let ranked = rank_crops(&crops, "", 10);
        let names: Vec<&str> = ranked.iter().map(|c| c.crop.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let crops: Vec<CropRecord> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| crop(n, "clay", "20%", "Growing"))
            .collect();
        let ranked = rank_crops(&crops, "", 10);
        let names: Vec<&str> = ranked.iter().map(|c| c.crop.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let crops: Vec<CropRecord> = (0..15)
            .map(|i| crop(&format!("crop-{}", i), "", &format!("{}%", i), ""))
            .collect();
        let ranked = rank_crops(&crops, "", DEFAULT_TOP_CROPS);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].crop.name, "crop-14");
    }

    #[test]
    fn test_weather_text_does_not_change_scores() {
        let crops = vec![crop("Rice", "wet, humid", "50%", "High")];
        let a = rank_crops(&crops, "dry and hot", 1);
        let b = rank_crops(&crops, "", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_three_row_end_to_end() {
        let crops = vec![
            crop("Wheat", "cool climate", "20%", "Medium"),
            crop("Ginger", "warm, humid hills", "70%", "Very High"),
            crop("Barley", "", "35%", "Stable"),
        ];
        let ranked = rank_crops(&crops, "monsoon", 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].crop.name, "Ginger");
        assert!((ranked[0].score - 103.0).abs() < 1e-9);
        assert!(ranked[0].reason.contains("matches weather (2 factors)"));
        assert!(ranked[0].reason.contains("high profit (70%)"));
        assert!(ranked[0].reason.contains("very high demand"));
    }
}
