//! Crop relevance scoring.
//!
//! A crop's relevance is an additive point total built from four factors:
//!
//! | Factor | Points |
//! |--------|--------|
//! | Weather keywords present in the suitability text | `25` per keyword |
//! | Profit margin | `min(40, profit% / 100 × 40)` |
//! | Market demand | `+25` very high, `+15` high, `+10` growing |
//! | Risk text | `−5` pest, `−8` flood / waterlogging |
//!
//! Weights are fixed. The score is not normalized and can be negative.
//! Each triggered factor contributes one entry to the human-readable reason.

use std::fmt;

use crate::extract::extract_percentage;
use crate::models::CropRecord;

/// Weather and soil vocabulary searched for in suitability text.
pub const WEATHER_KEYWORDS: [&str; 17] = [
    "rainfall",
    "rain",
    "wet",
    "humid",
    "temperature",
    "hot",
    "cold",
    "warm",
    "drought",
    "dry",
    "arid",
    "irrigation",
    "moisture",
    "soil",
    "loam",
    "clay",
    "sandy",
];

pub const WEATHER_MATCH_POINTS: f64 = 25.0;
pub const PROFIT_MAX_POINTS: f64 = 40.0;
pub const VERY_HIGH_DEMAND_POINTS: f64 = 25.0;
pub const HIGH_DEMAND_POINTS: f64 = 15.0;
pub const GROWING_DEMAND_POINTS: f64 = 10.0;
pub const PEST_PENALTY: f64 = 5.0;
pub const FLOOD_PENALTY: f64 = 8.0;

/// Reason used when no factor triggered.
pub const DEFAULT_REASON: &str = "Moderate potential";
/// Separator between factor descriptions in a reason string.
pub const REASON_SEPARATOR: &str = " • ";

/// A single contributing factor, in the order it was evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelevanceFactor {
    WeatherMatch(usize),
    HighProfit(f64),
    MediumProfit(f64),
    VeryHighDemand,
    HighDemand,
    GrowingDemand,
    PestRisk,
    FloodRisk,
}

impl fmt::Display for RelevanceFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevanceFactor::WeatherMatch(n) => write!(f, "matches weather ({} factors)", n),
            RelevanceFactor::HighProfit(p) => write!(f, "high profit ({}%)", *p as i64),
            RelevanceFactor::MediumProfit(p) => write!(f, "medium profit ({}%)", *p as i64),
            RelevanceFactor::VeryHighDemand => f.write_str("very high demand"),
            RelevanceFactor::HighDemand => f.write_str("high demand"),
            RelevanceFactor::GrowingDemand => f.write_str("growing demand"),
            RelevanceFactor::PestRisk => f.write_str("pest risk"),
            RelevanceFactor::FloodRisk => f.write_str("flood risk"),
        }
    }
}

/// Score plus the factors that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    pub score: f64,
    pub factors: Vec<RelevanceFactor>,
}

impl Relevance {
    /// Factors joined with [`REASON_SEPARATOR`], or [`DEFAULT_REASON`].
    pub fn reason(&self) -> String {
        if self.factors.is_empty() {
            return DEFAULT_REASON.to_string();
        }
        self.factors
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR)
    }
}

/// Score one crop against a weather keyword vocabulary.
///
/// Each keyword counts at most once, so overlapping terms such as `rain`
/// and `rainfall` both match the text "heavy rainfall".
pub fn score_crop(crop: &CropRecord, weather_keywords: &[&str]) -> Relevance {
    let mut score = 0.0;
    let mut factors = Vec::new();

    let suitability = crop.suitability.to_lowercase();
    let weather_matches = weather_keywords
        .iter()
        .filter(|kw| suitability.contains(&kw.to_lowercase()))
        .count();
    if weather_matches > 0 {
        score += weather_matches as f64 * WEATHER_MATCH_POINTS;
        factors.push(RelevanceFactor::WeatherMatch(weather_matches));
    }

    let profit = extract_percentage(&crop.profit_margin);
    score += PROFIT_MAX_POINTS.min(profit / 100.0 * PROFIT_MAX_POINTS);
    if profit > 50.0 {
        factors.push(RelevanceFactor::HighProfit(profit));
    } else if profit > 30.0 {
        factors.push(RelevanceFactor::MediumProfit(profit));
    }

    let demand = crop.market_demand.to_lowercase();
    if demand.contains("very high") {
        score += VERY_HIGH_DEMAND_POINTS;
        factors.push(RelevanceFactor::VeryHighDemand);
    } else if demand.contains("high") {
        score += HIGH_DEMAND_POINTS;
        factors.push(RelevanceFactor::HighDemand);
    } else if demand.contains("growing") {
        score += GROWING_DEMAND_POINTS;
        factors.push(RelevanceFactor::GrowingDemand);
    }

    let risk = crop.risk_factors.to_lowercase();
    if risk.contains("pest") {
        score -= PEST_PENALTY;
        factors.push(RelevanceFactor::PestRisk);
    }
    if risk.contains("flood") || risk.contains("waterlogging") {
        score -= FLOOD_PENALTY;
        factors.push(RelevanceFactor::FloodRisk);
    }

    Relevance { score, factors }
}
