//! Prioritized context assembly.
//!
//! Builds the single text block handed to the language model. The block is
//! a fixed sequence of [`Section`]s in [`SECTION_ORDER`]; models weight
//! earlier context more heavily, so the order is part of the contract.
//! Every section is always rendered once ranking succeeds, with an explicit
//! "none found" message when it has nothing to show.
//!
//! # Pipeline
//!
//! 1. Rank crops ([`rank_crops`]). An empty ranking short-circuits with
//!    [`UNABLE_TO_PROCESS`].
//! 2. Match schemes for the state against the ranked crop names.
//! 3. Render the recommendation and comparison views.
//! 4. Concatenate the sections with banners.

use crate::compare::{or_fallback, render_comparison, render_recommendations};
use crate::extract::extract_percentage;
use crate::models::{CropRecord, MatchedScheme, SchemeRecord, ScoredCrop, SensorReadings};
use crate::rank::{rank_crops, DEFAULT_TOP_CROPS};
use crate::schemes::{match_schemes, DEFAULT_STATE};

/// Returned instead of a context when no crop could be ranked.
pub const UNABLE_TO_PROCESS: &str = "Unable to process weather data. Please try again.";

pub const NO_SCHEMES_FOUND: &str =
    "No specific schemes found for selected crops. Check with local agriculture department.";

const HEAVY_RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str =
    "───────────────────────────────────────────────────────────────────────────────";

/// Named sections of the prioritized context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CurrentConditions,
    RecommendedCrops,
    Comparison,
    Schemes,
    KeyRecommendations,
    CropDetails,
}

/// Render order, most important first.
pub const SECTION_ORDER: [Section; 6] = [
    Section::CurrentConditions,
    Section::RecommendedCrops,
    Section::Comparison,
    Section::Schemes,
    Section::KeyRecommendations,
    Section::CropDetails,
];

impl Section {
    /// Stable text that appears in the section's banner and nowhere else.
    pub fn marker(&self) -> &'static str {
        match self {
            Section::CurrentConditions => "CURRENT CONDITIONS",
            Section::RecommendedCrops => "RECOMMENDED CROPS",
            Section::Comparison => "CROP COMPARISON TABLE",
            Section::Schemes => "GOVERNMENT SCHEMES",
            Section::KeyRecommendations => "KEY RECOMMENDATIONS",
            Section::CropDetails => "DETAILED CROP INFORMATION",
        }
    }

    fn heading(&self, crop_count: usize, state: &str) -> String {
        match self {
            Section::CurrentConditions => {
                format!("{} (Priority 1 - Most Important)", self.marker())
            }
            Section::RecommendedCrops => format!(
                "TOP {} {} FOR CURRENT WEATHER (Priority 2)",
                crop_count,
                self.marker()
            ),
            Section::Comparison => format!(
                "COMPREHENSIVE {} (Priority 3 - For Farmer Decision Making)",
                self.marker()
            ),
            Section::Schemes => format!(
                "APPLICABLE {} FOR {} (Priority 4)",
                self.marker(),
                state.to_uppercase()
            ),
            Section::KeyRecommendations => format!("{} & INSIGHTS (Priority 5)", self.marker()),
            Section::CropDetails => format!("{} (Full Data for Model Analysis)", self.marker()),
        }
    }
}

/// Inputs for one assembly call.
#[derive(Debug, Clone)]
pub struct AssemblyRequest<'a> {
    /// Free-form weather description from the client.
    pub weather_context: &'a str,
    pub sensors: SensorReadings,
    /// Target state for scheme matching.
    pub state: &'a str,
    /// How many ranked crops to include.
    pub top_crops: usize,
}

impl<'a> AssemblyRequest<'a> {
    /// Request with the default state and crop count.
    pub fn new(weather_context: &'a str, sensors: SensorReadings) -> Self {
        Self {
            weather_context,
            sensors,
            state: DEFAULT_STATE,
            top_crops: DEFAULT_TOP_CROPS,
        }
    }
}

/// Assemble the prioritized context from the loaded datasets.
pub fn assemble_context(
    crops: &[CropRecord],
    schemes: &[SchemeRecord],
    req: &AssemblyRequest<'_>,
) -> String {
    let ranked = rank_crops(crops, req.weather_context, req.top_crops);
    if ranked.is_empty() {
        tracing::warn!(
            crops = crops.len(),
            top_crops = req.top_crops,
            "no crops ranked; returning fallback message"
        );
        return UNABLE_TO_PROCESS.to_string();
    }

    let crop_names: Vec<String> = ranked.iter().map(|c| c.crop.name.clone()).collect();
    let matched = match_schemes(schemes, &crop_names, req.state);

    let mut out = String::new();
    out.push('\n');
    out.push_str(HEAVY_RULE);
    out.push_str(&format!(
        "\nPRIORITIZED CROP ADVISORY CONTEXT FOR {}\n",
        req.state.to_uppercase()
    ));

    for section in SECTION_ORDER {
        out.push_str(HEAVY_RULE);
        out.push('\n');
        out.push_str(&section.heading(ranked.len(), req.state));
        out.push('\n');
        out.push_str(LIGHT_RULE);
        out.push('\n');
        let body = match section {
            Section::CurrentConditions => render_conditions(req),
            Section::RecommendedCrops => render_recommendations(&ranked),
            Section::Comparison => render_comparison(&ranked),
            Section::Schemes => format!(
                "Total Available Schemes: {}\n\n{}",
                matched.len(),
                render_schemes(&matched)
            ),
            Section::KeyRecommendations => render_insights(&ranked, matched.len(), &req.sensors),
            Section::CropDetails => render_details(&ranked),
        };
        out.push_str(&body);
        out.push_str("\n\n");
    }
    out.push_str(HEAVY_RULE);
    out.push('\n');

    tracing::debug!(
        crops = ranked.len(),
        schemes = matched.len(),
        chars = out.len(),
        "assembled prioritized context"
    );
    out
}

fn render_conditions(req: &AssemblyRequest<'_>) -> String {
    format!(
        "{}\n\nSensor Status: Moisture {}%, Temperature {}°C, Humidity {}%\n   (Use these readings to refine crop soil requirements if available)",
        req.weather_context,
        req.sensors.moisture_display(),
        req.sensors.temperature_display(),
        req.sensors.humidity_display(),
    )
}

/// Render matched schemes, or [`NO_SCHEMES_FOUND`].
pub fn render_schemes(schemes: &[MatchedScheme]) -> String {
    if schemes.is_empty() {
        return NO_SCHEMES_FOUND.to_string();
    }

    let blocks: Vec<String> = schemes
        .iter()
        .enumerate()
        .map(|(i, scheme)| {
            let title = or_fallback(&scheme.short_title, &scheme.name);
            let crops = if scheme.applicable_crops.is_empty() {
                "Selected crops".to_string()
            } else {
                scheme.applicable_crops.join(", ")
            };
            let mut block = format!("{}. **{}**\n", i + 1, title);
            if !scheme.description.trim().is_empty() {
                block.push_str(&format!("   ├─ Details: {}\n", scheme.description.trim()));
            }
            block.push_str(&format!(
                "   ├─ Category: {}\n   ├─ Ministry: {}\n   ├─ Applicable to: {}\n   └─ For more info: Contact local agriculture office\n",
                or_fallback(&scheme.category, "General"),
                or_fallback(&scheme.ministry, "Unknown"),
                crops,
            ));
            block
        })
        .collect();
    blocks.join("\n")
}

/// The crop with the highest profit margin; the earliest-ranked wins ties.
fn most_profitable(ranked: &[ScoredCrop]) -> Option<(&ScoredCrop, f64)> {
    ranked
        .iter()
        .map(|c| (c, extract_percentage(&c.crop.profit_margin)))
        .fold(None, |best, (crop, profit)| match best {
            Some((_, best_profit)) if best_profit >= profit => best,
            _ => Some((crop, profit)),
        })
}

fn render_insights(ranked: &[ScoredCrop], scheme_count: usize, sensors: &SensorReadings) -> String {
    let profit_line = match most_profitable(ranked) {
        Some((crop, profit)) => format!(
            "{} offers {}% profit margin",
            or_fallback(&crop.crop.name, "Unknown"),
            profit
        ),
        None => "No profit data available".to_string(),
    };

    [
        "1. **Weather Match**: All crops above are suitable for current weather conditions"
            .to_string(),
        format!("2. **Most Profitable**: {}", profit_line),
        "3. **Market Opportunity**: Focus on crops with \"Very High\" or \"High\" market demand for better returns".to_string(),
        format!(
            "4. **Government Support**: {} schemes are available for subsidies and financial assistance",
            scheme_count
        ),
        "5. **Risk Management**: Consider risk factors listed - diversify if possible".to_string(),
        format!(
            "6. **Sensor Data Integration**: Check current soil moisture ({}%) and temperature ({}°C) against the top recommended crops",
            sensors.moisture_display(),
            sensors.temperature_display()
        ),
    ]
    .join("\n")
}

fn render_details(ranked: &[ScoredCrop]) -> String {
    let mut lines = Vec::new();
    for scored in ranked {
        let crop = &scored.crop;
        lines.push(format!("\n**{}**", or_fallback(&crop.name, "Unknown")));
        let fields = [
            ("Land Required", &crop.land_required),
            ("Avg Yield", &crop.yield_per_acre),
            ("Cultivation Cost", &crop.cultivation_cost),
            ("Selling Price", &crop.selling_price),
            ("Profit Margin", &crop.profit_margin),
            ("Market Demand", &crop.market_demand),
            ("Weather/Soil Suitability", &crop.suitability),
            ("Risk Factors", &crop.risk_factors),
            ("Recommended For", &crop.recommended_for),
        ];
        for (label, value) in fields {
            lines.push(format!("   • {}: {}", label, or_fallback(value, "N/A")));
        }
    }
    lines.join("\n")
}
