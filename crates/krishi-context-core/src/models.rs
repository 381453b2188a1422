//! Core data models used throughout Krishi Context.
//!
//! Records mirror the upstream tabular datasets. Every field is an opaque
//! string that defaults to empty when the column is missing; numeric-looking
//! fields are only interpreted by the helpers in [`crate::extract`].

use serde::{Deserialize, Serialize};

/// One row of the crop-economics dataset.
///
/// Column names follow the upstream CSV headers on deserialization and
/// snake_case field names on serialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CropRecord {
    #[serde(rename(deserialize = "Crop Name"))]
    pub name: String,
    #[serde(rename(deserialize = "Land Required (per acre)"))]
    pub land_required: String,
    #[serde(rename(deserialize = "Avg Yield (per acre)"))]
    pub yield_per_acre: String,
    #[serde(rename(deserialize = "Cost of Cultivation (₹)"))]
    pub cultivation_cost: String,
    #[serde(rename(deserialize = "Selling Price (₹/quintal or per kg)"))]
    pub selling_price: String,
    /// Free text such as `"~63%"`.
    #[serde(rename(deserialize = "Avg Profit Margin"))]
    pub profit_margin: String,
    /// Demand tier such as `"Very High"`, `"High"`, `"Growing"`.
    #[serde(rename(deserialize = "Market Demand"))]
    pub market_demand: String,
    /// Weather/soil fit description, scanned for weather keywords.
    #[serde(rename(deserialize = "Suitability (Weather/Soil)"))]
    pub suitability: String,
    #[serde(rename(deserialize = "Risk Factors"))]
    pub risk_factors: String,
    #[serde(rename(deserialize = "Recommended For"))]
    pub recommended_for: String,
}

/// A [`CropRecord`] annotated with its relevance score and reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCrop {
    #[serde(flatten)]
    pub crop: CropRecord,
    /// Additive relevance points; unbounded and may be negative.
    pub score: f64,
    /// Bullet-joined contributing factors, or `"Moderate potential"`.
    pub reason: String,
}

/// One row of the government-scheme dataset.
///
/// The scheme name lives in one of three columns depending on the export
/// (one of them a misspelling); see [`crate::schemes::SCHEME_NAME_FIELDS`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemeRecord {
    pub schemename: String,
    pub schemanme: String,
    pub schemeshorttitle: String,
    pub briefdescription: String,
    pub schemecategory: String,
    pub nodalministryname: String,
    /// Applicable states serialized as text, e.g. `"['Uttarakhand']"` or `"All"`.
    pub beneficiarystate: String,
    pub schemefor: String,
}

impl SchemeRecord {
    /// Look up a column by its upstream header name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "schemename" => &self.schemename,
            "schemanme" => &self.schemanme,
            "schemeshorttitle" => &self.schemeshorttitle,
            "briefdescription" => &self.briefdescription,
            "schemecategory" => &self.schemecategory,
            "nodalministryname" => &self.nodalministryname,
            "beneficiarystate" => &self.beneficiarystate,
            "schemefor" => &self.schemefor,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// A scheme that passed the state and agriculture filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedScheme {
    pub name: String,
    pub short_title: String,
    /// Brief description, cut to [`crate::schemes::DESCRIPTION_MAX_CHARS`].
    pub description: String,
    pub category: String,
    pub ministry: String,
    /// Crop names the scheme was matched against (not used for filtering).
    pub applicable_crops: Vec<String>,
}

/// Live sensor readings accompanying a request. Absent readings render as `N/A`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorReadings {
    /// Soil moisture, percent.
    pub moisture: Option<f64>,
    /// Air temperature, degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
}

impl SensorReadings {
    pub fn moisture_display(&self) -> String {
        reading_display(self.moisture)
    }

    pub fn temperature_display(&self) -> String {
        reading_display(self.temperature)
    }

    pub fn humidity_display(&self) -> String {
        reading_display(self.humidity)
    }
}

fn reading_display(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => "N/A".to_string(),
    }
}
