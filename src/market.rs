//! Live market and cultivation-practice lookups through a SearXNG instance.
//!
//! Crops are queried one at a time with a configurable pause between
//! requests. A failed lookup is logged and recorded for that crop only;
//! the rest of the batch still runs.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use krishi_context_core::web::{
    format_cultivation_patterns, format_market_analysis, market_query, pattern_query, CropLookup,
    WebHit,
};

use crate::config::{Config, WebConfig};

/// Web search provider.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebHit>>;
}

/// JSON API client for a SearXNG instance.
pub struct SearxngClient {
    client: reqwest::Client,
    instance_url: String,
    max_results: usize,
}

impl SearxngClient {
    pub fn new(config: &WebConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("krishi/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            instance_url: config.instance_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        })
    }
}

#[async_trait]
impl WebSearch for SearxngClient {
    async fn search(&self, query: &str) -> Result<Vec<WebHit>> {
        let url = format!("{}/search", self.instance_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("categories", "general"),
                ("language", "en"),
                ("safesearch", "1"),
            ])
            .send()
            .await
            .with_context(|| format!("SearXNG request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("SearXNG error {}: {}", status, body_text);
        }

        let json: Value = response.json().await?;
        let mut hits = parse_searxng_response(&json);
        hits.truncate(self.max_results);
        Ok(hits)
    }
}

/// Extract hits from a SearXNG `format=json` response. Entries without a
/// URL are skipped.
pub fn parse_searxng_response(json: &Value) -> Vec<WebHit> {
    let Some(results) = json.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };
    results
        .iter()
        .filter_map(|r| serde_json::from_value::<WebHit>(r.clone()).ok())
        .filter(|hit| !hit.url.is_empty())
        .collect()
}

/// Market lookup for each crop, in order.
pub async fn gather_market_lookups(
    search: &dyn WebSearch,
    crops: &[String],
    region: &str,
    delay: Duration,
) -> Vec<(String, CropLookup)> {
    let mut lookups = Vec::with_capacity(crops.len());
    for (i, crop) in crops.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let query = market_query(crop, region);
        tracing::info!(%query, "searching market data");
        let lookup = match search.search(&query).await {
            Ok(hits) => CropLookup::from_hits(hits),
            Err(e) => {
                tracing::warn!(crop = %crop, error = %e, "market lookup failed");
                CropLookup::Failed(e.to_string())
            }
        };
        lookups.push((crop.clone(), lookup));
    }
    lookups
}

/// Cultivation-practice hits for each crop, in order. Failures yield no hits.
pub async fn gather_cultivation_patterns(
    search: &dyn WebSearch,
    crops: &[String],
    region: &str,
    delay: Duration,
) -> Vec<(String, Vec<WebHit>)> {
    let mut patterns = Vec::with_capacity(crops.len());
    for (i, crop) in crops.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let query = pattern_query(crop, region);
        tracing::info!(%query, "searching cultivation patterns");
        let hits = search.search(&query).await.unwrap_or_else(|e| {
            tracing::warn!(crop = %crop, error = %e, "pattern lookup failed");
            Vec::new()
        });
        patterns.push((crop.clone(), hits));
    }
    patterns
}

/// `krishi market`: print the market block, or the cultivation-pattern
/// block with `patterns`.
pub async fn run_market(config: &Config, crops: &[String], patterns: bool) -> Result<()> {
    let Some(web) = &config.web else {
        bail!("The market command requires a [web] section with instance_url in the config.");
    };
    if crops.is_empty() {
        bail!("At least one --crop is required.");
    }

    let client = SearxngClient::new(web)?;
    let delay = Duration::from_millis(web.delay_ms);

    let out = if patterns {
        let found = gather_cultivation_patterns(&client, crops, &web.region, delay).await;
        format_cultivation_patterns(&found, &web.region)
    } else {
        let lookups = gather_market_lookups(&client, crops, &web.region, delay).await;
        format_market_analysis(&lookups, &web.region)
    };
    print!("{}", out);
    Ok(())
}
