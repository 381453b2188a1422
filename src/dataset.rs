//! CSV loading for the crop and scheme tables.
//!
//! Both tables are loaded once at startup. A missing file is not fatal: it
//! is logged and yields an empty table, which the advisory pipeline turns
//! into its "unable to process" message. Individual malformed rows are
//! logged and skipped.

use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

use krishi_context_core::engine::AdvisoryEngine;
use krishi_context_core::models::{CropRecord, SchemeRecord};

use crate::config::Config;

/// Load crop rows, dropping rows without a crop name.
pub fn load_crops(path: &Path) -> Result<Vec<CropRecord>> {
    let rows: Vec<CropRecord> = load_csv(path, "crops")?;
    let total = rows.len();
    let crops: Vec<CropRecord> = rows
        .into_iter()
        .filter(|c| !c.name.trim().is_empty())
        .collect();
    if crops.len() < total {
        tracing::debug!(dropped = total - crops.len(), "dropped crop rows without a name");
    }
    Ok(crops)
}

pub fn load_schemes(path: &Path) -> Result<Vec<SchemeRecord>> {
    load_csv(path, "schemes")
}

/// Load both tables named in the config into an engine.
pub fn load_engine(config: &Config) -> Result<AdvisoryEngine> {
    let crops = load_crops(&config.data.crops_csv)?;
    let schemes = load_schemes(&config.data.schemes_csv)?;
    tracing::info!(
        crops = crops.len(),
        schemes = schemes.len(),
        "loaded advisory datasets"
    );
    Ok(AdvisoryEngine::new(crops, schemes))
}

fn load_csv<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), kind, "dataset file not found; continuing with no rows");
        return Ok(Vec::new());
    }

    let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(path = %path.display(), kind, error = %e, "failed to open dataset; continuing with no rows");
            return Ok(Vec::new());
        }
    };
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!(path = %path.display(), kind, error = %e, "failed to read dataset header; continuing with no rows");
            return Ok(Vec::new());
        }
    };

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // Row numbers are 1-based and exclude the header.
        let mut row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => {
                tracing::warn!(kind, row = i + 1, error = %e, "dataset read failed; keeping rows loaded so far");
                break;
            }
            Err(e) => {
                tracing::warn!(kind, row = i + 1, error = %e, "skipping unreadable row");
                continue;
            }
        };
        // Short rows get empty trailing columns.
        while row.len() < headers.len() {
            row.push_field("");
        }
        match row.deserialize::<T>(Some(&headers)) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(kind, row = i + 1, error = %e, "skipping malformed row");
            }
        }
    }
    Ok(records)
}
