//! Advisory commands: `krishi rank`, `krishi schemes`, `krishi context`.

use anyhow::Result;

use krishi_context_core::assemble::{render_schemes, AssemblyRequest};
use krishi_context_core::engine::AdvisoryEngine;
use krishi_context_core::extract::format_number;
use krishi_context_core::models::{ScoredCrop, SensorReadings};

/// One ranked line per crop: rank, score, name, reason.
pub fn format_ranking(ranked: &[ScoredCrop], total: usize) -> String {
    if ranked.is_empty() {
        return "No crops ranked.\n".to_string();
    }
    let mut out = format!(
        "Top {} of {} crops:\n\n",
        ranked.len(),
        format_number(total as u64)
    );
    for (i, scored) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. [{:>6.1}] {}\n      {}\n",
            i + 1,
            scored.score,
            scored.crop.name,
            scored.reason
        ));
    }
    out
}

pub fn run_rank(engine: &AdvisoryEngine, weather: &str, top: usize) -> Result<()> {
    let ranked = engine.rank(weather, top);
    print!("{}", format_ranking(&ranked, engine.crops().len()));
    Ok(())
}

pub fn run_schemes(engine: &AdvisoryEngine, state: &str, crops: &[String]) -> Result<()> {
    let matched = engine.match_schemes(crops, state);
    println!("Matched {} schemes for {}:\n", matched.len(), state);
    println!("{}", render_schemes(&matched));
    Ok(())
}

pub fn run_context(
    engine: &AdvisoryEngine,
    weather: &str,
    sensors: SensorReadings,
    state: &str,
    top: usize,
) -> Result<()> {
    let req = AssemblyRequest {
        weather_context: weather,
        sensors,
        state,
        top_crops: top,
    };
    print!("{}", engine.assemble(&req));
    Ok(())
}
