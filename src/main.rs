//! # Krishi CLI (`krishi`)
//!
//! Command-line front end for the prioritized agricultural context builder.
//!
//! ## Usage
//!
//! ```bash
//! krishi --config ./config/krishi.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `krishi rank --weather "<text>"` | Rank crops for the weather |
//! | `krishi schemes --crop Wheat` | List matched government schemes |
//! | `krishi context --weather "<text>"` | Print the full prioritized context |
//! | `krishi format-results <file>` | Format a raw vector-search payload |
//! | `krishi route "<model output>"` | Parse a routing decision |
//! | `krishi market --crop wheat` | Live market lookup via SearXNG |
//!
//! ## Examples
//!
//! ```bash
//! # Context for a humid monsoon week, with sensor readings
//! krishi context --weather "heavy monsoon rain, humid" --moisture 38 --temperature 27
//!
//! # Only the top three crops
//! krishi rank --weather "cold and dry" --top 3
//!
//! # Cultivation practices for two crops
//! krishi market --crop ginger --crop apple --patterns
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use krishi_context::{advise, config, dataset, market, results};
use krishi_context_core::models::SensorReadings;
use krishi_context_core::search::DEFAULT_MAX_RESULTS;

/// Krishi CLI: prioritized agricultural prompt context from crop, scheme,
/// search, and market data.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/krishi.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "krishi",
    about = "Krishi — prioritized agricultural context for advisory assistants",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/krishi.toml`. Dataset paths, the advisory
    /// state, and the optional SearXNG instance are read from this file.
    #[arg(long, global = true, default_value = "./config/krishi.toml")]
    config: PathBuf,

    /// Log at debug level, overriding the config file and `RUST_LOG`.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank crops by relevance to a weather description.
    Rank {
        /// Free-form weather description.
        #[arg(long)]
        weather: String,

        /// Number of crops to show. Defaults to `advisory.top_crops`.
        #[arg(long)]
        top: Option<usize>,
    },

    /// List government schemes matched for a state.
    Schemes {
        /// Target state. Defaults to `advisory.state`.
        #[arg(long)]
        state: Option<String>,

        /// Crop names attached to each matched scheme (repeatable).
        #[arg(long = "crop")]
        crops: Vec<String>,
    },

    /// Print the full prioritized context for a weather description.
    Context {
        #[arg(long)]
        weather: String,

        /// Soil moisture, percent.
        #[arg(long)]
        moisture: Option<f64>,

        /// Air temperature, °C.
        #[arg(long)]
        temperature: Option<f64>,

        /// Relative humidity, percent.
        #[arg(long)]
        humidity: Option<f64>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        top: Option<usize>,
    },

    /// Format a raw vector-search payload (JSON, flat or batched).
    ///
    /// Does not require a config file.
    FormatResults {
        /// Path to the JSON payload.
        file: PathBuf,

        /// Maximum documents to render. Defaults to `retrieval.max_results`.
        #[arg(long)]
        max: Option<usize>,

        /// Print normalized hits as JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// Parse a model's routing response and print the decision as JSON.
    ///
    /// Does not require a config file.
    Route {
        /// Raw model output.
        text: String,
    },

    /// Look up current market data or cultivation practices for crops.
    ///
    /// Requires a `[web]` section in the config.
    Market {
        /// Crop to look up (repeatable).
        #[arg(long = "crop", required = true)]
        crops: Vec<String>,

        /// Show cultivation patterns instead of market prices.
        #[arg(long)]
        patterns: bool,
    },
}

fn init_tracing(verbose: bool, level: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = config::load_config(&cli.config);
    init_tracing(
        cli.verbose,
        loaded.as_ref().ok().map(|c| c.logging.level.as_str()),
    );

    // Commands that don't require config
    match cli.command {
        Commands::FormatResults { file, max, json } => {
            let max = max
                .or_else(|| loaded.as_ref().ok().map(|c| c.retrieval.max_results))
                .unwrap_or(DEFAULT_MAX_RESULTS);
            results::run_format_results(&file, max, json)?;
        }
        Commands::Route { text } => results::run_route(&text)?,
        command => run_with_config(command, &loaded?).await?,
    }

    Ok(())
}

async fn run_with_config(command: Commands, cfg: &config::Config) -> anyhow::Result<()> {
    match command {
        Commands::Rank { weather, top } => {
            let engine = dataset::load_engine(cfg)?;
            advise::run_rank(&engine, &weather, top.unwrap_or(cfg.advisory.top_crops))?;
        }
        Commands::Schemes { state, crops } => {
            let engine = dataset::load_engine(cfg)?;
            let state = state.unwrap_or_else(|| cfg.advisory.state.clone());
            advise::run_schemes(&engine, &state, &crops)?;
        }
        Commands::Context {
            weather,
            moisture,
            temperature,
            humidity,
            state,
            top,
        } => {
            let engine = dataset::load_engine(cfg)?;
            let sensors = SensorReadings {
                moisture,
                temperature,
                humidity,
            };
            let state = state.unwrap_or_else(|| cfg.advisory.state.clone());
            advise::run_context(
                &engine,
                &weather,
                sensors,
                &state,
                top.unwrap_or(cfg.advisory.top_crops),
            )?;
        }
        Commands::Market { crops, patterns } => {
            market::run_market(cfg, &crops, patterns).await?;
        }
        Commands::FormatResults { .. } | Commands::Route { .. } => {}
    }
    Ok(())
}
