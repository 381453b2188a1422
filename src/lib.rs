//! # Krishi Context
//!
//! Builds bounded, prioritized prompt context for an agricultural advisory
//! assistant. Crop economics and government-scheme tables are loaded from
//! CSV once, ranked against a weather description, and assembled into a
//! fixed sectioned template; raw vector-search and web-search payloads are
//! normalized into the same prompt-ready style.
//!
//! The pure logic lives in [`krishi_context_core`]. This crate adds the
//! configuration file, dataset loading, live web lookups, and the `krishi`
//! command-line interface.
//!
//! ```text
//! ┌─────────────┐   ┌────────────────┐   ┌────────────────┐
//! │ crops.csv   │──▶│ AdvisoryEngine │──▶│ rank / schemes │
//! │ schemes.csv │   │                │   │ context        │
//! └─────────────┘   └────────────────┘   └────────────────┘
//! ┌─────────────┐   ┌────────────────┐
//! │ SearXNG     │──▶│ market         │──▶ market / pattern blocks
//! └─────────────┘   └────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`dataset`] | CSV loading into the advisory engine |
//! | [`advise`] | `rank`, `schemes`, `context` commands |
//! | [`results`] | `format-results`, `route` commands |
//! | [`market`] | SearXNG client and market lookups |

pub mod advise;
pub mod config;
pub mod dataset;
pub mod market;
pub mod results;
