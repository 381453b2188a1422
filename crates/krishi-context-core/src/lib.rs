//! # Krishi Context Core
//!
//! Pure, synchronous logic for building bounded, prioritized prompt
//! context out of noisy agricultural data: crop relevance scoring and
//! ranking, government-scheme matching, the sectioned context template,
//! and normalization of vector/web search payloads.
//!
//! This crate performs no filesystem or network I/O and holds no global
//! state. Dataset loading, model calls, and search backends live in the
//! `krishi-context` application crate; the only async seam here is the
//! [`retrieval::SearchBackend`] trait, which callers implement.
//!
//! ## Data Flow
//!
//! ```text
//! crops ──▶ rank ──▶ top crops ──▶ schemes ──▶ compare ──▶ assemble ──▶ context
//! query ──▶ (backend) ──▶ RawSearchResults ──▶ search::normalize / format_results
//! ```

pub mod assemble;
pub mod compare;
pub mod engine;
pub mod extract;
pub mod models;
pub mod rank;
pub mod retrieval;
pub mod route;
pub mod schemes;
pub mod scoring;
pub mod search;
pub mod web;
