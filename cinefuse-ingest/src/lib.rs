//! # cinefuse-ingest
//!
//! Batch pipeline that fuses movie metadata from TMDB with IMDB, Rotten
//! Tomatoes, Wikidata, FlickMetrix and OMDB, then filters, scores and
//! classifies every record.
//!
//! # Architecture
//! ```text
//! sources ──> pipeline::fetch ──> tmdb-{n}.json
//!                                     │
//!           converter ─> merge ─> classify   (pipeline::record)
//!                                     │
//!                              movies-{n}.json ──> db
//!                                     │
//! sources ──> pipeline::enrich ──> store (secondary-source caches)
//! ```
//!
//! Per-record problems are [`error::DropReason`]s; the record is counted
//! and skipped. Run-level problems are [`error::PipelineError`]s and stop
//! the run.

pub mod build_info;
pub mod classify;
pub mod config;
pub mod converter;
pub mod db;
pub mod error;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod store;

pub use crate::config::IngestConfig;
pub use crate::error::{DropReason, PipelineError, Result, Verdict};
