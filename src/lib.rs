//! Loading, validation and quality gating for note and rating datasets.
//!
//! The [`loader::DataLoader`] reads the four tab-separated inputs, enforces
//! their keys and derives the unified helpfulness score; a
//! [`scoring::Scorer`] then turns the cleaned tables into scored notes.

pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod helpfulness;
pub mod loader;
pub mod scoring;
pub mod sources;
pub mod status_history;
pub mod table;

pub use error::{PipelineError, Result};
