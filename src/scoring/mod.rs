pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{Scorer, ScorerOutput, TallyScorer};
pub use validation::validate_scoring;
