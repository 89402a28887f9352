use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::NOT_MISLEADING_UI_LAUNCH_MILLIS;
use crate::scoring::ScoringConfig;

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub paths: Option<PathsConfig>,
    #[serde(default)]
    pub filters: Option<FilterConfig>,
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

/// Input and output locations. Command-line flags take precedence.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default)]
    pub enrollment: Option<PathBuf>,
    #[serde(default)]
    pub notes: Option<PathBuf>,
    #[serde(default)]
    pub ratings: Option<PathBuf>,
    #[serde(default)]
    pub note_status_history: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Drop ratings according to the lifecycle of the rated note (default: true)
    #[serde(default)]
    pub filter_not_misleading_notes: Option<bool>,

    /// Cutoff for counting a "not misleading" rating as new UI (default: 2022-10-03 UTC)
    #[serde(default)]
    pub not_misleading_ui_launch_millis: Option<i64>,

    /// Log per-filter breakdowns (default: true)
    #[serde(default)]
    pub log_filter_stats: Option<bool>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filter_not_misleading_notes: Some(true),
            not_misleading_ui_launch_millis: Some(NOT_MISLEADING_UI_LAUNCH_MILLIS),
            log_filter_stats: Some(true),
        }
    }
}

impl Config {
    pub fn paths(&self) -> PathsConfig {
        self.paths.clone().unwrap_or_default()
    }

    pub fn filters(&self) -> FilterConfig {
        self.filters.clone().unwrap_or_default()
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}
