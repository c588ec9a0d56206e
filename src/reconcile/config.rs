//! Reconciliation configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default, so
//! `{}` is a valid configuration. Immutable once a search starts.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::errors::{ReconcileError, ReconcileResult};
use crate::observability::{log_event_with_fields, Event, Severity};

/// Which model the frontier measures relevance against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceReference {
    /// M_r for MCE, M_h for MME
    #[default]
    Target,
    /// The most recently popped candidate, starting from M_h
    LastPopped,
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Seed for tie-breaking; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub relevance_reference: RelevanceReference,

    /// Maximum candidates evaluated before giving up
    #[serde(default)]
    pub max_expansions: Option<u64>,

    /// Record a per-candidate trace in the explanation
    #[serde(default)]
    pub record_trace: bool,

    /// Minimum logger severity
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            seed: None,
            relevance_reference: RelevanceReference::default(),
            max_expansions: None,
            record_trace: false,
            log_level: default_log_level(),
        }
    }
}

impl ReconcileConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> ReconcileResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json_str(content: &str) -> ReconcileResult<Self> {
        let config: ReconcileConfig = serde_json::from_str(content)
            .map_err(|e| ReconcileError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReconcileResult<()> {
        self.log_severity()?;
        if self.max_expansions == Some(0) {
            return Err(ReconcileError::Config(
                "max_expansions must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured log level as a severity
    pub fn log_severity(&self) -> ReconcileResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| ReconcileError::Config(format!("Invalid log_level: {}", e)))
    }

    /// Tie-breaking source for a fresh run
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trace(mut self) -> Self {
        self.record_trace = true;
        self
    }

    pub fn with_max_expansions(mut self, max: u64) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub fn with_relevance_reference(mut self, reference: RelevanceReference) -> Self {
        self.relevance_reference = reference;
        self
    }
}
