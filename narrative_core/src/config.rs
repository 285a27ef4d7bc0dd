//! Compiler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, Result};

/// Configuration for a compiler run.
///
/// Every field has a default, so a TOML document only needs to name what it
/// changes:
///
/// ```toml
/// track_eligibility = true
///
/// [timeline]
/// chapter_from = "following"
/// min_link_confidence = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Return per-reason counts of assertions the eligibility gate blocked.
    pub track_eligibility: bool,

    /// Timeline enrichment settings.
    pub timeline: TimelineConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            track_eligibility: true,
            timeline: TimelineConfig::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CompilerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.timeline.validate()
    }
}

/// Which neighbour an interpolated event takes its chapter from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborPreference {
    #[default]
    Preceding,
    Following,
}

/// Settings for timeline enrichment and queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Assign discourse positions to UNKNOWN events from their neighbours.
    pub interpolate_unknown: bool,

    /// Neighbour whose chapter an interpolated event inherits.
    pub chapter_from: NeighborPreference,

    /// Temporal links below this confidence are discarded (0.0-1.0).
    pub min_link_confidence: f64,

    /// Page size used when a timeline filter sets no limit.
    pub default_page_size: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            interpolate_unknown: true,
            chapter_from: NeighborPreference::Preceding,
            min_link_confidence: 0.3,
            default_page_size: 50,
        }
    }
}

impl TimelineConfig {
    /// Reject an out-of-range link threshold or a zero page size.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_link_confidence) {
            return Err(NarrativeError::InvalidConfig {
                field: "timeline.min_link_confidence",
                reason: format!("{} is outside 0.0..=1.0", self.min_link_confidence),
            });
        }
        if self.default_page_size == 0 {
            return Err(NarrativeError::InvalidConfig {
                field: "timeline.default_page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
