//! Timeline - narrative-aware views over compiled events.
//!
//! Enrichment works in stages:
//! 1. **Interpolation**: Place UNKNOWN events between their anchored neighbours
//! 2. **Ordering**: Sort by discourse time, UNKNOWN last
//! 3. **Linking**: Derive BEFORE/AFTER/SIMULTANEOUS links between neighbours
//! 4. **Structure**: Record chapter boundaries and embedded narratives

mod chapters;
mod embedded;
mod interpolate;
mod links;
mod query;

pub use chapters::*;
pub use embedded::*;
pub use interpolate::*;
pub use links::*;
pub use query::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compiler::sort_by_discourse;
use crate::config::TimelineConfig;
use crate::events::{StoryEvent, TemporalLink};

/// Compiled events plus everything enrichment derives from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTimeline {
    /// Events in discourse order, each carrying its outgoing links.
    pub events: Vec<StoryEvent>,
    /// Every derived temporal link.
    pub links: Vec<TemporalLink>,
    /// Chapter boundaries over the enriched events.
    pub chapters: Vec<ChapterBoundary>,
    /// Detected embedded narratives.
    pub embedded: Vec<EmbeddedNarrative>,
}

/// Timeline enrichment and queries.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    config: TimelineConfig,
}

impl Timeline {
    /// Create a timeline builder with the given settings.
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    /// Create a timeline builder with default settings.
    pub fn with_defaults() -> Self {
        Self::new(TimelineConfig::default())
    }

    /// Interpolate, sort, link and annotate compiled events.
    pub fn enrich(&self, events: Vec<StoryEvent>) -> EnrichedTimeline {
        let mut events = if self.config.interpolate_unknown {
            interpolate_unknown(events, self.config.chapter_from)
        } else {
            events
        };
        sort_by_discourse(&mut events);

        let links = derive_links(&events, self.config.min_link_confidence);
        attach_links(&mut events, &links);
        let chapters = chapter_boundaries(&events);
        let embedded = detect_embedded_narratives(&events);

        debug!(
            events = events.len(),
            links = links.len(),
            chapters = chapters.len(),
            embedded = embedded.len(),
            "enriched timeline"
        );

        EnrichedTimeline {
            events,
            links,
            chapters,
            embedded,
        }
    }

    /// Filter with the configured default page size.
    pub fn query(&self, events: &[StoryEvent], filter: &TimelineFilter) -> TimelineResult {
        filter_timeline(events, filter, self.config.default_page_size)
    }
}
