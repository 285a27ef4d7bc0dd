//! Timeline filtering and pagination.

use serde::{Deserialize, Serialize};

use story_model::{DocumentId, EntityId, Modality};

use super::chapters::{chapter_boundaries, ChapterBoundary};
use crate::events::{EventType, StoryEvent};
use crate::time::{DiscoursePoint, TimeAnchor};

/// Inclusive discourse window. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscourseRange {
    /// Inclusive lower bound.
    pub start: Option<DiscoursePoint>,
    /// Inclusive upper bound.
    pub end: Option<DiscoursePoint>,
}

impl DiscourseRange {
    /// Create a range; either end may be open.
    pub fn new(start: Option<DiscoursePoint>, end: Option<DiscoursePoint>) -> Self {
        Self { start, end }
    }

    /// Anchors without a discourse position never fall inside a range.
    pub fn contains(&self, anchor: &TimeAnchor) -> bool {
        let Some(point) = anchor.point() else {
            return false;
        };
        self.start.map_or(true, |start| point >= start) && self.end.map_or(true, |end| point <= end)
    }
}

/// Conjunctive event filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineFilter {
    /// Keep events involving this entity.
    pub entity: Option<EntityId>,
    /// Keep events of these types.
    pub event_types: Option<Vec<EventType>>,
    /// Keep events from this document.
    pub document: Option<DocumentId>,
    /// Keep events with one of these modalities.
    pub modalities: Option<Vec<Modality>>,
    /// Keep events anchored inside this range.
    pub range: Option<DiscourseRange>,
    /// Keep events at or above this composite confidence.
    pub min_confidence: Option<f64>,
    /// Matches to skip before the page starts.
    pub offset: usize,
    /// Page size; the configured default applies when unset.
    pub limit: Option<usize>,
}

impl TimelineFilter {
    /// Create a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to events involving `entity`.
    pub fn involving(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(EntityId::new(entity));
        self
    }

    /// Restrict to the given event types.
    pub fn of_types(mut self, types: impl IntoIterator<Item = EventType>) -> Self {
        self.event_types = Some(types.into_iter().collect());
        self
    }

    /// Restrict to one document.
    pub fn in_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(DocumentId::new(document));
        self
    }

    /// Restrict to the given modalities.
    pub fn with_modalities(mut self, modalities: impl IntoIterator<Item = Modality>) -> Self {
        self.modalities = Some(modalities.into_iter().collect());
        self
    }

    /// Restrict to a discourse range.
    pub fn within(mut self, range: DiscourseRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the minimum composite confidence.
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = Some(confidence);
        self
    }

    /// Set the page window.
    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Whether `event` passes every criterion.
    pub fn matches(&self, event: &StoryEvent) -> bool {
        if let Some(entity) = &self.entity {
            if !event.involves(entity) {
                return false;
            }
        }
        if let Some(types) = &self.event_types {
            if !types.contains(&event.event_type) {
                return false;
            }
        }
        if let Some(document) = &self.document {
            if event.document.as_ref() != Some(document) {
                return false;
            }
        }
        if let Some(modalities) = &self.modalities {
            if !modalities.contains(&event.modality) {
                return false;
            }
        }
        if let Some(range) = &self.range {
            if !range.contains(&event.time) {
                return false;
            }
        }
        if let Some(min) = self.min_confidence {
            if event.confidence.composite < min {
                return false;
            }
        }
        true
    }
}

/// One page of a filtered timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResult {
    /// The requested page of matching events.
    pub events: Vec<StoryEvent>,
    /// Matches before pagination.
    pub total: usize,
    /// The filter that produced this result.
    pub filter: TimelineFilter,
    /// Boundaries across every match, not just this page.
    pub chapters: Vec<ChapterBoundary>,
}

/// Apply `filter`, sort by discourse time and cut one page.
pub fn filter_timeline(events: &[StoryEvent], filter: &TimelineFilter, default_page_size: usize) -> TimelineResult {
    let mut matched: Vec<StoryEvent> = events.iter().filter(|e| filter.matches(e)).cloned().collect();
    matched.sort_by(|a, b| a.time.timeline_cmp(&b.time));

    let total = matched.len();
    let chapters = chapter_boundaries(&matched);
    let limit = filter.limit.unwrap_or(default_page_size);
    let page = matched.into_iter().skip(filter.offset).take(limit).collect();

    TimelineResult {
        events: page,
        total,
        filter: filter.clone(),
        chapters,
    }
}
