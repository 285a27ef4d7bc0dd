//! Time anchors: where in the story an event happens.
//!
//! Narrative time is discourse time (chapter, paragraph, sentence), not
//! wall-clock time. Only DISCOURSE and UNKNOWN anchors are totally ordered;
//! the other variants are carried for completeness and sort between them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::events::EventId;

/// Precision of an absolute date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    Day,
    Month,
    Year,
    Decade,
    Century,
}

/// A comparable discourse coordinate. Missing components count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiscoursePoint {
    pub chapter: u32,
    pub paragraph: u32,
    pub sentence: u32,
}

impl DiscoursePoint {
    pub fn new(chapter: u32, paragraph: u32, sentence: u32) -> Self {
        Self {
            chapter,
            paragraph,
            sentence,
        }
    }
}

/// When an event happens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeAnchor {
    Absolute {
        date: String,
        precision: DatePrecision,
    },
    Relative {
        anchor_event: EventId,
        offset: Option<String>,
    },
    Bounded {
        before: Option<EventId>,
        after: Option<EventId>,
    },
    Uncertain {
        earliest: String,
        latest: String,
    },
    Discourse {
        chapter: Option<u32>,
        paragraph: Option<u32>,
        sentence: Option<u32>,
        /// Position inferred from neighbouring events rather than evidence.
        #[serde(default)]
        interpolated: bool,
    },
    #[default]
    Unknown,
}

impl TimeAnchor {
    /// A discourse anchor taken directly from evidence.
    pub fn discourse(chapter: Option<u32>, paragraph: u32, sentence: Option<u32>) -> Self {
        TimeAnchor::Discourse {
            chapter,
            paragraph: Some(paragraph),
            sentence,
            interpolated: false,
        }
    }

    /// Whether nothing is known about the time.
    pub fn is_unknown(&self) -> bool {
        matches!(self, TimeAnchor::Unknown)
    }

    pub fn is_discourse(&self) -> bool {
        matches!(self, TimeAnchor::Discourse { .. })
    }

    /// Discourse anchor backed by evidence, not interpolation.
    pub fn is_precise_discourse(&self) -> bool {
        matches!(
            self,
            TimeAnchor::Discourse {
                interpolated: false,
                ..
            }
        )
    }

    /// Chapter of a discourse anchor.
    pub fn chapter(&self) -> Option<u32> {
        match self {
            TimeAnchor::Discourse { chapter, .. } => *chapter,
            _ => None,
        }
    }

    /// Paragraph of a discourse anchor.
    pub fn paragraph(&self) -> Option<u32> {
        match self {
            TimeAnchor::Discourse { paragraph, .. } => *paragraph,
            _ => None,
        }
    }

    /// Comparable coordinate of a discourse anchor.
    pub fn point(&self) -> Option<DiscoursePoint> {
        match self {
            TimeAnchor::Discourse {
                chapter,
                paragraph,
                sentence,
                ..
            } => Some(DiscoursePoint::new(
                chapter.unwrap_or(0),
                paragraph.unwrap_or(0),
                sentence.unwrap_or(0),
            )),
            _ => None,
        }
    }

    /// Ordering defined only between DISCOURSE and UNKNOWN anchors.
    pub fn discourse_cmp(&self, other: &TimeAnchor) -> Option<Ordering> {
        match (self, other) {
            (TimeAnchor::Unknown, TimeAnchor::Unknown) => Some(Ordering::Equal),
            (TimeAnchor::Unknown, TimeAnchor::Discourse { .. }) => Some(Ordering::Greater),
            (TimeAnchor::Discourse { .. }, TimeAnchor::Unknown) => Some(Ordering::Less),
            (TimeAnchor::Discourse { .. }, TimeAnchor::Discourse { .. }) => {
                Some(self.point().cmp(&other.point()))
            }
            _ => None,
        }
    }

    /// Total order used to sort timelines: discourse anchors by position,
    /// then every other known anchor, then UNKNOWN.
    pub fn timeline_cmp(&self, other: &TimeAnchor) -> Ordering {
        self.sort_class()
            .cmp(&other.sort_class())
            .then_with(|| self.point().cmp(&other.point()))
    }

    fn sort_class(&self) -> u8 {
        match self {
            TimeAnchor::Discourse { .. } => 0,
            TimeAnchor::Unknown => 2,
            _ => 1,
        }
    }
}
