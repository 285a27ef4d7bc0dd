//! Facts - a recomputable view of story state.
//!
//! Facts are never stored on their own. They are derived on demand from
//! events, deduplicated, and queried through [`FactIndex`]. Removing an
//! assertion and recomputing removes every fact that rested only on it.

mod dedup;
mod derive;
mod fact;
mod query;

pub use dedup::*;
pub use derive::*;
pub use fact::*;
pub use query::*;

use crate::time::{DiscoursePoint, TimeAnchor};

/// Time as the query layer compares it. UNKNOWN is the earliest point,
/// since it carries the least information.
pub(crate) type QueryTime = Option<DiscoursePoint>;

pub(crate) fn query_time(anchor: &TimeAnchor) -> QueryTime {
    anchor.point()
}
