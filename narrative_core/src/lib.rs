//! # Narrative Core
//!
//! Compiles evidence-backed assertions from `story_model` into a
//! deterministic narrative world model: deduplicated story events anchored
//! in discourse time, recomputable facts, and timeline views over both.
//!
//! ## Core Components
//!
//! - **compiler**: Predicate normalization, eligibility gate, candidate building, merging, time anchoring
//! - **events**: Story event types and the sealed event constructor
//! - **facts**: Fact derivation, deduplication and state queries
//! - **timeline**: Interpolation, temporal links, chapter boundaries, embedded narratives, filtering
//! - **config**: TOML-loadable compiler settings
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Identifiers are content hashes; shuffled input gives identical output
//! - **Provenance-First**: Every event and fact names the sources it was derived from
//! - **Under-Produce, Never Fail**: Ambiguous input is dropped and counted, not reported as an error

pub mod compiler;
pub mod config;
pub mod error;
pub mod events;
pub mod facts;
mod hashing;
pub mod time;
pub mod timeline;

pub use compiler::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use facts::*;
pub use time::*;
pub use timeline::*;
