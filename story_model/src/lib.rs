//! # Story Model
//!
//! The input side of the narrative compiler. Upstream extraction and entity
//! resolution hand over assertions, an entity lookup and document-order
//! metadata; this crate defines those shapes and nothing else. It contains
//! no compiler logic.

pub mod assertion;
pub mod discourse;
pub mod entities;
pub mod error;

pub use assertion::*;
pub use discourse::*;
pub use entities::*;
pub use error::*;
