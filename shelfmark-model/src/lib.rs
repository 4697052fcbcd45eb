//! Core data model definitions shared across shelfmark crates.

pub mod item;
pub mod record;

pub use item::MediaItem;
pub use record::{NfoDefaults, NfoRecord};
