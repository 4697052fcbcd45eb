//! Scanning, tolerant sidecar parsing, and note rendering.
//!
//! The pipeline is synchronous and single-threaded: a [`scan::MediaScanner`]
//! walks the source directories and groups files by code, the
//! [`nfo::NfoParser`] recovers a best-effort [`shelfmark_model::NfoRecord`]
//! from each (possibly malformed) sidecar, and the [`render`] module turns
//! each item into a vault note plus per-category listing pages.

pub mod error;
pub mod nfo;
pub mod render;
pub mod scan;

pub use error::{CoreError, Result};
pub use nfo::NfoParser;
pub use render::{CategoryPages, NoteRenderer, RenderSettings};
pub use scan::{MediaScanner, ScanReport, ScanSettings};
