//! Core type definitions.
//!
//! Targets are validated on construction so the scanner never sees an empty
//! or truncated address.

mod scan_id;
mod target;

pub use scan_id::ScanId;
pub use target::{Target, TargetError, DEFAULT_SEGMENT};
