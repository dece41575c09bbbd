//! Output formatting module.
//!
//! Provides printers for plain text, JSON, and CSV output of scans and the
//! state history.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_history_csv, print_scan_csv};
pub use json_format::{print_envelope, print_json, Envelope};
pub use plain::{
    print_error, print_history, print_info, print_report, print_scan_header, print_warning,
};
