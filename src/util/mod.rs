//! Small filesystem and formatting helpers shared by both analysis modes.

pub mod fs;
pub mod size;

pub use fs::{absolute_path, read_json, read_text_lossy, resolve_report_path, write_report};
pub use size::{bytes_to_kb_str, bytes_to_mb_str};
