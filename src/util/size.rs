const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;

/// Format a byte count as megabytes with four decimal places (`9.5377`)
pub fn bytes_to_mb_str(bytes: u64) -> String {
    format!("{:.4}", bytes as f64 / MB)
}

/// Format a byte count as kilobytes with two decimal places (`976.56`)
pub fn bytes_to_kb_str(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / KB)
}
