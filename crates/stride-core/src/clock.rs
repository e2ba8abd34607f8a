//! Clock-face formatting shared by every display surface.

/// Format a second count as `MM:SS`.
///
/// Minutes do not wrap at the hour: a 70-minute workout shows `70:00`.
pub fn format_mm_ss(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
