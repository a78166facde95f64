//! Display helpers derived from the countdown state.

/// Formats a number of seconds as zero-padded `mm:ss`.
///
/// Minutes are not wrapped into hours, so `format_time(6000)` is `"100:00"`.
pub fn format_time(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{mins:02}:{secs:02}")
}

/// Percentage of `duration` that has elapsed when `time_left` remains.
///
/// The result is clamped to `[0, 100]`; a zero duration counts as finished.
pub fn progress(duration: u32, time_left: u32) -> f64 {
    if duration == 0 {
        return 100.0;
    }
    let elapsed = duration.saturating_sub(time_left);
    (f64::from(elapsed) / f64::from(duration) * 100.0).clamp(0.0, 100.0)
}
