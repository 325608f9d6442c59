//! Clock strings as reported in `CurrentTrackDuration` and friends.
//!
//! UPnP uses `H+:MM:SS[.F+]`; some renderers drop the hour field or report
//! `NOT_IMPLEMENTED`.

/// Parse a clock string (`H:MM:SS`, `H:MM:SS.mmm` or `MM:SS`) into
/// milliseconds. Returns `None` for anything else.
pub fn parse_duration_to_ms(duration: &str) -> Option<u64> {
    let parts: Vec<&str> = duration.trim().split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u64>().ok()?, m.parse::<u64>().ok()?, *s),
        [m, s] => (0, m.parse::<u64>().ok()?, *s),
        _ => return None,
    };

    let seconds: f64 = seconds.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let whole_minutes = hours.checked_mul(60)?.checked_add(minutes)?;
    whole_minutes
        .checked_mul(60_000)?
        .checked_add((seconds * 1000.0).round() as u64)
}

/// True when the clock string parses and denotes exactly zero.
///
/// Renderers report a zero duration for items without a natural end, such
/// as still images.
pub fn is_zero_duration(duration: &str) -> bool {
    parse_duration_to_ms(duration) == Some(0)
}
