//! Tick conversion and the resume window
//!
//! The remote media service expresses all positions and runtimes in
//! ticks of 100 nanoseconds. Everything inside the session engine works
//! in milliseconds; conversion happens exactly once, at the server
//! boundary.

/// Server ticks per millisecond (one tick is 100 ns)
pub const TICKS_PER_MS: i64 = 10_000;

/// Lower bound of the resume window, in percent played
pub const RESUME_MIN_PERCENT: f64 = 5.0;

/// Upper bound of the resume window, in percent played
pub const RESUME_MAX_PERCENT: f64 = 95.0;

/// Convert a millisecond position to server ticks
pub fn ms_to_ticks(ms: u64) -> i64 {
    ms as i64 * TICKS_PER_MS
}

/// Convert server ticks to a millisecond position
pub fn ticks_to_ms(ticks: i64) -> u64 {
    (ticks / TICKS_PER_MS).max(0) as u64
}

/// Compute the resume position for a stored server-side position.
///
/// Returns the position in milliseconds only when the played fraction
/// lies inside the resume window: below it the user effectively never
/// started the item, above it they effectively finished it, and
/// playback starts from the beginning in both cases.
pub fn resume_position_ms(position_ticks: i64, runtime_ticks: i64) -> Option<u64> {
    if position_ticks <= 0 || runtime_ticks <= 0 {
        return None;
    }

    let percent = position_ticks as f64 / runtime_ticks as f64 * 100.0;
    if (RESUME_MIN_PERCENT..=RESUME_MAX_PERCENT).contains(&percent) {
        Some(ticks_to_ms(position_ticks))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_round_trip() {
        assert_eq!(ms_to_ticks(50_000), 500_000_000);
        assert_eq!(ticks_to_ms(500_000_000), 50_000);
        assert_eq!(ticks_to_ms(ms_to_ticks(1234)), 1234);
    }

    #[test]
    fn negative_ticks_clamp_to_zero_ms() {
        assert_eq!(ticks_to_ms(-5), 0);
    }

    #[test]
    fn resume_at_lower_window_edge() {
        // 5.0% of a ~16 minute runtime resumes at 50 s
        assert_eq!(
            resume_position_ms(500_000_000, 10_000_000_000),
            Some(50_000)
        );
    }

    #[test]
    fn resume_below_window_is_none() {
        // 0.5% played: start from the beginning
        assert_eq!(resume_position_ms(50_000_000, 10_000_000_000), None);
    }

    #[test]
    fn resume_above_window_is_none() {
        // 97% played: treated as finished
        assert_eq!(resume_position_ms(9_700_000_000, 10_000_000_000), None);
    }

    #[test]
    fn resume_at_upper_window_edge() {
        assert_eq!(
            resume_position_ms(9_500_000_000, 10_000_000_000),
            Some(950_000)
        );
    }

    #[test]
    fn resume_without_runtime_is_none() {
        assert_eq!(resume_position_ms(500_000_000, 0), None);
        assert_eq!(resume_position_ms(0, 10_000_000_000), None);
    }
}
