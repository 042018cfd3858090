//! Timing utilities for solver feeds.
//!
//! Solver timestamps are integer microseconds on a monotonic timeline.
//! This module provides utilities for:
//! - Converting microsecond spans to seconds
//! - Generating fixed-rate prediction ticks between observations

/// Microseconds per second.
pub const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Convert microseconds to fractional seconds.
pub fn us_to_secs(us: u64) -> f64 {
    us as f64 / MICROS_PER_SEC
}

/// Fixed-interval tick generator.
///
/// A render loop polls the solver once per frame even when no new
/// observation arrived; `FrameTicker` produces those frame timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FrameTicker {
    interval_us: u64,
}

impl FrameTicker {
    /// Create a ticker with an explicit interval. Zero disables ticking.
    pub fn from_interval_us(interval_us: u64) -> Self {
        Self { interval_us }
    }

    /// Whether this ticker produces any ticks.
    pub fn is_enabled(&self) -> bool {
        self.interval_us > 0
    }

    /// Tick timestamps strictly inside `(from_us, to_us)`.
    pub fn ticks_between(&self, from_us: u64, to_us: u64) -> impl Iterator<Item = u64> {
        let step = self.interval_us;
        let mut next = from_us.checked_add(step);
        std::iter::from_fn(move || {
            if step == 0 {
                return None;
            }
            let tick = next.filter(|t| *t < to_us)?;
            next = tick.checked_add(step);
            Some(tick)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_to_secs() {
        assert!((us_to_secs(1_500_000) - 1.5).abs() < 1e-12);
        assert_eq!(us_to_secs(0), 0.0);
        assert!((us_to_secs(33_333) - 0.033_333).abs() < 1e-12);
    }

    #[test]
    fn test_ticks_are_strictly_between() {
        let ticker = FrameTicker::from_interval_us(100);
        let ticks: Vec<u64> = ticker.ticks_between(1_000, 1_300).collect();
        assert_eq!(ticks, vec![1_100, 1_200]);
    }

    #[test]
    fn test_ticks_skip_short_gaps() {
        let ticker = FrameTicker::from_interval_us(33_333);
        assert_eq!(ticker.ticks_between(0, 20_000).count(), 0);
        assert_eq!(ticker.ticks_between(0, 100_000).count(), 3);
    }

    #[test]
    fn test_disabled_ticker() {
        let ticker = FrameTicker::from_interval_us(0);
        assert!(!ticker.is_enabled());
        assert_eq!(ticker.ticks_between(0, 1_000_000).count(), 0);
    }

    #[test]
    fn test_ticks_near_u64_max_stop() {
        let ticker = FrameTicker::from_interval_us(10);
        assert_eq!(ticker.ticks_between(u64::MAX - 5, u64::MAX).count(), 0);
    }
}
