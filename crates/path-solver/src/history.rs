//! Time-windowed observation history and median filter.

use std::collections::VecDeque;

/// A raw position sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub timestamp_us: u64,
    pub position: i32,
}

impl Observation {
    pub fn new(timestamp_us: u64, position: i32) -> Self {
        Self {
            timestamp_us,
            position,
        }
    }
}

/// Observations within a trailing time window, newest first.
///
/// Pruning never empties the window: the newest sample is always kept
/// even when it is older than the window.
#[derive(Debug, Clone, Default)]
pub struct ObservationWindow {
    window_us: u64,
    samples: VecDeque<Observation>,
}

impl ObservationWindow {
    pub fn new(window_us: u64) -> Self {
        Self {
            window_us,
            samples: VecDeque::new(),
        }
    }

    /// Add the newest observation and drop samples that fell out of the window.
    pub fn push(&mut self, observation: Observation) {
        self.samples.push_front(observation);
        if let Some(cutoff) = observation.timestamp_us.checked_sub(self.window_us) {
            while self.samples.len() > 1 {
                match self.samples.back() {
                    Some(oldest) if oldest.timestamp_us < cutoff => {
                        self.samples.pop_back();
                    }
                    _ => break,
                }
            }
        }
    }

    /// Median of the retained positions.
    pub fn median(&self) -> Option<i32> {
        let mut positions: Vec<i32> = self.samples.iter().map(|o| o.position).collect();
        median(&mut positions)
    }

    /// Median the window would have after pushing `observation`, without
    /// modifying it. Only timestamps and positions are copied.
    pub fn projected_median(&self, observation: Observation) -> Option<i32> {
        let mut projected: Vec<(u64, i32)> = Vec::with_capacity(self.samples.len() + 1);
        projected.push((observation.timestamp_us, observation.position));
        projected.extend(self.samples.iter().map(|o| (o.timestamp_us, o.position)));

        if let Some(cutoff) = observation.timestamp_us.checked_sub(self.window_us) {
            while projected.len() > 1 {
                match projected.last() {
                    Some((t, _)) if *t < cutoff => {
                        projected.pop();
                    }
                    _ => break,
                }
            }
        }

        let mut positions: Vec<i32> = projected.into_iter().map(|(_, p)| p).collect();
        median(&mut positions)
    }

    /// Scale every stored position, truncating toward zero.
    pub fn rescale(&mut self, scale: f64) {
        for sample in &mut self.samples {
            sample.position = (f64::from(sample.position) * scale) as i32;
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.samples.iter()
    }
}

/// Element at index `len / 2` of the ascending order.
///
/// For even lengths this is the upper of the two middle values; the two
/// are never averaged.
pub fn median(positions: &mut [i32]) -> Option<i32> {
    if positions.is_empty() {
        return None;
    }
    let mid = positions.len() / 2;
    let (_, value, _) = positions.select_nth_unstable(mid);
    Some(*value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [7]), Some(7));
        assert_eq!(median(&mut [3, 1, 2]), Some(2));
        // Index 2 of [1, 2, 10, 20]; no averaging.
        assert_eq!(median(&mut [20, 1, 10, 2]), Some(10));
        assert_eq!(median(&mut [5, -5]), Some(5));
    }

    #[test]
    fn test_push_prunes_outside_window() {
        let mut window = ObservationWindow::new(100);
        window.push(Observation::new(0, 10));
        window.push(Observation::new(50, 20));
        window.push(Observation::new(100, 30));
        assert_eq!(window.len(), 3);

        // cutoff = 100: drops t=0 and t=50
        window.push(Observation::new(200, 40));
        assert_eq!(window.len(), 2);
        let times: Vec<u64> = window.iter().map(|o| o.timestamp_us).collect();
        assert_eq!(times, vec![200, 100]);
    }

    #[test]
    fn test_boundary_sample_is_kept() {
        let mut window = ObservationWindow::new(100);
        window.push(Observation::new(0, 10));
        window.push(Observation::new(100, 20));
        // t - window == 0, not strictly older
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_zero_window_keeps_only_newest() {
        let mut window = ObservationWindow::new(0);
        window.push(Observation::new(0, 10));
        window.push(Observation::new(1, 20));
        window.push(Observation::new(2, 30));
        assert_eq!(window.len(), 1);
        assert_eq!(window.median(), Some(30));
    }

    #[test]
    fn test_never_prunes_last_sample() {
        let mut window = ObservationWindow::new(10);
        window.push(Observation::new(0, 10));
        window.clear();
        window.push(Observation::new(1_000, 99));
        assert_eq!(window.len(), 1);
        assert_eq!(window.iter().next(), Some(&Observation::new(1_000, 99)));
    }

    #[test]
    fn test_projected_median_leaves_window_untouched() {
        let mut window = ObservationWindow::new(1_000);
        window.push(Observation::new(0, 100));
        window.push(Observation::new(500, 110));

        // [100, 110, 500] -> 110
        assert_eq!(window.projected_median(Observation::new(900, 500)), Some(110));
        // Window slides past t=0: [110, 500] -> 500
        assert_eq!(window.projected_median(Observation::new(1_200, 500)), Some(500));

        assert_eq!(window.len(), 2);
        assert_eq!(window.median(), Some(110));
    }

    #[test]
    fn test_rescale_truncates_and_keeps_order() {
        let mut window = ObservationWindow::new(1_000);
        window.push(Observation::new(0, 101));
        window.push(Observation::new(10, -101));
        window.rescale(0.5);

        let samples: Vec<Observation> = window.iter().copied().collect();
        assert_eq!(samples, vec![Observation::new(10, -50), Observation::new(0, 50)]);
    }
}
