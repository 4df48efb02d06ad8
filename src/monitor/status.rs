//! Debounce state machine turning raw reachability samples into a stable
//! host status.

/// Stable status of the monitored host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    /// No sample has settled the status yet.
    Unknown,
    Up,
    Down,
}

/// A confirmed status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The host crossed the consecutive-failure threshold.
    Down,
    /// The host answered again after a confirmed outage.
    Up,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Down => write!(f, "DOWN"),
            Transition::Up => write!(f, "UP"),
        }
    }
}

/// Tracks consecutive failures and decides when a transition is confirmed.
///
/// Going down requires `max_failures` consecutive failed samples; coming
/// back up requires a single success. Transient blips below the threshold
/// are absorbed without an alert.
pub struct StatusTracker {
    max_failures: u32,
    consecutive_failures: u32,
    last_status: HostStatus,
    total_samples: u64,
    failed_samples: u64,
}

impl StatusTracker {
    pub fn new(max_failures: u32) -> Self {
        Self {
            max_failures,
            consecutive_failures: 0,
            last_status: HostStatus::Unknown,
            total_samples: 0,
            failed_samples: 0,
        }
    }

    /// Record one sample and return the transition it confirms, if any.
    ///
    /// A DOWN transition fires exactly once per failure episode, on the
    /// sample that first reaches the threshold. An UP transition fires on
    /// the first success after a confirmed outage. The very first success
    /// from the Unknown startup state settles the status silently.
    pub fn record(&mut self, success: bool) -> Option<Transition> {
        self.total_samples += 1;

        if success {
            self.consecutive_failures = 0;
            match self.last_status {
                HostStatus::Down => {
                    self.last_status = HostStatus::Up;
                    Some(Transition::Up)
                }
                HostStatus::Unknown => {
                    self.last_status = HostStatus::Up;
                    None
                }
                HostStatus::Up => None,
            }
        } else {
            self.failed_samples += 1;
            self.consecutive_failures += 1;

            if self.consecutive_failures >= self.max_failures
                && self.last_status != HostStatus::Down
            {
                self.last_status = HostStatus::Down;
                Some(Transition::Down)
            } else {
                None
            }
        }
    }

    /// Percentage of successful samples, 0.0 before the first sample.
    pub fn success_rate(&self) -> f64 {
        if self.total_samples == 0 {
            return 0.0;
        }
        (self.total_samples - self.failed_samples) as f64 / self.total_samples as f64 * 100.0
    }

    pub fn last_status(&self) -> HostStatus {
        self.last_status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn failed_samples(&self) -> u64 {
        self.failed_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut StatusTracker, samples: &str) -> Vec<Option<Transition>> {
        samples
            .chars()
            .map(|c| tracker.record(c == 'S'))
            .collect()
    }

    #[test]
    fn test_failures_below_threshold_are_absorbed() {
        let mut tracker = StatusTracker::new(3);
        let transitions = feed(&mut tracker, "FFS");
        assert!(transitions.iter().all(Option::is_none));
        assert_eq!(tracker.consecutive_failures(), 0);
    }

    #[test]
    fn test_down_fires_on_threshold() {
        let mut tracker = StatusTracker::new(3);
        assert_eq!(tracker.record(false), None);
        assert_eq!(tracker.record(false), None);
        assert_eq!(tracker.record(false), Some(Transition::Down));
        assert_eq!(tracker.last_status(), HostStatus::Down);
    }

    #[test]
    fn test_down_fires_once_per_episode() {
        let mut tracker = StatusTracker::new(3);
        let transitions = feed(&mut tracker, "FFFFFF");
        let fired: Vec<_> = transitions.into_iter().flatten().collect();
        assert_eq!(fired, vec![Transition::Down]);
    }

    #[test]
    fn test_recovery_after_confirmed_down() {
        let mut tracker = StatusTracker::new(3);
        let transitions = feed(&mut tracker, "FFFFS");
        assert_eq!(transitions[2], Some(Transition::Down));
        assert_eq!(transitions[3], None); // already down, no repeat alert
        assert_eq!(transitions[4], Some(Transition::Up));
        assert_eq!(tracker.last_status(), HostStatus::Up);
    }

    #[test]
    fn test_first_success_from_unknown_is_silent() {
        let mut tracker = StatusTracker::new(3);
        assert_eq!(tracker.record(true), None);
        assert_eq!(tracker.last_status(), HostStatus::Up);
    }

    #[test]
    fn test_success_resets_consecutive_failures() {
        let mut tracker = StatusTracker::new(5);
        feed(&mut tracker, "FFFF");
        assert_eq!(tracker.consecutive_failures(), 4);
        tracker.record(true);
        assert_eq!(tracker.consecutive_failures(), 0);
    }

    #[test]
    fn test_failed_never_exceeds_total() {
        let mut tracker = StatusTracker::new(2);
        feed(&mut tracker, "FSFFSFFFSS");
        assert!(tracker.failed_samples() <= tracker.total_samples());
        assert_eq!(tracker.total_samples(), 10);
        assert_eq!(tracker.failed_samples(), 6);
    }

    #[test]
    fn test_success_rate_without_samples_is_zero() {
        let tracker = StatusTracker::new(3);
        assert_eq!(tracker.success_rate(), 0.0);
    }

    #[test]
    fn test_success_rate() {
        let mut tracker = StatusTracker::new(3);
        feed(&mut tracker, "SSSF");
        assert!((tracker.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_episode_requires_threshold_again() {
        let mut tracker = StatusTracker::new(2);
        let transitions = feed(&mut tracker, "FFSFF");
        let fired: Vec<_> = transitions.into_iter().flatten().collect();
        assert_eq!(
            fired,
            vec![Transition::Down, Transition::Up, Transition::Down]
        );
    }
}
