//! Repeating tick registration.
//!
//! The host's periodic callback is modelled as a `Ticker` that is either
//! registered or not. Who receives the ticks is fixed when the ticker is
//! built; the coordinator only starts and stops it and guarantees a single
//! registration at a time.
//!
//! Every registration gets a fresh [`Registration`] id. Tick sources that
//! deliver asynchronously tag each tick with it, so a tick queued by a
//! cancelled registration can be told apart from a live one.

use std::time::Duration;

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one registration of a [`Ticker`]. Ids only grow.
pub type Registration = u64;

/// A cancellable repeating tick source.
pub trait Ticker {
    /// Registers the repeating tick and returns the new registration's id.
    fn start(&mut self, period: Duration) -> Registration;

    /// Cancels the registration. Stopping an idle ticker is a no-op.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// The live registration, if any.
    fn registration(&self) -> Option<Registration>;
}

/// A ticker driven by hand, for tests and headless use.
///
/// It never fires on its own; the caller ticks the coordinator directly and
/// uses the counters to check how registrations were managed.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    running: bool,
    last_registration: Registration,
    period: Option<Duration>,
    starts: usize,
    stops: usize,
    overlapping_starts: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations made.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of registrations actually cancelled.
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Registrations made while another one was still live.
    pub fn overlapping_starts(&self) -> usize {
        self.overlapping_starts
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, period: Duration) -> Registration {
        if self.running {
            self.overlapping_starts += 1;
        }
        self.running = true;
        self.period = Some(period);
        self.starts += 1;
        self.last_registration += 1;
        self.last_registration
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn registration(&self) -> Option<Registration> {
        self.running.then_some(self.last_registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let mut ticker = ManualTicker::new();
        ticker.stop();
        assert_eq!(ticker.stops(), 0);

        ticker.start(TICK_PERIOD);
        ticker.stop();
        ticker.stop();
        assert_eq!(ticker.stops(), 1);
        assert!(!ticker.is_running());
    }

    #[test]
    fn test_tracks_overlapping_registrations() {
        let mut ticker = ManualTicker::new();
        ticker.start(TICK_PERIOD);
        ticker.start(TICK_PERIOD);
        assert_eq!(ticker.overlapping_starts(), 1);
        assert_eq!(ticker.period(), Some(TICK_PERIOD));
    }

    #[test]
    fn test_each_start_is_a_new_registration() {
        let mut ticker = ManualTicker::new();
        assert_eq!(ticker.registration(), None);

        let first = ticker.start(TICK_PERIOD);
        ticker.stop();
        assert_eq!(ticker.registration(), None);

        let second = ticker.start(TICK_PERIOD);
        assert!(second > first);
        assert_eq!(ticker.registration(), Some(second));
    }
}
