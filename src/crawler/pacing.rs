use rand::Rng;
use std::time::Duration;
use tracing::trace;

/// Inclusive range a courtesy delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const ZERO: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn from_secs(min: u64, max: u64) -> Self {
        Self::new(Duration::from_secs(min), Duration::from_secs(max))
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }

    /// Uniform sample between `min` and `max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Time spent between requests. Kept behind a trait so runs can be paced
/// without touching the clock in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Pacer {
    fn pause(&mut self, range: DelayRange);
}

/// Sleeps for a random duration within the range.
#[derive(Debug, Default)]
pub struct RandomPacer;

impl RandomPacer {
    pub fn new() -> Self {
        Self
    }
}

impl Pacer for RandomPacer {
    fn pause(&mut self, range: DelayRange) {
        if range.is_zero() {
            return;
        }
        let delay = range.sample(&mut rand::thread_rng());
        trace!(?delay, "pacing");
        std::thread::sleep(delay);
    }
}

/// Never waits.
#[derive(Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _range: DelayRange) {}
}
