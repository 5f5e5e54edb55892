//! Clock capability for the real-time playback loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Source of time and tick scheduling for the playback driver.
pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// Block until the host's next rendering tick is due.
    fn wait_for_tick(&self);
}

/// Wall clock ticking at a fixed rate.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    interval: Duration,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    /// Clock that ticks `tick_hz` times per second (minimum 1).
    pub fn new(tick_hz: u32) -> Self {
        Self {
            origin: Instant::now(),
            interval: Duration::from_nanos(1_000_000_000 / u64::from(tick_hz.max(1))),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait_for_tick(&self) {
        std::thread::sleep(self.interval);
    }
}

/// Simulated clock for deterministic playback.
///
/// Clones share the same time, so a test can hold one handle while the
/// driver owns another. `wait_for_tick` advances time by the configured step
/// instead of sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    step: Duration,
}

impl ManualClock {
    /// Clock starting at zero that advances by `step` on every tick.
    pub fn new(step: Duration) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            step,
        }
    }

    /// Move time forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.nanos.fetch_add(dt.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time (may move backward).
    pub fn set(&self, t: Duration) {
        self.nanos.store(t.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn wait_for_tick(&self) {
        self.advance(self.step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(Duration::from_millis(16));
        let handle = clock.clone();
        clock.wait_for_tick();
        handle.advance(Duration::from_millis(4));
        assert_eq!(clock.now(), Duration::from_millis(20));
        handle.set(Duration::from_millis(1));
        assert_eq!(clock.now(), Duration::from_millis(1));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new(1000);
        assert_eq!(clock.interval(), Duration::from_millis(1));
        let a = clock.now();
        clock.wait_for_tick();
        assert!(clock.now() >= a + Duration::from_millis(1));
    }
}
