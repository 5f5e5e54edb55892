//! Real-time loop that ticks a controller from a [`Clock`].

use std::ops::ControlFlow;

use super::clock::Clock;
use super::controller::PlaybackController;
use super::scheduler::TickOutcome;

/// Summary of one driven playback run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveReport {
    pub ticks: u64,
    pub frames_advanced: u64,
    pub final_index: usize,
    /// Whether `on_tick` stopped the run before playback ended on its own.
    pub cancelled: bool,
}

/// Tick `controller` until it stops playing or `on_tick` breaks.
///
/// Returns immediately if the controller is idle. On `Break` the controller
/// is paused before returning, so no pending progress survives.
pub fn run<C, F>(controller: &mut PlaybackController, clock: &C, mut on_tick: F) -> DriveReport
where
    C: Clock + ?Sized,
    F: FnMut(&PlaybackController, &TickOutcome) -> ControlFlow<()>,
{
    let mut report = DriveReport::default();

    // Anchor the scheduler's time base before the first wait.
    if controller.is_playing() {
        controller.tick(clock.now());
    }

    while controller.is_playing() {
        clock.wait_for_tick();
        let before = controller.index();
        let outcome = controller.tick(clock.now());
        report.ticks += 1;
        report.frames_advanced += before.abs_diff(outcome.index) as u64;

        if on_tick(controller, &outcome).is_break() {
            controller.pause();
            report.cancelled = true;
            log::debug!("Playback cancelled at frame {}", controller.index());
            break;
        }
    }

    report.final_index = controller.index();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{BubbleSort, materialize};
    use crate::playback::ManualClock;
    use std::time::Duration;

    fn controller(speed: f64) -> PlaybackController {
        let timeline = materialize(&BubbleSort, &[4.0, 3.0, 2.0, 1.0]).unwrap();
        PlaybackController::new(timeline, speed)
    }

    #[test]
    fn test_runs_to_end_and_auto_pauses() {
        let mut controller = controller(10.0);
        let last = controller.timeline().len() - 1;
        let clock = ManualClock::new(Duration::from_millis(50));
        controller.play_forward();

        let mut seen = Vec::new();
        let report = run(&mut controller, &clock, |c, _| {
            seen.push(c.index());
            ControlFlow::Continue(())
        });

        assert!(!report.cancelled);
        assert_eq!(report.final_index, last);
        assert!(!controller.is_playing());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&last));
    }

    #[test]
    fn test_break_cancels_and_pauses() {
        let mut controller = controller(4.0);
        let clock = ManualClock::new(Duration::from_millis(250));
        controller.play_forward();

        let report = run(&mut controller, &clock, |c, _| {
            if c.index() >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert!(report.cancelled);
        assert_eq!(report.final_index, 3);
        assert_eq!(report.ticks, 3);
        assert!(!controller.is_playing());

        // Time passing after cancellation changes nothing.
        clock.advance(Duration::from_secs(60));
        controller.tick(clock.now());
        assert_eq!(controller.index(), 3);
    }

    #[test]
    fn test_idle_controller_returns_immediately() {
        let mut controller = controller(1.0);
        let clock = ManualClock::new(Duration::from_millis(16));
        let report = run(&mut controller, &clock, |_, _| ControlFlow::Continue(()));
        assert_eq!(report.ticks, 0);
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_backward_run_stops_at_zero() {
        let mut controller = controller(5.0);
        controller.to_end();
        controller.play_backward();
        let clock = ManualClock::new(Duration::from_millis(100));
        let report = run(&mut controller, &clock, |_, _| ControlFlow::Continue(()));
        assert_eq!(report.final_index, 0);
        assert_eq!(report.frames_advanced as usize, controller.timeline().len() - 1);
    }
}
