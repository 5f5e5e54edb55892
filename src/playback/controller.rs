//! Playback controller: a scheduler bound to one materialized timeline.

use std::time::Duration;

use super::scheduler::{Direction, PlaybackState, Scheduler, TickOutcome};
use crate::algorithm::Timeline;
use crate::schema::{DatasetSpec, Frame, SessionParams};

/// Transport over a [`Timeline`].
///
/// The frame count the scheduler sees always matches the bound timeline, so
/// [`current_frame`](Self::current_frame) is `Some` whenever the timeline is
/// non-empty.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    timeline: Timeline,
    scheduler: Scheduler,
}

impl PlaybackController {
    pub fn new(timeline: Timeline, speed: f64) -> Self {
        let scheduler = Scheduler::new(timeline.len(), speed);
        Self {
            timeline,
            scheduler,
        }
    }

    /// Controller positioned according to restored session params.
    pub fn restore(timeline: Timeline, params: &SessionParams) -> Self {
        let mut controller = Self::new(timeline, params.speed);
        controller.seek(i64::try_from(params.step).unwrap_or(i64::MAX));
        controller
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> PlaybackState {
        self.scheduler.state()
    }

    pub fn index(&self) -> usize {
        self.scheduler.index()
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.timeline.get(self.scheduler.index())
    }

    /// Bind a freshly materialized timeline (input changed): idle at frame 0.
    pub fn replace_timeline(&mut self, timeline: Timeline) {
        self.scheduler.reset(timeline.len());
        self.timeline = timeline;
    }

    /// Shareable params for the current position and dataset.
    pub fn to_params(&self, dataset: &DatasetSpec) -> SessionParams {
        SessionParams {
            step: self.scheduler.index(),
            speed: self.scheduler.speed(),
            n: dataset.n,
            seed: dataset.seed,
        }
    }

    pub fn play(&mut self) {
        self.scheduler.play();
    }

    pub fn play_forward(&mut self) {
        self.scheduler.play_forward();
    }

    pub fn play_backward(&mut self) {
        self.scheduler.play_backward();
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    pub fn toggle(&mut self) {
        self.scheduler.toggle();
    }

    pub fn step_next(&mut self) {
        self.scheduler.step_next();
    }

    pub fn step_prev(&mut self) {
        self.scheduler.step_prev();
    }

    pub fn seek(&mut self, index: i64) {
        self.scheduler.seek(index);
    }

    pub fn to_start(&mut self) {
        self.scheduler.to_start();
    }

    pub fn to_end(&mut self) {
        self.scheduler.to_end();
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.scheduler.set_speed(speed);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.scheduler.set_direction(direction);
    }

    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        self.scheduler.tick(now)
    }
}
