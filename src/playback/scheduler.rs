//! Playback scheduler: a real-time state machine over a discrete frame index.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Slowest accepted playback rate, in frames per second.
pub const MIN_SPEED: f64 = 0.1;
/// Fastest accepted playback rate, in frames per second.
pub const MAX_SPEED: f64 = 10.0;
/// Rate used when a requested speed is not a finite number.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Playback direction. Orthogonal to speed, which is always positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Snapshot of the scheduler's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub total_frames: usize,
    pub index: usize,
    pub direction: Direction,
    pub speed: f64,
    pub playing: bool,
}

/// Result of one [`Scheduler::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickOutcome {
    /// Whole frames consumed from the accumulator.
    pub steps: u64,
    /// Index after the tick.
    pub index: usize,
    /// Whether the index changed.
    pub moved: bool,
    /// Whether this tick stopped playback at a boundary.
    pub auto_paused: bool,
}

/// Clamp a requested speed into the accepted range.
pub fn normalize_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}

/// Frame index state machine with `Idle` / `Running` states.
///
/// Every operation is total: out-of-range input is clamped, never rejected.
/// While running, [`tick`](Scheduler::tick) converts elapsed time into whole
/// frame steps through a fractional accumulator, so the remainder of a tick
/// is carried into the next one instead of being dropped. Playback stops on
/// its own when the index reaches either end; it never wraps.
#[derive(Debug, Clone)]
pub struct Scheduler {
    total_frames: usize,
    index: usize,
    direction: Direction,
    speed: f64,
    playing: bool,
    carry: f64,
    last_tick: Option<Duration>,
}

impl Scheduler {
    pub fn new(total_frames: usize, speed: f64) -> Self {
        Self {
            total_frames,
            index: 0,
            direction: Direction::Forward,
            speed: normalize_speed(speed),
            playing: false,
            carry: 0.0,
            last_tick: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            total_frames: self.total_frames,
            index: self.index,
            direction: self.direction,
            speed: self.speed,
            playing: self.playing,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Fractional frames carried into the next tick.
    pub fn carry(&self) -> f64 {
        self.carry
    }

    /// Highest valid index (0 for an empty sequence).
    pub fn last_index(&self) -> usize {
        self.total_frames.saturating_sub(1)
    }

    fn clamp(&self, index: i64) -> usize {
        index.clamp(0, self.last_index() as i64) as usize
    }

    /// Start (or keep) running in the current direction.
    pub fn play(&mut self) {
        if self.total_frames <= 1 {
            log::debug!("Nothing to play over {} frames", self.total_frames);
            self.pause();
            return;
        }
        if !self.playing {
            self.playing = true;
            self.last_tick = None;
        }
    }

    pub fn play_forward(&mut self) {
        self.direction = Direction::Forward;
        self.play();
    }

    pub fn play_backward(&mut self) {
        self.direction = Direction::Backward;
        self.play();
    }

    /// Stop running. Pending fractional progress is discarded.
    pub fn pause(&mut self) {
        self.playing = false;
        self.carry = 0.0;
        self.last_tick = None;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn step_next(&mut self) {
        self.index = self.clamp(self.index as i64 + 1);
    }

    pub fn step_prev(&mut self) {
        self.index = self.clamp(self.index as i64 - 1);
    }

    pub fn seek(&mut self, index: i64) {
        self.index = self.clamp(index);
    }

    pub fn to_start(&mut self) {
        self.index = 0;
    }

    pub fn to_end(&mut self) {
        self.index = self.last_index();
    }

    /// Change the rate. Takes effect on the next tick; the carry is kept.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = normalize_speed(speed);
    }

    /// Rebind to a new frame sequence: index 0, idle.
    pub fn reset(&mut self, total_frames: usize) {
        self.pause();
        self.total_frames = total_frames;
        self.index = 0;
    }

    /// Advance by the time elapsed since the previous tick.
    ///
    /// The first tick after entering `Running` only records `now`. A clock
    /// that moves backward counts as zero elapsed time. Ticks while idle are
    /// no-ops.
    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        let idle = TickOutcome {
            index: self.index,
            ..Default::default()
        };
        if !self.playing {
            return idle;
        }
        if self.total_frames <= 1 {
            self.pause();
            return TickOutcome {
                auto_paused: true,
                ..idle
            };
        }

        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |prev| now.saturating_sub(prev));
        self.last_tick = Some(now);

        self.carry += dt.as_secs_f64() * self.speed;
        let whole = self.carry.floor();
        if whole < 1.0 {
            return idle;
        }
        self.carry -= whole;

        let steps = whole as u64;
        let delta = i64::try_from(steps).unwrap_or(i64::MAX);
        let target = match self.direction {
            Direction::Forward => (self.index as i64).saturating_add(delta),
            Direction::Backward => (self.index as i64).saturating_sub(delta),
        };
        let before = self.index;
        self.index = self.clamp(target);

        let auto_paused = self.index == 0 || self.index == self.last_index();
        if auto_paused {
            self.pause();
        }

        TickOutcome {
            steps,
            index: self.index,
            moved: self.index != before,
            auto_paused,
        }
    }
}
