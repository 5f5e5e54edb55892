//! Real-time playback over a materialized timeline.
//!
//! - [`Scheduler`]: the frame-index state machine (fractional accumulator,
//!   clamping, auto-pause at either end)
//! - [`PlaybackController`]: a scheduler bound to a [`Timeline`](crate::algorithm::Timeline)
//! - [`Clock`] and [`driver::run`]: the host tick loop

mod clock;
mod controller;
pub mod driver;
mod scheduler;

pub use clock::*;
pub use controller::*;
pub use driver::{DriveReport, run};
pub use scheduler::*;
