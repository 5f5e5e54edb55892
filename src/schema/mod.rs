//! Schema module - Frames, datasets, configuration and session state.

mod config;
mod dataset;
mod frame;
mod params;

pub use config::*;
pub use dataset::*;
pub use frame::*;
pub use params::*;
