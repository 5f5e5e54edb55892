//! Stepviz - Replayable, seekable step-by-step algorithm visualization.
//!
//! An algorithm runs once over its input and emits a sequence of immutable
//! frames. The frames are materialized into a [`Timeline`], and a playback
//! scheduler walks an index over it at a chosen speed and direction, so any
//! step can be reached by seeking without re-running anything.
//!
//! # Architecture
//!
//! - `schema`: Frames, datasets, share-link params and configuration
//! - `algorithm`: The lazy frame protocol, reference sorts and the materializer
//! - `catalog`: Topic/slug registry with deferred loaders
//! - `playback`: Scheduler, controller, clocks and the tick driver
//! - `session`: One algorithm bound to one dataset
//! - `timeline`: `.stpv` export and import
//! - `render`: Renderer trait and a terminal bar-chart renderer
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use stepviz::{
//!     catalog::Catalog,
//!     schema::SessionParams,
//!     session::Session,
//! };
//!
//! let catalog = Catalog::with_builtins();
//! let mut session = Session::open(&catalog, "sorting", "selection-sort", SessionParams::default());
//! session.resolve();
//!
//! let controller = session.controller_mut().unwrap();
//! controller.set_speed(4.0);
//! controller.play_forward();
//! controller.tick(Duration::ZERO);
//! controller.tick(Duration::from_millis(500));
//! assert_eq!(controller.index(), 2);
//! ```

pub mod algorithm;
pub mod catalog;
pub mod playback;
pub mod render;
pub mod schema;
pub mod session;
pub mod timeline;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use algorithm::{Algorithm, AlgorithmError, Timeline, materialize};
pub use catalog::{Catalog, CatalogEntry};
pub use playback::{PlaybackController, PlaybackState, Scheduler};
pub use schema::{DatasetSpec, Frame, SessionParams, VisualizerConfig};
pub use session::{Session, SessionStatus};
