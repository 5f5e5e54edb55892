//! Visualization session: one algorithm bound to one dataset.
//!
//! A session moves through `Loading` to `Ready`, `Unavailable` or `Invalid`
//! as [`Session::resolve`] fetches the algorithm body and materializes the
//! dataset. Unknown algorithms stay `NotFound`.
//!
//! # Example
//!
//! ```rust
//! use stepviz::catalog::Catalog;
//! use stepviz::schema::SessionParams;
//! use stepviz::session::{Session, SessionStatus};
//!
//! let catalog = Catalog::with_builtins();
//! let params = SessionParams::from_query("step=3&n=8&seed=7");
//! let mut session = Session::open(&catalog, "sorting", "bubble-sort", params);
//! assert_eq!(session.status(), &SessionStatus::Loading);
//!
//! session.resolve();
//! assert!(session.status().is_ready());
//! assert_eq!(session.params().step, 3);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, materialize};
use crate::catalog::{AlgorithmMeta, Catalog, CatalogEntry};
use crate::playback::PlaybackController;
use crate::schema::{DatasetSpec, Frame, MAX_INPUT_LEN, SessionParams};

/// Lifecycle of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SessionStatus {
    /// No catalog entry for the requested topic/slug.
    NotFound,
    /// Entry found, body not loaded yet.
    Loading,
    /// The loader failed; calling `resolve` again retries.
    Unavailable { reason: String },
    /// The algorithm rejected the dataset.
    Invalid { reason: String },
    /// Materialized. `total_frames` may be 0.
    Ready { total_frames: usize },
}

impl SessionStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionStatus::Ready { .. })
    }
}

pub struct Session {
    topic: String,
    slug: String,
    entry: Option<CatalogEntry>,
    algorithm: Option<Arc<dyn Algorithm>>,
    dataset: DatasetSpec,
    input: Vec<f64>,
    /// Position and speed to apply on the first successful materialization.
    restore: SessionParams,
    controller: Option<PlaybackController>,
    status: SessionStatus,
}

impl Session {
    /// Open a session whose dataset is generated from `params.n` and `params.seed`.
    pub fn open(catalog: &Catalog, topic: &str, slug: &str, params: SessionParams) -> Self {
        let dataset = DatasetSpec::new(params.n, params.seed);
        Self::open_with_dataset(catalog, topic, slug, dataset, params)
    }

    /// Open a session over an explicit dataset spec.
    ///
    /// `dataset` wins over `params.n` and `params.seed`; only the step and
    /// speed of `params` are used.
    pub fn open_with_dataset(
        catalog: &Catalog,
        topic: &str,
        slug: &str,
        dataset: DatasetSpec,
        params: SessionParams,
    ) -> Self {
        let entry = catalog.find(topic, slug).cloned();
        let status = if entry.is_some() {
            SessionStatus::Loading
        } else {
            log::info!("No algorithm {}/{}", topic, slug);
            SessionStatus::NotFound
        };
        let restore = SessionParams {
            n: dataset.n,
            seed: dataset.seed,
            ..params
        };

        Self {
            topic: topic.to_string(),
            slug: slug.to_string(),
            entry,
            algorithm: None,
            input: dataset.generate(),
            dataset,
            restore,
            controller: None,
            status,
        }
    }

    /// Load the algorithm if needed and materialize the current input.
    pub fn resolve(&mut self) -> &SessionStatus {
        let Some(entry) = &self.entry else {
            return &self.status;
        };
        if self.status.is_ready() {
            return &self.status;
        }

        if self.algorithm.is_none() {
            match entry.load() {
                Ok(algorithm) => self.algorithm = Some(algorithm),
                Err(err) => {
                    self.status = SessionStatus::Unavailable {
                        reason: err.to_string(),
                    };
                    return &self.status;
                }
            }
        }

        self.rematerialize();
        &self.status
    }

    /// Replace the dataset with user-edited values and restart from frame 0.
    ///
    /// Before the algorithm is loaded this only stores the values.
    pub fn set_input(&mut self, values: Vec<f64>) -> &SessionStatus {
        self.dataset.n = values.len();
        self.restore.n = values.len();
        self.input = values;
        self.restore.step = 0;
        if self.algorithm.is_some() {
            self.rematerialize();
        }
        &self.status
    }

    /// Regenerate the dataset from a new spec and restart from frame 0.
    ///
    /// `dataset.n` is capped at [`MAX_INPUT_LEN`].
    pub fn regenerate(&mut self, mut dataset: DatasetSpec) -> &SessionStatus {
        dataset.n = dataset.n.min(MAX_INPUT_LEN);
        let values = dataset.generate();
        self.restore.n = dataset.n;
        self.restore.seed = dataset.seed;
        self.dataset = dataset;
        self.set_input(values)
    }

    fn rematerialize(&mut self) {
        let Some(algorithm) = &self.algorithm else {
            return;
        };

        match materialize(algorithm.as_ref(), &self.input) {
            Ok(timeline) => {
                let total_frames = timeline.len();
                match &mut self.controller {
                    Some(controller) => controller.replace_timeline(timeline),
                    None => {
                        self.controller = Some(PlaybackController::restore(timeline, &self.restore))
                    }
                }
                log::info!(
                    "Session {}/{} ready with {} frames",
                    self.topic,
                    self.slug,
                    total_frames
                );
                self.status = SessionStatus::Ready { total_frames };
            }
            Err(err) => {
                log::info!("Session {}/{} rejected input: {}", self.topic, self.slug, err);
                if let Some(controller) = &self.controller {
                    self.restore.speed = controller.state().speed;
                }
                self.controller = None;
                self.status = SessionStatus::Invalid {
                    reason: err.to_string(),
                };
            }
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn meta(&self) -> Option<&AlgorithmMeta> {
        self.entry.as_ref().map(|e| &e.meta)
    }

    pub fn dataset(&self) -> &DatasetSpec {
        &self.dataset
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Transport, present once the session is ready.
    pub fn controller(&self) -> Option<&PlaybackController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut PlaybackController> {
        self.controller.as_mut()
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.controller.as_ref().and_then(|c| c.current_frame())
    }

    /// Shareable params; opening a session with them reproduces this one.
    ///
    /// User-edited values from [`set_input`](Self::set_input) are not
    /// encoded, only their count as `n` and the generating `seed`.
    pub fn params(&self) -> SessionParams {
        match &self.controller {
            Some(controller) => controller.to_params(&self.dataset),
            None => self.restore,
        }
    }
}
