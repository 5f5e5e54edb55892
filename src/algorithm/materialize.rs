//! Frame materialization: drain a lazy run into a random-access timeline.

use std::ops::Index;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::{Algorithm, AlgorithmError};
use crate::schema::Frame;

/// Fully resolved, immutable frame sequence.
///
/// Cloning is cheap: frames are shared behind an `Arc`, so any number of
/// readers can hold the same timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    frames: Arc<[Frame]>,
}

impl Timeline {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Timeline with no frames.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames matching `pred`.
    pub fn count_where(&self, pred: impl Fn(&Frame) -> bool) -> usize {
        self.frames.iter().filter(|f| pred(f)).count()
    }
}

impl Index<usize> for Timeline {
    type Output = Frame;

    fn index(&self, index: usize) -> &Frame {
        &self.frames[index]
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl FromIterator<Frame> for Timeline {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Run `algorithm` on `input` to exhaustion.
///
/// Errors come from the algorithm's up-front validation; no partial timeline
/// is ever returned. Memory use is proportional to the frame count (O(n²) for
/// the reference sorts).
pub fn materialize(algorithm: &dyn Algorithm, input: &[f64]) -> Result<Timeline, AlgorithmError> {
    let stream = algorithm.run(input)?;
    let timeline: Timeline = stream.collect();
    log::debug!(
        "Materialized {} frames for input of length {}",
        timeline.len(),
        input.len()
    );
    Ok(timeline)
}

/// Materialize several independent inputs, in parallel on native targets.
///
/// Results keep the order of `inputs`.
pub fn materialize_many(
    algorithm: &dyn Algorithm,
    inputs: &[Vec<f64>],
) -> Vec<Result<Timeline, AlgorithmError>> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        inputs
            .par_iter()
            .map(|input| materialize(algorithm, input))
            .collect()
    }

    #[cfg(target_arch = "wasm32")]
    {
        inputs
            .iter()
            .map(|input| materialize(algorithm, input))
            .collect()
    }
}
