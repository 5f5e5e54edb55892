//! Algorithm protocol: lazy, restartable frame production.
//!
//! An [`Algorithm`] validates its input up front and then hands back a
//! [`FrameStream`], an iterator that suspends after every emitted
//! [`Frame`](crate::schema::Frame). Each reference algorithm keeps its loop
//! variables in an explicit state struct, so the stream can be consumed one
//! frame at a time or drained in one go by the [`materialize`] function.
//!
//! # Example
//!
//! ```rust
//! use stepviz::algorithm::{Algorithm, BubbleSort, materialize};
//!
//! let timeline = materialize(&BubbleSort, &[5.0, 3.0, 8.0, 1.0]).unwrap();
//! assert_eq!(timeline.last().unwrap().array, vec![1.0, 3.0, 5.0, 8.0]);
//! ```

mod bubble;
mod materialize;
mod merge;
mod selection;

pub use bubble::{BubbleSort, BubbleSteps};
pub use materialize::{Timeline, materialize, materialize_many};
pub use merge::{MergeSort, MergeSteps};
pub use selection::{SelectionSort, SelectionSteps};

use crate::schema::{Frame, MAX_INPUT_LEN};

/// Lazy frame sequence produced by one algorithm run.
pub type FrameStream = Box<dyn Iterator<Item = Frame> + Send>;

/// A pure mapping from an input dataset to a finite frame sequence.
///
/// Running twice on equal input must produce identical sequences, and the
/// caller's slice is never mutated. Implementations must do bounded work
/// between two consecutive frames.
pub trait Algorithm: Send + Sync {
    /// Validate `input` and start a new run.
    ///
    /// Errors are reported here, before any frame is produced.
    fn run(&self, input: &[f64]) -> Result<FrameStream, AlgorithmError>;
}

impl<F> Algorithm for F
where
    F: Fn(&[f64]) -> Result<FrameStream, AlgorithmError> + Send + Sync,
{
    fn run(&self, input: &[f64]) -> Result<FrameStream, AlgorithmError> {
        self(input)
    }
}

/// Errors raised by an algorithm before it produces frames.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

/// Dataset precondition failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("value at index {index} is not a finite number")]
    NonFinite { index: usize },
    #[error("dataset has {len} elements, maximum is {max}")]
    TooLong { len: usize, max: usize },
}

/// Common preconditions for numeric datasets.
pub fn validate_input(input: &[f64]) -> Result<(), InputError> {
    if input.len() > MAX_INPUT_LEN {
        return Err(InputError::TooLong {
            len: input.len(),
            max: MAX_INPUT_LEN,
        });
    }
    if let Some(index) = input.iter().position(|v| !v.is_finite()) {
        return Err(InputError::NonFinite { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input() {
        assert!(validate_input(&[]).is_ok());
        assert!(validate_input(&[1.0, -2.5]).is_ok());
        assert_eq!(
            validate_input(&[1.0, f64::NAN]),
            Err(InputError::NonFinite { index: 1 })
        );
        assert_eq!(
            validate_input(&[f64::INFINITY]),
            Err(InputError::NonFinite { index: 0 })
        );
        let long = vec![0.0; MAX_INPUT_LEN + 1];
        assert!(matches!(
            validate_input(&long),
            Err(InputError::TooLong { .. })
        ));
    }

    #[test]
    fn test_closures_are_algorithms() {
        let echo = |input: &[f64]| -> Result<FrameStream, AlgorithmError> {
            validate_input(input)?;
            let frame = Frame::snapshot(input);
            Ok(Box::new(std::iter::once(frame)))
        };
        assert_eq!(echo.run(&[2.0]).unwrap().count(), 1);
        assert!(matches!(
            echo.run(&[f64::NEG_INFINITY]),
            Err(AlgorithmError::InvalidInput(InputError::NonFinite { index: 0 }))
        ));
    }
}
