//! Bubble sort: sweep adjacent pairs, swapping the out-of-order ones.

use super::{Algorithm, AlgorithmError, FrameStream, validate_input};
use crate::schema::{COMPARISONS, Counters, Frame, Highlights, SWAPS};

/// Stable bubble sort without the early-exit optimization.
///
/// Pseudocode lines:
/// 1. `for i ← 0..n-2`
/// 2. `  for j ← 0..n-2-i`
/// 3. `    if a[j] > a[j+1] swap a[j], a[j+1]`
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl Algorithm for BubbleSort {
    fn run(&self, input: &[f64]) -> Result<FrameStream, AlgorithmError> {
        validate_input(input)?;
        Ok(Box::new(BubbleSteps::new(input)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    PassStart,
    Compare,
    Swap,
    Finish,
    Done,
}

/// Suspended bubble sort run; yields one frame per `next()`.
#[derive(Debug, Clone)]
pub struct BubbleSteps {
    a: Vec<f64>,
    i: usize,
    j: usize,
    counters: Counters,
    phase: Phase,
}

impl BubbleSteps {
    pub fn new(input: &[f64]) -> Self {
        Self {
            a: input.to_vec(),
            i: 0,
            j: 0,
            counters: Counters::with_keys(&[COMPARISONS, SWAPS]),
            phase: Phase::Start,
        }
    }

    fn frame(&self, line: u32) -> Frame {
        Frame::snapshot(&self.a)
            .line(line)
            .counters(&self.counters)
    }

    /// Move to the next inner iteration, or the next pass.
    fn advance(&mut self) {
        let n = self.a.len();
        self.j += 1;
        if self.j < n - 1 - self.i {
            self.phase = Phase::Compare;
            return;
        }
        self.i += 1;
        self.j = 0;
        self.phase = if self.i < n - 1 {
            Phase::PassStart
        } else {
            Phase::Finish
        };
    }
}

impl Iterator for BubbleSteps {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let n = self.a.len();
        match self.phase {
            Phase::Start => {
                self.phase = if n >= 2 {
                    Phase::PassStart
                } else {
                    Phase::Finish
                };
                Some(self.frame(1).explain(
                    "Start Bubble Sort: sweep the array and swap adjacent out-of-order pairs.",
                ))
            }
            Phase::PassStart => {
                self.phase = Phase::Compare;
                let i = self.i;
                Some(
                    self.frame(1)
                        .explain(format!("Outer loop i={i}. The last {i} elements are in place.")),
                )
            }
            Phase::Compare => {
                let j = self.j;
                let (x, y) = (self.a[j], self.a[j + 1]);
                self.counters.bump(COMPARISONS);
                let frame = self
                    .frame(2)
                    .highlights(Highlights::compared(j, j + 1))
                    .explain(format!("Compare a[{j}] ({x}) vs a[{}] ({y}).", j + 1));
                if x > y {
                    self.phase = Phase::Swap;
                } else {
                    self.advance();
                }
                Some(frame)
            }
            Phase::Swap => {
                let j = self.j;
                self.a.swap(j, j + 1);
                self.counters.bump(SWAPS);
                let (small, large) = (self.a[j], self.a[j + 1]);
                let frame = self
                    .frame(3)
                    .highlights(Highlights::swapped(j, j + 1))
                    .explain(format!("Swap them because {large} > {small}."));
                self.advance();
                Some(frame)
            }
            Phase::Finish => {
                self.phase = Phase::Done;
                Some(self.frame(0).explain("Done. Array is sorted."))
            }
            Phase::Done => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::materialize;
    use proptest::prelude::*;

    #[test]
    fn test_concrete_scenario() {
        let timeline = materialize(&BubbleSort, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        let last = timeline.last().unwrap();

        assert_eq!(last.array, vec![1.0, 3.0, 5.0, 8.0]);
        assert_eq!(timeline.count_where(Frame::is_swap), 4);
        assert_eq!(last.counters.get(SWAPS), 4);
        assert_eq!(last.counters.get(COMPARISONS), 6);
        assert_eq!(last.active_line(), None);
    }

    #[test]
    fn test_frame_layout() {
        // initial + 3 pass starts + 6 comparisons + 4 swaps + terminal
        let timeline = materialize(&BubbleSort, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        assert_eq!(timeline.len(), 1 + 3 + 6 + 4 + 1);

        let first = timeline.first().unwrap();
        assert_eq!(first.array, vec![5.0, 3.0, 8.0, 1.0]);
        assert_eq!(first.pc_line, Some(1));
        assert_eq!(first.counters.get(COMPARISONS), 0);

        let compare = timeline.get(2).unwrap();
        assert_eq!(compare.highlights.compared, Some((0, 1)));
        assert_eq!(compare.explain.as_deref(), Some("Compare a[0] (5) vs a[1] (3)."));

        let swap = timeline.get(3).unwrap();
        assert_eq!(swap.array, vec![3.0, 5.0, 8.0, 1.0]);
        assert_eq!(swap.highlights.swapped, Some((0, 1)));
        assert_eq!(swap.explain.as_deref(), Some("Swap them because 5 > 3."));
    }

    #[test]
    fn test_trivial_inputs_yield_two_frames() {
        for input in [vec![], vec![7.0]] {
            let frames: Vec<Frame> = BubbleSort.run(&input).unwrap().collect();
            assert_eq!(frames.len(), 2);
            assert_eq!(frames[1].counters.get(COMPARISONS), 0);
            assert!(frames.iter().all(|f| f.explain.is_some()));
        }
    }

    #[test]
    fn test_equal_values_never_swap() {
        let timeline = materialize(&BubbleSort, &[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(timeline.count_where(Frame::is_swap), 0);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(BubbleSort.run(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = vec![3.0, 2.0, 1.0];
        let _ = materialize(&BubbleSort, &input).unwrap();
        assert_eq!(input, vec![3.0, 2.0, 1.0]);
    }

    /// Pair each tracked original position with its key.
    fn keyed_positions(positions: &[usize], keys: &[i64]) -> Vec<(i64, usize)> {
        positions.iter().map(|&pos| (keys[pos], pos)).collect()
    }

    proptest! {
        #[test]
        fn prop_terminal_frame_sorted(input in prop::collection::vec(-50i64..50, 0..24)) {
            let input: Vec<f64> = input.into_iter().map(|v| v as f64).collect();
            let timeline = materialize(&BubbleSort, &input).unwrap();
            prop_assert!(timeline.last().unwrap().is_sorted());
            prop_assert!(timeline.iter().all(|f| f.array.len() == input.len()));
        }

        #[test]
        fn prop_counters_monotonic(input in prop::collection::vec(0i64..10, 0..16)) {
            let input: Vec<f64> = input.into_iter().map(|v| v as f64).collect();
            let timeline = materialize(&BubbleSort, &input).unwrap();
            for pair in timeline.as_slice().windows(2) {
                prop_assert!(pair[1].counters.dominates(&pair[0].counters));
            }
        }

        #[test]
        fn prop_stable_for_duplicates(keys in prop::collection::vec(0i64..4, 2..16)) {
            // Replay every swap on the original positions; equal keys must end
            // up in their original relative order.
            let input: Vec<f64> = keys.iter().map(|&k| k as f64).collect();
            let timeline = materialize(&BubbleSort, &input).unwrap();

            let mut positions: Vec<usize> = (0..keys.len()).collect();
            for frame in timeline.iter() {
                if let Some((a, b)) = frame.highlights.swapped {
                    positions.swap(a, b);
                }
            }
            let tracked = keyed_positions(&positions, &keys);
            for pair in tracked.windows(2) {
                prop_assert!(pair[0].0 <= pair[1].0);
                if pair[0].0 == pair[1].0 {
                    prop_assert!(pair[0].1 < pair[1].1);
                }
            }
        }
    }
}
