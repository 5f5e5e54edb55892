//! Selection sort: move the minimum of the unsorted suffix into place.

use super::{Algorithm, AlgorithmError, FrameStream, validate_input};
use crate::schema::{COMPARISONS, Counters, Frame, Highlights, SWAPS};

/// Selection sort. Performs at most `n - 1` swaps; not stable.
///
/// Pseudocode lines:
/// 1. `for i ← 0..n-2`
/// 2. `  min ← i`
/// 3. `  for j ← i+1..n-1`
/// 4. `    if a[j] < a[min] then min ← j`
/// 5. `  if min ≠ i then swap a[i], a[min]`
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSort;

impl Algorithm for SelectionSort {
    fn run(&self, input: &[f64]) -> Result<FrameStream, AlgorithmError> {
        validate_input(input)?;
        Ok(Box::new(SelectionSteps::new(input)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    PassStart,
    Compare,
    NewMin,
    Place,
    Finish,
    Done,
}

/// Suspended selection sort run.
#[derive(Debug, Clone)]
pub struct SelectionSteps {
    a: Vec<f64>,
    i: usize,
    j: usize,
    min: usize,
    counters: Counters,
    phase: Phase,
}

impl SelectionSteps {
    pub fn new(input: &[f64]) -> Self {
        Self {
            a: input.to_vec(),
            i: 0,
            j: 0,
            min: 0,
            counters: Counters::with_keys(&[COMPARISONS, SWAPS]),
            phase: Phase::Start,
        }
    }

    fn frame(&self, line: u32) -> Frame {
        Frame::snapshot(&self.a)
            .line(line)
            .counters(&self.counters)
    }

    fn scan_highlights(&self) -> Highlights {
        Highlights {
            pivot: Some(self.min),
            indices: vec![self.i],
            ..Default::default()
        }
    }

    fn advance_scan(&mut self) {
        self.j += 1;
        self.phase = if self.j < self.a.len() {
            Phase::Compare
        } else {
            Phase::Place
        };
    }
}

impl Iterator for SelectionSteps {
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
                Some(self.frame(1).explain("Start Selection Sort."))
            }
            Phase::PassStart => {
                self.min = self.i;
                self.j = self.i + 1;
                self.phase = Phase::Compare;
                Some(
                    self.frame(1)
                        .highlights(self.scan_highlights())
                        .explain(format!(
                            "Pass {}/{}: find the minimum in [{}..{}].",
                            self.i + 1,
                            n - 1,
                            self.i,
                            n - 1
                        )),
                )
            }
            Phase::Compare => {
                let (j, m) = (self.j, self.min);
                self.counters.bump(COMPARISONS);
                let frame = self
                    .frame(3)
                    .highlights(Highlights {
                        compared: Some((j, m)),
                        ..self.scan_highlights()
                    })
                    .explain(format!(
                        "Compare a[{j}] ({}) with current min a[{m}] ({}).",
                        self.a[j], self.a[m]
                    ));
                if self.a[j] < self.a[m] {
                    self.phase = Phase::NewMin;
                } else {
                    self.advance_scan();
                }
                Some(frame)
            }
            Phase::NewMin => {
                self.min = self.j;
                let frame = self
                    .frame(4)
                    .highlights(self.scan_highlights())
                    .explain(format!(
                        "New minimum at index {} (value {}).",
                        self.min, self.a[self.min]
                    ));
                self.advance_scan();
                Some(frame)
            }
            Phase::Place => {
                let (i, m) = (self.i, self.min);
                let frame = if m != i {
                    self.a.swap(i, m);
                    self.counters.bump(SWAPS);
                    self.frame(5)
                        .highlights(Highlights::swapped(i, m))
                        .explain(format!("Swap a[{i}] and a[{m}]."))
                } else {
                    self.frame(5)
                        .highlights(self.scan_highlights())
                        .explain(format!("Position {i} already holds the minimum; no swap."))
                };
                self.i += 1;
                self.phase = if self.i < n - 1 {
                    Phase::PassStart
                } else {
                    Phase::Finish
                };
                Some(frame)
            }
            Phase::Finish => {
                self.phase = Phase::Done;
                Some(self.frame(0).explain("Sorted!"))
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
    fn test_sorts_small_input() {
        let timeline = materialize(&SelectionSort, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        let last = timeline.last().unwrap();
        assert_eq!(last.array, vec![1.0, 3.0, 5.0, 8.0]);
        assert_eq!(last.counters.get(COMPARISONS), 6);
        // 5<->1, then 3 already in place, then 8<->5
        assert_eq!(last.counters.get(SWAPS), 2);
        assert_eq!(timeline.count_where(Frame::is_swap), 2);
    }

    #[test]
    fn test_no_swap_pass_is_reported() {
        let timeline = materialize(&SelectionSort, &[1.0, 2.0]).unwrap();
        let place = timeline
            .iter()
            .find(|f| f.pc_line == Some(5))
            .unwrap();
        assert!(!place.is_swap());
        assert_eq!(
            place.explain.as_deref(),
            Some("Position 0 already holds the minimum; no swap.")
        );
    }

    #[test]
    fn test_trivial_inputs_yield_two_frames() {
        assert_eq!(SelectionSort.run(&[]).unwrap().count(), 2);
        assert_eq!(SelectionSort.run(&[4.0]).unwrap().count(), 2);
    }

    #[test]
    fn test_first_tie_stays_minimum() {
        let timeline = materialize(&SelectionSort, &[2.0, 2.0]).unwrap();
        assert_eq!(timeline.count_where(Frame::is_swap), 0);
        assert!(timeline.iter().all(|f| f.pc_line != Some(4)));
    }

    proptest! {
        #[test]
        fn prop_swap_bound(input in prop::collection::vec(-20i64..20, 0..24)) {
            let input: Vec<f64> = input.into_iter().map(|v| v as f64).collect();
            let timeline = materialize(&SelectionSort, &input).unwrap();
            let bound = input.len().saturating_sub(1);
            prop_assert!(timeline.count_where(Frame::is_swap) <= bound);
            prop_assert!(timeline.last().unwrap().is_sorted());
            prop_assert!(timeline.iter().all(|f| f.array.len() == input.len()));
        }

        #[test]
        fn prop_deterministic(input in prop::collection::vec(0i64..100, 0..20)) {
            let input: Vec<f64> = input.into_iter().map(|v| v as f64).collect();
            let a = materialize(&SelectionSort, &input).unwrap();
            let b = materialize(&SelectionSort, &input).unwrap();
            prop_assert_eq!(a.as_slice(), b.as_slice());
        }
    }
}
