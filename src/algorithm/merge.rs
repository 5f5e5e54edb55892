//! Top-down merge sort with the recursion flattened into a merge schedule.

use super::{Algorithm, AlgorithmError, FrameStream, validate_input};
use crate::schema::{COMPARISONS, Counters, Frame, Highlights, WRITES};

/// Stable top-down merge sort.
///
/// Pseudocode lines:
/// 1. `sort(l, r): if r - l ≤ 1 return; m ← ⌊(l + r) / 2⌋; sort(l, m); sort(m, r)`
/// 2. `  merge a[l..m) and a[m..r)`
/// 3. `  while both runs non-empty: compare heads`
/// 4. `    write the smaller head to a[k]`
/// 5. `  copy the remaining run`
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSort;

impl Algorithm for MergeSort {
    fn run(&self, input: &[f64]) -> Result<FrameStream, AlgorithmError> {
        validate_input(input)?;
        Ok(Box::new(MergeSteps::new(input)))
    }
}

/// Post-order list of `(l, m, r)` merges, exactly as the recursion would run them.
fn plan(l: usize, r: usize, out: &mut Vec<(usize, usize, usize)>) {
    if r - l <= 1 {
        return;
    }
    let m = (l + r) / 2;
    plan(l, m, out);
    plan(m, r, out);
    out.push((l, m, r));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    MergeStart,
    Compare,
    Write { from_right: bool },
    Drain,
    Finish,
    Done,
}

/// Suspended merge sort run.
#[derive(Debug, Clone)]
pub struct MergeSteps {
    a: Vec<f64>,
    merges: Vec<(usize, usize, usize)>,
    current: usize,
    left: Vec<f64>,
    right: Vec<f64>,
    i: usize,
    j: usize,
    k: usize,
    counters: Counters,
    phase: Phase,
}

impl MergeSteps {
    pub fn new(input: &[f64]) -> Self {
        let mut merges = Vec::new();
        plan(0, input.len(), &mut merges);
        Self {
            a: input.to_vec(),
            merges,
            current: 0,
            left: Vec::new(),
            right: Vec::new(),
            i: 0,
            j: 0,
            k: 0,
            counters: Counters::with_keys(&[COMPARISONS, WRITES]),
            phase: Phase::Start,
        }
    }

    fn frame(&self, line: u32) -> Frame {
        Frame::snapshot(&self.a)
            .line(line)
            .counters(&self.counters)
    }

    fn bounds(&self) -> (usize, usize, usize) {
        self.merges[self.current]
    }

    fn write(&mut self, value: f64) -> usize {
        let k = self.k;
        self.a[k] = value;
        self.k += 1;
        self.counters.bump(WRITES);
        k
    }

    /// Pick the phase that follows a write into the current merge.
    fn after_write(&mut self) {
        let (_, _, r) = self.bounds();
        self.phase = if self.i < self.left.len() && self.j < self.right.len() {
            Phase::Compare
        } else if self.k < r {
            Phase::Drain
        } else {
            self.current += 1;
            if self.current < self.merges.len() {
                Phase::MergeStart
            } else {
                Phase::Finish
            }
        };
    }
}

impl Iterator for MergeSteps {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        match self.phase {
            Phase::Start => {
                self.phase = if self.merges.is_empty() {
                    Phase::Finish
                } else {
                    Phase::MergeStart
                };
                Some(self.frame(1).explain("Start Merge Sort."))
            }
            Phase::MergeStart => {
                let (l, m, r) = self.bounds();
                self.left = self.a[l..m].to_vec();
                self.right = self.a[m..r].to_vec();
                self.i = 0;
                self.j = 0;
                self.k = l;
                self.phase = Phase::Compare;
                Some(
                    self.frame(2)
                        .highlights(Highlights {
                            indices: (l..r).collect(),
                            ..Default::default()
                        })
                        .explain(format!("Merge runs [{l}..{m}) and [{m}..{r}).")),
                )
            }
            Phase::Compare => {
                let (l, m, _) = self.bounds();
                let (x, y) = (self.left[self.i], self.right[self.j]);
                self.counters.bump(COMPARISONS);
                let from_right = y < x;
                self.phase = Phase::Write { from_right };
                Some(
                    self.frame(3)
                        .highlights(Highlights::compared(l + self.i, m + self.j))
                        .explain(format!("Compare left head {x} with right head {y}.")),
                )
            }
            Phase::Write { from_right } => {
                let value = if from_right {
                    self.j += 1;
                    self.right[self.j - 1]
                } else {
                    self.i += 1;
                    self.left[self.i - 1]
                };
                let k = self.write(value);
                let side = if from_right { "right" } else { "left" };
                let frame = self
                    .frame(4)
                    .highlights(Highlights {
                        indices: vec![k],
                        ..Default::default()
                    })
                    .explain(format!("Write {value} from the {side} run to a[{k}]."));
                self.after_write();
                Some(frame)
            }
            Phase::Drain => {
                let value = if self.i < self.left.len() {
                    self.i += 1;
                    self.left[self.i - 1]
                } else {
                    self.j += 1;
                    self.right[self.j - 1]
                };
                let k = self.write(value);
                let frame = self
                    .frame(5)
                    .highlights(Highlights {
                        indices: vec![k],
                        ..Default::default()
                    })
                    .explain(format!("Copy remaining {value} to a[{k}]."));
                self.after_write();
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
    fn test_plan_is_post_order() {
        let mut merges = Vec::new();
        plan(0, 4, &mut merges);
        assert_eq!(merges, vec![(0, 1, 2), (2, 3, 4), (0, 2, 4)]);

        merges.clear();
        plan(0, 1, &mut merges);
        assert!(merges.is_empty());
    }

    #[test]
    fn test_sorts_small_input() {
        let timeline = materialize(&MergeSort, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        let last = timeline.last().unwrap();
        assert_eq!(last.array, vec![1.0, 3.0, 5.0, 8.0]);
        // every level writes every element once: 2 levels * 4 elements
        assert_eq!(last.counters.get(WRITES), 8);
        assert_eq!(timeline.count_where(Frame::is_swap), 0);
    }

    #[test]
    fn test_trivial_inputs_yield_two_frames() {
        assert_eq!(MergeSort.run(&[]).unwrap().count(), 2);
        assert_eq!(MergeSort.run(&[1.0]).unwrap().count(), 2);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_complete(input in prop::collection::vec(-30i64..30, 0..40)) {
            let input: Vec<f64> = input.into_iter().map(|v| v as f64).collect();
            let timeline = materialize(&MergeSort, &input).unwrap();
            let mut expected = input.clone();
            expected.sort_by(f64::total_cmp);
            prop_assert_eq!(&timeline.last().unwrap().array, &expected);
            prop_assert!(timeline.iter().all(|f| f.array.len() == input.len()));
        }
    }
}
