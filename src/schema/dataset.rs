//! Seeded dataset generation for visualization inputs.

use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Largest dataset any built-in algorithm accepts.
///
/// Reference sorts emit O(n²) frames, so inputs are capped well below the
/// point where materialization becomes noticeable.
pub const MAX_INPUT_LEN: usize = 512;

fn default_n() -> usize {
    16
}

fn default_seed() -> u64 {
    42
}

fn default_min() -> i64 {
    5
}

fn default_max() -> i64 {
    99
}

/// Value layout of a generated dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetShape {
    /// Uniform random integers.
    #[default]
    Random,
    /// Random values in descending order (worst case for most sorts).
    Reversed,
    /// Ascending values with a few adjacent pairs swapped.
    NearlySorted,
    /// Values drawn from a small set of distinct levels.
    FewUnique,
    /// Normally distributed around the middle of the range.
    Gaussian,
}

impl std::str::FromStr for DatasetShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "reversed" => Ok(Self::Reversed),
            "nearly-sorted" => Ok(Self::NearlySorted),
            "few-unique" => Ok(Self::FewUnique),
            "gaussian" => Ok(Self::Gaussian),
            other => Err(format!("unknown dataset shape: {other}")),
        }
    }
}

/// Deterministic description of a numeric input sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Number of elements.
    #[serde(default = "default_n")]
    pub n: usize,
    /// Random seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Smallest value (inclusive).
    #[serde(default = "default_min")]
    pub min: i64,
    /// Largest value (inclusive).
    #[serde(default = "default_max")]
    pub max: i64,
    #[serde(default)]
    pub shape: DatasetShape,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            n: default_n(),
            seed: default_seed(),
            min: default_min(),
            max: default_max(),
            shape: DatasetShape::default(),
        }
    }
}

impl DatasetSpec {
    pub fn new(n: usize, seed: u64) -> Self {
        Self {
            n,
            seed,
            ..Default::default()
        }
    }

    /// Generate the dataset. Equal specs always produce equal values.
    pub fn generate(&self) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };

        let mut values: Vec<i64> = match self.shape {
            DatasetShape::Random | DatasetShape::Reversed | DatasetShape::NearlySorted => {
                (0..self.n).map(|_| rng.gen_range(lo..=hi)).collect()
            }
            DatasetShape::FewUnique => {
                let levels: Vec<i64> = (0..4).map(|_| rng.gen_range(lo..=hi)).collect();
                (0..self.n)
                    .map(|_| levels[rng.gen_range(0..levels.len())])
                    .collect()
            }
            DatasetShape::Gaussian => {
                // f64 so that spans near the i64 limits cannot overflow.
                let mean = (lo as f64 + hi as f64) / 2.0;
                let sd = ((hi as f64 - lo as f64) / 6.0).max(f64::EPSILON);
                match Normal::new(mean, sd) {
                    Ok(normal) => (0..self.n)
                        .map(|_| (normal.sample(&mut rng).round() as i64).clamp(lo, hi))
                        .collect(),
                    Err(_) => vec![mean.round() as i64; self.n],
                }
            }
        };

        match self.shape {
            DatasetShape::Reversed => values.sort_unstable_by(|a, b| b.cmp(a)),
            DatasetShape::NearlySorted => {
                values.sort_unstable();
                if values.len() >= 2 {
                    let swaps = (values.len() / 10).max(1);
                    for _ in 0..swaps {
                        let i = rng.gen_range(0..values.len() - 1);
                        values.swap(i, i + 1);
                    }
                }
            }
            _ => {}
        }

        values.into_iter().map(|v| v as f64).collect()
    }
}
