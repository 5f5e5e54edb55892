//! Addressable session state (the flat key/value mapping embedded in share links).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::dataset::MAX_INPUT_LEN;

pub const KEY_STEP: &str = "step";
pub const KEY_SPEED: &str = "speed";
pub const KEY_N: &str = "n";
pub const KEY_SEED: &str = "seed";

/// Playback position plus the inputs needed to rebuild the dataset.
///
/// Restoring from a mapping never fails: missing or malformed values fall
/// back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    pub step: usize,
    pub speed: f64,
    pub n: usize,
    pub seed: u64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            step: 0,
            speed: 1.0,
            n: 16,
            seed: 42,
        }
    }
}

impl SessionParams {
    /// Read params from a string mapping.
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut params = Self::default();
        params.apply_map(map);
        params
    }

    /// Override fields with the well-formed values in `map`, keeping the rest.
    pub fn apply_map(&mut self, map: &BTreeMap<String, String>) {
        let get = |key: &str| map.get(key).map(|s| s.trim());

        if let Some(step) = get(KEY_STEP).and_then(|s| s.parse::<i64>().ok()) {
            self.step = step.max(0) as usize;
        }
        if let Some(speed) = get(KEY_SPEED)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
        {
            self.speed = speed;
        }
        if let Some(n) = get(KEY_N).and_then(|s| s.parse::<usize>().ok()) {
            self.n = n.min(MAX_INPUT_LEN);
        }
        if let Some(seed) = get(KEY_SEED).and_then(|s| s.parse::<u64>().ok()) {
            self.seed = seed;
        }
    }

    /// Write params as a string mapping.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (KEY_STEP.to_string(), self.step.to_string()),
            (KEY_SPEED.to_string(), self.speed.to_string()),
            (KEY_N.to_string(), self.n.to_string()),
            (KEY_SEED.to_string(), self.seed.to_string()),
        ])
    }

    /// Parse a `key=value&key=value` query string (leading `?` allowed).
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        params.apply_query(query);
        params
    }

    /// Like [`apply_map`](Self::apply_map) for a query string.
    pub fn apply_query(&mut self, query: &str) {
        let map = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.apply_map(&map);
    }

    /// Render as a query string in a stable key order.
    pub fn to_query(&self) -> String {
        format!(
            "{KEY_STEP}={}&{KEY_SPEED}={}&{KEY_N}={}&{KEY_SEED}={}",
            self.step, self.speed, self.n, self.seed
        )
    }
}
