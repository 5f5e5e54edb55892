//! Frame types: immutable snapshots of algorithm state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counter key for element comparisons.
pub const COMPARISONS: &str = "comparisons";
/// Counter key for element swaps.
pub const SWAPS: &str = "swaps";
/// Counter key for single-element writes (merge-style algorithms).
pub const WRITES: &str = "writes";

/// Named, monotonically non-decreasing counters attached to a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counters(BTreeMap<String, u64>);

impl Counters {
    /// Create counters with the given keys initialized to zero.
    pub fn with_keys(keys: &[&str]) -> Self {
        Self(keys.iter().map(|k| (k.to_string(), 0)).collect())
    }

    /// Current value of a counter (0 when absent).
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Increment a counter by one.
    pub fn bump(&mut self, key: &str) {
        *self.0.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True if no counter in `self` is lower than the same counter in `earlier`.
    pub fn dominates(&self, earlier: &Counters) -> bool {
        earlier.iter().all(|(k, v)| self.get(k) >= v)
    }
}

/// Rendering-only annotations for a frame.
///
/// Roles carry no algorithmic meaning; a renderer maps them to colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compared: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swapped: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<usize>,
}

impl Highlights {
    pub fn compared(a: usize, b: usize) -> Self {
        Self {
            compared: Some((a, b)),
            ..Default::default()
        }
    }

    pub fn swapped(a: usize, b: usize) -> Self {
        Self {
            swapped: Some((a, b)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.compared.is_none()
            && self.swapped.is_none()
            && self.pivot.is_none()
            && self.indices.is_empty()
    }

    /// Role of a single element, by rendering precedence.
    pub fn role_of(&self, index: usize) -> Option<Role> {
        let hits = |pair: Option<(usize, usize)>| pair.is_some_and(|(a, b)| a == index || b == index);
        if hits(self.swapped) {
            Some(Role::Swapped)
        } else if hits(self.compared) {
            Some(Role::Compared)
        } else if self.pivot == Some(index) {
            Some(Role::Pivot)
        } else if self.indices.contains(&index) {
            Some(Role::Highlighted)
        } else {
            None
        }
    }
}

/// Highlight role of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Compared,
    Swapped,
    Pivot,
    Highlighted,
}

/// One complete snapshot of algorithm state.
///
/// A frame never depends on the frames before it: seeking directly to
/// frame `k` renders the same as playing frames `0..=k` in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Full dataset at this instant.
    pub array: Vec<f64>,
    /// 1-based pseudocode line. `None` and `Some(0)` both mean no active line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Counters::is_empty")]
    pub counters: Counters,
    #[serde(default, skip_serializing_if = "Highlights::is_empty")]
    pub highlights: Highlights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
}

impl Frame {
    /// Start a frame from a snapshot of `array`.
    pub fn snapshot(array: &[f64]) -> Self {
        Self {
            array: array.to_vec(),
            ..Default::default()
        }
    }

    pub fn line(mut self, line: u32) -> Self {
        self.pc_line = Some(line);
        self
    }

    pub fn counters(mut self, counters: &Counters) -> Self {
        self.counters = counters.clone();
        self
    }

    pub fn highlights(mut self, highlights: Highlights) -> Self {
        self.highlights = highlights;
        self
    }

    pub fn explain(mut self, text: impl Into<String>) -> Self {
        self.explain = Some(text.into());
        self
    }

    /// Active pseudocode line, with `0` normalized to `None`.
    pub fn active_line(&self) -> Option<u32> {
        self.pc_line.filter(|&l| l != 0)
    }

    /// True if the frame is annotated with a swap.
    pub fn is_swap(&self) -> bool {
        self.highlights.swapped.is_some()
    }

    /// True if the snapshot is non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.array.windows(2).all(|w| w[0] <= w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_line_normalizes_zero() {
        let f = Frame::snapshot(&[1.0]).line(0);
        assert_eq!(f.active_line(), None);
        let f = Frame::snapshot(&[1.0]).line(3);
        assert_eq!(f.active_line(), Some(3));
        assert_eq!(Frame::snapshot(&[]).active_line(), None);
    }

    #[test]
    fn test_counters_bump_and_dominate() {
        let mut a = Counters::with_keys(&[COMPARISONS, SWAPS]);
        let before = a.clone();
        a.bump(SWAPS);
        assert_eq!(a.get(SWAPS), 1);
        assert_eq!(a.get(COMPARISONS), 0);
        assert_eq!(a.get("missing"), 0);
        assert!(a.dominates(&before));
        assert!(!before.dominates(&a));
    }

    #[test]
    fn test_role_precedence() {
        let h = Highlights {
            compared: Some((1, 2)),
            swapped: Some((2, 3)),
            pivot: Some(4),
            indices: vec![4, 5],
        };
        assert_eq!(h.role_of(2), Some(Role::Swapped));
        assert_eq!(h.role_of(1), Some(Role::Compared));
        assert_eq!(h.role_of(4), Some(Role::Pivot));
        assert_eq!(h.role_of(5), Some(Role::Highlighted));
        assert_eq!(h.role_of(0), None);
    }

    #[test]
    fn test_frame_json_omits_empty_fields() {
        let f = Frame::snapshot(&[3.0, 1.0]);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, r#"{"array":[3.0,1.0]}"#);

        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
