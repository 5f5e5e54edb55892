//! Built-in sorting topic registrations.

use std::sync::Arc;

use super::{AlgorithmMeta, Catalog, CatalogEntry, Complexity, Difficulty, Loader, LoaderError};
use crate::algorithm::{Algorithm, BubbleSort, MergeSort, SelectionSort};

pub const TOPIC: &str = "sorting";

/// Loader that constructs `A` on first use.
fn deferred<A: Algorithm + Default + 'static>() -> Loader {
    Arc::new(|| Ok::<_, LoaderError>(Arc::new(A::default()) as Arc<dyn Algorithm>))
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn complexity(best: &str, average: &str, worst: &str, space: &str, stable: bool) -> Complexity {
    Complexity {
        best: best.to_string(),
        average: average.to_string(),
        worst: worst.to_string(),
        space: space.to_string(),
        stable,
        in_place: space == "O(1)",
    }
}

/// Register every sorting algorithm, in display order.
pub fn register_sorting(catalog: &mut Catalog) {
    catalog.register(CatalogEntry::new(bubble_meta(), deferred::<BubbleSort>()));
    catalog.register(CatalogEntry::new(selection_meta(), deferred::<SelectionSort>()));
    catalog.register(CatalogEntry::new(merge_meta(), deferred::<MergeSort>()));
}

fn bubble_meta() -> AlgorithmMeta {
    AlgorithmMeta {
        topic: TOPIC.to_string(),
        slug: "bubble-sort".to_string(),
        title: "Bubble Sort".to_string(),
        summary: "Repeatedly swap adjacent out-of-order pairs.".to_string(),
        pseudocode: lines(&[
            "for i ← 0..n-2",
            "  for j ← 0..n-2-i",
            "    if a[j] > a[j+1] swap a[j], a[j+1]",
        ]),
        complexity: complexity("O(n)", "O(n²)", "O(n²)", "O(1)", true),
        about: "Bubble Sort scans adjacent pairs and swaps them if they are out of order. \
                Simple and visual, but inefficient for large n."
            .to_string(),
        pros: lines(&["Very easy to implement and teach", "Stable and in-place"]),
        cons: lines(&[
            "Quadratic average and worst-case time",
            "Poor practical performance compared to Merge Sort",
        ]),
        tags: lines(&["comparison", "stable", "in-place"]),
        difficulty: Difficulty::Easy,
    }
}

fn selection_meta() -> AlgorithmMeta {
    AlgorithmMeta {
        topic: TOPIC.to_string(),
        slug: "selection-sort".to_string(),
        title: "Selection Sort".to_string(),
        summary: "Select the minimum from the unsorted suffix and swap it into place."
            .to_string(),
        pseudocode: lines(&[
            "for i ← 0..n-2",
            "  min ← i",
            "  for j ← i+1..n-1",
            "    if a[j] < a[min] then min ← j",
            "  if min ≠ i then swap a[i], a[min]",
        ]),
        complexity: complexity("O(n²)", "O(n²)", "O(n²)", "O(1)", false),
        about: "Repeatedly select the smallest element from the unsorted suffix [i..n-1] \
                and swap it with position i. After n-1 passes the array is sorted."
            .to_string(),
        pros: lines(&["Very simple to reason about", "At most n-1 swaps"]),
        cons: lines(&[
            "Quadratic comparisons regardless of input",
            "Not stable",
            "Not adaptive",
        ]),
        tags: lines(&["comparison", "in-place"]),
        difficulty: Difficulty::Easy,
    }
}

fn merge_meta() -> AlgorithmMeta {
    AlgorithmMeta {
        topic: TOPIC.to_string(),
        slug: "merge-sort".to_string(),
        title: "Merge Sort".to_string(),
        summary: "Split in halves, sort each half, merge the sorted halves.".to_string(),
        pseudocode: lines(&[
            "sort(l, r): if r - l ≤ 1 return; m ← ⌊(l + r) / 2⌋; sort(l, m); sort(m, r)",
            "  merge a[l..m) and a[m..r)",
            "  while both runs non-empty: compare heads",
            "    write the smaller head to a[k]",
            "  copy the remaining run",
        ]),
        complexity: complexity("O(n log n)", "O(n log n)", "O(n log n)", "O(n)", true),
        about: "Merge Sort divides the array into halves until runs have one element, then \
                merges neighbouring runs back together in order."
            .to_string(),
        pros: lines(&["Guaranteed O(n log n)", "Stable"]),
        cons: lines(&["Needs O(n) extra space"]),
        tags: lines(&["comparison", "stable", "divide-and-conquer"]),
        difficulty: Difficulty::Medium,
    }
}
