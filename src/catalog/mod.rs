//! Algorithm catalog: topic/slug lookup with deferred loaders.
//!
//! The catalog is built once at startup and then passed around by reference.
//! Entries carry cheap metadata and a [`Loader`] that fetches the algorithm
//! body only when a session actually needs it.
//!
//! # Example
//!
//! ```rust
//! use stepviz::catalog::Catalog;
//!
//! let catalog = Catalog::with_builtins();
//! let entry = catalog.find("sorting", "bubble-sort").unwrap();
//! assert_eq!(entry.meta.title, "Bubble Sort");
//! assert!(catalog.find("sorting", "bogo-sort").is_none());
//! ```

mod sorting;

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

pub use sorting::register_sorting;

/// Deferred retrieval of an algorithm body.
pub type Loader = Arc<dyn Fn() -> Result<Arc<dyn Algorithm>, LoaderError> + Send + Sync>;

/// Asymptotic cost descriptors shown alongside an algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub best: String,
    pub average: String,
    pub worst: String,
    pub space: String,
    pub stable: bool,
    pub in_place: bool,
}

/// Teaching difficulty label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Static description of a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmMeta {
    pub topic: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    /// Pseudocode lines; frame `pc_line` values index into this list (1-based).
    pub pseudocode: Vec<String>,
    pub complexity: Complexity,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl AlgorithmMeta {
    /// Pseudocode line for a 1-based `pc_line`, if any.
    pub fn pseudocode_line(&self, line: u32) -> Option<&str> {
        let index = (line as usize).checked_sub(1)?;
        self.pseudocode.get(index).map(String::as_str)
    }
}

/// One registered algorithm.
///
/// Clones share the loader and its cache, so a body loaded through one handle
/// is visible through every other.
#[derive(Clone)]
pub struct CatalogEntry {
    pub meta: AlgorithmMeta,
    loader: Loader,
    loaded: Arc<OnceLock<Arc<dyn Algorithm>>>,
}

impl CatalogEntry {
    pub fn new(meta: AlgorithmMeta, loader: Loader) -> Self {
        Self {
            meta,
            loader,
            loaded: Arc::new(OnceLock::new()),
        }
    }

    /// Entry whose loader always succeeds with `algorithm`.
    pub fn eager(meta: AlgorithmMeta, algorithm: Arc<dyn Algorithm>) -> Self {
        Self::new(meta, Arc::new(move || Ok(Arc::clone(&algorithm))))
    }

    /// Retrieve the algorithm body.
    ///
    /// A successful load is cached; a failure is not, so calling again retries.
    pub fn load(&self) -> Result<Arc<dyn Algorithm>, LoaderError> {
        if let Some(algorithm) = self.loaded.get() {
            return Ok(Arc::clone(algorithm));
        }
        match (self.loader)() {
            Ok(algorithm) => Ok(Arc::clone(self.loaded.get_or_init(|| algorithm))),
            Err(err) => {
                log::warn!(
                    "Loader for {}/{} failed: {}",
                    self.meta.topic,
                    self.meta.slug,
                    err
                );
                Err(err)
            }
        }
    }

    /// Whether the body has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("meta", &self.meta)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Registry of algorithms grouped by topic, in insertion order.
#[derive(Debug, Default)]
pub struct Catalog {
    topics: Vec<(String, Vec<CatalogEntry>)>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in topic registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        register_sorting(&mut catalog);
        catalog.declare_topic("arrays");
        catalog.declare_topic("graphs");
        catalog
    }

    /// Make a topic visible in [`Catalog::topics`] even with no entries yet.
    pub fn declare_topic(&mut self, topic: &str) {
        self.topic_mut(topic);
    }

    /// Add an entry under its `meta.topic`.
    ///
    /// Re-registering an existing `(topic, slug)` replaces the old entry in
    /// place (last write wins, list position kept).
    pub fn register(&mut self, entry: CatalogEntry) {
        let topic = entry.meta.topic.clone();
        let entries = self.topic_mut(&topic);
        if let Some(existing) = entries.iter_mut().find(|e| e.meta.slug == entry.meta.slug) {
            log::warn!(
                "Replacing catalog entry {}/{}",
                entry.meta.topic,
                entry.meta.slug
            );
            *existing = entry;
        } else {
            log::debug!("Registered {}/{}", entry.meta.topic, entry.meta.slug);
            entries.push(entry);
        }
    }

    /// Look up an entry.
    pub fn find(&self, topic: &str, slug: &str) -> Option<&CatalogEntry> {
        self.list(topic).iter().find(|e| e.meta.slug == slug)
    }

    /// Look up an entry, reporting a miss as an error.
    pub fn get(&self, topic: &str, slug: &str) -> Result<&CatalogEntry, CatalogError> {
        self.find(topic, slug).ok_or_else(|| CatalogError::NotFound {
            topic: topic.to_string(),
            slug: slug.to_string(),
        })
    }

    /// Entries for a topic in registration order; empty for unknown topics.
    pub fn list(&self, topic: &str) -> &[CatalogEntry] {
        self.topics
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Topic names in declaration order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|(name, _)| name.as_str())
    }

    /// Every entry, topic by topic.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.topics.iter().flat_map(|(_, entries)| entries.iter())
    }

    pub fn len(&self) -> usize {
        self.topics.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn topic_mut(&mut self, topic: &str) -> &mut Vec<CatalogEntry> {
        let pos = match self.topics.iter().position(|(name, _)| name == topic) {
            Some(pos) => pos,
            None => {
                self.topics.push((topic.to_string(), Vec::new()));
                self.topics.len() - 1
            }
        };
        &mut self.topics[pos].1
    }
}

/// Failure to retrieve an algorithm body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    #[error("Algorithm {slug} is unavailable: {reason}")]
    Unavailable { slug: String, reason: String },
}

/// Catalog lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("No algorithm {slug} in topic {topic}")]
    NotFound { topic: String, slug: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{BubbleSort, SelectionSort};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn meta(topic: &str, slug: &str, title: &str) -> AlgorithmMeta {
        AlgorithmMeta {
            topic: topic.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_and_list_order() {
        let mut catalog = Catalog::new();
        catalog.register(CatalogEntry::eager(meta("sorting", "b", "B"), Arc::new(BubbleSort)));
        catalog.register(CatalogEntry::eager(meta("sorting", "a", "A"), Arc::new(SelectionSort)));
        catalog.register(CatalogEntry::eager(meta("graphs", "c", "C"), Arc::new(BubbleSort)));

        let slugs: Vec<&str> = catalog
            .list("sorting")
            .iter()
            .map(|e| e.meta.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(catalog.topics().collect::<Vec<_>>(), vec!["sorting", "graphs"]);
        assert!(catalog.find("graphs", "c").is_some());
        assert!(catalog.find("graphs", "a").is_none());
        assert!(catalog.list("strings").is_empty());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut catalog = Catalog::new();
        catalog.register(CatalogEntry::eager(meta("sorting", "x", "Old"), Arc::new(BubbleSort)));
        catalog.register(CatalogEntry::eager(meta("sorting", "y", "Y"), Arc::new(BubbleSort)));
        catalog.register(CatalogEntry::eager(meta("sorting", "x", "New"), Arc::new(BubbleSort)));

        let entries = catalog.list("sorting");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].meta.title, "New");
        assert_eq!(entries[1].meta.slug, "y");
    }

    #[test]
    fn test_get_reports_not_found() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.get("sorting", "nope").unwrap_err(),
            CatalogError::NotFound {
                topic: "sorting".to_string(),
                slug: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_loader_failure_is_retried_and_success_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader: Loader = Arc::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(LoaderError::Unavailable {
                    slug: "flaky".to_string(),
                    reason: "transient".to_string(),
                })
            } else {
                Ok(Arc::new(BubbleSort) as Arc<dyn Algorithm>)
            }
        });
        let entry = CatalogEntry::new(meta("sorting", "flaky", "Flaky"), loader);

        assert!(entry.load().is_err());
        assert!(!entry.is_loaded());
        assert!(entry.load().is_ok());
        assert!(entry.is_loaded());
        assert!(entry.load().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let handle = entry.clone();
        assert!(handle.is_loaded());
        assert!(handle.load().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_pseudocode_line_is_one_based() {
        let mut m = meta("sorting", "s", "S");
        m.pseudocode = vec!["first".to_string(), "second".to_string()];
        assert_eq!(m.pseudocode_line(1), Some("first"));
        assert_eq!(m.pseudocode_line(2), Some("second"));
        assert_eq!(m.pseudocode_line(0), None);
        assert_eq!(m.pseudocode_line(3), None);
    }
}
