//! Path filters for extraction.
//!
//! Patterns are plain substrings matched against the `/`-separated archive
//! path. A path passes when it matches at least one include pattern (or no
//! include patterns are set) and no exclude pattern.

/// Include/exclude substring filter over archive paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathFilter {
    /// Build a filter, ignoring empty patterns.
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        let keep = |v: Vec<String>| -> Vec<String> {
            v.into_iter()
                .map(|p| p.replace('\\', "/"))
                .filter(|p| !p.is_empty())
                .collect()
        };
        Self {
            include: keep(include),
            exclude: keep(exclude),
        }
    }

    /// Whether the filter rejects nothing.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check a single archive path.
    pub fn accepts(&self, path: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|p| path.contains(p.as_str()));
        included && !self.exclude.iter().any(|p| path.contains(p.as_str()))
    }
}
