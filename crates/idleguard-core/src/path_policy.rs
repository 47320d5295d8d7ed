//! Path policy: which navigation locations the controller guards.

use serde::Serialize;

/// Excluded path prefixes. Matching is a literal `starts_with`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathPolicy {
    excluded_prefixes: Vec<String>,
}

impl PathPolicy {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut excluded_prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        excluded_prefixes.sort();
        excluded_prefixes.dedup();
        Self { excluded_prefixes }
    }

    /// `false` iff `path` starts with any excluded prefix.
    pub fn is_guarded(&self, path: &str) -> bool {
        self.matching_prefix(path).is_none()
    }

    /// The first excluded prefix matching `path`, if any.
    pub fn matching_prefix(&self, path: &str) -> Option<&str> {
        self.excluded_prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| path.starts_with(prefix))
    }

    pub fn excluded_prefixes(&self) -> &[String] {
        &self.excluded_prefixes
    }
}
