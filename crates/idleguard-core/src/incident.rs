//! Bounded incident log for collaborator failures.
//!
//! Constructed explicitly and owned by whoever records into it; there is no
//! process-wide instance.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_INCIDENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    /// Remote sign-out errored; the redirect still happened.
    SignOutFailure,
    /// The liveness poll errored; state was retained.
    SessionCheckFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
    pub kind: IncidentKind,
    pub detail: String,
    pub at: DateTime<Utc>,
}

/// Ring buffer of the most recent incidents. Oldest entries are evicted.
#[derive(Debug, Clone)]
pub struct IncidentLog {
    entries: VecDeque<Incident>,
    capacity: usize,
    evicted: u64,
}

impl IncidentLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INCIDENT_CAPACITY)
    }

    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    pub fn record(&mut self, kind: IncidentKind, detail: impl Into<String>, at: DateTime<Utc>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evicted = self.evicted.saturating_add(1);
        }
        self.entries.push_back(Incident {
            kind,
            detail: detail.into(),
            at,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &Incident> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Incident> {
        self.entries.back()
    }

    pub fn count(&self, kind: IncidentKind) -> usize {
        self.entries.iter().filter(|i| i.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries dropped to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Default for IncidentLog {
    fn default() -> Self {
        Self::new()
    }
}
