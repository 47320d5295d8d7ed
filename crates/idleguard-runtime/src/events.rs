//! JSON-lines wire format of the watch loop.
//!
//! Input (stdin), one object per line:
//!
//! ```text
//! {"type":"activity","kind":"key_press"}
//! {"type":"navigate","path":"/grades"}
//! {"type":"stay"}
//! {"type":"logout"}
//! {"type":"status"}
//! ```
//!
//! Output (stdout) is one [`OutputEvent`] per line.

use idleguard_core::{ActivitySignalKind, ControllerSnapshot, NavigationOutcome, PhaseChange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Activity { kind: ActivitySignalKind },
    Navigate { path: String },
    /// "Stay logged in" on the warning.
    Stay,
    /// "Log out now" on the warning.
    Logout,
    Status,
}

impl InputEvent {
    /// Blank lines yield `None`.
    pub fn parse_line(line: &str) -> Option<Result<Self, serde_json::Error>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(serde_json::from_str(trimmed))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputEvent {
    PhaseChange { change: PhaseChange },
    Navigation { path: String, outcome: NavigationOutcome },
    Redirect { path: String },
    Status { snapshot: ControllerSnapshot },
}

impl OutputEvent {
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
