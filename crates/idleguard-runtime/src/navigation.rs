//! In-process route state for the watch loop.

use idleguard_core::Navigator;

#[derive(Debug, Clone, Default)]
pub struct RouteState {
    path: String,
    pending_redirect: Option<String>,
}

impl RouteState {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pending_redirect: None,
        }
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The redirect issued since the last call, if any.
    pub fn take_redirect(&mut self) -> Option<String> {
        self.pending_redirect.take()
    }
}

impl Navigator for RouteState {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn redirect(&mut self, path: &str) {
        self.path = path.to_string();
        self.pending_redirect = Some(path.to_string());
    }
}
