//! File-backed session store: the file's existence is the session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use idleguard_core::{AuthCollaborator, AuthError};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuthCollaborator for FileSessionStore {
    fn session_exists(&mut self) -> Result<bool, AuthError> {
        Ok(self.path.try_exists()?)
    }

    /// Removes the session file. Already gone counts as signed out.
    fn sign_out(&mut self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session file removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
