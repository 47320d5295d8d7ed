//! Auth collaborator seam.

use crate::error::AuthError;

/// Backing identity provider as seen by the controller: read session
/// existence, request sign-out. Nothing else.
pub trait AuthCollaborator {
    fn session_exists(&mut self) -> Result<bool, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
}

impl<T: AuthCollaborator + ?Sized> AuthCollaborator for &mut T {
    fn session_exists(&mut self) -> Result<bool, AuthError> {
        (**self).session_exists()
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        (**self).sign_out()
    }
}
