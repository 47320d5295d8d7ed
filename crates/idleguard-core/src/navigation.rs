//! Navigation collaborator seam.

/// Current location plus the ability to leave it.
///
/// A redirect is a request; the resulting route change reaches the
/// controller through [`SessionController::sync_navigation`](crate::SessionController::sync_navigation).
pub trait Navigator {
    fn current_path(&self) -> String;
    fn redirect(&mut self, path: &str);
}

impl<T: Navigator + ?Sized> Navigator for &mut T {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn redirect(&mut self, path: &str) {
        (**self).redirect(path);
    }
}
