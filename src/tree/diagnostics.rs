//! Non-fatal error sink shared by the walker and the build workers

use crate::error::WalkError;
use parking_lot::Mutex;
use tracing::warn;

/// Accumulates traversal errors for one build
///
/// Reporting logs the error and records it; the caller decides what to show.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Mutex<Vec<WalkError>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, error: WalkError) {
        warn!(path = %error.path().display(), "{}", error);
        self.errors.lock().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    /// Drain the recorded errors in report order
    pub fn take(&self) -> Vec<WalkError> {
        std::mem::take(&mut *self.errors.lock())
    }
}
