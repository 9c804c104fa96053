//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a string for CLI output.
///
/// Render failures and an unusable root come through unchanged so the user
/// sees which file failed or the filesystem's own message.
pub fn map_error(e: &ApiError) -> String {
    e.to_string()
}
