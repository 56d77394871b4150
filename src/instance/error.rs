//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur when restoring a configuration snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot was produced by an incompatible format version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
