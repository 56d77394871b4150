//! Serializable snapshots of an instance's active configuration.
//!
//! A snapshot captures the region-to-vertex records and the terminated flag,
//! letting long-lived instances survive process restarts. The model itself is
//! not serialized; a snapshot is only meaningful against the machine whose
//! IDs it was taken from.

use crate::instance::error::SnapshotError;
use crate::model::{RegionId, VertexId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version identifier for the snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Point-in-time capture of an instance's configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Whether the instance had entered a terminate pseudo-state
    pub terminated: bool,

    /// Last-known current vertex per region, sorted by region for
    /// deterministic output
    pub entries: Vec<(RegionId, VertexId)>,
}

impl ConfigurationSnapshot {
    pub(crate) fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}
