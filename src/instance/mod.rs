//! Per-instance active configuration.
//!
//! The engine keeps no evaluation state of its own: everything that varies
//! between instances of one model lives behind the [`Instance`] trait, namely
//! the last-known current vertex of each region and the terminated flag. The
//! records deliberately outlive exit: history restoration reads the vertex a
//! region last rested in.
//!
//! [`DefaultInstance`] is the in-memory implementation; hosts with their own
//! persistence implement the trait themselves.

mod error;
mod snapshot;

pub use error::SnapshotError;
pub use snapshot::{ConfigurationSnapshot, SNAPSHOT_VERSION};

use crate::model::{RegionId, VertexId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Mutable per-instance state consulted and updated during evaluation.
///
/// Implementations must not clear a region's record when the region is
/// exited; shallow and deep history depend on it.
pub trait Instance {
    /// Record `vertex` as the last active child of `region`.
    fn set_current(&mut self, region: RegionId, vertex: VertexId);

    /// The last recorded child of `region`, if the region was ever entered.
    fn current(&self, region: RegionId) -> Option<VertexId>;

    fn is_terminated(&self) -> bool;

    fn set_terminated(&mut self, terminated: bool);
}

/// In-memory instance store.
#[derive(Clone, Debug)]
pub struct DefaultInstance {
    current: HashMap<RegionId, VertexId>,
    terminated: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DefaultInstance {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            current: HashMap::new(),
            terminated: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last configuration change.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Capture the configuration for persistence.
    pub fn snapshot(&self) -> ConfigurationSnapshot {
        let mut entries: Vec<(RegionId, VertexId)> =
            self.current.iter().map(|(&r, &v)| (r, v)).collect();
        entries.sort();
        ConfigurationSnapshot {
            version: SNAPSHOT_VERSION,
            taken_at: Utc::now(),
            terminated: self.terminated,
            entries,
        }
    }

    /// Rebuild an instance from a snapshot taken against the same model.
    pub fn restore(snapshot: &ConfigurationSnapshot) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;
        let now = Utc::now();
        Ok(Self {
            current: snapshot.entries.iter().copied().collect(),
            terminated: snapshot.terminated,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Default for DefaultInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance for DefaultInstance {
    fn set_current(&mut self, region: RegionId, vertex: VertexId) {
        self.current.insert(region, vertex);
        self.updated_at = Utc::now();
    }

    fn current(&self, region: RegionId) -> Option<VertexId> {
        self.current.get(&region).copied()
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn set_terminated(&mut self, terminated: bool) {
        self.terminated = terminated;
        self.updated_at = Utc::now();
    }
}
