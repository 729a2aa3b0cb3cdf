//! Common types shared across the dashboard model.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Synthetic identity for an item shown in a list.
///
/// Minted fresh every time a record is decoded or projected. It carries no
/// meaning beyond keeping list rows apart and is never sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ListId(Uuid);

impl ListId {
    /// Mints a new random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ListId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
