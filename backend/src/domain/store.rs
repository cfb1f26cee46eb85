//! Store availability capability.
//!
//! The legacy deployment serves traffic before its schema is provisioned,
//! so read components probe availability once per request and fall back to
//! placeholder data instead of failing. The probe is modelled explicitly to
//! keep the fallback out of the production query paths.

use serde::{Deserialize, Serialize};

/// Whether a persistence store's schema is ready to serve queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreAvailability {
    /// Schema present; production query paths apply.
    Provisioned,
    /// Schema absent; read paths degrade to placeholder or empty results.
    Unprovisioned,
}

impl StoreAvailability {
    /// Whether production query paths can be used.
    pub fn is_provisioned(self) -> bool {
        matches!(self, Self::Provisioned)
    }
}
