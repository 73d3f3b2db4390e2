//! Backend resources.
//!
//! Records are owned by the server and passed through untouched as
//! `serde_json::Value`. The only thing read locally is the `id` field, used
//! as a stable key when rendering lists.

use crate::auth::Capability;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// A server-owned record, passed through as raw JSON.
pub type ResourceRecord = Value;

/// Collections exposed by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Branches,
    Users,
    Patients,
    Appointments,
    Audits,
}

impl ResourceKind {
    /// REST path of the collection.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Branches => "/branches",
            ResourceKind::Users => "/users",
            ResourceKind::Patients => "/patients",
            ResourceKind::Appointments => "/appointments",
            ResourceKind::Audits => "/audits",
        }
    }

    /// Whether the backend accepts `POST` on the collection.
    pub fn supports_create(self) -> bool {
        !matches!(self, ResourceKind::Audits)
    }

    /// Capability a caller needs before touching the collection.
    pub fn required_capability(self) -> Capability {
        match self {
            ResourceKind::Branches => Capability::ManageBranches,
            ResourceKind::Users => Capability::ManageUsers,
            ResourceKind::Patients => Capability::ManagePatients,
            ResourceKind::Appointments => Capability::ManageAppointments,
            ResourceKind::Audits => Capability::ViewAudits,
        }
    }
}

/// Rendering key of a record: its numeric `id` field.
pub fn record_key(record: &ResourceRecord) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}
