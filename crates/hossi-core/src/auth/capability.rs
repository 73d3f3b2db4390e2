use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Capability tags that unlock navigation entries and actions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Capability {
    #[serde(rename = "branches")]
    #[strum(serialize = "branches")]
    ManageBranches,
    #[serde(rename = "users")]
    #[strum(serialize = "users")]
    ManageUsers,
    #[serde(rename = "audits")]
    #[strum(serialize = "audits")]
    ViewAudits,
    #[serde(rename = "patients")]
    #[strum(serialize = "patients")]
    ManagePatients,
    #[serde(rename = "appointments")]
    #[strum(serialize = "appointments")]
    ManageAppointments,
}

impl Capability {
    /// True for the capabilities only administrators hold.
    pub fn is_administrative(self) -> bool {
        matches!(
            self,
            Capability::ManageBranches | Capability::ManageUsers | Capability::ViewAudits
        )
    }
}
