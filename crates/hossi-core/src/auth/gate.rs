use super::Capability;
use crate::session::{Identity, Role};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

/// Capabilities granted to a role.
///
/// Administrators get everything. Clinical staff and patients get the
/// patient and appointment capabilities; narrowing those further (a patient
/// seeing only their own appointments) happens on the server.
pub fn capabilities_for_role(role: Role) -> BTreeSet<Capability> {
    match role {
        Role::Admin => Capability::iter().collect(),
        Role::Doctor | Role::Nurse | Role::Patient => {
            [Capability::ManagePatients, Capability::ManageAppointments]
                .into_iter()
                .collect()
        }
    }
}

/// Capabilities visible to `identity`. Anonymous callers get nothing.
pub fn visible_actions(identity: Option<&Identity>) -> BTreeSet<Capability> {
    identity
        .map(|identity| capabilities_for_role(identity.role))
        .unwrap_or_default()
}

impl Identity {
    /// Shorthand for checking a single capability.
    pub fn can(&self, capability: Capability) -> bool {
        capabilities_for_role(self.role).contains(&capability)
    }
}
