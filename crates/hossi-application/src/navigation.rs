//! Views the client can show and the current position among them.

use hossi_core::auth::{Capability, visible_actions};
use hossi_core::session::Identity;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use strum::{Display, EnumIter, EnumString};

/// A top-level view, addressed by its route.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Login,
    Dashboard,
    DoctorNurse,
    Patient,
    Branches,
    Users,
    Patients,
    Appointments,
    Audits,
}

impl View {
    /// Route of the view.
    pub fn route(self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Dashboard => "/dashboard",
            View::DoctorNurse => "/doctor-nurse",
            View::Patient => "/patient",
            View::Branches => "/branches",
            View::Users => "/users",
            View::Patients => "/patients",
            View::Appointments => "/appointments",
            View::Audits => "/audits",
        }
    }

    /// Resolves a route. `/` is the login view.
    pub fn from_route(route: &str) -> Option<View> {
        use strum::IntoEnumIterator;

        if route == "/" {
            return Some(View::Login);
        }
        View::iter().find(|view| view.route() == route)
    }

    /// Capability needed to open the view, if any.
    pub fn required_capability(self) -> Option<Capability> {
        match self {
            View::Branches => Some(Capability::ManageBranches),
            View::Users => Some(Capability::ManageUsers),
            View::Audits => Some(Capability::ViewAudits),
            View::Patients => Some(Capability::ManagePatients),
            View::Appointments => Some(Capability::ManageAppointments),
            View::Login | View::Dashboard | View::DoctorNurse | View::Patient => None,
        }
    }
}

/// An entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum NavItem {
    Open(View),
    Logout,
}

impl NavItem {
    pub fn label(self) -> &'static str {
        match self {
            NavItem::Open(View::Login) => "Login",
            NavItem::Open(View::Dashboard) => "Dashboard",
            NavItem::Open(View::DoctorNurse) => "Doctor/Nurse",
            NavItem::Open(View::Patient) => "Patient Portal",
            NavItem::Open(View::Branches) => "Branches",
            NavItem::Open(View::Users) => "Users",
            NavItem::Open(View::Patients) => "Patients",
            NavItem::Open(View::Appointments) => "Appointments",
            NavItem::Open(View::Audits) => "Audits",
            NavItem::Logout => "Logout",
        }
    }
}

/// Navigation bar for `identity`: nothing when anonymous, otherwise
/// dashboard, the admin entries the role unlocks, patients, appointments
/// and logout.
pub fn nav_items(identity: Option<&Identity>) -> Vec<NavItem> {
    let Some(identity) = identity else {
        return Vec::new();
    };

    let capabilities = visible_actions(Some(identity));
    let mut items = vec![NavItem::Open(View::Dashboard)];

    for view in [
        View::Branches,
        View::Users,
        View::Audits,
        View::Patients,
        View::Appointments,
    ] {
        if view
            .required_capability()
            .is_some_and(|capability| capabilities.contains(&capability))
        {
            items.push(NavItem::Open(view));
        }
    }

    items.push(NavItem::Logout);
    items
}

/// The view currently shown.
#[derive(Debug)]
pub struct NavigationState {
    current: RwLock<View>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(View::Login)
    }
}

impl NavigationState {
    pub fn new(initial: View) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub fn current(&self) -> View {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn navigate(&self, view: View) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        if *guard != view {
            tracing::debug!("[Navigation] {} -> {}", guard.route(), view.route());
        }
        *guard = view;
    }
}
