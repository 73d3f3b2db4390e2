//! Role-based authorization gate.

mod capability;
mod gate;

pub use capability::Capability;
pub use gate::{capabilities_for_role, visible_actions};
