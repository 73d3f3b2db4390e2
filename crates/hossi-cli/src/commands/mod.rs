pub mod context;
pub mod output;
pub mod resources;
pub mod session;
