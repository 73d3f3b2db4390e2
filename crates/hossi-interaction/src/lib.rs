//! Outbound HTTP for the Hossi client.
//!
//! - [`http`]: the adapter that injects credentials and intercepts 401s
//! - [`reqwest_transport`]: the production wire
//! - [`resources`]: one function per backend endpoint

pub mod http;
pub mod reqwest_transport;
pub mod resources;

pub use http::{ApiClient, ApiRequest, ApiResponse, HttpError, Transport};
pub use reqwest_transport::ReqwestTransport;
pub use resources::{HospitalApi, LoginResponse};
