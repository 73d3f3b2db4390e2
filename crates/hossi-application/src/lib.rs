pub mod auth_usecase;
pub mod context;
pub mod dashboard;
pub mod expiry;
pub mod forms;
pub mod navigation;
pub mod notification;

pub use auth_usecase::AuthUseCase;
pub use context::ClientContext;
pub use expiry::ExpiryHandler;
pub use navigation::{NavigationState, View};
pub use notification::{Notification, NotificationCenter, NotificationLevel};
