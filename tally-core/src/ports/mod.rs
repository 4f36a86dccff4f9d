//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod backend;
mod notifier;
mod picker;

pub use backend::InsightsBackend;
pub use notifier::{Notification, NotificationKind, Notifier};
pub use picker::{FilePicker, PickOutcome, PickRequest};
