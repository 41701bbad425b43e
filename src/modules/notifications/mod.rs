// Notification dispatch seam; delivery itself lives outside this service.

pub mod services;

pub use services::{NotificationDispatcher, TemplateVars, TracingDispatcher};
