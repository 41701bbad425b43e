use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::info;

use crate::core::Result;

/// Variables a message template is rendered with. This module never formats
/// or sends anything itself; composing the WhatsApp link or e-mail body from
/// these is the delivery side's job.
pub type TemplateVars = BTreeMap<String, String>;

/// Outbound notification seam. Lifecycle transitions hand a template key and
/// the reservation's variables to an implementation of this trait.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, template_key: &str, vars: &TemplateVars) -> Result<()>;
}

/// Default dispatcher: writes the would-be delivery to the log. Useful in
/// development and as the fallback wiring when no delivery channel is
/// configured.
pub struct TracingDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingDispatcher {
    async fn dispatch(&self, template_key: &str, vars: &TemplateVars) -> Result<()> {
        info!(
            template = template_key,
            vars = ?vars,
            "notification dispatched"
        );
        Ok(())
    }
}
