//! Outbound user notifications.

use async_trait::async_trait;

use crate::domain::NewNotification;
use crate::error::Result;

/// Sink for user-facing notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: NewNotification) -> Result<()>;
}
