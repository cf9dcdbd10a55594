//! Host runtime integration.
//!
//! The engine never talks to clients or the notification system directly; it
//! asks the [`Host`] that embeds it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HostError;
use crate::notification::Notification;

/// Operations the embedding runtime performs on the engine's behalf.
#[async_trait]
pub trait Host: Send + Sync {
    /// Activate this engine version without waiting for old clients to close.
    async fn skip_waiting(&self) -> Result<(), HostError>;

    /// Take control of every open client. Returns how many were claimed.
    async fn claim_clients(&self) -> Result<usize, HostError>;

    /// Display a notification.
    async fn show_notification(&self, notification: Notification) -> Result<(), HostError>;

    /// Open a client window at `url`.
    async fn open_window(&self, url: &str) -> Result<(), HostError>;
}

/// Host that accepts every call and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

#[async_trait]
impl Host for NoopHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn claim_clients(&self) -> Result<usize, HostError> {
        Ok(0)
    }

    async fn show_notification(&self, _notification: Notification) -> Result<(), HostError> {
        Ok(())
    }

    async fn open_window(&self, _url: &str) -> Result<(), HostError> {
        Ok(())
    }
}

#[async_trait]
impl<H> Host for Arc<H>
where
    H: Host + ?Sized,
{
    async fn skip_waiting(&self) -> Result<(), HostError> {
        (**self).skip_waiting().await
    }

    async fn claim_clients(&self) -> Result<usize, HostError> {
        (**self).claim_clients().await
    }

    async fn show_notification(&self, notification: Notification) -> Result<(), HostError> {
        (**self).show_notification(notification).await
    }

    async fn open_window(&self, url: &str) -> Result<(), HostError> {
        (**self).open_window(url).await
    }
}
