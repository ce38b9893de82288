//! Traits for push gateway and local token integration

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{PushMessage, PushToken};
use crate::domain::value_objects::DispatchReport;
use crate::errors::PushError;

/// Trait for push gateway integration
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Submit the whole batch in one request
    async fn dispatch(&self, messages: &[PushMessage]) -> Result<DispatchReport, PushError>;
    /// Provider name for logs
    fn provider_name(&self) -> &str;
    /// Whether the provider is configured to send
    async fn is_available(&self) -> bool {
        true
    }
}

/// Trait for obtaining the push token of the device this process speaks for
#[async_trait]
pub trait LocalTokenProvider: Send + Sync {
    /// Obtain the platform-issued token
    async fn local_token(&self) -> Result<PushToken, PushError>;
}

#[async_trait]
impl<T: NotificationDispatcher + ?Sized> NotificationDispatcher for Arc<T> {
    async fn dispatch(&self, messages: &[PushMessage]) -> Result<DispatchReport, PushError> {
        (**self).dispatch(messages).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    async fn is_available(&self) -> bool {
        (**self).is_available().await
    }
}

#[async_trait]
impl<T: LocalTokenProvider + ?Sized> LocalTokenProvider for Arc<T> {
    async fn local_token(&self) -> Result<PushToken, PushError> {
        (**self).local_token().await
    }
}
