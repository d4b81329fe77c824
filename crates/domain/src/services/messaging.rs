//! Outbound messaging abstraction (email and SMS).

use std::sync::{Arc, Mutex};

use crate::models::MessageChannel;

use super::provider::ProviderError;

/// A fully rendered message ready for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel: MessageChannel,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

/// Message sender trait for delivering email and SMS.
#[async_trait::async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver one message. Retries are the caller's concern.
    async fn send(&self, message: &OutboundMessage) -> Result<(), ProviderError>;
}

/// Mock message sender for development and testing.
///
/// Records every message it accepts.
#[derive(Debug, Clone, Default)]
pub struct MockMessageSender {
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl MockMessageSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl MessageSender for MockMessageSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), ProviderError> {
        if self.simulate_failure {
            tracing::warn!(
                channel = %message.channel,
                recipient = %message.recipient,
                "Mock message sender simulating failure"
            );
            return Err(ProviderError::Unavailable("Simulated failure".to_string()));
        }

        tracing::info!(
            channel = %message.channel,
            recipient = %message.recipient,
            "Mock: Would send message"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}
