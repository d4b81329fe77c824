//! Message delivery for the dispatch job.
//!
//! Supported providers:
//! - email `console`: logs the message (development)
//! - email `sendgrid`: posts to the SendGrid v3 mail API
//! - sms `console`: logs the message

use std::sync::Arc;
use std::time::Duration;

use domain::models::MessageChannel;
use domain::services::{MessageSender, OutboundMessage, ProviderError};
use tracing::{error, info, warn};

use crate::config::{EmailConfig, SmsConfig};

/// [`MessageSender`] backed by the configured email and SMS providers.
#[derive(Clone)]
pub struct MessagingService {
    email: Arc<EmailConfig>,
    sms: Arc<SmsConfig>,
    client: reqwest::Client,
}

impl MessagingService {
    pub fn new(email: EmailConfig, sms: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(email.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            email: Arc::new(email),
            sms: Arc::new(sms),
            client,
        }
    }

    async fn send_email(&self, message: &OutboundMessage) -> Result<(), ProviderError> {
        if !self.email.enabled {
            warn!(to = %message.recipient, "Email delivery disabled");
            return Err(ProviderError::NotConfigured);
        }

        match self.email.provider.as_str() {
            "console" => {
                info!(
                    to = %message.recipient,
                    subject = ?message.subject,
                    from = %self.email.sender_email,
                    from_name = %self.email.sender_name,
                    body = %message.body,
                    "Email (console provider)"
                );
                Ok(())
            }
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(ProviderError::NotConfigured)
            }
        }
    }

    /// SendGrid provider - sends via the v3 mail API.
    async fn send_sendgrid(&self, message: &OutboundMessage) -> Result<(), ProviderError> {
        if self.email.sendgrid_api_key.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        let body = serde_json::json!({
            "personalizations": [{
                "to": [{ "email": message.recipient }]
            }],
            "from": {
                "email": self.email.sender_email,
                "name": self.email.sender_name
            },
            "subject": message.subject.as_deref().unwrap_or_default(),
            "content": [{
                "type": "text/plain",
                "value": message.body
            }]
        });

        let url = format!(
            "{}/v3/mail/send",
            self.email.sendgrid_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.email.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(to = %message.recipient, "Email sent via SendGrid");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, error = %error_body, "SendGrid API error");
        let detail = format!("SendGrid returned {}: {}", status, error_body);
        if status.is_server_error() || status.as_u16() == 429 {
            Err(ProviderError::Unavailable(detail))
        } else {
            Err(ProviderError::Rejected(detail))
        }
    }

    async fn send_sms(&self, message: &OutboundMessage) -> Result<(), ProviderError> {
        if !self.sms.enabled {
            warn!(to = %message.recipient, "SMS delivery disabled");
            return Err(ProviderError::NotConfigured);
        }

        match self.sms.provider.as_str() {
            "console" => {
                info!(
                    to = %message.recipient,
                    from = %self.sms.sender_number,
                    body = %message.body,
                    "SMS (console provider)"
                );
                Ok(())
            }
            provider => {
                error!(provider = %provider, "Unknown sms provider");
                Err(ProviderError::NotConfigured)
            }
        }
    }
}

#[async_trait::async_trait]
impl MessageSender for MessagingService {
    async fn send(&self, message: &OutboundMessage) -> Result<(), ProviderError> {
        match message.channel {
            MessageChannel::Email => self.send_email(message).await,
            MessageChannel::Sms => self.send_sms(message).await,
        }
    }
}
