//! Sends scheduled messages whose send time has passed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::models::SendStatus;
use domain::services::{MessageSender, OutboundMessage};
use persistence::entities::MessageEntity;
use persistence::repositories::MessageRepository;
use persistence::RepositoryResult;
use tracing::{debug, error, info, warn};

use super::scheduler::{BatchOutcome, Job, JobFrequency};
use crate::config::BatchJobConfig;
use crate::middleware::metrics::record_job_item;

const JOB_NAME: &str = "message_dispatch";

pub struct MessageDispatchJob {
    messages: MessageRepository,
    sender: Arc<dyn MessageSender>,
    config: BatchJobConfig,
}

impl MessageDispatchJob {
    pub fn new(
        messages: MessageRepository,
        sender: Arc<dyn MessageSender>,
        config: BatchJobConfig,
    ) -> Self {
        Self {
            messages,
            sender,
            config,
        }
    }

    /// Attempt every message due at `now`, up to the batch size.
    ///
    /// A failed attempt bumps the retry counter; the message is marked failed
    /// once it reaches the retry limit and is not picked up again. Only
    /// reading the batch can fail the run.
    pub async fn process_due(&self, now: DateTime<Utc>) -> RepositoryResult<BatchOutcome> {
        let due = self
            .messages
            .due_scheduled(now, self.config.batch_size, self.config.max_retries)
            .await?;

        let mut outcome = BatchOutcome::default();
        for message in due {
            if self.dispatch(message).await {
                outcome.succeeded += 1;
            } else {
                outcome.failed += 1;
            }
        }
        Ok(outcome)
    }

    /// Mark the message sent, then send it. A message is never sent without
    /// its sent state stored first.
    async fn dispatch(&self, mut message: MessageEntity) -> bool {
        let mut claimed = message.clone();
        claimed.mark_sent(Utc::now());
        match self.messages.update(&claimed, JOB_NAME).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(message_id = message.audit.id, "Message vanished before send");
                record_job_item(JOB_NAME, "skipped", 1);
                return false;
            }
            Err(e) => {
                error!(message_id = message.audit.id, error = %e, "Failed to claim message");
                record_job_item(JOB_NAME, "skipped", 1);
                return false;
            }
        }

        let outbound = OutboundMessage {
            channel: message.channel,
            recipient: message.recipient.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
        };

        match self.sender.send(&outbound).await {
            Ok(()) => {
                record_job_item(JOB_NAME, "sent", 1);
                debug!(message_id = message.audit.id, channel = %message.channel, "Message sent");
                true
            }
            Err(e) => {
                message.record_failure(e.to_string(), self.config.max_retries);
                record_job_item(JOB_NAME, "failed", 1);
                warn!(
                    message_id = message.audit.id,
                    attempts = message.retry_count,
                    gave_up = message.send_status == SendStatus::Failed,
                    error = %e,
                    "Message send failed"
                );
                if let Err(e) = self.messages.update(&message, JOB_NAME).await {
                    error!(message_id = message.audit.id, error = %e, "Failed to record send failure");
                }
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Job for MessageDispatchJob {
    fn name(&self) -> &'static str {
        JOB_NAME
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.config.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let outcome = self
            .process_due(Utc::now())
            .await
            .map_err(|e| format!("Failed to dispatch messages: {}", e))?;

        if outcome.total() > 0 {
            info!(
                sent = outcome.succeeded,
                failed = outcome.failed,
                "Dispatched scheduled messages"
            );
        }
        Ok(())
    }
}
