//! Scheduled message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{MessageChannel, MessageResponse, SendStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "messages",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS messages (",
        audit_columns!(),
        "recipient TEXT NOT NULL, \
         channel TEXT NOT NULL CHECK (channel IN ('email', 'sms')), \
         subject TEXT, \
         body TEXT NOT NULL, \
         send_status TEXT NOT NULL CHECK (send_status IN ('scheduled', 'sent', 'failed')), \
         scheduled_for TEXT NOT NULL, \
         sent_on TEXT, \
         retry_count INTEGER NOT NULL DEFAULT 0, \
         last_error TEXT)"
    ),
    indexes: &[
        "CREATE INDEX IF NOT EXISTS ix_messages_due ON messages (send_status, scheduled_for)",
    ],
};

/// Database row mapping for the messages table.
///
/// The body is rendered when the message is scheduled; the dispatcher sends
/// it as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct MessageEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    #[validate(length(min = 1, max = 320, message = "Recipient must be 1-320 characters"))]
    pub recipient: String,

    pub channel: MessageChannel,

    #[validate(length(max = 255, message = "Subject must be at most 255 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: String,

    pub send_status: SendStatus,

    pub scheduled_for: DateTime<Utc>,

    pub sent_on: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub retry_count: i64,

    pub last_error: Option<String>,
}

impl MessageEntity {
    pub fn new(
        channel: MessageChannel,
        recipient: impl Into<String>,
        body: impl Into<String>,
        scheduled_for: DateTime<Utc>,
    ) -> Self {
        Self {
            audit: Audit::default(),
            recipient: recipient.into(),
            channel,
            subject: None,
            body: body.into(),
            send_status: SendStatus::Scheduled,
            scheduled_for,
            sent_on: None,
            retry_count: 0,
            last_error: None,
        }
    }

    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.send_status = SendStatus::Sent;
        self.sent_on = Some(at);
        self.last_error = None;
    }

    /// Record a failed attempt. The message stays scheduled until it has
    /// failed `max_retries` times.
    pub fn record_failure(&mut self, error: impl Into<String>, max_retries: i64) {
        self.retry_count += 1;
        self.last_error = Some(error.into());
        if self.retry_count >= max_retries {
            self.send_status = SendStatus::Failed;
        }
    }
}

impl Entity for MessageEntity {
    const TYPE_NAME: &'static str = "Message";
    const TABLE: &'static str = "messages";
    const COLUMNS: &'static [&'static str] = &[
        "recipient",
        "channel",
        "subject",
        "body",
        "send_status",
        "scheduled_for",
        "sent_on",
        "retry_count",
        "last_error",
    ];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.recipient.as_str())
            .bind(self.channel)
            .bind(self.subject.as_deref())
            .bind(self.body.as_str())
            .bind(self.send_status)
            .bind(self.scheduled_for)
            .bind(self.sent_on)
            .bind(self.retry_count)
            .bind(self.last_error.as_deref())
    }
}

impl From<MessageEntity> for MessageResponse {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.audit.id,
            recipient: entity.recipient,
            channel: entity.channel,
            subject: entity.subject,
            body: entity.body,
            send_status: entity.send_status,
            scheduled_for: entity.scheduled_for,
            sent_on: entity.sent_on,
            retry_count: entity.retry_count,
        }
    }
}
