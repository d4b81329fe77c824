//! Scheduled message repository.

use chrono::{DateTime, Utc};

use crate::entities::MessageEntity;
use crate::error::RepositoryResult;
use crate::query::QueryDescriptor;

use super::Repository;

pub type MessageRepository = Repository<MessageEntity>;

impl Repository<MessageEntity> {
    /// Scheduled messages due at `now` that have failed fewer than
    /// `max_retries` times. Always read from the database.
    pub async fn due_scheduled(
        &self,
        now: DateTime<Utc>,
        limit: i64,
        max_retries: i64,
    ) -> RepositoryResult<Vec<MessageEntity>> {
        let query = QueryDescriptor::new()
            .eq("send_status", "scheduled")
            .lte("scheduled_for", now)
            .lte("retry_count", max_retries - 1);
        self.find_uncached(&query, false, Some(limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;
    use chrono::Duration;
    use domain::models::{MessageChannel, SendStatus};

    #[tokio::test]
    async fn test_due_scheduled_filters() {
        let repo = MessageRepository::new(fixtures::pool().await);
        let now = Utc::now();

        let due = repo
            .add(
                MessageEntity::new(MessageChannel::Email, "a@x.org", "hi", now - Duration::minutes(5)),
                "system",
            )
            .await
            .unwrap();

        repo.add(
            MessageEntity::new(MessageChannel::Sms, "+15551234567", "later", now + Duration::hours(1)),
            "system",
        )
        .await
        .unwrap();

        let mut exhausted =
            MessageEntity::new(MessageChannel::Email, "b@x.org", "hi", now - Duration::minutes(5));
        exhausted.retry_count = 3;
        repo.add(exhausted, "system").await.unwrap();

        let mut sent =
            MessageEntity::new(MessageChannel::Email, "c@x.org", "hi", now - Duration::minutes(5));
        sent.mark_sent(now);
        repo.add(sent, "system").await.unwrap();

        let batch = repo.due_scheduled(now, 10, 3).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].audit.id, due.audit.id);
        assert_eq!(batch[0].send_status, SendStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_due_scheduled_respects_limit() {
        let repo = MessageRepository::new(fixtures::pool().await);
        let now = Utc::now();
        for i in 0..4 {
            repo.add(
                MessageEntity::new(
                    MessageChannel::Email,
                    format!("d{}@x.org", i),
                    "hi",
                    now - Duration::minutes(1),
                ),
                "system",
            )
            .await
            .unwrap();
        }
        assert_eq!(repo.due_scheduled(now, 2, 3).await.unwrap().len(), 2);
    }
}
