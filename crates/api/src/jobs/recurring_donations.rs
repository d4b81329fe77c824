//! Charges recurring donations that are due.
//!
//! Each recurring donation acts as a template: a successful charge records a
//! new one-off donation, credits the campaign and moves the template's next
//! charge one month forward.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::models::PaymentStatus;
use domain::services::{ChargeRequest, PaymentProcessor};
use persistence::entities::{next_monthly_charge, DonationEntity};
use persistence::repositories::{CampaignRepository, DonationRepository};
use persistence::RepositoryResult;
use tracing::{error, info, warn};

use super::scheduler::{BatchOutcome, Job, JobFrequency};
use crate::config::BatchJobConfig;
use crate::middleware::metrics::{record_donation, record_job_item};

const JOB_NAME: &str = "recurring_donations";

pub struct RecurringDonationJob {
    donations: DonationRepository,
    campaigns: CampaignRepository,
    processor: Arc<dyn PaymentProcessor>,
    config: BatchJobConfig,
}

impl RecurringDonationJob {
    pub fn new(
        donations: DonationRepository,
        campaigns: CampaignRepository,
        processor: Arc<dyn PaymentProcessor>,
        config: BatchJobConfig,
    ) -> Self {
        Self {
            donations,
            campaigns,
            processor,
            config,
        }
    }

    /// Charge every recurring donation due at `now`, up to the batch size.
    ///
    /// Only reading the batch can fail the run. Per-donation write failures
    /// are logged and the batch continues.
    pub async fn process_due(&self, now: DateTime<Utc>) -> RepositoryResult<BatchOutcome> {
        let due = self
            .donations
            .due_recurring(now, self.config.batch_size)
            .await?;

        let mut outcome = BatchOutcome::default();
        for template in due {
            if self.charge(template, now).await {
                outcome.succeeded += 1;
            } else {
                outcome.failed += 1;
            }
        }
        Ok(outcome)
    }

    /// Advance the schedule one month. Nothing is charged for a slot that
    /// has not been claimed this way.
    async fn claim(
        &self,
        mut template: DonationEntity,
        now: DateTime<Utc>,
    ) -> Option<DonationEntity> {
        let from = template.next_charge_on.unwrap_or(now);
        template.next_charge_on = next_monthly_charge(from);

        match self.donations.update(&template, JOB_NAME).await {
            Ok(Some(claimed)) => Some(claimed),
            Ok(None) => {
                warn!(template_id = template.audit.id, "Recurring donation vanished before charge");
                None
            }
            Err(e) => {
                error!(
                    template_id = template.audit.id,
                    error = %e,
                    "Failed to advance recurring schedule, skipping charge"
                );
                None
            }
        }
    }

    async fn charge(&self, template: DonationEntity, now: DateTime<Utc>) -> bool {
        let due_on = template.next_charge_on;
        let Some(mut template) = self.claim(template, now).await else {
            record_job_item(JOB_NAME, "failed", 1);
            return false;
        };

        let request = ChargeRequest {
            donation_id: template.audit.id,
            donor_profile_id: template.donor_profile_id,
            amount_cents: template.amount_cents,
            currency: template.currency.clone(),
            payment_method: template.provider_reference.clone(),
        };

        match self.processor.charge(&request).await {
            Ok(receipt) => {
                self.record_charge(&mut template, receipt.transaction_id).await;
                record_donation("recurring", template.amount_cents);
                record_job_item(JOB_NAME, "succeeded", 1);
                true
            }
            Err(e) => {
                // Put the schedule back so the charge is retried next run.
                template.next_charge_on = due_on;
                template.retry_count += 1;
                if template.retry_count >= self.config.max_retries {
                    template.is_recurring = false;
                    template.next_charge_on = None;
                    warn!(
                        template_id = template.audit.id,
                        attempts = template.retry_count,
                        error = %e,
                        "Recurring donation stopped after repeated failures"
                    );
                } else {
                    warn!(
                        template_id = template.audit.id,
                        attempts = template.retry_count,
                        error = %e,
                        "Recurring donation charge failed"
                    );
                }
                if let Err(e) = self.donations.update(&template, JOB_NAME).await {
                    error!(
                        template_id = template.audit.id,
                        error = %e,
                        "Failed to record recurring charge failure"
                    );
                }
                record_job_item(JOB_NAME, "failed", 1);
                false
            }
        }
    }

    /// Bookkeeping after a successful charge. The money has moved, so errors
    /// here are logged rather than retried.
    async fn record_charge(&self, template: &mut DonationEntity, transaction_id: String) {
        let mut charge = DonationEntity::new(
            template.campaign_id,
            template.donor_profile_id,
            template.amount_cents,
            template.currency.clone(),
        );
        charge.payment_status = PaymentStatus::Succeeded;
        charge.provider_reference = Some(transaction_id.clone());

        match self.donations.add(charge, JOB_NAME).await {
            Ok(charge) => info!(
                template_id = template.audit.id,
                donation_id = charge.audit.id,
                amount_cents = template.amount_cents,
                processor = self.processor.name(),
                "Recurring donation charged"
            ),
            Err(e) => error!(
                template_id = template.audit.id,
                transaction_id = %transaction_id,
                error = %e,
                "Charged recurring donation but failed to record it"
            ),
        }

        if let Err(e) = self
            .campaigns
            .record_donation(template.campaign_id, template.amount_cents, JOB_NAME)
            .await
        {
            error!(
                campaign_id = template.campaign_id,
                transaction_id = %transaction_id,
                error = %e,
                "Failed to credit campaign total"
            );
        }

        if template.retry_count > 0 {
            template.retry_count = 0;
            if let Err(e) = self.donations.update(template, JOB_NAME).await {
                error!(template_id = template.audit.id, error = %e, "Failed to reset retry count");
            }
        }
    }
}

#[async_trait::async_trait]
impl Job for RecurringDonationJob {
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
            .map_err(|e| format!("Failed to process recurring donations: {}", e))?;

        if outcome.total() > 0 {
            info!(
                succeeded = outcome.succeeded,
                failed = outcome.failed,
                "Processed recurring donations"
            );
        }
        Ok(())
    }
}
