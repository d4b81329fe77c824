//! Background job scheduler and job implementations.

mod message_dispatch;
mod payout_batch;
mod pool_metrics;
mod recurring_donations;
mod scheduler;

pub use message_dispatch::MessageDispatchJob;
pub use payout_batch::PayoutBatchJob;
pub use pool_metrics::{CachePurgeJob, PoolMetricsJob};
pub use recurring_donations::RecurringDonationJob;
pub use scheduler::{BatchOutcome, Job, JobFrequency, JobScheduler};
