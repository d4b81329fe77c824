//! Errors shared by external provider integrations.

use thiserror::Error;

/// Failure reported by a payment, payout or messaging provider.
///
/// Provider-specific detail is flattened into a message; callers only need to
/// know whether the attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured")]
    NotConfigured,

    #[error("Provider rejected request: {0}")]
    Rejected(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
