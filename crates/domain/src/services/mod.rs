//! Domain services for the donation platform.
//!
//! Services contain business logic that operates on domain models, plus the
//! provider traits the application layer implements.

pub mod messaging;
pub mod payment;
pub mod payout;
pub mod provider;
pub mod template;

pub use messaging::{MessageSender, MockMessageSender, OutboundMessage};
pub use payment::{ChargeReceipt, ChargeRequest, MockPaymentProcessor, PaymentProcessor};
pub use payout::{MockPayoutProvider, PayoutBatchReceipt, PayoutItem, PayoutProvider};
pub use provider::ProviderError;
pub use template::{missing_placeholders, placeholders, render, render_strict, TemplateError};
