//! Domain models for the donation platform.

pub mod campaign;
pub mod donation;
pub mod lifecycle;
pub mod message;
pub mod payout;
pub mod profile;
pub mod setting;

pub use campaign::{
    CampaignResponse, CreateCampaignRequest, ListCampaignsQuery, SetActiveStatusRequest,
    UpdateCampaignRequest,
};
pub use donation::{CreateDonationRequest, DonationResponse, PaymentStatus};
pub use lifecycle::EntityStatus;
pub use message::{
    MessageChannel, MessageResponse, PreviewMessageRequest, PreviewMessageResponse,
    ScheduleMessageRequest, SendStatus,
};
pub use payout::PayoutStatus;
pub use profile::ProfileType;
pub use setting::{SettingResponse, SettingSource, UpdateSettingRequest};
