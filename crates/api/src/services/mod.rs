//! Application services.

pub mod messaging;
pub mod settings;

pub use messaging::MessagingService;
pub use settings::SettingsService;
