mod email_address;
mod recipient;
mod recipient_id;
mod subscription_settings;

pub use email_address::EmailAddress;
pub use recipient::Recipient;
pub use recipient_id::RecipientId;
pub use subscription_settings::{SubscriptionSettings, ToggleKind};
