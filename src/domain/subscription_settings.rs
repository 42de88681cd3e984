/// Email subscription flags for a single recipient
///
/// Defaults to both flags false, matching a recipient with no recorded
/// opt-outs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionSettings {
    pub marketing_emails_unsubscribed: bool,
    pub all_emails_unsubscribed: bool,
}

impl SubscriptionSettings {
    /// Get the flag addressed by a toggle kind
    pub const fn get(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::Marketing => self.marketing_emails_unsubscribed,
            ToggleKind::AllEmails => self.all_emails_unsubscribed,
        }
    }

    /// Set the flag addressed by a toggle kind
    pub fn set(&mut self, kind: ToggleKind, value: bool) {
        match kind {
            ToggleKind::Marketing => self.marketing_emails_unsubscribed = value,
            ToggleKind::AllEmails => self.all_emails_unsubscribed = value,
        }
    }
}

/// The two unsubscribe toggles offered by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum ToggleKind {
    #[serde(rename = "marketing")]
    Marketing,
    #[serde(rename = "all")]
    AllEmails,
}

impl ToggleKind {
    /// Column name of the flag in the remote settings table
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Marketing => "marketing_emails_unsub",
            Self::AllEmails => "all_emails_unsub",
        }
    }
}
