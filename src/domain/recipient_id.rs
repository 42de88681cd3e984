use std::fmt;

/// Opaque recipient identifier
///
/// The incoming `userId` link parameter may be absent, which reaches this
/// type as an empty string; parsing rejects it so that no write can be
/// attempted without a known recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientId(String);

impl RecipientId {
    /// Parse a recipient identifier
    pub fn parse(id: String) -> Result<Self, String> {
        if id.trim().is_empty() {
            Err("recipient identifier is missing".to_string())
        } else {
            Ok(Self(id))
        }
    }
}

impl AsRef<str> for RecipientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
