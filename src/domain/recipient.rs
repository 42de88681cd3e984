use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, RecipientId};

/// A recipient record, created and owned by the backend; read-only from this
/// service's perspective
#[derive(Debug, Clone)]
pub struct Recipient {
    pub id: RecipientId,
    pub email: EmailAddress,
    pub created_at: DateTime<Utc>,
}
