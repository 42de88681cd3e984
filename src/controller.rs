use std::fmt;

use actix_web::http::StatusCode;
use actix_web::ResponseError;

use crate::domain::{Recipient, RecipientId, SubscriptionSettings, ToggleKind};
use crate::preference_store::{PreferenceStoreClient, SettingsPatch, StoreError};
use crate::utils::error_chain_fmt;

/// Lifecycle of a single page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// In-memory controller state for one page load; never persisted
pub struct ControllerState {
    pub phase: Phase,
    pub recipient: Option<Recipient>,
    pub settings: SubscriptionSettings,
    pub pending_toggle: bool,
}

/// Toggle error type
#[derive(thiserror::Error)]
pub enum ToggleError {
    #[error("No recipient identifier is associated with this page")]
    MissingIdentifier,
    #[error("Failed to persist the updated subscription settings")]
    WriteFailed(#[source] StoreError),
}

impl fmt::Debug for ToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ToggleError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingIdentifier => StatusCode::BAD_REQUEST,
            Self::WriteFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Subscription state controller
///
/// Owns the loading/loaded/failed lifecycle of a single recipient's
/// subscription preferences and mediates reads and writes against the
/// remote preference store. One controller serves one page load.
pub struct SubscriptionController {
    store: PreferenceStoreClient,
    state: ControllerState,
}

impl SubscriptionController {
    /// Create a controller in the `Loading` phase with default settings
    pub fn new(store: PreferenceStoreClient) -> Self {
        Self {
            store,
            state: ControllerState {
                phase: Phase::Loading,
                recipient: None,
                settings: SubscriptionSettings::default(),
                pending_toggle: false,
            },
        }
    }

    /// Current controller state
    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Load the recipient and their stored settings, then record the
    /// marketing opt-out that viewing the page itself implies
    ///
    /// Both reads are issued concurrently. Any read failure or absent record
    /// moves the controller to `Failed`, leaving the settings at their
    /// defaults and issuing no write. On success the controller is `Ready`
    /// before the opt-out write goes out; the write happens exactly once per
    /// load, and its failure is logged without demoting the phase.
    #[tracing::instrument(name = "Load subscription preferences", skip(self))]
    pub async fn initialize(&mut self, identifier: &str) {
        self.state.phase = Phase::Loading;

        // Paired concurrent reads
        let (recipient, settings) = tokio::join!(
            self.store.fetch_recipient(identifier),
            self.store.fetch_settings(identifier),
        );

        let recipient = match recipient {
            Ok(Some(recipient)) => Some(recipient),
            Ok(None) => {
                tracing::warn!("No recipient record for the given identifier");
                None
            }
            Err(error) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Failed to fetch the recipient record"
                );
                None
            }
        };
        let stored = match settings {
            Ok(Some(stored)) => Some(stored),
            Ok(None) => {
                tracing::warn!("No settings record for the given identifier");
                None
            }
            Err(error) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Failed to fetch the settings record"
                );
                None
            }
        };
        let (Some(recipient), Some(stored)) = (recipient, stored) else {
            self.state.phase = Phase::Failed;
            return;
        };

        // Copy the stored flags, then apply the documented side effect of the
        // visit itself: viewing the page opts the recipient out of marketing
        // email regardless of the stored value
        let id = recipient.id.clone();
        self.state.settings = stored;
        self.state.settings.marketing_emails_unsubscribed = true;
        self.state.recipient = Some(recipient);
        self.state.phase = Phase::Ready;

        // Persist the opt-out; the phase is already decided, so a failure
        // here leaves the local state ahead of the store (fire and forget)
        let patch = SettingsPatch::for_toggle(ToggleKind::Marketing, true);
        if let Err(error) = self.store.update_settings(&id, &patch).await {
            tracing::warn!(
                error.cause_chain = ?error,
                "Failed to persist the marketing opt-out"
            );
        }
    }

    /// Optimistically apply a toggle and persist it with a single-field patch
    ///
    /// The local value is applied before the write and is not rolled back if
    /// the write fails; store and display may diverge until the next load.
    /// `pending_toggle` is true for exactly the duration of the write.
    #[tracing::instrument(
        name = "Set subscription toggle",
        skip(self),
        fields(field = kind.field_name())
    )]
    pub async fn set_toggle(
        &mut self,
        kind: ToggleKind,
        value: bool,
        identifier: &str,
    ) -> Result<(), ToggleError> {
        let id = RecipientId::parse(identifier.to_string())
            .map_err(|_| ToggleError::MissingIdentifier)?;

        // Optimistic local update
        self.state.settings.set(kind, value);

        self.state.pending_toggle = true;
        let outcome = self
            .store
            .update_settings(&id, &SettingsPatch::for_toggle(kind, value))
            .await;
        self.state.pending_toggle = false;

        outcome.map_err(ToggleError::WriteFailed)
    }

    /// Revert the marketing opt-out recorded on load, issuing a compensating
    /// write
    pub async fn undo_marketing_opt_out(&mut self, identifier: &str) -> Result<(), ToggleError> {
        self.set_toggle(ToggleKind::Marketing, false, identifier).await
    }
}
