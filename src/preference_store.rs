use std::time;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::domain::{EmailAddress, Recipient, RecipientId, SubscriptionSettings, ToggleKind};

/// Path of the recipients table in the store's REST API
const RECIPIENTS_PATH: &str = "/rest/v1/recipients";

/// Path of the subscription settings table in the store's REST API
const SETTINGS_PATH: &str = "/rest/v1/recipient_subscription_settings";

/// Preference store error type
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to reach the preference store")]
    Transport(#[from] reqwest::Error),
    #[error("The preference store returned {0}")]
    ErrorStatus(StatusCode),
    #[error("The preference store returned a malformed record: {0}")]
    Malformed(String),
}

/// Client for the remote preference store, a PostgREST-style table service
/// exposing read-by-key and partial update-by-key
#[derive(Clone)]
pub struct PreferenceStoreClient {
    http_client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl PreferenceStoreClient {
    pub fn new(base_url: Url, api_key: SecretString, timeout: time::Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    /// Fetch a recipient record by identifier
    #[tracing::instrument(name = "Fetch recipient from the preference store", skip(self))]
    pub async fn fetch_recipient(&self, id: &str) -> Result<Option<Recipient>, StoreError> {
        let url = self.base_url.join(RECIPIENTS_PATH).expect("Cannot parse URL");
        let response = self
            .authorized(self.http_client.get(url))
            .query(&[("id", format!("eq.{id}")), ("select", "*".into())])
            .send()
            .await?;
        let rows: Vec<RecipientRow> = Self::read_rows(response).await?;

        rows.into_iter()
            .next()
            .map(|row| row.try_into().map_err(StoreError::Malformed))
            .transpose()
    }

    /// Fetch a recipient's subscription settings record
    #[tracing::instrument(name = "Fetch settings from the preference store", skip(self))]
    pub async fn fetch_settings(&self, id: &str) -> Result<Option<SubscriptionSettings>, StoreError> {
        let url = self.base_url.join(SETTINGS_PATH).expect("Cannot parse URL");
        let response = self
            .authorized(self.http_client.get(url))
            .query(&[("recipient_id", format!("eq.{id}")), ("select", "*".into())])
            .send()
            .await?;
        let rows: Vec<SettingsRow> = Self::read_rows(response).await?;

        Ok(rows.into_iter().next().map(Into::into))
    }

    /// Apply a single-field patch to a recipient's settings record, keyed by
    /// recipient identifier
    #[tracing::instrument(name = "Update settings in the preference store", skip(self, patch))]
    pub async fn update_settings(
        &self,
        id: &RecipientId,
        patch: &SettingsPatch,
    ) -> Result<(), StoreError> {
        let url = self.base_url.join(SETTINGS_PATH).expect("Cannot parse URL");
        let response = self
            .authorized(self.http_client.patch(url))
            .query(&[("recipient_id", format!("eq.{}", id.as_ref()))])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::ErrorStatus(response.status()))
        }
    }

    /// Attach the store's authentication headers
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
    }

    /// Deserialize a successful row-set response
    async fn read_rows<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        if !response.status().is_success() {
            return Err(StoreError::ErrorStatus(response.status()));
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

/// Wire representation of a recipients row
#[derive(serde::Deserialize)]
struct RecipientRow {
    id: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecipientRow> for Recipient {
    type Error = String;

    fn try_from(row: RecipientRow) -> Result<Self, Self::Error> {
        let id = RecipientId::parse(row.id)?;
        let email = EmailAddress::parse(row.email)?;
        Ok(Self {
            id,
            email,
            created_at: row.created_at,
        })
    }
}

/// Wire representation of a settings row
#[derive(serde::Deserialize)]
struct SettingsRow {
    marketing_emails_unsub: bool,
    all_emails_unsub: bool,
}

impl From<SettingsRow> for SubscriptionSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            marketing_emails_unsubscribed: row.marketing_emails_unsub,
            all_emails_unsubscribed: row.all_emails_unsub,
        }
    }
}

/// Single-field patch for the settings table
#[derive(Debug, serde::Serialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    marketing_emails_unsub: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all_emails_unsub: Option<bool>,
}

impl SettingsPatch {
    /// Patch exactly one toggle flag
    pub const fn for_toggle(kind: ToggleKind, value: bool) -> Self {
        match kind {
            ToggleKind::Marketing => Self {
                marketing_emails_unsub: Some(value),
                all_emails_unsub: None,
            },
            ToggleKind::AllEmails => Self {
                marketing_emails_unsub: None,
                all_emails_unsub: Some(value),
            },
        }
    }
}
