use actix_web::{web, HttpResponse};

use crate::controller::{Phase, SubscriptionController};
use crate::preference_store::PreferenceStoreClient;

/// Web query parameters
///
/// An absent `userId` is carried as an empty string, not rejected; it fails
/// the load instead, and writes reject it explicitly later.
#[derive(serde::Deserialize)]
pub struct Parameters {
    #[serde(default, alias = "userId")]
    user_id: String,
}

/// Preferences payload returned to the page
#[derive(serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum PreferencesResponse {
    Ready {
        email: String,
        marketing_emails_unsubscribed: bool,
        all_emails_unsubscribed: bool,
    },
    Failed,
}

/// Preferences load handler
///
/// Runs the controller's one-time load for this page visit and reports the
/// resulting state. Load failures are part of the payload rather than HTTP
/// errors; the page turns them into an error notification.
#[tracing::instrument(
    name = "Load preferences for a page visit",
    skip(parameters, store),
    fields(user_id = %parameters.user_id)
)]
pub async fn preferences(
    parameters: web::Query<Parameters>,
    store: web::Data<PreferenceStoreClient>,
) -> HttpResponse {
    let mut controller = SubscriptionController::new(store.get_ref().clone());
    controller.initialize(&parameters.user_id).await;

    let state = controller.state();
    let body = match (state.phase, state.recipient.as_ref()) {
        (Phase::Ready, Some(recipient)) => PreferencesResponse::Ready {
            email: recipient.email.as_ref().to_string(),
            marketing_emails_unsubscribed: state.settings.marketing_emails_unsubscribed,
            all_emails_unsubscribed: state.settings.all_emails_unsubscribed,
        },
        _ => PreferencesResponse::Failed,
    };
    HttpResponse::Ok().json(body)
}
