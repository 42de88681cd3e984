use actix_web::{web, HttpResponse};

use crate::controller::{SubscriptionController, ToggleError};
use crate::domain::ToggleKind;
use crate::preference_store::PreferenceStoreClient;

/// Toggle request payload
#[derive(serde::Deserialize)]
pub struct ToggleData {
    #[serde(default)]
    user_id: String,
    kind: ToggleKind,
    value: bool,
}

/// Toggle handler
///
/// The optimistic-update semantics live in the controller; this endpoint only
/// reports whether the write reached the store. The page keeps its optimistic
/// state either way.
#[tracing::instrument(
    name = "Apply a subscription toggle",
    skip(payload, store),
    fields(user_id = %payload.user_id)
)]
pub async fn toggle(
    payload: web::Json<ToggleData>,
    store: web::Data<PreferenceStoreClient>,
) -> Result<HttpResponse, ToggleError> {
    let mut controller = SubscriptionController::new(store.get_ref().clone());
    controller
        .set_toggle(payload.kind, payload.value, &payload.user_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
