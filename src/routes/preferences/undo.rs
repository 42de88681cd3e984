use actix_web::{web, HttpResponse};

use crate::controller::{SubscriptionController, ToggleError};
use crate::preference_store::PreferenceStoreClient;

/// Undo request payload
#[derive(serde::Deserialize)]
pub struct UndoData {
    #[serde(default)]
    user_id: String,
}

/// Undo handler: compensating revert of the marketing opt-out recorded when
/// the page was loaded
#[tracing::instrument(
    name = "Undo the marketing opt-out",
    skip(payload, store),
    fields(user_id = %payload.user_id)
)]
pub async fn undo(
    payload: web::Json<UndoData>,
    store: web::Data<PreferenceStoreClient>,
) -> Result<HttpResponse, ToggleError> {
    let mut controller = SubscriptionController::new(store.get_ref().clone());
    controller.undo_marketing_opt_out(&payload.user_id).await?;
    Ok(HttpResponse::Ok().finish())
}
