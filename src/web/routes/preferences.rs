use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::{PreferencesUpdate, PreferencesView};
use crate::services::{preferences_service, profile_service};
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

pub async fn get_preferences_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<PreferencesView>> {
    let view = preferences_service::load_preferences(&state.pool, &auth_user.id).await?;
    Ok(Json(view))
}

pub async fn update_preferences_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> AppResult<Json<PreferencesView>> {
    let view = preferences_service::update_preferences(&state.pool, &auth_user.id, update).await?;
    Ok(Json(view))
}

pub async fn check_completion_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let complete = profile_service::check_completion(&state.pool, &auth_user.id).await?;
    Ok(Json(json!({ "is_complete": complete })))
}
