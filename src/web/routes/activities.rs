use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::{ParticipantAction, ParticipantRow};
use crate::services::activities_service::{self, ActivitiesQuery, RankedActivity};
use crate::services::activity_join_service::{self, JoinOutcome};
use crate::services::pagination::Page;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

pub async fn discover_activities_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<ActivitiesQuery>,
) -> AppResult<Json<Page<RankedActivity>>> {
    let today = Utc::now().date_naive();
    let page = activities_service::discover_activities(
        &state.pool,
        &state.config.discovery,
        &auth_user.id,
        &query,
        today,
    )
    .await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize, Default)]
pub struct JoinBody {
    #[serde(default)]
    pub message: String,
}

pub async fn join_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    body: Option<Json<JoinBody>>,
) -> AppResult<(StatusCode, Json<JoinOutcome>)> {
    let message = body.map(|Json(b)| b.message).unwrap_or_default();
    let outcome =
        activity_join_service::request_to_join(&state.pool, &auth_user.id, &activity_id, &message)
            .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn leave_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> AppResult<Json<Value>> {
    activity_join_service::leave_activity(&state.pool, &auth_user.id, &activity_id).await?;
    Ok(Json(json!({ "message": "Left activity" })))
}

#[derive(Debug, Deserialize)]
pub struct ParticipantActionBody {
    pub action: ParticipantAction,
}

pub async fn participant_action_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((activity_id, user_id)): Path<(String, String)>,
    Json(body): Json<ParticipantActionBody>,
) -> AppResult<Json<ParticipantRow>> {
    let row = activity_join_service::respond_to_participant(
        &state.pool,
        &auth_user.id,
        &activity_id,
        &user_id,
        body.action,
    )
    .await?;
    Ok(Json(row))
}
