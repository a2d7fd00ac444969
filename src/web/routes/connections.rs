use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{ConnectionAction, ConnectionRow};
use crate::services::connection_service::{self, ConnectionListFilter};
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub status: ConnectionListFilter,
}

pub async fn list_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ConnectionRow>>> {
    let rows =
        connection_service::list_connections(&state.pool, &auth_user.id, query.status).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    pub to_user_id: String,
    #[serde(default)]
    pub intro_message: String,
}

pub async fn request_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(body): Json<RequestBody>,
) -> AppResult<(StatusCode, Json<ConnectionRow>)> {
    let row = connection_service::request_connection(
        &state.pool,
        &auth_user.id,
        body.to_user_id.trim(),
        &body.intro_message,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
    pub action: ConnectionAction,
}

pub async fn respond_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
    Json(body): Json<RespondBody>,
) -> AppResult<Json<ConnectionRow>> {
    let row =
        connection_service::respond(&state.pool, &auth_user.id, &connection_id, body.action)
            .await?;
    Ok(Json(row))
}

pub async fn remove_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
) -> AppResult<StatusCode> {
    connection_service::remove_connection(&state.pool, &auth_user.id, &connection_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn block_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ConnectionRow>> {
    let row = connection_service::block_user(&state.pool, &auth_user.id, &user_id).await?;
    Ok(Json(row))
}
