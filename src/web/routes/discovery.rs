use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::AppResult;
use crate::services::discovery_service::{self, DiscoveryQuery, RankedCandidate};
use crate::services::pagination::Page;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

pub async fn discover_users_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<DiscoveryQuery>,
) -> AppResult<Json<Page<RankedCandidate>>> {
    let page = discovery_service::discover_users(
        &state.pool,
        &state.config.discovery,
        &auth_user.id,
        &query,
    )
    .await?;
    Ok(Json(page))
}
