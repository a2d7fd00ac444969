use sqlx::SqlitePool;
use tracing::info;

use crate::database::profile_repo::{self, CompletionRow};
use crate::error::{AppError, AppResult};

/// A profile is complete once it has a display name, an age bucket and at
/// least one intent.
pub fn is_complete(row: &CompletionRow) -> bool {
    !row.display_name.trim().is_empty() && row.age_bucket.is_some() && row.intent_count > 0
}

/// Recomputes and stores the completion flag. Returns the new value.
pub async fn check_completion(pool: &SqlitePool, user_id: &str) -> AppResult<bool> {
    let row = profile_repo::load_completion(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {}", user_id)))?;

    let complete = is_complete(&row);
    profile_repo::set_complete(pool, user_id, complete).await?;
    info!("profiles: {} is_complete={}", user_id, complete);
    Ok(complete)
}
