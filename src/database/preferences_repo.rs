use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::{LocationPreferenceRow, MatchingPreferenceRow};

// Preference rows are created lazily with schema defaults.
const SQL_ENSURE_LOCATION: &str = r#"
INSERT OR IGNORE INTO location_preferences (user_id) VALUES (?1)
"#;

const SQL_ENSURE_MATCHING: &str = r#"
INSERT OR IGNORE INTO matching_preferences (user_id) VALUES (?1)
"#;

pub async fn ensure_rows(pool: &SqlitePool, user_id: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_ENSURE_LOCATION)
        .bind(user_id)
        .execute(pool)
        .await?;
    sqlx::query(SQL_ENSURE_MATCHING)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_LOAD_LOCATION: &str = r#"
SELECT
  latitude,
  longitude,
  city,
  country,
  radius_km,
  share_precision
FROM location_preferences
WHERE user_id = ?1
"#;

pub async fn load_location(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<LocationPreferenceRow>> {
    sqlx::query_as::<_, LocationPreferenceRow>(SQL_LOAD_LOCATION)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_MATCHING: &str = r#"
SELECT
  preferred_age_buckets,
  available_mornings,
  available_afternoons,
  available_evenings,
  available_weekdays,
  available_weekends,
  faith_filter,
  faith_exclude,
  visible
FROM matching_preferences
WHERE user_id = ?1
"#;

pub async fn load_matching(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<MatchingPreferenceRow>> {
    sqlx::query_as::<_, MatchingPreferenceRow>(SQL_LOAD_MATCHING)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_UPDATE_LOCATION: &str = r#"
UPDATE location_preferences
SET latitude = ?1,
    longitude = ?2,
    city = ?3,
    country = ?4,
    radius_km = ?5,
    share_precision = ?6,
    updated_at = datetime('now')
WHERE user_id = ?7
"#;

/// Writes the full row. Callers merge partial updates and clamp the radius first.
pub async fn update_location(
    pool: &SqlitePool,
    user_id: &str,
    row: &LocationPreferenceRow,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_LOCATION)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(&row.city)
        .bind(&row.country)
        .bind(row.radius_km)
        .bind(row.share_precision)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_MATCHING: &str = r#"
UPDATE matching_preferences
SET preferred_age_buckets = ?1,
    available_mornings = ?2,
    available_afternoons = ?3,
    available_evenings = ?4,
    available_weekdays = ?5,
    available_weekends = ?6,
    faith_filter = ?7,
    faith_exclude = ?8,
    visible = ?9,
    updated_at = datetime('now')
WHERE user_id = ?10
"#;

pub async fn update_matching(
    pool: &SqlitePool,
    user_id: &str,
    row: &MatchingPreferenceRow,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_MATCHING)
        .bind(Json(&row.preferred_age_buckets.0))
        .bind(row.available_mornings)
        .bind(row.available_afternoons)
        .bind(row.available_evenings)
        .bind(row.available_weekdays)
        .bind(row.available_weekends)
        .bind(row.faith_filter)
        .bind(Json(&row.faith_exclude.0))
        .bind(row.visible)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
