use sqlx::SqlitePool;

use crate::models::{AgeBucket, CandidateProfileRow, RequesterProfileRow};

const SQL_LOAD_REQUESTER: &str = r#"
SELECT
    p.user_id,
    p.is_complete,
    p.age_bucket,
    p.gender,
    p.faith,
    l.latitude,
    l.longitude,
    COALESCE(l.radius_km, 25) AS radius_km,
    COALESCE(m.preferred_age_buckets, '[]') AS preferred_age_buckets,
    COALESCE(m.faith_filter, 'open_to_all') AS faith_filter,
    COALESCE(m.faith_exclude, '[]') AS faith_exclude,
    (
        SELECT json_group_array(t.name)
        FROM profile_interests pi
        JOIN interest_tags t ON t.id = pi.interest_id
        WHERE pi.user_id = p.user_id
    ) AS interests,
    (
        SELECT json_group_array(t.name)
        FROM profile_intents pn
        JOIN intent_tags t ON t.id = pn.intent_id
        WHERE pn.user_id = p.user_id
    ) AS intents
FROM profiles p
JOIN users u ON u.user_id = p.user_id
LEFT JOIN location_preferences l ON l.user_id = p.user_id
LEFT JOIN matching_preferences m ON m.user_id = p.user_id
WHERE p.user_id = ?1
"#;

// Storage-side pre-filter only; the eligibility chain re-checks every condition.
// No row cap: every candidate inside the box reaches the filters.
const SQL_LIST_CANDIDATES: &str = r#"
SELECT
    p.user_id,
    p.display_name,
    p.bio,
    p.pronouns,
    p.age_bucket,
    p.primary_language,
    p.faith,
    p.faith_visible,
    p.is_complete,
    COALESCE(m.visible, 1) AS visible,
    l.latitude,
    l.longitude,
    (
        SELECT json_group_array(t.name)
        FROM profile_interests pi
        JOIN interest_tags t ON t.id = pi.interest_id
        WHERE pi.user_id = p.user_id
    ) AS interests,
    (
        SELECT json_group_array(t.name)
        FROM profile_intents pn
        JOIN intent_tags t ON t.id = pn.intent_id
        WHERE pn.user_id = p.user_id
    ) AS intents
FROM profiles p
JOIN users u ON u.user_id = p.user_id
LEFT JOIN location_preferences l ON l.user_id = p.user_id
LEFT JOIN matching_preferences m ON m.user_id = p.user_id
WHERE u.is_active = 1
  AND p.user_id != ?
  AND p.is_complete = 1
  AND COALESCE(m.visible, 1) = 1
  AND l.latitude IS NOT NULL
  AND l.longitude IS NOT NULL
  AND (
    ? IS NULL
    OR (
      l.latitude BETWEEN ? AND ?
      AND l.longitude BETWEEN ? AND ?
    )
  )
ORDER BY p.created_at ASC, p.user_id ASC
"#;

pub async fn load_requester(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<RequesterProfileRow>> {
    sqlx::query_as::<_, RequesterProfileRow>(SQL_LOAD_REQUESTER)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_candidates(
    pool: &SqlitePool,
    requester_id: &str,
    bbox: Option<(f64, f64, f64, f64)>,
) -> sqlx::Result<Vec<CandidateProfileRow>> {
    let (min_lat, max_lat, min_lon, max_lon) = bbox
        .map(|v| (Some(v.0), Some(v.1), Some(v.2), Some(v.3)))
        .unwrap_or((None, None, None, None));

    sqlx::query_as::<_, CandidateProfileRow>(SQL_LIST_CANDIDATES)
        .bind(requester_id)
        .bind(min_lat)
        .bind(min_lat)
        .bind(max_lat)
        .bind(min_lon)
        .bind(max_lon)
        .fetch_all(pool)
        .await
}

#[derive(Debug, sqlx::FromRow)]
pub struct CompletionRow {
    pub display_name: String,
    pub age_bucket: Option<AgeBucket>,
    pub intent_count: i64,
}

const SQL_LOAD_COMPLETION: &str = r#"
SELECT
    p.display_name,
    p.age_bucket,
    (SELECT COUNT(*) FROM profile_intents pn WHERE pn.user_id = p.user_id) AS intent_count
FROM profiles p
WHERE p.user_id = ?1
"#;

pub async fn load_completion(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<CompletionRow>> {
    sqlx::query_as::<_, CompletionRow>(SQL_LOAD_COMPLETION)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_SET_COMPLETE: &str = r#"
UPDATE profiles
SET is_complete = ?, updated_at = datetime('now')
WHERE user_id = ?
"#;

pub async fn set_complete(pool: &SqlitePool, user_id: &str, is_complete: bool) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_COMPLETE)
        .bind(is_complete)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_USER_IS_ACTIVE: &str = r#"
SELECT COUNT(*) FROM users WHERE user_id = ?1 AND is_active = 1
"#;

pub async fn user_is_active(pool: &SqlitePool, user_id: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_USER_IS_ACTIVE)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}
