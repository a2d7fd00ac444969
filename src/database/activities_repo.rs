use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{ActivityFeedRow, JoinableActivityRow, ParticipantRow, ParticipantStatus};

const SQL_FEED_COLUMNS: &str = r#"
SELECT
  a.activity_id,
  a.host_user_id,
  NULLIF(TRIM(hp.display_name), '') AS host_display_name,
  a.title,
  a.description,
  a.category_id,
  c.name AS category_name,
  a.date,
  a.time,
  a.duration_minutes,
  a.location_name,
  a.latitude,
  a.longitude,
  a.max_participants,
  (
    SELECT COUNT(*)
    FROM activity_participants ap
    WHERE ap.activity_id = a.activity_id
      AND ap.status = 'confirmed'
  ) AS confirmed_count,
  a.status,
  a.visibility
FROM activities a
LEFT JOIN activity_categories c ON c.id = a.category_id
LEFT JOIN profiles hp ON hp.user_id = a.host_user_id
"#;

const SQL_FEED_ORDER: &str = " ORDER BY a.date ASC, a.time ASC, a.activity_id ASC";

/// Open, upcoming, non-invite activities. With a box, placed activities outside it
/// are skipped; activities without coordinates are always returned.
pub async fn list_discover(
    pool: &SqlitePool,
    today: NaiveDate,
    bbox: Option<(f64, f64, f64, f64)>,
) -> sqlx::Result<Vec<ActivityFeedRow>> {
    let (min_lat, max_lat, min_lon, max_lon) = bbox
        .map(|v| (Some(v.0), Some(v.1), Some(v.2), Some(v.3)))
        .unwrap_or((None, None, None, None));

    let sql = format!(
        r#"{} WHERE a.status = 'open' AND a.date >= ?1 AND a.visibility != 'invite'
            AND (
              ?2 IS NULL
              OR a.latitude IS NULL
              OR a.longitude IS NULL
              OR (a.latitude BETWEEN ?2 AND ?3 AND a.longitude BETWEEN ?4 AND ?5)
            ){}"#,
        SQL_FEED_COLUMNS, SQL_FEED_ORDER
    );
    sqlx::query_as::<_, ActivityFeedRow>(&sql)
        .bind(today)
        .bind(min_lat)
        .bind(max_lat)
        .bind(min_lon)
        .bind(max_lon)
        .fetch_all(pool)
        .await
}

pub async fn list_hosted_by(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<ActivityFeedRow>> {
    let sql = format!(
        "{} WHERE a.host_user_id = ?1{}",
        SQL_FEED_COLUMNS, SQL_FEED_ORDER
    );
    sqlx::query_as::<_, ActivityFeedRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_joined_by(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<ActivityFeedRow>> {
    let sql = format!(
        r#"{} WHERE a.activity_id IN (
            SELECT activity_id FROM activity_participants
            WHERE user_id = ?1 AND status IN ('pending', 'confirmed')
        ){}"#,
        SQL_FEED_COLUMNS, SQL_FEED_ORDER
    );
    sqlx::query_as::<_, ActivityFeedRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_ACTIVE_PARTICIPATIONS: &str = r#"
SELECT activity_id
FROM activity_participants
WHERE user_id = ?1
  AND status IN ('pending', 'confirmed')
"#;

pub async fn list_active_participation_ids(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_LIST_ACTIVE_PARTICIPATIONS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

const SQL_LOAD_JOINABLE: &str = r#"
SELECT
  a.activity_id,
  a.host_user_id,
  a.status,
  a.visibility,
  a.max_participants,
  (
    SELECT COUNT(*)
    FROM activity_participants ap
    WHERE ap.activity_id = a.activity_id
      AND ap.status = 'confirmed'
  ) AS confirmed_count,
  a.gender_filter,
  a.age_filter,
  (
    SELECT json_group_array(t.name)
    FROM activity_intent_filters f
    JOIN intent_tags t ON t.id = f.intent_id
    WHERE f.activity_id = a.activity_id
  ) AS required_intents
FROM activities a
WHERE a.activity_id = ?1
"#;

pub async fn load_joinable(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Option<JoinableActivityRow>> {
    sqlx::query_as::<_, JoinableActivityRow>(SQL_LOAD_JOINABLE)
        .bind(activity_id)
        .fetch_optional(pool)
        .await
}

const SQL_FIND_PARTICIPANT: &str = r#"
SELECT
  activity_id,
  user_id,
  status,
  message,
  requested_at,
  responded_at
FROM activity_participants
WHERE activity_id = ?1
  AND user_id = ?2
"#;

pub async fn find_participant(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
) -> sqlx::Result<Option<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_FIND_PARTICIPANT)
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO activity_participants (
  activity_id,
  user_id,
  status,
  message
) VALUES (?1, ?2, 'pending', ?3)
"#;

pub async fn insert_participant(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
    message: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(activity_id)
        .bind(user_id)
        .bind(message)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_UPDATE_PARTICIPANT_STATUS: &str = r#"
UPDATE activity_participants
SET status = ?1,
    responded_at = CASE WHEN ?4 THEN datetime('now') ELSE responded_at END
WHERE activity_id = ?2
  AND user_id = ?3
"#;

/// `responded` marks a host decision and stamps `responded_at`.
pub async fn update_participant_status(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
    status: ParticipantStatus,
    responded: bool,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PARTICIPANT_STATUS)
        .bind(status)
        .bind(activity_id)
        .bind(user_id)
        .bind(responded)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
