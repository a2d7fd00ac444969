use sqlx::SqlitePool;

use crate::models::connection::pair_key;
use crate::models::{ConnectionRow, ConnectionStatus};

const CONNECTION_COLUMNS: &str = r#"
SELECT
  id,
  from_user_id,
  to_user_id,
  status,
  intro_message,
  created_at,
  updated_at,
  accepted_at
FROM connections
"#;

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<ConnectionRow>> {
    let sql = format!(
        "{} WHERE from_user_id = ?1 OR to_user_id = ?1 ORDER BY created_at DESC, id ASC",
        CONNECTION_COLUMNS
    );
    sqlx::query_as::<_, ConnectionRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<ConnectionRow>> {
    let sql = format!("{} WHERE id = ?1", CONNECTION_COLUMNS);
    sqlx::query_as::<_, ConnectionRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_between(
    pool: &SqlitePool,
    a: &str,
    b: &str,
) -> sqlx::Result<Option<ConnectionRow>> {
    let sql = format!("{} WHERE pair_key = ?1", CONNECTION_COLUMNS);
    sqlx::query_as::<_, ConnectionRow>(&sql)
        .bind(pair_key(a, b))
        .fetch_optional(pool)
        .await
}

pub struct NewConnection<'a> {
    pub id: &'a str,
    pub from_user_id: &'a str,
    pub to_user_id: &'a str,
    pub status: ConnectionStatus,
    pub intro_message: &'a str,
}

const SQL_INSERT_CONNECTION: &str = r#"
INSERT INTO connections (
  id,
  pair_key,
  from_user_id,
  to_user_id,
  status,
  intro_message
) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub async fn insert_connection(pool: &SqlitePool, new: NewConnection<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_CONNECTION)
        .bind(new.id)
        .bind(pair_key(new.from_user_id, new.to_user_id))
        .bind(new.from_user_id)
        .bind(new.to_user_id)
        .bind(new.status)
        .bind(new.intro_message)
        .execute(pool)
        .await?;
    Ok(())
}

// Compare-and-set: the write only lands while the row still holds `expected`.
const SQL_UPDATE_STATUS: &str = r#"
UPDATE connections
SET status = ?1,
    updated_at = datetime('now'),
    accepted_at = CASE WHEN ?1 = 'accepted' THEN datetime('now') ELSE accepted_at END
WHERE id = ?2 AND status = ?3
"#;

/// Returns the number of rows changed; 0 means the row moved on since it was read.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    expected: ConnectionStatus,
    status: ConnectionStatus,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_STATUS)
        .bind(status)
        .bind(id)
        .bind(expected)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_connection(
    pool: &SqlitePool,
    id: &str,
    expected: ConnectionStatus,
) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM connections WHERE id = ?1 AND status = ?2")
        .bind(id)
        .bind(expected)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
