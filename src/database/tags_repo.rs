use sqlx::SqlitePool;

const SQL_INSERT_INTENT_TAG: &str = r#"
INSERT OR IGNORE INTO intent_tags (name, description) VALUES (?1, ?2)
"#;

const SQL_INSERT_INTEREST_TAG: &str = r#"
INSERT OR IGNORE INTO interest_tags (name, category) VALUES (?1, ?2)
"#;

const SQL_INSERT_CATEGORY: &str = r#"
INSERT OR IGNORE INTO activity_categories (name, icon) VALUES (?1, ?2)
"#;

/// Each insert returns `true` when a new row was created, `false` if the name existed.
pub async fn insert_intent_tag(
    pool: &SqlitePool,
    name: &str,
    description: &str,
) -> sqlx::Result<bool> {
    let res = sqlx::query(SQL_INSERT_INTENT_TAG)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn insert_interest_tag(
    pool: &SqlitePool,
    name: &str,
    category: &str,
) -> sqlx::Result<bool> {
    let res = sqlx::query(SQL_INSERT_INTEREST_TAG)
        .bind(name)
        .bind(category)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn insert_activity_category(
    pool: &SqlitePool,
    name: &str,
    icon: &str,
) -> sqlx::Result<bool> {
    let res = sqlx::query(SQL_INSERT_CATEGORY)
        .bind(name)
        .bind(icon)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
