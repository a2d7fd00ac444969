use sqlx::SqlitePool;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Applies the embedded schema. Every statement is `IF NOT EXISTS`, so this is
/// safe to run on each startup.
pub async fn migrate(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
