use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::connection_repo::{self, NewConnection};
use crate::database::profile_repo;
use crate::error::{AppError, AppResult};
use crate::models::connection::{check_new_request, TransitionError};
use crate::models::{ConnectionAction, ConnectionRole, ConnectionRow, ConnectionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionListFilter {
    PendingSent,
    PendingReceived,
    Accepted,
    /// Everything except blocked rows.
    #[default]
    All,
}

impl ConnectionListFilter {
    pub fn matches(self, user_id: &str, row: &ConnectionRow) -> bool {
        let role = row.role_of(user_id);
        match self {
            ConnectionListFilter::PendingSent => {
                row.status == ConnectionStatus::Pending && role == Some(ConnectionRole::Sender)
            }
            ConnectionListFilter::PendingReceived => {
                row.status == ConnectionStatus::Pending && role == Some(ConnectionRole::Receiver)
            }
            ConnectionListFilter::Accepted => row.status == ConnectionStatus::Accepted,
            ConnectionListFilter::All => row.status != ConnectionStatus::Blocked,
        }
    }
}

pub async fn list_connections(
    pool: &SqlitePool,
    user_id: &str,
    filter: ConnectionListFilter,
) -> AppResult<Vec<ConnectionRow>> {
    let rows = connection_repo::list_for_user(pool, user_id).await?;
    Ok(rows
        .into_iter()
        .filter(|row| filter.matches(user_id, row))
        .collect())
}

pub async fn request_connection(
    pool: &SqlitePool,
    from_user_id: &str,
    to_user_id: &str,
    intro_message: &str,
) -> AppResult<ConnectionRow> {
    if from_user_id == to_user_id {
        return Err(TransitionError::SelfConnection.into());
    }
    if !profile_repo::user_is_active(pool, to_user_id).await? {
        return Err(AppError::NotFound(format!("user {}", to_user_id)));
    }

    let existing = connection_repo::find_between(pool, from_user_id, to_user_id).await?;
    check_new_request(from_user_id, to_user_id, existing.map(|row| row.status))?;

    let id = Uuid::new_v4().to_string();
    insert_or_conflict(
        pool,
        NewConnection {
            id: &id,
            from_user_id,
            to_user_id,
            status: ConnectionStatus::Pending,
            intro_message: intro_message.trim(),
        },
    )
    .await?;

    info!("connections: {} requested {}", from_user_id, to_user_id);
    load(pool, &id).await
}

/// Accept, reject or block an existing row on behalf of one of its two users.
pub async fn respond(
    pool: &SqlitePool,
    actor_user_id: &str,
    connection_id: &str,
    action: ConnectionAction,
) -> AppResult<ConnectionRow> {
    let row = load_visible(pool, actor_user_id, connection_id).await?;
    let Some(role) = row.role_of(actor_user_id) else {
        return Err(not_found(connection_id));
    };

    let next = row.status.apply(action, role)?;
    write_status(pool, &row, next).await?;

    info!(
        "connections: {} {:?} {} ({} -> {})",
        actor_user_id,
        action,
        row.id,
        row.status.as_str(),
        next.as_str()
    );
    load(pool, &row.id).await
}

/// Blocks `target_user_id`, creating the row when the pair has none yet.
pub async fn block_user(
    pool: &SqlitePool,
    actor_user_id: &str,
    target_user_id: &str,
) -> AppResult<ConnectionRow> {
    if actor_user_id == target_user_id {
        return Err(TransitionError::SelfConnection.into());
    }

    match connection_repo::find_between(pool, actor_user_id, target_user_id).await? {
        Some(row) => {
            let role = row
                .role_of(actor_user_id)
                .ok_or_else(|| not_found(&row.id))?;
            let next = row.status.apply(ConnectionAction::Block, role)?;
            write_status(pool, &row, next).await?;
            info!("connections: {} blocked {}", actor_user_id, target_user_id);
            load(pool, &row.id).await
        }
        None => {
            if !profile_repo::user_is_active(pool, target_user_id).await? {
                return Err(AppError::NotFound(format!("user {}", target_user_id)));
            }
            let id = Uuid::new_v4().to_string();
            insert_or_conflict(
                pool,
                NewConnection {
                    id: &id,
                    from_user_id: actor_user_id,
                    to_user_id: target_user_id,
                    status: ConnectionStatus::Blocked,
                    intro_message: "",
                },
            )
            .await?;
            info!("connections: {} blocked {}", actor_user_id, target_user_id);
            load(pool, &id).await
        }
    }
}

pub async fn remove_connection(
    pool: &SqlitePool,
    actor_user_id: &str,
    connection_id: &str,
) -> AppResult<()> {
    let row = load_visible(pool, actor_user_id, connection_id).await?;
    let Some(role) = row.role_of(actor_user_id) else {
        return Err(not_found(connection_id));
    };
    row.status.check_removal(role)?;

    if connection_repo::delete_connection(pool, &row.id, row.status).await? == 0 {
        return Err(stale(&row.id));
    }
    info!("connections: {} removed {}", actor_user_id, row.id);
    Ok(())
}

async fn load(pool: &SqlitePool, connection_id: &str) -> AppResult<ConnectionRow> {
    connection_repo::find_by_id(pool, connection_id)
        .await?
        .ok_or_else(|| not_found(connection_id))
}

// Rows the actor is not part of read as missing.
async fn load_visible(
    pool: &SqlitePool,
    actor_user_id: &str,
    connection_id: &str,
) -> AppResult<ConnectionRow> {
    let row = load(pool, connection_id).await?;
    if row.role_of(actor_user_id).is_none() {
        return Err(not_found(connection_id));
    }
    Ok(row)
}

async fn write_status(
    pool: &SqlitePool,
    row: &ConnectionRow,
    next: ConnectionStatus,
) -> AppResult<()> {
    if connection_repo::update_status(pool, &row.id, row.status, next).await? == 0 {
        return Err(stale(&row.id));
    }
    Ok(())
}

fn stale(connection_id: &str) -> AppError {
    AppError::Conflict(format!(
        "Connection {} changed while updating; please retry.",
        connection_id
    ))
}

async fn insert_or_conflict(pool: &SqlitePool, new: NewConnection<'_>) -> AppResult<()> {
    match connection_repo::insert_connection(pool, new).await {
        Ok(()) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(TransitionError::Unavailable.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn not_found(connection_id: &str) -> AppError {
    AppError::NotFound(format!("connection {}", connection_id))
}
