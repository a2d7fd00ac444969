use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
    Blocked,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
            ConnectionStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionAction {
    Accept,
    Reject,
    Block,
}

/// Which side of a connection row the acting user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    Sender,
    Receiver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("You cannot connect with yourself.")]
    SelfConnection,
    #[error("Connection request already pending.")]
    AlreadyPending,
    #[error("You are already connected.")]
    AlreadyConnected,
    #[error("This connection is not available.")]
    Unavailable,
    #[error("You can only respond to requests sent to you.")]
    NotReceiver,
    #[error("This request is no longer pending.")]
    NotPending,
    #[error("You can only cancel requests you sent.")]
    NotSender,
    #[error("This connection can no longer be removed.")]
    Permanent,
}

/// A new request is only allowed when the unordered pair has no row at all.
/// Rejected and blocked pairs stay closed.
pub fn check_new_request(
    from_user_id: &str,
    to_user_id: &str,
    existing: Option<ConnectionStatus>,
) -> Result<(), TransitionError> {
    if from_user_id == to_user_id {
        return Err(TransitionError::SelfConnection);
    }
    match existing {
        None => Ok(()),
        Some(ConnectionStatus::Pending) => Err(TransitionError::AlreadyPending),
        Some(ConnectionStatus::Accepted) => Err(TransitionError::AlreadyConnected),
        Some(ConnectionStatus::Rejected) | Some(ConnectionStatus::Blocked) => {
            Err(TransitionError::Unavailable)
        }
    }
}

impl ConnectionStatus {
    pub fn apply(
        self,
        action: ConnectionAction,
        role: ConnectionRole,
    ) -> Result<ConnectionStatus, TransitionError> {
        match action {
            ConnectionAction::Accept | ConnectionAction::Reject => {
                if role != ConnectionRole::Receiver {
                    return Err(TransitionError::NotReceiver);
                }
                if self != ConnectionStatus::Pending {
                    return Err(TransitionError::NotPending);
                }
                Ok(if action == ConnectionAction::Accept {
                    ConnectionStatus::Accepted
                } else {
                    ConnectionStatus::Rejected
                })
            }
            ConnectionAction::Block => match self {
                ConnectionStatus::Blocked => Err(TransitionError::Unavailable),
                _ => Ok(ConnectionStatus::Blocked),
            },
        }
    }

    /// Pending requests can be withdrawn by their sender, accepted connections
    /// dropped by either side. Rejected and blocked rows are permanent.
    pub fn check_removal(self, role: ConnectionRole) -> Result<(), TransitionError> {
        match self {
            ConnectionStatus::Pending if role == ConnectionRole::Sender => Ok(()),
            ConnectionStatus::Pending => Err(TransitionError::NotSender),
            ConnectionStatus::Accepted => Ok(()),
            ConnectionStatus::Rejected | ConnectionStatus::Blocked => {
                Err(TransitionError::Permanent)
            }
        }
    }
}

/// Order-independent key for a user pair, so both directions land on one row.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}:{}", a, b)
    } else {
        format!("{}:{}", b, a)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConnectionRow {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub status: ConnectionStatus,
    pub intro_message: String,
    pub created_at: String,
    pub updated_at: String,
    pub accepted_at: Option<String>,
}

impl ConnectionRow {
    pub fn role_of(&self, user_id: &str) -> Option<ConnectionRole> {
        if self.from_user_id == user_id {
            Some(ConnectionRole::Sender)
        } else if self.to_user_id == user_id {
            Some(ConnectionRole::Receiver)
        } else {
            None
        }
    }

    pub fn counterpart_of(&self, user_id: &str) -> &str {
        if self.from_user_id == user_id {
            &self.to_user_id
        } else {
            &self.from_user_id
        }
    }
}
