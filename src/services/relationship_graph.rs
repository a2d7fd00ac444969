use std::collections::{HashMap, HashSet};

use crate::models::connection::pair_key;
use crate::models::{ConnectionRow, ConnectionStatus};

/// Read-only view of the connection/block relation between users.
///
/// Discovery only observes this graph; transitions go through
/// `connection_service`.
pub trait RelationshipGraph {
    /// Status of the single row for the unordered pair, whoever initiated it.
    fn status_between(&self, a: &str, b: &str) -> Option<ConnectionStatus>;

    /// Every user with a block against `user_id`, in either direction.
    fn blocked_counterparts(&self, user_id: &str) -> HashSet<String>;

    fn is_blocked(&self, a: &str, b: &str) -> bool {
        self.status_between(a, b) == Some(ConnectionStatus::Blocked)
    }

    fn are_connected(&self, a: &str, b: &str) -> bool {
        self.status_between(a, b) == Some(ConnectionStatus::Accepted)
    }
}

/// Graph built from a set of loaded connection rows, usually every row the
/// requester takes part in. Pairs outside the loaded rows read as "no relation".
#[derive(Debug, Default, Clone)]
pub struct ConnectionSnapshot {
    edges: HashMap<String, (String, String, ConnectionStatus)>,
}

impl ConnectionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = ConnectionRow>) -> Self {
        let mut snapshot = Self::new();
        for row in rows {
            snapshot.insert(&row.from_user_id, &row.to_user_id, row.status);
        }
        snapshot
    }

    pub fn insert(&mut self, from_user_id: &str, to_user_id: &str, status: ConnectionStatus) {
        self.edges.insert(
            pair_key(from_user_id, to_user_id),
            (from_user_id.to_string(), to_user_id.to_string(), status),
        );
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl RelationshipGraph for ConnectionSnapshot {
    fn status_between(&self, a: &str, b: &str) -> Option<ConnectionStatus> {
        self.edges.get(&pair_key(a, b)).map(|(_, _, status)| *status)
    }

    fn blocked_counterparts(&self, user_id: &str) -> HashSet<String> {
        self.edges
            .values()
            .filter(|(_, _, status)| *status == ConnectionStatus::Blocked)
            .filter_map(|(from, to, _)| {
                if from == user_id {
                    Some(to.clone())
                } else if to == user_id {
                    Some(from.clone())
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ConnectionSnapshot {
        let mut g = ConnectionSnapshot::new();
        g.insert("ama", "kofi", ConnectionStatus::Accepted);
        g.insert("esi", "ama", ConnectionStatus::Blocked);
        g.insert("ama", "yaw", ConnectionStatus::Pending);
        g.insert("kwame", "ama", ConnectionStatus::Rejected);
        g
    }

    #[test]
    fn status_is_direction_independent() {
        let g = graph();
        assert_eq!(
            g.status_between("kofi", "ama"),
            Some(ConnectionStatus::Accepted)
        );
        assert_eq!(
            g.status_between("ama", "kofi"),
            Some(ConnectionStatus::Accepted)
        );
        assert_eq!(g.status_between("ama", "nobody"), None);
    }

    #[test]
    fn blocks_are_symmetric() {
        let g = graph();
        assert!(g.is_blocked("ama", "esi"));
        assert!(g.is_blocked("esi", "ama"));
        assert!(!g.is_blocked("ama", "kofi"));
        assert!(g.blocked_counterparts("ama").contains("esi"));
        assert!(g.blocked_counterparts("esi").contains("ama"));
        assert_eq!(g.blocked_counterparts("ama").len(), 1);
    }

    #[test]
    fn only_accepted_counts_as_connected() {
        let g = graph();
        assert!(g.are_connected("kofi", "ama"));
        assert!(!g.are_connected("ama", "yaw"));
        assert!(!g.are_connected("ama", "kwame"));
        assert!(!g.are_connected("ama", "esi"));
    }
}
