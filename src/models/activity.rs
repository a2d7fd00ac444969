use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::models::profile::{AgeBucket, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ActivityStatus {
    Draft,
    Open,
    Full,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ActivityVisibility {
    Public,
    Connections,
    Invite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Pending,
    Confirmed,
    Declined,
    Cancelled,
    Removed,
}

impl ParticipantStatus {
    /// Pending and confirmed participations count as "joined".
    pub fn is_active(self) -> bool {
        matches!(self, ParticipantStatus::Pending | ParticipantStatus::Confirmed)
    }
}

/// Host decisions on a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantAction {
    Approve,
    Decline,
    Remove,
}

impl ParticipantAction {
    pub fn resulting_status(self) -> ParticipantStatus {
        match self {
            ParticipantAction::Approve => ParticipantStatus::Confirmed,
            ParticipantAction::Decline => ParticipantStatus::Declined,
            ParticipantAction::Remove => ParticipantStatus::Removed,
        }
    }
}

// Feed row for activity discovery (activity + host name + confirmed count).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityFeedRow {
    pub activity_id: String,
    pub host_user_id: String,
    pub host_display_name: Option<String>,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_participants: i64,
    pub confirmed_count: i64,
    pub status: ActivityStatus,
    pub visibility: ActivityVisibility,
}

impl ActivityFeedRow {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Confirmed participants plus the host.
    pub fn participant_count(&self) -> i64 {
        self.confirmed_count + 1
    }

    pub fn spots_available(&self) -> i64 {
        (self.max_participants - self.participant_count()).max(0)
    }
}

// Everything the join check needs about an activity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JoinableActivityRow {
    pub activity_id: String,
    pub host_user_id: String,
    pub status: ActivityStatus,
    pub visibility: ActivityVisibility,
    pub max_participants: i64,
    pub confirmed_count: i64,
    pub gender_filter: Json<Vec<Gender>>,
    pub age_filter: Json<Vec<AgeBucket>>,
    pub required_intents: Json<Vec<String>>,
}

impl JoinableActivityRow {
    pub fn is_full(&self) -> bool {
        self.max_participants - (self.confirmed_count + 1) <= 0
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ParticipantRow {
    pub activity_id: String,
    pub user_id: String,
    pub status: ParticipantStatus,
    pub message: String,
    pub requested_at: String,
    pub responded_at: Option<String>,
}
