//! Join requests and host decisions for activities.
//!
//! `check_join` is a fixed chain of rules; the first one that fails decides the
//! refusal message shown to the user.

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::database::{activities_repo, connection_repo, profile_repo};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityStatus, ActivityVisibility, ConnectionStatus, JoinableActivityRow, ParticipantAction,
    ParticipantRow, ParticipantStatus, RequesterProfile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinRefusal {
    #[error("You are the host of this activity")]
    Host,
    #[error("You are already a participant")]
    AlreadyParticipant,
    #[error("Activity is full")]
    Full,
    #[error("Activity is not open for joining")]
    NotOpen,
    #[error("This activity is for connections only")]
    ConnectionsOnly,
    #[error("This activity is invite only")]
    InviteOnly,
    #[error("Please complete your profile first")]
    NoProfile,
    #[error("Activity has gender restrictions")]
    Gender,
    #[error("Activity has age restrictions")]
    Age,
    #[error("Activity requires specific intents")]
    Intents,
}

impl From<JoinRefusal> for AppError {
    fn from(refusal: JoinRefusal) -> Self {
        AppError::Conflict(refusal.to_string())
    }
}

/// What the join rules need to know about the person asking.
pub struct Joiner<'a> {
    pub user_id: &'a str,
    pub profile: Option<&'a RequesterProfile>,
    /// Any participation record for this activity, whatever its status.
    pub has_participation: bool,
    pub connected_to_host: bool,
}

pub fn check_join(activity: &JoinableActivityRow, joiner: &Joiner<'_>) -> Result<(), JoinRefusal> {
    if joiner.user_id == activity.host_user_id {
        return Err(JoinRefusal::Host);
    }
    if joiner.has_participation {
        return Err(JoinRefusal::AlreadyParticipant);
    }
    if activity.is_full() {
        return Err(JoinRefusal::Full);
    }
    if activity.status != ActivityStatus::Open {
        return Err(JoinRefusal::NotOpen);
    }
    match activity.visibility {
        ActivityVisibility::Connections if !joiner.connected_to_host => {
            return Err(JoinRefusal::ConnectionsOnly)
        }
        ActivityVisibility::Invite => return Err(JoinRefusal::InviteOnly),
        _ => {}
    }

    let Some(profile) = joiner.profile else {
        return Err(JoinRefusal::NoProfile);
    };

    let genders = &activity.gender_filter.0;
    if !genders.is_empty() && !profile.gender.is_some_and(|g| genders.contains(&g)) {
        return Err(JoinRefusal::Gender);
    }
    let ages = &activity.age_filter.0;
    if !ages.is_empty() && !profile.age_bucket.is_some_and(|a| ages.contains(&a)) {
        return Err(JoinRefusal::Age);
    }
    let required = &activity.required_intents.0;
    if !required.is_empty() && !required.iter().any(|i| profile.intents.contains(i)) {
        return Err(JoinRefusal::Intents);
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinOutcome {
    pub message: &'static str,
    pub status: ParticipantStatus,
}

pub async fn request_to_join(
    pool: &SqlitePool,
    user_id: &str,
    activity_id: &str,
    message: &str,
) -> AppResult<JoinOutcome> {
    let activity = load_activity(pool, activity_id).await?;

    let profile = profile_repo::load_requester(pool, user_id)
        .await?
        .map(RequesterProfile::from);
    let has_participation = activities_repo::find_participant(pool, activity_id, user_id)
        .await?
        .is_some();
    let connected_to_host = connection_repo::find_between(pool, user_id, &activity.host_user_id)
        .await?
        .is_some_and(|row| row.status == ConnectionStatus::Accepted);

    check_join(
        &activity,
        &Joiner {
            user_id,
            profile: profile.as_ref(),
            has_participation,
            connected_to_host,
        },
    )?;

    match activities_repo::insert_participant(pool, activity_id, user_id, message.trim()).await {
        Ok(()) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(JoinRefusal::AlreadyParticipant.into());
        }
        Err(e) => return Err(e.into()),
    }

    info!("activities: {} requested to join {}", user_id, activity_id);
    Ok(JoinOutcome {
        message: "Join request sent",
        status: ParticipantStatus::Pending,
    })
}

pub async fn leave_activity(pool: &SqlitePool, user_id: &str, activity_id: &str) -> AppResult<()> {
    load_activity(pool, activity_id).await?;
    if activities_repo::find_participant(pool, activity_id, user_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("You are not a participant".to_string()));
    }

    activities_repo::update_participant_status(
        pool,
        activity_id,
        user_id,
        ParticipantStatus::Cancelled,
        false,
    )
    .await?;
    info!("activities: {} left {}", user_id, activity_id);
    Ok(())
}

/// Host decision on a participant. Approving is refused once the activity is full.
pub async fn respond_to_participant(
    pool: &SqlitePool,
    host_user_id: &str,
    activity_id: &str,
    participant_user_id: &str,
    action: ParticipantAction,
) -> AppResult<ParticipantRow> {
    let activity = load_activity(pool, activity_id).await?;
    if activity.host_user_id != host_user_id {
        return Err(AppError::Forbidden(
            "Only the host can manage participants".to_string(),
        ));
    }

    if activities_repo::find_participant(pool, activity_id, participant_user_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Participant not found".to_string()));
    }

    if action == ParticipantAction::Approve && activity.is_full() {
        return Err(JoinRefusal::Full.into());
    }

    let status = action.resulting_status();
    activities_repo::update_participant_status(
        pool,
        activity_id,
        participant_user_id,
        status,
        true,
    )
    .await?;
    info!(
        "activities: host {} set {} to {:?} on {}",
        host_user_id, participant_user_id, status, activity_id
    );

    activities_repo::find_participant(pool, activity_id, participant_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))
}

async fn load_activity(pool: &SqlitePool, activity_id: &str) -> AppResult<JoinableActivityRow> {
    activities_repo::load_joinable(pool, activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("activity {}", activity_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBucket, FaithFilter, Gender, Origin};
    use sqlx::types::Json;
    use std::collections::BTreeSet;

    fn activity() -> JoinableActivityRow {
        JoinableActivityRow {
            activity_id: "a1".into(),
            host_user_id: "host".into(),
            status: ActivityStatus::Open,
            visibility: ActivityVisibility::Public,
            max_participants: 4,
            confirmed_count: 0,
            gender_filter: Json(vec![]),
            age_filter: Json(vec![]),
            required_intents: Json(vec![]),
        }
    }

    fn profile() -> RequesterProfile {
        RequesterProfile {
            user_id: "me".into(),
            is_complete: true,
            age_bucket: Some(AgeBucket::Age25To34),
            gender: Some(Gender::Female),
            faith: None,
            origin: Origin::default(),
            preferred_age_buckets: vec![],
            faith_filter: FaithFilter::OpenToAll,
            faith_exclude: vec![],
            interests: BTreeSet::new(),
            intents: ["Friendship".to_string()].into_iter().collect(),
        }
    }

    fn joiner(profile: Option<&RequesterProfile>) -> Joiner<'_> {
        Joiner {
            user_id: "me",
            profile,
            has_participation: false,
            connected_to_host: false,
        }
    }

    #[test]
    fn open_public_activity_accepts_a_profiled_user() {
        let p = profile();
        assert_eq!(check_join(&activity(), &joiner(Some(&p))), Ok(()));
    }

    #[test]
    fn host_and_existing_participants_are_refused() {
        let p = profile();
        let mut j = joiner(Some(&p));
        j.user_id = "host";
        assert_eq!(check_join(&activity(), &j), Err(JoinRefusal::Host));

        let mut j = joiner(Some(&p));
        j.has_participation = true;
        assert_eq!(
            check_join(&activity(), &j),
            Err(JoinRefusal::AlreadyParticipant)
        );
    }

    #[test]
    fn capacity_is_checked_before_status() {
        let p = profile();
        let mut a = activity();
        a.confirmed_count = 3;
        a.status = ActivityStatus::Cancelled;
        assert_eq!(check_join(&a, &joiner(Some(&p))), Err(JoinRefusal::Full));

        a.confirmed_count = 0;
        assert_eq!(check_join(&a, &joiner(Some(&p))), Err(JoinRefusal::NotOpen));
    }

    #[test]
    fn visibility_rules() {
        let p = profile();
        let mut a = activity();
        a.visibility = ActivityVisibility::Connections;
        assert_eq!(
            check_join(&a, &joiner(Some(&p))),
            Err(JoinRefusal::ConnectionsOnly)
        );
        let mut j = joiner(Some(&p));
        j.connected_to_host = true;
        assert_eq!(check_join(&a, &j), Ok(()));

        a.visibility = ActivityVisibility::Invite;
        assert_eq!(check_join(&a, &j), Err(JoinRefusal::InviteOnly));
    }

    #[test]
    fn audience_filters_need_a_profile() {
        assert_eq!(
            check_join(&activity(), &joiner(None)),
            Err(JoinRefusal::NoProfile)
        );

        let p = profile();
        let mut a = activity();
        a.gender_filter = Json(vec![Gender::Male]);
        assert_eq!(check_join(&a, &joiner(Some(&p))), Err(JoinRefusal::Gender));

        let mut a = activity();
        a.age_filter = Json(vec![AgeBucket::Age45To54]);
        assert_eq!(check_join(&a, &joiner(Some(&p))), Err(JoinRefusal::Age));

        let mut a = activity();
        a.required_intents = Json(vec!["Networking".into()]);
        assert_eq!(check_join(&a, &joiner(Some(&p))), Err(JoinRefusal::Intents));
        a.required_intents = Json(vec!["Networking".into(), "Friendship".into()]);
        assert_eq!(check_join(&a, &joiner(Some(&p))), Ok(()));
    }
}
