//! Hard eligibility predicates for both discovery pipelines.
//!
//! Every predicate is an independent AND-condition. They run cheapest-first so a
//! candidate is dropped as early as possible; the order never changes the outcome.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{
    ActivityFeedRow, ActivityStatus, ActivityVisibility, CandidateProfile, FaithFilter,
    RequesterProfile,
};
use crate::services::geo::haversine_km;
use crate::services::relationship_graph::RelationshipGraph;

/// Why a candidate was left out. Only used for tracing and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Requester,
    NotDiscoverable,
    IntentMismatch,
    InterestMismatch,
    AgeBucketMismatch,
    FaithMismatch,
    Blocked,
    MissingCoordinates,
    OutOfRange,
    NotOpen,
    InThePast,
    NotVisible,
    CategoryMismatch,
    OutsideDateRange,
    NotHostedByRequester,
    NotJoinedByRequester,
}

/// Effective user search after merging query overrides into stored preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCriteria {
    pub origin: Option<(f64, f64)>,
    pub radius_km: i64,
    pub intent: Option<String>,
    pub interest: Option<String>,
    pub faith_mode: FaithFilter,
}

/// Returns the candidate's distance from the origin when every predicate holds.
pub fn check_user(
    requester: &RequesterProfile,
    candidate: &CandidateProfile,
    criteria: &UserCriteria,
    blocked: &HashSet<String>,
) -> Result<f64, Exclusion> {
    if candidate.user_id == requester.user_id {
        return Err(Exclusion::Requester);
    }

    if !candidate.is_complete || !candidate.visible {
        return Err(Exclusion::NotDiscoverable);
    }

    match criteria.intent.as_deref() {
        Some(intent) => {
            if !candidate.intents.contains(intent) {
                return Err(Exclusion::IntentMismatch);
            }
        }
        None if !requester.intents.is_empty() => {
            if requester.intents.is_disjoint(&candidate.intents) {
                return Err(Exclusion::IntentMismatch);
            }
        }
        None => {}
    }

    if let Some(interest) = criteria.interest.as_deref() {
        if !candidate.interests.contains(interest) {
            return Err(Exclusion::InterestMismatch);
        }
    }

    if !requester.preferred_age_buckets.is_empty() {
        let fits = candidate
            .age_bucket
            .is_some_and(|bucket| requester.preferred_age_buckets.contains(&bucket));
        if !fits {
            return Err(Exclusion::AgeBucketMismatch);
        }
    }

    match criteria.faith_mode {
        FaithFilter::SameOnly => {
            if let Some(faith) = requester.faith {
                if candidate.faith != Some(faith) {
                    return Err(Exclusion::FaithMismatch);
                }
            }
        }
        FaithFilter::Custom => {
            if let Some(faith) = candidate.faith {
                if requester.faith_exclude.contains(&faith) {
                    return Err(Exclusion::FaithMismatch);
                }
            }
        }
        FaithFilter::OpenToAll => {}
    }

    if blocked.contains(&candidate.user_id) {
        return Err(Exclusion::Blocked);
    }

    let (Some((lat0, lon0)), Some((lat1, lon1))) = (criteria.origin, candidate.coordinates())
    else {
        return Err(Exclusion::MissingCoordinates);
    };

    let distance = haversine_km(lat0, lon0, lat1, lon1);
    if distance > criteria.radius_km as f64 {
        return Err(Exclusion::OutOfRange);
    }

    Ok(distance)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityScope {
    #[default]
    Discover,
    HostedByMe,
    JoinedByMe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCriteria {
    pub origin: (f64, f64),
    pub radius_km: i64,
    pub category_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub scope: ActivityScope,
    pub today: NaiveDate,
    /// Activities with a pending or confirmed participation of the requester.
    pub joined_activity_ids: HashSet<String>,
}

/// Returns the activity's distance (if it has coordinates) when it may be listed.
///
/// The "hosted by me" and "joined by me" views skip status, date, visibility and
/// radius checks entirely. Gender, age and intent restrictions are not checked
/// here: they only apply when joining (see `activity_join_service`).
pub fn check_activity(
    requester_id: &str,
    activity: &ActivityFeedRow,
    criteria: &ActivityCriteria,
    graph: &impl RelationshipGraph,
    blocked: &HashSet<String>,
) -> Result<Option<f64>, Exclusion> {
    match criteria.scope {
        ActivityScope::HostedByMe => {
            if activity.host_user_id != requester_id {
                return Err(Exclusion::NotHostedByRequester);
            }
        }
        ActivityScope::JoinedByMe => {
            if !criteria.joined_activity_ids.contains(&activity.activity_id) {
                return Err(Exclusion::NotJoinedByRequester);
            }
        }
        ActivityScope::Discover => {
            if activity.status != ActivityStatus::Open {
                return Err(Exclusion::NotOpen);
            }
            if activity.date < criteria.today {
                return Err(Exclusion::InThePast);
            }
            let visible = match activity.visibility {
                ActivityVisibility::Public => true,
                ActivityVisibility::Connections => {
                    graph.are_connected(requester_id, &activity.host_user_id)
                }
                ActivityVisibility::Invite => false,
            };
            if !visible {
                return Err(Exclusion::NotVisible);
            }
            if blocked.contains(&activity.host_user_id) {
                return Err(Exclusion::Blocked);
            }
        }
    }

    if let Some(category_id) = criteria.category_id {
        if activity.category_id != Some(category_id) {
            return Err(Exclusion::CategoryMismatch);
        }
    }
    if criteria.date_from.is_some_and(|from| activity.date < from)
        || criteria.date_to.is_some_and(|to| activity.date > to)
    {
        return Err(Exclusion::OutsideDateRange);
    }

    let (lat0, lon0) = criteria.origin;
    let distance = activity
        .coordinates()
        .map(|(lat1, lon1)| haversine_km(lat0, lon0, lat1, lon1));

    if criteria.scope == ActivityScope::Discover {
        if let Some(d) = distance {
            if d > criteria.radius_km as f64 {
                return Err(Exclusion::OutOfRange);
            }
        }
    }

    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBucket, ConnectionStatus, Faith, Origin};
    use crate::services::relationship_graph::ConnectionSnapshot;
    use std::collections::BTreeSet;

    const ACCRA: (f64, f64) = (5.6037, -0.1870);

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn requester() -> RequesterProfile {
        RequesterProfile {
            user_id: "me".into(),
            is_complete: true,
            age_bucket: Some(AgeBucket::Age25To34),
            gender: None,
            faith: None,
            origin: Origin {
                latitude: Some(ACCRA.0),
                longitude: Some(ACCRA.1),
                radius_km: 25,
            },
            preferred_age_buckets: vec![],
            faith_filter: FaithFilter::OpenToAll,
            faith_exclude: vec![],
            interests: set(&["Football"]),
            intents: set(&["Friendship"]),
        }
    }

    fn candidate(id: &str) -> CandidateProfile {
        CandidateProfile {
            user_id: id.into(),
            display_name: id.into(),
            bio: String::new(),
            pronouns: None,
            age_bucket: Some(AgeBucket::Age25To34),
            primary_language: "English".into(),
            faith: None,
            faith_visible: false,
            is_complete: true,
            visible: true,
            latitude: Some(5.6050),
            longitude: Some(-0.1880),
            interests: set(&["Football"]),
            intents: set(&["Friendship"]),
        }
    }

    fn criteria() -> UserCriteria {
        UserCriteria {
            origin: Some(ACCRA),
            radius_km: 25,
            intent: None,
            interest: None,
            faith_mode: FaithFilter::OpenToAll,
        }
    }

    fn none() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn nearby_matching_candidate_passes() {
        let d = check_user(&requester(), &candidate("c1"), &criteria(), &none()).unwrap();
        assert!(d < 1.0);
    }

    #[test]
    fn requester_never_matches_itself() {
        let me = requester();
        let mut same = candidate("me");
        same.user_id = me.user_id.clone();
        assert_eq!(
            check_user(&me, &same, &criteria(), &none()),
            Err(Exclusion::Requester)
        );
    }

    #[test]
    fn hidden_or_incomplete_candidates_are_dropped() {
        let mut c = candidate("c1");
        c.visible = false;
        assert_eq!(
            check_user(&requester(), &c, &criteria(), &none()),
            Err(Exclusion::NotDiscoverable)
        );
        let mut c = candidate("c1");
        c.is_complete = false;
        assert_eq!(
            check_user(&requester(), &c, &criteria(), &none()),
            Err(Exclusion::NotDiscoverable)
        );
    }

    #[test]
    fn shared_intent_is_required_when_requester_has_intents() {
        let mut c = candidate("c1");
        c.intents = set(&["Networking"]);
        assert_eq!(
            check_user(&requester(), &c, &criteria(), &none()),
            Err(Exclusion::IntentMismatch)
        );

        let mut me = requester();
        me.intents.clear();
        assert!(check_user(&me, &c, &criteria(), &none()).is_ok());
    }

    #[test]
    fn explicit_intent_replaces_the_overlap_rule() {
        let mut c = candidate("c1");
        c.intents = set(&["Networking"]);
        let mut crit = criteria();
        crit.intent = Some("Networking".into());
        assert!(check_user(&requester(), &c, &crit, &none()).is_ok());

        crit.intent = Some("Mentorship".into());
        assert_eq!(
            check_user(&requester(), &c, &crit, &none()),
            Err(Exclusion::IntentMismatch)
        );
    }

    #[test]
    fn interest_filter_requires_membership() {
        let mut crit = criteria();
        crit.interest = Some("Cooking".into());
        assert_eq!(
            check_user(&requester(), &candidate("c1"), &crit, &none()),
            Err(Exclusion::InterestMismatch)
        );
        crit.interest = Some("Football".into());
        assert!(check_user(&requester(), &candidate("c1"), &crit, &none()).is_ok());
    }

    #[test]
    fn preferred_age_buckets_restrict_candidates() {
        let mut me = requester();
        me.preferred_age_buckets = vec![AgeBucket::Age18To24];
        assert_eq!(
            check_user(&me, &candidate("c1"), &criteria(), &none()),
            Err(Exclusion::AgeBucketMismatch)
        );

        let mut c = candidate("c1");
        c.age_bucket = None;
        assert_eq!(
            check_user(&me, &c, &criteria(), &none()),
            Err(Exclusion::AgeBucketMismatch)
        );

        me.preferred_age_buckets.push(AgeBucket::Age25To34);
        assert!(check_user(&me, &candidate("c1"), &criteria(), &none()).is_ok());
    }

    #[test]
    fn same_faith_only_applies_when_requester_has_a_faith() {
        let mut crit = criteria();
        crit.faith_mode = FaithFilter::SameOnly;

        let mut c = candidate("c1");
        c.faith = Some(Faith::Muslim);
        assert!(check_user(&requester(), &c, &crit, &none()).is_ok());

        let mut me = requester();
        me.faith = Some(Faith::Christian);
        assert_eq!(
            check_user(&me, &c, &crit, &none()),
            Err(Exclusion::FaithMismatch)
        );
        c.faith = Some(Faith::Christian);
        assert!(check_user(&me, &c, &crit, &none()).is_ok());
    }

    #[test]
    fn custom_faith_mode_excludes_listed_faiths() {
        let mut crit = criteria();
        crit.faith_mode = FaithFilter::Custom;
        let mut me = requester();
        me.faith_exclude = vec![Faith::Traditional];

        let mut c = candidate("c1");
        c.faith = Some(Faith::Traditional);
        assert_eq!(
            check_user(&me, &c, &crit, &none()),
            Err(Exclusion::FaithMismatch)
        );
        c.faith = None;
        assert!(check_user(&me, &c, &crit, &none()).is_ok());
    }

    #[test]
    fn blocked_candidates_are_dropped() {
        let blocked: HashSet<String> = ["c1".to_string()].into_iter().collect();
        assert_eq!(
            check_user(&requester(), &candidate("c1"), &criteria(), &blocked),
            Err(Exclusion::Blocked)
        );
    }

    #[test]
    fn missing_coordinates_exclude_instead_of_erroring() {
        let mut c = candidate("c1");
        c.latitude = None;
        assert_eq!(
            check_user(&requester(), &c, &criteria(), &none()),
            Err(Exclusion::MissingCoordinates)
        );

        let mut crit = criteria();
        crit.origin = None;
        assert_eq!(
            check_user(&requester(), &candidate("c1"), &crit, &none()),
            Err(Exclusion::MissingCoordinates)
        );
    }

    #[test]
    fn radius_is_enforced() {
        let mut c = candidate("c1");
        // Kumasi, ~200 km from Accra
        c.latitude = Some(6.6885);
        c.longitude = Some(-1.6244);
        assert_eq!(
            check_user(&requester(), &c, &criteria(), &none()),
            Err(Exclusion::OutOfRange)
        );
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn activity(id: &str, host: &str, visibility: ActivityVisibility) -> ActivityFeedRow {
        ActivityFeedRow {
            activity_id: id.into(),
            host_user_id: host.into(),
            host_display_name: None,
            title: "Coffee".into(),
            description: String::new(),
            category_id: Some(1),
            category_name: Some("Coffee".into()),
            date: today(),
            time: None,
            duration_minutes: None,
            location_name: "Osu".into(),
            latitude: Some(5.5560),
            longitude: Some(-0.1820),
            max_participants: 4,
            confirmed_count: 0,
            status: ActivityStatus::Open,
            visibility,
        }
    }

    fn activity_criteria(scope: ActivityScope) -> ActivityCriteria {
        ActivityCriteria {
            origin: ACCRA,
            radius_km: 25,
            category_id: None,
            date_from: None,
            date_to: None,
            scope,
            today: today(),
            joined_activity_ids: HashSet::new(),
        }
    }

    #[test]
    fn connections_only_activity_needs_an_accepted_connection() {
        let mut graph = ConnectionSnapshot::new();
        let a = activity("a1", "host", ActivityVisibility::Connections);
        let crit = activity_criteria(ActivityScope::Discover);

        assert_eq!(
            check_activity("me", &a, &crit, &graph, &none()),
            Err(Exclusion::NotVisible)
        );
        graph.insert("host", "me", ConnectionStatus::Accepted);
        assert!(check_activity("me", &a, &crit, &graph, &none()).is_ok());
    }

    #[test]
    fn invite_only_activity_never_shows_in_discovery() {
        let mut graph = ConnectionSnapshot::new();
        graph.insert("me", "host", ConnectionStatus::Accepted);
        let a = activity("a1", "host", ActivityVisibility::Invite);
        assert_eq!(
            check_activity(
                "me",
                &a,
                &activity_criteria(ActivityScope::Discover),
                &graph,
                &none()
            ),
            Err(Exclusion::NotVisible)
        );
    }

    #[test]
    fn closed_or_past_activities_are_hidden_from_discovery() {
        let graph = ConnectionSnapshot::new();
        let crit = activity_criteria(ActivityScope::Discover);

        let mut a = activity("a1", "host", ActivityVisibility::Public);
        a.status = ActivityStatus::Full;
        assert_eq!(
            check_activity("me", &a, &crit, &graph, &none()),
            Err(Exclusion::NotOpen)
        );

        let mut a = activity("a1", "host", ActivityVisibility::Public);
        a.date = today().pred_opt().unwrap();
        assert_eq!(
            check_activity("me", &a, &crit, &graph, &none()),
            Err(Exclusion::InThePast)
        );
    }

    #[test]
    fn activity_without_coordinates_is_kept_without_distance() {
        let graph = ConnectionSnapshot::new();
        let mut a = activity("a1", "host", ActivityVisibility::Public);
        a.latitude = None;
        assert_eq!(
            check_activity(
                "me",
                &a,
                &activity_criteria(ActivityScope::Discover),
                &graph,
                &none()
            ),
            Ok(None)
        );
    }

    #[test]
    fn hosted_view_ignores_visibility_status_and_radius() {
        let graph = ConnectionSnapshot::new();
        let mut a = activity("a1", "me", ActivityVisibility::Invite);
        a.status = ActivityStatus::Cancelled;
        a.date = today().pred_opt().unwrap();
        a.latitude = Some(6.6885);
        a.longitude = Some(-1.6244);
        let d = check_activity(
            "me",
            &a,
            &activity_criteria(ActivityScope::HostedByMe),
            &graph,
            &none(),
        )
        .unwrap();
        assert!(d.unwrap() > 25.0);

        let other = activity("a2", "host", ActivityVisibility::Public);
        assert_eq!(
            check_activity(
                "me",
                &other,
                &activity_criteria(ActivityScope::HostedByMe),
                &graph,
                &none()
            ),
            Err(Exclusion::NotHostedByRequester)
        );
    }

    #[test]
    fn joined_view_uses_participation_records() {
        let graph = ConnectionSnapshot::new();
        let mut crit = activity_criteria(ActivityScope::JoinedByMe);
        let a = activity("a1", "host", ActivityVisibility::Invite);
        assert_eq!(
            check_activity("me", &a, &crit, &graph, &none()),
            Err(Exclusion::NotJoinedByRequester)
        );
        crit.joined_activity_ids.insert("a1".into());
        assert!(check_activity("me", &a, &crit, &graph, &none()).is_ok());
    }

    #[test]
    fn category_and_date_range_filters_apply() {
        let graph = ConnectionSnapshot::new();
        let a = activity("a1", "host", ActivityVisibility::Public);

        let mut crit = activity_criteria(ActivityScope::Discover);
        crit.category_id = Some(2);
        assert_eq!(
            check_activity("me", &a, &crit, &graph, &none()),
            Err(Exclusion::CategoryMismatch)
        );

        let mut crit = activity_criteria(ActivityScope::Discover);
        crit.date_from = today().succ_opt();
        assert_eq!(
            check_activity("me", &a, &crit, &graph, &none()),
            Err(Exclusion::OutsideDateRange)
        );

        let mut crit = activity_criteria(ActivityScope::Discover);
        crit.date_from = Some(today());
        crit.date_to = Some(today());
        assert!(check_activity("me", &a, &crit, &graph, &none()).is_ok());
    }

    #[test]
    fn activities_of_blocked_hosts_are_hidden() {
        let graph = ConnectionSnapshot::new();
        let blocked: HashSet<String> = ["host".to_string()].into_iter().collect();
        let a = activity("a1", "host", ActivityVisibility::Public);
        assert_eq!(
            check_activity(
                "me",
                &a,
                &activity_criteria(ActivityScope::Discover),
                &graph,
                &blocked
            ),
            Err(Exclusion::Blocked)
        );
    }
}
