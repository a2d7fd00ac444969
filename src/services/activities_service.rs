use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DiscoverySettings;
use crate::database::{activities_repo, connection_repo, preferences_repo};
use crate::error::{AppError, AppResult, Precondition};
use crate::models::profile::clamp_radius;
use crate::models::{ActivityFeedRow, ActivityStatus, ActivityVisibility};
use crate::services::eligibility::{check_activity, ActivityCriteria, ActivityScope};
use crate::services::geo::{bounding_box, round_km};
use crate::services::pagination::{paginate, sort_by_date_then_distance, Page, PageRequest};
use crate::services::relationship_graph::{ConnectionSnapshot, RelationshipGraph};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ActivitiesQuery {
    pub radius_km: Option<i64>,
    pub category: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub hosted_by_me: Option<bool>,
    pub joined_by_me: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ActivitiesQuery {
    /// `hosted_by_me` wins when both views are requested.
    pub fn scope(&self) -> ActivityScope {
        if self.hosted_by_me.unwrap_or(false) {
            ActivityScope::HostedByMe
        } else if self.joined_by_me.unwrap_or(false) {
            ActivityScope::JoinedByMe
        } else {
            ActivityScope::Discover
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HostSummary {
    pub user_id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedActivity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub location_name: String,
    pub max_participants: i64,
    pub participant_count: i64,
    pub spots_available: i64,
    pub status: ActivityStatus,
    pub visibility: ActivityVisibility,
    pub host: HostSummary,
    pub distance_km: Option<f64>,
}

impl RankedActivity {
    fn new(row: ActivityFeedRow, distance_km: Option<f64>) -> Self {
        let participant_count = row.participant_count();
        let spots_available = row.spots_available();
        Self {
            id: row.activity_id,
            title: row.title,
            description: row.description,
            category_id: row.category_id,
            category_name: row.category_name,
            date: row.date,
            time: row.time,
            duration_minutes: row.duration_minutes,
            location_name: row.location_name,
            max_participants: row.max_participants,
            participant_count,
            spots_available,
            status: row.status,
            visibility: row.visibility,
            host: HostSummary {
                user_id: row.host_user_id,
                display_name: row.host_display_name,
            },
            distance_km: distance_km.map(round_km),
        }
    }
}

/// Filters and orders activities by date, then distance. Rows must arrive in
/// storage order so equal keys stay deterministic.
pub fn rank_activities(
    requester_id: &str,
    rows: Vec<ActivityFeedRow>,
    criteria: &ActivityCriteria,
    graph: &impl RelationshipGraph,
) -> Vec<(ActivityFeedRow, Option<f64>)> {
    let blocked = graph.blocked_counterparts(requester_id);

    let mut kept: Vec<(ActivityFeedRow, Option<f64>)> = rows
        .into_iter()
        .filter_map(
            |row| match check_activity(requester_id, &row, criteria, graph, &blocked) {
                Ok(distance) => Some((row, distance)),
                Err(reason) => {
                    debug!("activities: excluded {} ({:?})", row.activity_id, reason);
                    None
                }
            },
        )
        .collect();

    sort_by_date_then_distance(&mut kept, |(row, distance)| (row.date, *distance));
    kept
}

pub async fn discover_activities(
    pool: &SqlitePool,
    settings: &DiscoverySettings,
    requester_id: &str,
    query: &ActivitiesQuery,
    today: NaiveDate,
) -> AppResult<Page<RankedActivity>> {
    let location = preferences_repo::load_location(pool, requester_id).await?;
    let Some((origin, stored_radius)) = location.and_then(|l| {
        l.latitude
            .zip(l.longitude)
            .map(|coords| (coords, l.radius_km))
    }) else {
        return Err(Precondition::MissingLocation.into());
    };

    if let (Some(from), Some(to)) = (query.date_from, query.date_to) {
        if from > to {
            return Err(AppError::Input(format!(
                "date_from ({}) is after date_to ({})",
                from, to
            )));
        }
    }
    let page_request = PageRequest::from_query(query.page, query.page_size, settings)?;

    let scope = query.scope();
    let radius_km = clamp_radius(query.radius_km.unwrap_or(stored_radius));

    let (rows, joined_activity_ids) = match scope {
        ActivityScope::HostedByMe => (
            activities_repo::list_hosted_by(pool, requester_id).await?,
            HashSet::new(),
        ),
        ActivityScope::JoinedByMe => (
            activities_repo::list_joined_by(pool, requester_id).await?,
            activities_repo::list_active_participation_ids(pool, requester_id)
                .await?
                .into_iter()
                .collect(),
        ),
        ActivityScope::Discover => (
            activities_repo::list_discover(
                pool,
                today,
                bounding_box(origin.0, origin.1, radius_km as f64),
            )
            .await?,
            HashSet::new(),
        ),
    };
    let pool_size = rows.len();

    let graph =
        ConnectionSnapshot::from_rows(connection_repo::list_for_user(pool, requester_id).await?);

    let criteria = ActivityCriteria {
        origin,
        radius_km,
        category_id: query.category,
        date_from: query.date_from,
        date_to: query.date_to,
        scope,
        today,
        joined_activity_ids,
    };

    let ranked = rank_activities(requester_id, rows, &criteria, &graph);
    let eligible = ranked.len();
    let page = paginate(ranked, page_request).map(|(row, d)| RankedActivity::new(row, d));

    info!(
        "activities: requester={}, scope={:?}, radius={}km, pool={}, eligible={}, page={}/{}",
        requester_id, scope, radius_km, pool_size, eligible, page.page, page.page_size
    );

    Ok(page)
}
