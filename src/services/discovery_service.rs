use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DiscoverySettings;
use crate::database::{connection_repo, profile_repo};
use crate::error::{AppResult, Precondition};
use crate::models::profile::clamp_radius;
use crate::models::{
    CandidateProfile, ConnectionStatus, FaithFilter, PublicProfile, RequesterProfile,
};
use crate::services::eligibility::{check_user, UserCriteria};
use crate::services::geo::{bounding_box, round_km};
use crate::services::pagination::{paginate, sort_by_score_desc, Page, PageRequest};
use crate::services::relationship_graph::{ConnectionSnapshot, RelationshipGraph};
use crate::services::scoring::{score, Compatibility};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct DiscoveryQuery {
    pub radius_km: Option<i64>,
    pub intent: Option<String>,
    pub interest: Option<String>,
    pub faith: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One entry of the ranked people grid.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub distance_km: f64,
    pub mutual_interest_count: usize,
    pub connection_status: Option<ConnectionStatus>,
    pub is_connection_pending: bool,
}

/// A candidate that passed every filter, before projection.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: CandidateProfile,
    pub distance_km: f64,
    pub compatibility: Compatibility,
}

impl ScoredCandidate {
    fn into_ranked(self, requester_id: &str, graph: &impl RelationshipGraph) -> RankedCandidate {
        let status = graph.status_between(requester_id, &self.candidate.user_id);
        RankedCandidate {
            profile: PublicProfile::from(&self.candidate),
            distance_km: round_km(self.distance_km),
            mutual_interest_count: self.compatibility.shared_interests,
            connection_status: status,
            is_connection_pending: status == Some(ConnectionStatus::Pending),
        }
    }
}

/// Filters and orders candidates by descending score. Ties keep the input order,
/// so a deterministic candidate order gives a deterministic ranking.
pub fn rank_candidates(
    requester: &RequesterProfile,
    candidates: Vec<CandidateProfile>,
    criteria: &UserCriteria,
    graph: &impl RelationshipGraph,
) -> Vec<ScoredCandidate> {
    let blocked: HashSet<String> = graph.blocked_counterparts(&requester.user_id);

    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter_map(
            |candidate| match check_user(requester, &candidate, criteria, &blocked) {
                Ok(distance_km) => {
                    let compatibility = score(requester, &candidate, distance_km);
                    Some(ScoredCandidate {
                        candidate,
                        distance_km,
                        compatibility,
                    })
                }
                Err(reason) => {
                    debug!("discovery: excluded {} ({:?})", candidate.user_id, reason);
                    None
                }
            },
        )
        .collect();

    sort_by_score_desc(&mut scored, |s| s.compatibility.score);
    scored
}

/// Checks the requester can discover at all and returns their origin.
/// Completeness is checked before location.
pub fn ensure_ready(
    requester: Option<RequesterProfile>,
) -> Result<(RequesterProfile, (f64, f64)), Precondition> {
    let requester = requester.ok_or(Precondition::MissingProfile)?;
    if !requester.is_complete {
        return Err(Precondition::IncompleteProfile);
    }
    let origin = requester
        .origin
        .coordinates()
        .ok_or(Precondition::MissingLocation)?;
    Ok((requester, origin))
}

pub async fn discover_users(
    pool: &SqlitePool,
    settings: &DiscoverySettings,
    requester_id: &str,
    query: &DiscoveryQuery,
) -> AppResult<Page<RankedCandidate>> {
    let requester = profile_repo::load_requester(pool, requester_id)
        .await?
        .map(RequesterProfile::from);
    let (requester, origin) = ensure_ready(requester)?;

    let faith_mode = match query.faith.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse::<FaithFilter>()?,
        _ => requester.faith_filter,
    };
    let page_request = PageRequest::from_query(query.page, query.page_size, settings)?;

    let radius_km = query
        .radius_km
        .map(clamp_radius)
        .unwrap_or(requester.origin.radius_km);

    let criteria = UserCriteria {
        origin: Some(origin),
        radius_km,
        intent: non_empty(query.intent.as_deref()),
        interest: non_empty(query.interest.as_deref()),
        faith_mode,
    };

    let bbox = bounding_box(origin.0, origin.1, radius_km as f64);
    let rows = profile_repo::list_candidates(pool, requester_id, bbox).await?;
    let pool_size = rows.len();
    let candidates: Vec<CandidateProfile> = rows.into_iter().map(CandidateProfile::from).collect();

    let graph =
        ConnectionSnapshot::from_rows(connection_repo::list_for_user(pool, requester_id).await?);

    let ranked = rank_candidates(&requester, candidates, &criteria, &graph);
    let eligible = ranked.len();
    let page = paginate(ranked, page_request).map(|s| s.into_ranked(requester_id, &graph));

    info!(
        "discovery: requester={}, radius={}km, pool={}, eligible={}, page={}/{}",
        requester_id, radius_km, pool_size, eligible, page.page, page.page_size
    );

    Ok(page)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
