use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::models::profile::{AgeBucket, Faith, FaithFilter, SharePrecision};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LocationPreferenceRow {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: String,
    pub country: String,
    pub radius_km: i64,
    pub share_precision: SharePrecision,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MatchingPreferenceRow {
    pub preferred_age_buckets: Json<Vec<AgeBucket>>,
    pub available_mornings: bool,
    pub available_afternoons: bool,
    pub available_evenings: bool,
    pub available_weekdays: bool,
    pub available_weekends: bool,
    pub faith_filter: FaithFilter,
    pub faith_exclude: Json<Vec<Faith>>,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferencesView {
    pub location: LocationPreferenceRow,
    pub matching: MatchingPreferenceRow,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPreferenceUpdate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub radius_km: Option<i64>,
    pub share_precision: Option<SharePrecision>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingPreferenceUpdate {
    pub preferred_age_buckets: Option<Vec<AgeBucket>>,
    pub available_mornings: Option<bool>,
    pub available_afternoons: Option<bool>,
    pub available_evenings: Option<bool>,
    pub available_weekdays: Option<bool>,
    pub available_weekends: Option<bool>,
    pub faith_filter: Option<FaithFilter>,
    pub faith_exclude: Option<Vec<Faith>>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub location: Option<LocationPreferenceUpdate>,
    pub matching: Option<MatchingPreferenceUpdate>,
}
