use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::AppError;

pub const MIN_RADIUS_KM: i64 = 5;
pub const MAX_RADIUS_KM: i64 = 50;
pub const DEFAULT_RADIUS_KM: i64 = 25;

/// Radius is always stored and used within [5, 50] km.
pub fn clamp_radius(radius_km: i64) -> i64 {
    radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum AgeBucket {
    #[serde(rename = "18_24")]
    #[sqlx(rename = "18_24")]
    Age18To24,
    #[serde(rename = "25_34")]
    #[sqlx(rename = "25_34")]
    Age25To34,
    #[serde(rename = "35_44")]
    #[sqlx(rename = "35_44")]
    Age35To44,
    #[serde(rename = "45_54")]
    #[sqlx(rename = "45_54")]
    Age45To54,
    #[serde(rename = "55_plus")]
    #[sqlx(rename = "55_plus")]
    Age55Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Faith {
    Christian,
    Muslim,
    Traditional,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Pronouns {
    HeHim,
    SheHer,
    TheyThem,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SharePrecision {
    CityOnly,
    Approx,
    Nearby,
}

/// How a requester's faith constrains who they see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum FaithFilter {
    #[serde(alias = "same")]
    SameOnly,
    #[default]
    #[serde(alias = "all")]
    OpenToAll,
    Custom,
}

impl FaithFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            FaithFilter::SameOnly => "same_only",
            FaithFilter::OpenToAll => "open_to_all",
            FaithFilter::Custom => "custom",
        }
    }
}

impl FromStr for FaithFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "same_only" | "same" => Ok(FaithFilter::SameOnly),
            "open_to_all" | "all" => Ok(FaithFilter::OpenToAll),
            "custom" => Ok(FaithFilter::Custom),
            other => Err(AppError::Input(format!("unknown faith filter '{}'", other))),
        }
    }
}

/// Search anchor: where the requester is and how far they look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: i64,
}

impl Origin {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

// Requester row: profile joined with its (possibly missing) preference rows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequesterProfileRow {
    pub user_id: String,
    pub is_complete: bool,
    pub age_bucket: Option<AgeBucket>,
    pub gender: Option<Gender>,
    pub faith: Option<Faith>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: i64,
    pub preferred_age_buckets: Json<Vec<AgeBucket>>,
    pub faith_filter: FaithFilter,
    pub faith_exclude: Json<Vec<Faith>>,
    pub interests: Json<Vec<String>>,
    pub intents: Json<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequesterProfile {
    pub user_id: String,
    pub is_complete: bool,
    pub age_bucket: Option<AgeBucket>,
    pub gender: Option<Gender>,
    pub faith: Option<Faith>,
    pub origin: Origin,
    pub preferred_age_buckets: Vec<AgeBucket>,
    pub faith_filter: FaithFilter,
    pub faith_exclude: Vec<Faith>,
    pub interests: BTreeSet<String>,
    pub intents: BTreeSet<String>,
}

impl From<RequesterProfileRow> for RequesterProfile {
    fn from(row: RequesterProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            is_complete: row.is_complete,
            age_bucket: row.age_bucket,
            gender: row.gender,
            faith: row.faith,
            origin: Origin {
                latitude: row.latitude,
                longitude: row.longitude,
                radius_km: clamp_radius(row.radius_km),
            },
            preferred_age_buckets: row.preferred_age_buckets.0,
            faith_filter: row.faith_filter,
            faith_exclude: row.faith_exclude.0,
            interests: row.interests.0.into_iter().collect(),
            intents: row.intents.0.into_iter().collect(),
        }
    }
}

// Candidate row for the discovery grid.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CandidateProfileRow {
    pub user_id: String,
    pub display_name: String,
    pub bio: String,
    pub pronouns: Option<Pronouns>,
    pub age_bucket: Option<AgeBucket>,
    pub primary_language: String,
    pub faith: Option<Faith>,
    pub faith_visible: bool,
    pub is_complete: bool,
    pub visible: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interests: Json<Vec<String>>,
    pub intents: Json<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub user_id: String,
    pub display_name: String,
    pub bio: String,
    pub pronouns: Option<Pronouns>,
    pub age_bucket: Option<AgeBucket>,
    pub primary_language: String,
    pub faith: Option<Faith>,
    pub faith_visible: bool,
    pub is_complete: bool,
    pub visible: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interests: BTreeSet<String>,
    pub intents: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl From<CandidateProfileRow> for CandidateProfile {
    fn from(row: CandidateProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            display_name: row.display_name,
            bio: row.bio,
            pronouns: row.pronouns,
            age_bucket: row.age_bucket,
            primary_language: row.primary_language,
            faith: row.faith,
            faith_visible: row.faith_visible,
            is_complete: row.is_complete,
            visible: row.visible,
            latitude: row.latitude,
            longitude: row.longitude,
            interests: row.interests.0.into_iter().collect(),
            intents: row.intents.0.into_iter().collect(),
        }
    }
}

/// What other users may see of a profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicProfile {
    pub id: String,
    pub display_name: String,
    pub bio: String,
    pub pronouns: Option<Pronouns>,
    pub age_bucket: Option<AgeBucket>,
    pub primary_language: String,
    pub faith: Option<Faith>,
    pub interests: Vec<String>,
    pub intents: Vec<String>,
}

impl From<&CandidateProfile> for PublicProfile {
    fn from(c: &CandidateProfile) -> Self {
        Self {
            id: c.user_id.clone(),
            display_name: c.display_name.clone(),
            bio: c.bio.clone(),
            pronouns: c.pronouns,
            age_bucket: c.age_bucket,
            primary_language: c.primary_language.clone(),
            faith: if c.faith_visible { c.faith } else { None },
            interests: c.interests.iter().cloned().collect(),
            intents: c.intents.iter().cloned().collect(),
        }
    }
}
