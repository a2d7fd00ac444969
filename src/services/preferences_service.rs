use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::preferences_repo;
use crate::error::{AppError, AppResult};
use crate::models::preferences::{LocationPreferenceUpdate, MatchingPreferenceUpdate};
use crate::models::profile::clamp_radius;
use crate::models::{
    LocationPreferenceRow, MatchingPreferenceRow, PreferencesUpdate, PreferencesView,
};

pub async fn load_preferences(pool: &SqlitePool, user_id: &str) -> AppResult<PreferencesView> {
    preferences_repo::ensure_rows(pool, user_id).await?;
    let location = preferences_repo::load_location(pool, user_id).await?;
    let matching = preferences_repo::load_matching(pool, user_id).await?;
    match (location, matching) {
        (Some(location), Some(matching)) => Ok(PreferencesView { location, matching }),
        _ => Err(AppError::NotFound(format!("preferences for {}", user_id))),
    }
}

pub async fn update_preferences(
    pool: &SqlitePool,
    user_id: &str,
    update: PreferencesUpdate,
) -> AppResult<PreferencesView> {
    let mut current = load_preferences(pool, user_id).await?;

    if let Some(location) = update.location {
        apply_location(&mut current.location, location)?;
        preferences_repo::update_location(pool, user_id, &current.location).await?;
    }
    if let Some(matching) = update.matching {
        apply_matching(&mut current.matching, matching);
        preferences_repo::update_matching(pool, user_id, &current.matching).await?;
    }

    info!(
        "preferences: updated {} (radius={}km, visible={})",
        user_id, current.location.radius_km, current.matching.visible
    );
    Ok(current)
}

/// Merges a partial update. Coordinates must stay paired and in range; the
/// radius is clamped into the supported band.
pub fn apply_location(
    row: &mut LocationPreferenceRow,
    update: LocationPreferenceUpdate,
) -> AppResult<()> {
    if update.latitude.is_some() != update.longitude.is_some() {
        return Err(AppError::Input(
            "latitude and longitude must be set together".to_string(),
        ));
    }
    if let (Some(lat), Some(lon)) = (update.latitude, update.longitude) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::Input(format!(
                "coordinates out of range: {}, {}",
                lat, lon
            )));
        }
        row.latitude = Some(lat);
        row.longitude = Some(lon);
    }

    if let Some(city) = update.city {
        row.city = city.trim().to_string();
    }
    if let Some(country) = update.country {
        row.country = country.trim().to_string();
    }
    if let Some(radius) = update.radius_km {
        row.radius_km = clamp_radius(radius);
    }
    if let Some(precision) = update.share_precision {
        row.share_precision = precision;
    }
    Ok(())
}

pub fn apply_matching(row: &mut MatchingPreferenceRow, update: MatchingPreferenceUpdate) {
    if let Some(buckets) = update.preferred_age_buckets {
        row.preferred_age_buckets = Json(buckets);
    }
    if let Some(v) = update.available_mornings {
        row.available_mornings = v;
    }
    if let Some(v) = update.available_afternoons {
        row.available_afternoons = v;
    }
    if let Some(v) = update.available_evenings {
        row.available_evenings = v;
    }
    if let Some(v) = update.available_weekdays {
        row.available_weekdays = v;
    }
    if let Some(v) = update.available_weekends {
        row.available_weekends = v;
    }
    if let Some(filter) = update.faith_filter {
        row.faith_filter = filter;
    }
    if let Some(exclude) = update.faith_exclude {
        row.faith_exclude = Json(exclude);
    }
    if let Some(visible) = update.visible {
        row.visible = visible;
    }
}
