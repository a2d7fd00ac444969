use crate::models::{CandidateProfile, RequesterProfile};

pub const DISTANCE_WEIGHT: f64 = 30.0;
/// Normalisation constant for the distance term; independent of the search radius.
pub const DISTANCE_REFERENCE_KM: f64 = 50.0;
pub const SHARED_INTEREST_WEIGHT: f64 = 5.0;
pub const SHARED_INTENT_WEIGHT: f64 = 15.0;
pub const SAME_FAITH_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub distance: f64,
    pub interests: f64,
    pub intents: f64,
    pub faith: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.distance + self.interests + self.intents + self.faith
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compatibility {
    pub shared_interests: usize,
    pub shared_intents: usize,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
}

/// Weighted compatibility of a candidate at `distance_km` from the requester.
///
/// The distance term is `(50 - d) / 50 * 30` with no lower clamp. Radius is capped
/// at 50 km, so it stays non-negative for every candidate that reaches scoring.
pub fn score(
    requester: &RequesterProfile,
    candidate: &CandidateProfile,
    distance_km: f64,
) -> Compatibility {
    let shared_interests = requester
        .interests
        .intersection(&candidate.interests)
        .count();
    let shared_intents = requester.intents.intersection(&candidate.intents).count();

    let same_faith = requester.faith.is_some() && requester.faith == candidate.faith;

    let breakdown = ScoreBreakdown {
        distance: (DISTANCE_REFERENCE_KM - distance_km) / DISTANCE_REFERENCE_KM * DISTANCE_WEIGHT,
        interests: shared_interests as f64 * SHARED_INTEREST_WEIGHT,
        intents: shared_intents as f64 * SHARED_INTENT_WEIGHT,
        faith: if same_faith { SAME_FAITH_BONUS } else { 0.0 },
    };

    Compatibility {
        shared_interests,
        shared_intents,
        score: breakdown.total(),
        breakdown,
    }
}
