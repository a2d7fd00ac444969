mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn preferences_round_trip_with_clamped_radius() {
    let pool = pool().await;
    UserFixture::new("ama", ACCRA).insert(&pool).await;
    let app = app(&pool);

    let (status, prefs) = get(&app, "/api/me/preferences", "ama").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["location"]["radius_km"], 25);
    assert_eq!(prefs["matching"]["faith_filter"], "open_to_all");
    assert_eq!(prefs["matching"]["visible"], true);

    let (status, prefs) = send(
        &app,
        Method::PUT,
        "/api/me/preferences",
        Some("ama"),
        Some(json!({
            "location": { "radius_km": 300, "city": "Accra" },
            "matching": { "faith_filter": "same", "preferred_age_buckets": ["25_34"] }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["location"]["radius_km"], 50);
    assert_eq!(prefs["location"]["city"], "Accra");
    assert_eq!(prefs["matching"]["faith_filter"], "same_only");
    assert_eq!(prefs["matching"]["preferred_age_buckets"], json!(["25_34"]));

    let (_, stored) = get(&app, "/api/me/preferences", "ama").await;
    assert_eq!(stored, prefs);
}

#[tokio::test]
async fn unknown_enum_values_are_rejected_at_the_boundary() {
    let pool = pool().await;
    UserFixture::new("ama", ACCRA).insert(&pool).await;

    let (status, _) = send(
        &app(&pool),
        Method::PUT,
        "/api/me/preferences",
        Some("ama"),
        Some(json!({ "matching": { "preferred_age_buckets": ["25-30"] } })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn completion_follows_name_age_and_intents() {
    let pool = pool().await;
    UserFixture::new("ama", ACCRA)
        .incomplete()
        .insert(&pool)
        .await;
    UserFixture::new("kofi", NEAR_ACCRA)
        .intents(&[])
        .insert(&pool)
        .await;
    let app = app(&pool);

    let (status, body) = send(&app, Method::POST, "/api/me/profile/completion", Some("ama"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_complete"], true);

    let (_, body) = send(&app, Method::POST, "/api/me/profile/completion", Some("kofi"), None).await;
    assert_eq!(body["is_complete"], false);

    // ama is now discoverable; kofi has dropped out
    let (status, page) = get(&app, "/api/discover", "ama").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 0);
}
