#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use circles::config::{AppConfig, DiscoverySettings};
use circles::database::schema;
use circles::web::{self, AppState};

pub const ACCRA: (f64, f64) = (5.6037, -0.1870);
pub const NEAR_ACCRA: (f64, f64) = (5.6050, -0.1880);
pub const KUMASI: (f64, f64) = (6.6885, -1.6244);

pub async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    schema::migrate(&pool).await.unwrap();

    for name in ["Friendship", "Networking", "Mentorship"] {
        sqlx::query("INSERT INTO intent_tags (name) VALUES (?1)")
            .bind(name)
            .execute(&pool)
            .await
            .unwrap();
    }
    for name in ["Football", "Music", "Cooking"] {
        sqlx::query("INSERT INTO interest_tags (name) VALUES (?1)")
            .bind(name)
            .execute(&pool)
            .await
            .unwrap();
    }
    sqlx::query("INSERT INTO activity_categories (id, name) VALUES (1, 'Coffee'), (2, 'Sports')")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

pub fn app(pool: &SqlitePool) -> Router {
    let config = AppConfig {
        database_url: None,
        host: "127.0.0.1".to_string(),
        port: 0,
        dev_user_id: None,
        discovery: DiscoverySettings::default(),
    };
    web::router(AppState::new(pool.clone(), config))
}

pub struct UserFixture<'a> {
    pub id: &'a str,
    pub location: Option<(f64, f64)>,
    pub interests: &'a [&'a str],
    pub intents: &'a [&'a str],
    pub complete: bool,
    pub age_bucket: &'a str,
}

impl<'a> UserFixture<'a> {
    pub fn new(id: &'a str, location: (f64, f64)) -> Self {
        Self {
            id,
            location: Some(location),
            interests: &[],
            intents: &["Friendship"],
            complete: true,
            age_bucket: "25_34",
        }
    }

    pub fn interests(mut self, interests: &'a [&'a str]) -> Self {
        self.interests = interests;
        self
    }

    pub fn intents(mut self, intents: &'a [&'a str]) -> Self {
        self.intents = intents;
        self
    }

    pub fn incomplete(mut self) -> Self {
        self.complete = false;
        self
    }

    pub fn without_location(mut self) -> Self {
        self.location = None;
        self
    }

    pub async fn insert(self, pool: &SqlitePool) {
        sqlx::query("INSERT INTO users (user_id, email) VALUES (?1, ?2)")
            .bind(self.id)
            .bind(format!("{}@example.com", self.id))
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO profiles (user_id, display_name, age_bucket, is_complete) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(self.id)
        .bind(self.id.to_uppercase())
        .bind(self.age_bucket)
        .bind(self.complete)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO location_preferences (user_id, latitude, longitude) VALUES (?1, ?2, ?3)")
            .bind(self.id)
            .bind(self.location.map(|l| l.0))
            .bind(self.location.map(|l| l.1))
            .execute(pool)
            .await
            .unwrap();
        for name in self.interests {
            sqlx::query(
                "INSERT INTO profile_interests (user_id, interest_id) SELECT ?1, id FROM interest_tags WHERE name = ?2",
            )
            .bind(self.id)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
        }
        for name in self.intents {
            sqlx::query(
                "INSERT INTO profile_intents (user_id, intent_id) SELECT ?1, id FROM intent_tags WHERE name = ?2",
            )
            .bind(self.id)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
        }
    }
}

/// Bulk-inserts `count` complete, visible users named `<prefix>0001..` at one spot,
/// each with a single intent.
pub async fn crowd_users(
    pool: &SqlitePool,
    prefix: &str,
    count: i64,
    location: (f64, f64),
    intent: &str,
) {
    sqlx::query(
        r#"WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?1)
        INSERT INTO users (user_id, email)
        SELECT printf('%s%04d', ?2, n), printf('%s%04d@example.com', ?2, n) FROM seq"#,
    )
    .bind(count)
    .bind(prefix)
    .execute(pool)
    .await
    .unwrap();

    let mine = "substr(user_id, 1, length(?1)) = ?1";
    sqlx::query(&format!(
        "INSERT INTO profiles (user_id, display_name, age_bucket, is_complete) \
         SELECT user_id, upper(user_id), '25_34', 1 FROM users WHERE {}",
        mine
    ))
    .bind(prefix)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(&format!(
        "INSERT INTO location_preferences (user_id, latitude, longitude) \
         SELECT user_id, ?2, ?3 FROM users WHERE {}",
        mine
    ))
    .bind(prefix)
    .bind(location.0)
    .bind(location.1)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(&format!(
        "INSERT INTO profile_intents (user_id, intent_id) \
         SELECT users.user_id, t.id FROM users JOIN intent_tags t ON t.name = ?2 WHERE {}",
        mine.replace("user_id", "users.user_id")
    ))
    .bind(prefix)
    .bind(intent)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn connect(pool: &SqlitePool, from: &str, to: &str, status: &str) {
    let (a, b) = if from <= to { (from, to) } else { (to, from) };
    sqlx::query(
        "INSERT INTO connections (id, pair_key, from_user_id, to_user_id, status) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(format!("{}-{}", from, to))
    .bind(format!("{}:{}", a, b))
    .bind(from)
    .bind(to)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

pub fn token(user_id: &str) -> String {
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{}"}}"#, user_id));
    format!("eyJhbGciOiJIUzI1NiJ9.{}.signature", payload)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user_id)));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, user_id: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(user_id), None).await
}

pub fn ids(page: &Value) -> Vec<String> {
    page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}
