use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::env;
use tracing_subscriber::EnvFilter;

use circles::database::{schema, tags_repo};

const INTENTS: &[(&str, &str)] = &[
    ("Friendship", "Looking to make new friends"),
    ("Networking", "Professional connections and career growth"),
    ("Skill Exchange", "Teach or learn skills from others"),
    ("Activity Partners", "Find people to do activities with"),
    ("Study Buddies", "Accountability partners for learning"),
    ("Mentorship", "Seek or offer mentorship"),
];

const INTERESTS: &[(&str, &str)] = &[
    ("Football", "Sports"),
    ("Basketball", "Sports"),
    ("Running", "Sports"),
    ("Gym & Fitness", "Sports"),
    ("Swimming", "Sports"),
    ("Tennis", "Sports"),
    ("Hiking", "Sports"),
    ("Software Development", "Tech"),
    ("Design", "Tech"),
    ("Data Science", "Tech"),
    ("Startups", "Tech"),
    ("Business", "Tech"),
    ("Marketing", "Tech"),
    ("Finance", "Tech"),
    ("Music", "Arts"),
    ("Photography", "Arts"),
    ("Writing", "Arts"),
    ("Film & Movies", "Arts"),
    ("Art & Painting", "Arts"),
    ("Fashion", "Arts"),
    ("Cooking", "Lifestyle"),
    ("Travel", "Lifestyle"),
    ("Reading", "Lifestyle"),
    ("Gaming", "Lifestyle"),
    ("Volunteering", "Lifestyle"),
    ("Coffee & Tea", "Lifestyle"),
    ("Languages", "Learning"),
    ("Personal Development", "Learning"),
    ("Public Speaking", "Learning"),
    ("Leadership", "Learning"),
    ("Board Games", "Social"),
    ("Nightlife", "Social"),
    ("Food & Dining", "Social"),
    ("Community Events", "Social"),
];

const CATEGORIES: &[(&str, &str)] = &[
    ("Coffee & Chat", "coffee"),
    ("Sports", "ball"),
    ("Study Session", "book"),
    ("Food & Dining", "utensils"),
    ("Outdoors", "tree"),
    ("Arts & Culture", "palette"),
    ("Games", "dice"),
    ("Networking", "briefcase"),
];

#[derive(Default)]
struct SeedReport {
    created: usize,
    existing: usize,
}

impl SeedReport {
    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

async fn seed(pool: &SqlitePool) -> sqlx::Result<(SeedReport, SeedReport, SeedReport)> {
    let mut intents = SeedReport::default();
    for (name, description) in INTENTS {
        intents.record(tags_repo::insert_intent_tag(pool, name, description).await?);
    }

    let mut interests = SeedReport::default();
    for (name, category) in INTERESTS {
        interests.record(tags_repo::insert_interest_tag(pool, name, category).await?);
    }

    let mut categories = SeedReport::default();
    for (name, icon) in CATEGORIES {
        categories.record(tags_repo::insert_activity_category(pool, name, icon).await?);
    }

    Ok((intents, interests, categories))
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("circles=info")),
        )
        .init();

    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match SqlitePoolOptions::new().connect(&db_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("cannot connect to {}: {}", db_url, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = schema::migrate(&pool).await {
        eprintln!("migration failed: {}", e);
        std::process::exit(1);
    }

    match seed(&pool).await {
        Ok((intents, interests, categories)) => {
            println!(
                "seed: intents created={} existing={}, interests created={} existing={}, categories created={} existing={}",
                intents.created,
                intents.existing,
                interests.created,
                interests.existing,
                categories.created,
                categories.existing
            );
        }
        Err(e) => {
            eprintln!("seed failed: {}", e);
            std::process::exit(1);
        }
    }
}
