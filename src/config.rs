use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub dev_user_id: Option<String>,
    pub discovery: DiscoverySettings,
}

/// Knobs for the discovery pipelines. Scoring weights are not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverySettings {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = DiscoverySettings::default();
        let discovery = DiscoverySettings {
            default_page_size: parse_env_or(
                "DISCOVERY_DEFAULT_PAGE_SIZE",
                defaults.default_page_size,
            )
            .max(1),
            max_page_size: parse_env_or("DISCOVERY_MAX_PAGE_SIZE", defaults.max_page_size).max(1),
        };

        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env_or("PORT", 3000),
            dev_user_id: env::var("DEV_USER_ID")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            discovery,
        }
    }
}
