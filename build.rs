use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // The schema is embedded with include_str!; cargo watches the directory recursively.
    println!("cargo:rerun-if-changed=migrations");
    println!("cargo:rerun-if-changed=build.rs");

    // Reported by /health, e.g. "0.1.0+1760870400".
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs().to_string(),
        Err(_) => "dev".to_string(),
    };
    println!("cargo:rustc-env=CIRCLES_BUILD_ID={}+{}", version, stamp);
}
