pub mod activities_repo;
pub mod connection_repo;
pub mod preferences_repo;
pub mod profile_repo;
pub mod schema;
pub mod tags_repo;
