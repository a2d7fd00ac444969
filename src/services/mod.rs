pub mod activities_service;
pub mod activity_join_service;
pub mod connection_service;
pub mod discovery_service;
pub mod eligibility;
pub mod geo;
pub mod pagination;
pub mod preferences_service;
pub mod profile_service;
pub mod relationship_graph;
pub mod scoring;
