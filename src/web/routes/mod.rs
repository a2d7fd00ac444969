pub mod activities;
pub mod connections;
pub mod discovery;
pub mod health;
pub mod preferences;
