//! Distances and travel times from the user's position to Denver's
//! recreation centers, with a single-slot local cache.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod location;
pub mod logging;
pub mod models;
pub mod service;
pub mod sites;

pub use error::DistanceError;
pub use service::DistanceService;
