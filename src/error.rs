//! Error type shared by every layer of the distance service.

use crate::models::TravelMode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistanceError {
    /// The location provider is missing, denied access, failed, or timed out.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// A routing request for one travel mode failed.
    #[error("Routing service failed for {mode} distances: {message}")]
    RemoteService { mode: TravelMode, message: String },

    /// Reading, writing, or (de)serializing the cached report failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for DistanceError {
    fn from(e: rusqlite::Error) -> Self {
        DistanceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for DistanceError {
    fn from(e: serde_json::Error) -> Self {
        DistanceError::Storage(e.to_string())
    }
}
