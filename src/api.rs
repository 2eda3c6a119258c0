//! OSRM Table API client.
//!
//! One table request asks for the distance and duration from a single origin
//! (coordinate index 0) to every other coordinate under one routing profile.
//! See <http://project-osrm.org/docs/v5.24.0/api/#table-service>.

use crate::error::DistanceError;
use crate::geo::{format_duration, meters_to_miles};
use crate::models::{ModeDistance, TravelMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org/table/v1";

/// OSRM Table API response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TableResponse {
    /// `"Ok"` on success, otherwise an error code such as `"InvalidQuery"`.
    pub code: String,
    pub message: Option<String>,
    /// Meters; `distances[i][j]` is from coordinate `i` to `j`, `None` if unroutable.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
    /// Seconds, same layout as `distances`.
    pub durations: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Turns row 0 of the matrix into one [`ModeDistance`] per destination.
    ///
    /// The first column is the origin itself and is skipped. The result
    /// always has `destinations` entries; columns the service left out are
    /// treated as unroutable. A non-`"Ok"` code or a missing row fails the
    /// whole conversion.
    pub fn into_mode_distances(
        self,
        mode: TravelMode,
        destinations: usize,
    ) -> Result<Vec<ModeDistance>, DistanceError> {
        if !self.is_ok() {
            let message = match self.message {
                Some(m) => format!("OSRM returned error: {} ({})", self.code, m),
                None => format!("OSRM returned error: {}", self.code),
            };
            return Err(DistanceError::RemoteService { mode, message });
        }

        let missing = |what: &str| DistanceError::RemoteService {
            mode,
            message: format!("OSRM response missing {} row", what),
        };
        let distances = self
            .distances
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| missing("distances"))?;
        let durations = self
            .durations
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| missing("durations"))?;

        let entries = (1..=destinations)
            .map(|col| {
                let meters = distances.get(col).copied().flatten();
                let seconds = durations.get(col).copied().flatten();
                ModeDistance {
                    meters,
                    miles: meters.map(meters_to_miles),
                    seconds,
                    minutes: seconds.map(|s| (s / 60.0).round() as i64),
                    human_time: format_duration(seconds),
                }
            })
            .collect();
        Ok(entries)
    }
}

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Requests the origin row of a table for `coordinates`, given as
    /// `(longitude, latitude)` pairs with the origin first.
    async fn table(
        &self,
        mode: TravelMode,
        coordinates: &[(f64, f64)],
    ) -> Result<TableResponse, DistanceError>;
}

pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DistanceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DistanceError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `{base}/{profile}/{lng,lat;...}?sources=0&annotations=distance,duration`
    pub fn build_table_url(&self, mode: TravelMode, coordinates: &[(f64, f64)]) -> String {
        let coords = coordinates
            .iter()
            .map(|(lng, lat)| format!("{},{}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/{}?sources=0&annotations=distance,duration",
            self.base_url.trim_end_matches('/'),
            mode.profile(),
            coords
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    async fn table(
        &self,
        mode: TravelMode,
        coordinates: &[(f64, f64)],
    ) -> Result<TableResponse, DistanceError> {
        let url = self.build_table_url(mode, coordinates);
        let remote = |e: reqwest::Error| DistanceError::RemoteService {
            mode,
            message: e.to_string(),
        };

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(remote)?
            .error_for_status()
            .map_err(remote)?
            .json::<TableResponse>()
            .await
            .map_err(remote)?;

        Ok(res)
    }
}
