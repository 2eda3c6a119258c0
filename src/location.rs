//! User location resolution.
//!
//! [`LocationProvider`] is the seam the distance service asks for a fresh
//! position. Two providers ship with the crate: [`IpLocationProvider`], which
//! geolocates the machine's public IP address, and [`ManualLocationProvider`],
//! which always reports coordinates taken from `config.toml`.

use crate::error::DistanceError;
use crate::models::Position;
use async_trait::async_trait;
use ipgeolocate::{Locator, Service};
use reqwest::Client;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Echoes the caller's public IP address as plain text.
const PUBLIC_IP_URL: &str = "https://api.ipify.org";

/// IP geolocation resolves to roughly city level.
const IP_ACCURACY_METERS: f64 = 5000.0;

/// How a position should be acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationOptions {
    /// Ask the provider for its most precise fix.
    pub high_accuracy: bool,
    /// Upper bound on the whole lookup.
    pub timeout: Duration,
    /// A previously sensed position at most this old may be returned as-is.
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns the current position or [`DistanceError::LocationUnavailable`].
    async fn current_position(&self, options: &LocationOptions) -> Result<Position, DistanceError>;
}

/// Resolves the user's approximate location via IP geolocation.
///
/// Uses the [IpApi](https://ip-api.com/) service on the public address
/// reported by ipify. The last successful fix is kept and handed back while it
/// is younger than [`LocationOptions::maximum_age`].
pub struct IpLocationProvider {
    client: Client,
    last_fix: Mutex<Option<(Instant, Position)>>,
}

impl IpLocationProvider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            last_fix: Mutex::new(None),
        }
    }

    fn recent_fix(&self, maximum_age: Duration) -> Option<Position> {
        let guard = self.last_fix.lock().ok()?;
        match *guard {
            Some((at, position)) if at.elapsed() <= maximum_age => Some(position),
            _ => None,
        }
    }

    fn remember(&self, position: Position) {
        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = Some((Instant::now(), position));
        }
    }

    async fn public_ip(&self) -> Result<String, DistanceError> {
        let ip = self
            .client
            .get(PUBLIC_IP_URL)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| DistanceError::LocationUnavailable(format!("public IP lookup failed: {}", e)))?
            .text()
            .await
            .map_err(|e| DistanceError::LocationUnavailable(format!("public IP lookup failed: {}", e)))?;
        Ok(ip.trim().to_string())
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_position(&self, options: &LocationOptions) -> Result<Position, DistanceError> {
        if let Some(position) = self.recent_fix(options.maximum_age) {
            debug!("Reusing recent location fix ({}, {})", position.latitude, position.longitude);
            return Ok(position);
        }
        if options.high_accuracy {
            debug!("High accuracy requested; IP geolocation is city-level only");
        }

        let ip = self.public_ip().await?;
        let loc = Locator::get(&ip, Service::IpApi).await.map_err(|e| {
            error!("Error using geolocation service: {}", e);
            DistanceError::LocationUnavailable(e.to_string())
        })?;

        let latitude = loc
            .latitude
            .parse::<f64>()
            .map_err(|e| DistanceError::LocationUnavailable(format!("bad latitude {:?}: {}", loc.latitude, e)))?;
        let longitude = loc
            .longitude
            .parse::<f64>()
            .map_err(|e| DistanceError::LocationUnavailable(format!("bad longitude {:?}: {}", loc.longitude, e)))?;

        let position = Position {
            latitude,
            longitude,
            accuracy_meters: IP_ACCURACY_METERS,
        };
        info!("Geolocation successful - ({}, {})", latitude, longitude);
        self.remember(position);
        Ok(position)
    }
}

/// Always reports the same coordinates; used when automatic location is off.
#[derive(Debug, Clone, Copy)]
pub struct ManualLocationProvider {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
impl LocationProvider for ManualLocationProvider {
    async fn current_position(&self, _options: &LocationOptions) -> Result<Position, DistanceError> {
        Ok(Position {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy_meters: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LocationOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_manual_provider_reports_configured_point() {
        let provider = ManualLocationProvider {
            latitude: 39.7392,
            longitude: -104.9903,
        };
        let position = provider
            .current_position(&LocationOptions::default())
            .await
            .unwrap();
        assert_eq!(position.latitude, 39.7392);
        assert_eq!(position.longitude, -104.9903);
    }

    #[tokio::test]
    async fn test_ip_provider_reuses_recent_fix() {
        let provider = IpLocationProvider::new(Client::new());
        assert!(provider.recent_fix(Duration::from_secs(60)).is_none());

        let fix = Position {
            latitude: 39.75,
            longitude: -104.95,
            accuracy_meters: IP_ACCURACY_METERS,
        };
        provider.remember(fix);

        // No network call happens because the fix is fresh.
        let position = provider
            .current_position(&LocationOptions::default())
            .await
            .unwrap();
        assert_eq!(position, fix);
    }

    #[test]
    fn test_ip_provider_ignores_stale_fix() {
        let provider = IpLocationProvider::new(Client::new());
        provider.remember(Position {
            latitude: 39.75,
            longitude: -104.95,
            accuracy_meters: IP_ACCURACY_METERS,
        });
        std::thread::sleep(Duration::from_millis(5));
        assert!(provider.recent_fix(Duration::from_millis(1)).is_none());
    }
}
