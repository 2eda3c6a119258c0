//! Distance orchestration and the single-slot report cache.
//!
//! [`DistanceService::get_distances`] locates the user, reuses the cached
//! report while they stay within [`RECALCULATE_THRESHOLD_MILES`] of its
//! origin, and otherwise asks the routing service for driving, biking and
//! walking tables one after another before caching the new report.

use crate::api::{OsrmClient, RoutingProvider};
use crate::config::Config;
use crate::db::{KeyValueStore, SqliteStore};
use crate::error::DistanceError;
use crate::geo::{great_circle_miles, has_moved_significantly, one_decimal};
use crate::location::{
    IpLocationProvider, LocationOptions, LocationProvider, ManualLocationProvider,
};
use crate::models::{
    DistanceReport, DistanceResult, ModeDistance, Origin, Position, SiteReport, Source, TravelMode,
};
use crate::sites::SITES;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use crate::geo::RECALCULATE_THRESHOLD_MILES;

/// Storage key holding the serialized [`DistanceReport`].
pub const CACHE_KEY: &str = "rec_distance_cache";

/// Pause between routing requests so the shared OSRM server isn't hit in a burst.
pub const MODE_REQUEST_PAUSE: Duration = Duration::from_millis(500);

/// Progress sink: a status line and a completion percentage in `0..=100`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(&str, f64);

pub struct DistanceService {
    locator: Box<dyn LocationProvider>,
    router: Box<dyn RoutingProvider>,
    store: Box<dyn KeyValueStore>,
}

impl DistanceService {
    pub fn new(
        locator: impl LocationProvider + 'static,
        router: impl RoutingProvider + 'static,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        Self {
            locator: Box::new(locator),
            router: Box::new(router),
            store: Box::new(store),
        }
    }

    /// Wires up the IP (or manual) locator, OSRM client and SQLite cache from `config`.
    pub fn from_config(config: &Config) -> Result<Self, DistanceError> {
        let timeout = Duration::from_secs(config.routing.request_timeout_seconds);
        let router = OsrmClient::new(config.routing.base_url.clone(), timeout)?;
        let store = match SqliteStore::open(&config.cache.db_path) {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    "Could not open cache at {}: {}. Caching in memory for this run.",
                    config.cache.db_path, e
                );
                SqliteStore::open_in_memory()?
            }
        };

        let service = if config.location.auto_locate {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| DistanceError::Config(format!("failed to build HTTP client: {}", e)))?;
            Self::new(IpLocationProvider::new(client), router, store)
        } else {
            let locator = ManualLocationProvider {
                latitude: config.location.manual_lat,
                longitude: config.location.manual_lon,
            };
            Self::new(locator, router, store)
        };
        Ok(service)
    }

    /// Asks the locator for a position, bounded by the default ten second timeout.
    pub async fn get_current_location(&self) -> Result<Position, DistanceError> {
        let options = LocationOptions::default();
        match tokio::time::timeout(options.timeout, self.locator.current_position(&options)).await {
            Ok(result) => result,
            Err(_) => Err(DistanceError::LocationUnavailable(format!(
                "timed out after {}s",
                options.timeout.as_secs()
            ))),
        }
    }

    /// Routed distance and time from the origin to every site under `mode`.
    ///
    /// On success the result has one entry per site in [`SITES`] order. Any
    /// failure covers the whole mode; no site is partially populated.
    pub async fn fetch_mode_distances(
        &self,
        origin_lat: f64,
        origin_lng: f64,
        mode: TravelMode,
    ) -> Result<Vec<ModeDistance>, DistanceError> {
        let coordinates: Vec<(f64, f64)> = std::iter::once((origin_lng, origin_lat))
            .chain(SITES.iter().map(|site| (site.longitude, site.latitude)))
            .collect();

        self.router
            .table(mode, &coordinates)
            .await?
            .into_mode_distances(mode, SITES.len())
    }

    /// Computes a fresh report for the given origin.
    ///
    /// Modes are requested in order with [`MODE_REQUEST_PAUSE`] between them.
    /// A failed mode is logged and left absent on every row.
    pub async fn build_full_report(
        &self,
        origin_lat: f64,
        origin_lng: f64,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> DistanceReport {
        let mut report = DistanceReport {
            origin: Origin {
                latitude: origin_lat,
                longitude: origin_lng,
            },
            timestamp: chrono::Utc::now().timestamp_millis(),
            sites: SITES
                .iter()
                .map(|site| {
                    let miles = great_circle_miles(origin_lat, origin_lng, site.latitude, site.longitude);
                    SiteReport::new(site, one_decimal(miles))
                })
                .collect(),
        };

        let mode_count = TravelMode::ALL.len();
        for (i, mode) in TravelMode::ALL.into_iter().enumerate() {
            if let Some(progress) = on_progress.as_deref_mut() {
                let percent = (i + 1) as f64 / mode_count as f64 * 100.0;
                progress(&format!("Calculating {} distances...", mode), percent);
            }

            match self.fetch_mode_distances(origin_lat, origin_lng, mode).await {
                Ok(entries) => {
                    for (row, entry) in report.sites.iter_mut().zip(entries) {
                        row.set_mode(mode, entry);
                    }
                }
                Err(e) => warn!("OSRM {} calculation failed: {}", mode, e),
            }

            if i < mode_count - 1 {
                tokio::time::sleep(MODE_REQUEST_PAUSE).await;
            }
        }

        report
    }

    /// Returns distances for the current location, from cache when possible.
    ///
    /// Never fails: location, routing and storage errors all fold into the
    /// returned [`DistanceResult`].
    pub async fn get_distances(
        &self,
        mut on_progress: Option<ProgressFn<'_>>,
        force_refresh: bool,
    ) -> DistanceResult {
        let mut progress = |message: &str, percent: f64| {
            if let Some(callback) = on_progress.as_deref_mut() {
                callback(message, percent);
            }
        };

        progress("Getting your location...", 0.0);
        let user_location = match self.get_current_location().await {
            Ok(position) => position,
            Err(e) => {
                warn!("Could not get location: {}", e);
                return match self.cached_report() {
                    Some(cached) => DistanceResult {
                        data: Some(cached),
                        source: Source::Cache,
                        user_location: None,
                        error: Some("Location unavailable, using cached data".to_string()),
                    },
                    None => DistanceResult {
                        data: None,
                        source: Source::None,
                        user_location: None,
                        error: Some("Location unavailable and no cached data".to_string()),
                    },
                };
            }
        };

        if !force_refresh {
            if let Some(cached) = self.cached_report() {
                if !has_moved_significantly(&user_location, &cached.origin) {
                    info!(
                        "Using cached distances (within {} miles of cached location)",
                        RECALCULATE_THRESHOLD_MILES
                    );
                    return DistanceResult {
                        data: Some(cached),
                        source: Source::Cache,
                        user_location: Some(user_location),
                        error: None,
                    };
                }
                info!("User moved significantly, recalculating distances");
            }
        }

        progress("Calculating distances to rec centers...", 10.0);
        let report = self
            .build_full_report(
                user_location.latitude,
                user_location.longitude,
                Some(&mut progress),
            )
            .await;

        if let Err(e) = self.store_report(&report) {
            warn!("Could not cache distance data: {}", e);
        }

        progress("Done!", 100.0);
        DistanceResult {
            data: Some(report),
            source: Source::Calculated,
            user_location: Some(user_location),
            error: None,
        }
    }

    /// The cached report, or `None` if there is none or it can't be read.
    pub fn cached_report(&self) -> Option<DistanceReport> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read cached distance data: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Discarding unreadable cached distance data: {}", e);
                None
            }
        }
    }

    /// Replaces the cached report.
    pub fn store_report(&self, report: &DistanceReport) -> Result<(), DistanceError> {
        let json = serde_json::to_string(report)?;
        self.store.set(CACHE_KEY, &json)?;
        debug!("Cached report with {} sites", report.sites.len());
        Ok(())
    }

    pub fn clear_cache(&self) {
        match self.store.remove(CACHE_KEY) {
            Ok(()) => info!("Distance cache cleared"),
            Err(e) => warn!("Could not clear distance cache: {}", e),
        }
    }
}
