use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed recreation center with known coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Site {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub address: &'static str,
}

/// A position reported by a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Biking,
    Walking,
}

impl TravelMode {
    /// Every mode, in the order reports are built.
    pub const ALL: [TravelMode; 3] = [TravelMode::Driving, TravelMode::Biking, TravelMode::Walking];

    /// Routing profile name understood by OSRM.
    pub fn profile(self) -> &'static str {
        match self {
            TravelMode::Driving => "car",
            TravelMode::Biking => "bike",
            TravelMode::Walking => "foot",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Biking => "biking",
            TravelMode::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routed distance and travel time from the origin to one site under one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeDistance {
    pub meters: Option<f64>,
    /// Miles rounded to one decimal, `None` iff `meters` is `None`.
    pub miles: Option<String>,
    pub seconds: Option<f64>,
    /// Rounded from `seconds`; `None` means the service returned no duration.
    /// A zero-second duration gives `Some(0)`.
    pub minutes: Option<i64>,
    pub human_time: String,
}

/// One row of a [`DistanceReport`]: the site itself plus everything computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub straight_line_miles: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving: Option<ModeDistance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biking: Option<ModeDistance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walking: Option<ModeDistance>,
}

impl SiteReport {
    /// Starts a row with only the static site fields and the straight-line distance.
    pub fn new(site: &Site, straight_line_miles: String) -> Self {
        Self {
            name: site.name.to_string(),
            address: site.address.to_string(),
            latitude: site.latitude,
            longitude: site.longitude,
            straight_line_miles,
            driving: None,
            biking: None,
            walking: None,
        }
    }

    pub fn mode(&self, mode: TravelMode) -> Option<&ModeDistance> {
        match mode {
            TravelMode::Driving => self.driving.as_ref(),
            TravelMode::Biking => self.biking.as_ref(),
            TravelMode::Walking => self.walking.as_ref(),
        }
    }

    pub fn set_mode(&mut self, mode: TravelMode, distance: ModeDistance) {
        let slot = match mode {
            TravelMode::Driving => &mut self.driving,
            TravelMode::Biking => &mut self.biking,
            TravelMode::Walking => &mut self.walking,
        };
        *slot = Some(distance);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub latitude: f64,
    pub longitude: f64,
}

/// Distances from one origin to every site, in fixed site order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    pub origin: Origin,
    /// Milliseconds since the Unix epoch when computation started.
    pub timestamp: i64,
    pub sites: Vec<SiteReport>,
}

/// Where the data in a [`DistanceResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Calculated,
    None,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::Cache => "cache",
            Source::Calculated => "calculated",
            Source::None => "none",
        };
        f.write_str(s)
    }
}

/// Outcome of [`DistanceService::get_distances`](crate::service::DistanceService::get_distances).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceResult {
    pub data: Option<DistanceReport>,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_distance() -> ModeDistance {
        ModeDistance {
            meters: Some(3218.68),
            miles: Some("2.0".to_string()),
            seconds: Some(420.0),
            minutes: Some(7),
            human_time: "7 mins".to_string(),
        }
    }

    #[test]
    fn test_mode_profiles() {
        assert_eq!(TravelMode::Driving.profile(), "car");
        assert_eq!(TravelMode::Biking.profile(), "bike");
        assert_eq!(TravelMode::Walking.profile(), "foot");
    }

    #[test]
    fn test_set_mode_only_touches_that_mode() {
        let site = Site {
            name: "Test",
            latitude: 39.7,
            longitude: -104.9,
            address: "1 Main St",
        };
        let mut row = SiteReport::new(&site, "1.2".to_string());
        row.set_mode(TravelMode::Biking, sample_distance());

        assert!(row.mode(TravelMode::Driving).is_none());
        assert_eq!(row.mode(TravelMode::Biking), Some(&sample_distance()));
        assert!(row.mode(TravelMode::Walking).is_none());
    }

    #[test]
    fn test_absent_modes_are_omitted_from_json() {
        let site = Site {
            name: "Test",
            latitude: 39.7,
            longitude: -104.9,
            address: "1 Main St",
        };
        let mut row = SiteReport::new(&site, "1.2".to_string());
        row.set_mode(TravelMode::Driving, sample_distance());

        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("driving").is_some());
        assert!(json.get("biking").is_none());
        assert!(json.get("walking").is_none());
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Calculated).unwrap(), "\"calculated\"");
        assert_eq!(serde_json::to_string(&Source::None).unwrap(), "\"none\"");
    }
}
