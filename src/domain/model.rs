use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parses a `"lat,lng"` literal. Returns `None` for anything that is not
    /// two in-range decimal numbers.
    pub fn parse_literal(input: &str) -> Option<Self> {
        static LITERAL: OnceLock<Regex> = OnceLock::new();
        let re = LITERAL.get_or_init(|| {
            Regex::new(r"^\s*([-+]?\d{1,3}(?:\.\d+)?)\s*,\s*([-+]?\d{1,3}(?:\.\d+)?)\s*$")
                .expect("coordinate literal pattern is valid")
        });

        let caps = re.captures(input)?;
        let lat: f64 = caps[1].parse().ok()?;
        let lng: f64 = caps[2].parse().ok()?;
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DistanceUnit {
    #[default]
    #[serde(alias = "mi")]
    #[cfg_attr(feature = "cli", value(alias = "mi"))]
    Miles,
    #[serde(alias = "km")]
    #[cfg_attr(feature = "cli", value(alias = "km"))]
    Kilometers,
}

pub const METERS_PER_MILE: f64 = 1609.344;
pub const METERS_PER_KILOMETER: f64 = 1000.0;

impl DistanceUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Miles => METERS_PER_MILE,
            DistanceUnit::Kilometers => METERS_PER_KILOMETER,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "miles",
            DistanceUnit::Kilometers => "km",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unfiltered place returned by a place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: Option<String>,
    pub location: Coordinate,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: f64,
    pub reviews: Option<u64>,
}

pub const ADDRESS_UNAVAILABLE: &str = "Address not available";

/// A candidate accepted for one catalog store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub store_name: String,
    pub deal: String,
    pub address: String,
    /// Distance from the origin in the search unit, rounded to two decimals.
    pub distance: f64,
    pub unit: DistanceUnit,
    pub rating: Option<Rating>,
    pub place_id: String,
}

impl Match {
    pub fn from_candidate(
        store_name: &str,
        deal: &str,
        candidate: Candidate,
        distance: f64,
        unit: DistanceUnit,
    ) -> Self {
        let rating = candidate.rating.map(|value| Rating {
            value,
            reviews: candidate.user_ratings_total,
        });

        Self {
            store_name: store_name.to_string(),
            deal: deal.to_string(),
            address: candidate
                .formatted_address
                .unwrap_or_else(|| ADDRESS_UNAVAILABLE.to_string()),
            distance: round_to_hundredths(distance),
            unit,
            rating,
            place_id: candidate.place_id.unwrap_or_default(),
        }
    }
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreFailure {
    pub store_name: String,
    pub reason: String,
}

/// Outcome of one search. Failures are carried as data so a partial result
/// is always explained.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchReport {
    pub origin: Option<Coordinate>,
    pub origin_error: Option<String>,
    pub matches: Vec<Match>,
    pub failures: Vec<StoreFailure>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn origin_failed(reason: String, elapsed: Duration) -> Self {
        Self {
            origin_error: Some(reason),
            elapsed,
            ..Self::default()
        }
    }

    pub fn store_names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.store_name.as_str()).collect()
    }
}
