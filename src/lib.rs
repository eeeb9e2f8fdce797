pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::GoogleMapsClient;
pub use config::{FinderSettings, OutputFormat, SettingsFile};
pub use core::catalog::DealCatalog;
pub use core::finder::{DealFinder, ExecutionMode, MatchPolicy, SearchOptions};
pub use domain::model::{Candidate, Coordinate, DistanceUnit, Match, SearchReport, StoreFailure};
pub use domain::ports::{Geocoder, PlaceSearch};
pub use utils::error::{FinderError, Result};
