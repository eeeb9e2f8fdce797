pub mod catalog;
pub mod distance;
pub mod finder;

pub use crate::domain::model::{Candidate, Coordinate, DistanceUnit, Match, SearchReport};
pub use crate::domain::ports::{Geocoder, PlaceSearch};
pub use crate::utils::error::Result;
