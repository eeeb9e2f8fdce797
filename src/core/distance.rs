use crate::domain::model::{Coordinate, DistanceUnit};
use geo::{GeodesicDistance, Point};

/// Geodesic distance in meters on the WGS84 ellipsoid (Karney's method).
pub fn geodesic_meters(from: Coordinate, to: Coordinate) -> f64 {
    let a = Point::new(from.lng, from.lat);
    let b = Point::new(to.lng, to.lat);
    a.geodesic_distance(&b)
}

pub fn geodesic_distance(from: Coordinate, to: Coordinate, unit: DistanceUnit) -> f64 {
    unit.from_meters(geodesic_meters(from, to))
}

/// Distance in `unit` when `to` lies within `radius`, `None` otherwise.
pub fn within_radius(
    from: Coordinate,
    to: Coordinate,
    radius: f64,
    unit: DistanceUnit,
) -> Option<f64> {
    let distance = geodesic_distance(from, to, unit);
    (distance <= radius).then_some(distance)
}
