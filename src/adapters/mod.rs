// Adapters layer: concrete implementations of the domain ports.

pub mod google;

pub use google::GoogleMapsClient;
