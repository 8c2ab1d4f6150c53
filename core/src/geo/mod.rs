pub mod gis;
pub mod point;

pub use gis::{GisHelper, EARTH_RADIUS_KM};
pub use point::GeoPoint;
