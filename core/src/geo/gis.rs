use super::point::GeoPoint;

/// Mean earth radius used for all great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Spherical-earth helpers for event/station geometry.
pub struct GisHelper;

impl GisHelper {
    /// Central angle between two points in radians (haversine form).
    fn central_angle(from: GeoPoint, to: GeoPoint) -> f64 {
        let phi1 = from.lat.to_radians();
        let phi2 = to.lat.to_radians();
        let d_phi = (to.lat - from.lat).to_radians();
        let d_lambda = (to.lon - from.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * a.sqrt().min(1.0).asin()
    }

    pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
        EARTH_RADIUS_KM * Self::central_angle(from, to)
    }

    pub fn angular_distance_deg(from: GeoPoint, to: GeoPoint) -> f64 {
        Self::central_angle(from, to).to_degrees()
    }

    /// Initial bearing from `from` towards `to`, in `[0, 360)` degrees.
    pub fn azimuth_deg(from: GeoPoint, to: GeoPoint) -> f64 {
        let phi1 = from.lat.to_radians();
        let phi2 = to.lat.to_radians();
        let d_lambda = (to.lon - from.lon).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if bearing >= 360.0 {
            0.0
        } else {
            bearing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn one_degree_of_longitude_on_equator_is_about_111_km() {
        let d = GisHelper::distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!(close(d, 111.19, 0.01), "distance {d}");
        let deg = GisHelper::angular_distance_deg(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!(close(deg, 1.0, 1e-9));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(37.97, 23.72);
        assert_eq!(GisHelper::distance_km(p, p), 0.0);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let d = GisHelper::distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!(close(d, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6));
    }

    #[test]
    fn azimuth_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!(close(GisHelper::azimuth_deg(origin, GeoPoint::new(1.0, 0.0)), 0.0, 1e-9));
        assert!(close(GisHelper::azimuth_deg(origin, GeoPoint::new(0.0, 1.0)), 90.0, 1e-9));
        assert!(close(GisHelper::azimuth_deg(origin, GeoPoint::new(-1.0, 0.0)), 180.0, 1e-9));
        assert!(close(GisHelper::azimuth_deg(origin, GeoPoint::new(0.0, -1.0)), 270.0, 1e-9));
    }

    #[test]
    fn azimuth_stays_in_range() {
        let from = GeoPoint::new(38.0, 23.0);
        for (lat, lon) in [(60.0, -120.0), (-45.0, 170.0), (38.0, 22.9), (89.0, 23.0)] {
            let az = GisHelper::azimuth_deg(from, GeoPoint::new(lat, lon));
            assert!((0.0..360.0).contains(&az), "azimuth {az}");
        }
    }
}
