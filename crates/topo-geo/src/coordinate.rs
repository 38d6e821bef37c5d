//! Latitude/longitude on a sphere.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::DVec3;

/// A direction on a sphere as latitude and longitude in radians.
///
/// Latitude is in \[-π/2, π/2\] (positive north), longitude in (-π, π\]
/// (positive towards +X). Values are computed per vertex and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build from degrees.
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self::new(latitude_deg.to_radians(), longitude_deg.to_radians())
    }

    /// `(latitude, longitude)` in degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (self.latitude.to_degrees(), self.longitude.to_degrees())
    }

    /// Whether both angles are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-FRAC_PI_2..=FRAC_PI_2).contains(&self.latitude)
            && self.longitude > -PI
            && self.longitude <= PI
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lat, lon) = self.to_degrees();
        let lat_dir = if lat >= 0.0 { "N" } else { "S" };
        let lon_dir = if lon >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.2}\u{00B0}{}, {:.2}\u{00B0}{}",
            lat.abs(),
            lat_dir,
            lon.abs(),
            lon_dir
        )
    }
}

/// Latitude and longitude of a unit-length direction.
///
/// The caller normalizes; the vector is not renormalized here. `y` is clamped
/// into \[-1, 1\] so rounding on a normalized vector cannot produce NaN.
/// At the poles longitude is whatever `atan2(x, z)` gives (0 for `x = z = 0`).
pub fn point_to_coordinate(unit: DVec3) -> GeoCoordinate {
    let latitude = unit.y.clamp(-1.0, 1.0).asin();
    let mut longitude = unit.x.atan2(unit.z);
    // atan2(-0.0, negative) is -π; fold onto the closed end of the range.
    if longitude == -PI {
        longitude = PI;
    }
    GeoCoordinate {
        latitude,
        longitude,
    }
}

/// Point at `radius` from the origin in the direction of `coord`.
pub fn coordinate_to_point(coord: GeoCoordinate, radius: f64) -> DVec3 {
    let (sin_lat, cos_lat) = coord.latitude.sin_cos();
    let (sin_lon, cos_lon) = coord.longitude.sin_cos();
    DVec3::new(
        radius * cos_lat * sin_lon,
        radius * sin_lat,
        radius * cos_lat * cos_lon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn sample_directions() -> Vec<DVec3> {
        let mut dirs = Vec::new();
        for i in 0..24 {
            for j in 1..12 {
                let lon = -PI + (i as f64 + 0.5) * (PI / 12.0);
                let lat = -FRAC_PI_2 + j as f64 * (PI / 12.0);
                dirs.push(DVec3::new(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos()));
            }
        }
        dirs.push(DVec3::new(1.0, 2.0, 3.0).normalize());
        dirs.push(DVec3::new(-0.3, -0.9, 0.1).normalize());
        dirs
    }

    #[test]
    fn test_round_trip_reconstructs_direction() {
        for v in sample_directions() {
            let back = coordinate_to_point(point_to_coordinate(v), 1.0);
            assert!(
                (back - v).length() < EPS,
                "round trip of {v:?} gave {back:?}"
            );
        }
    }

    #[test]
    fn test_poles_are_exact() {
        let north = point_to_coordinate(DVec3::Y);
        assert_eq!(north.latitude, FRAC_PI_2);
        assert_eq!(north.longitude, 0.0);
        assert_eq!(coordinate_to_point(north, 1.0).y, 1.0);

        let south = point_to_coordinate(DVec3::NEG_Y);
        assert_eq!(south.latitude, -FRAC_PI_2);
        assert_eq!(coordinate_to_point(south, 1.0).y, -1.0);
    }

    #[test]
    fn test_pole_y_independent_of_longitude() {
        for lon in [-3.0, -1.0, 0.0, 0.5, 2.9] {
            let p = coordinate_to_point(GeoCoordinate::new(FRAC_PI_2, lon), 1.0);
            assert_eq!(p.y, 1.0);
            assert!(p.x.abs() < 1e-12 && p.z.abs() < 1e-12);
        }
    }

    #[test]
    fn test_axis_convention() {
        let front = point_to_coordinate(DVec3::Z);
        assert_eq!((front.latitude, front.longitude), (0.0, 0.0));

        let east = point_to_coordinate(DVec3::X);
        assert!((east.longitude - FRAC_PI_2).abs() < EPS);

        let west = point_to_coordinate(DVec3::NEG_X);
        assert!((west.longitude + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_back_of_sphere_longitude_is_pi() {
        let back = point_to_coordinate(DVec3::new(-0.0, 0.0, -1.0));
        assert_eq!(back.longitude, PI);
        let back = point_to_coordinate(DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(back.longitude, PI);
        assert!(back.is_valid());
    }

    #[test]
    fn test_rounding_above_one_does_not_produce_nan() {
        let coord = point_to_coordinate(DVec3::new(0.0, 1.0 + 1e-15, 0.0));
        assert_eq!(coord.latitude, FRAC_PI_2);
    }

    #[test]
    fn test_radius_scales_point() {
        let coord = GeoCoordinate::from_degrees(30.0, 45.0);
        let p = coordinate_to_point(coord, 10.0);
        assert!((p.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_degrees_round_trip() {
        let coord = GeoCoordinate::from_degrees(-12.5, 170.0);
        let (lat, lon) = coord.to_degrees();
        assert!((lat + 12.5).abs() < 1e-9);
        assert!((lon - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let s = GeoCoordinate::from_degrees(10.0, -20.0).to_string();
        assert_eq!(s, "10.00\u{00B0}N, 20.00\u{00B0}W");
    }
}
