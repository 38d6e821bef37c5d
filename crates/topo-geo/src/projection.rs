//! Equirectangular projection between coordinates and texture space.

use std::f64::consts::{PI, TAU};

use crate::GeoCoordinate;

/// Normalized texture coordinate. `u` runs west to east, `v` north to south.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

impl Uv {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Both components finite and inside \[0, 1\].
    pub fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.u) && (0.0..=1.0).contains(&self.v)
    }
}

/// Equirectangular UV of a coordinate: `u = lon / 2π + 0.5`, `v = 0.5 - lat / π`.
///
/// Longitude ±π lands on the seam columns `u = 0` and `u = 1`, so elevation
/// images must be shifted horizontally so their seam sits at 180°.
pub fn project(coord: GeoCoordinate) -> Uv {
    Uv {
        u: coord.longitude / TAU + 0.5,
        v: 0.5 - coord.latitude / PI,
    }
}

/// Inverse of [`project`].
pub fn uv_to_coordinate(uv: Uv) -> GeoCoordinate {
    GeoCoordinate::new((0.5 - uv.v) * PI, (uv.u - 0.5) * TAU)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use glam::DVec3;

    use super::*;
    use crate::point_to_coordinate;

    #[test]
    fn test_uv_in_range_for_valid_coordinates() {
        for i in 0..=36 {
            for j in 0..=18 {
                let lon = -PI + i as f64 * (TAU / 36.0);
                let lat = -FRAC_PI_2 + j as f64 * (PI / 18.0);
                let uv = project(GeoCoordinate::new(lat, lon));
                assert!(uv.in_range(), "({lat}, {lon}) projected to {uv:?}");
            }
        }
    }

    #[test]
    fn test_landmarks() {
        assert_eq!(project(GeoCoordinate::new(0.0, 0.0)), Uv::new(0.5, 0.5));
        assert_eq!(project(GeoCoordinate::new(FRAC_PI_2, 0.0)).v, 0.0);
        assert_eq!(project(GeoCoordinate::new(-FRAC_PI_2, 0.0)).v, 1.0);
        assert_eq!(project(GeoCoordinate::new(0.0, PI)).u, 1.0);
        assert_eq!(project(GeoCoordinate::new(0.0, -PI)).u, 0.0);
    }

    #[test]
    fn test_positive_x_is_three_quarters() {
        let uv = project(point_to_coordinate(DVec3::X));
        assert!((uv.u - 0.75).abs() < 1e-12);
        assert!((uv.v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_projection() {
        let coord = GeoCoordinate::from_degrees(33.0, -71.0);
        let back = uv_to_coordinate(project(coord));
        assert!((back.latitude - coord.latitude).abs() < 1e-12);
        assert!((back.longitude - coord.longitude).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_detected() {
        assert!(!Uv::new(-0.01, 0.5).in_range());
        assert!(!Uv::new(0.5, f64::NAN).in_range());
        assert!(Uv::new(1.0, 0.0).in_range());
    }
}
