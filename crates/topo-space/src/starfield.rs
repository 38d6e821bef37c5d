//! Deterministic star placement in a spherical shell around the origin.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use topo_config::{StarfieldConfig, srgb_to_linear};

/// Hue and saturation shared by every star; only lightness varies.
const STAR_HUE: f32 = 0.6;
const STAR_SATURATION: f32 = 0.2;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// World-space position.
    pub position: Vec3,
    /// Linear RGB.
    pub color: [f32; 3],
}

/// Generates a deterministic star catalog from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    count: u32,
    min_radius: f32,
    shell_depth: f32,
}

impl StarfieldGenerator {
    /// Stars at distances in `[min_radius, min_radius + shell_depth)`.
    pub fn new(seed: u64, count: u32, min_radius: f32, shell_depth: f32) -> Self {
        Self {
            seed,
            count,
            min_radius,
            shell_depth: shell_depth.max(0.0),
        }
    }

    pub fn from_config(config: &StarfieldConfig) -> Self {
        Self::new(
            config.seed,
            config.count,
            config.min_radius,
            config.shell_depth,
        )
    }

    /// Generate the catalog. Directions are uniform on the sphere.
    pub fn generate(&self) -> Vec<Star> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut stars = Vec::with_capacity(self.count as usize);

        for _ in 0..self.count {
            let radius = self.min_radius + rng.random::<f32>() * self.shell_depth;
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();

            let direction = Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );

            let lightness = rng.random::<f32>();
            let srgb = hsl_to_rgb(STAR_HUE, STAR_SATURATION, lightness);

            stars.push(Star {
                position: direction * radius,
                color: srgb.map(srgb_to_linear),
            });
        }

        log::debug!("Generated {} stars (seed {})", stars.len(), self.seed);
        stars
    }
}

/// HSL with all components in \[0, 1\] to RGB in \[0, 1\].
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64, count: u32) -> StarfieldGenerator {
        StarfieldGenerator::new(seed, count, 100.0, 25.0)
    }

    #[test]
    fn test_star_count() {
        assert_eq!(generator(42, 3000).generate().len(), 3000);
        assert!(generator(42, 0).generate().is_empty());
    }

    #[test]
    fn test_stars_lie_in_shell() {
        for (i, star) in generator(42, 3000).generate().iter().enumerate() {
            let r = star.position.length();
            assert!(
                (100.0 - 1e-3..125.0 + 1e-3).contains(&r),
                "star {i} at distance {r}"
            );
        }
    }

    #[test]
    fn test_stars_clear_the_planet_and_far_plane() {
        // Planet radius 10 with camera at most a few radii out, far plane 500.
        let stars = StarfieldGenerator::from_config(&StarfieldConfig::default()).generate();
        assert!(stars.iter().all(|s| s.position.length() > 50.0));
        assert!(stars.iter().all(|s| s.position.length() < 250.0));
    }

    #[test]
    fn test_distribution_covers_full_sky() {
        let stars = generator(42, 8000).generate();
        let mut octant_counts = [0u32; 8];
        for star in &stars {
            let d = star.position;
            let octant = ((d.x >= 0.0) as usize)
                | (((d.y >= 0.0) as usize) << 1)
                | (((d.z >= 0.0) as usize) << 2);
            octant_counts[octant] += 1;
        }
        for (i, &count) in octant_counts.iter().enumerate() {
            assert!(
                (700..=1300).contains(&count),
                "octant {i} has {count} stars, expected about 1000"
            );
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        assert_eq!(generator(123, 500).generate(), generator(123, 500).generate());
    }

    #[test]
    fn test_different_seed_different_sky() {
        let a = generator(1, 1000).generate();
        let b = generator(9999, 1000).generate();
        let differing = a
            .iter()
            .zip(&b)
            .filter(|(a, b)| (a.position - b.position).length() > 0.5)
            .count();
        assert!(differing > 900, "only {differing}/1000 stars moved");
    }

    #[test]
    fn test_star_colors_are_bluish_grays() {
        for star in generator(7, 2000).generate() {
            let [r, g, b] = star.color;
            assert!((0.0..=1.0).contains(&r) && (0.0..=1.0).contains(&g));
            assert!((0.0..=1.0).contains(&b));
            assert!(b >= r - 1e-6, "star color {:?} is not bluish", star.color);
        }
    }

    #[test]
    fn test_hsl_known_values() {
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.5), [0.5, 0.5, 0.5]);
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6 && red[2].abs() < 1e-6);
        let black = hsl_to_rgb(0.6, 0.2, 0.0);
        assert_eq!(black, [0.0, 0.0, 0.0]);
        let white = hsl_to_rgb(0.6, 0.2, 1.0);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hsl_star_tint() {
        // hue 0.6 is a blue slightly towards cyan.
        let [r, g, b] = hsl_to_rgb(0.6, 0.2, 0.5);
        assert!((r - 0.4).abs() < 1e-5);
        assert!((g - 0.48).abs() < 1e-5);
        assert!((b - 0.6).abs() < 1e-5);
    }
}
