//! Procedural spiral galaxy generation.
//!
//! Each point is placed independently:
//!
//! - a radius drawn uniformly from `0..radius`,
//! - an arm chosen round-robin by point index,
//! - a twist proportional to the radius (`spin` radians per unit),
//! - per-axis jitter `u^randomness_pow * ±1 * randomness * radius`.
//!
//! The vertical coordinate is pure jitter, so the disk thickness comes only
//! from `randomness`. Colors blend from `inside_color` at the center to
//! `outside_color` at the rim.
//!
//! Randomness is injected, so a seeded RNG reproduces the same galaxy:
//!
//! ```
//! use galaxy::{generate, ParameterSet};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let params = ParameterSet { count: 1_000, ..Default::default() };
//! let a = generate(&params, &mut SmallRng::seed_from_u64(7));
//! let b = generate(&params, &mut SmallRng::seed_from_u64(7));
//! assert_eq!(a, b);
//! assert_eq!(a.positions.len(), 3_000);
//! ```

use std::f32::consts::TAU;

use rand::Rng;

use crate::params::ParameterSet;
use crate::point_cloud::PointCloud;

/// Generate `params.count` points.
pub fn generate<R: Rng + ?Sized>(params: &ParameterSet, rng: &mut R) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(params);
    let arms = params.arm_count();
    let jitter_scale = params.randomness * params.radius;

    for i in 0..params.count {
        let radius = rng.gen::<f32>() * params.radius;
        let branch_angle = (i % arms) as f32 / arms as f32 * TAU;
        let spin_angle = radius * params.spin;

        let jx = jitter(rng, params.randomness_pow, jitter_scale);
        let jy = jitter(rng, params.randomness_pow, jitter_scale);
        let jz = jitter(rng, params.randomness_pow, jitter_scale);

        let angle = branch_angle + spin_angle;
        let position = [angle.cos() * radius + jx, jy, angle.sin() * radius + jz];

        let color = params
            .inside_color
            .lerp(params.outside_color, radius_fraction(radius, params.radius));

        cloud.push(position, color.to_array());
    }

    cloud
}

/// One axis of jitter. The magnitude is drawn before the sign.
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, pow: f32, scale: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powf(pow);
    let sign = if rng.gen::<f32>() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign * scale
}

#[inline]
fn radius_fraction(r: f32, max: f32) -> f32 {
    if max > 0.0 {
        r / max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Every `gen::<f32>()` from this RNG yields exactly 0.5.
    fn half_rng() -> StepRng {
        StepRng::new(1 << 31, 0)
    }

    #[test]
    fn test_constant_rng_gives_half() {
        let mut rng = half_rng();
        assert_eq!(rng.gen::<f32>(), 0.5);
        assert_eq!(rng.gen::<f32>(), 0.5);
    }

    #[test]
    fn test_jitter_with_half_draws() {
        // 0.5 is not < 0.5, so the sign is negative.
        let mut rng = half_rng();
        let j = jitter(&mut rng, 1.0, 2.5);
        assert_eq!(j, -1.25);
    }

    #[test]
    fn test_exact_geometry_with_constant_draws() {
        let params = ParameterSet {
            count: 4,
            radius: 10.0,
            branches: 2,
            spin: 0.3,
            randomness: 0.25,
            randomness_pow: 1.0,
            ..Default::default()
        };
        let cloud = generate(&params, &mut half_rng());

        let r = 5.0_f32;
        let jitter = -0.5 * 0.25 * 10.0;
        for i in 0..4 {
            let branch = (i % 2) as f32 / 2.0 * TAU;
            let angle = branch + r * 0.3;
            let [x, y, z] = cloud.position(i);
            assert!((x - (angle.cos() * r + jitter)).abs() < 1e-5);
            assert_eq!(y, jitter);
            assert!((z - (angle.sin() * r + jitter)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let params = ParameterSet {
            count: 0,
            ..Default::default()
        };
        let cloud = generate(&params, &mut SmallRng::seed_from_u64(1));
        assert!(cloud.is_empty());
        assert!(cloud.colors.is_empty());
        assert_eq!(cloud.point_count(), 0);
    }

    #[test]
    fn test_zero_branches_behaves_like_one() {
        let one = ParameterSet {
            count: 50,
            branches: 1,
            ..Default::default()
        };
        let zero = ParameterSet {
            branches: 0,
            ..one.clone()
        };
        let a = generate(&one, &mut SmallRng::seed_from_u64(3));
        let b = generate(&zero, &mut SmallRng::seed_from_u64(3));
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn test_different_seeds_differ() {
        let params = ParameterSet {
            count: 100,
            ..Default::default()
        };
        let a = generate(&params, &mut SmallRng::seed_from_u64(1));
        let b = generate(&params, &mut SmallRng::seed_from_u64(2));
        assert_ne!(a.positions, b.positions);
    }

    #[test]
    fn test_cloud_keeps_parameter_snapshot() {
        let params = ParameterSet {
            count: 10,
            spin: -1.5,
            ..Default::default()
        };
        let cloud = generate(&params, &mut SmallRng::seed_from_u64(9));
        assert_eq!(cloud.params, params);
    }
}
