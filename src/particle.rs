//! The particle value type and its per-frame motion.

use glam::{BVec2, Vec2};

use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::random::RandomSource;

/// A single drifting point.
///
/// Only `position` and the signs of `velocity` change after spawning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Pixels per frame.
    pub velocity: Vec2,
    /// Radius in pixels.
    pub size: f32,
    pub color: Rgba,
}

impl Particle {
    /// Spawn a particle uniformly inside `[0, extent.x) x [0, extent.y)`.
    pub fn spawn<R: RandomSource + ?Sized>(rng: &mut R, extent: Vec2, config: &FieldConfig) -> Self {
        let size = rng.uniform(config.size.clone());
        let x = rng.uniform(0.0..extent.x);
        let y = rng.uniform(0.0..extent.y);
        let speed_x = rng.symmetric(config.max_speed);
        let speed_y = rng.symmetric(config.max_speed);
        let alpha = rng.uniform(config.alpha.clone());

        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::new(speed_x, speed_y),
            size,
            color: config.hue.with_alpha(alpha),
        }
    }

    /// Move by one frame of velocity, then bounce off the `[0, bounds]` box.
    ///
    /// The position is never clamped: a particle that crossed an edge keeps
    /// its overshoot and heads back on the next frame. Returns the axes whose
    /// velocity was inverted.
    #[inline]
    pub fn step(&mut self, bounds: Vec2) -> BVec2 {
        self.position += self.velocity;

        let outside = self.position.cmpgt(bounds) | self.position.cmplt(Vec2::ZERO);
        if outside.x {
            self.velocity.x = -self.velocity.x;
        }
        if outside.y {
            self.velocity.y = -self.velocity.y;
        }
        outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            size: 1.0,
            color: Rgba::CYAN.with_alpha(0.2),
        }
    }

    #[test]
    fn test_spawn_ranges() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let extent = Vec2::new(800.0, 600.0);

        for _ in 0..1_000 {
            let p = Particle::spawn(&mut rng, extent, &config);
            assert!((0.0..800.0).contains(&p.position.x));
            assert!((0.0..600.0).contains(&p.position.y));
            assert!((0.5..2.5).contains(&p.size));
            assert!((-0.2..0.2).contains(&p.velocity.x));
            assert!((-0.2..0.2).contains(&p.velocity.y));
            assert!((0.1..0.4).contains(&p.color.a));
            assert_eq!((p.color.r, p.color.g, p.color.b), (0, 229, 255));
        }
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut p = particle(10.0, 20.0, 0.1, -0.2);
        let flipped = p.step(Vec2::new(100.0, 100.0));
        assert!(!flipped.any());
        assert!((p.position - Vec2::new(10.1, 19.8)).length() < 1e-5);
    }

    #[test]
    fn test_bounce_inverts_without_clamping() {
        let mut p = particle(99.9, 50.0, 0.2, 0.0);
        let flipped = p.step(Vec2::new(100.0, 100.0));
        assert!(flipped.x);
        assert!(!flipped.y);
        assert!(p.position.x > 100.0);
        assert_eq!(p.velocity.x, -0.2);

        // Next frame it comes back inside and keeps its new direction.
        let flipped = p.step(Vec2::new(100.0, 100.0));
        assert!(!flipped.any());
        assert!(p.position.x < 100.0);
        assert_eq!(p.velocity.x, -0.2);
    }

    #[test]
    fn test_axes_bounce_independently() {
        let mut p = particle(0.05, 99.95, -0.1, 0.1);
        let flipped = p.step(Vec2::new(100.0, 100.0));
        assert!(flipped.all());
        assert_eq!(p.velocity, Vec2::new(0.1, -0.1));
    }

    #[test]
    fn test_sitting_on_edge_flips_once() {
        let mut p = particle(0.0, 50.0, -0.1, 0.0);
        assert!(p.step(Vec2::new(100.0, 100.0)).x);
        assert!(!p.step(Vec2::new(100.0, 100.0)).x);
        assert!(!p.step(Vec2::new(100.0, 100.0)).x);
        assert!(p.position.x > 0.0);
    }
}
