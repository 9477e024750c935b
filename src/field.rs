//! The particle field simulator.
//!
//! [`ParticleField`] owns a population of [`Particle`]s sized to the
//! viewport, moves them one step per frame, and draws them together with the
//! links between nearby pairs.
//!
//! ```ignore
//! let mut field = ParticleField::new(FieldConfig::default())?;
//! let mut canvas = Recorder::new();
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! field.seed(Viewport::new(1000, 1000), &mut canvas, &mut rng);
//! assert_eq!(field.particles().len(), 50);
//!
//! // Once per animation frame:
//! field.advance(&mut canvas);
//! ```

use glam::Vec2;

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::links::{self, link_alpha, Link};
use crate::particle::Particle;
use crate::random::RandomSource;
use crate::spatial::{NeighborSearch, SpatialGrid};

/// Viewport size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Area in square pixels, without overflow.
    #[inline]
    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    #[inline]
    pub fn extent(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// True when either side is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Number of particles for a viewport: `floor(width * height / density)`.
#[inline]
pub fn population_for(viewport: Viewport, density: u32) -> usize {
    if density == 0 {
        return 0;
    }
    (viewport.area() / density as u64) as usize
}

/// A seeded, animatable particle field.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    grid: SpatialGrid,
    frame: u64,
}

impl ParticleField {
    /// Create an empty field. Call [`seed`](Self::seed) before animating.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            viewport: Viewport::default(),
            particles: Vec::new(),
            grid: SpatialGrid::new(),
            frame: 0,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames advanced since the last seed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Size the surface to `viewport` and replace the whole population.
    ///
    /// A zero-sized viewport leaves the field empty; that is a valid state.
    pub fn seed<C, R>(&mut self, viewport: Viewport, canvas: &mut C, rng: &mut R)
    where
        C: Canvas + ?Sized,
        R: RandomSource + ?Sized,
    {
        canvas.resize(viewport.width, viewport.height);

        let count = population_for(viewport, self.config.density);
        let extent = viewport.extent();
        let config = &self.config;
        self.particles = (0..count).map(|_| Particle::spawn(&mut *rng, extent, config)).collect();
        self.viewport = viewport;
        self.frame = 0;

        log::debug!(
            "seeded {} particles for {}x{} viewport",
            count,
            viewport.width,
            viewport.height
        );
    }

    /// Move every particle one frame and bounce it off the viewport edges.
    pub fn step(&mut self) {
        let bounds = self.viewport.extent();
        for particle in &mut self.particles {
            particle.step(bounds);
        }
        self.frame += 1;
    }

    /// Run one full frame: clear, move, then draw each particle followed by
    /// the links that start at it, so later dots paint over earlier lines.
    pub fn advance<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        canvas.clear();
        self.step();

        let hue = self.config.hue;
        let width = self.config.line_width;
        let (max, fade) = (self.config.link_distance, self.config.link_fade);
        let particles = &self.particles;
        let mut drawn = 0;
        // Links arrive grouped by ascending `from`.
        visit_links(&self.config, self.viewport, particles, &mut self.grid, |link| {
            while drawn <= link.from {
                let p = &particles[drawn];
                canvas.fill_circle(p.position, p.size, p.color);
                drawn += 1;
            }
            if let Some(alpha) = link_alpha(link.distance, max, fade) {
                canvas.stroke_line(
                    particles[link.from].position,
                    particles[link.to].position,
                    hue.with_alpha(alpha),
                    width,
                );
            }
        });
        for p in &particles[drawn..] {
            canvas.fill_circle(p.position, p.size, p.color);
        }
    }

    /// The links the next draw would stroke for the current positions.
    pub fn links(&mut self) -> Vec<Link> {
        let mut out = Vec::new();
        visit_links(&self.config, self.viewport, &self.particles, &mut self.grid, |link| {
            out.push(link)
        });
        out
    }
}

fn visit_links<F>(
    config: &FieldConfig,
    viewport: Viewport,
    particles: &[Particle],
    grid: &mut SpatialGrid,
    visit: F,
) where
    F: FnMut(Link),
{
    let max = config.link_distance;
    match config.neighbor_search {
        NeighborSearch::BruteForce => links::brute_force(particles, max, config.link_mode, visit),
        NeighborSearch::Grid => {
            grid.rebuild(particles, viewport.extent(), max);
            grid.for_each_link(particles, max, config.link_mode, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, Recorder};
    use crate::links::LinkMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(config: FieldConfig, viewport: Viewport) -> (ParticleField, Recorder) {
        let mut field = ParticleField::new(config).unwrap();
        let mut canvas = Recorder::new();
        let mut rng = StdRng::seed_from_u64(42);
        field.seed(viewport, &mut canvas, &mut rng);
        (field, canvas)
    }

    #[test]
    fn test_population_formula() {
        assert_eq!(population_for(Viewport::new(1000, 1000), 20_000), 50);
        assert_eq!(population_for(Viewport::new(500, 500), 20_000), 12);
        assert_eq!(population_for(Viewport::new(1920, 1080), 20_000), 103);
        assert_eq!(population_for(Viewport::new(0, 1080), 20_000), 0);
        assert_eq!(population_for(Viewport::new(141, 141), 20_000), 0);
        assert_eq!(population_for(Viewport::new(1000, 1000), 0), 0);
    }

    #[test]
    fn test_large_viewport_does_not_overflow() {
        assert_eq!(
            population_for(Viewport::new(100_000, 100_000), 20_000),
            500_000
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ParticleField::new(FieldConfig::default().with_density(0)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDensity);
    }

    #[test]
    fn test_seed_sizes_canvas_and_population() {
        let (field, canvas) = seeded(FieldConfig::default(), Viewport::new(1000, 1000));
        assert_eq!(field.particles().len(), 50);
        assert_eq!(canvas.size(), (1000, 1000));
        assert_eq!(field.viewport(), Viewport::new(1000, 1000));
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let (mut field, mut canvas) = seeded(FieldConfig::default(), Viewport::new(0, 0));
        assert!(field.particles().is_empty());
        field.advance(&mut canvas);
        assert!(canvas.commands().is_empty());
        assert_eq!(canvas.clears(), 1);
    }

    #[test]
    fn test_advance_draws_each_circle_before_its_links() {
        let (mut field, mut canvas) = seeded(FieldConfig::default(), Viewport::new(400, 400));
        let n = field.particles().len();
        assert_eq!(n, 8);

        field.advance(&mut canvas);
        let particles = field.particles();
        let mut circles = 0;
        for command in canvas.commands() {
            match command {
                DrawCommand::Circle { center, .. } => {
                    assert_eq!(*center, particles[circles].position);
                    circles += 1;
                }
                DrawCommand::Line { from, .. } => {
                    // Every line starts at the most recently drawn dot.
                    assert!(circles > 0);
                    assert_eq!(*from, particles[circles - 1].position);
                }
            }
        }
        assert_eq!(circles, n);
        // Every particle is linked to itself at least.
        assert!(canvas.lines().count() >= n);
        assert_eq!(field.frame(), 1);
    }

    #[test]
    fn test_unlinked_particles_are_still_drawn_in_order() {
        let config = FieldConfig::default().with_link_mode(LinkMode::UniquePairs);
        let (mut field, mut canvas) = seeded(config, Viewport::new(1000, 1000));
        field.advance(&mut canvas);

        let centers: Vec<Vec2> = canvas.circles().map(|(center, _, _)| center).collect();
        let positions: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
        assert_eq!(centers, positions);
    }

    #[test]
    fn test_advance_moves_each_particle_once() {
        let (mut field, mut canvas) = seeded(FieldConfig::default(), Viewport::new(1000, 1000));
        let before: Vec<Particle> = field.particles().to_vec();
        field.advance(&mut canvas);

        for (old, new) in before.iter().zip(field.particles()) {
            assert!((new.position - (old.position + old.velocity)).length() < 1e-4);
            assert_eq!(new.size, old.size);
            assert_eq!(new.color, old.color);
            assert_eq!(new.velocity.abs(), old.velocity.abs());
        }
        for ((center, radius, color), p) in canvas.circles().zip(field.particles()) {
            assert_eq!(center, p.position);
            assert_eq!(radius, p.size);
            assert_eq!(color, p.color);
        }
    }

    #[test]
    fn test_reseed_replaces_population() {
        let (mut field, mut canvas) = seeded(FieldConfig::default(), Viewport::new(1000, 1000));
        field.advance(&mut canvas);
        let mut rng = StdRng::seed_from_u64(7);
        field.seed(Viewport::new(500, 500), &mut canvas, &mut rng);

        assert_eq!(field.particles().len(), 12);
        assert_eq!(field.frame(), 0);
        assert_eq!(canvas.size(), (500, 500));
        assert!(field
            .particles()
            .iter()
            .all(|p| p.position.x < 500.0 && p.position.y < 500.0));
    }

    #[test]
    fn test_grid_search_draws_same_links() {
        let viewport = Viewport::new(1600, 900);
        let (mut brute, _) = seeded(FieldConfig::default(), viewport);
        let (mut grid, _) = seeded(
            FieldConfig::default().with_neighbor_search(NeighborSearch::Grid),
            viewport,
        );
        assert_eq!(brute.particles(), grid.particles());

        let key = |l: &Link| (l.from, l.to);
        let mut a = brute.links();
        let mut b = grid.links();
        a.sort_by_key(key);
        b.sort_by_key(key);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unique_pairs_halve_distinct_links() {
        let viewport = Viewport::new(1200, 800);
        let (mut ordered, _) = seeded(FieldConfig::default(), viewport);
        let (mut unique, _) = seeded(
            FieldConfig::default().with_link_mode(LinkMode::UniquePairs),
            viewport,
        );

        let n = ordered.particles().len();
        let ordered_links = ordered.links().len();
        let unique_links = unique.links().len();
        assert_eq!(ordered_links, n + 2 * unique_links);
    }
}
