//! Mount, tick, resize and teardown.
//!
//! A [`Backdrop`] is what a host embeds: it owns the drawing surface, the
//! field, and the random source, and exposes one explicit [`tick`] per
//! animation frame. Hosts drive it from whatever frame source they have
//! (winit redraws, `requestAnimationFrame`, a loop in a test) and stop when
//! it reports [`Tick::Stopped`].
//!
//! # Lifecycle
//!
//! | Host event | Call | Effect |
//! |------------|------|--------|
//! | component mounted | [`Backdrop::mount`] | size surface, seed population |
//! | viewport resized | [`Backdrop::resize`] | re-seed synchronously |
//! | animation frame | [`Backdrop::tick`] | clear, move, draw |
//! | component removed | [`Backdrop::unmount`] | cancel, release surface |
//!
//! Teardown is synchronous: once `unmount` returns, no further draw call can
//! reach the surface, because the backdrop no longer holds it.
//!
//! [`tick`]: Backdrop::tick

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::field::{ParticleField, Viewport};
use crate::random::RandomSource;
use crate::sparks::{SparkConfig, SparkLayer};
use crate::time::FrameClock;

/// Shared cancellation flag for a mounted backdrop.
///
/// Clones observe the same flag, so a host can hand one to its frame
/// callback and trip it from its teardown path.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop all further ticks. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A frame was drawn; schedule the next one.
    Continue,
    /// The backdrop is unmounted or has no surface; do not reschedule.
    Stopped,
}

/// A particle field bound to a drawing surface and a frame loop.
pub struct Backdrop<C: Canvas, R: RandomSource> {
    field: ParticleField,
    sparks: Option<SparkLayer>,
    surface: Option<C>,
    rng: R,
    clock: FrameClock,
    token: CancelToken,
}

impl<C: Canvas, R: RandomSource> Backdrop<C, R> {
    /// Mount on `surface` and seed for `viewport`.
    ///
    /// `surface` is `None` when the host could not get a drawing context. The
    /// backdrop then stays inert: nothing is seeded and every tick returns
    /// [`Tick::Stopped`]. That is not an error; the page must keep working.
    pub fn mount(surface: Option<C>, viewport: Viewport, config: FieldConfig, rng: R) -> Result<Self, BackdropError> {
        let field = ParticleField::new(config)?;
        let mut backdrop = Self {
            field,
            sparks: None,
            surface,
            rng,
            clock: FrameClock::new(),
            token: CancelToken::new(),
        };

        if backdrop.surface.is_none() {
            log::warn!("no drawing surface available; particle backdrop disabled");
            return Ok(backdrop);
        }

        backdrop.reseed(viewport);
        log::info!(
            "mounted particle backdrop at {}x{} ({} particles)",
            viewport.width,
            viewport.height,
            backdrop.field.particles().len()
        );
        Ok(backdrop)
    }

    /// Add the rising spark layer, seeded from the backdrop's random source.
    pub fn with_sparks(mut self, config: SparkConfig) -> Result<Self, BackdropError> {
        self.sparks = Some(SparkLayer::seed(config, &mut self.rng)?);
        Ok(self)
    }

    /// Replace the frame clock, e.g. with [`FrameClock::fixed`] for headless runs.
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Re-seed for a new viewport. Ignored once unmounted or when inert.
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.is_active() {
            return;
        }
        log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
        self.reseed(viewport);
    }

    /// Run one animation frame.
    pub fn tick(&mut self) -> Tick {
        if self.token.is_cancelled() {
            return Tick::Stopped;
        }
        let Some(surface) = self.surface.as_mut() else {
            return Tick::Stopped;
        };

        let (elapsed, _) = self.clock.tick();
        self.field.advance(surface);
        if let Some(sparks) = &self.sparks {
            sparks.draw(surface, elapsed, self.field.viewport());
        }
        Tick::Continue
    }

    /// Cancel the frame loop and hand the surface back to the host.
    pub fn unmount(&mut self) -> Option<C> {
        self.token.cancel();
        let surface = self.surface.take();
        if surface.is_some() {
            log::info!("unmounted particle backdrop after {} frames", self.clock.frame());
        }
        surface
    }

    /// True while mounted on a surface and not cancelled.
    pub fn is_active(&self) -> bool {
        self.surface.is_some() && !self.token.is_cancelled()
    }

    /// A handle to this backdrop's cancellation flag.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn sparks(&self) -> Option<&SparkLayer> {
        self.sparks.as_ref()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn surface(&self) -> Option<&C> {
        self.surface.as_ref()
    }

    fn reseed(&mut self, viewport: Viewport) {
        if let Some(surface) = self.surface.as_mut() {
            self.field.seed(viewport, surface, &mut self.rng);
        }
    }
}

impl<C: Canvas, R: RandomSource> Drop for Backdrop<C, R> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Recorder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mounted(viewport: Viewport) -> Backdrop<Recorder, StdRng> {
        Backdrop::mount(
            Some(Recorder::new()),
            viewport,
            FieldConfig::default(),
            StdRng::seed_from_u64(1),
        )
        .unwrap()
    }

    #[test]
    fn test_mount_seeds() {
        let backdrop = mounted(Viewport::new(1000, 1000));
        assert!(backdrop.is_active());
        assert_eq!(backdrop.field().particles().len(), 50);
        assert_eq!(backdrop.surface().unwrap().size(), (1000, 1000));
    }

    #[test]
    fn test_resize_reseeds() {
        let mut backdrop = mounted(Viewport::new(1000, 1000));
        backdrop.tick();
        backdrop.resize(Viewport::new(500, 500));
        assert_eq!(backdrop.field().particles().len(), 12);
        assert_eq!(backdrop.surface().unwrap().size(), (500, 500));
    }

    #[test]
    fn test_tick_draws_until_unmounted() {
        let mut backdrop = mounted(Viewport::new(800, 600));
        assert_eq!(backdrop.tick(), Tick::Continue);
        let drawn = backdrop.surface().unwrap().draw_calls();
        assert!(drawn > 0);

        let surface = backdrop.unmount().unwrap();
        assert_eq!(surface.draw_calls(), drawn);
        assert!(!backdrop.is_active());
        assert_eq!(backdrop.tick(), Tick::Stopped);
        assert!(backdrop.unmount().is_none());
    }

    #[test]
    fn test_cancel_through_token() {
        let mut backdrop = mounted(Viewport::new(800, 600));
        let token = backdrop.token();
        token.cancel();
        assert_eq!(backdrop.tick(), Tick::Stopped);

        let before = backdrop.field().particles().to_vec();
        backdrop.resize(Viewport::new(100, 100));
        assert_eq!(backdrop.field().particles(), &before[..]);
    }

    #[test]
    fn test_inert_without_surface() {
        let mut backdrop: Backdrop<Recorder, StdRng> = Backdrop::mount(
            None,
            Viewport::new(1000, 1000),
            FieldConfig::default(),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert!(!backdrop.is_active());
        assert!(backdrop.field().particles().is_empty());
        assert_eq!(backdrop.tick(), Tick::Stopped);
        backdrop.resize(Viewport::new(500, 500));
        assert!(backdrop.field().particles().is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let result = Backdrop::mount(
            Some(Recorder::new()),
            Viewport::new(100, 100),
            FieldConfig::default().with_density(0),
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(BackdropError::Config(_))));
    }

    #[test]
    fn test_sparks_drawn_after_field() {
        let mut backdrop = mounted(Viewport::new(400, 400))
            .with_sparks(SparkConfig::default().with_delay(0.0..0.001))
            .unwrap()
            .with_clock(FrameClock::fixed(0.5));
        backdrop.tick();

        let surface = backdrop.surface().unwrap();
        let field_circles = backdrop.field().particles().len();
        let spark_circles = surface.circles().count() - field_circles;
        assert_eq!(spark_circles, 50);
    }

    #[test]
    fn test_drop_cancels_token() {
        let backdrop = mounted(Viewport::new(100, 100));
        let token = backdrop.token();
        drop(backdrop);
        assert!(token.is_cancelled());
    }
}
