//! Rising sparks.
//!
//! A handful of tiny dots scattered over the viewport that each drift upward
//! while fading in and out, on a loop. Unlike the particle field they are
//! time-based (seconds, not frames) and placed in viewport fractions, so a
//! resize moves them but never re-rolls them.

use std::ops::Range;

use glam::Vec2;

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::config::{check_positive, check_range};
use crate::error::ConfigError;
use crate::field::Viewport;
use crate::random::RandomSource;

/// Tuning for a [`SparkLayer`].
#[derive(Debug, Clone, PartialEq)]
pub struct SparkConfig {
    pub count: usize,
    /// Loop length in seconds.
    pub duration: Range<f32>,
    /// Delay before a spark's first loop, in seconds.
    pub delay: Range<f32>,
    /// Vertical offset in pixels at the start and end of each loop.
    pub rise: (f32, f32),
    pub radius: f32,
    pub color: Rgba,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            count: 50,
            duration: 2.0..5.0,
            delay: 0.0..2.0,
            rise: (-20.0, -100.0),
            radius: 2.0,
            color: Rgba::CYAN_400,
        }
    }
}

impl SparkConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_duration(mut self, duration: Range<f32>) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay(mut self, delay: Range<f32>) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("spark duration", &self.duration)?;
        check_positive("spark duration", self.duration.start)?;
        check_range("spark delay", &self.delay)?;
        if self.delay.start < 0.0 {
            return Err(ConfigError::EmptyRange {
                name: "spark delay",
                start: self.delay.start,
                end: self.delay.end,
            });
        }
        check_positive("spark radius", self.radius)?;
        Ok(())
    }
}

/// One spark's fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    /// Horizontal placement as a fraction of the viewport width.
    pub left: f32,
    /// Vertical placement as a fraction of the viewport height.
    pub top: f32,
    pub delay: f32,
    pub duration: f32,
}

impl Spark {
    /// Loop phase in `[0, 1)` at `elapsed` seconds, or `None` before the
    /// first loop starts.
    pub fn phase(&self, elapsed: f32) -> Option<f32> {
        let local = elapsed - self.delay;
        if local < 0.0 {
            return None;
        }
        Some(local.rem_euclid(self.duration) / self.duration)
    }
}

/// Opacity over one loop: 0 at the ends, 1 halfway.
#[inline]
pub fn spark_opacity(phase: f32) -> f32 {
    (1.0 - (2.0 * phase - 1.0).abs()).clamp(0.0, 1.0)
}

/// A visible spark at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkSample {
    pub position: Vec2,
    pub alpha: f32,
}

/// The full set of sparks.
#[derive(Debug, Clone)]
pub struct SparkLayer {
    config: SparkConfig,
    sparks: Vec<Spark>,
}

impl SparkLayer {
    /// Roll `config.count` sparks.
    pub fn seed<R: RandomSource + ?Sized>(config: SparkConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let sparks = (0..config.count)
            .map(|_| Spark {
                left: rng.next_unit(),
                top: rng.next_unit(),
                delay: rng.uniform(config.delay.clone()),
                duration: rng.uniform(config.duration.clone()),
            })
            .collect();
        Ok(Self { config, sparks })
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn config(&self) -> &SparkConfig {
        &self.config
    }

    /// Visible sparks at `elapsed` seconds, placed in `viewport`.
    pub fn sample(&self, elapsed: f32, viewport: Viewport) -> impl Iterator<Item = SparkSample> + '_ {
        let extent = viewport.extent();
        let (from, to) = self.config.rise;
        self.sparks.iter().filter_map(move |spark| {
            let phase = spark.phase(elapsed)?;
            let alpha = spark_opacity(phase);
            if alpha <= 0.0 {
                return None;
            }
            let anchor = Vec2::new(spark.left, spark.top) * extent;
            let rise = from + (to - from) * phase;
            Some(SparkSample {
                position: anchor + Vec2::new(0.0, rise),
                alpha,
            })
        })
    }

    /// Draw the visible sparks on top of whatever the canvas holds.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, elapsed: f32, viewport: Viewport) {
        for sample in self.sample(elapsed, viewport) {
            canvas.fill_circle(
                sample.position,
                self.config.radius,
                self.config.color.with_alpha(sample.alpha),
            );
        }
    }
}
