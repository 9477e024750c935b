//! # backdrop
//!
//! An ambient "particle field" background: a sparse population of small
//! translucent dots drifting slowly across a viewport, bouncing off its edges,
//! with faint lines joining every pair closer than a threshold.
//!
//! ## Quick Start
//!
//! ```ignore
//! use backdrop::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     backdrop::run(WindowOptions::default())
//! }
//! ```
//!
//! Headless, into a PNG:
//!
//! ```ignore
//! use backdrop::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let frame = render_headless(
//!     Viewport::new(1280, 720),
//!     120,
//!     FieldConfig::default(),
//!     Some(SparkConfig::default()),
//!     StdRng::seed_from_u64(7),
//! )?;
//! frame.save_png("field.png", Rgba::NAVY, 0.5)?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Field
//!
//! [`ParticleField`] holds `floor(width * height / density)` particles for the
//! current [`Viewport`]. Every frame each particle moves by its velocity and
//! reflects off the viewport edges; then each particle is drawn as a filled
//! circle followed by its link lines, whose alpha fades with distance.
//!
//! ### Surfaces
//!
//! The field draws through the [`Canvas`] trait. The crate ships a
//! [`Recorder`] (replayed by the GPU renderer), a CPU [`Framebuffer`], and,
//! with the `web` feature on wasm32, a `<canvas>` 2D context surface.
//!
//! ### Lifecycle
//!
//! [`Backdrop`] ties a field to a surface: mount seeds it, resize re-seeds
//! it, tick advances one frame, unmount cancels the loop and releases the
//! surface. See [`lifecycle`] for the event table.
//!
//! ## Link Modes
//!
//! | Mode | Pairs visited | Self-links |
//! |------|---------------|------------|
//! | [`LinkMode::OrderedPairs`] (default) | every `(i, j)` | yes, invisible |
//! | [`LinkMode::UniquePairs`] | `i < j` only | no |
//!
//! [`NeighborSearch::Grid`] finds the same links as the default brute-force
//! scan using a uniform grid with cells at least one link distance wide.

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod lifecycle;
pub mod links;
pub mod particle;
pub mod random;
pub mod raster;
pub mod spatial;
pub mod sparks;
pub mod time;
mod window;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub use canvas::{Canvas, DrawCommand, Recorder};
pub use color::Rgba;
pub use config::{FieldConfig, DEFAULT_DENSITY, DEFAULT_LINK_DISTANCE};
pub use error::{BackdropError, ConfigError, GpuError};
pub use field::{population_for, ParticleField, Viewport};
pub use glam::Vec2;
pub use gpu::GpuState;
pub use lifecycle::{Backdrop, CancelToken, Tick};
pub use links::{Link, LinkMode};
pub use particle::Particle;
pub use random::RandomSource;
pub use raster::{render_headless, Framebuffer};
pub use spatial::NeighborSearch;
pub use sparks::{SparkConfig, SparkLayer};
pub use time::FrameClock;
pub use window::{run, WindowOptions};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use backdrop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, Recorder};
    pub use crate::color::Rgba;
    pub use crate::config::FieldConfig;
    pub use crate::error::BackdropError;
    pub use crate::field::{ParticleField, Viewport};
    pub use crate::lifecycle::{Backdrop, Tick};
    pub use crate::links::LinkMode;
    pub use crate::raster::{render_headless, Framebuffer};
    pub use crate::spatial::NeighborSearch;
    pub use crate::sparks::SparkConfig;
    pub use crate::time::FrameClock;
    pub use crate::window::{run, WindowOptions};
    pub use crate::Vec2;
}
