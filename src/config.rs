//! Tuning for the particle field.
//!
//! [`FieldConfig`] carries every constant the simulator uses. The defaults
//! reproduce the classic landing-page look: a sparse cyan constellation with
//! faint lines between nearby points.
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_density(15_000)
//!     .with_link_mode(LinkMode::UniquePairs)
//!     .with_neighbor_search(NeighborSearch::Grid);
//! ```

use std::ops::Range;

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::links::LinkMode;
use crate::spatial::NeighborSearch;

/// Viewport area (in square pixels) per particle.
pub const DEFAULT_DENSITY: u32 = 20_000;

/// Maximum distance at which two particles are linked.
pub const DEFAULT_LINK_DISTANCE: f32 = 100.0;

/// Configuration of a [`ParticleField`](crate::ParticleField).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Viewport area per particle; `count = floor(w * h / density)`.
    pub density: u32,
    /// Radius range for spawned particles.
    pub size: Range<f32>,
    /// Each velocity component is drawn from `[-max_speed, max_speed)`.
    /// Units are pixels per frame.
    pub max_speed: f32,
    /// Alpha range for particle colours.
    pub alpha: Range<f32>,
    /// Hue shared by particles and links; its own alpha is ignored.
    pub hue: Rgba,
    /// Pairs closer than this are linked.
    pub link_distance: f32,
    /// How much link alpha drops from `d = 0` to `d = link_distance`.
    pub link_fade: f32,
    /// Stroke width of links in pixels.
    pub line_width: f32,
    pub link_mode: LinkMode,
    pub neighbor_search: NeighborSearch,
    /// Opacity of the whole layer when composited over the page.
    pub layer_opacity: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            size: 0.5..2.5,
            max_speed: 0.2,
            alpha: 0.1..0.4,
            hue: Rgba::CYAN,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_fade: 0.8,
            line_width: 0.2,
            link_mode: LinkMode::OrderedPairs,
            neighbor_search: NeighborSearch::BruteForce,
            layer_opacity: 0.5,
        }
    }
}

impl FieldConfig {
    /// Set the viewport area per particle.
    pub fn with_density(mut self, density: u32) -> Self {
        self.density = density;
        self
    }

    /// Set the particle radius range.
    pub fn with_size(mut self, size: Range<f32>) -> Self {
        self.size = size;
        self
    }

    /// Set the per-axis speed bound (pixels per frame).
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the particle alpha range.
    pub fn with_alpha(mut self, alpha: Range<f32>) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_hue(mut self, hue: Rgba) -> Self {
        self.hue = hue;
        self
    }

    /// Set the linking threshold.
    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    pub fn with_link_fade(mut self, fade: f32) -> Self {
        self.link_fade = fade;
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Choose between drawing every ordered pair or each pair once.
    pub fn with_link_mode(mut self, mode: LinkMode) -> Self {
        self.link_mode = mode;
        self
    }

    /// Choose how linked pairs are found.
    pub fn with_neighbor_search(mut self, search: NeighborSearch) -> Self {
        self.neighbor_search = search;
        self
    }

    /// Set the opacity of the composited layer.
    pub fn with_layer_opacity(mut self, opacity: f32) -> Self {
        self.layer_opacity = opacity;
        self
    }

    /// Check every value the simulator divides by, samples from, or blends with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.density == 0 {
            return Err(ConfigError::ZeroDensity);
        }
        check_range("size", &self.size)?;
        if self.size.start <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "size",
                value: self.size.start,
            });
        }
        check_range("alpha", &self.alpha)?;
        check_unit("alpha", self.alpha.start)?;
        check_unit("alpha", self.alpha.end)?;
        check_positive("max speed", self.max_speed)?;
        check_positive("link distance", self.link_distance)?;
        check_positive("line width", self.line_width)?;
        check_unit("link fade", self.link_fade)?;
        check_unit("layer opacity", self.layer_opacity)?;
        Ok(())
    }
}

pub(crate) fn check_range(name: &'static str, range: &Range<f32>) -> Result<(), ConfigError> {
    if range.start.is_finite() && range.end.is_finite() && range.start < range.end {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange {
            name,
            start: range.start,
            end: range.end,
        })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn check_unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FieldConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.density, 20_000);
        assert_eq!(config.link_distance, 100.0);
        assert_eq!(config.link_mode, LinkMode::OrderedPairs);
    }

    #[test]
    fn test_zero_density_rejected() {
        let config = FieldConfig::default().with_density(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroDensity));
    }

    #[test]
    fn test_empty_size_range_rejected() {
        let config = FieldConfig::default().with_size(2.0..2.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRange { name: "size", .. })
        ));
    }

    #[test]
    fn test_bad_link_distance_rejected() {
        let config = FieldConfig::default().with_link_distance(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "link distance",
                ..
            })
        ));
    }

    #[test]
    fn test_opacity_out_of_range_rejected() {
        let config = FieldConfig::default().with_layer_opacity(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange { .. })
        ));
    }

    #[test]
    fn test_builder_chains() {
        let config = FieldConfig::default()
            .with_density(10_000)
            .with_link_mode(LinkMode::UniquePairs)
            .with_neighbor_search(NeighborSearch::Grid)
            .with_line_width(0.5);
        assert_eq!(config.density, 10_000);
        assert_eq!(config.link_mode, LinkMode::UniquePairs);
        assert_eq!(config.neighbor_search, NeighborSearch::Grid);
        assert_eq!(config.line_width, 0.5);
    }
}
