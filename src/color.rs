//! Colour values shared by every canvas backend.

use std::fmt;

/// An sRGB colour with 8-bit channels and a real-valued alpha in `[0, 1]`.
///
/// This mirrors CSS `rgba(r, g, b, a)` so the browser canvas can consume it
/// verbatim, while the GPU and software backends read normalised floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// The particle and link hue, `rgb(0, 229, 255)`.
    pub const CYAN: Rgba = Rgba::rgb(0, 229, 255);

    /// Tailwind `cyan-400`, used by the rising sparks.
    pub const CYAN_400: Rgba = Rgba::rgb(34, 211, 238);

    /// Page background behind the field (`#0A192F`).
    pub const NAVY: Rgba = Rgba::rgb(10, 25, 47);

    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Opaque colour from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same hue with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Normalised `[r, g, b, a]`, still in sRGB space.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }

    /// CSS colour string, e.g. `rgba(0, 229, 255, 0.25)`.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
