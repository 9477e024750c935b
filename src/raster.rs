//! Software rasteriser.
//!
//! [`Framebuffer`] implements [`Canvas`] on the CPU with the same blending
//! the browser canvas uses: sRGB values, source-over compositing, and
//! coverage-based anti-aliasing. It backs the `snapshot` command, tests, and
//! benchmarks that need real pixels without a GPU.

use std::path::Path;

use glam::Vec2;
use image::{Rgba as Pixel, RgbaImage};

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::field::Viewport;
use crate::lifecycle::Backdrop;
use crate::random::RandomSource;
use crate::sparks::SparkConfig;
use crate::time::FrameClock;

/// Fixed step used by [`render_headless`], one 60 Hz frame.
pub const HEADLESS_FRAME_SECS: f32 = 1.0 / 60.0;

/// Largest headless frame, in pixels (1 GiB of `f32` RGBA).
pub const MAX_FRAMEBUFFER_PIXELS: u64 = 8192 * 8192;

/// Premultiplied RGBA pixels in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Allocate a buffer, refusing sizes over [`MAX_FRAMEBUFFER_PIXELS`].
    pub fn try_new(width: u32, height: u32) -> Result<Self, BackdropError> {
        check_size(width, height)?;
        Ok(Self::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight (non-premultiplied) colour of a pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.pixels[self.index(x, y)];
        if a <= 0.0 {
            return Some([0.0; 4]);
        }
        Some([r / a, g / a, b / a, a])
    }

    /// Composite the layer at `opacity` over an opaque `background`.
    pub fn to_image(&self, background: Rgba, opacity: f32) -> RgbaImage {
        let [br, bg, bb, _] = background.to_array();
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b, a] = self.pixels[self.index(x, y)];
            let keep = 1.0 - a * opacity;
            Pixel([
                to_byte(r * opacity + br * keep),
                to_byte(g * opacity + bg * keep),
                to_byte(b * opacity + bb * keep),
                255,
            ])
        })
    }

    /// Write the composited layer as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>, background: Rgba, opacity: f32) -> Result<(), BackdropError> {
        let path = path.as_ref();
        self.to_image(background, opacity)
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("wrote {}x{} snapshot to {}", self.width, self.height, path.display());
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Blend `color` into one pixel with the given coverage.
    #[inline]
    fn blend(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        let alpha = color[3] * coverage;
        if alpha <= 0.0 {
            return;
        }
        let index = self.index(x, y);
        let dst = &mut self.pixels[index];
        let keep = 1.0 - alpha;
        dst[0] = color[0] * alpha + dst[0] * keep;
        dst[1] = color[1] * alpha + dst[1] * keep;
        dst[2] = color[2] * alpha + dst[2] * keep;
        dst[3] = alpha + dst[3] * keep;
    }

    /// Pixel bounds `[x0, x1) x [y0, y1)` covering `min..max`, clipped.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Canvas for Framebuffer {
    fn resize(&mut self, width: u32, height: u32) {
        *self = Framebuffer::new(width, height);
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let reach = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(center - reach, center + reach) else {
            return;
        };
        let color = color.to_array();
        for y in y0..y1 {
            for x in x0..x1 {
                let d = (Vec2::new(x as f32, y as f32) + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                self.blend(x, y, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        let dir = to - from;
        let length_sq = dir.length_squared();
        // A zero-length segment with butt caps paints nothing.
        if length_sq < 1e-8 {
            return;
        }
        // Hairlines are drawn one pixel wide at reduced alpha.
        let half = width.max(1.0) * 0.5;
        let strength = width.min(1.0);

        let reach = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(from.min(to) - reach, from.max(to) + reach) else {
            return;
        };
        let color = color.to_array();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32, y as f32) + 0.5;
                let t = (p - from).dot(dir) / length_sq;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let d = p.distance(from + dir * t);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0) * strength;
                self.blend(x, y, color, coverage);
            }
        }
    }
}

/// Mount a backdrop on a [`Framebuffer`], run `frames` fixed-step frames,
/// and return the last one.
///
/// With `frames == 0` the buffer is blank: seeding draws nothing.
pub fn render_headless<R: RandomSource>(
    viewport: Viewport,
    frames: u32,
    config: FieldConfig,
    sparks: Option<SparkConfig>,
    rng: R,
) -> Result<Framebuffer, BackdropError> {
    check_size(viewport.width, viewport.height)?;
    let mut backdrop = Backdrop::mount(Some(Framebuffer::new(0, 0)), viewport, config, rng)?
        .with_clock(FrameClock::fixed(HEADLESS_FRAME_SECS));
    if let Some(sparks) = sparks {
        backdrop = backdrop.with_sparks(sparks)?;
    }

    for _ in 0..frames {
        backdrop.tick();
    }
    log::debug!("rendered {} headless frames", frames);

    Ok(backdrop
        .unmount()
        .unwrap_or_else(|| Framebuffer::new(viewport.width, viewport.height)))
}

fn check_size(width: u32, height: u32) -> Result<(), BackdropError> {
    if u64::from(width) * u64::from(height) > MAX_FRAMEBUFFER_PIXELS {
        return Err(BackdropError::FramebufferTooLarge {
            width,
            height,
            max: MAX_FRAMEBUFFER_PIXELS,
        });
    }
    Ok(())
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_center_takes_color() {
        let mut fb = Framebuffer::new(20, 20);
        fb.fill_circle(Vec2::new(10.5, 10.5), 2.0, Rgba::CYAN.with_alpha(0.4));

        let [r, g, b, a] = fb.pixel(10, 10).unwrap();
        assert!(r.abs() < 1e-6);
        assert!((g - 229.0 / 255.0).abs() < 1e-5);
        assert!((b - 1.0).abs() < 1e-5);
        assert!((a - 0.4).abs() < 1e-5);

        assert_eq!(fb.pixel(0, 0), Some([0.0; 4]));
    }

    #[test]
    fn test_zero_length_line_draws_nothing() {
        let mut fb = Framebuffer::new(10, 10);
        fb.stroke_line(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), Rgba::CYAN, 0.2);
        assert!(fb.pixels.iter().all(|p| p[3] == 0.0));
    }

    #[test]
    fn test_hairline_alpha_scaled_by_width() {
        let mut fb = Framebuffer::new(10, 10);
        fb.stroke_line(Vec2::new(0.0, 5.5), Vec2::new(10.0, 5.5), Rgba::CYAN, 0.2);
        let [_, _, _, a] = fb.pixel(4, 5).unwrap();
        assert!((a - 0.2).abs() < 1e-5);
        assert_eq!(fb.pixel(4, 8).unwrap()[3], 0.0);
    }

    #[test]
    fn test_source_over_accumulates() {
        let mut fb = Framebuffer::new(4, 4);
        let color = Rgba::CYAN.with_alpha(0.5);
        fb.fill_circle(Vec2::new(2.0, 2.0), 3.0, color);
        fb.fill_circle(Vec2::new(2.0, 2.0), 3.0, color);
        let [_, _, _, a] = fb.pixel(1, 1).unwrap();
        assert!((a - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_clear_and_resize() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_circle(Vec2::new(2.0, 2.0), 3.0, Rgba::CYAN);
        fb.clear();
        assert_eq!(fb.pixel(1, 1), Some([0.0; 4]));

        fb.resize(8, 2);
        assert_eq!((fb.width(), fb.height()), (8, 2));
        assert_eq!(fb.pixel(7, 1), Some([0.0; 4]));
        assert_eq!(fb.pixel(0, 2), None);
    }

    #[test]
    fn test_render_headless_draws_the_field() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let fb = render_headless(
            Viewport::new(200, 200),
            3,
            FieldConfig::default().with_density(400),
            None,
            StdRng::seed_from_u64(9),
        )
        .unwrap();
        assert_eq!((fb.width(), fb.height()), (200, 200));
        assert!(fb.pixels.iter().any(|p| p[3] > 0.0));

        let blank = render_headless(
            Viewport::new(50, 50),
            0,
            FieldConfig::default(),
            None,
            StdRng::seed_from_u64(9),
        )
        .unwrap();
        assert!(blank.pixels.iter().all(|p| p[3] == 0.0));
    }

    #[test]
    fn test_oversized_viewport_is_rejected() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let err = render_headless(
            Viewport::new(100_000, 100_000),
            1,
            FieldConfig::default(),
            None,
            StdRng::seed_from_u64(9),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BackdropError::FramebufferTooLarge { width: 100_000, height: 100_000, .. }
        ));

        assert!(Framebuffer::try_new(u32::MAX, 2).is_err());
        assert!(Framebuffer::try_new(1920, 1080).is_ok_and(|fb| fb.width() == 1920));
    }

    #[test]
    fn test_image_composites_over_background() {
        let mut fb = Framebuffer::new(2, 1);
        fb.fill_circle(Vec2::new(0.5, 0.5), 3.0, Rgba::rgb(255, 255, 255));

        let img = fb.to_image(Rgba::BLACK, 0.5);
        // Both pixels are fully covered white at half layer opacity.
        assert_eq!(img.get_pixel(0, 0).0, [128, 128, 128, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [128, 128, 128, 255]);
    }
}
