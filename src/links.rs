//! Connective lines between nearby particles.
//!
//! A link is drawn between two particles closer than the link distance, with
//! an alpha that fades linearly from 1 at `d = 0` to `1 - fade` at the
//! threshold. The classic field draws every *ordered* pair, which includes a
//! zero-length self link per particle and both `(i, j)` and `(j, i)`: each
//! visible line is stroked twice, doubling its apparent opacity.
//! [`LinkMode::UniquePairs`] strokes each pair once instead.

use crate::particle::Particle;

/// Which pairs produce a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Every ordered pair `(i, j)`, self pairs included.
    #[default]
    OrderedPairs,
    /// Each unordered pair of distinct particles once, `i < j`.
    UniquePairs,
}

impl LinkMode {
    /// Whether the pair `(i, j)` is visited under this mode.
    #[inline]
    pub fn admits(self, i: usize, j: usize) -> bool {
        match self {
            LinkMode::OrderedPairs => true,
            LinkMode::UniquePairs => i < j,
        }
    }
}

/// A pair of particles closer than the link distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub distance: f32,
}

/// Stroke alpha for two particles `distance` apart, or `None` if they are
/// too far apart to be linked.
///
/// With the default tuning (`max_distance = 100`, `fade = 0.8`) a pair 50
/// pixels apart gets alpha `0.6`.
#[inline]
pub fn link_alpha(distance: f32, max_distance: f32, fade: f32) -> Option<f32> {
    if distance < max_distance {
        Some(1.0 - (distance / max_distance) * fade)
    } else {
        None
    }
}

/// Visit every link with a plain nested loop. O(n²).
pub fn brute_force<F>(particles: &[Particle], max_distance: f32, mode: LinkMode, mut visit: F)
where
    F: FnMut(Link),
{
    for (i, a) in particles.iter().enumerate() {
        for (j, b) in particles.iter().enumerate() {
            if !mode.admits(i, j) {
                continue;
            }
            let distance = a.position.distance(b.position);
            if distance < max_distance {
                visit(Link { from: i, to: j, distance });
            }
        }
    }
}
