//! Uniform bucket grid for link queries.
//!
//! Cells are squares with side at least the link distance, so any two
//! particles that can be linked sit in the same or adjacent cells. The side
//! grows past the link distance when that would need more than
//! [`MAX_CELLS_PER_AXIS`] cells along an axis or many more cells than
//! particles. Particles
//! are counting-sorted by cell into one flat index array (`cell_start` marks
//! where each cell's run begins), and a query scans the 3x3 block around a
//! particle's cell.
//!
//! The grid only changes how pairs are found. It reports exactly the links
//! [`brute_force`](crate::links::brute_force) would, in a different order.

use glam::{UVec2, Vec2};

use crate::links::{Link, LinkMode};
use crate::particle::Particle;

/// Upper bound on grid cells along either axis.
pub const MAX_CELLS_PER_AXIS: u32 = 1024;

/// Cells allotted per particle before the side is widened.
const CELLS_PER_PARTICLE: usize = 4;

/// How linked pairs are found each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborSearch {
    /// Test every pair. Fine for the few hundred particles a screen holds.
    #[default]
    BruteForce,
    /// Bucket particles into a grid first; near-linear for dense fields.
    Grid,
}

/// Reusable grid storage. Rebuilt every frame from current positions.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    dims: UVec2,
    /// Cell of each particle, by particle index.
    particle_cell: Vec<u32>,
    /// Prefix offsets into `sorted`; length is `cells + 1`.
    cell_start: Vec<u32>,
    /// Particle indices ordered by cell.
    sorted: Vec<u32>,
    /// Scatter scratch, reused across rebuilds.
    cursor: Vec<u32>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid dimensions in cells from the most recent rebuild.
    pub fn dims(&self) -> UVec2 {
        self.dims
    }

    /// Side of a cell from the most recent rebuild.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Bucket `particles` into cells covering `extent`, each at least
    /// `cell_size` wide.
    pub fn rebuild(&mut self, particles: &[Particle], extent: Vec2, cell_size: f32) {
        self.cell_size = effective_cell_size(extent, cell_size, particles.len());
        self.dims = UVec2::new(
            axis_cells(extent.x, self.cell_size),
            axis_cells(extent.y, self.cell_size),
        );
        let cells = self.dims.x as usize * self.dims.y as usize;

        let (size, dims) = (self.cell_size, self.dims);
        self.particle_cell.clear();
        self.particle_cell
            .extend(particles.iter().map(|p| cell_index(cell_of(p.position, size, dims), dims)));

        // Counting sort: histogram, exclusive prefix sum, scatter.
        self.cell_start.clear();
        self.cell_start.resize(cells + 1, 0);
        for &cell in &self.particle_cell {
            self.cell_start[cell as usize + 1] += 1;
        }
        for c in 0..cells {
            self.cell_start[c + 1] += self.cell_start[c];
        }

        self.cursor.clear();
        self.cursor.extend_from_slice(&self.cell_start);
        self.sorted.clear();
        self.sorted.resize(particles.len(), 0);
        for (i, &cell) in self.particle_cell.iter().enumerate() {
            let slot = &mut self.cursor[cell as usize];
            self.sorted[*slot as usize] = i as u32;
            *slot += 1;
        }
    }

    /// Particle indices in one cell.
    pub fn cell(&self, cell: UVec2) -> &[u32] {
        let index = cell_index(cell, self.dims) as usize;
        let start = self.cell_start[index] as usize;
        let end = self.cell_start[index + 1] as usize;
        &self.sorted[start..end]
    }

    /// Visit every link among `particles`, which must be the slice the grid
    /// was last rebuilt from.
    pub fn for_each_link<F>(&self, particles: &[Particle], max_distance: f32, mode: LinkMode, mut visit: F)
    where
        F: FnMut(Link),
    {
        for (i, a) in particles.iter().enumerate() {
            let home = cell_of(a.position, self.cell_size, self.dims);
            let x0 = home.x.saturating_sub(1);
            let y0 = home.y.saturating_sub(1);
            let x1 = (home.x + 1).min(self.dims.x - 1);
            let y1 = (home.y + 1).min(self.dims.y - 1);

            for cy in y0..=y1 {
                for cx in x0..=x1 {
                    for &j in self.cell(UVec2::new(cx, cy)) {
                        let j = j as usize;
                        if !mode.admits(i, j) {
                            continue;
                        }
                        let distance = a.position.distance(particles[j].position);
                        if distance < max_distance {
                            visit(Link { from: i, to: j, distance });
                        }
                    }
                }
            }
        }
    }
}

/// Widen `requested` until the grid stays within [`MAX_CELLS_PER_AXIS`] per
/// axis and a few cells per particle. Wider cells never lose a link.
fn effective_cell_size(extent: Vec2, requested: f32, population: usize) -> f32 {
    let extent = extent.max(Vec2::ZERO);
    let longest = extent.max_element();
    let requested = if requested.is_finite() && requested > 0.0 {
        requested
    } else {
        longest.max(1.0)
    };

    let budget = population.saturating_mul(CELLS_PER_PARTICLE).max(1) as f32;
    let by_budget = (extent.x * extent.y / budget).sqrt();
    let by_axis = longest / MAX_CELLS_PER_AXIS as f32;
    requested.max(by_budget).max(by_axis)
}

fn axis_cells(length: f32, cell_size: f32) -> u32 {
    ((length.max(0.0) / cell_size).ceil() as u32).clamp(1, MAX_CELLS_PER_AXIS)
}

/// Cell coordinates of a position. Positions that overshoot the viewport
/// fall into the border cells.
fn cell_of(position: Vec2, cell_size: f32, dims: UVec2) -> UVec2 {
    let max = (dims - UVec2::ONE).as_vec2();
    (position / cell_size).floor().clamp(Vec2::ZERO, max).as_uvec2()
}

#[inline]
fn cell_index(cell: UVec2, dims: UVec2) -> u32 {
    cell.y * dims.x + cell.x
}
