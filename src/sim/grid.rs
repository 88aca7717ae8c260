//! Grid cells and the continuous-to-grid mapping

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An integer cell position. Signed so that sampled positions past the
/// left/top edge stay representable until the bounds check rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sample a continuous position into the nearest cell
    pub fn from_world(pos: Vec2, cell_size: f32) -> Self {
        let scaled = pos / cell_size;
        // `as` saturates, so far-off or NaN positions still land out of bounds or at 0
        Self::new(scaled.x.round() as i32, scaled.y.round() as i32)
    }

    /// Cell center in world units
    pub fn to_world(self, cell_size: f32) -> Vec2 {
        self.as_vec2() * cell_size
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Euclidean distance in cells
    #[inline]
    pub fn distance(self, other: GridCell) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Grid extent: `[0, width) x [0, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Uniform cell anywhere in bounds
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridCell {
        GridCell::new(
            rng.random_range(0..self.width) as i32,
            rng.random_range(0..self.height) as i32,
        )
    }

    /// Uniform cell at least `margin_x`/`margin_y` cells from the edges.
    /// Margins that would leave no room fall back to the full axis.
    pub fn random_inner_cell<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        margin_x: u32,
        margin_y: u32,
    ) -> GridCell {
        let x = axis_sample(rng, self.width, margin_x);
        let y = axis_sample(rng, self.height, margin_y);
        GridCell::new(x as i32, y as i32)
    }
}

fn axis_sample<R: Rng + ?Sized>(rng: &mut R, extent: u32, margin: u32) -> u32 {
    if margin.saturating_mul(2) < extent {
        rng.random_range(margin..extent - margin)
    } else {
        rng.random_range(0..extent)
    }
}
