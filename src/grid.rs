//! Fixed-resolution 2D cell storage shared by every simulation field.

use glam::Vec2;
use rayon::prelude::*;

/// Row-major grid of `C`-component cells.
///
/// Out-of-range reads never wrap: `fetch` and `sample` clamp to the nearest
/// valid texel, which is the edge policy every pass relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<const C: usize> {
    width: usize,
    height: usize,
    cells: Vec<[f32; C]>,
}

impl<const C: usize> Grid<C> {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![[0.0; C]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cells(&self) -> &[[f32; C]] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [[f32; C]] {
        &mut self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> [f32; C] {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: [f32; C]) {
        self.cells[y * self.width + x] = value;
    }

    /// Texel fetch with clamp-to-edge addressing.
    pub fn fetch(&self, x: isize, y: isize) -> [f32; C] {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.cells[cy * self.width + cx]
    }

    /// Bilinear sample at a position given in texel coordinates, where texel
    /// `(x, y)` sits at `(x as f32, y as f32)`.
    pub fn sample(&self, position: Vec2) -> [f32; C] {
        let px = position.x.clamp(0.0, (self.width - 1) as f32);
        let py = position.y.clamp(0.0, (self.height - 1) as f32);

        let x0 = px.floor() as usize;
        let y0 = py.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let sx = px - x0 as f32;
        let sy = py - y0 as f32;

        let c00 = self.get(x0, y0);
        let c10 = self.get(x1, y0);
        let c01 = self.get(x0, y1);
        let c11 = self.get(x1, y1);

        let mut out = [0.0; C];
        for (c, value) in out.iter_mut().enumerate() {
            *value = (1.0 - sx) * (1.0 - sy) * c00[c]
                + sx * (1.0 - sy) * c10[c]
                + (1.0 - sx) * sy * c01[c]
                + sx * sy * c11[c];
        }
        out
    }

    /// Overwrites every cell with the result of a per-cell kernel.
    ///
    /// Rows are processed in parallel; the kernel must only read from grids
    /// other than `self`.
    pub fn fill<F>(&mut self, kernel: F)
    where
        F: Fn(usize, usize) -> [f32; C] + Sync + Send,
    {
        let width = self.width;
        self.cells
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = kernel(x, y);
                }
            });
    }

    /// Drops the current contents and allocates zeroed storage at a new
    /// resolution.
    pub fn reallocate(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill([0.0; C]);
    }
}
