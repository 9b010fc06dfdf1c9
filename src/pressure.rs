//! Jacobi relaxation of the pressure Poisson equation `∇²p = ∇·v`.
//!
//! The solver runs a fixed number of iterations per frame and never checks
//! convergence. Each frame starts from the previous frame's last iterate. With
//! pathological inputs the pressure may grow without bound; nothing detects or
//! corrects that.

use crate::buffers::MultiBuffer;
use crate::grid::Grid;

/// Weight of the divergence term (`-dx²` with unit texel spacing).
pub const ALPHA: f32 = -1.0;
/// Reciprocal of the stencil's diagonal.
pub const BETA: f32 = 0.25;

pub const DEFAULT_ITERATIONS: usize = 32;
pub const MIN_ITERATIONS: usize = 16;
pub const MAX_ITERATIONS: usize = 128;

pub fn jacobi_cell(previous: &Grid<1>, divergence: &Grid<1>, x: usize, y: usize) -> [f32; 1] {
    let (ix, iy) = (x as isize, y as isize);
    let left = previous.fetch(ix - 1, iy)[0];
    let right = previous.fetch(ix + 1, iy)[0];
    let bottom = previous.fetch(ix, iy - 1)[0];
    let top = previous.fetch(ix, iy + 1)[0];
    let d = divergence.fetch(ix, iy)[0];

    [(left + right + bottom + top + ALPHA * d) * BETA]
}

/// One full relaxation sweep from `previous` into `out`.
pub fn jacobi_step(previous: &Grid<1>, divergence: &Grid<1>, out: &mut Grid<1>) {
    out.fill(|x, y| jacobi_cell(previous, divergence, x, y));
}

/// Runs `iterations` sweeps, ping-ponging through the pressure buffers.
pub fn solve(pressure: &mut MultiBuffer<1>, divergence: &Grid<1>, iterations: usize) {
    for _ in 0..iterations {
        pressure.rotate_write(|previous, out| jacobi_step(previous, divergence, out));
    }
}
