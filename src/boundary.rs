//! Reflective walls along the outermost ring of velocity cells.

use crate::grid::Grid;

/// Negates the velocity component normal to any edge the cell lies on.
pub fn boundary_cell(velocity: &Grid<2>, x: usize, y: usize) -> [f32; 2] {
    let (width, height) = velocity.resolution();
    let [mut vx, mut vy] = velocity.get(x, y);

    if x == 0 || x + 1 == width {
        vx = -vx;
    }
    if y == 0 || y + 1 == height {
        vy = -vy;
    }
    [vx, vy]
}

pub fn enforce_boundaries(velocity: &Grid<2>, out: &mut Grid<2>) {
    out.fill(|x, y| boundary_cell(velocity, x, y));
}
