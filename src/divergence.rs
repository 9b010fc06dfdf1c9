//! Central-difference divergence of the velocity field.

use crate::grid::Grid;

pub fn divergence_cell(velocity: &Grid<2>, x: usize, y: usize) -> [f32; 1] {
    let (x, y) = (x as isize, y as isize);
    let left = velocity.fetch(x - 1, y)[0];
    let right = velocity.fetch(x + 1, y)[0];
    let bottom = velocity.fetch(x, y - 1)[1];
    let top = velocity.fetch(x, y + 1)[1];

    [0.5 * ((right - left) + (top - bottom))]
}

pub fn compute_divergence(velocity: &Grid<2>, out: &mut Grid<1>) {
    out.fill(|x, y| divergence_cell(velocity, x, y));
}
