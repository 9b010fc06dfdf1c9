//! Projection of velocity onto its divergence-free part.

use glam::Vec2;

use crate::grid::Grid;

pub fn pressure_gradient(pressure: &Grid<1>, x: usize, y: usize) -> Vec2 {
    let (x, y) = (x as isize, y as isize);
    Vec2::new(
        pressure.fetch(x + 1, y)[0] - pressure.fetch(x - 1, y)[0],
        pressure.fetch(x, y + 1)[0] - pressure.fetch(x, y - 1)[0],
    )
}

pub fn subtract_gradient_cell(
    velocity: &Grid<2>,
    pressure: &Grid<1>,
    x: usize,
    y: usize,
) -> [f32; 2] {
    let v = Vec2::from_array(velocity.get(x, y));
    (v - 0.5 * pressure_gradient(pressure, x, y)).to_array()
}

pub fn subtract_gradient(velocity: &Grid<2>, pressure: &Grid<1>, out: &mut Grid<2>) {
    out.fill(|x, y| subtract_gradient_cell(velocity, pressure, x, y));
}
