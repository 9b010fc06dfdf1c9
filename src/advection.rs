//! Semi-Lagrangian transport of a field along a velocity field.

use glam::Vec2;

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvectionParams {
    pub timestep: f32,
    /// Exponential damping rate applied to the transported value. Zero for
    /// velocity self-advection.
    pub decay: f32,
}

impl AdvectionParams {
    pub fn new(timestep: f32) -> Self {
        Self {
            timestep,
            decay: 0.0,
        }
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }
}

/// Per-step multiplier for a decay rate. Always within `(0, 1]` for
/// non-negative inputs.
pub fn decay_factor(decay: f32, timestep: f32) -> f32 {
    1.0 / (1.0 + decay.max(0.0) * timestep.max(0.0))
}

/// Value carried into cell `(x, y)`: the source sampled where the flow came
/// from one timestep ago.
pub fn advect_cell<const C: usize>(
    source: &Grid<C>,
    velocity: &Grid<2>,
    x: usize,
    y: usize,
    params: AdvectionParams,
) -> [f32; C] {
    let v = Vec2::from_array(velocity.fetch(x as isize, y as isize));
    let origin = Vec2::new(x as f32, y as f32) - params.timestep * v;
    let damping = decay_factor(params.decay, params.timestep);

    let mut value = source.sample(origin);
    for component in value.iter_mut() {
        *component *= damping;
    }
    value
}

/// Advects `source` along `velocity` into `out`. `source` and `velocity` may
/// be the same grid for self-advection.
pub fn advect<const C: usize>(
    source: &Grid<C>,
    velocity: &Grid<2>,
    params: AdvectionParams,
    out: &mut Grid<C>,
) {
    out.fill(|x, y| advect_cell(source, velocity, x, y, params));
}
