//! Per-frame driver for the stable-fluids pipeline.

use glam::Vec2;

use crate::advection::{self, AdvectionParams};
use crate::boundary;
use crate::buffers::MultiBuffer;
use crate::config::SolverConfig;
use crate::divergence;
use crate::forces;
use crate::gradient;
use crate::grid::Grid;
use crate::input::ForceSite;
use crate::pressure;
use crate::util::Timed;

pub const VELOCITY_BUFFERS: usize = 2;
pub const DYE_BUFFERS: usize = 2;
pub const PRESSURE_BUFFERS: usize = 2;
pub const DIVERGENCE_BUFFERS: usize = 1;

/// Read-only view of the most recently finalized fields, for renderers and
/// other consumers that must not write simulation state.
pub trait FieldReadout {
    fn resolution(&self) -> (usize, usize);
    fn velocity(&self) -> &Grid<2>;
    fn dye(&self) -> &Grid<3>;
    fn divergence(&self) -> &Grid<1>;
    fn pressure(&self) -> &Grid<1>;
}

#[derive(Debug, Clone)]
pub struct Simulation {
    velocity: MultiBuffer<2>,
    dye: MultiBuffer<3>,
    divergence: MultiBuffer<1>,
    pressure: MultiBuffer<1>,
    frame: u64,
}

impl Simulation {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(crate::config::MIN_RESOLUTION);
        let height = height.max(crate::config::MIN_RESOLUTION);
        log::info!("creating {}x{} simulation", width, height);

        Self {
            velocity: MultiBuffer::new("velocity", width, height, VELOCITY_BUFFERS),
            dye: MultiBuffer::new("dye", width, height, DYE_BUFFERS),
            divergence: MultiBuffer::new("divergence", width, height, DIVERGENCE_BUFFERS),
            pressure: MultiBuffer::new("pressure", width, height, PRESSURE_BUFFERS),
            frame: 0,
        }
    }

    /// Sized from a display extent and the configured resolution scale.
    pub fn for_display(display_size: Vec2, config: &SolverConfig) -> Self {
        let (width, height) = config.grid_resolution(display_size.x, display_size.y);
        Self::new(width, height)
    }

    pub fn resolution(&self) -> (usize, usize) {
        self.velocity.resolution()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn on_resize(&mut self, display_size: Vec2, config: &SolverConfig) {
        let (width, height) = config.grid_resolution(display_size.x, display_size.y);
        self.resize(width, height);
    }

    /// Changes the grid resolution of every field. Buffers are reallocated
    /// lazily and all simulation state is discarded. Must be called between
    /// frames.
    pub fn resize(&mut self, width: usize, height: usize) {
        let width = width.max(crate::config::MIN_RESOLUTION);
        let height = height.max(crate::config::MIN_RESOLUTION);
        if (width, height) == self.resolution() {
            log::debug!("resize to {}x{} ignored, resolution unchanged", width, height);
            return;
        }

        log::info!(
            "resizing simulation {:?} -> {}x{}",
            self.resolution(),
            width,
            height
        );
        self.velocity.resize(width, height);
        self.dye.resize(width, height);
        self.divergence.resize(width, height);
        self.pressure.resize(width, height);
    }

    /// Returns every field to the zero state without reallocating.
    pub fn reset(&mut self) {
        log::info!("resetting simulation at frame {}", self.frame);
        self.velocity.clear();
        self.dye.clear();
        self.divergence.clear();
        self.pressure.clear();
    }

    /// Advances one frame. `sites` is only borrowed for this call.
    pub fn step(&mut self, config: &SolverConfig, sites: &[ForceSite]) {
        let config = config.sanitized();
        if !config.simulate {
            return;
        }

        let _frame_timer = Timed::frame(self.frame);
        let dt = config.timestep.seconds();

        {
            let _t = Timed::pass("advect velocity", self.frame);
            self.velocity.rotate_write(|v, out| {
                advection::advect(v, v, AdvectionParams::new(dt), out)
            });
        }

        if !sites.is_empty() {
            let _t = Timed::pass("inject", self.frame);
            self.velocity
                .rotate_write(|v, out| forces::inject_force(v, sites, dt, out));
            self.dye
                .rotate_write(|c, out| forces::inject_color(c, sites, out));
        }

        if config.boundaries {
            let _t = Timed::pass("boundaries", self.frame);
            self.velocity
                .rotate_write(|v, out| boundary::enforce_boundaries(v, out));
        }

        {
            let _t = Timed::pass("divergence", self.frame);
            let velocity = self.velocity.current();
            self.divergence
                .write(|out| divergence::compute_divergence(velocity, out));
        }

        {
            let _t = Timed::pass("pressure", self.frame);
            pressure::solve(
                &mut self.pressure,
                self.divergence.current(),
                config.iterations,
            );
        }

        {
            let _t = Timed::pass("project", self.frame);
            let pressure = self.pressure.current();
            self.velocity
                .rotate_write(|v, out| gradient::subtract_gradient(v, pressure, out));
        }

        {
            let _t = Timed::pass("advect dye", self.frame);
            let velocity = self.velocity.current();
            let params = AdvectionParams::new(dt).with_decay(config.color_decay);
            self.dye
                .rotate_write(|c, out| advection::advect(c, velocity, params, out));
        }

        self.frame += 1;
    }

    pub fn current_velocity(&self) -> &Grid<2> {
        self.velocity.current()
    }

    pub fn current_dye(&self) -> &Grid<3> {
        self.dye.current()
    }

    pub fn current_divergence(&self) -> &Grid<1> {
        self.divergence.current()
    }

    pub fn current_pressure(&self) -> &Grid<1> {
        self.pressure.current()
    }

    /// Direct write access for seeding initial conditions between frames.
    pub fn seed_velocity<F>(&mut self, init: F)
    where
        F: Fn(usize, usize) -> [f32; 2] + Sync + Send,
    {
        self.velocity.write(|out| out.fill(init));
    }

    pub fn seed_dye<F>(&mut self, init: F)
    where
        F: Fn(usize, usize) -> [f32; 3] + Sync + Send,
    {
        self.dye.write(|out| out.fill(init));
    }

    pub fn velocity_buffers(&self) -> &MultiBuffer<2> {
        &self.velocity
    }

    pub fn pressure_buffers(&self) -> &MultiBuffer<1> {
        &self.pressure
    }
}

impl FieldReadout for Simulation {
    fn resolution(&self) -> (usize, usize) {
        Simulation::resolution(self)
    }

    fn velocity(&self) -> &Grid<2> {
        self.current_velocity()
    }

    fn dye(&self) -> &Grid<3> {
        self.current_dye()
    }

    fn divergence(&self) -> &Grid<1> {
        self.current_divergence()
    }

    fn pressure(&self) -> &Grid<1> {
        self.current_pressure()
    }
}
