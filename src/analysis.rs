use glam::Vec2;

use crate::divergence::divergence_cell;
use crate::grid::Grid;
use crate::simulation::FieldReadout;

/// Sum of absolute divergence over all cells.
pub fn total_divergence(velocity: &Grid<2>) -> f32 {
    let (width, height) = velocity.resolution();
    let mut total = 0.0;
    for y in 0..height {
        for x in 0..width {
            total += divergence_cell(velocity, x, y)[0].abs();
        }
    }
    total
}

/// L2 norm of the divergence field.
pub fn divergence_l2(velocity: &Grid<2>) -> f32 {
    let (width, height) = velocity.resolution();
    let mut sum_sq = 0.0;
    for y in 0..height {
        for x in 0..width {
            let d = divergence_cell(velocity, x, y)[0];
            sum_sq += d * d;
        }
    }
    sum_sq.sqrt()
}

#[derive(Debug, Clone)]
pub struct FluidMetrics {
    pub frame: u64,
    pub dye_mass: f32,
    pub max_dye: f32,
    pub kinetic_energy: f32,
    pub max_speed: f32,
    pub avg_speed: f32,
    pub total_divergence: f32,
    pub divergence_l2: f32,
    pub max_pressure: f32,
    pub vorticity: f32,
}

impl FluidMetrics {
    pub fn analyze(simulation: &impl FieldReadout, frame: u64) -> Self {
        let velocity = simulation.velocity();
        let dye = simulation.dye();
        let (width, height) = velocity.resolution();
        let size = (width * height) as f32;

        let mut dye_mass: f32 = 0.0;
        let mut max_dye: f32 = 0.0;
        for cell in dye.cells() {
            let sum: f32 = cell.iter().sum();
            dye_mass += sum;
            max_dye = max_dye.max(cell.iter().copied().fold(0.0, f32::max));
        }

        let mut kinetic_energy: f32 = 0.0;
        let mut max_speed: f32 = 0.0;
        let mut speed_sum: f32 = 0.0;
        for cell in velocity.cells() {
            let speed = Vec2::from_array(*cell).length();
            kinetic_energy += 0.5 * speed * speed;
            max_speed = max_speed.max(speed);
            speed_sum += speed;
        }

        // Curl (∇×v), central differences with clamped edges
        let mut total_vorticity = 0.0;
        for y in 0..height as isize {
            for x in 0..width as isize {
                let curl = (velocity.fetch(x + 1, y)[1] - velocity.fetch(x - 1, y)[1]
                    - velocity.fetch(x, y + 1)[0]
                    + velocity.fetch(x, y - 1)[0])
                    * 0.5;
                total_vorticity += curl.abs();
            }
        }

        let max_pressure = simulation
            .pressure()
            .cells()
            .iter()
            .fold(0.0f32, |acc, p| acc.max(p[0].abs()));

        Self {
            frame,
            dye_mass,
            max_dye,
            kinetic_energy,
            max_speed,
            avg_speed: speed_sum / size,
            total_divergence: total_divergence(velocity),
            divergence_l2: divergence_l2(velocity),
            max_pressure,
            vorticity: total_vorticity / size,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "frame {}: dye {:.4} (max {:.3}), energy {:.4}, speed max {:.4} avg {:.4}, div {:.5} (l2 {:.5}), |p| max {:.4}, vort {:.5}",
            self.frame,
            self.dye_mass,
            self.max_dye,
            self.kinetic_energy,
            self.max_speed,
            self.avg_speed,
            self.total_divergence,
            self.divergence_l2,
            self.max_pressure,
            self.vorticity
        );
    }
}

#[derive(Debug, Default)]
pub struct AnalysisRecorder {
    pub metrics_history: Vec<FluidMetrics>,
}

impl AnalysisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, simulation: &impl FieldReadout, frame: u64) -> &FluidMetrics {
        self.metrics_history
            .push(FluidMetrics::analyze(simulation, frame));
        &self.metrics_history[self.metrics_history.len() - 1]
    }

    pub fn log_trends(&self) {
        let (Some(first), Some(last)) = (self.metrics_history.first(), self.metrics_history.last())
        else {
            return;
        };
        if self.metrics_history.len() < 2 {
            return;
        }

        log::info!(
            "dye mass {:.4} -> {:.4} ({:+.2}%)",
            first.dye_mass,
            last.dye_mass,
            (last.dye_mass - first.dye_mass) / first.dye_mass.max(1e-6) * 100.0
        );
        log::info!(
            "kinetic energy {:.4} -> {:.4} ({:+.2}%)",
            first.kinetic_energy,
            last.kinetic_energy,
            (last.kinetic_energy - first.kinetic_energy) / first.kinetic_energy.max(1e-6) * 100.0
        );
        log::info!(
            "divergence {:.5} -> {:.5}",
            first.total_divergence,
            last.total_divergence
        );
    }
}
