use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SolverConfig;
use crate::input::ForceSites;
use crate::render::{ColorMode, Renderer, Visualize};
use crate::simulation::{FieldReadout, Simulation};

pub struct ImageExporter {
    renderer: Renderer,
}

impl ImageExporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            renderer: Renderer::new(width, height),
        }
    }

    pub fn export_png(
        &self,
        simulation: &impl FieldReadout,
        visualize: Visualize,
        mode: ColorMode,
        path: &Path,
    ) -> Result<()> {
        let img = self.renderer.render(simulation, visualize, mode);
        img.save(path)
            .with_context(|| format!("saving {}", path.display()))?;
        Ok(())
    }

    pub fn export_dye_png(&self, simulation: &impl FieldReadout, path: &Path) -> Result<()> {
        self.export_png(simulation, Visualize::Color, ColorMode::Normal, path)
    }

    pub fn export_velocity_png(&self, simulation: &impl FieldReadout, path: &Path) -> Result<()> {
        self.export_png(simulation, Visualize::Velocity, ColorMode::Normal, path)
    }

    /// Steps the simulation `steps` times, writing a dye frame after each.
    pub fn export_frame_sequence(
        &self,
        simulation: &mut Simulation,
        config: &SolverConfig,
        sites: &mut ForceSites,
        steps: usize,
        output_dir: &Path,
        prefix: &str,
    ) -> Result<()> {
        for i in 0..steps {
            simulation.step(config, sites.sites());
            sites.frame_consumed();

            let path = output_dir.join(format!("{}_frame_{:04}.png", prefix, i));
            self.export_dye_png(simulation, &path)?;
        }
        Ok(())
    }
}
