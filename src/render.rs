use glam::Vec3;
use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::simulation::FieldReadout;

/// Which readout the renderer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visualize {
    #[default]
    Color,
    Velocity,
    Divergence,
    Pressure,
}

impl Visualize {
    pub const ALL: [Visualize; 4] = [
        Visualize::Color,
        Visualize::Velocity,
        Visualize::Divergence,
        Visualize::Pressure,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    Normal,
    Luminance,
    #[default]
    Spectral,
}

impl ColorMode {
    pub const ALL: [ColorMode; 3] = [ColorMode::Normal, ColorMode::Luminance, ColorMode::Spectral];
}

// Velocity and pressure are unbounded; these bring typical values into [0, 1].
const VELOCITY_DISPLAY_SCALE: f32 = 0.01;
const SCALAR_DISPLAY_SCALE: f32 = 0.5;

fn spectral(t: f32) -> Vec3 {
    // Blue -> cyan -> green -> yellow -> red
    let t = t.clamp(0.0, 1.0) * 4.0;
    let stops = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.3, 1.0),
        Vec3::new(0.0, 1.0, 0.6),
        Vec3::new(1.0, 0.9, 0.0),
        Vec3::new(1.0, 0.1, 0.0),
    ];
    let i = (t.floor() as usize).min(3);
    stops[i].lerp(stops[i + 1], t - i as f32)
}

fn luminance(color: Vec3) -> f32 {
    color.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

/// Raw readout value at a cell, before color mapping.
pub fn field_value(simulation: &impl FieldReadout, visualize: Visualize, x: usize, y: usize) -> Vec3 {
    match visualize {
        Visualize::Color => Vec3::from_array(simulation.dye().get(x, y)),
        Visualize::Velocity => {
            let [vx, vy] = simulation.velocity().get(x, y);
            Vec3::new(vx.abs(), vy.abs(), 0.0) * VELOCITY_DISPLAY_SCALE
        }
        Visualize::Divergence => {
            let d = simulation.divergence().get(x, y)[0] * SCALAR_DISPLAY_SCALE;
            Vec3::new(d.max(0.0), 0.0, (-d).max(0.0))
        }
        Visualize::Pressure => {
            let p = simulation.pressure().get(x, y)[0] * SCALAR_DISPLAY_SCALE;
            Vec3::new(p.max(0.0), 0.0, (-p).max(0.0))
        }
    }
}

pub fn map_color(value: Vec3, mode: ColorMode) -> [u8; 3] {
    let mapped = match mode {
        ColorMode::Normal => value,
        ColorMode::Luminance => Vec3::splat(luminance(value)),
        ColorMode::Spectral => spectral(luminance(value).max(value.max_element())),
    };
    let rgb = mapped.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [rgb.x as u8, rgb.y as u8, rgb.z as u8]
}

pub struct Renderer {
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Nearest-neighbour image of a readout. Row 0 is the top of the grid.
    pub fn render(&self, simulation: &impl FieldReadout, visualize: Visualize, mode: ColorMode) -> RgbImage {
        let (grid_width, grid_height) = simulation.resolution();
        let mut img = ImageBuffer::new(self.width, self.height);

        for (px, py, pixel) in img.enumerate_pixels_mut() {
            let x = (px as f32 / self.width as f32 * grid_width as f32) as usize;
            let row = (py as f32 / self.height as f32 * grid_height as f32) as usize;
            let x = x.min(grid_width - 1);
            let y = grid_height - 1 - row.min(grid_height - 1);

            *pixel = Rgb(map_color(field_value(simulation, visualize, x, y), mode));
        }

        img
    }
}
