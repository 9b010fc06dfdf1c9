//! Runtime solver configuration, clamped rather than rejected.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::pressure::{DEFAULT_ITERATIONS, MAX_ITERATIONS, MIN_ITERATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timestep {
    #[serde(rename = "1/15")]
    Fps15,
    #[serde(rename = "1/30")]
    Fps30,
    #[default]
    #[serde(rename = "1/60")]
    Fps60,
    #[serde(rename = "1/90")]
    Fps90,
    #[serde(rename = "1/120")]
    Fps120,
}

impl Timestep {
    pub const ALL: [Timestep; 5] = [
        Timestep::Fps15,
        Timestep::Fps30,
        Timestep::Fps60,
        Timestep::Fps90,
        Timestep::Fps120,
    ];

    pub fn seconds(self) -> f32 {
        match self {
            Timestep::Fps15 => 1.0 / 15.0,
            Timestep::Fps30 => 1.0 / 30.0,
            Timestep::Fps60 => 1.0 / 60.0,
            Timestep::Fps90 => 1.0 / 90.0,
            Timestep::Fps120 => 1.0 / 120.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timestep::Fps15 => "1/15",
            Timestep::Fps30 => "1/30",
            Timestep::Fps60 => "1/60",
            Timestep::Fps90 => "1/90",
            Timestep::Fps120 => "1/120",
        }
    }
}

pub const SCALE_RANGE: (f32, f32) = (0.1, 2.0);
pub const COLOR_DECAY_RANGE: (f32, f32) = (0.0, 0.02);
pub const RADIUS_RANGE: (f32, f32) = (0.1, 1.0);
pub const SMOOTHING_RANGE: (f32, f32) = (0.0, 0.95);

/// Smallest grid the solver will run on.
pub const MIN_RESOLUTION: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Jacobi iterations per frame.
    #[serde(deserialize_with = "lenient_count")]
    pub iterations: usize,
    /// Grid resolution relative to the display size.
    pub scale: f32,
    pub color_decay: f32,
    pub boundaries: bool,
    pub timestep: Timestep,
    /// Force-site falloff radius in normalized units.
    pub radius: f32,
    /// Pointer smoothing factor applied on every move.
    pub smoothing: f32,
    /// When false, frames leave every field untouched.
    pub simulate: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            scale: 0.5,
            color_decay: 0.01,
            boundaries: true,
            timestep: Timestep::Fps60,
            radius: 0.25,
            smoothing: 0.8,
            simulate: true,
        }
    }
}

/// Accepts any JSON number so negative or fractional counts get clamped by
/// [`SolverConfig::sanitized`] instead of failing the whole file.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.max(0.0).round() as usize)
}

fn clamp_finite(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl SolverConfig {
    /// Copy with every field forced into its documented range.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            iterations: self.iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS),
            scale: clamp_finite(self.scale, SCALE_RANGE, defaults.scale),
            color_decay: clamp_finite(self.color_decay, COLOR_DECAY_RANGE, defaults.color_decay),
            boundaries: self.boundaries,
            timestep: self.timestep,
            radius: clamp_finite(self.radius, RADIUS_RANGE, defaults.radius),
            smoothing: clamp_finite(self.smoothing, SMOOTHING_RANGE, defaults.smoothing),
            simulate: self.simulate,
        }
    }

    /// Like [`sanitized`](Self::sanitized), but logs every adjusted field.
    pub fn sanitize_and_report(&self) -> Self {
        let clean = self.sanitized();
        if clean.iterations != self.iterations {
            log::warn!("iterations {} clamped to {}", self.iterations, clean.iterations);
        }
        if clean.scale != self.scale {
            log::warn!("scale {} clamped to {}", self.scale, clean.scale);
        }
        if clean.color_decay != self.color_decay {
            log::warn!("color_decay {} clamped to {}", self.color_decay, clean.color_decay);
        }
        if clean.radius != self.radius {
            log::warn!("radius {} clamped to {}", self.radius, clean.radius);
        }
        if clean.smoothing != self.smoothing {
            log::warn!("smoothing {} clamped to {}", self.smoothing, clean.smoothing);
        }
        clean
    }

    /// Grid resolution for a display size, never below 2×2.
    pub fn grid_resolution(&self, display_width: f32, display_height: f32) -> (usize, usize) {
        let scale = self.sanitized().scale;
        let cells = |extent: f32| {
            let scaled = (extent.max(0.0) * scale).round();
            if scaled.is_finite() {
                (scaled as usize).max(MIN_RESOLUTION)
            } else {
                MIN_RESOLUTION
            }
        };
        (cells(display_width), cells(display_height))
    }

    /// Reads a JSON config. A missing or malformed file falls back to
    /// defaults; out-of-range values are clamped.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config.sanitize_and_report(),
            Err(err) => {
                log::info!("using default configuration: {:#}", err);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
