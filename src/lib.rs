//! Stable-fluids solver: semi-Lagrangian advection, Jacobi pressure projection
//! and dye transport on ping-pong field buffers.

pub mod advection;
pub mod analysis;
pub mod boundary;
pub mod buffers;
pub mod config;
pub mod desktop;
pub mod divergence;
pub mod export;
pub mod forces;
pub mod gradient;
pub mod grid;
pub mod input;
pub mod particles;
pub mod pressure;
pub mod render;
pub mod simulation;
pub mod util;

pub use analysis::{AnalysisRecorder, FluidMetrics};
pub use buffers::{BufferHandle, MultiBuffer};
pub use config::{SolverConfig, Timestep};
pub use desktop::DesktopApp;
pub use export::ImageExporter;
pub use grid::Grid;
pub use input::{ForceSite, ForceSites};
pub use particles::ParticleSystem;
pub use render::{ColorMode, Renderer, Visualize};
pub use simulation::{FieldReadout, Simulation};
