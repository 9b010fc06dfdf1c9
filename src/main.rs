use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dyeflow::{AnalysisRecorder, ForceSites, ImageExporter, Simulation, SolverConfig};
use glam::Vec2;

#[derive(Parser, Debug)]
#[command(name = "dyeflow", about = "Real-time stable-fluids dye simulation")]
struct Cli {
    /// JSON solver configuration; defaults are used when absent
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive window (default)
    Run,
    /// Simulate a scripted pointer stroke and export PNG frames
    Headless {
        #[arg(long, default_value_t = 200)]
        width: usize,
        #[arg(long, default_value_t = 200)]
        height: usize,
        #[arg(long, default_value_t = 60)]
        frames: u64,
        /// Export every Nth frame
        #[arg(long, default_value_t = 5)]
        every: u64,
        #[arg(long, default_value = "frames")]
        output: PathBuf,
    },
    /// Write the effective configuration as JSON
    DumpConfig {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config.as_deref().map(SolverConfig::load);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_gui_app(config),
        Command::Headless {
            width,
            height,
            frames,
            every,
            output,
        } => run_headless(
            config.unwrap_or_default(),
            width,
            height,
            frames,
            every.max(1),
            output,
        ),
        Command::DumpConfig { path } => {
            config.unwrap_or_default().save(&path)?;
            log::info!("wrote configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run_headless(
    config: SolverConfig,
    width: usize,
    height: usize,
    frames: u64,
    every: u64,
    output: PathBuf,
) -> Result<()> {
    fs::create_dir_all(&output)
        .with_context(|| format!("creating output directory {}", output.display()))?;

    let mut simulation = Simulation::new(width, height);
    let mut sites = ForceSites::new(&config);
    let exporter = ImageExporter::new(800, 800);
    let mut recorder = AnalysisRecorder::new();

    // A single contact sweeping left to right through the middle of the grid
    // for the first half of the run.
    let stroke_frames = (frames / 2).max(1);
    sites.on_force_start(0, Vec2::new(0.2, 0.5));

    for frame in 0..frames {
        if frame < stroke_frames {
            let t = (frame + 1) as f32 / stroke_frames as f32;
            let wobble = (t * std::f32::consts::TAU).sin() * 0.1;
            sites.on_force_move(0, Vec2::new(0.2 + 0.6 * t, 0.5 + wobble));
        } else if frame == stroke_frames {
            sites.on_force_end(0);
        }

        simulation.step(&config, sites.sites());
        sites.frame_consumed();

        let metrics = recorder.record_frame(&simulation, frame);
        if frame % every == 0 || frame + 1 == frames {
            metrics.log_summary();
            exporter.export_dye_png(&simulation, &output.join(format!("dye_{:04}.png", frame)))?;
            exporter.export_velocity_png(
                &simulation,
                &output.join(format!("velocity_{:04}.png", frame)),
            )?;
        }
    }

    recorder.log_trends();
    log::info!("exported {} frames to {}", frames, output.display());
    Ok(())
}

fn run_gui_app(config: Option<SolverConfig>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_title("dyeflow"),
        ..Default::default()
    };

    eframe::run_native(
        "dyeflow",
        options,
        Box::new(move |cc| Box::new(dyeflow::DesktopApp::new(cc, config))),
    )
    .map_err(|err| anyhow::anyhow!("desktop app failed: {err}"))
}
