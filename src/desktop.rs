use eframe::egui;
use glam::Vec2;

use crate::config::{
    COLOR_DECAY_RANGE, RADIUS_RANGE, SCALE_RANGE, SMOOTHING_RANGE, SolverConfig, Timestep,
};
use crate::input::ForceSites;
use crate::particles::ParticleSystem;
use crate::pressure::{MAX_ITERATIONS, MIN_ITERATIONS};
use crate::render::{ColorMode, Renderer, Visualize};
use crate::simulation::Simulation;

const STORAGE_KEY: &str = "dyeflow-config";
const MOUSE_ID: u64 = u64::MAX;
const PARTICLE_COUNT: usize = 4000;
const MAX_PARTICLES: usize = 20_000;

pub struct DesktopApp {
    config: SolverConfig,
    simulation: Simulation,
    sites: ForceSites,
    particles: ParticleSystem,
    particle_count: usize,
    show_particles: bool,
    visualize: Visualize,
    mode: ColorMode,
    texture: Option<egui::TextureHandle>,
    display_size: Vec2,
}

impl DesktopApp {
    /// A config passed in explicitly wins over the one persisted by eframe.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Option<SolverConfig>) -> Self {
        let config = config
            .or_else(|| cc.storage.and_then(|s| eframe::get_value(s, STORAGE_KEY)))
            .unwrap_or_default()
            .sanitize_and_report();

        let display_size = Vec2::new(800.0, 800.0);
        Self {
            simulation: Simulation::for_display(display_size, &config),
            sites: ForceSites::new(&config),
            particles: ParticleSystem::new(PARTICLE_COUNT, 0x5eed),
            particle_count: PARTICLE_COUNT,
            show_particles: false,
            visualize: Visualize::default(),
            mode: ColorMode::default(),
            texture: None,
            display_size,
            config,
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Simulation");

        let scale_changed = ui
            .add(
                egui::Slider::new(&mut self.config.scale, SCALE_RANGE.0..=SCALE_RANGE.1)
                    .step_by(0.1)
                    .text("Scale"),
            )
            .changed();
        if scale_changed {
            self.simulation.on_resize(self.display_size, &self.config);
        }

        ui.add(
            egui::Slider::new(&mut self.config.iterations, MIN_ITERATIONS..=MAX_ITERATIONS)
                .text("Iterations"),
        );
        ui.add(
            egui::Slider::new(
                &mut self.config.color_decay,
                COLOR_DECAY_RANGE.0..=COLOR_DECAY_RANGE.1,
            )
            .step_by(0.001)
            .text("Color decay"),
        );
        egui::ComboBox::from_label("Timestep")
            .selected_text(self.config.timestep.label())
            .show_ui(ui, |ui| {
                for timestep in Timestep::ALL {
                    ui.selectable_value(&mut self.config.timestep, timestep, timestep.label());
                }
            });
        ui.checkbox(&mut self.config.simulate, "Simulate");
        ui.checkbox(&mut self.config.boundaries, "Boundaries");
        if ui.button("Reset").clicked() {
            self.simulation.reset();
        }

        ui.separator();
        ui.heading("Input");
        let radius = ui.add(
            egui::Slider::new(&mut self.config.radius, RADIUS_RANGE.0..=RADIUS_RANGE.1)
                .step_by(0.1)
                .text("Radius"),
        );
        let smoothing = ui.add(
            egui::Slider::new(
                &mut self.config.smoothing,
                SMOOTHING_RANGE.0..=SMOOTHING_RANGE.1,
            )
            .step_by(0.05)
            .text("Smoothing"),
        );
        if radius.changed() || smoothing.changed() {
            self.sites.configure(&self.config);
        }

        ui.separator();
        ui.heading("Display");
        egui::ComboBox::from_label("Visualize")
            .selected_text(format!("{:?}", self.visualize))
            .show_ui(ui, |ui| {
                for visualize in Visualize::ALL {
                    ui.selectable_value(&mut self.visualize, visualize, format!("{:?}", visualize));
                }
            });
        egui::ComboBox::from_label("Mode")
            .selected_text(format!("{:?}", self.mode))
            .show_ui(ui, |ui| {
                for mode in ColorMode::ALL {
                    ui.selectable_value(&mut self.mode, mode, format!("{:?}", mode));
                }
            });
        ui.checkbox(&mut self.show_particles, "Particles");
        if ui
            .add_enabled(
                self.show_particles,
                egui::Slider::new(&mut self.particle_count, 0..=MAX_PARTICLES).text("Count"),
            )
            .changed()
        {
            self.particles.set_count(self.particle_count);
        }

        ui.separator();
        let (width, height) = self.simulation.resolution();
        ui.label(format!(
            "{}x{} cells | frame {} | {} contacts",
            width,
            height,
            self.simulation.frame(),
            self.sites.len()
        ));
    }

    fn handle_input(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let normalized = |pos: egui::Pos2| {
            Vec2::new(
                (pos.x - rect.left()) / rect.width(),
                1.0 - (pos.y - rect.top()) / rect.height(),
            )
        };

        let (pressed, down, released, pos, touching, events) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
                i.any_touches(),
                i.events.clone(),
            )
        });

        for event in events {
            if let egui::Event::Touch { id, phase, pos, .. } = event {
                match phase {
                    egui::TouchPhase::Start if rect.contains(pos) => {
                        self.sites.on_force_start(id.0, normalized(pos));
                    }
                    egui::TouchPhase::Move => self.sites.on_force_move(id.0, normalized(pos)),
                    egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                        self.sites.on_force_end(id.0)
                    }
                    _ => {}
                }
            }
        }

        // Touches also drive the emulated pointer; only track the mouse when
        // no finger is down.
        if !touching {
            if let Some(pos) = pos {
                if pressed && rect.contains(pos) {
                    self.sites.on_force_start(MOUSE_ID, normalized(pos));
                } else if down {
                    self.sites.on_force_move(MOUSE_ID, normalized(pos));
                }
            }
        }
        if released {
            self.sites.on_force_end(MOUSE_ID);
        }
    }

    fn paint(&mut self, ctx: &egui::Context, ui: &egui::Ui, rect: egui::Rect) {
        let (width, height) = self.simulation.resolution();
        let img = Renderer::new(width as u32, height as u32).render(
            &self.simulation,
            self.visualize,
            self.mode,
        );
        let image = egui::ColorImage::from_rgb([width, height], img.as_raw());

        if let Some(texture) = &mut self.texture {
            texture.set(image, egui::TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture("fluid", image, egui::TextureOptions::LINEAR));
        }
        let Some(texture) = &self.texture else {
            return;
        };

        let painter = ui.painter_at(rect);
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if self.show_particles {
            for particle in self.particles.visible() {
                let pos = egui::pos2(
                    rect.left() + particle.position.x * rect.width(),
                    rect.bottom() - particle.position.y * rect.height(),
                );
                let alpha = (particle.speed * 0.02 - 0.4).clamp(0.0, 1.0);
                let [r, g, b] = particle.color.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
                painter.circle_filled(
                    pos,
                    1.5 + particle.speed.min(100.0) * 0.02,
                    egui::Color32::from_rgba_unmultiplied(r, g, b, (alpha * 255.0) as u8),
                );
            }
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

                let display_size =
                    Vec2::new(rect.width(), rect.height()) * ctx.pixels_per_point();
                if display_size != self.display_size {
                    self.display_size = display_size;
                    self.simulation.on_resize(display_size, &self.config);
                }

                self.handle_input(ctx, rect);

                self.simulation.step(&self.config, self.sites.sites());
                self.sites.frame_consumed();

                if self.show_particles && self.config.simulate {
                    self.particles
                        .update(&self.simulation, self.config.timestep.seconds());
                }

                self.paint(ctx, ui, rect);
            });

        ctx.request_repaint();
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STORAGE_KEY, &self.config);
    }
}
