//! Pointer and touch tracking that turns raw contacts into force sites.

use glam::Vec2;

use crate::config::SolverConfig;

/// One active pointer or touch contact, as seen by the injection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSite {
    pub id: u64,
    /// Smoothed position in normalized `[0, 1]²` grid space, `y` up.
    pub position: Vec2,
    /// Smoothed displacement since the previous move, in normalized units.
    pub impulse: Vec2,
    /// Falloff radius, in normalized units of grid height.
    pub radius: f32,
    pub color: [f32; 3],
}

impl ForceSite {
    pub fn new(id: u64, position: Vec2, radius: f32, color: [f32; 3]) -> Self {
        Self {
            id,
            position,
            impulse: Vec2::ZERO,
            radius,
            color,
        }
    }

    pub fn with_impulse(mut self, impulse: Vec2) -> Self {
        self.impulse = impulse;
        self
    }
}

const DYE_PALETTE: [[f32; 3]; 6] = [
    [1.0, 0.2, 0.2],
    [0.2, 1.0, 0.3],
    [0.2, 0.4, 1.0],
    [1.0, 0.9, 0.2],
    [1.0, 0.2, 1.0],
    [0.2, 1.0, 1.0],
];

/// Owner of the active force sites. The solver only ever borrows
/// [`ForceSites::sites`] for the duration of one frame.
#[derive(Debug, Clone)]
pub struct ForceSites {
    sites: Vec<ForceSite>,
    radius: f32,
    smoothing: f32,
    next_color: usize,
}

impl Default for ForceSites {
    fn default() -> Self {
        Self::new(&SolverConfig::default())
    }
}

impl ForceSites {
    pub fn new(config: &SolverConfig) -> Self {
        let config = config.sanitized();
        Self {
            sites: Vec::new(),
            radius: config.radius,
            smoothing: config.smoothing,
            next_color: 0,
        }
    }

    /// Picks up radius and smoothing changes; active sites adopt the new
    /// radius immediately.
    pub fn configure(&mut self, config: &SolverConfig) {
        let config = config.sanitized();
        self.radius = config.radius;
        self.smoothing = config.smoothing;
        for site in &mut self.sites {
            site.radius = self.radius;
        }
    }

    pub fn sites(&self) -> &[ForceSite] {
        &self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn get(&self, id: u64) -> Option<&ForceSite> {
        self.sites.iter().find(|site| site.id == id)
    }

    /// Registers a new contact. A repeated start for a live id restarts it.
    pub fn on_force_start(&mut self, id: u64, position: Vec2) {
        self.sites.retain(|site| site.id != id);

        let color = DYE_PALETTE[self.next_color % DYE_PALETTE.len()];
        self.next_color += 1;

        self.sites
            .push(ForceSite::new(id, position, self.radius, color));
        log::trace!("force site {} started at {:?}", id, position);
    }

    /// Moves a contact: `smoothed = old * s + raw * (1 - s)`, and the impulse
    /// is the smoothed displacement. Unknown ids are ignored.
    pub fn on_force_move(&mut self, id: u64, position: Vec2) {
        let smoothing = self.smoothing;
        if let Some(site) = self.sites.iter_mut().find(|site| site.id == id) {
            let smoothed = site.position * smoothing + position * (1.0 - smoothing);
            site.impulse = smoothed - site.position;
            site.position = smoothed;
        }
    }

    /// Removes a contact on release or cancel. Unknown ids are ignored.
    pub fn on_force_end(&mut self, id: u64) {
        let before = self.sites.len();
        self.sites.retain(|site| site.id != id);
        if self.sites.len() != before {
            log::trace!("force site {} ended", id);
        }
    }

    /// Called once a frame has consumed the current impulses, so a contact
    /// that stops moving keeps depositing dye but adds no further force.
    pub fn frame_consumed(&mut self) {
        for site in &mut self.sites {
            site.impulse = Vec2::ZERO;
        }
    }

    pub fn clear(&mut self) {
        self.sites.clear();
    }
}
