//! Radial injection of velocity impulses and dye at force sites.

use glam::{Vec2, Vec3};

use crate::grid::Grid;
use crate::input::ForceSite;

/// Smooth compact falloff: 1 at the center, 0 from `radius` outward.
pub fn falloff(distance_sq: f32, radius: f32) -> f32 {
    let radius_sq = radius * radius;
    if radius_sq <= 0.0 || distance_sq >= radius_sq {
        return 0.0;
    }
    let t = 1.0 - distance_sq / radius_sq;
    t * t * t
}

/// Squared distance from a cell center to a site, measured in normalized
/// space with `x` stretched by the grid aspect ratio.
fn distance_sq(site: &ForceSite, x: usize, y: usize, width: usize, height: usize) -> f32 {
    let aspect = width as f32 / height as f32;
    let cell = Vec2::new(
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    );
    let offset = (cell - site.position) * Vec2::new(aspect, 1.0);
    offset.length_squared()
}

/// Site weight at a cell, before accumulation.
pub fn site_weight(site: &ForceSite, x: usize, y: usize, width: usize, height: usize) -> f32 {
    falloff(distance_sq(site, x, y, width, height), site.radius)
}

pub fn force_cell(
    velocity: &Grid<2>,
    sites: &[ForceSite],
    timestep: f32,
    x: usize,
    y: usize,
) -> [f32; 2] {
    let (width, height) = velocity.resolution();
    // Impulses are normalized displacements over one frame; the field stores
    // texels per second.
    let to_field = Vec2::new(width as f32, height as f32) / timestep.max(f32::EPSILON);

    let mut v = Vec2::from_array(velocity.get(x, y));
    for site in sites {
        let weight = site_weight(site, x, y, width, height);
        if weight > 0.0 {
            v += site.impulse * to_field * weight;
        }
    }
    v.to_array()
}

pub fn color_cell(dye: &Grid<3>, sites: &[ForceSite], x: usize, y: usize) -> [f32; 3] {
    let (width, height) = dye.resolution();

    let mut color = Vec3::from_array(dye.get(x, y));
    for site in sites {
        let weight = site_weight(site, x, y, width, height);
        if weight > 0.0 {
            color += Vec3::from_array(site.color) * weight;
        }
    }
    // Dye is display-only and saturates like an 8-bit target would.
    color.clamp(Vec3::ZERO, Vec3::ONE).to_array()
}

pub fn inject_force(velocity: &Grid<2>, sites: &[ForceSite], timestep: f32, out: &mut Grid<2>) {
    out.fill(|x, y| force_cell(velocity, sites, timestep, x, y));
}

pub fn inject_color(dye: &Grid<3>, sites: &[ForceSite], out: &mut Grid<3>) {
    out.fill(|x, y| color_cell(dye, sites, x, y));
}
