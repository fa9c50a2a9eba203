//! Pairwise unit separation.
//!
//! Overlapping units are relaxed apart a little each tick rather than
//! solved exactly. Each unit of a pair moves by the other's share of the
//! combined mass, where mass is current HP floored at a minimum, so wounded
//! units get shoved around more. Touching enemies become `engaged` for the
//! tick.

use glam::Vec2;

use crate::config::BattleConfig;
use crate::terrain::FieldSurface;
use crate::unit::Unit;

/// Collision mass of `unit`.
#[must_use]
pub fn push_mass(unit: &Unit, config: &BattleConfig) -> f32 {
    unit.hp.max(config.min_push_mass)
}

/// Clears last tick's engagement flags and separates every overlapping pair
/// of living units.
pub fn separate(units: &mut [Unit], config: &BattleConfig, surface: FieldSurface, dt: f32) {
    for unit in units.iter_mut() {
        unit.engaged = false;
    }

    let push_radius = config.push_radius();
    let relax = (config.push_stiffness * dt).clamp(0.0, 1.0);

    for second in 1..units.len() {
        let (head, tail) = units.split_at_mut(second);
        let Some(b) = tail.first_mut() else {
            continue;
        };
        if !b.is_alive() {
            continue;
        }
        for a in head.iter_mut().filter(|u| u.is_alive()) {
            let offset = b.position - a.position;
            let distance = offset.length();
            if distance >= push_radius {
                continue;
            }
            if a.side != b.side {
                a.engaged = true;
                b.engaged = true;
            }

            let axis = if distance > f32::EPSILON {
                offset / distance
            } else {
                Vec2::X
            };
            let overlap = push_radius - distance;
            let mass_a = push_mass(a, config);
            let mass_b = push_mass(b, config);
            let total = mass_a + mass_b;
            let shove_a = overlap * (mass_b / total) * relax;
            let shove_b = overlap * (mass_a / total) * relax;
            a.position = surface.clamp(a.position - axis * shove_a, config.unit_radius());
            b.position = surface.clamp(b.position + axis * shove_b, config.unit_radius());
        }
    }
}
