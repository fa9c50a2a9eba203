//! Steering: destination choice, turning and forward motion.
//!
//! Units turn towards their destination at a bounded rate and only walk at
//! full pace when roughly facing it. Obstacles stop a step outright; there
//! is no sliding along their edge.

use glam::Vec2;
use hashbrown::HashMap;
use log::debug;
use ordered_float::OrderedFloat;

use crate::combat::effective_range;
use crate::config::BattleConfig;
use crate::geometry::{angle_between, bearing, heading_vector, normalize_angle};
use crate::terrain::{FieldSurface, MapDescriptor};
use crate::unit::{Order, Side, Unit, UnitId};

const HALF_TURN_ERROR: f32 = std::f32::consts::FRAC_PI_2;
const QUARTER_TURN_ERROR: f32 = std::f32::consts::FRAC_PI_4;
/// Distance tolerance for arrival. Chasers aim this far inside their reach
/// so rounding never parks them just outside it.
const ARRIVAL_SLACK: f32 = 1e-2;

/// Where a unit is heading this tick and how close it needs to get.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    /// Target point.
    pub point: Vec2,
    /// Distance at which the unit stops short of the point.
    pub stop_distance: f32,
    /// Whether reaching the point completes a move order.
    pub completes_move: bool,
}

/// Shared inputs for the steering pass.
pub struct SteeringContext<'a> {
    /// Tuning values.
    pub config: &'a BattleConfig,
    /// Terrain and obstacles.
    pub map: &'a MapDescriptor,
    /// Field bounds.
    pub surface: FieldSurface,
    /// Player units without orders seek enemies on their own.
    pub auto_mode: bool,
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    id: UnitId,
    side: Side,
    position: Vec2,
}

/// Speed factor from the angle between facing and desired heading.
#[must_use]
pub fn facing_factor(heading_error: f32) -> f32 {
    if heading_error > HALF_TURN_ERROR {
        0.0
    } else if heading_error >= QUARTER_TURN_ERROR {
        0.5
    } else {
        1.0
    }
}

/// Rotates `rotation` towards `desired` by at most `max_step` radians.
#[must_use]
pub fn turn_towards(rotation: f32, desired: f32, max_step: f32) -> f32 {
    let error = normalize_angle(desired - rotation);
    normalize_angle(rotation + error.clamp(-max_step, max_step))
}

/// Pace of `unit` in pixels per second before the facing factor.
#[must_use]
pub fn base_speed(unit: &Unit, ctx: &SteeringContext<'_>) -> f32 {
    let config = ctx.config;
    let mut speed = unit.stats.spd
        * config.speed_scale
        * ctx.map.speed_multiplier_at(unit.position)
        * unit.skill.speed_multiplier(config);
    if unit.engaged {
        speed *= config.engaged_speed_factor;
    }
    speed
}

/// Moves every living unit one tick towards its destination.
///
/// Target positions are read from the start of the pass. An attack order
/// whose target has vanished is dropped here.
pub fn steer_all(units: &mut [Unit], ctx: &SteeringContext<'_>, dt: f32) {
    let roster: Vec<Contact> = units
        .iter()
        .filter(|u| u.is_alive())
        .map(|u| Contact {
            id: u.id,
            side: u.side,
            position: u.position,
        })
        .collect();
    let positions: HashMap<UnitId, Vec2> = roster.iter().map(|c| (c.id, c.position)).collect();

    for unit in units.iter_mut().filter(|u| u.is_alive()) {
        if let Some(target) = unit.order.target() {
            if !positions.contains_key(&target) {
                debug!("{} lost target {target}", unit.id);
                unit.clear_order();
            }
        }
        if let Some(destination) = resolve_destination(unit, &roster, &positions, ctx) {
            advance(unit, destination, ctx, dt);
        }
    }
}

fn resolve_destination(
    unit: &Unit,
    roster: &[Contact],
    positions: &HashMap<UnitId, Vec2>,
    ctx: &SteeringContext<'_>,
) -> Option<Destination> {
    match unit.order {
        Order::MoveTo { x, y } => Some(Destination {
            point: Vec2::new(x, y),
            stop_distance: ctx.config.move_stop_radius,
            completes_move: true,
        }),
        Order::Attack { target } => positions.get(&target).map(|&point| Destination {
            point,
            stop_distance: chase_distance(unit, ctx.config),
            completes_move: false,
        }),
        Order::Idle if unit.side.is_ai() || ctx.auto_mode => {
            nearest_enemy(unit, roster).map(|contact| Destination {
                point: contact.position,
                stop_distance: chase_distance(unit, ctx.config),
                completes_move: false,
            })
        }
        Order::Idle => None,
    }
}

fn chase_distance(unit: &Unit, config: &BattleConfig) -> f32 {
    (effective_range(unit, config) - ARRIVAL_SLACK).max(0.0)
}

fn nearest_enemy<'r>(unit: &Unit, roster: &'r [Contact]) -> Option<&'r Contact> {
    roster
        .iter()
        .filter(|c| c.side != unit.side)
        .min_by_key(|c| OrderedFloat(c.position.distance_squared(unit.position)))
}

fn advance(unit: &mut Unit, destination: Destination, ctx: &SteeringContext<'_>, dt: f32) {
    let config = ctx.config;
    let to_goal = destination.point - unit.position;
    let distance = to_goal.length();

    if distance > f32::EPSILON {
        let desired = bearing(unit.position, destination.point);
        unit.rotation = turn_towards(unit.rotation, desired, config.turn_rate * dt);
    }

    if distance <= destination.stop_distance + ARRIVAL_SLACK {
        if destination.completes_move {
            unit.clear_order();
        }
        return;
    }

    let heading_error = angle_between(bearing(unit.position, destination.point), unit.rotation);
    let speed = base_speed(unit, ctx) * facing_factor(heading_error);
    let step = (speed * dt).min(distance - destination.stop_distance);
    if step <= 0.0 {
        return;
    }

    let next = unit.position + heading_vector(unit.rotation) * step;
    if ctx.map.is_blocked(next, config.unit_radius()) {
        return;
    }
    unit.position = ctx.surface.clamp(next, config.unit_radius());
}
