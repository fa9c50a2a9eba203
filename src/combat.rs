//! Damage resolution.
//!
//! Attacks are area strikes: an attacker off cooldown hits every living
//! enemy inside its effective range, splitting its attack evenly between
//! them. Each share then runs through the damage pipeline:
//!
//! 1. base: `max(0.1 * (share - def), 0.05 * share)`, floored at the
//!    configured minimum damage;
//! 2. directional bonus from where the blow lands relative to the target's
//!    facing;
//! 3. uniform variance;
//! 4. class advantage;
//! 5. a primed critical strike, consumed by the first hit it applies to.
//!
//! Terrain attack modifiers do not enter the pipeline.

use glam::Vec2;
use log::trace;

use crate::collaborators::ClassAdvantage;
use crate::config::BattleConfig;
use crate::effects::HitTier;
use crate::geometry::{angle_between, bearing};
use crate::rng::BattleRng;
use crate::unit::{Side, Unit, UnitId};

const REAR_ARC: f32 = std::f32::consts::FRAC_PI_4;
const FLANK_ARC: f32 = 3.0 * std::f32::consts::FRAC_PI_4;

/// Reach of `unit`'s attack: stat range scaled to pixels, never shorter
/// than contact distance, then stretched by an active range skill.
#[must_use]
pub fn effective_range(unit: &Unit, config: &BattleConfig) -> f32 {
    (unit.stats.rng * config.range_scale).max(config.attack_range_floor())
        * unit.skill.range_multiplier(config)
}

/// Portion of `atk` each of `targets` receives. Zero targets get nothing.
#[must_use]
pub fn atk_share(atk: f32, targets: usize) -> f32 {
    if targets == 0 {
        return 0.0;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "Target counts are tiny compared to f32 mantissa range."
    )]
    let count = targets as f32;
    atk / count
}

/// Pre-multiplier damage for one share against `def`.
#[must_use]
pub fn base_damage(share: f32, def: f32, config: &BattleConfig) -> f32 {
    (0.1 * (share - def))
        .max(0.05 * share)
        .max(config.min_damage)
}

/// Directional bonus for a blow travelling from `attacker` to a target at
/// `target` facing `target_rotation`.
///
/// A blow travelling the same way the target faces lands on its back.
#[must_use]
pub fn directional_bonus(
    attacker: Vec2,
    target: Vec2,
    target_rotation: f32,
    config: &BattleConfig,
) -> (f32, HitTier) {
    let incoming = bearing(attacker, target);
    let diff = angle_between(incoming, target_rotation);
    if diff < REAR_ARC {
        (config.rear_bonus, HitTier::Rear)
    } else if diff < FLANK_ARC {
        (config.flank_bonus, HitTier::Flank)
    } else {
        (1.0, HitTier::Normal)
    }
}

/// One landed blow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Unit that struck.
    pub attacker: UnitId,
    /// Side of the attacker.
    pub attacker_side: Side,
    /// Unit that was struck.
    pub target: UnitId,
    /// Target position when struck.
    pub position: Vec2,
    /// Attack share spent on this target.
    pub atk_share: f32,
    /// Damage subtracted from the target's HP.
    pub damage: f32,
    /// Severity of the hit.
    pub tier: HitTier,
}

/// Everything the attack pass produced in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    /// Blows landed this tick, in resolution order.
    pub hits: Vec<HitRecord>,
    /// Units that attacked this tick, in resolution order.
    pub attackers: Vec<UnitId>,
}

/// Inputs shared by every attack in one tick.
pub struct CombatContext<'a> {
    /// Tuning values.
    pub config: &'a BattleConfig,
    /// Class matchup multipliers.
    pub advantage: &'a dyn ClassAdvantage,
    /// Battle clock reading for cooldown checks.
    pub now: f32,
}

/// Resolves the attacks of every unit whose cooldown has elapsed.
///
/// Units are resolved in slice order; a target killed by an earlier attacker
/// is no longer a valid target for later ones. Dead units stay in the slice
/// for the caller to compact.
pub fn resolve_attacks(
    units: &mut [Unit],
    ctx: &CombatContext<'_>,
    rng: &mut BattleRng,
) -> CombatReport {
    let mut report = CombatReport::default();
    for attacker_idx in 0..units.len() {
        let Some(targets) = valid_targets(units, attacker_idx, ctx) else {
            continue;
        };
        let share = units
            .get(attacker_idx)
            .map_or(0.0, |u| atk_share(u.stats.atk, targets.len()));
        for target_idx in targets {
            if let Some(hit) = strike(units, attacker_idx, target_idx, share, ctx, rng) {
                report.hits.push(hit);
            }
        }
        if let Some(attacker) = units.get_mut(attacker_idx) {
            attacker.last_attack_time = ctx.now;
            report.attackers.push(attacker.id);
        }
    }
    report
}

fn valid_targets(units: &[Unit], attacker_idx: usize, ctx: &CombatContext<'_>) -> Option<Vec<usize>> {
    let attacker = units.get(attacker_idx)?;
    if !attacker.is_alive()
        || ctx.now - attacker.last_attack_time < ctx.config.attack_interval_seconds
    {
        return None;
    }
    let range = effective_range(attacker, ctx.config);
    let targets: Vec<usize> = units
        .iter()
        .enumerate()
        .filter(|(_, u)| {
            u.side != attacker.side
                && u.is_alive()
                && u.position.distance(attacker.position) <= range
        })
        .map(|(idx, _)| idx)
        .collect();
    (!targets.is_empty()).then_some(targets)
}

fn strike(
    units: &mut [Unit],
    attacker_idx: usize,
    target_idx: usize,
    share: f32,
    ctx: &CombatContext<'_>,
    rng: &mut BattleRng,
) -> Option<HitRecord> {
    let config = ctx.config;
    let (attacker_id, attacker_side, attacker_class, attacker_pos) = {
        let a = units.get(attacker_idx)?;
        (a.id, a.side, a.class, a.position)
    };
    let target = units.get(target_idx)?;
    let (target_id, target_pos) = (target.id, target.position);

    let (damage, tier) = if target.skill.is_immune() {
        (0.0, HitTier::Blocked)
    } else {
        let (directional, mut tier) =
            directional_bonus(attacker_pos, target_pos, target.rotation, config);
        let mut damage = base_damage(share, target.stats.def, config)
            * directional
            * rng.variance(config.damage_variance);
        if ctx.advantage.beats(attacker_class, target.class) {
            damage *= config.advantage_mult;
        }
        if units.get_mut(attacker_idx)?.skill.take_crit() {
            damage *= config.crit_mult;
            tier = HitTier::Critical;
        }
        (damage, tier)
    };

    let target = units.get_mut(target_idx)?;
    target.take_damage(damage);
    if target.is_alive() && target.order.is_idle() {
        target.set_attack_target(attacker_id);
    }
    trace!(
        "hit {attacker_id} -> {target_id}: share={share:.2} dmg={damage:.2} tier={tier:?} hp={:.1}",
        target.hp
    );

    Some(HitRecord {
        attacker: attacker_id,
        attacker_side,
        target: target_id,
        position: target_pos,
        atk_share: share,
        damage,
        tier,
    })
}
