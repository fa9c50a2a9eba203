//! Damage resolution scenarios run directly against the combat resolver.

use std::f32::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use glam::Vec2;
use rstest::rstest;
use skirmish::combat::{resolve_attacks, CombatContext};
use skirmish::rng::BattleRng;
use skirmish::{BattleConfig, HitTier, NoAdvantage, Side, Unit, UnitClass, UnitId, UnitTemplate};
use test_utils::unit;

fn flat_config() -> BattleConfig {
    BattleConfig {
        damage_variance: 0.0,
        ..BattleConfig::default()
    }
}

fn place(id: u32, side: Side, template: &UnitTemplate, at: Vec2, rotation: f32) -> Unit {
    Unit::from_template(UnitId(id), side, template, at, rotation)
}

/// Rotation that makes a unit at `at` face `towards`.
fn facing(at: Vec2, towards: Vec2) -> f32 {
    let d = towards - at;
    d.y.atan2(d.x)
}

#[test]
fn split_attack_deals_five_to_each_of_two_targets() {
    let config = flat_config();
    let attacker_t = unit(UnitClass::Light).atk(100.0).def(0.0).rng(50.0).build();
    let target_t = unit(UnitClass::Light).atk(0.0).def(0.0).hp(100.0).build();

    let origin = Vec2::new(200.0, 200.0);
    let north = Vec2::new(200.0, 230.0);
    let east = Vec2::new(230.0, 200.0);
    let mut units = vec![
        place(1, Side::Own, &attacker_t, origin, 0.0),
        place(2, Side::Enemy, &target_t, north, facing(north, origin)),
        place(3, Side::Enemy, &target_t, east, facing(east, origin)),
    ];

    let ctx = CombatContext {
        config: &config,
        advantage: &NoAdvantage,
        now: 0.0,
    };
    let report = resolve_attacks(&mut units, &ctx, &mut BattleRng::from_seed(9));

    let from_attacker: Vec<_> = report.hits.iter().filter(|h| h.attacker == UnitId(1)).collect();
    assert_eq!(from_attacker.len(), 2);
    for hit in &from_attacker {
        assert_relative_eq!(hit.atk_share, 50.0);
        assert_relative_eq!(hit.damage, 5.0, epsilon = 1e-4);
        assert_eq!(hit.tier, HitTier::Normal);
    }
    assert_relative_eq!(units[1].hp, 95.0, epsilon = 1e-4);
    assert_relative_eq!(units[2].hp, 95.0, epsilon = 1e-4);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[case(8)]
fn attack_shares_sum_to_the_attack_stat(#[case] targets: u32) {
    let config = flat_config();
    let attacker_t = unit(UnitClass::Ranged).atk(90.0).rng(60.0).build();
    let target_t = unit(UnitClass::Heavy).atk(0.0).build();
    let origin = Vec2::new(300.0, 300.0);

    let mut units = vec![place(1, Side::Own, &attacker_t, origin, 0.0)];
    for i in 0..targets {
        let angle = i as f32 * (2.0 * PI / targets as f32);
        let at = origin + Vec2::from_angle(angle) * 60.0;
        units.push(place(10 + i, Side::Enemy, &target_t, at, 0.0));
    }

    let ctx = CombatContext {
        config: &config,
        advantage: &NoAdvantage,
        now: 0.0,
    };
    let report = resolve_attacks(&mut units, &ctx, &mut BattleRng::from_seed(3));
    let shares: Vec<f32> = report
        .hits
        .iter()
        .filter(|h| h.attacker == UnitId(1))
        .map(|h| h.atk_share)
        .collect();
    assert_eq!(shares.len(), targets as usize);
    assert_relative_eq!(shares.iter().sum::<f32>(), 90.0, epsilon = 1e-3);
}

#[rstest]
#[case::touching(30.0)]
#[case::at_the_floor(40.0)]
fn contact_distance_is_always_in_reach(#[case] gap: f32) {
    let config = flat_config();
    assert_relative_eq!(config.attack_range_floor(), 40.0);
    let melee = unit(UnitClass::Light).rng(0.0).build();

    let a = Vec2::new(100.0, 100.0);
    let b = Vec2::new(100.0 + gap, 100.0);
    let mut units = vec![
        place(1, Side::Own, &melee, a, facing(a, b)),
        place(2, Side::Enemy, &melee, b, facing(b, a)),
    ];
    let ctx = CombatContext {
        config: &config,
        advantage: &NoAdvantage,
        now: 0.0,
    };
    let report = resolve_attacks(&mut units, &ctx, &mut BattleRng::from_seed(1));
    assert!(report.hits.iter().any(|h| h.attacker == UnitId(1)));
    assert!(report.hits.iter().any(|h| h.attacker == UnitId(2)));
}

#[test]
fn just_outside_the_floor_nobody_strikes() {
    let config = flat_config();
    let melee = unit(UnitClass::Light).rng(0.0).build();
    let mut units = vec![
        place(1, Side::Own, &melee, Vec2::new(100.0, 100.0), 0.0),
        place(2, Side::Enemy, &melee, Vec2::new(141.0, 100.0), PI),
    ];
    let ctx = CombatContext {
        config: &config,
        advantage: &NoAdvantage,
        now: 0.0,
    };
    let report = resolve_attacks(&mut units, &ctx, &mut BattleRng::from_seed(1));
    assert!(report.hits.is_empty());
    assert!(report.attackers.is_empty());
    assert!(units.iter().all(|u| u.last_attack_time == f32::NEG_INFINITY));
}

#[test]
fn blow_from_behind_earns_the_rear_bonus() {
    let config = flat_config();
    let attacker_t = unit(UnitClass::Light).atk(100.0).def(0.0).build();
    let target_t = unit(UnitClass::Light).atk(0.0).def(0.0).build();
    // The target faces north (-y) while the blow travels north too.
    let mut units = vec![
        place(1, Side::Own, &attacker_t, Vec2::new(100.0, 130.0), -FRAC_PI_2),
        place(2, Side::Enemy, &target_t, Vec2::new(100.0, 100.0), -FRAC_PI_2),
    ];
    let ctx = CombatContext {
        config: &config,
        advantage: &NoAdvantage,
        now: 0.0,
    };
    let report = resolve_attacks(&mut units, &ctx, &mut BattleRng::from_seed(1));
    let hit = report
        .hits
        .iter()
        .find(|h| h.attacker == UnitId(1))
        .expect("attacker lands a hit");
    assert_eq!(hit.tier, HitTier::Rear);
    assert_relative_eq!(hit.damage, 10.0 * config.rear_bonus, epsilon = 1e-4);
}
