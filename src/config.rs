//! Runtime battle tuning.
//!
//! [`BattleConfig`] mirrors the constants in [`crate::constants`] so a
//! scenario file can override any subset of them. Unit stats are not
//! validated here; negative or zero `atk`/`def`/`spd`/`rng` pass straight
//! through to the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ADVANTAGE_MULT, ATTACK_INTERVAL_SECONDS, CRIT_MULT, DAMAGE_VARIANCE, DEATH_EFFECT_SECONDS,
    DOUBLE_TAP_SECONDS, ENGAGED_SPEED_FACTOR, FLANK_BONUS, FLOATING_TEXT_RISE,
    FLOATING_TEXT_SECONDS, GESTURE_SLOP, HEAL_FRACTION, HIT_EFFECT_SECONDS, INTRO_SECONDS,
    LONG_PRESS_SECONDS, MAX_TICK_SECONDS, MIN_DAMAGE, MIN_PUSH_MASS, MOVE_STOP_RADIUS,
    OUTRO_SECONDS, PUSH_RADIUS_FACTOR, PUSH_STIFFNESS, RANGE_MARGIN, RANGE_SCALE,
    RANGE_SKILL_MULT, REAR_BONUS, RUSH_SKILL_MULT, SKILL_EFFECT_SECONDS, SPEED_SCALE,
    TIMED_SKILL_SECONDS, TURN_RATE, UNIT_SIZE,
};
use crate::error::ConfigError;

/// Tunable parameters of a battle session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Intro length; units hold still until it ends.
    pub intro_seconds: f32,
    /// Outro length between the decision and the result.
    pub outro_seconds: f32,
    /// Longest frame delta the simulation accepts.
    pub max_tick_seconds: f32,
    /// Unit body diameter in pixels.
    pub unit_size: f32,
    /// Slack added to the diameter for the minimum attack range.
    pub range_margin: f32,
    /// Pixels per point of the range stat.
    pub range_scale: f32,
    /// Pixels per second per point of the speed stat.
    pub speed_scale: f32,
    /// Maximum turn in radians per second.
    pub turn_rate: f32,
    /// Distance at which a move order counts as arrived.
    pub move_stop_radius: f32,
    /// Speed multiplier while touching an enemy.
    pub engaged_speed_factor: f32,
    /// Separation radius as a fraction of the diameter.
    pub push_radius_factor: f32,
    /// Floor of the hit-point mass used for separation.
    pub min_push_mass: f32,
    /// Separation relaxation rate per second.
    pub push_stiffness: f32,
    /// Cooldown between two attacks of one unit.
    pub attack_interval_seconds: f32,
    /// Floor of the base damage of a hit.
    pub min_damage: f32,
    /// Half-width of the uniform damage roll.
    pub damage_variance: f32,
    /// Multiplier for hits on a target's back.
    pub rear_bonus: f32,
    /// Multiplier for hits on a target's flank.
    pub flank_bonus: f32,
    /// Multiplier when the attacker's class beats the target's.
    pub advantage_mult: f32,
    /// Multiplier of a primed ambush strike.
    pub crit_mult: f32,
    /// Share of max HP restored by second wind.
    pub heal_fraction: f32,
    /// Duration of timed skills.
    pub timed_skill_seconds: f32,
    /// Range multiplier while volley runs.
    pub range_skill_mult: f32,
    /// Speed multiplier while rush runs.
    pub rush_skill_mult: f32,
    /// Lifetime of a hit spark.
    pub hit_effect_seconds: f32,
    /// Lifetime of a death burst.
    pub death_effect_seconds: f32,
    /// Lifetime of a skill flash.
    pub skill_effect_seconds: f32,
    /// Lifetime of floating text.
    pub floating_text_seconds: f32,
    /// Upward drift of floating text in pixels per second.
    pub floating_text_rise: f32,
    /// Hold time that turns a press into an inspection.
    pub long_press_seconds: f32,
    /// Pointer travel that breaks a long press or double tap.
    pub gesture_slop: f32,
    /// Largest gap between the releases of a double tap.
    pub double_tap_seconds: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            intro_seconds: INTRO_SECONDS,
            outro_seconds: OUTRO_SECONDS,
            max_tick_seconds: MAX_TICK_SECONDS,
            unit_size: UNIT_SIZE,
            range_margin: RANGE_MARGIN,
            range_scale: RANGE_SCALE,
            speed_scale: SPEED_SCALE,
            turn_rate: TURN_RATE,
            move_stop_radius: MOVE_STOP_RADIUS,
            engaged_speed_factor: ENGAGED_SPEED_FACTOR,
            push_radius_factor: PUSH_RADIUS_FACTOR,
            min_push_mass: MIN_PUSH_MASS,
            push_stiffness: PUSH_STIFFNESS,
            attack_interval_seconds: ATTACK_INTERVAL_SECONDS,
            min_damage: MIN_DAMAGE,
            damage_variance: DAMAGE_VARIANCE,
            rear_bonus: REAR_BONUS,
            flank_bonus: FLANK_BONUS,
            advantage_mult: ADVANTAGE_MULT,
            crit_mult: CRIT_MULT,
            heal_fraction: HEAL_FRACTION,
            timed_skill_seconds: TIMED_SKILL_SECONDS,
            range_skill_mult: RANGE_SKILL_MULT,
            rush_skill_mult: RUSH_SKILL_MULT,
            hit_effect_seconds: HIT_EFFECT_SECONDS,
            death_effect_seconds: DEATH_EFFECT_SECONDS,
            skill_effect_seconds: SKILL_EFFECT_SECONDS,
            floating_text_seconds: FLOATING_TEXT_SECONDS,
            floating_text_rise: FLOATING_TEXT_RISE,
            long_press_seconds: LONG_PRESS_SECONDS,
            gesture_slop: GESTURE_SLOP,
            double_tap_seconds: DOUBLE_TAP_SECONDS,
        }
    }
}

impl BattleConfig {
    /// Minimum attack range: one unit diameter plus margin, so two units in
    /// contact can always strike each other.
    #[must_use]
    pub fn attack_range_floor(&self) -> f32 {
        self.unit_size + self.range_margin
    }

    /// Centre distance below which two units are pushed apart.
    #[must_use]
    pub fn push_radius(&self) -> f32 {
        self.push_radius_factor * self.unit_size
    }

    /// Half the unit diameter.
    #[must_use]
    pub fn unit_radius(&self) -> f32 {
        self.unit_size * 0.5
    }

    /// Checks that every duration and size is usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotPositive`] for the first non-positive or
    /// non-finite field and [`ConfigError::Variance`] for a variance outside
    /// `[0, 1)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("intro_seconds", self.intro_seconds),
            ("outro_seconds", self.outro_seconds),
            ("max_tick_seconds", self.max_tick_seconds),
            ("unit_size", self.unit_size),
            ("attack_interval_seconds", self.attack_interval_seconds),
            ("timed_skill_seconds", self.timed_skill_seconds),
            ("turn_rate", self.turn_rate),
            ("push_stiffness", self.push_stiffness),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(0.0..1.0).contains(&self.damage_variance) {
            return Err(ConfigError::Variance(self.damage_variance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn defaults_validate() {
        assert_eq!(BattleConfig::default().validate(), Ok(()));
    }

    #[rstest]
    fn derived_radii_follow_unit_size() {
        let cfg = BattleConfig::default();
        assert_relative_eq!(cfg.attack_range_floor(), UNIT_SIZE + RANGE_MARGIN);
        assert_relative_eq!(cfg.push_radius(), 27.0);
        assert_relative_eq!(cfg.unit_radius(), 15.0);
    }

    #[rstest]
    #[case::zero_intro(BattleConfig { intro_seconds: 0.0, ..BattleConfig::default() }, "intro_seconds")]
    #[case::nan_size(BattleConfig { unit_size: f32::NAN, ..BattleConfig::default() }, "unit_size")]
    #[case::negative_interval(
        BattleConfig { attack_interval_seconds: -1.0, ..BattleConfig::default() },
        "attack_interval_seconds"
    )]
    fn rejects_non_positive_fields(#[case] cfg: BattleConfig, #[case] expected: &str) {
        match cfg.validate() {
            Err(ConfigError::NotPositive { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected NotPositive for {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn rejects_full_variance() {
        let cfg = BattleConfig {
            damage_variance: 1.0,
            ..BattleConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Variance(1.0)));
    }

    #[rstest]
    fn partial_json_overrides_keep_defaults() {
        let cfg: BattleConfig =
            serde_json::from_str(r#"{ "intro_seconds": 0.5 }"#).expect("valid config json");
        assert_relative_eq!(cfg.intro_seconds, 0.5);
        assert_relative_eq!(cfg.outro_seconds, OUTRO_SECONDS);
    }
}
