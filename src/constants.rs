//! Battle tuning constants used across systems.
//!
//! These are the defaults mirrored by [`crate::config::BattleConfig`]; a
//! scenario may override any of them.

/// Length of the intro phase before units start moving, in seconds.
pub const INTRO_SECONDS: f32 = 2.0;
/// Length of the outro phase after an army is defeated, in seconds.
pub const OUTRO_SECONDS: f32 = 2.0;
/// Largest frame delta fed into a single tick.
///
/// Hosts that pause rendering (backgrounded tabs, debugger stops) deliver one
/// huge delta on resume; anything above this is clamped.
pub const MAX_TICK_SECONDS: f32 = 0.1;

/// Unit footprint diameter in pixels.
pub const UNIT_SIZE: f32 = 30.0;
/// Slack added to the unit diameter to form the minimum attack range.
pub const RANGE_MARGIN: f32 = 10.0;
/// Pixels per point of the `rng` stat.
pub const RANGE_SCALE: f32 = 1.5;
/// Pixels per second per point of the `spd` stat.
pub const SPEED_SCALE: f32 = 1.0;
/// Maximum turning rate in radians per second.
pub const TURN_RATE: f32 = 4.0;
/// Arrival radius for move orders.
pub const MOVE_STOP_RADIUS: f32 = 5.0;
/// Speed factor applied to units in contact with an enemy.
pub const ENGAGED_SPEED_FACTOR: f32 = 0.3;

/// Collision radius as a fraction of [`UNIT_SIZE`].
pub const PUSH_RADIUS_FACTOR: f32 = 0.9;
/// Lower bound on collision mass so nearly dead units stay pushable.
pub const MIN_PUSH_MASS: f32 = 10.0;
/// Relaxation stiffness of the separation pass, per second.
pub const PUSH_STIFFNESS: f32 = 8.0;

/// Seconds between two attacks of the same unit.
pub const ATTACK_INTERVAL_SECONDS: f32 = 1.0;
/// Smallest damage a single hit can deal before multipliers.
pub const MIN_DAMAGE: f32 = 1.0;
/// Half-width of the uniform damage variance band.
pub const DAMAGE_VARIANCE: f32 = 0.1;
/// Damage multiplier for hits landing on a target's back.
pub const REAR_BONUS: f32 = 1.2;
/// Damage multiplier for hits landing on a target's flank.
pub const FLANK_BONUS: f32 = 1.1;
/// Damage multiplier when the attacker's class beats the target's class.
pub const ADVANTAGE_MULT: f32 = 1.5;
/// Damage multiplier of a primed critical strike.
pub const CRIT_MULT: f32 = 3.0;

/// Fraction of max HP restored by the instant heal skill.
pub const HEAL_FRACTION: f32 = 0.3;
/// Duration of timed skills in seconds.
pub const TIMED_SKILL_SECONDS: f32 = 10.0;
/// Range multiplier while the ranged skill is active.
pub const RANGE_SKILL_MULT: f32 = 2.5;
/// Speed multiplier while the rush skill is active.
pub const RUSH_SKILL_MULT: f32 = 3.0;

/// Lifetime of a hit spark.
pub const HIT_EFFECT_SECONDS: f32 = 0.3;
/// Lifetime of a death burst.
pub const DEATH_EFFECT_SECONDS: f32 = 0.8;
/// Lifetime of a skill activation flash.
pub const SKILL_EFFECT_SECONDS: f32 = 0.5;
/// Lifetime of floating combat text.
pub const FLOATING_TEXT_SECONDS: f32 = 1.0;
/// Upward drift of floating text in pixels per second.
pub const FLOATING_TEXT_RISE: f32 = 30.0;

/// Hold time after which a press becomes an inspection gesture.
pub const LONG_PRESS_SECONDS: f32 = 0.5;
/// Pointer travel that cancels a long press and breaks a double tap.
pub const GESTURE_SLOP: f32 = 10.0;
/// Maximum gap between two releases forming a double tap.
pub const DOUBLE_TAP_SECONDS: f32 = 0.3;
