//! Presentation payloads produced by combat, and the aggregate tallies that
//! make up the final result.

use glam::Vec2;
use serde::Serialize;

use crate::config::BattleConfig;
use crate::skill::SkillKind;
use crate::unit::Side;

/// Visual burst categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Impact spark.
    Hit,
    /// Unit collapse.
    Death,
    /// Skill activation.
    Skill(SkillKind),
}

/// A short-lived visual effect anchored in the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    /// Field anchor.
    pub position: Vec2,
    /// Burst category.
    pub kind: EffectKind,
    /// Seconds elapsed.
    pub life: f32,
    /// Lifetime in seconds.
    pub max_life: f32,
}

/// How hard a hit landed; drives the colour of its damage number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTier {
    /// Plain frontal hit.
    Normal,
    /// Hit from the side.
    Flank,
    /// Hit from behind.
    Rear,
    /// Critical strike.
    Critical,
    /// Hit absorbed by immunity.
    Blocked,
}

impl HitTier {
    /// Text colour for damage numbers of this tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Normal => "#ffffff",
            Self::Flank => "#ffeb3b",
            Self::Rear => "#ff9800",
            Self::Critical => "#ff1744",
            Self::Blocked => "#90a4ae",
        }
    }

    /// Damage number text for a hit of `amount`.
    #[must_use]
    pub fn label(self, amount: f32) -> String {
        let shown = amount.round();
        match self {
            Self::Normal | Self::Flank => format!("-{shown}"),
            Self::Rear => format!("-{shown}!"),
            Self::Critical => format!("-{shown}!!"),
            Self::Blocked => "IMMUNE".to_owned(),
        }
    }
}

/// Rising combat text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingText {
    /// Field anchor of the text.
    pub position: Vec2,
    /// Rendered label.
    pub text: String,
    /// CSS-style text colour.
    pub color: &'static str,
    /// Seconds elapsed.
    pub life: f32,
    /// Lifetime in seconds.
    pub max_life: f32,
}

/// Live effects and texts; entries expire once `life >= max_life`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EffectLayer {
    /// Active bursts.
    pub effects: Vec<Effect>,
    /// Active floating texts.
    pub texts: Vec<FloatingText>,
}

impl EffectLayer {
    /// Spark at a struck unit.
    pub fn hit(&mut self, position: Vec2, config: &BattleConfig) {
        self.push_effect(position, EffectKind::Hit, config.hit_effect_seconds);
    }

    /// Burst where a unit fell, with a marker text.
    pub fn death(&mut self, position: Vec2, config: &BattleConfig) {
        self.push_effect(position, EffectKind::Death, config.death_effect_seconds);
        self.push_text(position, "DOWN".to_owned(), "#b0bec5", config);
    }

    /// Flash and label for an activated skill.
    pub fn skill(&mut self, position: Vec2, kind: SkillKind, config: &BattleConfig) {
        self.push_effect(position, EffectKind::Skill(kind), config.skill_effect_seconds);
        self.push_text(position, kind.label().to_owned(), "#40c4ff", config);
    }

    /// Damage number for a hit.
    pub fn damage(&mut self, position: Vec2, amount: f32, tier: HitTier, config: &BattleConfig) {
        self.push_text(position, tier.label(amount), tier.color(), config);
    }

    /// Ages every entry by `dt`, drifting texts upwards, and drops expired
    /// ones.
    pub fn advance(&mut self, dt: f32, config: &BattleConfig) {
        for effect in &mut self.effects {
            effect.life += dt;
        }
        for text in &mut self.texts {
            text.life += dt;
            text.position.y -= config.floating_text_rise * dt;
        }
        self.effects.retain(|e| e.life < e.max_life);
        self.texts.retain(|t| t.life < t.max_life);
    }

    /// Whether nothing is left to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.texts.is_empty()
    }

    fn push_effect(&mut self, position: Vec2, kind: EffectKind, max_life: f32) {
        self.effects.push(Effect {
            position,
            kind,
            life: 0.0,
            max_life,
        });
    }

    fn push_text(
        &mut self,
        position: Vec2,
        text: String,
        color: &'static str,
        config: &BattleConfig,
    ) {
        self.texts.push(FloatingText {
            position,
            text,
            color,
            life: 0.0,
            max_life: config.floating_text_seconds,
        });
    }
}

/// Running tallies from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BattleStats {
    /// Enemy units destroyed.
    pub kills: u32,
    /// Own units lost.
    pub losses: u32,
    /// Damage inflicted by own units.
    pub damage_dealt: f32,
    /// Damage suffered by own units.
    pub damage_taken: f32,
}

impl BattleStats {
    /// Accrues a hit of `amount` dealt by a unit of `attacker` side.
    pub fn record_hit(&mut self, attacker: Side, amount: f32) {
        match attacker {
            Side::Own => self.damage_dealt += amount,
            Side::Enemy => self.damage_taken += amount,
        }
    }

    /// Accrues the death of a unit of `fallen` side.
    pub fn record_death(&mut self, fallen: Side) {
        match fallen {
            Side::Enemy => self.kills += 1,
            Side::Own => self.losses += 1,
        }
    }
}

/// Final battle summary handed to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattleResult {
    /// Whether the player won.
    pub is_win: bool,
    /// Enemy units destroyed.
    pub kills: u32,
    /// Damage inflicted by own units.
    pub damage_dealt: f32,
    /// Damage suffered by own units.
    pub damage_taken: f32,
    /// Seconds spent in the battle phase.
    pub elapsed_seconds: f32,
}

impl BattleResult {
    /// Builds the result from the final tallies.
    #[must_use]
    pub fn from_stats(is_win: bool, stats: &BattleStats, elapsed_seconds: f32) -> Self {
        Self {
            is_win,
            kills: stats.kills,
            damage_dealt: stats.damage_dealt,
            damage_taken: stats.damage_taken,
            elapsed_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn entries_expire_after_their_lifetime() {
        let cfg = BattleConfig::default();
        let mut layer = EffectLayer::default();
        layer.hit(Vec2::ZERO, &cfg);
        layer.damage(Vec2::ZERO, 12.4, HitTier::Normal, &cfg);
        layer.advance(cfg.hit_effect_seconds * 0.5, &cfg);
        assert_eq!(layer.effects.len(), 1);
        layer.advance(cfg.hit_effect_seconds, &cfg);
        assert!(layer.effects.is_empty());
        assert_eq!(layer.texts.len(), 1);
        layer.advance(cfg.floating_text_seconds, &cfg);
        assert!(layer.is_empty());
    }

    #[rstest]
    fn texts_drift_upwards() {
        let cfg = BattleConfig::default();
        let mut layer = EffectLayer::default();
        layer.damage(Vec2::new(0.0, 100.0), 3.0, HitTier::Rear, &cfg);
        layer.advance(0.5, &cfg);
        assert_relative_eq!(layer.texts[0].position.y, 100.0 - cfg.floating_text_rise * 0.5);
    }

    #[rstest]
    #[case(HitTier::Normal, "-12")]
    #[case(HitTier::Rear, "-12!")]
    #[case(HitTier::Critical, "-12!!")]
    #[case(HitTier::Blocked, "IMMUNE")]
    fn labels_reflect_tier(#[case] tier: HitTier, #[case] expected: &str) {
        assert_eq!(tier.label(12.4), expected);
    }

    #[rstest]
    fn stats_attribute_by_side() {
        let mut stats = BattleStats::default();
        stats.record_hit(Side::Own, 5.0);
        stats.record_hit(Side::Enemy, 2.0);
        stats.record_death(Side::Enemy);
        stats.record_death(Side::Own);
        assert_relative_eq!(stats.damage_dealt, 5.0);
        assert_relative_eq!(stats.damage_taken, 2.0);
        assert_eq!((stats.kills, stats.losses), (1, 1));
    }
}
