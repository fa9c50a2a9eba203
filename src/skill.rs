//! One-shot class skills.
//!
//! Every unit may fire its class skill once per battle. Instant skills
//! resolve on activation, the critical strike waits for the next hit, and
//! the remaining skills run on a timer that ticks down each frame.

use serde::Serialize;

use crate::config::BattleConfig;
use crate::unit::{Unit, UnitClass};

/// Skill variants, one per class family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Light infantry: instant partial self-heal.
    SecondWind,
    /// Rogue and special units: next successful hit deals triple damage.
    Ambush,
    /// Heavy infantry: immune to damage for a while.
    Fortress,
    /// Ranged units: greatly extended attack range for a while.
    Volley,
    /// Cavalry: tripled movement speed for a while.
    Rush,
}

impl SkillKind {
    /// Skill granted to `class`.
    #[must_use]
    pub const fn for_class(class: UnitClass) -> Self {
        match class {
            UnitClass::Light => Self::SecondWind,
            UnitClass::Rogue | UnitClass::Special => Self::Ambush,
            UnitClass::Heavy => Self::Fortress,
            UnitClass::Ranged => Self::Volley,
            UnitClass::Cavalry => Self::Rush,
        }
    }

    /// Duration of timed skills; `None` for instant or hit-triggered ones.
    #[must_use]
    pub fn duration(self, config: &BattleConfig) -> Option<f32> {
        match self {
            Self::SecondWind | Self::Ambush => None,
            Self::Fortress | Self::Volley | Self::Rush => Some(config.timed_skill_seconds),
        }
    }

    /// Short label shown when the skill fires.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SecondWind => "SECOND WIND",
            Self::Ambush => "AMBUSH",
            Self::Fortress => "FORTRESS",
            Self::Volley => "VOLLEY",
            Self::Rush => "RUSH",
        }
    }
}

/// Per-unit skill bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SkillState {
    /// Currently running skill; cleared when it ends or is consumed.
    pub kind: Option<SkillKind>,
    /// Whether the skill is running.
    pub active: bool,
    /// Seconds left for timed skills.
    pub timer: f32,
    /// Set on activation and never reset.
    pub used: bool,
}

impl SkillState {
    /// Whether `kind` is currently running.
    #[must_use]
    pub fn is_running(&self, kind: SkillKind) -> bool {
        self.active && self.kind == Some(kind)
    }

    /// Movement multiplier contributed by the running skill.
    #[must_use]
    pub fn speed_multiplier(&self, config: &BattleConfig) -> f32 {
        if self.is_running(SkillKind::Rush) {
            config.rush_skill_mult
        } else {
            1.0
        }
    }

    /// Range multiplier contributed by the running skill.
    #[must_use]
    pub fn range_multiplier(&self, config: &BattleConfig) -> f32 {
        if self.is_running(SkillKind::Volley) {
            config.range_skill_mult
        } else {
            1.0
        }
    }

    /// Whether incoming damage is ignored.
    #[must_use]
    pub fn is_immune(&self) -> bool {
        self.is_running(SkillKind::Fortress)
    }

    /// Consumes a primed critical strike, returning whether one was primed.
    pub fn take_crit(&mut self) -> bool {
        if self.is_running(SkillKind::Ambush) {
            self.end();
            true
        } else {
            false
        }
    }

    /// Advances timed skills, ending them when their timer runs out.
    ///
    /// Returns the skill that expired this tick.
    pub fn tick(&mut self, dt: f32, config: &BattleConfig) -> Option<SkillKind> {
        let kind = self.kind.filter(|_| self.active)?;
        kind.duration(config)?;
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.end();
            Some(kind)
        } else {
            None
        }
    }

    fn end(&mut self) {
        self.active = false;
        self.kind = None;
        self.timer = 0.0;
    }
}

/// Result of a skill activation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillActivation {
    /// The skill fired.
    Activated(SkillKind),
    /// The unit already spent its skill this battle.
    AlreadyUsed,
    /// No living unit with that id.
    UnknownUnit,
    /// Skills only fire while the battle phase runs.
    NotInBattle,
}

/// Fires the class skill of `unit`.
///
/// A spent skill is a no-op returning [`SkillActivation::AlreadyUsed`], even
/// after a timed skill has run out.
pub fn activate(unit: &mut Unit, config: &BattleConfig) -> SkillActivation {
    if !unit.is_alive() {
        return SkillActivation::UnknownUnit;
    }
    if unit.skill.used {
        return SkillActivation::AlreadyUsed;
    }
    unit.skill.used = true;
    let kind = SkillKind::for_class(unit.class);
    match kind {
        SkillKind::SecondWind => apply_second_wind(unit, config),
        SkillKind::Ambush => prime_ambush(&mut unit.skill),
        SkillKind::Fortress | SkillKind::Volley | SkillKind::Rush => {
            start_timed(&mut unit.skill, kind, config);
        }
    }
    SkillActivation::Activated(kind)
}

fn apply_second_wind(unit: &mut Unit, config: &BattleConfig) {
    unit.heal(unit.max_hp * config.heal_fraction);
    unit.skill.active = false;
    unit.skill.kind = None;
}

fn prime_ambush(skill: &mut SkillState) {
    skill.kind = Some(SkillKind::Ambush);
    skill.active = true;
    skill.timer = 0.0;
}

fn start_timed(skill: &mut SkillState, kind: SkillKind, config: &BattleConfig) {
    skill.kind = Some(kind);
    skill.active = true;
    skill.timer = kind.duration(config).unwrap_or_default();
}
