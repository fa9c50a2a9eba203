//! Battle phase state machine: intro, fighting, outro, done.

use log::info;
use serde::Serialize;

use crate::config::BattleConfig;

/// Overall battle progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Intro: only timers and effects advance.
    Start,
    /// Full simulation.
    Battle,
    /// Outro after a side fell: only effects advance.
    End,
    /// The result has been delivered.
    Finished,
}

/// Phase change reported by [`PhaseMachine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The intro ran out.
    BattleStarted,
    /// The outro ran out; the result is due.
    Concluded {
        /// Whether the player won.
        is_win: bool,
    },
}

/// Outcome check, enemy first: if both armies fall on the same tick the
/// player wins.
#[must_use]
pub const fn judge(enemy_defeated: bool, own_defeated: bool) -> Option<bool> {
    if enemy_defeated {
        Some(true)
    } else if own_defeated {
        Some(false)
    } else {
        None
    }
}

/// Timers and current phase of one battle.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseMachine {
    phase: Phase,
    /// Seconds spent in the current phase.
    timer: f32,
    /// Seconds spent in the battle phase overall.
    battle_elapsed: f32,
    outcome: Option<bool>,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self {
            phase: Phase::Start,
            timer: 0.0,
            battle_elapsed: 0.0,
            outcome: None,
        }
    }
}

impl PhaseMachine {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds spent in the current phase.
    #[must_use]
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Battle clock: seconds of actual fighting so far.
    #[must_use]
    pub const fn battle_elapsed(&self) -> f32 {
        self.battle_elapsed
    }

    /// Winner flag once the battle has been decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    /// Advances the phase timers by `dt`.
    pub fn advance(&mut self, dt: f32, config: &BattleConfig) -> Option<Transition> {
        match self.phase {
            Phase::Start => {
                self.timer += dt;
                (self.timer >= config.intro_seconds).then(|| {
                    self.enter(Phase::Battle);
                    Transition::BattleStarted
                })
            }
            Phase::Battle => {
                self.timer += dt;
                self.battle_elapsed += dt;
                None
            }
            Phase::End => {
                self.timer += dt;
                if self.timer < config.outro_seconds {
                    return None;
                }
                let is_win = self.outcome?;
                self.enter(Phase::Finished);
                Some(Transition::Concluded { is_win })
            }
            Phase::Finished => None,
        }
    }

    /// Moves `Battle` to `End` with the given outcome.
    ///
    /// Returns `false`, changing nothing, outside the battle phase, so the
    /// end of a battle can only be declared once.
    pub fn declare_outcome(&mut self, is_win: bool) -> bool {
        if self.phase != Phase::Battle {
            return false;
        }
        self.outcome = Some(is_win);
        self.enter(Phase::End);
        true
    }

    fn enter(&mut self, phase: Phase) {
        info!("battle phase {:?} -> {phase:?}", self.phase);
        self.phase = phase;
        self.timer = 0.0;
    }
}
