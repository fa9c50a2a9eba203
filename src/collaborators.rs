//! Seams to the services a battle consumes but does not own.
//!
//! Sound playback, class metadata, class advantage and the unit detail popup
//! all live outside the simulation. Each has a no-frills default so a headless
//! battle needs nothing wired up.

use serde::Serialize;

use crate::snapshot::UnitView;
use crate::unit::UnitClass;

/// Named sound cues the battle asks the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// A unit struck.
    Attack,
    /// A unit fell.
    Death,
    /// A skill fired.
    Skill,
    /// The player won.
    Victory,
    /// The player lost.
    Defeat,
}

/// Host audio player.
#[cfg_attr(test, mockall::automock)]
pub trait SoundCues: Send + Sync {
    /// Plays `cue` once.
    fn play(&mut self, cue: SoundCue);
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl SoundCues for SilentCues {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Class-versus-class predicate used by damage resolution.
pub trait ClassAdvantage: Send + Sync {
    /// Whether `attacker` has the upper hand over `defender`.
    fn beats(&self, attacker: UnitClass, defender: UnitClass) -> bool;
}

/// Nobody beats anybody.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAdvantage;

impl ClassAdvantage for NoAdvantage {
    fn beats(&self, _attacker: UnitClass, _defender: UnitClass) -> bool {
        false
    }
}

/// Standard matchup table: cavalry runs down archers, archers shred heavy
/// infantry, heavy infantry stops cavalry, rogues stalk archers and light
/// infantry screens against rogues.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicAdvantage;

impl ClassAdvantage for ClassicAdvantage {
    fn beats(&self, attacker: UnitClass, defender: UnitClass) -> bool {
        matches!(
            (attacker, defender),
            (UnitClass::Cavalry, UnitClass::Ranged)
                | (UnitClass::Ranged, UnitClass::Heavy)
                | (UnitClass::Heavy, UnitClass::Cavalry)
                | (UnitClass::Rogue, UnitClass::Ranged)
                | (UnitClass::Light, UnitClass::Rogue)
        )
    }
}

/// Display metadata for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    /// Display name of the class.
    pub name: &'static str,
    /// CSS-style colour used for the unit body.
    pub color: &'static str,
    /// Single glyph drawn on the unit.
    pub glyph: char,
}

/// Class to display metadata lookup.
pub trait ClassCatalog: Send + Sync {
    /// Metadata for `class`.
    fn info(&self, class: UnitClass) -> ClassInfo;
}

/// Built-in class metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCatalog;

impl ClassCatalog for DefaultCatalog {
    fn info(&self, class: UnitClass) -> ClassInfo {
        let (name, color, glyph) = match class {
            UnitClass::Light => ("Light Infantry", "#8fbc8f", 'L'),
            UnitClass::Heavy => ("Heavy Infantry", "#708090", 'H'),
            UnitClass::Ranged => ("Archer", "#daa520", 'R'),
            UnitClass::Cavalry => ("Cavalry", "#cd853f", 'C'),
            UnitClass::Rogue => ("Rogue", "#9370db", 'G'),
            UnitClass::Special => ("Champion", "#dc143c", 'S'),
        };
        ClassInfo { name, color, glyph }
    }
}

/// Presenter for the read-only unit detail popup.
pub trait UnitInspector: Send + Sync {
    /// Shows details of `unit`. Must not feed back into the battle.
    fn inspect(&mut self, unit: &UnitView);
}

/// Drops inspection requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInspector;

impl UnitInspector for NoInspector {
    fn inspect(&mut self, _unit: &UnitView) {}
}

/// Called once with the final result when the battle concludes.
pub type CompletionCallback = Box<dyn FnOnce(crate::effects::BattleResult) + Send + Sync>;

/// Bundle of host services handed to a session.
pub struct Collaborators {
    /// Plays sound cues.
    pub sound: Box<dyn SoundCues>,
    /// Class matchup multipliers.
    pub advantage: Box<dyn ClassAdvantage>,
    /// Class display metadata.
    pub catalog: Box<dyn ClassCatalog>,
    /// Receives double-tap inspections.
    pub inspector: Box<dyn UnitInspector>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            sound: Box::new(SilentCues),
            advantage: Box::new(ClassicAdvantage),
            catalog: Box::new(DefaultCatalog),
            inspector: Box::new(NoInspector),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
