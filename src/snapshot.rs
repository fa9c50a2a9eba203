//! Read-only, draw-ready view of a battle.
//!
//! A snapshot is rebuilt from the session on demand and owns all its data,
//! so a renderer can keep it across frames without borrowing the session.

use serde::Serialize;

use crate::collaborators::ClassCatalog;
use crate::effects::{Effect, FloatingText};
use crate::phase::Phase;
use crate::skill::SkillState;
use crate::terrain::Obstacle;
use crate::unit::{Order, Side, Unit, UnitClass, UnitId};

/// Everything a renderer needs to draw one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitView {
    /// Stable unit id.
    pub id: UnitId,
    /// Army the unit fights for.
    pub side: Side,
    /// Archetype of the unit.
    pub class: UnitClass,
    /// Template name, falling back to the catalog's class name.
    pub label: String,
    /// Body colour from the catalog.
    pub color: &'static str,
    /// Glyph drawn on the body.
    pub glyph: char,
    /// Centre, horizontal pixels.
    pub x: f32,
    /// Centre, vertical pixels (down is positive).
    pub y: f32,
    /// Facing in radians.
    pub rotation: f32,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at deployment.
    pub max_hp: f32,
    /// `hp / max_hp` in `[0, 1]`, for the health bar.
    pub hp_ratio: f32,
    /// Touching an enemy this tick.
    pub engaged: bool,
    /// Skill bookkeeping, for cooldown and active markers.
    pub skill: SkillState,
    /// Current order, for destination markers.
    pub order: Order,
    /// Whether the player has this unit selected.
    pub selected: bool,
}

impl UnitView {
    /// Builds the view of `unit`, decorated from `catalog`.
    #[must_use]
    pub fn from_unit(unit: &Unit, catalog: &dyn ClassCatalog, selected: bool) -> Self {
        let info = catalog.info(unit.class);
        Self {
            id: unit.id,
            side: unit.side,
            class: unit.class,
            label: unit
                .name
                .clone()
                .unwrap_or_else(|| info.name.to_owned()),
            color: info.color,
            glyph: info.glyph,
            x: unit.position.x,
            y: unit.position.y,
            rotation: unit.rotation,
            hp: unit.hp,
            max_hp: unit.max_hp,
            hp_ratio: unit.hp_ratio(),
            engaged: unit.engaged,
            skill: unit.skill,
            order: unit.order,
            selected,
        }
    }
}

/// Full frame of battle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Seconds spent in the current phase.
    pub phase_timer: f32,
    /// Seconds of fighting so far.
    pub battle_elapsed: f32,
    /// Whether the player's idle units seek enemies on their own.
    pub auto_mode: bool,
    /// Player selection, if any.
    pub selected: Option<UnitId>,
    /// Player victory flag once the battle is decided; `None` while it runs.
    pub is_win: Option<bool>,
    /// Live units in deployment order.
    pub units: Vec<UnitView>,
    /// Static obstacles of the map.
    pub obstacles: Vec<Obstacle>,
    /// Live visual bursts.
    pub effects: Vec<Effect>,
    /// Live floating texts.
    pub texts: Vec<FloatingText>,
}
