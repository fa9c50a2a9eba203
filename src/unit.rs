//! Combatants, their orders and the decks they are deployed from.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::normalize_angle;
use crate::skill::SkillState;

/// Stable identifier of a deployed unit.
///
/// Orders refer to targets by id; a lookup that misses means the target is
/// gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Raw numeric id.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Army allegiance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Player-directed army.
    Own,
    /// AI-controlled army.
    Enemy,
}

impl Side {
    /// Whether units of this side pick targets without orders regardless of
    /// auto-mode.
    #[must_use]
    pub const fn is_ai(self) -> bool {
        matches!(self, Self::Enemy)
    }
}

/// Unit archetype; selects the skill and class-advantage relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    /// Fast skirmisher.
    Light,
    /// Armoured line unit.
    Heavy,
    /// Archer.
    Ranged,
    /// Mounted charger.
    Cavalry,
    /// Flanker.
    Rogue,
    /// Rare elite.
    Special,
}

/// Combat statistics of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Attack power.
    pub atk: f32,
    /// Flat damage reduction.
    pub def: f32,
    /// Movement speed in field units per second.
    pub spd: f32,
    /// Attack reach beyond body contact.
    pub rng: f32,
}

/// What a unit is currently pursuing.
///
/// An attack target and a move point cannot coexist; assigning one replaces
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Order {
    /// No order: idle, or autonomous seeking for AI and auto-mode units.
    #[default]
    Idle,
    /// Chase and attack the unit with this id.
    Attack { target: UnitId },
    /// Walk to a point.
    MoveTo { x: f32, y: f32 },
}

impl Order {
    /// Move order towards `point`.
    #[must_use]
    pub const fn move_to(point: Vec2) -> Self {
        Self::MoveTo {
            x: point.x,
            y: point.y,
        }
    }

    /// Attack target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<UnitId> {
        match self {
            Self::Attack { target } => Some(*target),
            _ => None,
        }
    }

    /// Move destination, if any.
    #[must_use]
    pub const fn move_point(&self) -> Option<Vec2> {
        match self {
            Self::MoveTo { x, y } => Some(Vec2::new(*x, *y)),
            _ => None,
        }
    }

    /// Whether the unit has no order.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Deck entry describing a unit before deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Unit class.
    pub class: UnitClass,
    /// Attack power.
    pub atk: f32,
    /// Flat damage reduction.
    pub def: f32,
    /// Movement speed.
    pub spd: f32,
    /// Attack reach.
    pub rng: f32,
    /// Starting hit points.
    pub hp: f32,
}

impl UnitTemplate {
    /// Stat block of the template.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        Stats {
            atk: self.atk,
            def: self.def,
            spd: self.spd,
            rng: self.rng,
        }
    }
}

/// A deployed combatant.
#[derive(Debug, Clone)]
pub struct Unit {
    /// Stable identifier.
    pub id: UnitId,
    /// Side the unit fights for.
    pub side: Side,
    /// Unit class.
    pub class: UnitClass,
    /// Optional display name.
    pub name: Option<String>,
    /// Centre on the field.
    pub position: Vec2,
    /// Facing in radians, kept in `(-PI, PI]`.
    pub rotation: f32,
    /// Combat statistics.
    pub stats: Stats,
    /// Current hit points.
    pub hp: f32,
    /// Hit points at deployment.
    pub max_hp: f32,
    /// Current order.
    pub order: Order,
    /// Battle clock reading of the last successful attack.
    pub last_attack_time: f32,
    /// Skill bookkeeping.
    pub skill: SkillState,
    /// Set by the collision pass when touching an enemy; lives one tick.
    pub engaged: bool,
}

impl Unit {
    /// Deploys `template` at `position` facing `rotation`.
    #[must_use]
    pub fn from_template(
        id: UnitId,
        side: Side,
        template: &UnitTemplate,
        position: Vec2,
        rotation: f32,
    ) -> Self {
        let max_hp = template.hp;
        Self {
            id,
            side,
            class: template.class,
            name: template.name.clone(),
            position,
            rotation: normalize_angle(rotation),
            stats: template.stats(),
            hp: max_hp,
            max_hp,
            order: Order::Idle,
            last_attack_time: f32::NEG_INFINITY,
            skill: SkillState::default(),
            engaged: false,
        }
    }

    /// Whether the unit still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Remaining hit points as a fraction of max.
    #[must_use]
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Subtracts `amount`, never dropping below zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
    }

    /// Adds `amount`, never exceeding max.
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).clamp(0.0, self.max_hp);
    }

    /// Replaces the current order with an attack on `target`.
    pub fn set_attack_target(&mut self, target: UnitId) {
        self.order = Order::Attack { target };
    }

    /// Replaces the current order with a move to `point`.
    pub fn set_move_point(&mut self, point: Vec2) {
        self.order = Order::move_to(point);
    }

    /// Drops any order.
    pub fn clear_order(&mut self) {
        self.order = Order::Idle;
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DeckSlot {
    template: UnitTemplate,
    deployed: bool,
}

/// Ordered deck of unit templates for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct Army {
    slots: Vec<DeckSlot>,
}

impl Army {
    /// Deck with every template still in reserve.
    #[must_use]
    pub fn new(templates: Vec<UnitTemplate>) -> Self {
        Self {
            slots: templates
                .into_iter()
                .map(|template| DeckSlot {
                    template,
                    deployed: false,
                })
                .collect(),
        }
    }

    /// Whether every template has spawned its unit.
    #[must_use]
    pub fn all_deployed(&self) -> bool {
        self.slots.iter().all(|slot| slot.deployed)
    }

    /// Marks every reserve template deployed and returns them with their deck
    /// index. Each template is yielded once over the deck's lifetime.
    pub fn deploy_reserve(&mut self) -> Vec<(usize, UnitTemplate)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| !slot.deployed)
            .map(|(index, slot)| {
                slot.deployed = true;
                (index, slot.template.clone())
            })
            .collect()
    }

    /// Defeat test: fully deployed and no survivors on the field.
    #[must_use]
    pub fn is_defeated(&self, live_units: usize) -> bool {
        self.all_deployed() && live_units == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn template() -> UnitTemplate {
        UnitTemplate {
            name: Some("pike".into()),
            class: UnitClass::Heavy,
            atk: 20.0,
            def: 5.0,
            spd: 40.0,
            rng: 10.0,
            hp: 100.0,
        }
    }

    #[rstest]
    fn hp_is_clamped_both_ways(template: UnitTemplate) {
        let mut unit = Unit::from_template(UnitId(1), Side::Own, &template, Vec2::ZERO, 0.0);
        unit.take_damage(250.0);
        assert_relative_eq!(unit.hp, 0.0);
        assert!(!unit.is_alive());
        unit.heal(500.0);
        assert_relative_eq!(unit.hp, unit.max_hp);
    }

    #[rstest]
    fn orders_replace_each_other(template: UnitTemplate) {
        let mut unit = Unit::from_template(UnitId(1), Side::Own, &template, Vec2::ZERO, 0.0);
        unit.set_attack_target(UnitId(9));
        assert_eq!(unit.order.target(), Some(UnitId(9)));
        unit.set_move_point(Vec2::new(3.0, 4.0));
        assert_eq!(unit.order.target(), None);
        assert_eq!(unit.order.move_point(), Some(Vec2::new(3.0, 4.0)));
        unit.set_attack_target(UnitId(2));
        assert_eq!(unit.order.move_point(), None);
        unit.clear_order();
        assert!(unit.order.is_idle());
    }

    #[rstest]
    fn deck_deploys_each_template_once(template: UnitTemplate) {
        let mut army = Army::new(vec![template.clone(), template]);
        assert!(!army.all_deployed());
        assert_eq!(army.deploy_reserve().len(), 2);
        assert!(army.deploy_reserve().is_empty());
        assert!(army.all_deployed());
        assert!(army.is_defeated(0));
        assert!(!army.is_defeated(1));
    }

    #[rstest]
    fn empty_deck_is_defeated_immediately() {
        let army = Army::new(Vec::new());
        assert!(army.all_deployed());
        assert!(army.is_defeated(0));
    }
}
