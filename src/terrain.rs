//! Static battlefield data: terrain zones and obstacles.
//!
//! Everything here is read-only once the battle starts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::circles_overlap;

/// Dimensions of the render surface, which double as the field bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSurface {
    /// Width in field units.
    pub width: f32,
    /// Height in field units.
    pub height: f32,
}

impl FieldSurface {
    /// Surface of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a unit of `unit_size` fits on the surface at all.
    #[must_use]
    pub fn can_hold(&self, unit_size: f32) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > unit_size
            && self.height > unit_size
    }

    /// Clamps `point` so a body of `half_size` stays on the surface.
    #[must_use]
    pub fn clamp(&self, point: Vec2, half_size: f32) -> Vec2 {
        Vec2::new(
            point.x.clamp(half_size, self.width - half_size),
            point.y.clamp(half_size, self.height - half_size),
        )
    }
}

/// Ground types a zone can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Open ground.
    Plain,
    /// Slows movement.
    Forest,
    /// Slows movement heavily.
    Swamp,
    /// Speeds movement.
    Road,
    /// High ground.
    Hill,
}

impl TerrainKind {
    /// Built-in effect table used when a zone carries no explicit effect.
    #[must_use]
    pub const fn default_effect(self) -> TerrainEffect {
        match self {
            Self::Plain => TerrainEffect::NEUTRAL,
            Self::Forest => TerrainEffect {
                speed_multiplier: 0.7,
                atk_multiplier: 1.0,
            },
            Self::Swamp => TerrainEffect {
                speed_multiplier: 0.5,
                atk_multiplier: 0.9,
            },
            Self::Road => TerrainEffect {
                speed_multiplier: 1.3,
                atk_multiplier: 1.0,
            },
            Self::Hill => TerrainEffect {
                speed_multiplier: 0.8,
                atk_multiplier: 1.2,
            },
        }
    }
}

/// Modifiers a zone applies to units standing in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainEffect {
    /// Scales movement speed.
    pub speed_multiplier: f32,
    /// Carried through the data model; the combat resolver does not read it.
    pub atk_multiplier: f32,
}

impl TerrainEffect {
    /// No modification at all.
    pub const NEUTRAL: Self = Self {
        speed_multiplier: 1.0,
        atk_multiplier: 1.0,
    };
}

impl Default for TerrainEffect {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Axis-aligned terrain rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainZone {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
    /// Ground type.
    pub kind: TerrainKind,
    /// Overrides the kind's default effect when present.
    #[serde(default)]
    pub effect: Option<TerrainEffect>,
}

impl TerrainZone {
    /// Zone using the default effect of `kind`.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32, kind: TerrainKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
            effect: None,
        }
    }

    /// Whether `point` lies inside the zone (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Effect applied to units inside the zone.
    #[must_use]
    pub fn effect(&self) -> TerrainEffect {
        self.effect.unwrap_or_else(|| self.kind.default_effect())
    }
}

/// Obstacle archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Boulder.
    Rock,
    /// Tree trunk.
    Tree,
    /// Wall segment.
    Wall,
    /// Supply crate.
    Crate,
}

/// Circular static object that blocks movement.
///
/// Obstacles keep their authored state for the whole battle. Only a
/// destructible one authored with no `hp` left is treated as wreckage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre x.
    pub x: f32,
    /// Centre y.
    pub y: f32,
    /// Blocking radius.
    pub radius: f32,
    /// Archetype.
    pub kind: ObstacleKind,
    /// Durability as authored. Nothing lowers it during a battle.
    #[serde(default)]
    pub hp: f32,
    /// Whether zero `hp` marks the obstacle as wreckage.
    #[serde(default)]
    pub destructible: bool,
}

impl Obstacle {
    /// Indestructible obstacle.
    #[must_use]
    pub const fn solid(x: f32, y: f32, radius: f32, kind: ObstacleKind) -> Self {
        Self {
            x,
            y,
            radius,
            kind,
            hp: 0.0,
            destructible: false,
        }
    }

    /// Centre of the obstacle.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Destroyed obstacles stop blocking.
    #[must_use]
    pub fn is_standing(&self) -> bool {
        !self.destructible || self.hp > 0.0
    }

    /// Whether a unit of `radius` centred at `point` would intersect this
    /// obstacle.
    #[must_use]
    pub fn blocks(&self, point: Vec2, radius: f32) -> bool {
        self.is_standing() && circles_overlap(point, radius, self.position(), self.radius)
    }
}

/// Terrain and obstacles of one battlefield.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    /// Terrain rectangles, assumed disjoint.
    #[serde(default)]
    pub zones: Vec<TerrainZone>,
    /// Blocking obstacles.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl MapDescriptor {
    /// First zone containing `point`. Zones are assumed not to overlap.
    #[must_use]
    pub fn zone_at(&self, point: Vec2) -> Option<&TerrainZone> {
        self.zones.iter().find(|zone| zone.contains(point))
    }

    /// Effect at `point`, neutral outside every zone.
    #[must_use]
    pub fn effect_at(&self, point: Vec2) -> TerrainEffect {
        self.zone_at(point)
            .map_or(TerrainEffect::NEUTRAL, TerrainZone::effect)
    }

    /// Speed modifier for a unit centred at `point`.
    #[must_use]
    pub fn speed_multiplier_at(&self, point: Vec2) -> f32 {
        self.effect_at(point).speed_multiplier
    }

    /// Attack modifier for a unit centred at `point`.
    ///
    /// Exposed for renderers and tooling; damage resolution ignores it.
    #[must_use]
    pub fn atk_multiplier_at(&self, point: Vec2) -> f32 {
        self.effect_at(point).atk_multiplier
    }

    /// Whether a unit of `radius` at `point` touches any standing obstacle.
    #[must_use]
    pub fn is_blocked(&self, point: Vec2, radius: f32) -> bool {
        self.obstacles.iter().any(|o| o.blocks(point, radius))
    }
}
