#![cfg_attr(docsrs, feature(doc_cfg))]
//! Real-time skirmish battle engine.
//!
//! Two armies fight on a bounded 2D field with terrain, obstacles, mass
//! weighted collision separation, area combat with directional bonuses and
//! a one-shot skill per unit. A [`BattleSession`] owns the whole battle and
//! is stepped once per host frame; [`SkirmishPlugin`] does that from a Bevy
//! app.
pub mod collaborators;
pub mod collision;
pub mod combat;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod movement;
pub mod phase;
pub mod plugin;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod skill;
pub mod snapshot;
pub mod terrain;
pub mod unit;
pub use constants::*;

// Re-export commonly used items
pub use collaborators::{
    ClassAdvantage, ClassCatalog, ClassInfo, ClassicAdvantage, Collaborators, CompletionCallback,
    DefaultCatalog, NoAdvantage, NoInspector, SilentCues, SoundCue, SoundCues, UnitInspector,
};
pub use config::BattleConfig;
pub use effects::{BattleResult, BattleStats, EffectKind, EffectLayer, HitTier};
pub use error::{BattleError, ConfigError, ScenarioError};
pub use input::{PendingOrder, TapOutcome};
pub use logging::init as init_logging;
pub use phase::Phase;
pub use plugin::{advance_battle_system, ActiveBattle, BattleConcluded, SkirmishPlugin};
pub use scenario::Scenario;
pub use session::{BattleSession, BattleSetup};
pub use skill::{SkillActivation, SkillKind};
pub use snapshot::{BattleSnapshot, UnitView};
pub use terrain::{
    FieldSurface, MapDescriptor, Obstacle, ObstacleKind, TerrainEffect, TerrainKind, TerrainZone,
};
pub use unit::{Order, Side, Unit, UnitClass, UnitId, UnitTemplate};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use skirmish::prelude::*;
    //!
    //! let setup = BattleSetup::new(FieldSurface::new(480.0, 720.0), Vec::new(), Vec::new());
    //! let mut battle = BattleSession::new(setup, Collaborators::default(), |result| {
    //!     println!("won: {}", result.is_win);
    //! })
    //! .expect("valid setup");
    //! battle.update(1.0 / 60.0);
    //! ```

    pub use crate::BattleConfig;
    pub use crate::BattleResult;
    pub use crate::BattleSession;
    pub use crate::BattleSetup;
    pub use crate::Collaborators;
    pub use crate::FieldSurface;
    pub use crate::MapDescriptor;
    pub use crate::Phase;
    pub use crate::Side;
    pub use crate::UnitClass;
    pub use crate::UnitTemplate;
    pub use glam::Vec2;
}
