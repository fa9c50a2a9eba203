//! JSON scenario files describing a complete battle setup.
//!
//! ```json
//! {
//!   "surface": { "width": 480, "height": 720 },
//!   "player": [{ "class": "heavy", "atk": 60, "def": 8, "spd": 40, "rng": 10, "hp": 160 }],
//!   "enemy":  [{ "class": "cavalry", "atk": 50, "def": 4, "spd": 90, "rng": 10, "hp": 110 }],
//!   "seed": 7,
//!   "config": { "intro_seconds": 1.0 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::BattleConfig;
use crate::error::ScenarioError;
use crate::session::BattleSetup;
use crate::terrain::{FieldSurface, MapDescriptor};
use crate::unit::UnitTemplate;

/// Serialized battle description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Missing here means a missing render surface at construction.
    pub surface: Option<FieldSurface>,
    /// Player deck, deployed on the left.
    pub player: Vec<UnitTemplate>,
    /// Enemy deck, deployed on the right.
    pub enemy: Vec<UnitTemplate>,
    /// Battlefield terrain and obstacles.
    pub map: MapDescriptor,
    /// RNG seed; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Overrides for any subset of the tuning values.
    pub config: BattleConfig,
    /// Whether idle player units fight on their own.
    pub auto_mode: bool,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    /// [`ScenarioError::Parse`] on malformed JSON or unknown enum values.
    pub fn from_json_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses the scenario at `path`.
    ///
    /// # Errors
    /// [`ScenarioError::Io`] when the file cannot be read, otherwise as
    /// [`Scenario::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Replaces the seed, e.g. from a command-line flag.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Converts the description into session construction inputs.
    #[must_use]
    pub fn into_setup(self) -> BattleSetup {
        BattleSetup {
            surface: self.surface,
            player: self.player,
            enemy: self.enemy,
            map: self.map,
            seed: self.seed,
            config: self.config,
            auto_mode: self.auto_mode,
        }
    }
}

impl From<Scenario> for BattleSetup {
    fn from(scenario: Scenario) -> Self {
        scenario.into_setup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{ObstacleKind, TerrainKind};
    use crate::unit::UnitClass;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const FULL: &str = r#"{
        "surface": { "width": 480, "height": 720 },
        "player": [
            { "name": "Shield Wall", "class": "heavy", "atk": 60, "def": 8, "spd": 40, "rng": 10, "hp": 160 }
        ],
        "enemy": [
            { "class": "cavalry", "atk": 50, "def": 4, "spd": 90, "rng": 10, "hp": 110 },
            { "class": "ranged", "atk": 45, "def": 2, "spd": 50, "rng": 120, "hp": 70 }
        ],
        "map": {
            "zones": [{ "x": 0, "y": 300, "width": 480, "height": 120, "kind": "swamp" }],
            "obstacles": [{ "x": 240, "y": 360, "radius": 20, "kind": "rock" }]
        },
        "seed": 7,
        "config": { "intro_seconds": 1.0 }
    }"#;

    #[rstest]
    fn full_scenario_parses() {
        let scenario = Scenario::from_json_str(FULL).expect("valid scenario");
        assert_eq!(scenario.player.len(), 1);
        assert_eq!(scenario.player[0].name.as_deref(), Some("Shield Wall"));
        assert_eq!(scenario.enemy[1].class, UnitClass::Ranged);
        assert_eq!(scenario.map.zones[0].kind, TerrainKind::Swamp);
        assert_eq!(scenario.map.obstacles[0].kind, ObstacleKind::Rock);
        assert_eq!(scenario.seed, Some(7));
        assert_relative_eq!(scenario.config.intro_seconds, 1.0);
        assert_relative_eq!(
            scenario.config.outro_seconds,
            BattleConfig::default().outro_seconds
        );
        assert!(!scenario.auto_mode);
    }

    #[rstest]
    fn missing_surface_survives_parsing() {
        let scenario = Scenario::from_json_str(r#"{ "player": [] }"#).expect("valid scenario");
        assert!(scenario.into_setup().surface.is_none());
    }

    #[rstest]
    #[case::unknown_class(r#"{ "player": [{ "class": "wizard", "atk": 1, "def": 1, "spd": 1, "rng": 1, "hp": 1 }] }"#)]
    #[case::truncated(r#"{ "surface": { "width": 4"#)]
    fn malformed_scenarios_are_rejected(#[case] text: &str) {
        assert!(matches!(
            Scenario::from_json_str(text),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[rstest]
    fn missing_file_reports_the_path() {
        let err = Scenario::load("does/not/exist.json").expect_err("no such file");
        assert!(matches!(err, ScenarioError::Io { ref path, .. } if path.ends_with("exist.json")));
    }

    #[rstest]
    #[case(None, Some(7))]
    #[case(Some(3), Some(3))]
    fn command_line_seed_overrides(#[case] flag: Option<u64>, #[case] expected: Option<u64>) {
        let scenario = Scenario::from_json_str(FULL).expect("valid scenario").with_seed(flag);
        assert_eq!(scenario.seed, expected);
    }
}
