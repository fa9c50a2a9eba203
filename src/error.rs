//! Error types surfaced by battle construction and scenario loading.
//!
//! Gameplay never fails: ignored taps, spent skills and empty decks are
//! ordinary outcomes. Only building a session can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected tuning values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A duration, size or scale that must be a positive finite number.
    #[error("config field `{field}` must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// The variance band would allow zero or negative damage.
    #[error("damage variance must lie in [0, 1), got {0}")]
    Variance(f32),
}

/// Fatal failures while constructing a [`crate::BattleSession`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    /// No render surface was supplied.
    #[error("battle requires a render surface")]
    MissingSurface,
    /// The surface cannot hold a single unit.
    #[error("render surface {width}x{height} is unusable")]
    InvalidSurface {
        /// Supplied width in pixels.
        width: f32,
        /// Supplied height in pixels.
        height: f32,
    },
    /// Tuning values failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while reading a scenario description.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}")]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The scenario JSON is malformed.
    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_json::Error),
    /// The scenario parsed but describes an impossible battle.
    #[error(transparent)]
    Battle(#[from] BattleError),
}
