//! Utility helpers for tests.
//!
//! Builders for unit templates and battle setups, recording collaborators
//! that capture what a session reports, and drivers that step a session or
//! a headless Bevy app.

pub mod app;
pub mod builders;
pub mod sinks;

pub use app::headless_app;
pub use builders::{duel_setup, quick_config, unit, TemplateBuilder};
pub use sinks::{RecordingCues, RecordingInspector, ResultSink};

use skirmish::{BattleSession, Phase};

/// Fixed frame delta used by the drivers, in seconds.
pub const FRAME: f32 = 0.05;

/// Steps `session` until it reaches `phase`, returning the number of
/// frames taken.
///
/// # Panics
/// Panics if `phase` is not reached within `max_frames`.
pub fn run_until(session: &mut BattleSession, phase: Phase, max_frames: usize) -> usize {
    for frame in 0..max_frames {
        if session.phase() == phase {
            return frame;
        }
        session.update(FRAME);
    }
    assert_eq!(session.phase(), phase, "phase not reached in {max_frames} frames");
    max_frames
}

/// Skips the intro so the next update runs a battle tick.
///
/// # Panics
/// Panics if the intro does not end within a minute of simulated time.
pub fn skip_intro(session: &mut BattleSession) {
    run_until(session, Phase::Battle, 1200);
}

/// Steps `session` for `seconds` of simulated time.
pub fn run_for(session: &mut BattleSession, seconds: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds {
        session.update(FRAME);
        elapsed += FRAME;
    }
}
