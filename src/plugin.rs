//! Bevy host loop for a battle session.
//!
//! The session stays a plain single-owner object; Bevy only supplies the
//! frame clock. Insert an [`ActiveBattle`] resource and the plugin steps it
//! once per `Update` with the frame delta, triggering [`BattleConcluded`]
//! on the frame the result is delivered.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::info;

use crate::effects::BattleResult;
use crate::session::BattleSession;

/// The battle currently driven by the app.
#[derive(Resource, Debug)]
pub struct ActiveBattle(pub BattleSession);

/// Fired once when the active battle delivers its result.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BattleConcluded(pub BattleResult);

/// Steps the active battle by the frame delta.
pub fn advance_battle_system(
    time: Res<Time>,
    battle: Option<ResMut<ActiveBattle>>,
    mut commands: Commands,
) {
    let Some(mut battle) = battle else {
        return;
    };
    let session = &mut battle.0;
    if session.is_finished() {
        return;
    }
    session.update(time.delta_secs());
    if let Some(result) = session.result() {
        commands.trigger(BattleConcluded(result));
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_battle_concluded(event: On<BattleConcluded>) {
    let BattleConcluded(result) = event.event();
    info!(
        "{} in {:.1}s ({} kills)",
        if result.is_win { "victory" } else { "defeat" },
        result.elapsed_seconds,
        result.kills
    );
}

/// Installs the battle stepping system.
#[derive(Default)]
pub struct SkirmishPlugin;

impl Plugin for SkirmishPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_battle_concluded);
        app.add_systems(Update, advance_battle_system);
    }
}
