//! Headless Bevy app driving a battle session.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skirmish::{ActiveBattle, BattleSession, SkirmishPlugin};

/// App with minimal plugins, the battle plugin, a fixed 50 ms frame and
/// `session` installed as the active battle.
#[must_use]
pub fn headless_app(session: BattleSession) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SkirmishPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
        .insert_resource(ActiveBattle(session));
    app
}
