//! The battle session: owner of all battle state and the per-frame tick.
//!
//! A [`BattleSession`] is built once from a [`BattleSetup`], deploys both
//! decks immediately and is then driven by repeated calls to
//! [`BattleSession::update`]. Every mutation happens inside `update` or the
//! input methods; renderers read through [`BattleSession::snapshot`].
//!
//! Every `update` first applies the orders queued by taps since the last
//! frame. One tick of the battle phase then runs, in order: skill timers,
//! steering, collision separation, combat, a single compaction pass that
//! removes the fallen and finally the end-of-battle check.

use glam::Vec2;
use hashbrown::HashMap;
use log::{debug, info, warn};
use ordered_float::OrderedFloat;

use crate::collaborators::{Collaborators, CompletionCallback, SoundCue};
use crate::collision::separate;
use crate::combat::{resolve_attacks, CombatContext, CombatReport};
use crate::config::BattleConfig;
use crate::effects::{BattleResult, BattleStats, EffectLayer};
use crate::error::BattleError;
use crate::input::{Gesture, GestureTracker, PendingOrder, TapOutcome};
use crate::movement::{steer_all, SteeringContext};
use crate::phase::{judge, Phase, PhaseMachine, Transition};
use crate::rng::BattleRng;
use crate::skill::{self, SkillActivation};
use crate::snapshot::{BattleSnapshot, UnitView};
use crate::terrain::{FieldSurface, MapDescriptor};
use crate::unit::{Army, Order, Side, Unit, UnitId, UnitTemplate};

/// Construction inputs for a battle.
#[derive(Debug, Clone, Default)]
pub struct BattleSetup {
    /// Render surface; its size bounds the field. Required.
    pub surface: Option<FieldSurface>,
    /// Player deck, deployed along the bottom edge.
    pub player: Vec<UnitTemplate>,
    /// Enemy deck, deployed along the top edge.
    pub enemy: Vec<UnitTemplate>,
    /// Terrain zones and obstacles.
    pub map: MapDescriptor,
    /// Fixed seed for reproducible damage rolls.
    pub seed: Option<u64>,
    /// Tuning values, validated on construction.
    pub config: BattleConfig,
    /// Start with player units seeking enemies on their own.
    pub auto_mode: bool,
}

impl BattleSetup {
    /// Setup on `surface` with the two decks and everything else defaulted.
    #[must_use]
    pub fn new(surface: FieldSurface, player: Vec<UnitTemplate>, enemy: Vec<UnitTemplate>) -> Self {
        Self {
            surface: Some(surface),
            player,
            enemy,
            ..Self::default()
        }
    }
}

/// A running battle.
pub struct BattleSession {
    config: BattleConfig,
    surface: FieldSurface,
    map: MapDescriptor,
    player: Army,
    enemy: Army,
    /// Live units only; the fallen are compacted out at the end of a tick.
    units: Vec<Unit>,
    next_id: u32,
    phase: PhaseMachine,
    /// Seconds since construction, across every phase, as simulated.
    clock: f32,
    /// Unclamped host time driving gesture thresholds.
    input_clock: f32,
    rng: BattleRng,
    effects: EffectLayer,
    stats: BattleStats,
    auto_mode: bool,
    selected: Option<UnitId>,
    /// Orders queued by taps, at most one per unit.
    pending: HashMap<UnitId, Order>,
    gestures: GestureTracker,
    collaborators: Collaborators,
    on_complete: Option<CompletionCallback>,
    result: Option<BattleResult>,
}

impl std::fmt::Debug for BattleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleSession")
            .field("phase", &self.phase)
            .field("units", &self.units.len())
            .field("stats", &self.stats)
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}

impl BattleSession {
    /// Validates `setup`, deploys both decks and starts the intro.
    ///
    /// `on_complete` runs exactly once, after the outro, with the final
    /// result.
    ///
    /// # Errors
    /// [`BattleError::MissingSurface`] or [`BattleError::InvalidSurface`]
    /// when the field is unusable, [`BattleError::Config`] when tuning
    /// values fail validation.
    pub fn new(
        setup: BattleSetup,
        collaborators: Collaborators,
        on_complete: impl FnOnce(BattleResult) + Send + Sync + 'static,
    ) -> Result<Self, BattleError> {
        let BattleSetup {
            surface,
            player,
            enemy,
            map,
            seed,
            config,
            auto_mode,
        } = setup;
        config.validate()?;
        let surface = surface.ok_or(BattleError::MissingSurface)?;
        if !surface.can_hold(config.unit_size) {
            return Err(BattleError::InvalidSurface {
                width: surface.width,
                height: surface.height,
            });
        }

        let mut session = Self {
            config,
            surface,
            map,
            player: Army::new(player),
            enemy: Army::new(enemy),
            units: Vec::new(),
            next_id: 1,
            phase: PhaseMachine::default(),
            clock: 0.0,
            input_clock: 0.0,
            rng: BattleRng::from(seed),
            effects: EffectLayer::default(),
            stats: BattleStats::default(),
            auto_mode,
            selected: None,
            pending: HashMap::new(),
            gestures: GestureTracker::default(),
            collaborators,
            on_complete: Some(Box::new(on_complete)),
            result: None,
        };
        session.deploy(Side::Own);
        session.deploy(Side::Enemy);
        info!(
            "battle ready: {} vs {} units on {}x{} (seed {:?})",
            session.live_count(Side::Own),
            session.live_count(Side::Enemy),
            surface.width,
            surface.height,
            session.rng.seed()
        );
        Ok(session)
    }

    fn deploy(&mut self, side: Side) {
        let reserve = match side {
            Side::Own => self.player.deploy_reserve(),
            Side::Enemy => self.enemy.deploy_reserve(),
        };
        for (slot, template) in reserve {
            let position = formation_slot(side, slot, self.surface, &self.config);
            let id = UnitId(self.next_id);
            self.next_id += 1;
            self.units.push(Unit::from_template(
                id,
                side,
                &template,
                position,
                facing(side),
            ));
        }
    }

    /// Advances the battle by one frame of `dt` seconds.
    ///
    /// Non-finite or negative deltas count as zero; deltas above the
    /// configured maximum are clamped for the simulation. Gesture timing
    /// follows the unclamped delta so it tracks the host's wall clock.
    pub fn update(&mut self, dt: f32) {
        let host_dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.input_clock += host_dt;
        let dt = self.clamp_dt(host_dt);
        self.clock += dt;
        if let Some(point) = self
            .gestures
            .poll_long_press(self.input_clock, &self.config)
        {
            self.inspect_at(point);
        }
        if self.accepts_orders() {
            self.apply_pending_orders();
        }

        match self.phase.advance(dt, &self.config) {
            Some(Transition::BattleStarted) => {}
            Some(Transition::Concluded { is_win }) => self.conclude(is_win),
            None if self.phase.phase() == Phase::Battle => self.step_battle(dt),
            None => {}
        }
        self.effects.advance(dt, &self.config);
    }

    fn clamp_dt(&self, dt: f32) -> f32 {
        if dt > self.config.max_tick_seconds {
            warn!(
                "frame delta {dt:.3}s clamped to {:.3}s",
                self.config.max_tick_seconds
            );
            return self.config.max_tick_seconds;
        }
        dt
    }

    fn step_battle(&mut self, dt: f32) {
        self.tick_skills(dt);

        let steering = SteeringContext {
            config: &self.config,
            map: &self.map,
            surface: self.surface,
            auto_mode: self.auto_mode,
        };
        steer_all(&mut self.units, &steering, dt);
        separate(&mut self.units, &self.config, self.surface, dt);

        let combat = CombatContext {
            config: &self.config,
            advantage: self.collaborators.advantage.as_ref(),
            now: self.phase.battle_elapsed(),
        };
        let report = resolve_attacks(&mut self.units, &combat, &mut self.rng);
        self.record_hits(&report);

        self.remove_fallen();
        self.check_end();
    }

    fn apply_pending_orders(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut queued: Vec<(UnitId, Order)> = self.pending.drain().collect();
        queued.sort_unstable_by_key(|&(unit, _)| unit);
        for (unit, order) in queued {
            if let Order::Attack { target } = order {
                if self.unit(target).is_none() {
                    debug!("dropping attack order on fallen unit {target}");
                    continue;
                }
            }
            if let Some(u) = self.unit_mut(unit) {
                debug!("unit {unit} ordered to {order:?}");
                u.order = order;
            }
        }
    }

    fn tick_skills(&mut self, dt: f32) {
        for unit in &mut self.units {
            if let Some(kind) = unit.skill.tick(dt, &self.config) {
                debug!("{} of unit {} wore off", kind.label(), unit.id);
            }
        }
    }

    fn record_hits(&mut self, report: &CombatReport) {
        for hit in &report.hits {
            self.effects.hit(hit.position, &self.config);
            self.effects
                .damage(hit.position, hit.damage, hit.tier, &self.config);
            self.stats.record_hit(hit.attacker_side, hit.damage);
        }
        for _ in &report.attackers {
            self.collaborators.sound.play(SoundCue::Attack);
        }
    }

    /// Compacts dead units out of the live set and clears every order that
    /// pointed at them.
    fn remove_fallen(&mut self) {
        let fallen: Vec<(UnitId, Side, Vec2)> = self
            .units
            .iter()
            .filter(|u| !u.is_alive())
            .map(|u| (u.id, u.side, u.position))
            .collect();
        if fallen.is_empty() {
            return;
        }
        self.units.retain(Unit::is_alive);

        for &(id, side, position) in &fallen {
            debug!("unit {id} ({side:?}) fell");
            self.effects.death(position, &self.config);
            self.stats.record_death(side);
            self.collaborators.sound.play(SoundCue::Death);
            if self.selected == Some(id) {
                self.selected = None;
            }
        }
        for unit in &mut self.units {
            let orphaned = unit
                .order
                .target()
                .is_some_and(|target| fallen.iter().any(|&(id, ..)| id == target));
            if orphaned {
                unit.clear_order();
            }
        }
    }

    fn check_end(&mut self) {
        let enemy_defeated = self.enemy.is_defeated(self.live_count(Side::Enemy));
        let own_defeated = self.player.is_defeated(self.live_count(Side::Own));
        let Some(is_win) = judge(enemy_defeated, own_defeated) else {
            return;
        };
        if self.phase.declare_outcome(is_win) {
            info!(
                "battle decided after {:.1}s: {}",
                self.phase.battle_elapsed(),
                if is_win { "victory" } else { "defeat" }
            );
            self.pending.clear();
            self.selected = None;
            let cue = if is_win {
                SoundCue::Victory
            } else {
                SoundCue::Defeat
            };
            self.collaborators.sound.play(cue);
        }
    }

    fn conclude(&mut self, is_win: bool) {
        let result = BattleResult::from_stats(is_win, &self.stats, self.phase.battle_elapsed());
        info!(
            "battle result: win={} kills={} dealt={:.0} taken={:.0}",
            result.is_win, result.kills, result.damage_dealt, result.damage_taken
        );
        self.result = Some(result);
        if let Some(callback) = self.on_complete.take() {
            callback(result);
        }
    }

    // --- input -------------------------------------------------------------

    /// Pointer pressed at `position`.
    pub fn pointer_down(&mut self, position: Vec2) {
        self.gestures.press(position, self.input_clock);
    }

    /// Pointer moved to `position` while pressed.
    pub fn pointer_move(&mut self, position: Vec2) {
        self.gestures.drag(position, &self.config);
    }

    /// Pointer released at `position`.
    pub fn pointer_up(&mut self, position: Vec2) -> TapOutcome {
        match self.gestures.release(position, self.input_clock, &self.config) {
            Gesture::Tap(point) => self.tap(point),
            Gesture::Inspect(point) => {
                self.inspect_at(point);
                TapOutcome::Ignored
            }
            Gesture::Swallowed => TapOutcome::Ignored,
        }
    }

    fn tap(&mut self, point: Vec2) -> TapOutcome {
        if !self.accepts_orders() {
            return TapOutcome::Ignored;
        }
        let under = self.unit_at(point).map(|u| (u.id, u.side));
        let Some(selected) = self.selected else {
            return match under {
                Some((id, Side::Own)) => {
                    self.selected = Some(id);
                    TapOutcome::Selected(id)
                }
                _ => TapOutcome::Ignored,
            };
        };
        let order = match under {
            Some((id, _)) if id == selected => {
                self.selected = None;
                return TapOutcome::Deselected;
            }
            Some((id, Side::Enemy)) => Order::Attack { target: id },
            _ => Order::move_to(point),
        };
        let pending = PendingOrder {
            unit: selected,
            order,
        };
        self.pending.insert(selected, order);
        self.selected = None;
        TapOutcome::OrderQueued(pending)
    }

    fn inspect_at(&mut self, point: Vec2) {
        let Some(view) = self.unit_at(point).map(|unit| {
            UnitView::from_unit(
                unit,
                self.collaborators.catalog.as_ref(),
                self.selected == Some(unit.id),
            )
        }) else {
            return;
        };
        self.collaborators.inspector.inspect(&view);
    }

    /// Closest live unit whose body covers `point`.
    fn unit_at(&self, point: Vec2) -> Option<&Unit> {
        let reach = self.config.unit_radius();
        self.units
            .iter()
            .filter(|u| u.position.distance(point) <= reach)
            .min_by_key(|u| OrderedFloat(u.position.distance(point)))
    }

    const fn accepts_orders(&self) -> bool {
        matches!(self.phase.phase(), Phase::Start | Phase::Battle)
    }

    /// Orders `unit` to attack `target` immediately.
    ///
    /// Returns `false` when either unit is gone, both fight for the same
    /// side, or the battle is over.
    pub fn assign_attack(&mut self, unit: UnitId, target: UnitId) -> bool {
        if !self.accepts_orders() {
            return false;
        }
        let Some(target_side) = self.unit(target).map(|t| t.side) else {
            return false;
        };
        match self.unit_mut(unit) {
            Some(u) if u.side != target_side => {
                u.set_attack_target(target);
                debug!("unit {unit} ordered to attack {target}");
                true
            }
            _ => false,
        }
    }

    /// Orders `unit` to walk to `point` immediately.
    pub fn assign_move(&mut self, unit: UnitId, point: Vec2) -> bool {
        if !self.accepts_orders() {
            return false;
        }
        self.unit_mut(unit).is_some_and(|u| {
            u.set_move_point(point);
            debug!("unit {unit} ordered to move to {point}");
            true
        })
    }

    /// Drops the order of `unit`.
    pub fn clear_order(&mut self, unit: UnitId) -> bool {
        self.unit_mut(unit).is_some_and(|u| {
            u.clear_order();
            true
        })
    }

    /// Lets player units without orders seek enemies on their own.
    pub fn set_auto_mode(&mut self, enabled: bool) {
        if self.auto_mode != enabled {
            info!("auto mode {}", if enabled { "on" } else { "off" });
        }
        self.auto_mode = enabled;
    }

    /// Fires the class skill of `unit`.
    pub fn activate_skill(&mut self, unit: UnitId) -> SkillActivation {
        if self.phase.phase() != Phase::Battle {
            return SkillActivation::NotInBattle;
        }
        let Some(u) = self.units.iter_mut().find(|u| u.id == unit) else {
            return SkillActivation::UnknownUnit;
        };
        let outcome = skill::activate(u, &self.config);
        if let SkillActivation::Activated(kind) = outcome {
            debug!("unit {unit} activated {}", kind.label());
            self.effects.skill(u.position, kind, &self.config);
            self.collaborators.sound.play(SoundCue::Skill);
        }
        outcome
    }

    // --- queries -----------------------------------------------------------

    /// Draw-ready copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        let catalog = self.collaborators.catalog.as_ref();
        BattleSnapshot {
            phase: self.phase.phase(),
            phase_timer: self.phase.timer(),
            battle_elapsed: self.phase.battle_elapsed(),
            auto_mode: self.auto_mode,
            selected: self.selected,
            is_win: self.phase.outcome(),
            units: self
                .units
                .iter()
                .map(|u| UnitView::from_unit(u, catalog, self.selected == Some(u.id)))
                .collect(),
            obstacles: self.map.obstacles.clone(),
            effects: self.effects.effects.clone(),
            texts: self.effects.texts.clone(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Final result, once the outro has run.
    #[must_use]
    pub const fn result(&self) -> Option<BattleResult> {
        self.result
    }

    /// Whether the result has been delivered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.phase() == Phase::Finished
    }

    /// Live units in deployment order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Live unit with `id`.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Number of live units fighting for `side`.
    #[must_use]
    pub fn live_count(&self, side: Side) -> usize {
        self.units.iter().filter(|u| u.side == side).count()
    }

    /// Running tallies.
    #[must_use]
    pub const fn stats(&self) -> &BattleStats {
        &self.stats
    }

    /// Live effects and floating texts.
    #[must_use]
    pub const fn effects(&self) -> &EffectLayer {
        &self.effects
    }

    /// Whether idle player units fight on their own.
    #[must_use]
    pub const fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    /// Currently selected own unit.
    #[must_use]
    pub const fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    /// Order queued for `unit`, applied at the start of the next update.
    #[must_use]
    pub fn pending_order(&self, unit: UnitId) -> Option<Order> {
        self.pending.get(&unit).copied()
    }

    /// Number of queued orders.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Tuning values in effect.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Field bounds.
    #[must_use]
    pub const fn surface(&self) -> FieldSurface {
        self.surface
    }

    /// Seconds of actual fighting so far.
    #[must_use]
    pub const fn battle_elapsed(&self) -> f32 {
        self.phase.battle_elapsed()
    }
}

/// Own units face up the field, enemies down.
fn facing(side: Side) -> f32 {
    match side {
        Side::Own => -std::f32::consts::FRAC_PI_2,
        Side::Enemy => std::f32::consts::FRAC_PI_2,
    }
}

/// Start position of the `slot`th unit of `side`: rows along the side's own
/// edge, filling from that edge towards the middle.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Row widths and slot indices are small non-negative counts."
)]
fn formation_slot(side: Side, slot: usize, surface: FieldSurface, config: &BattleConfig) -> Vec2 {
    let spacing = config.unit_size * 2.0;
    let per_row = ((surface.width / spacing).floor() as usize).max(1);
    let column = slot % per_row;
    let row = slot / per_row;
    let x = (column as f32 + 0.5) * surface.width / per_row as f32;
    let depth = config.unit_size + row as f32 * config.unit_size * 1.5;
    let y = match side {
        Side::Own => surface.height - depth,
        Side::Enemy => depth,
    };
    surface.clamp(Vec2::new(x, y), config.unit_radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MockSoundCues;
    use crate::unit::UnitClass;
    use approx::assert_relative_eq;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};
    use std::sync::{Arc, Mutex};

    fn template(class: UnitClass) -> UnitTemplate {
        UnitTemplate {
            name: None,
            class,
            atk: 60.0,
            def: 5.0,
            spd: 80.0,
            rng: 20.0,
            hp: 100.0,
        }
    }

    #[fixture]
    fn setup() -> BattleSetup {
        let mut setup = BattleSetup::new(
            FieldSurface::new(600.0, 800.0),
            vec![template(UnitClass::Light), template(UnitClass::Heavy)],
            vec![template(UnitClass::Cavalry)],
        );
        setup.seed = Some(11);
        setup
    }

    fn session(setup: BattleSetup) -> BattleSession {
        BattleSession::new(setup, Collaborators::default(), |_| {}).expect("valid setup")
    }

    fn run_until(session: &mut BattleSession, phase: Phase, max_ticks: usize) {
        for _ in 0..max_ticks {
            if session.phase() == phase {
                return;
            }
            session.update(0.05);
        }
        panic!("never reached {phase:?}");
    }

    #[rstest]
    fn missing_surface_is_fatal(mut setup: BattleSetup) {
        setup.surface = None;
        let err = BattleSession::new(setup, Collaborators::default(), |_| {})
            .expect_err("no surface");
        assert_eq!(err, BattleError::MissingSurface);
    }

    #[rstest]
    #[case(0.0, 800.0)]
    #[case(f32::NAN, 800.0)]
    #[case(600.0, 10.0)]
    fn unusable_surface_is_fatal(mut setup: BattleSetup, #[case] width: f32, #[case] height: f32) {
        setup.surface = Some(FieldSurface::new(width, height));
        let err = BattleSession::new(setup, Collaborators::default(), |_| {})
            .expect_err("bad surface");
        assert!(matches!(err, BattleError::InvalidSurface { .. }));
    }

    #[rstest]
    fn bad_config_is_fatal(mut setup: BattleSetup) {
        setup.config.max_tick_seconds = 0.0;
        let err = BattleSession::new(setup, Collaborators::default(), |_| {})
            .expect_err("bad config");
        assert!(matches!(err, BattleError::Config(_)));
    }

    #[rstest]
    fn decks_deploy_on_their_own_edges(setup: BattleSetup) {
        let session = session(setup);
        assert_eq!(session.live_count(Side::Own), 2);
        assert_eq!(session.live_count(Side::Enemy), 1);
        for unit in session.units() {
            match unit.side {
                Side::Own => {
                    assert!(unit.position.y > 400.0);
                    assert_relative_eq!(unit.rotation, -std::f32::consts::FRAC_PI_2);
                }
                Side::Enemy => {
                    assert!(unit.position.y < 400.0);
                    assert_relative_eq!(unit.rotation, std::f32::consts::FRAC_PI_2);
                }
            }
        }
        let ids: Vec<u32> = session.units().iter().map(|u| u.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[rstest]
    fn wide_decks_wrap_into_rows() {
        let cfg = BattleConfig::default();
        let surface = FieldSurface::new(200.0, 800.0);
        let first = formation_slot(Side::Own, 0, surface, &cfg);
        let wrapped = formation_slot(Side::Own, 3, surface, &cfg);
        assert_relative_eq!(first.x, wrapped.x);
        assert!(wrapped.y < first.y);
    }

    #[rstest]
    fn intro_freezes_units(setup: BattleSetup) {
        let mut session = session(setup);
        let before: Vec<Vec2> = session.units().iter().map(|u| u.position).collect();
        session.update(0.05);
        session.update(0.05);
        let after: Vec<Vec2> = session.units().iter().map(|u| u.position).collect();
        assert_eq!(before, after);
        assert_eq!(session.phase(), Phase::Start);
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(-1.0)]
    #[case(f32::INFINITY)]
    fn unusable_deltas_do_not_advance(setup: BattleSetup, #[case] dt: f32) {
        let mut session = session(setup);
        session.update(dt);
        assert_relative_eq!(session.snapshot().phase_timer, 0.0);
    }

    #[rstest]
    fn long_deltas_are_clamped(setup: BattleSetup) {
        let mut session = session(setup);
        session.update(30.0);
        assert_relative_eq!(session.snapshot().phase_timer, BattleConfig::default().max_tick_seconds);
    }

    #[rstest]
    fn empty_enemy_deck_is_an_instant_win(mut setup: BattleSetup) {
        setup.enemy.clear();
        let mut sound = MockSoundCues::new();
        sound
            .expect_play()
            .with(eq(SoundCue::Victory))
            .times(1)
            .return_const(());
        let collaborators = Collaborators {
            sound: Box::new(sound),
            ..Collaborators::default()
        };
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delivered);
        let mut session = BattleSession::new(setup, collaborators, move |result| {
            sink.lock().expect("sink lock").push(result);
        })
        .expect("valid setup");

        run_until(&mut session, Phase::Battle, 100);
        session.update(0.05);
        assert_eq!(session.phase(), Phase::End);
        run_until(&mut session, Phase::Finished, 100);
        for _ in 0..10 {
            session.update(0.05);
        }

        let delivered = delivered.lock().expect("sink lock");
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].is_win);
        assert_eq!(session.result(), Some(delivered[0]));
    }

    #[rstest]
    fn tap_selects_then_orders(setup: BattleSetup) {
        let mut session = session(setup);
        let own = session.units()[0].clone();
        let enemy = session
            .units()
            .iter()
            .find(|u| u.side == Side::Enemy)
            .cloned()
            .expect("enemy deployed");

        session.pointer_down(own.position);
        assert_eq!(session.pointer_up(own.position), TapOutcome::Selected(own.id));

        for _ in 0..5 {
            session.update(0.1);
        }
        session.pointer_down(enemy.position);
        let outcome = session.pointer_up(enemy.position);
        let expected = PendingOrder {
            unit: own.id,
            order: Order::Attack { target: enemy.id },
        };
        assert_eq!(outcome, TapOutcome::OrderQueued(expected));
        assert_eq!(session.selected(), None);

        run_until(&mut session, Phase::Battle, 100);
        session.update(0.01);
        assert_eq!(session.pending_count(), 0);
        assert_eq!(
            session.unit(own.id).map(|u| u.order),
            Some(Order::Attack { target: enemy.id })
        );
    }

    #[rstest]
    fn tapping_the_selection_again_deselects(setup: BattleSetup) {
        let mut session = session(setup);
        let own = session.units()[0].clone();
        session.pointer_down(own.position);
        session.pointer_up(own.position);
        for _ in 0..5 {
            session.update(0.1);
        }
        session.pointer_down(own.position);
        assert_eq!(session.pointer_up(own.position), TapOutcome::Deselected);
    }

    #[rstest]
    fn ground_tap_without_selection_is_ignored(setup: BattleSetup) {
        let mut session = session(setup);
        session.pointer_down(Vec2::new(300.0, 400.0));
        assert_eq!(session.pointer_up(Vec2::new(300.0, 400.0)), TapOutcome::Ignored);
        assert_eq!(session.pending_count(), 0);
    }

    /// Selects `unit` and sends it to `point`, leaving enough time between
    /// taps that no double tap forms.
    fn order_move(session: &mut BattleSession, unit: UnitId, point: Vec2) -> TapOutcome {
        let at = session.unit(unit).map(|u| u.position).expect("unit alive");
        session.pointer_down(at);
        assert_eq!(session.pointer_up(at), TapOutcome::Selected(unit));
        session.pointer_down(point);
        session.pointer_up(point)
    }

    #[rstest]
    fn orders_for_several_units_in_one_frame_all_land(mut setup: BattleSetup) {
        setup.config.intro_seconds = 2.0;
        let mut session = session(setup);
        let own: Vec<UnitId> = session
            .units()
            .iter()
            .filter(|u| u.side == Side::Own)
            .map(|u| u.id)
            .collect();
        let first = Vec2::new(100.0, 500.0);
        let second = Vec2::new(400.0, 500.0);

        assert!(matches!(order_move(&mut session, own[0], first), TapOutcome::OrderQueued(_)));
        assert!(matches!(order_move(&mut session, own[1], second), TapOutcome::OrderQueued(_)));
        assert_eq!(session.pending_count(), 2);
        assert_eq!(session.pending_order(own[0]), Some(Order::move_to(first)));

        session.update(0.05);
        assert_eq!(session.phase(), Phase::Start);
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.unit(own[0]).map(|u| u.order), Some(Order::move_to(first)));
        assert_eq!(session.unit(own[1]).map(|u| u.order), Some(Order::move_to(second)));

        run_until(&mut session, Phase::Battle, 100);
        assert_eq!(session.unit(own[0]).map(|u| u.order), Some(Order::move_to(first)));
        assert_eq!(session.unit(own[1]).map(|u| u.order), Some(Order::move_to(second)));
    }

    #[rstest]
    fn a_later_tap_replaces_the_queued_order_of_the_same_unit(setup: BattleSetup) {
        let mut session = session(setup);
        let own = session.units()[0].id;
        order_move(&mut session, own, Vec2::new(100.0, 500.0));
        order_move(&mut session, own, Vec2::new(400.0, 300.0));
        assert_eq!(session.pending_count(), 1);
        assert_eq!(
            session.pending_order(own),
            Some(Order::move_to(Vec2::new(400.0, 300.0)))
        );
    }

    #[rstest]
    fn skills_wait_for_the_battle(setup: BattleSetup) {
        let mut session = session(setup);
        let id = session.units()[0].id;
        assert_eq!(session.activate_skill(id), SkillActivation::NotInBattle);
        run_until(&mut session, Phase::Battle, 100);
        assert!(matches!(session.activate_skill(id), SkillActivation::Activated(_)));
        assert_eq!(session.activate_skill(id), SkillActivation::AlreadyUsed);
        assert_eq!(session.activate_skill(UnitId(99)), SkillActivation::UnknownUnit);
    }

    #[rstest]
    fn direct_orders_respect_sides(setup: BattleSetup) {
        let mut session = session(setup);
        let own: Vec<UnitId> = session
            .units()
            .iter()
            .filter(|u| u.side == Side::Own)
            .map(|u| u.id)
            .collect();
        assert!(!session.assign_attack(own[0], own[1]));
        assert!(session.assign_attack(own[0], UnitId(3)));
        assert!(session.assign_move(own[0], Vec2::new(10.0, 10.0)));
        assert_eq!(session.unit(own[0]).and_then(|u| u.order.target()), None);
        assert!(session.clear_order(own[0]));
        assert!(!session.assign_move(UnitId(42), Vec2::ZERO));
    }
}
