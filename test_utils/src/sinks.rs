//! Collaborators that record what a battle reports.
//!
//! Each sink is a cheap clone over shared storage: hand one clone to the
//! session and keep the other to inspect afterwards.

use std::sync::{Arc, Mutex, MutexGuard};

use skirmish::{BattleResult, SoundCue, SoundCues, UnitInspector, UnitView};

fn lock<T>(cell: &Arc<Mutex<T>>) -> MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Captures completion callback invocations.
#[derive(Clone, Debug, Default)]
pub struct ResultSink(Arc<Mutex<Vec<BattleResult>>>);

impl ResultSink {
    /// Callback that appends to this sink.
    pub fn callback(&self) -> impl FnOnce(BattleResult) + Send + Sync + 'static {
        let store = Arc::clone(&self.0);
        move |result| lock(&store).push(result)
    }

    /// Every result delivered so far.
    #[must_use]
    pub fn results(&self) -> Vec<BattleResult> {
        lock(&self.0).clone()
    }

    /// Number of callback invocations.
    #[must_use]
    pub fn count(&self) -> usize {
        lock(&self.0).len()
    }

    /// Most recent result.
    #[must_use]
    pub fn last(&self) -> Option<BattleResult> {
        lock(&self.0).last().copied()
    }
}

/// Sound player that remembers every cue.
#[derive(Clone, Debug, Default)]
pub struct RecordingCues(Arc<Mutex<Vec<SoundCue>>>);

impl RecordingCues {
    /// Cues played so far, in order.
    #[must_use]
    pub fn cues(&self) -> Vec<SoundCue> {
        lock(&self.0).clone()
    }

    /// How often `cue` was played.
    #[must_use]
    pub fn count(&self, cue: SoundCue) -> usize {
        lock(&self.0).iter().filter(|&&c| c == cue).count()
    }
}

impl SoundCues for RecordingCues {
    fn play(&mut self, cue: SoundCue) {
        lock(&self.0).push(cue);
    }
}

/// Inspector that remembers every unit it was asked to show.
#[derive(Clone, Debug, Default)]
pub struct RecordingInspector(Arc<Mutex<Vec<UnitView>>>);

impl RecordingInspector {
    /// Views shown so far, in order.
    #[must_use]
    pub fn shown(&self) -> Vec<UnitView> {
        lock(&self.0).clone()
    }
}

impl UnitInspector for RecordingInspector {
    fn inspect(&mut self, unit: &UnitView) {
        lock(&self.0).push(unit.clone());
    }
}
