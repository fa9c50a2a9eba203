//! Pointer gesture recognition.
//!
//! Raw pointer events are classified into taps and inspection requests. A
//! press held still long enough, or two quick releases on the same spot,
//! inspect instead of tapping. Timestamps come from the session's host
//! clock, which sums unclamped frame deltas, so recognition is deterministic
//! under a fixed frame delta and keeps wall-time thresholds under slow
//! frames.

use glam::Vec2;

use crate::config::BattleConfig;
use crate::unit::{Order, UnitId};

/// Classified pointer release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Plain tap at a point.
    Tap(Vec2),
    /// Double tap at a point.
    Inspect(Vec2),
    /// Release that completes nothing (long press already fired, or no
    /// matching press).
    Swallowed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    origin: Vec2,
    started_at: f32,
    /// Travel exceeded the slop; long press is off.
    wandered: bool,
    long_press_fired: bool,
}

/// State of the pointer between events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureTracker {
    press: Option<Press>,
    last_tap: Option<(Vec2, f32)>,
}

impl GestureTracker {
    /// Pointer went down at `position`; arms the long-press timer.
    pub fn press(&mut self, position: Vec2, now: f32) {
        self.press = Some(Press {
            origin: position,
            started_at: now,
            wandered: false,
            long_press_fired: false,
        });
    }

    /// Pointer moved; travelling beyond the slop disarms the long press.
    pub fn drag(&mut self, position: Vec2, config: &BattleConfig) {
        if let Some(press) = self.press.as_mut() {
            if press.origin.distance(position) >= config.gesture_slop {
                press.wandered = true;
            }
        }
    }

    /// Fires the long press once the hold time elapses, returning the press
    /// point.
    pub fn poll_long_press(&mut self, now: f32, config: &BattleConfig) -> Option<Vec2> {
        let press = self.press.as_mut()?;
        if press.wandered
            || press.long_press_fired
            || now - press.started_at < config.long_press_seconds
        {
            return None;
        }
        press.long_press_fired = true;
        Some(press.origin)
    }

    /// Pointer went up at `position`.
    pub fn release(&mut self, position: Vec2, now: f32, config: &BattleConfig) -> Gesture {
        let Some(press) = self.press.take() else {
            return Gesture::Swallowed;
        };
        if press.long_press_fired {
            self.last_tap = None;
            return Gesture::Swallowed;
        }
        if let Some((point, at)) = self.last_tap.take() {
            if now - at < config.double_tap_seconds
                && point.distance(position) < config.gesture_slop
            {
                return Gesture::Inspect(position);
            }
        }
        self.last_tap = Some((position, now));
        Gesture::Tap(position)
    }
}

/// Order queued by a tap, applied at the start of the next update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingOrder {
    /// Unit that receives the order.
    pub unit: UnitId,
    /// The order itself.
    pub order: Order,
}

/// What a tap did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// An own unit became selected.
    Selected(UnitId),
    /// The selected unit was tapped again and released.
    Deselected,
    /// An order was queued for the next tick.
    OrderQueued(PendingOrder),
    /// Nothing to do: empty ground without a selection, or battle over.
    Ignored,
}
