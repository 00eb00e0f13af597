use rand::RngCore;

use super::cache::PowerCache;
use super::runner::SimSettings;
use super::signal::WorldSignal;
use crate::store::{WorldSnapshot, WriteBatch};

/// Context passed to each phase on every tick.
///
/// Phases read the snapshot, write the batch, and never touch the store.
/// Bundled so fields can be added without changing the `SimPhase` trait
/// signature.
pub struct TickContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    pub batch: &'a mut WriteBatch,
    pub power: &'a mut PowerCache,
    pub rng: &'a mut dyn RngCore,
    pub settings: &'a SimSettings,
    /// Wall-clock milliseconds for task windows and record timestamps.
    pub now_ms: i64,
    /// Phases push signals here during tick/handle_signals.
    pub signals: &'a mut Vec<WorldSignal>,
    /// Signals emitted by earlier phases this tick (read-only).
    pub inbox: &'a [WorldSignal],
}

impl TickContext<'_> {
    pub fn emit(&mut self, signal: WorldSignal) {
        self.signals.push(signal);
    }
}
