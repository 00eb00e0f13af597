//! Shared helpers for exercising phases against a hand-built snapshot,
//! without going through the ticker or the store.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::sim::{PowerCache, SimPhase, SimSettings, TickContext, WorldSignal, dispatch_phases};
use crate::store::{WorldSnapshot, WorldStore, WriteBatch};

/// Run one phase's `tick()` at time zero. Returns the mutations it queued and
/// the signals it raised.
pub fn tick_phase(
    snapshot: &WorldSnapshot,
    phase: &mut dyn SimPhase,
    settings: &SimSettings,
    seed: u64,
) -> (WriteBatch, Vec<WorldSignal>) {
    tick_phase_at(snapshot, phase, settings, seed, 0)
}

/// Run one phase's `tick()` at a specific wall-clock time.
pub fn tick_phase_at(
    snapshot: &WorldSnapshot,
    phase: &mut dyn SimPhase,
    settings: &SimSettings,
    seed: u64,
    now_ms: i64,
) -> (WriteBatch, Vec<WorldSignal>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut power = PowerCache::default();
    let mut batch = WriteBatch::new(snapshot.next_id);
    let mut signals = Vec::new();
    let mut ctx = TickContext {
        snapshot,
        batch: &mut batch,
        power: &mut power,
        rng: &mut rng,
        settings,
        now_ms,
        signals: &mut signals,
        inbox: &[],
    };
    phase.tick(&mut ctx);
    (batch, signals)
}

/// Run one phase's `handle_signals()` with a given inbox.
pub fn deliver_signals(
    snapshot: &WorldSnapshot,
    phase: &mut dyn SimPhase,
    inbox: &[WorldSignal],
    settings: &SimSettings,
    seed: u64,
) -> WriteBatch {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut power = PowerCache::default();
    let mut batch = WriteBatch::new(snapshot.next_id);
    let mut discarded = Vec::new();
    let mut ctx = TickContext {
        snapshot,
        batch: &mut batch,
        power: &mut power,
        rng: &mut rng,
        settings,
        now_ms: 0,
        signals: &mut discarded,
        inbox,
    };
    phase.handle_signals(&mut ctx);
    batch
}

/// Run a full phase group (ticks, then one signal delivery pass), exactly as
/// the ticker dispatches them.
pub fn run_phase_group(
    snapshot: &WorldSnapshot,
    phases: &mut [Box<dyn SimPhase>],
    settings: &SimSettings,
    seed: u64,
) -> WriteBatch {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut power = PowerCache::default();
    let mut batch = WriteBatch::new(snapshot.next_id);
    dispatch_phases(
        phases,
        snapshot,
        &mut batch,
        &mut power,
        &mut rng,
        settings,
        0,
    );
    batch
}

/// Load a fresh snapshot from the store, flushing any integrity repairs the
/// load produced.
pub async fn reload(store: &WorldStore) -> Result<WorldSnapshot, sqlx::Error> {
    let (snapshot, repairs) = WorldSnapshot::load(store).await?;
    if !repairs.is_empty() {
        repairs.flush(store).await?;
    }
    Ok(snapshot)
}

/// Assert a float is approximately equal, with a named context message.
pub fn assert_approx(actual: f64, expected: f64, tolerance: f64, msg: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{msg}: expected ~{expected} (+-{tolerance}), got {actual}"
    );
}
