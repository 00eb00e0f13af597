//! The tick runner: decide against a snapshot, commit through a batch.
//!
//! Every operation follows the same shape: take the tick lock, refresh the
//! snapshot if stale, run phases against it (recording mutations into a
//! write batch), flush the batch, invalidate the snapshot. Phases never see
//! partial writes from the tick they run in; the store converges at flush.
//!
//! Signal delivery is single-pass and non-cascading: phase `tick()`s run in
//! registration order collecting signals, then each phase's
//! `handle_signals()` sees the full buffer once. Signals raised while
//! handling signals are dropped.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::Mutex;

use super::cache::{DEFAULT_POWER_TTL, PowerCache};
use super::context::TickContext;
use super::encounters::EncounterPhase;
use super::movement::{MovementPhase, TerritoryPhase};
use super::spawn::{CharacterSpawnPhase, RedistributionPhase};
use super::succession::SuccessionPhase;
use super::system::SimPhase;
use crate::error::SimError;
use crate::store::batch::FlushStats;
use crate::store::{SnapshotCache, WorldSnapshot, WorldStore, WriteBatch};
use crate::worldgen::config::{FactionCounts, GenerationSettings, TitleCounts, WorldSize};

pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(30);

/// Steady-state tuning for the background simulation.
#[derive(Debug, Clone)]
pub struct SimSettings {
    /// Per-faction population the spawner keeps the world near.
    pub population: FactionCounts,
    pub titles: TitleCounts,
    pub ship_capacity_factor: u32,
    pub movement_chance: f64,
    pub undock_chance: f64,
    pub docked_chance: f64,
    pub king_haki_gate: f64,
    /// Whether idle player crews take part in encounters and movement.
    pub include_player: bool,
    pub snapshot_ttl: Duration,
    pub power_ttl: Duration,
}

impl SimSettings {
    pub fn from_generation(settings: &GenerationSettings) -> Self {
        Self {
            population: settings.population,
            titles: settings.titles,
            ship_capacity_factor: settings.ship_capacity_factor,
            movement_chance: settings.movement_chance,
            undock_chance: settings.undock_chance,
            docked_chance: settings.docked_chance,
            king_haki_gate: settings.king_haki_gate,
            include_player: false,
            snapshot_ttl: DEFAULT_SNAPSHOT_TTL,
            power_ttl: DEFAULT_POWER_TTL,
        }
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self::from_generation(&WorldSize::Small.settings())
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}

/// Run each phase's `tick()`, then deliver collected signals once.
pub fn dispatch_phases(
    phases: &mut [Box<dyn SimPhase>],
    snapshot: &WorldSnapshot,
    batch: &mut WriteBatch,
    power: &mut PowerCache,
    rng: &mut dyn RngCore,
    settings: &SimSettings,
    now_ms: i64,
) {
    let mut signals = Vec::new();
    for phase in phases.iter_mut() {
        let mut ctx = TickContext {
            snapshot,
            batch: &mut *batch,
            power: &mut *power,
            rng: &mut *rng,
            settings,
            now_ms,
            signals: &mut signals,
            inbox: &[],
        };
        phase.tick(&mut ctx);
    }

    if !signals.is_empty() {
        for phase in phases.iter_mut() {
            let mut discarded = Vec::new();
            let mut ctx = TickContext {
                snapshot,
                batch: &mut *batch,
                power: &mut *power,
                rng: &mut *rng,
                settings,
                now_ms,
                signals: &mut discarded,
                inbox: &signals,
            };
            phase.handle_signals(&mut ctx);
        }
    }
}

struct TickerState {
    rng: SmallRng,
    snapshots: SnapshotCache,
    power: PowerCache,
}

/// Owns the store and serializes ticks. Operations lock the state mutex for
/// their full duration, so overlapping requests queue instead of racing.
pub struct WorldTicker {
    store: WorldStore,
    settings: SimSettings,
    state: Mutex<TickerState>,
}

impl WorldTicker {
    pub fn new(store: WorldStore, settings: SimSettings, seed: u64) -> Self {
        let snapshot_ttl = settings.snapshot_ttl;
        let power_ttl = settings.power_ttl;
        Self {
            store,
            settings,
            state: Mutex::new(TickerState {
                rng: SmallRng::seed_from_u64(seed),
                snapshots: SnapshotCache::new(snapshot_ttl),
                power: PowerCache::new(power_ttl),
            }),
        }
    }

    pub fn store(&self) -> &WorldStore {
        &self.store
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// Run one phase group against a fresh-enough snapshot and flush.
    async fn run_phases(
        &self,
        phases: &mut [Box<dyn SimPhase>],
    ) -> Result<FlushStats, SimError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let snapshot = state.snapshots.snapshot(&self.store).await?;
        let mut batch = WriteBatch::new(snapshot.next_id);

        dispatch_phases(
            phases,
            snapshot,
            &mut batch,
            &mut state.power,
            &mut state.rng,
            &self.settings,
            now_ms(),
        );

        if batch.is_empty() {
            return Ok(FlushStats::default());
        }
        let stats = batch.flush(&self.store).await?;
        state.snapshots.invalidate();
        Ok(stats)
    }

    pub async fn simulate_encounters(&self) -> Result<FlushStats, SimError> {
        // Succession rides along to pick up defeated title holders.
        let mut phases: Vec<Box<dyn SimPhase>> =
            vec![Box::new(EncounterPhase), Box::new(SuccessionPhase)];
        self.run_phases(&mut phases).await
    }

    pub async fn process_movement(&self) -> Result<FlushStats, SimError> {
        let mut phases: Vec<Box<dyn SimPhase>> = vec![Box::new(MovementPhase)];
        self.run_phases(&mut phases).await
    }

    pub async fn update_territories(&self) -> Result<FlushStats, SimError> {
        let mut phases: Vec<Box<dyn SimPhase>> = vec![Box::new(TerritoryPhase)];
        self.run_phases(&mut phases).await
    }

    pub async fn create_new_characters(&self) -> Result<FlushStats, SimError> {
        let mut phases: Vec<Box<dyn SimPhase>> = vec![Box::new(CharacterSpawnPhase)];
        self.run_phases(&mut phases).await
    }

    pub async fn redistribute_characters(&self) -> Result<FlushStats, SimError> {
        let mut phases: Vec<Box<dyn SimPhase>> = vec![Box::new(RedistributionPhase)];
        self.run_phases(&mut phases).await
    }

    /// Reassign every titled seat to the strongest eligible captains.
    pub async fn redistribute_titles(&self) -> Result<FlushStats, SimError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let snapshot = state.snapshots.snapshot(&self.store).await?;
        let mut batch = WriteBatch::new(snapshot.next_id);
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            snapshot,
            batch: &mut batch,
            power: &mut state.power,
            rng: &mut state.rng,
            settings: &self.settings,
            now_ms: now_ms(),
            signals: &mut signals,
            inbox: &[],
        };
        super::succession::redistribute_titles(&mut ctx);

        if batch.is_empty() {
            return Ok(FlushStats::default());
        }
        let stats = batch.flush(&self.store).await?;
        state.snapshots.invalidate();
        Ok(stats)
    }

    /// The full background tick: independent phases decide against one
    /// snapshot and commit, then the dependent phases (territory control)
    /// run against the refreshed world.
    pub async fn full_world_update(&self) -> Result<FlushStats, SimError> {
        let mut decide: Vec<Box<dyn SimPhase>> = vec![
            Box::new(EncounterPhase),
            Box::new(MovementPhase),
            Box::new(CharacterSpawnPhase),
            Box::new(RedistributionPhase),
            Box::new(SuccessionPhase),
        ];
        let first = self.run_phases(&mut decide).await?;

        let mut dependent: Vec<Box<dyn SimPhase>> = vec![Box::new(TerritoryPhase)];
        let second = self.run_phases(&mut dependent).await?;

        Ok(FlushStats {
            inserted: first.inserted + second.inserted,
            updated: first.updated + second.updated,
            deleted: first.deleted + second.deleted,
        })
    }

    /// Drop the snapshot and power caches; the next operation reloads.
    pub async fn clear_cache(&self) {
        let mut state = self.state.lock().await;
        state.snapshots.invalidate();
        state.power.clear();
    }
}
