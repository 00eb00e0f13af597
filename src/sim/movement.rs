//! Crew movement between islands, docked/at-sea toggling, and territory
//! recomputation.
//!
//! Destination choice samples across three difficulty tiers at once: strong
//! crews (low power percentile on their island) lean toward harder islands,
//! weak crews toward easier ones, and emptier islands are favored so no
//! island grows without bound. The tier weights are tuning knobs, not
//! contracts.

use rand::Rng;

use super::context::TickContext;
use super::system::SimPhase;
use crate::model::Crew;
use crate::store::batch::{CrewPatch, TerritoryPatch};

// --- Constants ---

/// Weight of staying in the same difficulty tier; the easier/harder tiers
/// take the crew's percentile and its complement.
const TIER_SAME_WEIGHT: f64 = 0.5;

pub struct MovementPhase;

impl SimPhase for MovementPhase {
    fn name(&self) -> &str {
        "movement"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        run_movement(ctx);
    }
}

pub struct TerritoryPhase;

impl SimPhase for TerritoryPhase {
    fn name(&self) -> &str {
        "territory"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        recompute_territories(ctx);
    }
}

fn crew_has_player(ctx: &TickContext, crew_id: u64) -> bool {
    ctx.snapshot
        .members_of(crew_id)
        .iter()
        .any(|c| c.is_player)
}

fn holds_territory(ctx: &TickContext, crew_id: u64) -> bool {
    ctx.snapshot
        .territories
        .values()
        .any(|t| t.crew_id == crew_id)
}

/// Fraction of co-located crews strictly stronger than this one.
/// 0.0 = strongest crew on the island.
fn power_percentile(ctx: &mut TickContext, crew: &Crew) -> f64 {
    let peers: Vec<u64> = ctx
        .snapshot
        .crews_on(crew.current_island)
        .iter()
        .map(|c| c.id)
        .collect();
    if peers.len() <= 1 {
        return 0.0;
    }
    let own = ctx.power.crew_power(ctx.snapshot, crew.id);
    let stronger = peers
        .iter()
        .filter(|id| **id != crew.id && ctx.power.crew_power(ctx.snapshot, **id) > own)
        .count();
    stronger as f64 / (peers.len() - 1) as f64
}

/// Toggle docked state and move crews between islands. Returns the number of
/// crews that changed island.
pub fn run_movement(ctx: &mut TickContext) -> usize {
    let snapshot = ctx.snapshot;
    let mut moved = 0;

    let mut crew_ids: Vec<u64> = snapshot.crews.keys().copied().collect();
    crew_ids.sort_unstable();

    for crew_id in crew_ids {
        let Some(crew) = snapshot.crews.get(&crew_id) else {
            continue;
        };
        if snapshot.captain_of(crew_id).is_none() {
            continue;
        }
        if crew_has_player(ctx, crew_id)
            && !(ctx.settings.include_player && !snapshot.has_active_task(crew_id, ctx.now_ms))
        {
            continue;
        }
        if holds_territory(ctx, crew_id) {
            continue;
        }

        // Docked toggle: ships leave port (exposing themselves to naval
        // encounters) or put back in.
        if ctx.rng.random::<f64>() < ctx.settings.undock_chance {
            ctx.batch.patch_crew(
                crew_id,
                CrewPatch {
                    docked: Some(!crew.docked),
                    ..Default::default()
                },
            );
            continue;
        }
        if !crew.docked {
            continue;
        }

        if ctx.rng.random::<f64>() >= ctx.settings.movement_chance {
            continue;
        }
        if let Some(destination) = pick_destination(ctx, crew) {
            let docked = ctx.rng.random::<f64>() < ctx.settings.docked_chance;
            ctx.batch.patch_crew(
                crew_id,
                CrewPatch {
                    current_island: Some(destination),
                    docked: Some(docked),
                    ..Default::default()
                },
            );
            moved += 1;
        }
    }

    moved
}

/// Weighted sample over all islands one tier easier, the same tier, and one
/// tier harder than the crew's current island.
fn pick_destination(ctx: &mut TickContext, crew: &Crew) -> Option<u64> {
    let snapshot = ctx.snapshot;
    let current = snapshot.islands.get(&crew.current_island)?;
    let percentile = power_percentile(ctx, crew);

    // Low percentile = strong crew = push toward harder islands.
    let tier_weight = |difficulty: u32| -> f64 {
        if difficulty < current.difficulty {
            percentile
        } else if difficulty == current.difficulty {
            TIER_SAME_WEIGHT
        } else {
            1.0 - percentile
        }
    };

    let mut candidates: Vec<(u64, f64)> = Vec::new();
    for island in snapshot.islands.values() {
        if island.id == crew.current_island {
            continue;
        }
        if island.difficulty + 1 < current.difficulty
            || island.difficulty > current.difficulty + 1
        {
            continue;
        }
        let population = snapshot.crews_on(island.id).len();
        let weight = tier_weight(island.difficulty) / (1.0 + population as f64);
        if weight > 0.0 {
            candidates.push((island.id, weight));
        }
    }

    let total: f64 = candidates.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = ctx.rng.random::<f64>() * total;
    for (island_id, weight) in &candidates {
        roll -= weight;
        if roll <= 0.0 {
            return Some(*island_id);
        }
    }
    candidates.last().map(|(id, _)| *id)
}

/// For every island with a live claim, the strongest non-player crew present
/// takes (or keeps) it; with no eligible crew the claim reverts to 0.
pub fn recompute_territories(ctx: &mut TickContext) -> usize {
    let snapshot = ctx.snapshot;
    let mut changed = 0;

    let claims: Vec<(u64, u64, u64)> = snapshot
        .territories
        .values()
        .filter(|t| t.crew_id != 0)
        .map(|t| (t.id, t.island_id, t.crew_id))
        .collect();

    for (claim_id, island_id, holder) in claims {
        let candidates: Vec<u64> = snapshot
            .crews_on(island_id)
            .iter()
            .filter(|c| !crew_has_player(ctx, c.id) && !snapshot.members_of(c.id).is_empty())
            .map(|c| c.id)
            .collect();
        let strongest = candidates
            .into_iter()
            .map(|id| (id, ctx.power.crew_power(snapshot, id)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .unwrap_or(0);
        if strongest != holder {
            ctx.batch
                .patch_territory(claim_id, TerritoryPatch { crew_id: Some(strongest) });
            changed += 1;
        }
    }

    changed
}
