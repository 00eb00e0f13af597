//! Membership churn after a battle: the winner poaches disloyal members, the
//! loser sheds some of the rest, orphans band together into a new crew, and
//! a crew bled dry is dissolved.
//!
//! Everything here reads the snapshot and writes the batch; nothing touches
//! the store directly.

use tracing::debug;

use rand::Rng;

use super::context::TickContext;
use super::power::crew_capacity;
use super::signal::WorldSignal;
use crate::model::{Crew, CrewPosition, Ship};
use crate::store::batch::{CharacterPatch, CrewPatch, TerritoryPatch};

// --- Constants ---

const RECRUIT_BASE_CHANCE: f64 = 0.2;
const RECRUIT_LOYALTY_SCALE: f64 = 0.1;
/// After the first successful recruitment, stop with this probability per
/// further candidate. Models "a few defect, not all".
const RECRUIT_EARLY_STOP: f64 = 0.6;

const REMOVAL_CHANCE: f64 = 0.1;
const REMOVAL_EARLY_STOP: f64 = 0.7;

const ORPHAN_TREASURY_PER_LEVEL: f64 = 150.0;
const ORPHAN_TREASURY_BOUNTY_RATE: f64 = 0.01;
const ORPHAN_REPUTATION_PER_LEVEL: f64 = 8.0;

/// What a churn pass did to the losing crew.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChurnReport {
    pub recruited: Vec<u64>,
    pub removed: Vec<u64>,
    pub new_crew: Option<u64>,
    pub dissolved: bool,
}

/// Per-member recruitment chance. Less loyal members defect more readily.
fn recruitment_chance(loyalty: i32) -> f64 {
    RECRUIT_BASE_CHANCE + (1.0 - loyalty as f64 / 100.0) * RECRUIT_LOYALTY_SCALE
}

/// Apply post-battle churn to the losing crew.
pub fn apply_post_battle_churn(
    ctx: &mut TickContext,
    winner_crew: u64,
    loser_crew: u64,
) -> ChurnReport {
    let mut report = ChurnReport::default();
    let (Some(winner), Some(loser)) = (
        ctx.snapshot.crews.get(&winner_crew),
        ctx.snapshot.crews.get(&loser_crew),
    ) else {
        debug!(winner_crew, loser_crew, "churn skipped, crew not in snapshot");
        return report;
    };

    let mut losers: Vec<_> = ctx
        .snapshot
        .members_of(loser_crew)
        .into_iter()
        .filter(|c| !c.is_player)
        .collect();
    losers.sort_by_key(|c| (c.loyalty, c.id));

    // Recruitment: capacity and compatibility gated, least loyal first.
    let capacity = ctx
        .snapshot
        .ship_of(winner_crew)
        .map(|ship| crew_capacity(ship, ctx.settings.ship_capacity_factor))
        .unwrap_or(0);
    let mut winner_count = ctx.snapshot.members_of(winner_crew).len();
    if winner.faction.can_recruit_from(loser.faction) {
        let mut poached_once = false;
        for member in &losers {
            if winner_count >= capacity {
                break;
            }
            if poached_once && ctx.rng.random::<f64>() < RECRUIT_EARLY_STOP {
                break;
            }
            if ctx.rng.random::<f64>() < recruitment_chance(member.loyalty) {
                ctx.batch.patch_character(
                    member.id,
                    CharacterPatch {
                        crew_id: Some(winner_crew),
                        faction: Some(winner.faction),
                        position: Some(CrewPosition::CrewMember),
                        ..Default::default()
                    },
                );
                ctx.signals.push(WorldSignal::MemberPoached {
                    character_id: member.id,
                    from_crew: loser_crew,
                    to_crew: winner_crew,
                });
                report.recruited.push(member.id);
                winner_count += 1;
                poached_once = true;
            }
        }
    }

    // Removal: the rest of the losing crew may scatter, but only while more
    // than one member remains under consideration.
    let remaining: Vec<_> = losers
        .iter()
        .filter(|c| !report.recruited.contains(&c.id))
        .copied()
        .collect();
    let player_members = ctx
        .snapshot
        .members_of(loser_crew)
        .iter()
        .filter(|c| c.is_player)
        .count();
    let mut remaining_count = remaining.len() + player_members;
    let mut removed_once = false;
    for member in &remaining {
        if remaining_count <= 1 {
            break;
        }
        if removed_once && ctx.rng.random::<f64>() < REMOVAL_EARLY_STOP {
            break;
        }
        if ctx.rng.random::<f64>() < REMOVAL_CHANCE {
            report.removed.push(member.id);
            remaining_count -= 1;
            removed_once = true;
        }
    }
    let kept: Vec<_> = remaining
        .iter()
        .filter(|c| !report.removed.contains(&c.id))
        .copied()
        .collect();

    // Orphans found a crew of their own at the same island.
    if !report.removed.is_empty() {
        report.new_crew = Some(found_orphan_crew(ctx, loser, &report.removed));
    }

    let survivors = kept.len() + player_members;
    if survivors == 0 {
        dissolve_crew(ctx, loser_crew);
        report.dissolved = true;
    } else {
        // Captain may have been poached or removed; keep the back-reference
        // valid by promoting the highest-level survivor.
        let captain_gone = report.recruited.contains(&loser.captain_id)
            || report.removed.contains(&loser.captain_id);
        if captain_gone {
            let promoted = kept
                .iter()
                .max_by_key(|c| (c.level, c.id))
                .map(|c| c.id)
                .or_else(|| {
                    ctx.snapshot
                        .members_of(loser_crew)
                        .iter()
                        .find(|c| c.is_player)
                        .map(|c| c.id)
                });
            if let Some(promoted) = promoted {
                ctx.batch.patch_character(
                    promoted,
                    CharacterPatch {
                        position: Some(CrewPosition::Captain),
                        ..Default::default()
                    },
                );
                ctx.batch.patch_crew(
                    loser_crew,
                    CrewPatch {
                        captain_id: Some(promoted),
                        ..Default::default()
                    },
                );
            }
        }
    }

    report
}

/// Synthesize a new crew + ship for orphaned members. The highest-level
/// orphan takes the captaincy; treasury and reputation are seeded from them.
fn found_orphan_crew(ctx: &mut TickContext, origin: &Crew, orphans: &[u64]) -> u64 {
    let captain_id = orphans
        .iter()
        .copied()
        .max_by_key(|id| ctx.snapshot.characters.get(id).map_or(0, |c| c.level))
        .unwrap_or(orphans[0]);
    let captain = ctx.snapshot.characters.get(&captain_id);
    let captain_level = captain.map_or(1, |c| c.level);
    let captain_bounty = captain.map_or(0.0, |c| c.bounty);

    let name = crate::content::generate_crew_name(origin.faction, ctx.rng);
    let crew_id = ctx.batch.insert_crew(Crew {
        id: 0,
        name,
        captain_id,
        faction: origin.faction,
        treasury: captain_level as f64 * ORPHAN_TREASURY_PER_LEVEL
            + captain_bounty * ORPHAN_TREASURY_BOUNTY_RATE,
        reputation: captain_level as f64 * ORPHAN_REPUTATION_PER_LEVEL,
        current_island: origin.current_island,
        docked: true,
        founded_at: ctx.now_ms,
    });

    let ship_name = crate::content::generate_ship_name(false, ctx.rng);
    ctx.batch.insert_ship(Ship {
        id: 0,
        crew_id,
        name: ship_name,
        level: (1 + captain_level / 25).clamp(1, 5),
        need_repair: false,
        destroyed: false,
    });

    for id in orphans {
        let position = if *id == captain_id {
            CrewPosition::Captain
        } else {
            CrewPosition::CrewMember
        };
        ctx.batch.patch_character(
            *id,
            CharacterPatch {
                crew_id: Some(crew_id),
                position: Some(position),
                ..Default::default()
            },
        );
    }

    crew_id
}

/// Delete a crew, its ship, and release any territory it held.
pub fn dissolve_crew(ctx: &mut TickContext, crew_id: u64) {
    ctx.batch.delete_crew(crew_id);
    if let Some(ship) = ctx.snapshot.ship_of(crew_id) {
        ctx.batch.delete_ship(ship.id);
    }
    for claim in ctx.snapshot.territories.values() {
        if claim.crew_id == crew_id {
            ctx.batch
                .patch_territory(claim.id, TerritoryPatch { crew_id: Some(0) });
        }
    }
    ctx.power.invalidate_crew(crew_id);
    ctx.signals.push(WorldSignal::CrewDissolved { crew_id });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recruitment_chance_rises_as_loyalty_falls() {
        assert!(recruitment_chance(-100) > recruitment_chance(0));
        assert!(recruitment_chance(0) > recruitment_chance(100));
        assert!((recruitment_chance(100) - 0.2).abs() < 1e-12);
        assert!((recruitment_chance(-100) - 0.4).abs() < 1e-12);
    }
}
