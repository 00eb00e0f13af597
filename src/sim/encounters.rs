//! Encounter pairing and resolution.
//!
//! Docked crews sharing an island can raid each other; undocked crews meet at
//! sea. Hostile pairings roll an encounter chance, fight via the dice model,
//! and the outcome flows into rewards, churn, and a battle record. Each crew
//! fights at most once per tick.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::battle::{
    BattleSide, MEMBER_REWARD_SHARE, battle_rewards, grant_experience, simulate_crew_battle,
};
use super::churn::apply_post_battle_churn;
use super::context::TickContext;
use super::signal::WorldSignal;
use super::system::SimPhase;
use crate::model::{BattleRecord, Character, Crew, Stance};
use crate::store::batch::{CharacterPatch, CrewPatch};

// --- Constants ---

/// Chance a hostile pairing actually comes to blows.
const ENCOUNTER_CHANCE: f64 = 0.25;
/// Fraction of the bounty gain that lands in the winning crew's treasury.
const TREASURY_SHARE: f64 = 0.1;
/// Crew reputation gained per point of captain experience.
const REPUTATION_PER_EXP: f64 = 0.05;
const MEMBER_JITTER_MIN: f64 = 1.0;
const MEMBER_JITTER_MAX: f64 = 1.2;

pub struct EncounterPhase;

impl SimPhase for EncounterPhase {
    fn name(&self) -> &str {
        "encounters"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        run_encounters(ctx);
    }
}

fn crew_has_player(ctx: &TickContext, crew_id: u64) -> bool {
    ctx.snapshot
        .members_of(crew_id)
        .iter()
        .any(|c| c.is_player)
}

/// A crew may be paired if it has members and a captain, and player crews are
/// only included when configured and idle.
fn eligible(ctx: &TickContext, crew: &Crew) -> bool {
    if ctx.snapshot.members_of(crew.id).is_empty() || ctx.snapshot.captain_of(crew.id).is_none() {
        return false;
    }
    if crew_has_player(ctx, crew.id) {
        return ctx.settings.include_player && !ctx.snapshot.has_active_task(crew.id, ctx.now_ms);
    }
    true
}

/// Pair and resolve encounters for the whole world. Returns the number of
/// battles fought.
pub fn run_encounters(ctx: &mut TickContext) -> usize {
    let snapshot = ctx.snapshot;
    let mut fought: HashSet<u64> = HashSet::new();
    let mut battles = 0;

    // Island raids: docked crews sharing a port.
    let mut island_ids: Vec<u64> = snapshot.islands.keys().copied().collect();
    island_ids.sort_unstable();
    for island_id in island_ids {
        let mut pool: Vec<u64> = snapshot
            .crews_on(island_id)
            .into_iter()
            .filter(|c| c.docked && eligible(ctx, c))
            .map(|c| c.id)
            .collect();
        pool.shuffle(ctx.rng);
        battles += pair_and_resolve(ctx, &pool, &mut fought);
    }

    // Naval encounters: undocked crews anywhere at sea.
    let mut at_sea: Vec<u64> = snapshot
        .crews
        .values()
        .filter(|c| !c.docked && eligible(ctx, c))
        .map(|c| c.id)
        .collect();
    at_sea.shuffle(ctx.rng);
    battles += pair_and_resolve(ctx, &at_sea, &mut fought);

    battles
}

fn pair_and_resolve(ctx: &mut TickContext, pool: &[u64], fought: &mut HashSet<u64>) -> usize {
    let mut battles = 0;
    for pair in pool.chunks(2) {
        let [a, b] = pair else {
            continue;
        };
        if fought.contains(a) || fought.contains(b) {
            continue;
        }
        let (Some(crew_a), Some(crew_b)) =
            (ctx.snapshot.crews.get(a), ctx.snapshot.crews.get(b))
        else {
            continue;
        };
        if crew_a.faction.stance(crew_b.faction) != Stance::Hostile {
            continue;
        }
        if ctx.rng.random::<f64>() >= ENCOUNTER_CHANCE {
            continue;
        }
        fought.insert(*a);
        fought.insert(*b);
        resolve_encounter(ctx, *a, *b);
        battles += 1;
    }
    battles
}

/// Fight one battle between two crews and apply every consequence: rewards,
/// treasury/reputation, churn, record, signals.
pub fn resolve_encounter(ctx: &mut TickContext, challenger: u64, opponent: u64) {
    let snapshot = ctx.snapshot;
    let side_a: Vec<&Character> = snapshot.members_of(challenger);
    let side_b: Vec<&Character> = snapshot.members_of(opponent);

    let Some(outcome) = simulate_crew_battle(
        &side_a,
        &side_b,
        |fruit_id| snapshot.fruits.get(&fruit_id),
        ctx.rng,
    ) else {
        debug!(challenger, opponent, "encounter skipped, empty side");
        return;
    };

    let (winner_crew, loser_crew) = match outcome.winner {
        BattleSide::Challenger => (challenger, opponent),
        BattleSide::Opponent => (opponent, challenger),
    };

    let mut record = BattleRecord {
        id: 0,
        challenger_crew: challenger,
        opponent_crew: opponent,
        winner_crew,
        loser_crew,
        experience_gain: 0.0,
        bounty_gain: 0.0,
        log: outcome.log,
        fought_at: ctx.now_ms,
    };

    match (
        snapshot.captain_of(winner_crew),
        snapshot.captain_of(loser_crew),
    ) {
        (Some(winner_captain), Some(loser_captain)) => {
            let rewards = battle_rewards(
                winner_captain.level,
                loser_captain.level,
                loser_captain.bounty,
            );
            record.experience_gain = rewards.experience_gain;
            record.bounty_gain = rewards.bounty_gain;

            // Captain takes the full reward; members take a jittered share.
            for member in snapshot.members_of(winner_crew) {
                let share = if member.id == winner_captain.id {
                    rewards.experience_gain
                } else {
                    rewards.experience_gain
                        * MEMBER_REWARD_SHARE
                        * ctx.rng.random_range(MEMBER_JITTER_MIN..MEMBER_JITTER_MAX)
                };
                let mut updated = member.clone();
                grant_experience(&mut updated, share, ctx.rng);
                if member.id == winner_captain.id {
                    updated.bounty += rewards.bounty_gain;
                }
                ctx.batch.patch_character(
                    member.id,
                    CharacterPatch {
                        level: Some(updated.level),
                        experience: Some(updated.experience),
                        bounty: Some(updated.bounty),
                        stats: Some(updated.stats),
                        ..Default::default()
                    },
                );
                ctx.power.invalidate_character(snapshot, member.id);
            }

            if let Some(crew) = snapshot.crews.get(&winner_crew) {
                ctx.batch.patch_crew(
                    winner_crew,
                    CrewPatch {
                        treasury: Some(crew.treasury + rewards.bounty_gain * TREASURY_SHARE),
                        reputation: Some(
                            crew.reputation + rewards.experience_gain * REPUTATION_PER_EXP,
                        ),
                        ..Default::default()
                    },
                );
            }
        }
        _ => {
            debug!(winner_crew, loser_crew, "captain missing, rewards skipped");
        }
    }

    ctx.batch.insert_battle(record);
    ctx.signals.push(WorldSignal::CrewDefeated {
        winner_crew,
        loser_crew,
    });

    // A titled holder on the losing side puts their seat in play.
    let loser_ids: HashSet<u64> = snapshot
        .members_of(loser_crew)
        .iter()
        .map(|c| c.id)
        .collect();
    for title in snapshot.titles.values() {
        if title.character_id != 0 && loser_ids.contains(&title.character_id) {
            ctx.signals.push(WorldSignal::TitleHolderDefeated {
                title_id: title.id,
                character_id: title.character_id,
            });
        }
    }

    apply_post_battle_churn(ctx, winner_crew, loser_crew);
    ctx.power.invalidate_crew(winner_crew);
    ctx.power.invalidate_crew(loser_crew);
}
