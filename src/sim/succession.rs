//! Titled-role succession: refilling vacated seats and periodically
//! redistributing every seat to the currently strongest eligible captains.
//!
//! Vacancies picked up mid-tick (via `TitleHolderDefeated` signals) or found
//! as `character_id == 0` are filled by a uniform draw over eligible captains.
//! Full redistribution instead ranks eligible captains by crew power and
//! hands the top N of each role their seat. Titles have no patch form, so a
//! reassignment deletes the old record and inserts a fresh one anchored to a
//! newly drawn island.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use super::signal::WorldSignal;
use super::system::SimPhase;
use crate::model::{Character, TitleRecord, TitledRole};

// --- Constants ---

pub(crate) const MIN_LEVEL: u32 = 150;
pub(crate) const MIN_BOUNTY: f64 = 500_000_000.0;
/// Exponent step per point of prestige when weighting base islands by
/// difficulty.
pub(crate) const PRESTIGE_BIAS: f64 = 0.75;

pub struct SuccessionPhase;

impl SimPhase for SuccessionPhase {
    fn name(&self) -> &str {
        "succession"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        fill_vacancies(ctx, &[]);
    }

    fn handle_signals(&mut self, ctx: &mut TickContext) {
        let defeated: Vec<u64> = ctx
            .inbox
            .iter()
            .filter_map(|s| match s {
                WorldSignal::TitleHolderDefeated { title_id, .. } => Some(*title_id),
                _ => None,
            })
            .collect();
        if !defeated.is_empty() {
            fill_vacancies(ctx, &defeated);
        }
    }
}

/// Succession eligibility: a non-player captain of the role's faction, past
/// the level gate, and past the bounty gate where the role carries one.
fn is_eligible(character: &Character, role: TitledRole) -> bool {
    character.is_captain()
        && !character.is_player
        && character.faction == role.faction()
        && character.level >= MIN_LEVEL
        && (!role.requires_bounty() || character.bounty >= MIN_BOUNTY)
}

fn current_holders(ctx: &TickContext) -> HashSet<u64> {
    ctx.snapshot
        .titles
        .values()
        .filter(|t| t.character_id != 0)
        .map(|t| t.character_id)
        .collect()
}

/// Draw a base island, weighted toward higher difficulty for more
/// prestigious roles.
fn pick_base_island(ctx: &mut TickContext, role: TitledRole) -> u64 {
    let snapshot = ctx.snapshot;
    let exponent = role.prestige() as f64 * PRESTIGE_BIAS;
    let candidates: Vec<(u64, f64)> = snapshot
        .islands
        .values()
        .map(|i| (i.id, (i.difficulty as f64).powf(exponent)))
        .collect();
    let total: f64 = candidates.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return 0;
    }
    let mut roll = ctx.rng.random::<f64>() * total;
    for (island_id, weight) in &candidates {
        roll -= weight;
        if roll <= 0.0 {
            return *island_id;
        }
    }
    candidates.last().map_or(0, |(id, _)| *id)
}

/// Fill vacated seats. `defeated_titles` are seats lost this tick; on top of
/// those, any record already marked vacant is refilled. Successors are drawn
/// uniformly from eligible captains not already seated.
pub fn fill_vacancies(ctx: &mut TickContext, defeated_titles: &[u64]) -> usize {
    let snapshot = ctx.snapshot;
    let mut taken = current_holders(ctx);
    let mut filled = 0;

    let vacancies: Vec<(u64, TitledRole)> = snapshot
        .titles
        .values()
        .filter(|t| t.character_id == 0 || defeated_titles.contains(&t.id))
        .map(|t| (t.id, t.role))
        .collect();

    for (title_id, role) in vacancies {
        if let Some(old) = snapshot.titles.get(&title_id) {
            taken.remove(&old.character_id);
        }
        let candidates: Vec<u64> = snapshot
            .characters
            .values()
            .filter(|c| is_eligible(c, role) && !taken.contains(&c.id))
            .map(|c| c.id)
            .collect();
        let Some(successor) = pick_uniform(ctx, &candidates) else {
            debug!(role = role.as_str(), "no eligible successor, seat stays vacant");
            continue;
        };

        let base_island = pick_base_island(ctx, role);
        ctx.batch.delete_title(title_id);
        ctx.batch.insert_title(TitleRecord {
            id: 0,
            role,
            character_id: successor,
            base_island,
        });
        taken.insert(successor);
        filled += 1;
    }

    filled
}

fn pick_uniform(ctx: &mut TickContext, candidates: &[u64]) -> Option<u64> {
    if candidates.is_empty() {
        return None;
    }
    let index = ctx.rng.random_range(0..candidates.len());
    Some(candidates[index])
}

/// Full redistribution: every seat of every role reassigned to the top
/// eligible captains ranked by crew power. Record count per role ends at the
/// configured count, or lower only when eligible captains run short.
pub fn redistribute_titles(ctx: &mut TickContext) -> usize {
    let snapshot = ctx.snapshot;
    let mut assigned: HashSet<u64> = HashSet::new();
    let mut created = 0;

    for title in snapshot.titles.values() {
        ctx.batch.delete_title(title.id);
    }

    for role in TitledRole::ALL {
        let mut ranked: Vec<(u64, f64)> = snapshot
            .characters
            .values()
            .filter(|c| is_eligible(c, role) && !assigned.contains(&c.id))
            .map(|c| (c.id, ctx.power.crew_power(snapshot, c.crew_id)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let want = ctx.settings.titles.for_role(role) as usize;
        for (character_id, _) in ranked.into_iter().take(want) {
            let base_island = pick_base_island(ctx, role);
            ctx.batch.insert_title(TitleRecord {
                id: 0,
                role,
                character_id,
                base_island,
            });
            assigned.insert(character_id);
            created += 1;
        }
    }

    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CombatStyle, CrewPosition, Faction, StatBlock};

    fn captain(faction: Faction, level: u32, bounty: f64) -> Character {
        Character {
            id: 1,
            name: "Candidate".to_string(),
            faction,
            level,
            experience: 0.0,
            bounty,
            stats: StatBlock::default(),
            crew_id: 1,
            position: CrewPosition::Captain,
            devil_fruit_id: 0,
            is_player: false,
            kindness: 0,
            loyalty: 0,
            king_haki_potential: 0.0,
            defending_base: false,
            combat_style: CombatStyle::Swordsman,
        }
    }

    #[test]
    fn pirate_roles_gate_on_bounty() {
        let poor = captain(Faction::Pirate, 200, 1_000.0);
        let rich = captain(Faction::Pirate, 200, 600_000_000.0);
        assert!(!is_eligible(&poor, TitledRole::Yonkou));
        assert!(is_eligible(&rich, TitledRole::Yonkou));
    }

    #[test]
    fn marine_roles_ignore_bounty() {
        let marine = captain(Faction::Marine, 200, 0.0);
        assert!(is_eligible(&marine, TitledRole::Admiral));
        assert!(!is_eligible(&marine, TitledRole::Yonkou));
    }

    #[test]
    fn level_gate_enforced() {
        let young = captain(Faction::Marine, 149, 0.0);
        assert!(!is_eligible(&young, TitledRole::Admiral));
    }

    #[test]
    fn players_never_take_titles() {
        let mut player = captain(Faction::Pirate, 300, 900_000_000.0);
        player.is_player = true;
        assert!(!is_eligible(&player, TitledRole::Yonkou));
    }
}
