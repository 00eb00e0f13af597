//! Population maintenance: spawning replacement characters toward the
//! configured faction totals, and folding crewless characters back into
//! crews (or founding solo crews when nobody will take them).

use rand::Rng;

use super::context::TickContext;
use super::power::crew_capacity;
use super::system::SimPhase;
use crate::model::{Character, Crew, CrewPosition, Faction, Ship};
use crate::store::batch::CharacterPatch;

pub struct CharacterSpawnPhase;

impl SimPhase for CharacterSpawnPhase {
    fn name(&self) -> &str {
        "spawn"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        create_new_characters(ctx);
    }
}

pub struct RedistributionPhase;

impl SimPhase for RedistributionPhase {
    fn name(&self) -> &str {
        "redistribution"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        redistribute_characters(ctx);
    }
}

/// Top the world back up to the configured per-faction totals. New
/// characters arrive crewless; redistribution places them.
pub fn create_new_characters(ctx: &mut TickContext) -> usize {
    let snapshot = ctx.snapshot;
    let mut created = 0;
    for faction in Faction::ALL {
        let target = ctx.settings.population.for_faction(faction);
        let current = snapshot
            .characters
            .values()
            .filter(|c| c.faction == faction && !c.is_player)
            .count() as u32;
        for _ in current..target {
            let npc = crate::worldgen::characters::random_npc(
                faction,
                ctx.settings.king_haki_gate,
                ctx.rng,
            );
            ctx.batch.insert_character(npc);
            created += 1;
        }
    }
    created
}

/// Place crewless non-civilian characters into same-faction crews with free
/// capacity; anyone left over founds a solo crew. Civilians stay unattached.
pub fn redistribute_characters(ctx: &mut TickContext) -> usize {
    let snapshot = ctx.snapshot;

    let mut crewless: Vec<&Character> = snapshot
        .characters
        .values()
        .filter(|c| c.crew_id == 0 && !c.is_player && c.faction != Faction::Civilian)
        .collect();
    crewless.sort_by_key(|c| c.id);
    if crewless.is_empty() {
        return 0;
    }

    // Free slots per crew, decremented as we hand out berths this tick.
    let mut openings: Vec<(u64, Faction, usize)> = snapshot
        .crews
        .values()
        .filter_map(|crew| {
            let ship = snapshot.ship_of(crew.id)?;
            let capacity = crew_capacity(ship, ctx.settings.ship_capacity_factor);
            let members = snapshot.members_of(crew.id).len();
            (members < capacity).then(|| (crew.id, crew.faction, capacity - members))
        })
        .collect();
    openings.sort_by_key(|(id, _, _)| *id);

    let mut placed = 0;
    for character in crewless {
        let slots: Vec<usize> = openings
            .iter()
            .enumerate()
            .filter(|(_, (_, faction, free))| *faction == character.faction && *free > 0)
            .map(|(i, _)| i)
            .collect();
        if let Some(&slot) = pick_index(ctx, &slots) {
            let (crew_id, _, ref mut free) = openings[slot];
            *free -= 1;
            ctx.batch.patch_character(
                character.id,
                CharacterPatch {
                    crew_id: Some(crew_id),
                    position: Some(CrewPosition::CrewMember),
                    ..Default::default()
                },
            );
            ctx.power.invalidate_crew(crew_id);
        } else {
            found_solo_crew(ctx, character);
        }
        placed += 1;
    }
    placed
}

fn pick_index<'s>(ctx: &mut TickContext, slots: &'s [usize]) -> Option<&'s usize> {
    if slots.is_empty() {
        return None;
    }
    Some(&slots[ctx.rng.random_range(0..slots.len())])
}

/// A crewless character founds a one-person crew at a random island.
fn found_solo_crew(ctx: &mut TickContext, character: &Character) -> u64 {
    let islands: Vec<u64> = ctx.snapshot.islands.keys().copied().collect();
    let island = if islands.is_empty() {
        0
    } else {
        islands[ctx.rng.random_range(0..islands.len())]
    };

    let name = crate::content::generate_crew_name(character.faction, ctx.rng);
    let crew_id = ctx.batch.insert_crew(Crew {
        id: 0,
        name,
        captain_id: character.id,
        faction: character.faction,
        treasury: character.level as f64 * 100.0,
        reputation: character.level as f64 * 5.0,
        current_island: island,
        docked: true,
        founded_at: ctx.now_ms,
    });
    let ship_name = crate::content::generate_ship_name(false, ctx.rng);
    ctx.batch.insert_ship(Ship {
        id: 0,
        crew_id,
        name: ship_name,
        level: (1 + character.level / 25).clamp(1, 5),
        need_repair: false,
        destroyed: false,
    });
    ctx.batch.patch_character(
        character.id,
        CharacterPatch {
            crew_id: Some(crew_id),
            position: Some(CrewPosition::Captain),
            ..Default::default()
        },
    );
    crew_id
}
