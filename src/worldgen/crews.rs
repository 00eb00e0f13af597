//! Crew formation: the player's starting crew, then the NPC population
//! grouped under the strongest captains with capacity-respecting rosters.

use rand::{Rng, RngCore};

use crate::content::{generate_character_name, generate_crew_name, generate_ship_name};
use crate::id::IdGenerator;
use crate::model::{Character, CombatStyle, Crew, CrewPosition, Faction, Island, Ship};
use crate::sim::power::character_power;

use super::config::GenerationSettings;

// --- Constants ---

const TREASURY_PER_LEVEL: f64 = 100.0;
const REPUTATION_PER_LEVEL: f64 = 5.0;
/// Scale on `captain_level / 100` for the chance a crew launches with a
/// legendary level-5 ship.
const LEGENDARY_SHIP_SCALE: f64 = 0.3;

/// The player starts as a level-1 pirate captaining a named solo crew on an
/// easy island.
pub fn create_player(
    name: &str,
    islands: &[Island],
    ids: &mut IdGenerator,
    rng: &mut dyn RngCore,
) -> (Character, Crew, Ship) {
    let home = islands
        .iter()
        .min_by_key(|i| i.difficulty)
        .map_or(0, |i| i.id);

    let style = CombatStyle::AllRounder;
    let character_id = ids.next_id();
    let crew_id = ids.next_id();

    let character = Character {
        id: character_id,
        name: if name.is_empty() {
            generate_character_name(Faction::Pirate, rng)
        } else {
            name.to_string()
        },
        faction: Faction::Pirate,
        level: 1,
        experience: 0.0,
        bounty: 0.0,
        stats: super::characters::rolled_stats(style, 1, rng),
        crew_id,
        position: CrewPosition::Captain,
        devil_fruit_id: 0,
        is_player: true,
        kindness: 0,
        loyalty: 100,
        king_haki_potential: rng.random::<f64>(),
        defending_base: false,
        combat_style: style,
    };
    let crew = Crew {
        id: crew_id,
        name: generate_crew_name(Faction::Pirate, rng),
        captain_id: character_id,
        faction: Faction::Pirate,
        treasury: 0.0,
        reputation: 0.0,
        current_island: home,
        docked: true,
        founded_at: 0,
    };
    let ship = Ship {
        id: ids.next_id(),
        crew_id,
        name: generate_ship_name(false, rng),
        level: 1,
        need_repair: false,
        destroyed: false,
    };
    (character, crew, ship)
}

/// Ship granted to a new captain. Level tracks the captain, and strong
/// captains have a shot at a legendary level-5 hull.
pub fn ship_for_captain(
    captain_level: u32,
    crew_id: u64,
    ids: &mut IdGenerator,
    rng: &mut dyn RngCore,
) -> Ship {
    let legendary_chance = captain_level as f64 / 100.0 * LEGENDARY_SHIP_SCALE;
    let legendary = rng.random::<f64>() < legendary_chance;
    let level = if legendary {
        5
    } else {
        (1 + captain_level / 25).clamp(1, 5)
    };
    Ship {
        id: ids.next_id(),
        crew_id,
        name: generate_ship_name(legendary, rng),
        level,
        need_repair: false,
        destroyed: false,
    }
}

/// Group every crewless non-civilian NPC into crews. Within each faction the
/// pool is ranked by individual power; each crew takes the strongest
/// remaining character as captain and fills the roster up to the smaller of
/// the target crew size and the new ship's capacity.
pub fn form_crews(
    characters: &mut [Character],
    islands: &[Island],
    settings: &GenerationSettings,
    ids: &mut IdGenerator,
    rng: &mut dyn RngCore,
) -> (Vec<Crew>, Vec<Ship>) {
    let mut crews = Vec::new();
    let mut ships = Vec::new();

    for faction in Faction::ALL {
        if faction == Faction::Civilian {
            continue;
        }
        let mut pool: Vec<usize> = characters
            .iter()
            .enumerate()
            .filter(|(_, c)| c.faction == faction && c.crew_id == 0 && !c.is_player)
            .map(|(i, _)| i)
            .collect();
        pool.sort_by(|&a, &b| {
            character_power(&characters[b], None).total_cmp(&character_power(&characters[a], None))
        });

        let mut cursor = 0;
        while cursor < pool.len() {
            let captain_index = pool[cursor];
            cursor += 1;

            let crew_id = ids.next_id();
            let captain_level = characters[captain_index].level;
            let ship = ship_for_captain(captain_level, crew_id, ids, rng);
            let capacity = (ship.level * settings.ship_capacity_factor) as usize;
            let roster = (settings.average_crew_size as usize).min(capacity.max(1));

            let island = if islands.is_empty() {
                0
            } else {
                islands[rng.random_range(0..islands.len())].id
            };
            crews.push(Crew {
                id: crew_id,
                name: generate_crew_name(faction, rng),
                captain_id: characters[captain_index].id,
                faction,
                treasury: jittered(captain_level as f64 * TREASURY_PER_LEVEL, rng),
                reputation: jittered(captain_level as f64 * REPUTATION_PER_LEVEL, rng),
                current_island: island,
                docked: rng.random::<f64>() < settings.docked_chance,
                founded_at: 0,
            });
            ships.push(ship);

            let character = &mut characters[captain_index];
            character.crew_id = crew_id;
            character.position = CrewPosition::Captain;

            for _ in 1..roster {
                if cursor >= pool.len() {
                    break;
                }
                let member = &mut characters[pool[cursor]];
                cursor += 1;
                member.crew_id = crew_id;
                member.position = CrewPosition::CrewMember;
            }
        }
    }

    (crews, ships)
}

fn jittered(base: f64, rng: &mut dyn RngCore) -> f64 {
    base * rng.random_range(0.5..1.5)
}
