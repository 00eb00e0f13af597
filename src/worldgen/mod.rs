//! World generation: a deterministic pipeline that builds the full starting
//! state in memory from one seed, then persists it in a single pass.
//!
//! Step order matters. Islands and the fruit pool come first, then the player
//! and the NPC population, then titles (which boost their holders), then
//! fruit hand-outs, then crew formation, and finally territory claims for the
//! titled bases.

pub mod characters;
pub mod config;
pub mod crews;
pub mod fruits;
pub mod islands;
pub mod titles;

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::error::{ConfigError, SimError};
use crate::id::IdGenerator;
use crate::model::{
    Character, Crew, DevilFruit, Faction, Island, Ship, TerritoryClaim, TitleRecord,
};
use crate::store::WorldStore;

pub use config::{FactionCounts, GenerationSettings, TitleCounts, WorldSize};

/// Everything one generation run produces, before persistence.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub islands: Vec<Island>,
    pub fruits: Vec<DevilFruit>,
    pub characters: Vec<Character>,
    pub crews: Vec<Crew>,
    pub ships: Vec<Ship>,
    pub titles: Vec<TitleRecord>,
    pub territories: Vec<TerritoryClaim>,
    pub player_character_id: u64,
    pub player_crew_id: u64,
}

/// Build a complete world in memory. Deterministic per `(settings, seed,
/// player_name)`. The player counts toward the pirate population target.
pub fn generate_world(
    settings: &GenerationSettings,
    seed: u64,
    player_name: &str,
) -> Result<GeneratedWorld, ConfigError> {
    settings.validate()?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ids = IdGenerator::new();

    let islands = islands::generate_islands(settings, &mut ids, &mut rng);
    let mut fruits = fruits::generate_fruit_pool(&mut ids);

    let (player, player_crew, player_ship) =
        crews::create_player(player_name, &islands, &mut ids, &mut rng);
    let player_character_id = player.id;
    let player_crew_id = player_crew.id;

    let mut characters = vec![player];
    for faction in Faction::ALL {
        let mut target = settings.population.for_faction(faction);
        if faction == Faction::Pirate {
            target = target.saturating_sub(1);
        }
        for _ in 0..target {
            let mut npc = characters::random_npc(faction, settings.king_haki_gate, &mut rng);
            npc.id = ids.next_id();
            characters.push(npc);
        }
    }

    let titles = titles::assign_titles(&mut characters, &islands, settings, &mut ids, &mut rng);
    fruits::distribute_fruits(
        &mut characters,
        &mut fruits,
        settings.fruit_distribution_rate,
        &mut rng,
    );

    let (npc_crews, npc_ships) =
        crews::form_crews(&mut characters, &islands, settings, &mut ids, &mut rng);
    let mut crews = vec![player_crew];
    crews.extend(npc_crews);
    let mut ships = vec![player_ship];
    ships.extend(npc_ships);

    let territories = claim_titled_bases(&characters, &titles, &mut ids);

    Ok(GeneratedWorld {
        islands,
        fruits,
        characters,
        crews,
        ships,
        titles,
        territories,
        player_character_id,
        player_crew_id,
    })
}

/// One territory claim per distinct titled base island, held by the title
/// holder's crew. Non-base islands start unclaimed and get no row.
fn claim_titled_bases(
    characters: &[Character],
    titles: &[TitleRecord],
    ids: &mut IdGenerator,
) -> Vec<TerritoryClaim> {
    let mut claimed: HashSet<u64> = HashSet::new();
    let mut claims = Vec::new();
    for title in titles {
        if title.base_island == 0 || !claimed.insert(title.base_island) {
            continue;
        }
        let crew_id = characters
            .iter()
            .find(|c| c.id == title.character_id)
            .map_or(0, |c| c.crew_id);
        claims.push(TerritoryClaim {
            id: ids.next_id(),
            island_id: title.base_island,
            crew_id,
        });
    }
    claims
}

/// Generate a world and replace the store's contents with it.
pub async fn generate_into_store(
    store: &WorldStore,
    settings: &GenerationSettings,
    seed: u64,
    player_name: &str,
) -> Result<GeneratedWorld, SimError> {
    let world = generate_world(settings, seed, player_name)?;

    store.clear_all().await?;
    store.insert_islands(&world.islands).await?;
    store.insert_fruits(&world.fruits).await?;
    store.insert_characters(&world.characters).await?;
    store.insert_crews(&world.crews).await?;
    store.insert_ships(&world.ships).await?;
    store.insert_titles(&world.titles).await?;
    store.insert_territories(&world.territories).await?;

    info!(
        characters = world.characters.len(),
        crews = world.crews.len(),
        islands = world.islands.len(),
        titles = world.titles.len(),
        seed,
        "world generated"
    );
    Ok(world)
}
