use rand::RngCore;

use crate::content::{generate_island_name, island_description};
use crate::id::IdGenerator;
use crate::model::Island;

use super::config::GenerationSettings;

/// Lay out `difficulty_levels x islands_per_level` islands with difficulties
/// spread evenly across 1..=30.
pub fn generate_islands(
    settings: &GenerationSettings,
    ids: &mut IdGenerator,
    rng: &mut dyn RngCore,
) -> Vec<Island> {
    let levels = settings.difficulty_levels.max(1);
    let mut islands = Vec::new();
    for tier in 0..levels {
        let difficulty = if levels == 1 {
            1
        } else {
            1 + tier * 29 / (levels - 1)
        };
        for _ in 0..settings.islands_per_level {
            islands.push(Island {
                id: ids.next_id(),
                name: generate_island_name(difficulty, rng),
                difficulty,
                description: island_description(difficulty).to_string(),
            });
        }
    }
    islands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::config::WorldSize;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn small_preset_island_count_and_difficulty_spread() {
        let settings = WorldSize::Small.settings();
        let mut ids = IdGenerator::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let islands = generate_islands(&settings, &mut ids, &mut rng);

        assert_eq!(islands.len(), 30);
        assert!(islands.iter().all(|i| (1..=30).contains(&i.difficulty)));
        assert_eq!(islands.iter().map(|i| i.difficulty).min(), Some(1));
        assert_eq!(islands.iter().map(|i| i.difficulty).max(), Some(30));
    }

    #[test]
    fn island_ids_unique() {
        let settings = WorldSize::Small.settings();
        let mut ids = IdGenerator::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let islands = generate_islands(&settings, &mut ids, &mut rng);
        let mut seen: Vec<u64> = islands.iter().map(|i| i.id).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), islands.len());
    }
}
