//! Devil fruit pool: one row per catalog entry, then a partial hand-out to
//! non-civilian characters.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::content::FRUIT_CATALOG;
use crate::id::IdGenerator;
use crate::model::{Character, DevilFruit, Faction};

const FRUIT_STAT_JITTER_MIN: f64 = 0.8;
const FRUIT_STAT_JITTER_MAX: f64 = 1.2;

/// Instantiate the full catalog, all unowned.
pub fn generate_fruit_pool(ids: &mut IdGenerator) -> Vec<DevilFruit> {
    FRUIT_CATALOG
        .iter()
        .map(|spec| DevilFruit {
            id: ids.next_id(),
            name: spec.name.to_string(),
            kind: spec.kind,
            rarity: spec.rarity,
            awakening_level: DevilFruit::awakening_level_for(spec.rarity),
            owner_id: 0,
        })
        .collect()
}

/// Hand out `rate` of the eligible population's worth of fruits, capped by
/// pool size. Eligible eaters are non-civilian NPCs without a fruit. Links
/// are written on both sides and the eater's fruit stat is seeded from the
/// fruit's rarity.
pub fn distribute_fruits(
    characters: &mut [Character],
    fruits: &mut [DevilFruit],
    rate: f64,
    rng: &mut dyn RngCore,
) -> usize {
    let mut eaters: Vec<usize> = characters
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            c.faction != Faction::Civilian && !c.is_player && c.devil_fruit_id == 0
        })
        .map(|(i, _)| i)
        .collect();
    eaters.shuffle(rng);

    let mut pool: Vec<usize> = fruits
        .iter()
        .enumerate()
        .filter(|(_, f)| f.owner_id == 0)
        .map(|(i, _)| i)
        .collect();
    pool.shuffle(rng);

    let target = (eaters.len() as f64 * rate.clamp(0.0, 1.0)).round() as usize;
    let count = target.min(pool.len());

    for (&eater, &fruit) in eaters.iter().zip(pool.iter()).take(count) {
        let character = &mut characters[eater];
        let fruit = &mut fruits[fruit];
        character.devil_fruit_id = fruit.id;
        fruit.owner_id = character.id;
        let jitter = rng.random_range(FRUIT_STAT_JITTER_MIN..FRUIT_STAT_JITTER_MAX);
        character.stats.devil_fruit = character.level as f64 * fruit.rarity * jitter;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::characters::random_npc;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn pool_matches_catalog() {
        let mut ids = IdGenerator::new();
        let pool = generate_fruit_pool(&mut ids);
        assert_eq!(pool.len(), FRUIT_CATALOG.len());
        assert!(pool.iter().all(|f| f.owner_id == 0));
        assert!(pool.iter().all(|f| f.id != 0));
    }

    #[test]
    fn distribution_links_both_sides() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut ids = IdGenerator::new();
        let mut fruits = generate_fruit_pool(&mut ids);
        let mut characters: Vec<Character> = (0..100)
            .map(|_| {
                let mut c = random_npc(Faction::Pirate, 0.3, &mut rng);
                c.id = ids.next_id();
                c
            })
            .collect();

        let given = distribute_fruits(&mut characters, &mut fruits, 0.2, &mut rng);
        assert_eq!(given, 20);

        for fruit in fruits.iter().filter(|f| f.owner_id != 0) {
            let owner = characters.iter().find(|c| c.id == fruit.owner_id).unwrap();
            assert_eq!(owner.devil_fruit_id, fruit.id);
            assert!(owner.stats.devil_fruit > 0.0);
        }
    }

    #[test]
    fn civilians_never_receive_fruits() {
        let mut rng = SmallRng::seed_from_u64(23);
        let mut ids = IdGenerator::new();
        let mut fruits = generate_fruit_pool(&mut ids);
        let mut characters: Vec<Character> = (0..50)
            .map(|_| {
                let mut c = random_npc(Faction::Civilian, 0.3, &mut rng);
                c.id = ids.next_id();
                c
            })
            .collect();

        let given = distribute_fruits(&mut characters, &mut fruits, 1.0, &mut rng);
        assert_eq!(given, 0);
        assert!(characters.iter().all(|c| c.devil_fruit_id == 0));
    }
}
