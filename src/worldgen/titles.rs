//! Initial titled-role assignment. The strongest characters of each role's
//! faction are promoted into the scarce top ranks and boosted past the
//! normal level cap so the world starts with credible powerhouses.

use std::collections::HashSet;

use rand::{Rng, RngCore};

use crate::id::IdGenerator;
use crate::model::{Character, Island, TitleRecord, TitledRole};
use crate::sim::power::character_power;
use crate::sim::succession::{MIN_BOUNTY, MIN_LEVEL, PRESTIGE_BIAS};

use super::characters::rolled_stats;
use super::config::GenerationSettings;

/// Extra levels rolled on top of the eligibility floor for a new titleholder.
const TITLE_LEVEL_SPREAD: u32 = 50;

/// Promote the top characters of each faction into the configured titled
/// seats. Holders are leveled up to the succession gates so later vacancies
/// can be judged by the same bar.
pub fn assign_titles(
    characters: &mut [Character],
    islands: &[Island],
    settings: &GenerationSettings,
    ids: &mut IdGenerator,
    rng: &mut dyn RngCore,
) -> Vec<TitleRecord> {
    let mut titles = Vec::new();
    let mut taken: HashSet<u64> = HashSet::new();

    for role in TitledRole::ALL {
        let mut ranked: Vec<(usize, f64)> = characters
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.faction == role.faction() && !c.is_player && !taken.contains(&c.id)
            })
            .map(|(i, c)| (i, character_power(c, None)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let want = settings.titles.for_role(role) as usize;
        for (index, _) in ranked.into_iter().take(want) {
            let character = &mut characters[index];
            promote_holder(character, role, rng);
            taken.insert(character.id);
            titles.push(TitleRecord {
                id: ids.next_id(),
                role,
                character_id: character.id,
                base_island: pick_base_island(islands, role, rng),
            });
        }
    }
    titles
}

/// Raise a fresh holder past the succession gates. Stats are rerolled at the
/// boosted level; the fruit stat is untouched because fruits are handed out
/// after titles.
fn promote_holder(character: &mut Character, role: TitledRole, rng: &mut dyn RngCore) {
    let boosted = MIN_LEVEL + rng.random_range(0..=TITLE_LEVEL_SPREAD);
    if character.level < boosted {
        character.level = boosted;
        character.stats = rolled_stats(character.combat_style, boosted, rng);
    }
    if role.requires_bounty() && character.bounty < MIN_BOUNTY {
        character.bounty = MIN_BOUNTY * rng.random_range(1.0..2.0);
    }
}

/// Weighted island draw biased toward higher difficulty for the more
/// prestigious roles.
fn pick_base_island(islands: &[Island], role: TitledRole, rng: &mut dyn RngCore) -> u64 {
    let exponent = role.prestige() as f64 * PRESTIGE_BIAS;
    let total: f64 = islands
        .iter()
        .map(|i| (i.difficulty as f64).powf(exponent))
        .sum();
    if total <= 0.0 {
        return 0;
    }
    let mut roll = rng.random::<f64>() * total;
    for island in islands {
        roll -= (island.difficulty as f64).powf(exponent);
        if roll <= 0.0 {
            return island.id;
        }
    }
    islands.last().map_or(0, |i| i.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Faction;
    use crate::worldgen::characters::random_npc;
    use crate::worldgen::config::WorldSize;
    use crate::worldgen::islands::generate_islands;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn seeded_world(seed: u64) -> (Vec<Character>, Vec<Island>, IdGenerator, SmallRng) {
        let settings = WorldSize::Small.settings();
        let mut ids = IdGenerator::new();
        let mut rng = SmallRng::seed_from_u64(seed);
        let islands = generate_islands(&settings, &mut ids, &mut rng);
        let mut characters = Vec::new();
        for faction in Faction::ALL {
            for _ in 0..settings.population.for_faction(faction) {
                let mut c = random_npc(faction, settings.king_haki_gate, &mut rng);
                c.id = ids.next_id();
                characters.push(c);
            }
        }
        (characters, islands, ids, rng)
    }

    #[test]
    fn small_preset_fills_every_seat() {
        let settings = WorldSize::Small.settings();
        let (mut characters, islands, mut ids, mut rng) = seeded_world(31);
        let titles = assign_titles(&mut characters, &islands, &settings, &mut ids, &mut rng);
        assert_eq!(titles.len() as u32, settings.titles.total());
    }

    #[test]
    fn holders_pass_the_succession_gates() {
        let settings = WorldSize::Small.settings();
        let (mut characters, islands, mut ids, mut rng) = seeded_world(37);
        let titles = assign_titles(&mut characters, &islands, &settings, &mut ids, &mut rng);

        for title in &titles {
            let holder = characters.iter().find(|c| c.id == title.character_id).unwrap();
            assert_eq!(holder.faction, title.role.faction());
            assert!(holder.level >= MIN_LEVEL);
            if title.role.requires_bounty() {
                assert!(holder.bounty >= MIN_BOUNTY);
            }
        }
    }

    #[test]
    fn no_character_holds_two_seats() {
        let settings = WorldSize::Small.settings();
        let (mut characters, islands, mut ids, mut rng) = seeded_world(41);
        let titles = assign_titles(&mut characters, &islands, &settings, &mut ids, &mut rng);
        let mut holders: Vec<u64> = titles.iter().map(|t| t.character_id).collect();
        holders.sort_unstable();
        holders.dedup();
        assert_eq!(holders.len(), titles.len());
    }
}
