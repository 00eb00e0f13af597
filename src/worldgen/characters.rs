//! NPC generation: levels, stat blocks, bounties, and temperament, all
//! driven by the character's combat style template and level.

use rand::Rng;
use rand::RngCore;

use crate::content::generate_character_name;
use crate::model::{Character, CombatStyle, CrewPosition, Faction, StatBlock};
use crate::sim::battle::scaled_growth;

// --- Constants ---

const LEVEL_MAX: u32 = 100;
/// Exponent skewing the level roll toward the low end; most of the world is
/// small fry.
const LEVEL_SKEW: f64 = 1.6;
const STAT_JITTER_MIN: f64 = 0.8;
const STAT_JITTER_MAX: f64 = 1.2;
const PIRATE_BOUNTY_PER_LEVEL_SQ: f64 = 1_000.0;
const HUNTER_BOUNTY_SCALE: f64 = 0.1;

/// Low-biased level in 1..=100.
pub fn random_level(rng: &mut dyn RngCore) -> u32 {
    let roll: f64 = rng.random::<f64>().powf(LEVEL_SKEW);
    1 + (roll * (LEVEL_MAX - 1) as f64).floor() as u32
}

fn random_style(faction: Faction, rng: &mut dyn RngCore) -> CombatStyle {
    if faction == Faction::Civilian {
        // Civilians do not train a martial discipline.
        return CombatStyle::AllRounder;
    }
    CombatStyle::ALL[rng.random_range(0..CombatStyle::ALL.len())]
}

/// Stats for a fresh character: the style's growth template applied per
/// level with jitter. The devil fruit stat stays 0 until a fruit is
/// assigned.
pub fn rolled_stats(style: CombatStyle, level: u32, rng: &mut dyn RngCore) -> StatBlock {
    let jitter = rng.random_range(STAT_JITTER_MIN..STAT_JITTER_MAX);
    let mut stats = scaled_growth(&style.growth(), level as f64 * jitter);
    stats.devil_fruit = 0.0;
    // Conqueror's haki starts locked for everyone; the unlock is rolled at
    // level-up time.
    stats.conqueror = 0.0;
    stats
}

fn rolled_bounty(faction: Faction, level: u32, rng: &mut dyn RngCore) -> f64 {
    let jitter = rng.random_range(0.5..1.5);
    match faction {
        Faction::Pirate => (level as f64).powi(2) * PIRATE_BOUNTY_PER_LEVEL_SQ * jitter,
        Faction::BountyHunter => {
            (level as f64).powi(2) * PIRATE_BOUNTY_PER_LEVEL_SQ * HUNTER_BOUNTY_SCALE * jitter
        }
        _ => 0.0,
    }
}

/// Generate one crewless NPC of the given faction. `king_haki_gate` caps the
/// rolled conqueror's-haki potential.
pub fn random_npc(faction: Faction, king_haki_gate: f64, rng: &mut dyn RngCore) -> Character {
    let level = random_level(rng);
    let style = random_style(faction, rng);
    Character {
        id: 0,
        name: generate_character_name(faction, rng),
        faction,
        level,
        experience: 0.0,
        bounty: rolled_bounty(faction, level, rng),
        stats: rolled_stats(style, level, rng),
        crew_id: 0,
        position: CrewPosition::CrewMember,
        devil_fruit_id: 0,
        is_player: false,
        kindness: rng.random_range(-100..=100),
        loyalty: rng.random_range(-100..=100),
        king_haki_potential: rng.random::<f64>() * king_haki_gate.clamp(0.0, 1.0),
        defending_base: false,
        combat_style: style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn levels_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let level = random_level(&mut rng);
            assert!((1..=100).contains(&level), "{level}");
        }
    }

    #[test]
    fn level_distribution_skews_low() {
        let mut rng = SmallRng::seed_from_u64(11);
        let below_50 = (0..2000).filter(|_| random_level(&mut rng) <= 50).count();
        assert!(below_50 > 1200, "only {below_50} of 2000 at or below 50");
    }

    #[test]
    fn civilians_carry_no_bounty() {
        let mut rng = SmallRng::seed_from_u64(3);
        let npc = random_npc(Faction::Civilian, 0.3, &mut rng);
        assert_eq!(npc.bounty, 0.0);
        assert_eq!(npc.crew_id, 0);
    }

    #[test]
    fn pirates_outearn_bounty_hunters_at_same_level() {
        let mut rng = SmallRng::seed_from_u64(5);
        let pirate = rolled_bounty(Faction::Pirate, 50, &mut rng);
        let hunter = rolled_bounty(Faction::BountyHunter, 50, &mut rng);
        assert!(pirate > hunter);
    }

    #[test]
    fn fresh_stats_have_no_fruit_or_conqueror() {
        let mut rng = SmallRng::seed_from_u64(9);
        let stats = rolled_stats(CombatStyle::FruitSpecialist, 40, &mut rng);
        assert_eq!(stats.devil_fruit, 0.0);
        assert_eq!(stats.conqueror, 0.0);
        assert!(stats.attack > 0.0);
    }

    #[test]
    fn haki_potential_respects_gate() {
        let mut rng = SmallRng::seed_from_u64(13);
        for _ in 0..200 {
            let npc = random_npc(Faction::Pirate, 0.3, &mut rng);
            assert!(npc.king_haki_potential <= 0.3);
        }
    }
}
