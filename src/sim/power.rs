//! Pure power calculation: maps a character's stat block (plus optional devil
//! fruit) to a single scalar combat-strength value. No side effects; callers
//! cache results via [`super::cache::PowerCache`].

use crate::model::{Character, DevilFruit, FruitKind, Ship, StatBlock};

// --- Stat weights ---

const W_ATTACK: f64 = 1.0;
const W_DEFENSE: f64 = 0.8;
const W_SPEED: f64 = 0.85;
const W_INTELLIGENCE: f64 = 0.7;
const W_SKILL: f64 = 0.9;
const W_ARMAMENT: f64 = 0.9;
const W_OBSERVATION: f64 = 0.8;
const W_CONQUEROR: f64 = 0.8;

// --- Haki ---

const ARM_SYNERGY: f64 = 0.3;
const OBS_SYNERGY: f64 = 0.3;
const CONQ_LEVEL_SCALE: f64 = 0.015;
const CONQ_MASTERY: f64 = 80.0;
const CONQ_MASTERY_BONUS: f64 = 40.0;
const CONQ_INT_SYNERGY: f64 = 0.25;

// --- Devil fruit ---

const W_FRUIT: f64 = 0.9;
const FRUIT_LEVEL_SCALE: f64 = 0.01;
const RARITY_SCALE: f64 = 1.5;
const AWAKENING_MULT: f64 = 1.6;
const KIND_SYNERGY_SCALE: f64 = 0.002;
const KIND_SYNERGY_CAP: f64 = 1.3;

// --- Level ---

const LEVEL_BASE: f64 = 2.0;
const VETERAN_LEVEL: u32 = 50;
const VETERAN_BONUS: f64 = 1.5;

// --- Build-shape bonuses ---

const SPIKE_RATIO: f64 = 1.2;
const SPIKE_SCALE: f64 = 0.25;
const PAIR_SYNERGY: f64 = 0.05;
const TACTICAL_SYNERGY: f64 = 0.5;

// --- Final multipliers ---

const CONQ_MULT_SCALE: f64 = 0.002;
const CONQ_MULT_MASTERY_BONUS: f64 = 0.1;
const LEVEL_MULT_SCALE: f64 = 0.003;
const UNPREDICTABILITY_SCALE: f64 = 0.15;
const BOUNTY_BASE: f64 = 2.0;

/// Weighted physical component: attack, defense, speed.
pub fn physical_power(stats: &StatBlock) -> f64 {
    stats.attack * W_ATTACK + stats.defense * W_DEFENSE + stats.speed * W_SPEED
}

/// Weighted mental component: intelligence, skill.
pub fn mental_power(stats: &StatBlock) -> f64 {
    stats.intelligence * W_INTELLIGENCE + stats.skill * W_SKILL
}

/// Haki component. Armament synergizes with physical technique, observation
/// with speed and intelligence, conqueror scales with level and crosses a
/// mastery threshold.
pub fn haki_power(character: &Character) -> f64 {
    let s = &character.stats;
    let level = character.level as f64;

    let armament = s.armament * W_ARMAMENT
        + ARM_SYNERGY * s.armament.min(0.5 * (s.attack + s.skill));
    let observation = s.observation * W_OBSERVATION
        + OBS_SYNERGY * s.observation.min(0.5 * (s.speed + s.intelligence));

    let mut conqueror = s.conqueror * W_CONQUEROR * (1.0 + level * CONQ_LEVEL_SCALE)
        + CONQ_INT_SYNERGY * s.conqueror.min(s.intelligence);
    if s.conqueror >= CONQ_MASTERY {
        conqueror += CONQ_MASTERY_BONUS;
    }

    armament + observation + conqueror
}

/// Devil fruit component. Exactly 0 when the character holds no fruit or the
/// fruit stat is non-positive, regardless of every other stat.
pub fn fruit_power(character: &Character, fruit: Option<&DevilFruit>) -> f64 {
    let Some(fruit) = fruit else {
        return 0.0;
    };
    if !character.has_fruit() || character.stats.devil_fruit <= 0.0 {
        return 0.0;
    }

    let s = &character.stats;
    let kind_mult = match fruit.kind {
        FruitKind::Logia => 1.3,
        FruitKind::Zoan => 1.15,
        FruitKind::Paramecia => 1.0,
    };
    // Each fruit family rewards a different supporting axis.
    let synergy_src = match fruit.kind {
        FruitKind::Zoan => s.devil_fruit.min(physical_power(s)),
        FruitKind::Logia => s.devil_fruit.min(s.observation),
        FruitKind::Paramecia => s.devil_fruit.min(mental_power(s)),
    };
    let kind_synergy = (1.0 + KIND_SYNERGY_SCALE * synergy_src).min(KIND_SYNERGY_CAP);
    let rarity_mult = 1.0 + fruit.rarity * RARITY_SCALE;
    let awakening = if character.level >= fruit.awakening_level {
        AWAKENING_MULT
    } else {
        1.0
    };

    s.devil_fruit
        * W_FRUIT
        * (1.0 + character.level as f64 * FRUIT_LEVEL_SCALE)
        * rarity_mult
        * kind_mult
        * kind_synergy
        * awakening
}

fn level_bonus(level: u32) -> f64 {
    let veteran = level.saturating_sub(VETERAN_LEVEL) as f64;
    level as f64 * LEVEL_BASE + veteran * VETERAN_BONUS
}

/// Reward spiky builds: every stat exceeding 1.2x the character's own average
/// contributes proportionally to the excess.
fn specialization_bonus(stats: &StatBlock) -> f64 {
    let threshold = SPIKE_RATIO * stats.average();
    stats
        .values()
        .iter()
        .filter(|&&v| v > threshold)
        .map(|&v| (v - threshold) * SPIKE_SCALE)
        .sum()
}

/// Reward balanced multi-axis builds: pairwise minimums across the four
/// component axes, plus a heavier tactical triple for intelligence, skill and
/// any haki together.
fn synergy_bonus(physical: f64, mental: f64, haki: f64, fruit: f64, stats: &StatBlock) -> f64 {
    let pairwise = physical.min(mental)
        + physical.min(haki)
        + physical.min(fruit)
        + mental.min(haki)
        + mental.min(fruit)
        + haki.min(fruit);

    let best_haki = stats.armament.max(stats.observation).max(stats.conqueror);
    let tactical = stats.intelligence.min(stats.skill).min(best_haki);

    PAIR_SYNERGY * pairwise + TACTICAL_SYNERGY * tactical
}

/// Diminishing-return bounty contribution: grows with the order of magnitude
/// of the bounty, so it matters without dominating.
fn bounty_influence(bounty: f64) -> f64 {
    if bounty <= 0.0 {
        return 0.0;
    }
    BOUNTY_BASE.powf((bounty + 1.0).log10())
}

/// Total power of a single character. Always >= 1, rounded up.
///
/// `fruit` must be the catalog entry matching `character.devil_fruit_id`;
/// pass `None` for fruitless characters. Missing or zero stats contribute
/// nothing and never fail.
pub fn character_power(character: &Character, fruit: Option<&DevilFruit>) -> f64 {
    let stats = &character.stats;
    let physical = physical_power(stats);
    let mental = mental_power(stats);
    let haki = haki_power(character);
    let fruit_component = fruit_power(character, fruit);

    let base = physical
        + mental
        + haki
        + fruit_component
        + level_bonus(character.level)
        + specialization_bonus(stats)
        + synergy_bonus(physical, mental, haki, fruit_component, stats);

    let mut conqueror_mult = 1.0 + stats.conqueror * CONQ_MULT_SCALE;
    if stats.conqueror >= CONQ_MASTERY {
        conqueror_mult += CONQ_MULT_MASTERY_BONUS;
    }
    let fruit_mult = 1.0;
    let level_mult = 1.0 + character.level as f64 * LEVEL_MULT_SCALE;
    let unpredictability =
        1.0 + (character.kindness.abs() as f64 / 100.0) * UNPREDICTABILITY_SCALE;

    let total = base * conqueror_mult * fruit_mult * level_mult * unpredictability
        + bounty_influence(character.bounty);

    total.max(1.0).ceil()
}

/// Aggregate crew power: sum of member power, captain included. The fruit
/// lookup closure resolves a member's `devil_fruit_id` against the catalog
/// snapshot.
pub fn crew_power<'a, I, F>(members: I, mut fruit_lookup: F) -> f64
where
    I: IntoIterator<Item = &'a Character>,
    F: FnMut(u64) -> Option<&'a DevilFruit>,
{
    members
        .into_iter()
        .map(|m| {
            let fruit = if m.has_fruit() {
                fruit_lookup(m.devil_fruit_id)
            } else {
                None
            };
            character_power(m, fruit)
        })
        .sum()
}

/// Crew member capacity derived from the ship.
pub fn crew_capacity(ship: &Ship, ship_capacity_factor: u32) -> usize {
    (ship.level * ship_capacity_factor) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CombatStyle, CrewPosition, Faction};

    fn test_character(stats: StatBlock, level: u32) -> Character {
        Character {
            id: 1,
            name: "Test".to_string(),
            faction: Faction::Pirate,
            level,
            experience: 0.0,
            bounty: 0.0,
            stats,
            crew_id: 1,
            position: CrewPosition::CrewMember,
            devil_fruit_id: 0,
            is_player: false,
            kindness: 0,
            loyalty: 0,
            king_haki_potential: 0.0,
            defending_base: false,
            combat_style: CombatStyle::AllRounder,
        }
    }

    fn balanced_stats() -> StatBlock {
        StatBlock {
            attack: 40.0,
            defense: 35.0,
            speed: 38.0,
            armament: 20.0,
            observation: 18.0,
            conqueror: 10.0,
            devil_fruit: 0.0,
            intelligence: 25.0,
            skill: 30.0,
        }
    }

    fn test_fruit(rarity: f64, kind: FruitKind) -> DevilFruit {
        DevilFruit {
            id: 5,
            name: "Test-Test Fruit".to_string(),
            kind,
            rarity,
            awakening_level: DevilFruit::awakening_level_for(rarity),
            owner_id: 1,
        }
    }

    #[test]
    fn zero_stats_floor_at_one() {
        let c = test_character(StatBlock::default(), 1);
        assert_eq!(character_power(&c, None), character_power(&c, None));
        assert!(character_power(&c, None) >= 1.0);
    }

    #[test]
    fn no_fruit_means_zero_fruit_component() {
        let mut stats = balanced_stats();
        stats.devil_fruit = 50.0; // stat set, but no fruit held
        let c = test_character(stats, 40);
        let fruit = test_fruit(0.8, FruitKind::Logia);
        assert_eq!(fruit_power(&c, None), 0.0);
        // devil_fruit_id == 0 wins over a fruit being passed in
        assert_eq!(fruit_power(&c, Some(&fruit)), 0.0);
    }

    #[test]
    fn monotone_in_each_combat_stat() {
        let base = test_character(balanced_stats(), 30);
        let base_power = character_power(&base, None);

        for apply in [
            (|s: &mut StatBlock| s.attack += 10.0) as fn(&mut StatBlock),
            |s| s.defense += 10.0,
            |s| s.speed += 10.0,
            |s| s.armament += 10.0,
            |s| s.observation += 10.0,
            |s| s.conqueror += 10.0,
        ] {
            let mut stats = balanced_stats();
            apply(&mut stats);
            let boosted = test_character(stats, 30);
            assert!(
                character_power(&boosted, None) >= base_power,
                "stat increase lowered power"
            );
        }
    }

    #[test]
    fn monotone_in_level() {
        let mut prev = 0.0;
        for level in [1, 10, 25, 50, 75, 100] {
            let c = test_character(balanced_stats(), level);
            let p = character_power(&c, None);
            assert!(p >= prev, "power fell from {prev} to {p} at level {level}");
            prev = p;
        }
    }

    #[test]
    fn veteran_bonus_kicks_in_past_threshold() {
        let at = |level| character_power(&test_character(balanced_stats(), level), None);
        let step_under = at(50) - at(49);
        let step_over = at(51) - at(50);
        assert!(step_over > step_under);
    }

    #[test]
    fn awakening_strictly_increases_fruit_contribution() {
        // rarity 0.9 -> awakening at level 67
        let fruit = test_fruit(0.9, FruitKind::Paramecia);
        assert_eq!(fruit.awakening_level, 67);

        let mut stats = balanced_stats();
        stats.devil_fruit = 40.0;

        let mut young = test_character(stats, 40);
        young.devil_fruit_id = fruit.id;
        let mut awakened = test_character(stats, 70);
        awakened.devil_fruit_id = fruit.id;

        assert!(fruit_power(&young, Some(&fruit)) < fruit_power(&awakened, Some(&fruit)));
    }

    #[test]
    fn logia_outscales_paramecia_at_equal_rarity() {
        let mut stats = balanced_stats();
        stats.devil_fruit = 40.0;
        let mut c = test_character(stats, 30);
        c.devil_fruit_id = 5;

        let logia = test_fruit(0.5, FruitKind::Logia);
        let paramecia = test_fruit(0.5, FruitKind::Paramecia);
        assert!(fruit_power(&c, Some(&logia)) > fruit_power(&c, Some(&paramecia)));
    }

    #[test]
    fn bounty_contributes_with_diminishing_returns() {
        let mut poor = test_character(balanced_stats(), 30);
        let mut rich = test_character(balanced_stats(), 30);
        poor.bounty = 1_000.0;
        rich.bounty = 500_000_000.0;

        let p_poor = character_power(&poor, None);
        let p_rich = character_power(&rich, None);
        assert!(p_rich > p_poor);
        // Five orders of magnitude more bounty must not five-x the power.
        assert!(p_rich < p_poor * 5.0);
    }

    #[test]
    fn extreme_kindness_raises_power() {
        let neutral = test_character(balanced_stats(), 30);
        let mut zealot = test_character(balanced_stats(), 30);
        zealot.kindness = -100;
        assert!(character_power(&zealot, None) > character_power(&neutral, None));
    }

    #[test]
    fn crew_power_is_member_sum() {
        let a = test_character(balanced_stats(), 20);
        let b = test_character(balanced_stats(), 40);
        let sum = character_power(&a, None) + character_power(&b, None);
        let members = vec![a, b];
        let crew = crew_power(members.iter(), |_| None);
        assert_eq!(crew, sum);
    }

    #[test]
    fn capacity_from_ship_level() {
        let ship = Ship {
            id: 1,
            crew_id: 1,
            name: "Tidecutter".to_string(),
            level: 4,
            need_repair: false,
            destroyed: false,
        };
        assert_eq!(crew_capacity(&ship, 3), 12);
    }
}
