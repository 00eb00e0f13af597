use rand::Rng;
use rand::RngCore;

const EASY_PREFIXES: &[&str] = &[
    "Shell", "Orange", "Syrup", "Cocoyashi", "Gosa", "Mirror Ball",
    "Spice", "Drumflower",
];

const MID_PREFIXES: &[&str] = &[
    "Jaya", "Thriller", "Sabaody", "Drum Peak", "Karakuri", "Kuraigana",
    "Ohara Reef", "Whisker",
];

const HARD_PREFIXES: &[&str] = &[
    "Raft-Tail", "Onigashima", "Wano Shore", "Mariejois Rock", "Laugh Tale",
    "Zou Back", "Elbaf Cliff", "God Valley",
];

const ISLAND_SUFFIXES: &[&str] = &[
    "Island", "Isle", "Atoll", "Archipelago", "Cay", "Reach",
];

/// Generate an island name appropriate to its difficulty (1-30).
pub fn generate_island_name(difficulty: u32, rng: &mut dyn RngCore) -> String {
    let prefixes = match difficulty {
        0..=10 => EASY_PREFIXES,
        11..=20 => MID_PREFIXES,
        _ => HARD_PREFIXES,
    };
    let prefix = prefixes[rng.random_range(0..prefixes.len())];
    let suffix = ISLAND_SUFFIXES[rng.random_range(0..ISLAND_SUFFIXES.len())];
    format!("{prefix} {suffix}")
}

/// Flavor line shown in the island detail view.
pub fn island_description(difficulty: u32) -> &'static str {
    match difficulty {
        0..=5 => "A quiet port in calm blue seas. Rookie crews cut their teeth here.",
        6..=10 => "A busy trade stop with the occasional brawl on the docks.",
        11..=15 => "Frontier waters. The marines patrol, but not often enough.",
        16..=20 => "Lawless seas where seasoned crews carve out reputations.",
        21..=25 => "Storm-wracked waters near the strongholds of the great powers.",
        _ => "The final seas. Only legends sail here, and fewer return.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn names_vary_by_difficulty_tier() {
        let mut rng = SmallRng::seed_from_u64(3);
        let easy = generate_island_name(2, &mut rng);
        let hard = generate_island_name(28, &mut rng);
        assert!(!easy.is_empty());
        assert!(!hard.is_empty());
    }

    #[test]
    fn descriptions_cover_full_range() {
        for d in 1..=30 {
            assert!(!island_description(d).is_empty());
        }
    }
}
