use rand::Rng;
use rand::RngCore;

const SHIP_PREFIXES: &[&str] = &[
    "Dawn", "Drift", "Gale", "Gull", "Mist", "Moon", "Pearl", "Salt",
    "Star", "Storm", "Tide", "Wave",
];

const SHIP_SUFFIXES: &[&str] = &[
    "breaker", "chaser", "crest", "cutter", "dancer", "runner",
    "singer", "spear", "ward", "wing",
];

const LEGENDARY_NAMES: &[&str] = &[
    "Oro Jackson", "Leviathan's Due", "The Worldpiercer", "Queen of Reverie",
    "Sovereign Gale", "The Unsinkable Sun",
];

/// Generate a ship name. Legendary hulls draw from a fixed short list.
pub fn generate_ship_name(legendary: bool, rng: &mut dyn RngCore) -> String {
    if legendary {
        return LEGENDARY_NAMES[rng.random_range(0..LEGENDARY_NAMES.len())].to_string();
    }
    let prefix = SHIP_PREFIXES[rng.random_range(0..SHIP_PREFIXES.len())];
    let suffix = SHIP_SUFFIXES[rng.random_range(0..SHIP_SUFFIXES.len())];
    format!("{prefix}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn legendary_names_come_from_catalog() {
        let mut rng = SmallRng::seed_from_u64(9);
        let name = generate_ship_name(true, &mut rng);
        assert!(LEGENDARY_NAMES.contains(&name.as_str()));
    }

    #[test]
    fn common_names_are_compound() {
        let mut rng = SmallRng::seed_from_u64(9);
        let name = generate_ship_name(false, &mut rng);
        assert!(!name.is_empty());
        assert!(!LEGENDARY_NAMES.contains(&name.as_str()));
    }
}
