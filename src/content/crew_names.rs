use rand::Rng;
use rand::RngCore;

use crate::model::Faction;

const PIRATE_ADJECTIVES: &[&str] = &[
    "Crimson", "Howling", "Iron", "Midnight", "Rogue", "Salt-Blood",
    "Scarlet", "Thunder", "Wandering", "Ashen", "Gilded", "Rusted",
];

const PIRATE_NOUNS: &[&str] = &[
    "Anchor", "Cutlass", "Fang", "Kraken", "Lantern", "Maelstrom",
    "Reef", "Serpent", "Skull", "Squall", "Tide", "Wake",
];

const HUNTER_NOUNS: &[&str] = &[
    "Bloodhounds", "Chainbreakers", "Harriers", "Headsmen", "Lancers",
    "Trackers", "Vultures", "Wardens",
];

const MARINE_ORDINALS: &[&str] = &[
    "1st", "2nd", "3rd", "5th", "7th", "8th", "11th", "13th", "16th", "21st",
];

const GOVERNMENT_CIPHERS: &[&str] = &[
    "Cipher Bureau", "Shadow Office", "Veil Commission", "Null Directorate",
];

const CIVILIAN_GUILDS: &[&str] = &[
    "Dockworkers' Union", "Harbor Traders", "Island Couriers",
    "Lighthouse Keepers", "Shipfitters' Guild",
];

/// Generate a plausible crew or organization name for the given faction.
pub fn generate_crew_name(faction: Faction, rng: &mut dyn RngCore) -> String {
    match faction {
        Faction::Pirate => {
            let adj = PIRATE_ADJECTIVES[rng.random_range(0..PIRATE_ADJECTIVES.len())];
            let noun = PIRATE_NOUNS[rng.random_range(0..PIRATE_NOUNS.len())];
            format!("{adj} {noun} Pirates")
        }
        Faction::Marine => {
            let ordinal = MARINE_ORDINALS[rng.random_range(0..MARINE_ORDINALS.len())];
            format!("Marine {ordinal} Division")
        }
        Faction::BountyHunter => {
            let noun = HUNTER_NOUNS[rng.random_range(0..HUNTER_NOUNS.len())];
            let adj = PIRATE_ADJECTIVES[rng.random_range(0..PIRATE_ADJECTIVES.len())];
            format!("The {adj} {noun}")
        }
        Faction::Government => {
            let cipher = GOVERNMENT_CIPHERS[rng.random_range(0..GOVERNMENT_CIPHERS.len())];
            let number = rng.random_range(1..=9);
            format!("{cipher} {number}")
        }
        Faction::Civilian => {
            CIVILIAN_GUILDS[rng.random_range(0..CIVILIAN_GUILDS.len())].to_string()
        }
    }
}
