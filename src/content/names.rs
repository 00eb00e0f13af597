use rand::Rng;
use rand::RngCore;

use crate::model::Faction;

const GIVEN_PREFIXES: &[&str] = &[
    "Ar", "Bar", "Bel", "Cal", "Dag", "Dor", "Ed", "Fal", "Gar", "Gol",
    "Hak", "Iso", "Jin", "Kai", "Kur", "Lor", "Mar", "Mor", "Nar", "Rak",
    "Ro", "Sab", "Shan", "Tar", "Tor", "Van", "Yas", "Zef", "Zor", "Luc",
];

const GIVEN_SUFFIXES: &[&str] = &[
    "a", "an", "ar", "eau", "en", "ero", "ias", "ji", "ko", "ku",
    "o", "on", "ora", "os", "ren", "rin", "ro", "ta", "uo", "us",
];

const PIRATE_EPITHETS: &[&str] = &[
    "Red-Hand", "Black-Leg", "Iron-Fist", "Sea-Wolf", "Storm-Eye",
    "Grinning", "Three-Blade", "Hellfire", "Tidebreaker", "Mad-Dog",
];

const MARINE_SURNAMES: &[&str] = &[
    "Astor", "Brandt", "Coburn", "Drayton", "Falk", "Greaves", "Holt",
    "Kessler", "Mercer", "Navarre", "Quint", "Rourke", "Strand", "Vance",
];

const CIVILIAN_SURNAMES: &[&str] = &[
    "Appleton", "Baker", "Cooper", "Fisher", "Harbormann", "Miller",
    "Porter", "Salter", "Shipwright", "Tanner", "Weaver", "Wright",
];

fn given_name(rng: &mut dyn RngCore) -> String {
    let prefix = GIVEN_PREFIXES[rng.random_range(0..GIVEN_PREFIXES.len())];
    let suffix = GIVEN_SUFFIXES[rng.random_range(0..GIVEN_SUFFIXES.len())];
    format!("{prefix}{suffix}")
}

/// Generate a plausible character name for the given faction.
///
/// Pirates and bounty hunters get an epithet; marines and government agents
/// get a service surname; civilians get a trade surname.
pub fn generate_character_name(faction: Faction, rng: &mut dyn RngCore) -> String {
    let given = given_name(rng);
    match faction {
        Faction::Pirate | Faction::BountyHunter => {
            let epithet = PIRATE_EPITHETS[rng.random_range(0..PIRATE_EPITHETS.len())];
            format!("\"{epithet}\" {given}")
        }
        Faction::Marine | Faction::Government => {
            let surname = MARINE_SURNAMES[rng.random_range(0..MARINE_SURNAMES.len())];
            format!("{given} {surname}")
        }
        Faction::Civilian => {
            let surname = CIVILIAN_SURNAMES[rng.random_range(0..CIVILIAN_SURNAMES.len())];
            format!("{given} {surname}")
        }
    }
}
