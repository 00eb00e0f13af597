//! Static, read-only content providers: name generators and the devil fruit
//! catalog. Everything here is data plus a thin random picker; no simulation
//! state.

pub mod crew_names;
pub mod fruits;
pub mod islands;
pub mod names;
pub mod ship_names;

pub use crew_names::generate_crew_name;
pub use fruits::{FRUIT_CATALOG, FruitSpec};
pub use islands::{generate_island_name, island_description};
pub use names::generate_character_name;
pub use ship_names::generate_ship_name;
