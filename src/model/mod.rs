pub mod battle;
pub mod character;
pub mod crew;
pub mod faction;
pub mod fruit;
pub mod title;

pub use battle::{BattleRecord, Task, TaskKind};
pub use character::{Character, CombatStyle, CrewPosition, StatBlock};
pub use crew::{Crew, Island, Ship};
pub use faction::{Faction, Stance};
pub use fruit::{DevilFruit, FruitKind};
pub use title::{TerritoryClaim, TitleRecord, TitledRole};
