//! A persistent-world simulation engine: procedurally generated crews of
//! pirates, marines, and hunters roam an island graph while a background
//! tick resolves battles, membership churn, movement, territory control, and
//! titled-role succession against a sqlite-backed store.

pub mod content;
pub mod error;
pub mod id;
pub mod model;
pub mod scenario;
pub mod sim;
pub mod store;
pub mod testutil;
pub mod worker;
pub mod worldgen;

pub use error::{ConfigError, SimError};
pub use id::IdGenerator;
pub use model::{
    BattleRecord, Character, CombatStyle, Crew, CrewPosition, DevilFruit, Faction, FruitKind,
    Island, Ship, StatBlock, Task, TaskKind, TerritoryClaim, TitleRecord, TitledRole,
};
pub use sim::{SimSettings, WorldTicker};
pub use store::{WorldSnapshot, WorldStore, WriteBatch};
pub use worker::{WorkerHandle, WorkerOp, WorkerRequest, WorkerResponse, spawn_worker};
pub use worldgen::{GeneratedWorld, GenerationSettings, WorldSize};
