pub mod battle;
pub mod cache;
pub mod churn;
pub mod context;
pub mod encounters;
pub mod movement;
pub mod power;
pub mod runner;
pub mod signal;
pub mod spawn;
pub mod succession;
pub mod system;

pub use cache::PowerCache;
pub use context::TickContext;
pub use runner::{SimSettings, WorldTicker, dispatch_phases};
pub use signal::WorldSignal;
pub use system::SimPhase;
