use grandline_sim::store::WorldStore;
use grandline_sim::worldgen::{self, GeneratedWorld, WorldSize};

pub async fn memory_store() -> WorldStore {
    WorldStore::in_memory().await.expect("in-memory store")
}

/// A freshly generated SMALL world persisted to an in-memory store.
pub async fn small_world(seed: u64) -> (WorldStore, GeneratedWorld) {
    let store = memory_store().await;
    let settings = WorldSize::Small.settings();
    let world = worldgen::generate_into_store(&store, &settings, seed, "Test Captain")
        .await
        .expect("generation");
    (store, world)
}
