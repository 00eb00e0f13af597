mod common;

use grandline_sim::store::WorldStore;
use grandline_sim::testutil::reload;
use grandline_sim::worldgen::{self, WorldSize};

#[tokio::test]
async fn small_world_persists_the_preset_counts() {
    let (store, world) = common::small_world(11).await;

    let characters = store.all_characters().await.unwrap();
    let titles = store.all_titles().await.unwrap();
    let crews = store.all_crews().await.unwrap();
    let ships = store.all_ships().await.unwrap();

    assert_eq!(characters.len(), 300);
    assert_eq!(titles.len(), 19);
    assert_eq!(crews.len(), ships.len());
    assert_eq!(characters.len(), world.characters.len());
}

#[tokio::test]
async fn stats_round_trip_bit_exact() {
    let (store, world) = common::small_world(13).await;

    for character in world.characters.iter().take(25) {
        let stored = store
            .get_character(character.id)
            .await
            .unwrap()
            .expect("generated character present");
        assert_eq!(stored.stats, character.stats, "character {}", character.id);
        assert_eq!(stored.bounty, character.bounty);
        assert_eq!(stored.king_haki_potential, character.king_haki_potential);
    }
}

#[tokio::test]
async fn fruit_ownership_unique_and_reciprocal() {
    let (store, _world) = common::small_world(17).await;

    let fruits = store.all_fruits().await.unwrap();
    let mut owners: Vec<u64> = fruits
        .iter()
        .filter(|f| f.owner_id != 0)
        .map(|f| f.owner_id)
        .collect();
    assert!(!owners.is_empty());
    let owned = owners.len();
    owners.sort_unstable();
    owners.dedup();
    assert_eq!(owners.len(), owned, "a character owns two fruits");

    for fruit in fruits.iter().filter(|f| f.owner_id != 0) {
        let eater = store
            .get_character(fruit.owner_id)
            .await
            .unwrap()
            .expect("fruit owner exists");
        assert_eq!(eater.devil_fruit_id, fruit.id);
    }
}

#[tokio::test]
async fn snapshot_load_finds_nothing_to_repair() {
    let (store, _world) = common::small_world(19).await;

    let snapshot = reload(&store).await.unwrap();
    assert_eq!(snapshot.characters.len(), 300);
    for crew in snapshot.crews.values() {
        let members = snapshot.members_of(crew.id);
        assert!(!members.is_empty(), "crew {} has no members", crew.id);
        assert!(snapshot.ship_of(crew.id).is_some(), "crew {} has no ship", crew.id);
    }
}

#[tokio::test]
async fn on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.db");

    {
        let store = WorldStore::open(&path).await.unwrap();
        let settings = WorldSize::Small.settings();
        worldgen::generate_into_store(&store, &settings, 23, "Test Captain")
            .await
            .unwrap();
    }

    let reopened = WorldStore::open(&path).await.unwrap();
    assert_eq!(reopened.all_characters().await.unwrap().len(), 300);
    assert_eq!(reopened.all_titles().await.unwrap().len(), 19);
}
