mod common;

use std::collections::HashMap;

use grandline_sim::model::CrewPosition;
use grandline_sim::sim::{SimSettings, WorldTicker};
use grandline_sim::testutil::reload;
use grandline_sim::worldgen::WorldSize;

fn ticker_over(store: grandline_sim::store::WorldStore, seed: u64) -> WorldTicker {
    let settings = SimSettings::from_generation(&WorldSize::Small.settings());
    WorldTicker::new(store, settings, seed)
}

#[tokio::test]
async fn full_world_update_preserves_crew_invariants() {
    let (store, _world) = common::small_world(31).await;
    let ticker = ticker_over(store, 31);

    for _ in 0..3 {
        ticker.full_world_update().await.unwrap();
    }

    let snapshot = reload(ticker.store()).await.unwrap();
    for crew in snapshot.crews.values() {
        let members = snapshot.members_of(crew.id);
        assert!(!members.is_empty(), "crew {} left empty", crew.id);
        let captains = members
            .iter()
            .filter(|c| c.position == CrewPosition::Captain)
            .count();
        assert_eq!(captains, 1, "crew {} has {captains} captains", crew.id);
        assert!(
            members.iter().any(|c| c.id == crew.captain_id),
            "crew {} captain back-reference points outside the roster",
            crew.id
        );
    }
}

#[tokio::test]
async fn full_world_update_keeps_fruits_unique() {
    let (store, _world) = common::small_world(37).await;
    let ticker = ticker_over(store, 37);
    ticker.full_world_update().await.unwrap();

    let fruits = ticker.store().all_fruits().await.unwrap();
    let mut owners: Vec<u64> = fruits
        .iter()
        .filter(|f| f.owner_id != 0)
        .map(|f| f.owner_id)
        .collect();
    let owned = owners.len();
    owners.sort_unstable();
    owners.dedup();
    assert_eq!(owners.len(), owned);
}

#[tokio::test]
async fn title_counts_stable_after_redistribution() {
    let (store, _world) = common::small_world(41).await;
    let ticker = ticker_over(store, 41);

    ticker.redistribute_titles().await.unwrap();

    let titles = ticker.store().all_titles().await.unwrap();
    let mut per_role: HashMap<&str, usize> = HashMap::new();
    for title in &titles {
        *per_role.entry(title.role.as_str()).or_default() += 1;
        assert_ne!(title.character_id, 0, "redistribution left a vacant seat");
    }
    assert_eq!(per_role.get("yonkou"), Some(&4));
    assert_eq!(per_role.get("shichibukai"), Some(&7));
    assert_eq!(per_role.get("admiral"), Some(&3));
    assert_eq!(per_role.get("gorosei"), Some(&5));

    let mut holders: Vec<u64> = titles.iter().map(|t| t.character_id).collect();
    holders.sort_unstable();
    holders.dedup();
    assert_eq!(holders.len(), titles.len(), "a character holds two seats");
}

#[tokio::test]
async fn movement_only_changes_locations_and_docking() {
    let (store, world) = common::small_world(43).await;
    let before_count = world.crews.len();
    let ticker = ticker_over(store, 43);

    ticker.process_movement().await.unwrap();

    let crews = ticker.store().all_crews().await.unwrap();
    assert_eq!(crews.len(), before_count);
    let islands: Vec<u64> = world.islands.iter().map(|i| i.id).collect();
    for crew in &crews {
        assert!(islands.contains(&crew.current_island), "crew {} off the map", crew.id);
    }
}
