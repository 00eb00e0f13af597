mod common;

use grandline_sim::model::{CrewPosition, Faction};
use grandline_sim::scenario::Scenario;
use grandline_sim::testutil::reload;

#[tokio::test]
async fn lost_captain_promotes_highest_level_member() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(5);
    let crew = s.add_crew(Faction::Pirate, island);
    let captain = s.add_captain(Faction::Pirate, 60, crew);
    let _weak = s.add_character(Faction::Pirate, 20, crew);
    let strong = s.add_character(Faction::Pirate, 45, crew);
    s.add_ship(crew, 3);
    s.write_to(&store).await.unwrap();

    store.delete_characters(&[captain]).await.unwrap();

    let snapshot = reload(&store).await.unwrap();
    let promoted = snapshot.captain_of(crew).expect("captaincy repaired");
    assert_eq!(promoted.id, strong);
    assert_eq!(promoted.position, CrewPosition::Captain);

    // The repair is persisted, not just in-memory.
    let stored = store.get_crew(crew).await.unwrap().unwrap();
    assert_eq!(stored.captain_id, strong);
}

#[tokio::test]
async fn emptied_crew_dissolves_with_its_ship() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(3);
    let crew = s.add_crew(Faction::Marine, island);
    let captain = s.add_captain(Faction::Marine, 30, crew);
    s.add_ship(crew, 2);
    s.add_claim(island, crew);
    s.write_to(&store).await.unwrap();

    store.delete_characters(&[captain]).await.unwrap();

    let snapshot = reload(&store).await.unwrap();
    assert!(!snapshot.crews.contains_key(&crew));

    assert!(store.get_crew(crew).await.unwrap().is_none());
    assert!(store.ship_by_crew(crew).await.unwrap().is_none());
    let claims = store.all_territories().await.unwrap();
    let claim = claims.iter().find(|c| c.island_id == island).unwrap();
    assert_eq!(claim.crew_id, 0, "claim not released");
}

#[tokio::test]
async fn one_sided_fruit_links_are_cleared() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(1);
    let crew = s.add_crew(Faction::Pirate, island);
    let eater = s.add_captain(Faction::Pirate, 40, crew);
    s.add_ship(crew, 2);
    let fruit = s.add_fruit(0.8);
    // Fruit claims an owner who never ate it.
    s.add_fruit_with(0.5, |f| f.owner_id = eater);
    // Character claims a fruit that does not reciprocate.
    s.modify_character(eater, |c| c.devil_fruit_id = fruit);
    s.write_to(&store).await.unwrap();

    let snapshot = reload(&store).await.unwrap();
    assert_eq!(snapshot.characters[&eater].devil_fruit_id, 0);
    assert!(snapshot.fruits.values().all(|f| f.owner_id == 0));

    let fruits = store.all_fruits().await.unwrap();
    assert!(fruits.iter().all(|f| f.owner_id == 0));
}

#[tokio::test]
async fn shipless_crew_receives_a_replacement() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(10);
    let crew = s.add_crew(Faction::Pirate, island);
    s.add_captain(Faction::Pirate, 75, crew);
    s.write_to(&store).await.unwrap();

    let snapshot = reload(&store).await.unwrap();
    let ship = snapshot.ship_of(crew).expect("replacement ship issued");
    assert_eq!(ship.level, 4, "replacement level tracks the captain");
    assert!(store.ship_by_crew(crew).await.unwrap().is_some());
}

#[tokio::test]
async fn vacated_title_survives_as_a_fresh_vacant_record() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(25);
    let crew = s.add_crew(Faction::Pirate, island);
    let holder = s.add_captain(Faction::Pirate, 200, crew);
    s.add_ship(crew, 5);
    s.add_title(grandline_sim::model::TitledRole::Yonkou, holder, island);
    s.write_to(&store).await.unwrap();

    store.delete_characters(&[holder]).await.unwrap();

    let _snapshot = reload(&store).await.unwrap();
    let titles = store.all_titles().await.unwrap();
    assert_eq!(titles.len(), 1, "seat count must not change");
    assert_eq!(titles[0].character_id, 0, "seat should be vacant");
    assert_eq!(titles[0].role, grandline_sim::model::TitledRole::Yonkou);
}
