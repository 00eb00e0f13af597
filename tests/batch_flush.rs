mod common;

use grandline_sim::model::Faction;
use grandline_sim::scenario::Scenario;
use grandline_sim::store::{CharacterPatch, CrewPatch, WriteBatch};

#[tokio::test]
async fn multi_hundred_patch_flush_round_trips() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(5);
    let crew = s.add_crew(Faction::Pirate, island);
    s.add_captain(Faction::Pirate, 50, crew);
    s.add_ship(crew, 3);

    // Well past one flush chunk, so the patch path spans several transactions.
    let mut members = Vec::new();
    for _ in 0..249 {
        members.push(s.add_character(Faction::Pirate, 10, crew));
    }
    let snapshot = s.write_to(&store).await.unwrap();

    let mut batch = WriteBatch::new(snapshot.next_id);
    for (i, id) in members.iter().enumerate() {
        batch.patch_character(
            *id,
            CharacterPatch {
                bounty: Some((i as f64 + 1.0) * 10.0),
                loyalty: Some(7),
                ..Default::default()
            },
        );
    }
    batch.patch_crew(
        crew,
        CrewPatch {
            treasury: Some(12_345.0),
            ..Default::default()
        },
    );

    let stats = batch.flush(&store).await.unwrap();
    assert_eq!(stats.updated, members.len() + 1);

    for (i, id) in members.iter().enumerate() {
        let c = store.get_character(*id).await.unwrap().expect("member row");
        assert_eq!(c.bounty, (i as f64 + 1.0) * 10.0, "character {id}");
        assert_eq!(c.loyalty, 7);
        // Fields the patch left as None must survive untouched.
        assert_eq!(c.level, 10);
        assert_eq!(c.crew_id, crew);
    }
    let stored_crew = store.get_crew(crew).await.unwrap().unwrap();
    assert_eq!(stored_crew.treasury, 12_345.0);
}
