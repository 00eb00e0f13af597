mod common;

use grandline_sim::model::Faction;
use grandline_sim::scenario::Scenario;
use grandline_sim::sim::churn::{apply_post_battle_churn, dissolve_crew};
use grandline_sim::sim::{PowerCache, TickContext, SimSettings};
use grandline_sim::store::WriteBatch;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[tokio::test]
async fn dissolved_crew_leaves_no_rows_behind() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(4);
    let crew = s.add_crew(Faction::Pirate, island);
    s.add_captain(Faction::Pirate, 30, crew);
    s.add_ship(crew, 2);
    s.add_claim(island, crew);
    let snapshot = s.write_to(&store).await.unwrap();

    let settings = SimSettings::default();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut power = PowerCache::default();
    let mut batch = WriteBatch::new(snapshot.next_id);
    let mut signals = Vec::new();
    let mut ctx = TickContext {
        snapshot: &snapshot,
        batch: &mut batch,
        power: &mut power,
        rng: &mut rng,
        settings: &settings,
        now_ms: 0,
        signals: &mut signals,
        inbox: &[],
    };
    dissolve_crew(&mut ctx, crew);
    batch.flush(&store).await.unwrap();

    assert!(store.get_crew(crew).await.unwrap().is_none());
    assert!(store.ship_by_crew(crew).await.unwrap().is_none());
    let claims = store.all_territories().await.unwrap();
    assert!(claims.iter().all(|c| c.crew_id != crew));
}

#[tokio::test]
async fn recruitment_can_empty_the_losing_crew() {
    let store = common::memory_store().await;
    let mut s = Scenario::new();
    let island = s.add_island(8);

    let winner = s.add_crew(Faction::Pirate, island);
    s.add_captain(Faction::Pirate, 60, winner);
    s.add_character(Faction::Pirate, 40, winner);
    s.add_ship(winner, 3);

    let loser = s.add_crew(Faction::Pirate, island);
    // A lone disloyal captain is the easiest recruit there is.
    s.add_captain_with(Faction::Pirate, 20, loser, |c| c.loyalty = -100);
    s.add_ship(loser, 1);

    let snapshot = s.write_to(&store).await.unwrap();
    let settings = SimSettings::default();

    // The poach roll is seed-dependent; scan seeds for one where it lands.
    let mut dissolved_batch = None;
    for seed in 0..100 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut power = PowerCache::default();
        let mut batch = WriteBatch::new(snapshot.next_id);
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            snapshot: &snapshot,
            batch: &mut batch,
            power: &mut power,
            rng: &mut rng,
            settings: &settings,
            now_ms: 0,
            signals: &mut signals,
            inbox: &[],
        };
        let report = apply_post_battle_churn(&mut ctx, winner, loser);
        if report.dissolved {
            assert_eq!(report.recruited.len(), 1);
            dissolved_batch = Some(batch);
            break;
        }
    }

    let batch = dissolved_batch.expect("no seed in 0..100 recruited the lone captain");
    batch.flush(&store).await.unwrap();

    assert!(store.get_crew(loser).await.unwrap().is_none());
    assert!(store.ship_by_crew(loser).await.unwrap().is_none());
    let poached = store.characters_by_crew(winner).await.unwrap();
    assert_eq!(poached.len(), 3, "loser's captain should now sail with the winner");
}
