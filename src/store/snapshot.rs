//! In-memory view of the whole world, loaded once per tick window.
//!
//! Simulation phases read from the snapshot and write to a [`WriteBatch`];
//! nothing reads the database mid-phase. Loading also runs an integrity
//! repair pass, so phases can assume referential soundness: every member's
//! crew exists, every crew has exactly one captain and one ship, and fruit
//! ownership is symmetric.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::model::{
    BattleRecord, Character, Crew, CrewPosition, DevilFruit, Island, Ship, Task, TerritoryClaim,
    TitleRecord,
};
use crate::store::batch::{CharacterPatch, CrewPatch, FruitPatch, TerritoryPatch, WriteBatch};
use crate::store::WorldStore;

// --- Constants ---

/// Ship given to a crew whose ship row went missing.
const REPLACEMENT_SHIP_NAME: &str = "Salvaged Hull";

#[derive(Debug)]
pub struct WorldSnapshot {
    pub characters: BTreeMap<u64, Character>,
    pub crews: BTreeMap<u64, Crew>,
    pub ships: BTreeMap<u64, Ship>,
    pub islands: BTreeMap<u64, Island>,
    pub fruits: BTreeMap<u64, DevilFruit>,
    pub titles: BTreeMap<u64, TitleRecord>,
    pub territories: BTreeMap<u64, TerritoryClaim>,
    pub tasks: Vec<Task>,
    pub battles: Vec<BattleRecord>,

    // Derived indexes, rebuilt after repair.
    pub members_by_crew: HashMap<u64, Vec<u64>>,
    pub crews_by_island: HashMap<u64, Vec<u64>>,
    pub ships_by_crew: HashMap<u64, u64>,
    pub territory_by_island: HashMap<u64, u64>,

    /// First id safe to hand to a new row.
    pub next_id: u64,
    loaded_at: Instant,
}

impl WorldSnapshot {
    /// Fresh snapshot with no rows, for in-memory construction. Callers fill
    /// the tables and finish with [`rebuild_indexes`](Self::rebuild_indexes).
    pub fn empty() -> Self {
        Self {
            characters: BTreeMap::new(),
            crews: BTreeMap::new(),
            ships: BTreeMap::new(),
            islands: BTreeMap::new(),
            fruits: BTreeMap::new(),
            titles: BTreeMap::new(),
            territories: BTreeMap::new(),
            tasks: Vec::new(),
            battles: Vec::new(),
            members_by_crew: HashMap::new(),
            crews_by_island: HashMap::new(),
            ships_by_crew: HashMap::new(),
            territory_by_island: HashMap::new(),
            next_id: 1,
            loaded_at: Instant::now(),
        }
    }

    /// Load every table and repair integrity violations. The returned batch
    /// holds the repairs; the caller flushes it so the store converges on the
    /// same state the snapshot already shows.
    pub async fn load(store: &WorldStore) -> Result<(Self, WriteBatch), sqlx::Error> {
        let characters = store.all_characters().await?;
        let crews = store.all_crews().await?;
        let ships = store.all_ships().await?;
        let islands = store.all_islands().await?;
        let fruits = store.all_fruits().await?;
        let titles = store.all_titles().await?;
        let territories = store.all_territories().await?;
        let tasks = store.all_tasks().await?;
        let battles = store.all_battles().await?;
        let max_id = store.max_id().await?;

        let mut snapshot = Self {
            characters: characters.into_iter().map(|c| (c.id, c)).collect(),
            crews: crews.into_iter().map(|c| (c.id, c)).collect(),
            ships: ships.into_iter().map(|s| (s.id, s)).collect(),
            islands: islands.into_iter().map(|i| (i.id, i)).collect(),
            fruits: fruits.into_iter().map(|f| (f.id, f)).collect(),
            titles: titles.into_iter().map(|t| (t.id, t)).collect(),
            territories: territories.into_iter().map(|t| (t.id, t)).collect(),
            tasks,
            battles,
            members_by_crew: HashMap::new(),
            crews_by_island: HashMap::new(),
            ships_by_crew: HashMap::new(),
            territory_by_island: HashMap::new(),
            next_id: max_id + 1,
            loaded_at: Instant::now(),
        };

        let mut repairs = WriteBatch::new(max_id + 1);
        snapshot.repair(&mut repairs);
        snapshot.next_id = repairs.peek_next_id();
        snapshot.rebuild_indexes();
        Ok((snapshot, repairs))
    }

    /// Fix referential violations in place, recording each fix into `batch`.
    fn repair(&mut self, batch: &mut WriteBatch) {
        // Members pointing at crews that no longer exist become crewless.
        let orphan_members: Vec<u64> = self
            .characters
            .values()
            .filter(|c| c.crew_id != 0 && !self.crews.contains_key(&c.crew_id))
            .map(|c| c.id)
            .collect();
        for id in orphan_members {
            warn!(character = id, "member of missing crew; detaching");
            if let Some(c) = self.characters.get_mut(&id) {
                c.crew_id = 0;
                c.position = CrewPosition::CrewMember;
            }
            batch.patch_character(
                id,
                CharacterPatch {
                    crew_id: Some(0),
                    position: Some(CrewPosition::CrewMember),
                    ..Default::default()
                },
            );
        }

        // Crews with no members dissolve along with their ships and claims.
        let mut members: HashMap<u64, Vec<u64>> = HashMap::new();
        for c in self.characters.values() {
            if c.crew_id != 0 {
                members.entry(c.crew_id).or_default().push(c.id);
            }
        }
        let empty_crews: Vec<u64> = self
            .crews
            .keys()
            .filter(|id| !members.contains_key(id))
            .copied()
            .collect();
        for crew_id in empty_crews {
            warn!(crew = crew_id, "crew has no members; dissolving");
            self.crews.remove(&crew_id);
            batch.delete_crew(crew_id);
            let dead_ships: Vec<u64> = self
                .ships
                .values()
                .filter(|s| s.crew_id == crew_id)
                .map(|s| s.id)
                .collect();
            for ship_id in dead_ships {
                self.ships.remove(&ship_id);
                batch.delete_ship(ship_id);
            }
            for claim in self.territories.values_mut() {
                if claim.crew_id == crew_id {
                    claim.crew_id = 0;
                    batch.patch_territory(claim.id, TerritoryPatch { crew_id: Some(0) });
                }
            }
        }

        // Exactly one captain per crew, and the back-reference must agree.
        for (crew_id, member_ids) in &members {
            let Some(crew) = self.crews.get(crew_id) else {
                continue;
            };
            let captains: Vec<u64> = member_ids
                .iter()
                .filter(|id| self.characters[id].position == CrewPosition::Captain)
                .copied()
                .collect();
            let valid = captains.len() == 1 && crew.captain_id == captains[0];
            if valid {
                continue;
            }
            let fallback = member_ids
                .iter()
                .copied()
                .max_by_key(|id| self.characters[id].level);
            let Some(promoted) = captains.first().copied().or(fallback) else {
                continue;
            };
            warn!(crew = crew_id, captain = promoted, "repairing captaincy");
            for id in member_ids {
                let want = if *id == promoted {
                    CrewPosition::Captain
                } else if self.characters[id].position == CrewPosition::Captain {
                    CrewPosition::CrewMember
                } else {
                    continue;
                };
                if let Some(c) = self.characters.get_mut(id) {
                    c.position = want;
                }
                batch.patch_character(
                    *id,
                    CharacterPatch {
                        position: Some(want),
                        ..Default::default()
                    },
                );
            }
            if crew.captain_id != promoted {
                if let Some(c) = self.crews.get_mut(crew_id) {
                    c.captain_id = promoted;
                }
                batch.patch_crew(
                    *crew_id,
                    CrewPatch {
                        captain_id: Some(promoted),
                        ..Default::default()
                    },
                );
            }
        }

        // Ships without a crew sink; crews without a ship get a replacement.
        let orphan_ships: Vec<u64> = self
            .ships
            .values()
            .filter(|s| !self.crews.contains_key(&s.crew_id))
            .map(|s| s.id)
            .collect();
        for ship_id in orphan_ships {
            warn!(ship = ship_id, "ship belongs to no crew; removing");
            self.ships.remove(&ship_id);
            batch.delete_ship(ship_id);
        }
        let shipless: Vec<u64> = self
            .crews
            .keys()
            .filter(|id| !self.ships.values().any(|s| s.crew_id == **id))
            .copied()
            .collect();
        for crew_id in shipless {
            let captain_level = self
                .crews
                .get(&crew_id)
                .and_then(|crew| self.characters.get(&crew.captain_id))
                .map_or(1, |c| c.level);
            warn!(crew = crew_id, "crew has no ship; issuing a replacement");
            let ship = Ship {
                id: 0,
                crew_id,
                name: REPLACEMENT_SHIP_NAME.to_string(),
                level: (1 + captain_level / 25).clamp(1, 5),
                need_repair: false,
                destroyed: false,
            };
            let id = batch.insert_ship(ship.clone());
            self.ships.insert(id, Ship { id, ..ship });
        }

        // Fruit ownership must be symmetric in both directions.
        let bad_eaters: Vec<u64> = self
            .characters
            .values()
            .filter(|c| {
                c.devil_fruit_id != 0
                    && self
                        .fruits
                        .get(&c.devil_fruit_id)
                        .is_none_or(|f| f.owner_id != c.id)
            })
            .map(|c| c.id)
            .collect();
        for id in bad_eaters {
            warn!(character = id, "fruit link not reciprocated; clearing");
            if let Some(c) = self.characters.get_mut(&id) {
                c.devil_fruit_id = 0;
            }
            batch.patch_character(
                id,
                CharacterPatch {
                    devil_fruit_id: Some(0),
                    ..Default::default()
                },
            );
        }
        let loose_fruits: Vec<u64> = self
            .fruits
            .values()
            .filter(|f| {
                f.owner_id != 0
                    && self
                        .characters
                        .get(&f.owner_id)
                        .is_none_or(|c| c.devil_fruit_id != f.id)
            })
            .map(|f| f.id)
            .collect();
        for id in loose_fruits {
            warn!(fruit = id, "owner link not reciprocated; returning to the wild");
            if let Some(f) = self.fruits.get_mut(&id) {
                f.owner_id = 0;
            }
            batch.patch_fruit(id, FruitPatch { owner_id: Some(0) });
        }

        // A title held by a character that no longer exists becomes vacant.
        // Titles have no patch form, so the record is replaced wholesale.
        let dead_holders: Vec<u64> = self
            .titles
            .values()
            .filter(|t| t.character_id != 0 && !self.characters.contains_key(&t.character_id))
            .map(|t| t.id)
            .collect();
        for title_id in dead_holders {
            let Some(old) = self.titles.remove(&title_id) else {
                continue;
            };
            warn!(role = old.role.as_str(), "title holder gone; vacating");
            batch.delete_title(title_id);
            let new_id = batch.insert_title(TitleRecord {
                id: 0,
                character_id: 0,
                ..old.clone()
            });
            self.titles.insert(
                new_id,
                TitleRecord {
                    id: new_id,
                    character_id: 0,
                    ..old
                },
            );
        }
    }

    pub fn rebuild_indexes(&mut self) {
        self.members_by_crew.clear();
        for c in self.characters.values() {
            if c.crew_id != 0 {
                self.members_by_crew.entry(c.crew_id).or_default().push(c.id);
            }
        }
        self.crews_by_island.clear();
        for c in self.crews.values() {
            self.crews_by_island
                .entry(c.current_island)
                .or_default()
                .push(c.id);
        }
        self.ships_by_crew.clear();
        for s in self.ships.values() {
            self.ships_by_crew.insert(s.crew_id, s.id);
        }
        self.territory_by_island.clear();
        for t in self.territories.values() {
            self.territory_by_island.insert(t.island_id, t.id);
        }
    }

    // --- read helpers ---

    pub fn members_of(&self, crew_id: u64) -> Vec<&Character> {
        self.members_by_crew
            .get(&crew_id)
            .map(|ids| ids.iter().filter_map(|id| self.characters.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn captain_of(&self, crew_id: u64) -> Option<&Character> {
        let crew = self.crews.get(&crew_id)?;
        self.characters.get(&crew.captain_id)
    }

    pub fn ship_of(&self, crew_id: u64) -> Option<&Ship> {
        self.ships_by_crew
            .get(&crew_id)
            .and_then(|id| self.ships.get(id))
    }

    /// Fruit eaten by this character, if any.
    pub fn fruit_for(&self, character: &Character) -> Option<&DevilFruit> {
        if character.devil_fruit_id == 0 {
            return None;
        }
        self.fruits.get(&character.devil_fruit_id)
    }

    pub fn territory_claim(&self, island_id: u64) -> Option<&TerritoryClaim> {
        self.territory_by_island
            .get(&island_id)
            .and_then(|id| self.territories.get(id))
    }

    /// Crews currently on an island.
    pub fn crews_on(&self, island_id: u64) -> Vec<&Crew> {
        self.crews_by_island
            .get(&island_id)
            .map(|ids| ids.iter().filter_map(|id| self.crews.get(id)).collect())
            .unwrap_or_default()
    }

    /// Whether the crew is mid-task right now. Crews with an active task are
    /// left alone by the ambient simulation.
    pub fn has_active_task(&self, crew_id: u64, now_ms: i64) -> bool {
        self.tasks
            .iter()
            .any(|t| t.crew_id == crew_id && t.is_active(now_ms))
    }

    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() >= ttl
    }
}

/// TTL cache over [`WorldSnapshot`]. One per ticker; not shared.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    current: Option<WorldSnapshot>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Drop the cached snapshot so the next access reloads.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Current snapshot, reloading (and repairing) if missing or expired.
    pub async fn snapshot(&mut self, store: &WorldStore) -> Result<&WorldSnapshot, sqlx::Error> {
        if self.current.as_ref().is_none_or(|s| s.is_stale(self.ttl)) {
            let (snapshot, repairs) = WorldSnapshot::load(store).await?;
            if !repairs.is_empty() {
                repairs.flush(store).await?;
            }
            self.current = Some(snapshot);
        }
        match &self.current {
            Some(snapshot) => Ok(snapshot),
            None => unreachable!("refreshed above"),
        }
    }
}
