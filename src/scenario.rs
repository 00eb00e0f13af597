//! Fluent builder for in-memory world state.
//!
//! Tests use it for deterministic setup: add islands, crews, and characters,
//! then [`Scenario::build`] a snapshot to run phases against, or
//! [`Scenario::write_to`] a store for persistence-level tests. Defaults are
//! deliberately plain (flat stat growth, no jitter) so assertions stay exact.

use crate::id::IdGenerator;
use crate::model::{
    Character, CombatStyle, Crew, CrewPosition, DevilFruit, Faction, FruitKind, Island, Ship,
    Task, TaskKind, TerritoryClaim, TitleRecord, TitledRole,
};
use crate::sim::battle::scaled_growth;
use crate::store::{WorldSnapshot, WorldStore};

/// IDs returned by [`Scenario::add_manned_crew`].
pub struct CrewIds {
    pub crew: u64,
    pub captain: u64,
    pub ship: u64,
    pub members: Vec<u64>,
}

/// Builder over an empty [`WorldSnapshot`].
pub struct Scenario {
    snapshot: WorldSnapshot,
    ids: IdGenerator,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self {
            snapshot: WorldSnapshot::empty(),
            ids: IdGenerator::new(),
        }
    }

    // -- Entity creation --

    pub fn add_island(&mut self, difficulty: u32) -> u64 {
        self.add_island_with(difficulty, |_| {})
    }

    pub fn add_island_with(&mut self, difficulty: u32, modify: impl FnOnce(&mut Island)) -> u64 {
        let id = self.ids.next_id();
        let mut island = Island {
            id,
            name: format!("Island {id}"),
            difficulty,
            description: String::new(),
        };
        modify(&mut island);
        self.snapshot.islands.insert(id, island);
        id
    }

    /// Add a crew shell with no members. `captain_id` stays 0 until a captain
    /// is added.
    pub fn add_crew(&mut self, faction: Faction, island: u64) -> u64 {
        self.add_crew_with(faction, island, |_| {})
    }

    pub fn add_crew_with(
        &mut self,
        faction: Faction,
        island: u64,
        modify: impl FnOnce(&mut Crew),
    ) -> u64 {
        let id = self.ids.next_id();
        let mut crew = Crew {
            id,
            name: format!("Crew {id}"),
            captain_id: 0,
            faction,
            treasury: 100.0,
            reputation: 10.0,
            current_island: island,
            docked: true,
            founded_at: 0,
        };
        modify(&mut crew);
        self.snapshot.crews.insert(id, crew);
        id
    }

    /// Add a crew member. Stats are the all-rounder growth template times
    /// level, with no jitter, so power is a pure function of level.
    pub fn add_character(&mut self, faction: Faction, level: u32, crew: u64) -> u64 {
        self.add_character_with(faction, level, crew, |_| {})
    }

    pub fn add_character_with(
        &mut self,
        faction: Faction,
        level: u32,
        crew: u64,
        modify: impl FnOnce(&mut Character),
    ) -> u64 {
        let id = self.ids.next_id();
        let style = CombatStyle::AllRounder;
        let mut character = Character {
            id,
            name: format!("Character {id}"),
            faction,
            level,
            experience: 0.0,
            bounty: 0.0,
            stats: scaled_growth(&style.growth(), level as f64),
            crew_id: crew,
            position: CrewPosition::CrewMember,
            devil_fruit_id: 0,
            is_player: false,
            kindness: 0,
            loyalty: 0,
            king_haki_potential: 0.0,
            defending_base: false,
            combat_style: style,
        };
        modify(&mut character);
        self.snapshot.characters.insert(id, character);
        id
    }

    /// Add a captain to an existing crew, fixing up the back-reference.
    pub fn add_captain(&mut self, faction: Faction, level: u32, crew: u64) -> u64 {
        self.add_captain_with(faction, level, crew, |_| {})
    }

    pub fn add_captain_with(
        &mut self,
        faction: Faction,
        level: u32,
        crew: u64,
        modify: impl FnOnce(&mut Character),
    ) -> u64 {
        let id = self.add_character_with(faction, level, crew, |c| {
            c.position = CrewPosition::Captain;
            modify(c);
        });
        self.modify_crew(crew, |c| c.captain_id = id);
        id
    }

    pub fn add_ship(&mut self, crew: u64, level: u32) -> u64 {
        self.add_ship_with(crew, level, |_| {})
    }

    pub fn add_ship_with(&mut self, crew: u64, level: u32, modify: impl FnOnce(&mut Ship)) -> u64 {
        let id = self.ids.next_id();
        let mut ship = Ship {
            id,
            crew_id: crew,
            name: format!("Ship {id}"),
            level,
            need_repair: false,
            destroyed: false,
        };
        modify(&mut ship);
        self.snapshot.ships.insert(id, ship);
        id
    }

    pub fn add_fruit(&mut self, rarity: f64) -> u64 {
        self.add_fruit_with(rarity, |_| {})
    }

    pub fn add_fruit_with(&mut self, rarity: f64, modify: impl FnOnce(&mut DevilFruit)) -> u64 {
        let id = self.ids.next_id();
        let mut fruit = DevilFruit {
            id,
            name: format!("Fruit {id}"),
            kind: FruitKind::Paramecia,
            rarity,
            awakening_level: DevilFruit::awakening_level_for(rarity),
            owner_id: 0,
        };
        modify(&mut fruit);
        self.snapshot.fruits.insert(id, fruit);
        id
    }

    /// Link a fruit to its eater on both sides.
    pub fn give_fruit(&mut self, character: u64, fruit: u64) {
        if let Some(f) = self.snapshot.fruits.get_mut(&fruit) {
            f.owner_id = character;
        }
        if let Some(c) = self.snapshot.characters.get_mut(&character) {
            c.devil_fruit_id = fruit;
        }
    }

    pub fn add_title(&mut self, role: TitledRole, character: u64, base_island: u64) -> u64 {
        let id = self.ids.next_id();
        self.snapshot.titles.insert(
            id,
            TitleRecord {
                id,
                role,
                character_id: character,
                base_island,
            },
        );
        id
    }

    pub fn add_claim(&mut self, island: u64, crew: u64) -> u64 {
        let id = self.ids.next_id();
        self.snapshot.territories.insert(
            id,
            TerritoryClaim {
                id,
                island_id: island,
                crew_id: crew,
            },
        );
        id
    }

    /// Add an active task window for a crew.
    pub fn add_task(&mut self, crew: u64, kind: TaskKind, start_ms: i64, end_ms: i64) -> u64 {
        let id = self.ids.next_id();
        self.snapshot.tasks.push(Task {
            id,
            kind,
            crew_id: crew,
            start_ms,
            end_ms,
            completed: false,
        });
        id
    }

    // -- Composite builders --

    /// Crew + captain + ship + `member_count` extra members in one call.
    pub fn add_manned_crew(
        &mut self,
        faction: Faction,
        island: u64,
        captain_level: u32,
        member_count: usize,
    ) -> CrewIds {
        let crew = self.add_crew(faction, island);
        let captain = self.add_captain(faction, captain_level, crew);
        let ship_level = (1 + captain_level / 25).clamp(1, 5);
        let ship = self.add_ship(crew, ship_level);
        let members = (0..member_count)
            .map(|_| self.add_character(faction, captain_level.saturating_sub(5).max(1), crew))
            .collect();
        CrewIds {
            crew,
            captain,
            ship,
            members,
        }
    }

    // -- Entity mutation --

    pub fn modify_character(&mut self, id: u64, modify: impl FnOnce(&mut Character)) {
        let c = self
            .snapshot
            .characters
            .get_mut(&id)
            .unwrap_or_else(|| panic!("character {id} not found"));
        modify(c);
    }

    pub fn modify_crew(&mut self, id: u64, modify: impl FnOnce(&mut Crew)) {
        let c = self
            .snapshot
            .crews
            .get_mut(&id)
            .unwrap_or_else(|| panic!("crew {id} not found"));
        modify(c);
    }

    pub fn modify_ship(&mut self, id: u64, modify: impl FnOnce(&mut Ship)) {
        let s = self
            .snapshot
            .ships
            .get_mut(&id)
            .unwrap_or_else(|| panic!("ship {id} not found"));
        modify(s);
    }

    // -- Output --

    /// Finish the build: index the rows and stamp the id high-water mark.
    pub fn build(mut self) -> WorldSnapshot {
        self.snapshot.next_id = self.ids.peek();
        self.snapshot.rebuild_indexes();
        self.snapshot
    }

    /// Persist every row to a store. Used by integration tests that exercise
    /// the load/repair path instead of a hand-built snapshot.
    pub async fn write_to(self, store: &WorldStore) -> Result<WorldSnapshot, sqlx::Error> {
        let snapshot = self.build();
        let islands: Vec<Island> = snapshot.islands.values().cloned().collect();
        let fruits: Vec<DevilFruit> = snapshot.fruits.values().cloned().collect();
        let characters: Vec<Character> = snapshot.characters.values().cloned().collect();
        let crews: Vec<Crew> = snapshot.crews.values().cloned().collect();
        let ships: Vec<Ship> = snapshot.ships.values().cloned().collect();
        let titles: Vec<TitleRecord> = snapshot.titles.values().cloned().collect();
        let territories: Vec<TerritoryClaim> = snapshot.territories.values().cloned().collect();

        store.insert_islands(&islands).await?;
        store.insert_fruits(&fruits).await?;
        store.insert_characters(&characters).await?;
        store.insert_crews(&crews).await?;
        store.insert_ships(&ships).await?;
        store.insert_titles(&titles).await?;
        store.insert_territories(&territories).await?;
        store.insert_tasks(&snapshot.tasks).await?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manned_crew_wires_references() {
        let mut s = Scenario::new();
        let island = s.add_island(5);
        let ids = s.add_manned_crew(Faction::Pirate, island, 50, 3);
        let snapshot = s.build();

        let crew = &snapshot.crews[&ids.crew];
        assert_eq!(crew.captain_id, ids.captain);
        assert_eq!(snapshot.members_of(ids.crew).len(), 4);
        assert_eq!(snapshot.ship_of(ids.crew).map(|s| s.id), Some(ids.ship));
        assert_eq!(snapshot.captain_of(ids.crew).map(|c| c.id), Some(ids.captain));
    }

    #[test]
    fn next_id_clears_all_assigned_ids() {
        let mut s = Scenario::new();
        let island = s.add_island(1);
        s.add_manned_crew(Faction::Marine, island, 30, 2);
        let snapshot = s.build();
        let max = snapshot
            .characters
            .keys()
            .chain(snapshot.crews.keys())
            .chain(snapshot.ships.keys())
            .chain(snapshot.islands.keys())
            .copied()
            .max()
            .unwrap();
        assert!(snapshot.next_id > max);
    }

    #[test]
    fn give_fruit_links_both_sides() {
        let mut s = Scenario::new();
        let island = s.add_island(1);
        let ids = s.add_manned_crew(Faction::Pirate, island, 40, 0);
        let fruit = s.add_fruit(0.9);
        s.give_fruit(ids.captain, fruit);
        let snapshot = s.build();

        assert_eq!(snapshot.fruits[&fruit].owner_id, ids.captain);
        assert_eq!(snapshot.characters[&ids.captain].devil_fruit_id, fruit);
        let captain = &snapshot.characters[&ids.captain];
        assert_eq!(snapshot.fruit_for(captain).map(|f| f.id), Some(fruit));
    }
}
