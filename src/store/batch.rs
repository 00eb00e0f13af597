//! Buffered world mutations.
//!
//! Simulation phases never write to the store directly. They record patches,
//! inserts, and deletes into a [`WriteBatch`], and the tick runner flushes the
//! whole batch once the phase group finishes. Patches to the same row merge,
//! so two phases touching one character cost one UPDATE.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::IdGenerator;
use crate::model::{
    BattleRecord, Character, Crew, CrewPosition, Faction, Ship, StatBlock, TerritoryClaim,
    TitleRecord,
};
use crate::store::WorldStore;

// --- Constants ---

/// Rows per transaction during flush. Keeps any single transaction small
/// enough that a mid-flush failure loses at most one chunk.
const FLUSH_CHUNK: usize = 100;

/// Partial update for a character row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterPatch {
    pub level: Option<u32>,
    pub experience: Option<f64>,
    pub bounty: Option<f64>,
    pub stats: Option<StatBlock>,
    pub crew_id: Option<u64>,
    pub faction: Option<Faction>,
    pub position: Option<CrewPosition>,
    pub devil_fruit_id: Option<u64>,
    pub loyalty: Option<i32>,
    pub defending_base: Option<bool>,
}

impl CharacterPatch {
    /// Overlay `other` on top of `self`. Later writes win per field.
    pub fn merge(&mut self, other: CharacterPatch) {
        merge_field(&mut self.level, other.level);
        merge_field(&mut self.experience, other.experience);
        merge_field(&mut self.bounty, other.bounty);
        merge_field(&mut self.stats, other.stats);
        merge_field(&mut self.crew_id, other.crew_id);
        merge_field(&mut self.faction, other.faction);
        merge_field(&mut self.position, other.position);
        merge_field(&mut self.devil_fruit_id, other.devil_fruit_id);
        merge_field(&mut self.loyalty, other.loyalty);
        merge_field(&mut self.defending_base, other.defending_base);
    }

    /// Apply to an in-memory copy, mirroring what the UPDATE will do.
    pub fn apply_to(&self, c: &mut Character) {
        if let Some(v) = self.level {
            c.level = v;
        }
        if let Some(v) = self.experience {
            c.experience = v;
        }
        if let Some(v) = self.bounty {
            c.bounty = v;
        }
        if let Some(v) = &self.stats {
            c.stats = v.clone();
        }
        if let Some(v) = self.crew_id {
            c.crew_id = v;
        }
        if let Some(v) = self.faction {
            c.faction = v;
        }
        if let Some(v) = self.position {
            c.position = v;
        }
        if let Some(v) = self.devil_fruit_id {
            c.devil_fruit_id = v;
        }
        if let Some(v) = self.loyalty {
            c.loyalty = v;
        }
        if let Some(v) = self.defending_base {
            c.defending_base = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewPatch {
    pub captain_id: Option<u64>,
    pub treasury: Option<f64>,
    pub reputation: Option<f64>,
    pub current_island: Option<u64>,
    pub docked: Option<bool>,
}

impl CrewPatch {
    pub fn merge(&mut self, other: CrewPatch) {
        merge_field(&mut self.captain_id, other.captain_id);
        merge_field(&mut self.treasury, other.treasury);
        merge_field(&mut self.reputation, other.reputation);
        merge_field(&mut self.current_island, other.current_island);
        merge_field(&mut self.docked, other.docked);
    }

    pub fn apply_to(&self, c: &mut Crew) {
        if let Some(v) = self.captain_id {
            c.captain_id = v;
        }
        if let Some(v) = self.treasury {
            c.treasury = v;
        }
        if let Some(v) = self.reputation {
            c.reputation = v;
        }
        if let Some(v) = self.current_island {
            c.current_island = v;
        }
        if let Some(v) = self.docked {
            c.docked = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipPatch {
    pub level: Option<u32>,
    pub need_repair: Option<bool>,
    pub destroyed: Option<bool>,
}

impl ShipPatch {
    pub fn merge(&mut self, other: ShipPatch) {
        merge_field(&mut self.level, other.level);
        merge_field(&mut self.need_repair, other.need_repair);
        merge_field(&mut self.destroyed, other.destroyed);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FruitPatch {
    pub owner_id: Option<u64>,
}

impl FruitPatch {
    pub fn merge(&mut self, other: FruitPatch) {
        merge_field(&mut self.owner_id, other.owner_id);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritoryPatch {
    pub crew_id: Option<u64>,
}

impl TerritoryPatch {
    pub fn merge(&mut self, other: TerritoryPatch) {
        merge_field(&mut self.crew_id, other.crew_id);
    }
}

fn merge_field<T>(base: &mut Option<T>, over: Option<T>) {
    if over.is_some() {
        *base = over;
    }
}

/// Counts reported back after a flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushStats {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// All mutations a phase group wants persisted, keyed by row id where the
/// mutation is a patch. BTreeMaps keep flush order deterministic.
#[derive(Debug)]
pub struct WriteBatch {
    id_gen: IdGenerator,
    pub character_patches: BTreeMap<u64, CharacterPatch>,
    pub crew_patches: BTreeMap<u64, CrewPatch>,
    pub ship_patches: BTreeMap<u64, ShipPatch>,
    pub fruit_patches: BTreeMap<u64, FruitPatch>,
    pub territory_patches: BTreeMap<u64, TerritoryPatch>,
    pub new_characters: Vec<Character>,
    pub new_crews: Vec<Crew>,
    pub new_ships: Vec<Ship>,
    pub new_titles: Vec<TitleRecord>,
    pub new_territories: Vec<TerritoryClaim>,
    pub new_battles: Vec<BattleRecord>,
    pub deleted_characters: Vec<u64>,
    pub deleted_crews: Vec<u64>,
    pub deleted_ships: Vec<u64>,
    pub deleted_titles: Vec<u64>,
}

impl WriteBatch {
    /// `next_id` must be greater than every id already in the store.
    pub fn new(next_id: u64) -> Self {
        Self {
            id_gen: IdGenerator::starting_from(next_id.max(1)),
            character_patches: BTreeMap::new(),
            crew_patches: BTreeMap::new(),
            ship_patches: BTreeMap::new(),
            fruit_patches: BTreeMap::new(),
            territory_patches: BTreeMap::new(),
            new_characters: Vec::new(),
            new_crews: Vec::new(),
            new_ships: Vec::new(),
            new_titles: Vec::new(),
            new_territories: Vec::new(),
            new_battles: Vec::new(),
            deleted_characters: Vec::new(),
            deleted_crews: Vec::new(),
            deleted_ships: Vec::new(),
            deleted_titles: Vec::new(),
        }
    }

    /// Allocate a fresh id for a row this batch is about to insert.
    pub fn next_id(&mut self) -> u64 {
        self.id_gen.next_id()
    }

    /// First id not yet handed out by this batch.
    pub fn peek_next_id(&self) -> u64 {
        self.id_gen.peek()
    }

    pub fn patch_character(&mut self, id: u64, patch: CharacterPatch) {
        self.character_patches.entry(id).or_default().merge(patch);
    }

    pub fn patch_crew(&mut self, id: u64, patch: CrewPatch) {
        self.crew_patches.entry(id).or_default().merge(patch);
    }

    pub fn patch_ship(&mut self, id: u64, patch: ShipPatch) {
        self.ship_patches.entry(id).or_default().merge(patch);
    }

    pub fn patch_fruit(&mut self, id: u64, patch: FruitPatch) {
        self.fruit_patches.entry(id).or_default().merge(patch);
    }

    pub fn patch_territory(&mut self, id: u64, patch: TerritoryPatch) {
        self.territory_patches.entry(id).or_default().merge(patch);
    }

    /// Insert a character, assigning its id. Returns the id.
    pub fn insert_character(&mut self, mut character: Character) -> u64 {
        let id = self.next_id();
        character.id = id;
        self.new_characters.push(character);
        id
    }

    pub fn insert_crew(&mut self, mut crew: Crew) -> u64 {
        let id = self.next_id();
        crew.id = id;
        self.new_crews.push(crew);
        id
    }

    pub fn insert_ship(&mut self, mut ship: Ship) -> u64 {
        let id = self.next_id();
        ship.id = id;
        self.new_ships.push(ship);
        id
    }

    pub fn insert_title(&mut self, mut title: TitleRecord) -> u64 {
        let id = self.next_id();
        title.id = id;
        self.new_titles.push(title);
        id
    }

    pub fn insert_territory(&mut self, mut claim: TerritoryClaim) -> u64 {
        let id = self.next_id();
        claim.id = id;
        self.new_territories.push(claim);
        id
    }

    pub fn insert_battle(&mut self, mut record: BattleRecord) -> u64 {
        let id = self.next_id();
        record.id = id;
        self.new_battles.push(record);
        id
    }

    pub fn delete_character(&mut self, id: u64) {
        self.deleted_characters.push(id);
        self.character_patches.remove(&id);
    }

    pub fn delete_crew(&mut self, id: u64) {
        self.deleted_crews.push(id);
        self.crew_patches.remove(&id);
    }

    pub fn delete_ship(&mut self, id: u64) {
        self.deleted_ships.push(id);
        self.ship_patches.remove(&id);
    }

    pub fn delete_title(&mut self, id: u64) {
        self.deleted_titles.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.character_patches.is_empty()
            && self.crew_patches.is_empty()
            && self.ship_patches.is_empty()
            && self.fruit_patches.is_empty()
            && self.territory_patches.is_empty()
            && self.new_characters.is_empty()
            && self.new_crews.is_empty()
            && self.new_ships.is_empty()
            && self.new_titles.is_empty()
            && self.new_territories.is_empty()
            && self.new_battles.is_empty()
            && self.deleted_characters.is_empty()
            && self.deleted_crews.is_empty()
            && self.deleted_ships.is_empty()
            && self.deleted_titles.is_empty()
    }

    /// Persist everything: deletes first, then inserts, then patches.
    pub async fn flush(mut self, store: &WorldStore) -> Result<FlushStats, sqlx::Error> {
        let mut stats = FlushStats::default();

        // A row queued for delete has no business also receiving an update.
        for id in &self.deleted_characters {
            self.character_patches.remove(id);
        }
        for id in &self.deleted_crews {
            self.crew_patches.remove(id);
        }
        for id in &self.deleted_ships {
            self.ship_patches.remove(id);
        }

        dedup(&mut self.deleted_characters);
        dedup(&mut self.deleted_crews);
        dedup(&mut self.deleted_ships);
        dedup(&mut self.deleted_titles);

        for chunk in self.deleted_characters.chunks(FLUSH_CHUNK) {
            store.delete_characters(chunk).await?;
            stats.deleted += chunk.len();
        }
        for chunk in self.deleted_crews.chunks(FLUSH_CHUNK) {
            store.delete_crews(chunk).await?;
            stats.deleted += chunk.len();
        }
        for chunk in self.deleted_ships.chunks(FLUSH_CHUNK) {
            store.delete_ships(chunk).await?;
            stats.deleted += chunk.len();
        }
        for chunk in self.deleted_titles.chunks(FLUSH_CHUNK) {
            store.delete_titles(chunk).await?;
            stats.deleted += chunk.len();
        }

        for chunk in self.new_crews.chunks(FLUSH_CHUNK) {
            store.insert_crews(chunk).await?;
            stats.inserted += chunk.len();
        }
        for chunk in self.new_characters.chunks(FLUSH_CHUNK) {
            store.insert_characters(chunk).await?;
            stats.inserted += chunk.len();
        }
        for chunk in self.new_ships.chunks(FLUSH_CHUNK) {
            store.insert_ships(chunk).await?;
            stats.inserted += chunk.len();
        }
        for chunk in self.new_titles.chunks(FLUSH_CHUNK) {
            store.insert_titles(chunk).await?;
            stats.inserted += chunk.len();
        }
        for chunk in self.new_territories.chunks(FLUSH_CHUNK) {
            store.insert_territories(chunk).await?;
            stats.inserted += chunk.len();
        }
        for chunk in self.new_battles.chunks(FLUSH_CHUNK) {
            store.insert_battles(chunk).await?;
            stats.inserted += chunk.len();
        }

        let character_patches: Vec<_> =
            self.character_patches.iter().map(|(id, p)| (*id, p)).collect();
        for chunk in character_patches.chunks(FLUSH_CHUNK) {
            store.update_characters(chunk).await?;
            stats.updated += chunk.len();
        }
        let crew_patches: Vec<_> = self.crew_patches.iter().map(|(id, p)| (*id, p)).collect();
        for chunk in crew_patches.chunks(FLUSH_CHUNK) {
            store.update_crews(chunk).await?;
            stats.updated += chunk.len();
        }
        let ship_patches: Vec<_> = self.ship_patches.iter().map(|(id, p)| (*id, p)).collect();
        for chunk in ship_patches.chunks(FLUSH_CHUNK) {
            store.update_ships(chunk).await?;
            stats.updated += chunk.len();
        }
        let fruit_patches: Vec<_> = self.fruit_patches.iter().map(|(id, p)| (*id, p)).collect();
        for chunk in fruit_patches.chunks(FLUSH_CHUNK) {
            store.update_fruits(chunk).await?;
            stats.updated += chunk.len();
        }
        let territory_patches: Vec<_> =
            self.territory_patches.iter().map(|(id, p)| (*id, p)).collect();
        for chunk in territory_patches.chunks(FLUSH_CHUNK) {
            store.update_territories(chunk).await?;
            stats.updated += chunk.len();
        }

        Ok(stats)
    }
}

fn dedup(ids: &mut Vec<u64>) {
    ids.sort_unstable();
    ids.dedup();
}
