//! Typed CRUD and indexed-query facade over the persisted world tables.
//!
//! Each table gets the same narrow surface: get-by-id, get-all, indexed
//! query, bulk insert with caller-assigned ids, partial patch update (single
//! and bulk), and delete. All bulk operations run inside transactions. The
//! simulation never touches SQL outside this module.

pub mod batch;
pub mod snapshot;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::model::{
    BattleRecord, Character, CombatStyle, Crew, CrewPosition, DevilFruit, Faction, FruitKind,
    Island, Ship, StatBlock, Task, TaskKind, TerritoryClaim, TitleRecord, TitledRole,
};

pub use batch::{
    CharacterPatch, CrewPatch, FlushStats, FruitPatch, ShipPatch, TerritoryPatch, WriteBatch,
};
pub use snapshot::{SnapshotCache, WorldSnapshot};

fn decode_err(msg: String) -> sqlx::Error {
    sqlx::Error::Decode(msg.into())
}

pub struct WorldStore {
    pool: SqlitePool,
}

impl WorldStore {
    /// Open (or create) an on-disk world database and run the schema DDL.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        // A single connection keeps writes serialized, matching the
        // one-writer-at-a-time commit model.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Fresh in-memory store, mainly for tests.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Execute the schema DDL (all CREATE TABLE / CREATE INDEX IF NOT EXISTS).
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../sql/schema.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every row of every world table. Worldgen runs this first.
    pub async fn clear_all(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for table in [
            "characters",
            "crews",
            "ships",
            "islands",
            "devil_fruits",
            "titles",
            "territories",
            "tasks",
            "battles",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Highest id currently used by any table (0 for an empty store). Used to
    /// seed the id generator for a tick's write batch.
    pub async fn max_id(&self) -> Result<u64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT MAX(m) AS max_id FROM (
                SELECT MAX(id) AS m FROM characters
                UNION ALL SELECT MAX(id) FROM crews
                UNION ALL SELECT MAX(id) FROM ships
                UNION ALL SELECT MAX(id) FROM islands
                UNION ALL SELECT MAX(id) FROM devil_fruits
                UNION ALL SELECT MAX(id) FROM titles
                UNION ALL SELECT MAX(id) FROM territories
                UNION ALL SELECT MAX(id) FROM tasks
                UNION ALL SELECT MAX(id) FROM battles
            )",
        )
        .fetch_one(&self.pool)
        .await?;
        let max: Option<i64> = row.try_get("max_id")?;
        Ok(max.unwrap_or(0) as u64)
    }

    // --- characters ---

    pub async fn get_character(&self, id: u64) -> Result<Option<Character>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| character_from_row(&r)).transpose()
    }

    pub async fn all_characters(&self) -> Result<Vec<Character>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM characters ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(character_from_row).collect()
    }

    pub async fn characters_by_crew(&self, crew_id: u64) -> Result<Vec<Character>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM characters WHERE crew_id = ? ORDER BY id")
            .bind(crew_id as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(character_from_row).collect()
    }

    pub async fn insert_characters(&self, characters: &[Character]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for c in characters {
            let stats = serde_json::to_string(&c.stats)
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query(
                "INSERT INTO characters (id, name, faction, level, experience, bounty, stats,
                    crew_id, position, devil_fruit_id, is_player, kindness, loyalty,
                    king_haki_potential, defending_base, combat_style)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(c.id as i64)
            .bind(&c.name)
            .bind(c.faction.as_str())
            .bind(c.level as i64)
            .bind(c.experience)
            .bind(c.bounty)
            .bind(stats)
            .bind(c.crew_id as i64)
            .bind(c.position.as_str())
            .bind(c.devil_fruit_id as i64)
            .bind(c.is_player)
            .bind(c.kindness as i64)
            .bind(c.loyalty as i64)
            .bind(c.king_haki_potential)
            .bind(c.defending_base)
            .bind(c.combat_style.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_character(
        &self,
        id: u64,
        patch: &CharacterPatch,
    ) -> Result<(), sqlx::Error> {
        self.update_characters(&[(id, patch)]).await
    }

    /// Apply many character patches in one transaction.
    pub async fn update_characters(
        &self,
        patches: &[(u64, &CharacterPatch)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (id, patch) in patches {
            let stats = patch
                .stats
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query(
                "UPDATE characters SET
                    level = COALESCE(?, level),
                    experience = COALESCE(?, experience),
                    bounty = COALESCE(?, bounty),
                    stats = COALESCE(?, stats),
                    crew_id = COALESCE(?, crew_id),
                    faction = COALESCE(?, faction),
                    position = COALESCE(?, position),
                    devil_fruit_id = COALESCE(?, devil_fruit_id),
                    loyalty = COALESCE(?, loyalty),
                    defending_base = COALESCE(?, defending_base)
                 WHERE id = ?",
            )
            .bind(patch.level.map(|v| v as i64))
            .bind(patch.experience)
            .bind(patch.bounty)
            .bind(stats)
            .bind(patch.crew_id.map(|v| v as i64))
            .bind(patch.faction.map(|f| f.as_str()))
            .bind(patch.position.map(|p| p.as_str()))
            .bind(patch.devil_fruit_id.map(|v| v as i64))
            .bind(patch.loyalty.map(|v| v as i64))
            .bind(patch.defending_base)
            .bind(*id as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_characters(&self, ids: &[u64]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for id in ids {
            sqlx::query("DELETE FROM characters WHERE id = ?")
                .bind(*id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- crews ---

    pub async fn get_crew(&self, id: u64) -> Result<Option<Crew>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM crews WHERE id = ?")
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| crew_from_row(&r)).transpose()
    }

    pub async fn all_crews(&self) -> Result<Vec<Crew>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM crews ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(crew_from_row).collect()
    }

    pub async fn crews_by_island(&self, island_id: u64) -> Result<Vec<Crew>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM crews WHERE current_island = ? ORDER BY id")
            .bind(island_id as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(crew_from_row).collect()
    }

    pub async fn insert_crews(&self, crews: &[Crew]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for c in crews {
            sqlx::query(
                "INSERT INTO crews (id, name, captain_id, faction, treasury, reputation,
                    current_island, docked, founded_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(c.id as i64)
            .bind(&c.name)
            .bind(c.captain_id as i64)
            .bind(c.faction.as_str())
            .bind(c.treasury)
            .bind(c.reputation)
            .bind(c.current_island as i64)
            .bind(c.docked)
            .bind(c.founded_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_crew(&self, id: u64, patch: &CrewPatch) -> Result<(), sqlx::Error> {
        self.update_crews(&[(id, patch)]).await
    }

    pub async fn update_crews(&self, patches: &[(u64, &CrewPatch)]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (id, patch) in patches {
            sqlx::query(
                "UPDATE crews SET
                    captain_id = COALESCE(?, captain_id),
                    treasury = COALESCE(?, treasury),
                    reputation = COALESCE(?, reputation),
                    current_island = COALESCE(?, current_island),
                    docked = COALESCE(?, docked)
                 WHERE id = ?",
            )
            .bind(patch.captain_id.map(|v| v as i64))
            .bind(patch.treasury)
            .bind(patch.reputation)
            .bind(patch.current_island.map(|v| v as i64))
            .bind(patch.docked)
            .bind(*id as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_crews(&self, ids: &[u64]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for id in ids {
            sqlx::query("DELETE FROM crews WHERE id = ?")
                .bind(*id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- ships ---

    pub async fn all_ships(&self) -> Result<Vec<Ship>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM ships ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(ship_from_row).collect()
    }

    pub async fn ship_by_crew(&self, crew_id: u64) -> Result<Option<Ship>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM ships WHERE crew_id = ? LIMIT 1")
            .bind(crew_id as i64)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| ship_from_row(&r)).transpose()
    }

    pub async fn insert_ships(&self, ships: &[Ship]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for s in ships {
            sqlx::query(
                "INSERT INTO ships (id, crew_id, name, level, need_repair, destroyed)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(s.id as i64)
            .bind(s.crew_id as i64)
            .bind(&s.name)
            .bind(s.level as i64)
            .bind(s.need_repair)
            .bind(s.destroyed)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_ship(&self, id: u64, patch: &ShipPatch) -> Result<(), sqlx::Error> {
        self.update_ships(&[(id, patch)]).await
    }

    pub async fn update_ships(&self, patches: &[(u64, &ShipPatch)]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (id, patch) in patches {
            sqlx::query(
                "UPDATE ships SET
                    level = COALESCE(?, level),
                    need_repair = COALESCE(?, need_repair),
                    destroyed = COALESCE(?, destroyed)
                 WHERE id = ?",
            )
            .bind(patch.level.map(|v| v as i64))
            .bind(patch.need_repair)
            .bind(patch.destroyed)
            .bind(*id as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_ships(&self, ids: &[u64]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for id in ids {
            sqlx::query("DELETE FROM ships WHERE id = ?")
                .bind(*id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- islands ---

    pub async fn all_islands(&self) -> Result<Vec<Island>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM islands ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(island_from_row).collect()
    }

    pub async fn insert_islands(&self, islands: &[Island]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for i in islands {
            sqlx::query(
                "INSERT INTO islands (id, name, difficulty, description) VALUES (?, ?, ?, ?)",
            )
            .bind(i.id as i64)
            .bind(&i.name)
            .bind(i.difficulty as i64)
            .bind(&i.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- devil fruits ---

    pub async fn all_fruits(&self) -> Result<Vec<DevilFruit>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM devil_fruits ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(fruit_from_row).collect()
    }

    pub async fn fruit_by_owner(&self, owner_id: u64) -> Result<Option<DevilFruit>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM devil_fruits WHERE owner_id = ? LIMIT 1")
            .bind(owner_id as i64)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| fruit_from_row(&r)).transpose()
    }

    pub async fn insert_fruits(&self, fruits: &[DevilFruit]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for f in fruits {
            sqlx::query(
                "INSERT INTO devil_fruits (id, name, kind, rarity, awakening_level, owner_id)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(f.id as i64)
            .bind(&f.name)
            .bind(f.kind.as_str())
            .bind(f.rarity)
            .bind(f.awakening_level as i64)
            .bind(f.owner_id as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_fruit(&self, id: u64, patch: &FruitPatch) -> Result<(), sqlx::Error> {
        self.update_fruits(&[(id, patch)]).await
    }

    pub async fn update_fruits(&self, patches: &[(u64, &FruitPatch)]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (id, patch) in patches {
            sqlx::query("UPDATE devil_fruits SET owner_id = COALESCE(?, owner_id) WHERE id = ?")
                .bind(patch.owner_id.map(|v| v as i64))
                .bind(*id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- titles ---

    pub async fn all_titles(&self) -> Result<Vec<TitleRecord>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM titles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(title_from_row).collect()
    }

    pub async fn titles_by_role(&self, role: TitledRole) -> Result<Vec<TitleRecord>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM titles WHERE role = ? ORDER BY id")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(title_from_row).collect()
    }

    pub async fn insert_titles(&self, titles: &[TitleRecord]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for t in titles {
            sqlx::query(
                "INSERT INTO titles (id, role, character_id, base_island) VALUES (?, ?, ?, ?)",
            )
            .bind(t.id as i64)
            .bind(t.role.as_str())
            .bind(t.character_id as i64)
            .bind(t.base_island as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_titles(&self, ids: &[u64]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for id in ids {
            sqlx::query("DELETE FROM titles WHERE id = ?")
                .bind(*id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- territories ---

    pub async fn all_territories(&self) -> Result<Vec<TerritoryClaim>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM territories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(territory_from_row).collect()
    }

    pub async fn insert_territories(&self, claims: &[TerritoryClaim]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for t in claims {
            sqlx::query("INSERT INTO territories (id, island_id, crew_id) VALUES (?, ?, ?)")
                .bind(t.id as i64)
                .bind(t.island_id as i64)
                .bind(t.crew_id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_territory(
        &self,
        id: u64,
        patch: &TerritoryPatch,
    ) -> Result<(), sqlx::Error> {
        self.update_territories(&[(id, patch)]).await
    }

    pub async fn update_territories(
        &self,
        patches: &[(u64, &TerritoryPatch)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (id, patch) in patches {
            sqlx::query("UPDATE territories SET crew_id = COALESCE(?, crew_id) WHERE id = ?")
                .bind(patch.crew_id.map(|v| v as i64))
                .bind(*id as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- tasks ---

    pub async fn all_tasks(&self) -> Result<Vec<Task>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(task_from_row).collect()
    }

    pub async fn insert_tasks(&self, tasks: &[Task]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for t in tasks {
            sqlx::query(
                "INSERT INTO tasks (id, kind, crew_id, start_ms, end_ms, completed)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(t.id as i64)
            .bind(t.kind.as_str())
            .bind(t.crew_id as i64)
            .bind(t.start_ms)
            .bind(t.end_ms)
            .bind(t.completed)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // --- battles ---

    pub async fn all_battles(&self) -> Result<Vec<BattleRecord>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM battles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(battle_from_row).collect()
    }

    pub async fn insert_battles(&self, battles: &[BattleRecord]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for b in battles {
            let log = serde_json::to_string(&b.log)
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query(
                "INSERT INTO battles (id, challenger_crew, opponent_crew, winner_crew,
                    loser_crew, experience_gain, bounty_gain, log, fought_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(b.id as i64)
            .bind(b.challenger_crew as i64)
            .bind(b.opponent_crew as i64)
            .bind(b.winner_crew as i64)
            .bind(b.loser_crew as i64)
            .bind(b.experience_gain)
            .bind(b.bounty_gain)
            .bind(log)
            .bind(b.fought_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

// --- row mapping ---

fn character_from_row(row: &SqliteRow) -> Result<Character, sqlx::Error> {
    let faction: String = row.try_get("faction")?;
    let position: String = row.try_get("position")?;
    let style: String = row.try_get("combat_style")?;
    let stats: String = row.try_get("stats")?;
    Ok(Character {
        id: row.try_get::<i64, _>("id")? as u64,
        name: row.try_get("name")?,
        faction: Faction::parse(&faction)
            .ok_or_else(|| decode_err(format!("unknown faction: {faction}")))?,
        level: row.try_get::<i64, _>("level")? as u32,
        experience: row.try_get("experience")?,
        bounty: row.try_get("bounty")?,
        stats: serde_json::from_str::<StatBlock>(&stats)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        crew_id: row.try_get::<i64, _>("crew_id")? as u64,
        position: CrewPosition::parse(&position)
            .ok_or_else(|| decode_err(format!("unknown position: {position}")))?,
        devil_fruit_id: row.try_get::<i64, _>("devil_fruit_id")? as u64,
        is_player: row.try_get("is_player")?,
        kindness: row.try_get::<i64, _>("kindness")? as i32,
        loyalty: row.try_get::<i64, _>("loyalty")? as i32,
        king_haki_potential: row.try_get("king_haki_potential")?,
        defending_base: row.try_get("defending_base")?,
        combat_style: CombatStyle::parse(&style)
            .ok_or_else(|| decode_err(format!("unknown combat style: {style}")))?,
    })
}

fn crew_from_row(row: &SqliteRow) -> Result<Crew, sqlx::Error> {
    let faction: String = row.try_get("faction")?;
    Ok(Crew {
        id: row.try_get::<i64, _>("id")? as u64,
        name: row.try_get("name")?,
        captain_id: row.try_get::<i64, _>("captain_id")? as u64,
        faction: Faction::parse(&faction)
            .ok_or_else(|| decode_err(format!("unknown faction: {faction}")))?,
        treasury: row.try_get("treasury")?,
        reputation: row.try_get("reputation")?,
        current_island: row.try_get::<i64, _>("current_island")? as u64,
        docked: row.try_get("docked")?,
        founded_at: row.try_get("founded_at")?,
    })
}

fn ship_from_row(row: &SqliteRow) -> Result<Ship, sqlx::Error> {
    Ok(Ship {
        id: row.try_get::<i64, _>("id")? as u64,
        crew_id: row.try_get::<i64, _>("crew_id")? as u64,
        name: row.try_get("name")?,
        level: row.try_get::<i64, _>("level")? as u32,
        need_repair: row.try_get("need_repair")?,
        destroyed: row.try_get("destroyed")?,
    })
}

fn island_from_row(row: &SqliteRow) -> Result<Island, sqlx::Error> {
    Ok(Island {
        id: row.try_get::<i64, _>("id")? as u64,
        name: row.try_get("name")?,
        difficulty: row.try_get::<i64, _>("difficulty")? as u32,
        description: row.try_get("description")?,
    })
}

fn fruit_from_row(row: &SqliteRow) -> Result<DevilFruit, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    Ok(DevilFruit {
        id: row.try_get::<i64, _>("id")? as u64,
        name: row.try_get("name")?,
        kind: FruitKind::parse(&kind)
            .ok_or_else(|| decode_err(format!("unknown fruit kind: {kind}")))?,
        rarity: row.try_get("rarity")?,
        awakening_level: row.try_get::<i64, _>("awakening_level")? as u32,
        owner_id: row.try_get::<i64, _>("owner_id")? as u64,
    })
}

fn title_from_row(row: &SqliteRow) -> Result<TitleRecord, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(TitleRecord {
        id: row.try_get::<i64, _>("id")? as u64,
        role: TitledRole::parse(&role)
            .ok_or_else(|| decode_err(format!("unknown role: {role}")))?,
        character_id: row.try_get::<i64, _>("character_id")? as u64,
        base_island: row.try_get::<i64, _>("base_island")? as u64,
    })
}

fn territory_from_row(row: &SqliteRow) -> Result<TerritoryClaim, sqlx::Error> {
    Ok(TerritoryClaim {
        id: row.try_get::<i64, _>("id")? as u64,
        island_id: row.try_get::<i64, _>("island_id")? as u64,
        crew_id: row.try_get::<i64, _>("crew_id")? as u64,
    })
}

fn task_from_row(row: &SqliteRow) -> Result<Task, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    Ok(Task {
        id: row.try_get::<i64, _>("id")? as u64,
        kind: TaskKind::parse(&kind)
            .ok_or_else(|| decode_err(format!("unknown task kind: {kind}")))?,
        crew_id: row.try_get::<i64, _>("crew_id")? as u64,
        start_ms: row.try_get("start_ms")?,
        end_ms: row.try_get("end_ms")?,
        completed: row.try_get("completed")?,
    })
}

fn battle_from_row(row: &SqliteRow) -> Result<BattleRecord, sqlx::Error> {
    let log: String = row.try_get("log")?;
    Ok(BattleRecord {
        id: row.try_get::<i64, _>("id")? as u64,
        challenger_crew: row.try_get::<i64, _>("challenger_crew")? as u64,
        opponent_crew: row.try_get::<i64, _>("opponent_crew")? as u64,
        winner_crew: row.try_get::<i64, _>("winner_crew")? as u64,
        loser_crew: row.try_get::<i64, _>("loser_crew")? as u64,
        experience_gain: row.try_get("experience_gain")?,
        bounty_gain: row.try_get("bounty_gain")?,
        log: serde_json::from_str(&log).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        fought_at: row.try_get("fought_at")?,
    })
}
