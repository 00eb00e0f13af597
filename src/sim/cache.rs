//! TTL memoization of power values.
//!
//! Power is recomputed from stats on every query otherwise; encounter pairing
//! and territory scoring query the same crews repeatedly within a tick, so a
//! short TTL pays for itself. Entries are invalidated eagerly when a battle
//! changes the underlying stats.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::sim::power;
use crate::store::WorldSnapshot;

pub const DEFAULT_POWER_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct PowerCache {
    ttl: Duration,
    characters: HashMap<u64, (f64, Instant)>,
    crews: HashMap<u64, (f64, Instant)>,
}

impl PowerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            characters: HashMap::new(),
            crews: HashMap::new(),
        }
    }

    /// Power of one character, memoized. Unknown ids score 0.
    pub fn character_power(&mut self, snapshot: &WorldSnapshot, id: u64) -> f64 {
        if let Some((value, at)) = self.characters.get(&id) {
            if at.elapsed() < self.ttl {
                return *value;
            }
        }
        let Some(character) = snapshot.characters.get(&id) else {
            return 0.0;
        };
        let value = power::character_power(character, snapshot.fruit_for(character));
        self.characters.insert(id, (value, Instant::now()));
        value
    }

    /// Aggregate power of a crew, memoized. Unknown or empty crews score 0.
    pub fn crew_power(&mut self, snapshot: &WorldSnapshot, crew_id: u64) -> f64 {
        if let Some((value, at)) = self.crews.get(&crew_id) {
            if at.elapsed() < self.ttl {
                return *value;
            }
        }
        let value = power::crew_power(snapshot.members_of(crew_id), |fruit_id| {
            snapshot.fruits.get(&fruit_id)
        });
        self.crews.insert(crew_id, (value, Instant::now()));
        value
    }

    /// Drop a character's entry and the entry of the crew it belongs to.
    pub fn invalidate_character(&mut self, snapshot: &WorldSnapshot, id: u64) {
        self.characters.remove(&id);
        if let Some(c) = snapshot.characters.get(&id) {
            if c.crew_id != 0 {
                self.crews.remove(&c.crew_id);
            }
        }
    }

    pub fn invalidate_crew(&mut self, crew_id: u64) {
        self.crews.remove(&crew_id);
    }

    pub fn clear(&mut self) {
        self.characters.clear();
        self.crews.clear();
    }
}

impl Default for PowerCache {
    fn default() -> Self {
        Self::new(DEFAULT_POWER_TTL)
    }
}
