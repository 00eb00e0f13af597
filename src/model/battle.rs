use serde::{Deserialize, Serialize};

/// Immutable record of a resolved combat. Write-only from the simulation's
/// perspective; read back only by player-facing history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub id: u64,
    pub challenger_crew: u64,
    pub opponent_crew: u64,
    pub winner_crew: u64,
    pub loser_crew: u64,
    pub experience_gain: f64,
    pub bounty_gain: f64,
    pub log: Vec<String>,
    pub fought_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Navigation,
    ShipUpgrade,
    ShipRepair,
    Training,
    IslandLiberation,
    BossFight,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Navigation => "navigation",
            TaskKind::ShipUpgrade => "ship_upgrade",
            TaskKind::ShipRepair => "ship_repair",
            TaskKind::Training => "training",
            TaskKind::IslandLiberation => "island_liberation",
            TaskKind::BossFight => "boss_fight",
        }
    }

    pub fn parse(s: &str) -> Option<TaskKind> {
        match s {
            "navigation" => Some(TaskKind::Navigation),
            "ship_upgrade" => Some(TaskKind::ShipUpgrade),
            "ship_repair" => Some(TaskKind::ShipRepair),
            "training" => Some(TaskKind::Training),
            "island_liberation" => Some(TaskKind::IslandLiberation),
            "boss_fight" => Some(TaskKind::BossFight),
            _ => None,
        }
    }
}

/// A time-windowed player activity. The simulation never starts or resolves
/// tasks; it only respects them (a crew with an active task sits out
/// encounters and movement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub kind: TaskKind,
    pub crew_id: u64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub completed: bool,
}

impl Task {
    pub fn is_active(&self, now_ms: i64) -> bool {
        !self.completed && self.start_ms <= now_ms && now_ms < self.end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_active_window() {
        let t = Task {
            id: 1,
            kind: TaskKind::Navigation,
            crew_id: 7,
            start_ms: 100,
            end_ms: 200,
            completed: false,
        };
        assert!(!t.is_active(99));
        assert!(t.is_active(100));
        assert!(t.is_active(199));
        assert!(!t.is_active(200));
    }

    #[test]
    fn completed_task_never_active() {
        let t = Task {
            id: 1,
            kind: TaskKind::Training,
            crew_id: 7,
            start_ms: 0,
            end_ms: i64::MAX,
            completed: true,
        };
        assert!(!t.is_active(50));
    }

    #[test]
    fn task_kind_str_round_trips() {
        for k in [
            TaskKind::Navigation,
            TaskKind::ShipUpgrade,
            TaskKind::ShipRepair,
            TaskKind::Training,
            TaskKind::IslandLiberation,
            TaskKind::BossFight,
        ] {
            assert_eq!(TaskKind::parse(k.as_str()), Some(k));
        }
    }
}
