use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::player::Position;
use crate::optimizer::pool::SlotInstance;

/// One selected roster slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub projected_points: f64,
    pub salary: u32,
}

impl From<&SlotInstance> for LineupEntry {
    fn from(slot: &SlotInstance) -> Self {
        Self {
            player_id: slot.player_id.clone(),
            name: slot.name.clone(),
            position: slot.position,
            projected_points: slot.projected_points,
            salary: slot.salary,
        }
    }
}

/// A feasible roster and its objective value. Entries are kept in output order:
/// PG, SG, SF, PF, C, then player id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupResult {
    pub entries: Vec<LineupEntry>,
    pub score: f64,
}

impl LineupResult {
    pub fn new(mut entries: Vec<LineupEntry>, score: f64) -> Self {
        entries.sort_by(|left, right| {
            left.position
                .cmp(&right.position)
                .then_with(|| left.player_id.cmp(&right.player_id))
        });
        Self { entries, score }
    }

    pub fn total_salary(&self) -> u32 {
        self.entries.iter().map(|entry| entry.salary).sum()
    }

    pub fn player_ids(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .map(|entry| entry.player_id.as_str())
            .collect()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.player_id == player_id)
    }

    /// Sorted, comma-joined player ids. Two lineups with the same players share a key no
    /// matter which slot each player filled.
    pub fn canonical_key(&self) -> String {
        self.player_ids().into_iter().collect::<Vec<_>>().join(",")
    }

    /// Players in `self` that `other` does not have.
    pub fn difference(&self, other: &LineupResult) -> usize {
        let theirs = other.player_ids();
        self.player_ids()
            .into_iter()
            .filter(|id| !theirs.contains(id))
            .count()
    }
}
