//! Player rank progression across completed levels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub key: String,
    /// Levels to finish inside this rank before the next one; 0 counts as 1.
    #[serde(default)]
    pub levels_required: u32,
}

impl Rank {
    pub fn new(key: &str, levels_required: u32) -> Self {
        Self {
            key: key.to_string(),
            levels_required,
        }
    }
}

/// Ranks ordered lowest to highest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankLadder {
    pub ranks: Vec<Rank>,
}

impl RankLadder {
    pub fn new(ranks: Vec<Rank>) -> Self {
        Self { ranks }
    }

    /// Rank index and progress through it (`0.0..=1.0`) after `completed` levels.
    ///
    /// The last rank absorbs everything beyond the ladder. An empty ladder
    /// yields `(0, 0.0)`.
    pub fn rank_for(&self, completed: u32) -> (usize, f32) {
        if self.ranks.is_empty() {
            return (0, 0.0);
        }

        let last = self.ranks.len() - 1;
        let mut reached = 0u32;
        for (index, rank) in self.ranks.iter().enumerate() {
            let required = rank.levels_required.max(1);
            if index == last || completed < reached.saturating_add(required) {
                let progress = completed.saturating_sub(reached) as f32 / required as f32;
                return (index, progress.clamp(0.0, 1.0));
            }
            reached = reached.saturating_add(required);
        }
        (last, 1.0)
    }

    pub fn rank(&self, index: usize) -> Option<&Rank> {
        self.ranks.get(index)
    }

    pub fn is_max_rank(&self, index: usize) -> bool {
        index + 1 >= self.ranks.len()
    }
}
