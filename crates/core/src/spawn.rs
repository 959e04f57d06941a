//! Spawn module - the token supply for one level attempt
//!
//! The spawn queue is built once per level and consumed strictly front to
//! back: first by the initial fill, then by every refill. Generation follows
//! four rules:
//!
//! - **Normalization**: every group is resized to exactly `width` items
//!   (cyclic repetition if short, a random subset if long), so each group can
//!   fill exactly one row.
//! - **Guarantee**: with two or more groups, two random groups are placed in
//!   the initial-fill portion in full; every other group contributes one random
//!   item there and keeps the rest in reserve.
//! - **Shuffling**: initial-fill and reserve portions are shuffled
//!   independently and concatenated, initial-fill first.
//! - **No pre-solved start**: a candidate whose first `width x height` tokens,
//!   laid out in scan order, already contain a single-group row is rejected and
//!   regenerated, up to a bounded number of attempts. On exhaustion the
//!   candidate with the fewest such rows is kept and the report says so.

use std::collections::VecDeque;

use crate::level::{BoardShape, Level};
use crate::rng::SimpleRng;
use crate::types::{GroupId, ItemId, Token};

/// How generation went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnReport {
    /// Candidates built (0 when there was nothing to generate).
    pub attempts: u32,
    /// Single-group rows in the accepted candidate's initial layout.
    pub precompleted_rows: usize,
}

impl SpawnReport {
    pub fn is_clean(&self) -> bool {
        self.precompleted_rows == 0
    }
}

/// Ordered backlog of tokens for the initial fill and every refill.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpawnQueue {
    tokens: VecDeque<Token>,
    initial_fill: usize,
    report: SpawnReport,
}

impl SpawnQueue {
    /// Build the queue for `level` on a board of `shape`.
    ///
    /// A level without groups, or a zero-width board, yields an empty queue.
    pub fn generate(
        level: &Level,
        shape: BoardShape,
        max_attempts: u32,
        rng: &mut SimpleRng,
    ) -> Self {
        let width = shape.width as usize;
        if level.is_empty() || width == 0 {
            return Self::default();
        }

        let normalized: Vec<(GroupId, Vec<ItemId>)> = level
            .groups()
            .iter()
            .filter(|group| !group.items.is_empty())
            .map(|group| (group.id, normalize_items(&group.items, width, rng)))
            .collect();

        let mut best: Option<(Vec<Token>, usize, usize)> = None;
        let mut attempts = 0u32;
        for _ in 0..max_attempts.max(1) {
            attempts += 1;
            let (candidate, initial_fill) = build_candidate(&normalized, rng);
            let rows = precompleted_rows(&candidate, width, shape.height as usize);
            let better = best.as_ref().map_or(true, |(_, _, best_rows)| rows < *best_rows);
            if better {
                best = Some((candidate, initial_fill, rows));
            }
            if rows == 0 {
                break;
            }
        }

        let (tokens, initial_fill, precompleted) = best.unwrap_or_default();
        if precompleted > 0 {
            log::warn!(
                "spawn queue still has {} pre-completed row(s) after {} attempts; proceeding anyway",
                precompleted,
                attempts
            );
        }

        Self {
            tokens: tokens.into(),
            initial_fill,
            report: SpawnReport {
                attempts,
                precompleted_rows: precompleted,
            },
        }
    }

    /// A queue with a fixed order, for scripted levels and tests.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let initial_fill = tokens.len();
        Self {
            tokens: tokens.into(),
            initial_fill,
            report: SpawnReport::default(),
        }
    }

    /// Take the next token, if any remain.
    pub fn draw(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Peek at the next token without removing it
    pub fn peek(&self) -> Option<Token> {
        self.tokens.front().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Size of the initial-fill portion at generation time.
    pub fn initial_fill_len(&self) -> usize {
        self.initial_fill
    }

    pub fn report(&self) -> SpawnReport {
        self.report
    }

    /// Remaining tokens, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }
}

/// Resize `items` to exactly `width` entries.
///
/// Short lists repeat cyclically; long lists keep a random `width`-sized subset.
pub fn normalize_items(items: &[ItemId], width: usize, rng: &mut SimpleRng) -> Vec<ItemId> {
    if items.is_empty() {
        return Vec::new();
    }
    if items.len() > width {
        return rng.sample(items, width);
    }
    items.iter().copied().cycle().take(width).collect()
}

/// Count rows that are entirely one group when `tokens` are laid out in scan
/// order on a `width x height` board. Rows the tokens do not fill never count.
pub fn precompleted_rows(tokens: &[Token], width: usize, height: usize) -> usize {
    if width == 0 {
        return 0;
    }
    tokens
        .chunks_exact(width)
        .take(height)
        .filter(|row| row.iter().all(|token| token.group == row[0].group))
        .count()
}

fn build_candidate(normalized: &[(GroupId, Vec<ItemId>)], rng: &mut SimpleRng) -> (Vec<Token>, usize) {
    let tokens_of = |group: GroupId, items: &[ItemId]| -> Vec<Token> {
        items.iter().map(|&item| Token::new(group, item)).collect()
    };

    if normalized.len() < 2 {
        let mut pool: Vec<Token> = normalized
            .iter()
            .flat_map(|(group, items)| tokens_of(*group, items))
            .collect();
        rng.shuffle(&mut pool);
        let len = pool.len();
        return (pool, len);
    }

    let mut order: Vec<usize> = (0..normalized.len()).collect();
    rng.shuffle(&mut order);

    let mut initial = Vec::new();
    let mut reserve = Vec::new();
    for (rank, &idx) in order.iter().enumerate() {
        let (group, items) = &normalized[idx];
        let mut tokens = tokens_of(*group, items);
        if rank >= 2 {
            let pick = rng.next_range(tokens.len() as u32) as usize;
            initial.push(tokens.swap_remove(pick));
            reserve.append(&mut tokens);
        } else {
            initial.append(&mut tokens);
        }
    }

    rng.shuffle(&mut initial);
    rng.shuffle(&mut reserve);
    let initial_fill = initial.len();
    initial.append(&mut reserve);
    (initial, initial_fill)
}
