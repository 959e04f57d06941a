//! Match resolver - owns one level attempt and runs the cascade
//!
//! The resolver holds the board, the spawn queue and the collection counters
//! for a single level attempt. Every mutation (initial fill, accepted swap) is
//! followed by the cascade, run synchronously to a fixed point:
//!
//! 1. **Clearing**: each completed row, in scan order, is detached from the
//!    board and assigned the next collection index.
//! 2. **Collapsing**: gravity closes the gaps column by column.
//! 3. **Refilling**: empty cells are filled in scan order while the spawn
//!    queue has tokens.
//! 4. Repeat while new rows complete; then check for level completion.
//!
//! Presentation learns about all of this through [`GameEvent`]s, which are
//! buffered in order and pulled with [`Resolver::drain_events`].

use crate::board::Board;
use crate::config::EngineConfig;
use crate::geometry::Geometry;
use crate::hint;
use crate::level::{BoardShape, Level};
use crate::rng::SimpleRng;
use crate::snapshot::GameSnapshot;
use crate::spawn::SpawnQueue;
use crate::types::{
    GameEvent, GridPos, GroupId, Phase, Point, SpawnOrigin, SwapRejection, Tile, TileId,
};

/// Result of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The tiles were exchanged and the cascade ran.
    Accepted { rows_cleared: u32 },
    /// Nothing changed; the dragged tile should snap back.
    Rejected(SwapRejection),
}

impl SwapOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SwapOutcome::Accepted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Resolver {
    level: Level,
    board: Board,
    queue: SpawnQueue,
    geometry: Geometry,
    rng: SimpleRng,
    seed: u32,
    phase: Phase,
    total_groups: u32,
    /// Rows cleared so far; also the next collection index.
    collected: u32,
    /// Arrivals counted per collection index.
    indicator_fill: Vec<u32>,
    next_tile_id: u32,
    populated: bool,
    all_collected_fired: bool,
    level_complete: bool,
    events: Vec<GameEvent>,
}

impl Resolver {
    /// Set up a level attempt: board shape, spawn queue and RNG from `config`.
    ///
    /// The board starts empty; call [`populate`](Self::populate) to deal the
    /// initial fill.
    pub fn new(level: &Level, config: &EngineConfig, tutorial: bool) -> Self {
        let shape = BoardShape::for_level(level, config, tutorial);
        let mut rng = SimpleRng::new(config.seed);
        let queue = SpawnQueue::generate(level, shape, config.max_spawn_attempts, &mut rng);
        log::debug!(
            "level attempt: {}x{} board, {} groups, {} tokens queued (seed {})",
            shape.width,
            shape.height,
            level.group_count(),
            queue.len(),
            config.seed
        );

        // empty groups never reach the board, so they are not required
        let required = level.groups().iter().filter(|g| !g.items.is_empty()).count();
        let geometry = Geometry::new(shape.width, shape.height, config.cell_size, Point::default());
        let mut resolver = Self::with_parts(
            Board::new(shape.width, shape.height),
            queue,
            required as u32,
            geometry,
            rng,
        );
        resolver.level = level.clone();
        resolver.seed = config.seed;
        resolver
    }

    /// Assemble a resolver from ready-made parts (scripted boards, tests).
    pub fn with_parts(
        board: Board,
        queue: SpawnQueue,
        total_groups: u32,
        geometry: Geometry,
        rng: SimpleRng,
    ) -> Self {
        let next_tile_id = board
            .tiles()
            .iter()
            .map(|tile| tile.id.0)
            .max()
            .map_or(1, |max| max + 1);

        Self {
            level: Level::default(),
            board,
            queue,
            geometry,
            seed: rng.seed(),
            rng,
            phase: Phase::Idle,
            total_groups,
            collected: 0,
            indicator_fill: Vec::new(),
            next_tile_id,
            populated: false,
            all_collected_fired: false,
            level_complete: false,
            events: Vec::new(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn queue(&self) -> &SpawnQueue {
        &self.queue
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a cascade is running.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn total_groups(&self) -> u32 {
        self.total_groups
    }

    /// Rows cleared so far in this attempt.
    pub fn collected_count(&self) -> u32 {
        self.collected
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Seed this attempt was generated from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Arrivals recorded for indicator slot `collection_index`.
    pub fn indicator_fill(&self, collection_index: u32) -> Option<u32> {
        self.indicator_fill.get(collection_index as usize).copied()
    }

    /// Deal the initial fill in scan order, then run the cascade.
    ///
    /// Does nothing after the first call. A level without groups completes here.
    pub fn populate(&mut self) -> u32 {
        if self.populated {
            return 0;
        }
        self.populated = true;

        self.phase = Phase::Refilling;
        let placed = self.refill(SpawnOrigin::InPlace);
        log::debug!("initial fill placed {} tiles", placed);
        self.resolve()
    }

    /// Swap the tiles at `from` and `to` and resolve the board.
    ///
    /// Mis-drags are expected: a rejected request leaves the board untouched
    /// and records a [`GameEvent::SwapRejected`].
    pub fn request_swap(&mut self, from: GridPos, to: GridPos) -> SwapOutcome {
        if let Err(reason) = self.validate_swap(from, to) {
            log::debug!("swap {:?} -> {:?} rejected: {}", from, to, reason.message());
            self.events.push(GameEvent::SwapRejected { from, to, reason });
            return SwapOutcome::Rejected(reason);
        }

        self.board.swap(from, to);
        self.board.debug_check_positions();
        if let (Some(first), Some(second)) = (self.board.get_at(to), self.board.get_at(from)) {
            self.events.push(GameEvent::TilesSwapped { first, second });
        }

        let rows_cleared = self.resolve();
        SwapOutcome::Accepted { rows_cleared }
    }

    fn validate_swap(&self, from: GridPos, to: GridPos) -> Result<(), SwapRejection> {
        if self.is_busy() {
            return Err(SwapRejection::Busy);
        }
        if self.level_complete {
            return Err(SwapRejection::LevelComplete);
        }
        if !self.board.contains(from) || !self.board.contains(to) {
            return Err(SwapRejection::OutOfBounds);
        }
        if from == to {
            return Err(SwapRejection::SameCell);
        }
        if !self.board.is_occupied(from.x, from.y) {
            return Err(SwapRejection::EmptySource);
        }
        if !self.board.is_occupied(to.x, to.y) {
            return Err(SwapRejection::EmptyTarget);
        }
        Ok(())
    }

    /// Run clear -> collapse -> refill until no row completes.
    /// Returns the number of rows cleared.
    fn resolve(&mut self) -> u32 {
        let mut cleared = 0;

        loop {
            let rows = self.board.completed_rows();
            if rows.is_empty() {
                break;
            }

            self.phase = Phase::Clearing;
            for y in rows {
                if self.collect_row(y as usize) {
                    cleared += 1;
                }
            }

            self.phase = Phase::Collapsing;
            for mv in self.board.collapse() {
                self.events.push(GameEvent::TileMoved(mv));
            }

            self.phase = Phase::Refilling;
            self.refill(SpawnOrigin::ColumnTop);
            self.board.debug_check_positions();
        }

        self.phase = Phase::Idle;
        self.check_level_complete();
        cleared
    }

    fn collect_row(&mut self, y: usize) -> bool {
        let Some(group) = self.board.row_group(y) else {
            return false;
        };
        let collection_index = self.collected;
        log::info!("row {} collected: group {} -> slot {}", y, group.0, collection_index);
        self.events.push(GameEvent::GroupCollected {
            group,
            collection_index,
        });

        for x in 0..self.board.width() as i8 {
            if let Some(tile) = self.board.clear(x, y as i8) {
                self.events.push(GameEvent::TileCollected {
                    tile,
                    collection_index,
                });
            }
        }

        self.collected += 1;
        self.indicator_fill.push(0);

        if !self.all_collected_fired && self.total_groups > 0 && self.collected >= self.total_groups
        {
            self.all_collected_fired = true;
            log::info!("all {} groups collected", self.total_groups);
            self.events.push(GameEvent::AllGroupsCollected);
        }
        true
    }

    /// Fill empty cells in scan order from the spawn queue.
    fn refill(&mut self, origin: SpawnOrigin) -> usize {
        let mut placed = 0;
        for pos in self.board.empty_cells() {
            let Some(token) = self.queue.draw() else {
                break;
            };
            let tile = Tile {
                id: TileId(self.next_tile_id),
                token,
                pos,
            };
            self.next_tile_id += 1;
            self.board.set(pos.x, pos.y, Some(tile));
            self.events.push(GameEvent::TileSpawned { tile, origin });
            placed += 1;
        }
        placed
    }

    /// Fire `LevelComplete` if the board is empty and the queue exhausted.
    ///
    /// Returns true only on the call that fires it.
    pub fn check_level_complete(&mut self) -> bool {
        if self.level_complete || !self.queue.is_empty() || !self.board.is_empty() {
            return false;
        }
        self.level_complete = true;
        log::info!("level complete after {} rows", self.collected);
        self.events.push(GameEvent::LevelComplete);
        true
    }

    /// A collected tile reached indicator slot `collection_index`.
    ///
    /// Returns the slot's arrival count, or `None` for a slot that was never
    /// assigned.
    pub fn notify_arrived(&mut self, collection_index: u32) -> Option<u32> {
        let Some(arrivals) = self.indicator_fill.get_mut(collection_index as usize) else {
            log::warn!("arrival reported for unassigned slot {}", collection_index);
            return None;
        };
        *arrivals += 1;
        let arrivals = *arrivals;
        self.events.push(GameEvent::SlotFilled {
            collection_index,
            arrivals,
        });
        Some(arrivals)
    }

    /// A group with one tile per column somewhere on the board, if any.
    ///
    /// Only answers while idle.
    pub fn find_completable_group(&mut self) -> Option<GroupId> {
        if self.is_busy() {
            return None;
        }
        hint::find_completable_group(&self.board, &mut self.rng)
    }

    /// Events recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at the pending events without consuming them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{GroupDefinition, LevelDefinition};
    use crate::types::{ItemId, Token};

    fn token(group: u16) -> Token {
        Token::new(GroupId(group), ItemId(group))
    }

    fn scripted(width: u8, height: u8, tokens: &[u16], total_groups: u32) -> Resolver {
        let queue = SpawnQueue::from_tokens(tokens.iter().map(|&g| token(g)).collect());
        let geometry = Geometry::new(width, height, 1.0, Point::default());
        Resolver::with_parts(
            Board::new(width, height),
            queue,
            total_groups,
            geometry,
            SimpleRng::new(1),
        )
    }

    fn collected_groups(events: &[GameEvent]) -> Vec<(u16, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GroupCollected {
                    group,
                    collection_index,
                } => Some((group.0, *collection_index)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_populate_fills_in_scan_order() {
        let mut resolver = scripted(2, 2, &[0, 1, 1, 0], 2);
        assert_eq!(resolver.populate(), 0);

        let board = resolver.board();
        assert_eq!(board.get(0, 0).map(|t| t.group()), Some(GroupId(0)));
        assert_eq!(board.get(1, 0).map(|t| t.group()), Some(GroupId(1)));
        assert_eq!(board.get(0, 1).map(|t| t.group()), Some(GroupId(1)));
        let spawned = resolver
            .drain_events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::TileSpawned {
                        origin: SpawnOrigin::InPlace,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(spawned, 4);
        assert!(!resolver.is_busy());
    }

    #[test]
    fn test_populate_runs_only_once() {
        let mut resolver = scripted(2, 1, &[0, 1, 0, 1], 2);
        resolver.populate();
        assert_eq!(resolver.queue().len(), 2);
        resolver.populate();
        assert_eq!(resolver.queue().len(), 2);
    }

    #[test]
    fn test_swap_completing_two_rows_collects_bottom_first() {
        let mut resolver = scripted(2, 2, &[0, 1, 0, 1], 2);
        resolver.populate();
        resolver.drain_events();

        let outcome = resolver.request_swap(GridPos::new(1, 0), GridPos::new(0, 1));
        assert_eq!(outcome, SwapOutcome::Accepted { rows_cleared: 2 });

        let events = resolver.drain_events();
        assert_eq!(collected_groups(&events), vec![(0, 0), (1, 1)]);
        assert!(events.contains(&GameEvent::AllGroupsCollected));
        assert_eq!(events.last(), Some(&GameEvent::LevelComplete));
        assert!(resolver.is_level_complete());
    }

    #[test]
    fn test_refill_can_complete_another_row() {
        // row 0: A B, row 1: B A, reserve: A A
        let mut resolver = scripted(2, 2, &[0, 1, 1, 0, 0, 0], 2);
        resolver.populate();
        resolver.drain_events();

        let outcome = resolver.request_swap(GridPos::new(1, 0), GridPos::new(1, 1));
        assert_eq!(outcome, SwapOutcome::Accepted { rows_cleared: 3 });

        let events = resolver.drain_events();
        assert_eq!(collected_groups(&events), vec![(0, 0), (1, 1), (0, 2)]);
        let refills = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::TileSpawned {
                        origin: SpawnOrigin::ColumnTop,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(refills, 2);
        assert_eq!(resolver.collected_count(), 3);
        assert!(resolver.is_level_complete());
    }

    #[test]
    fn test_tiles_collected_share_row_index() {
        let mut resolver = scripted(3, 1, &[2, 2, 2], 1);
        resolver.populate();
        let indices: Vec<u32> = resolver
            .drain_events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::TileCollected {
                    collection_index, ..
                } => Some(*collection_index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 0, 0]);
    }

    #[test]
    fn test_collapse_after_clear_reports_moves() {
        // row 0: A A (clears), row 1: B C; B and C fall one row
        let mut resolver = scripted(2, 2, &[0, 0, 1, 2], 3);
        resolver.populate();

        let events = resolver.drain_events();
        let moves: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TileMoved(mv) => Some(*mv),
                _ => None,
            })
            .collect();
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|mv| mv.from.y == 1 && mv.to.y == 0));
        assert!(!resolver.is_level_complete());
    }

    #[test]
    fn test_rejections_leave_board_untouched() {
        let mut resolver = scripted(2, 2, &[0, 1, 1], 2);
        resolver.populate();
        resolver.drain_events();
        let before = resolver.board().clone();

        let cases = [
            (GridPos::new(0, 0), GridPos::new(0, 0), SwapRejection::SameCell),
            (GridPos::new(0, 0), GridPos::new(2, 0), SwapRejection::OutOfBounds),
            (GridPos::new(0, 0), GridPos::new(1, 1), SwapRejection::EmptyTarget),
            (GridPos::new(1, 1), GridPos::new(0, 0), SwapRejection::EmptySource),
        ];
        for (from, to, reason) in cases {
            assert_eq!(resolver.request_swap(from, to), SwapOutcome::Rejected(reason));
            assert_eq!(resolver.board(), &before);
        }
        let rejected = resolver
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::SwapRejected { .. }))
            .count();
        assert_eq!(rejected, 4);
    }

    #[test]
    fn test_swap_mid_cascade_is_rejected_as_busy() {
        let mut resolver = scripted(2, 2, &[0, 1, 1, 0], 2);
        resolver.populate();
        resolver.drain_events();
        // row 0: A B, row 1: B A
        let before = resolver.board().clone();

        for phase in [Phase::Clearing, Phase::Collapsing, Phase::Refilling] {
            resolver.phase = phase;
            assert!(resolver.is_busy());
            assert_eq!(
                resolver.request_swap(GridPos::new(1, 0), GridPos::new(1, 1)),
                SwapOutcome::Rejected(SwapRejection::Busy)
            );
            assert_eq!(resolver.board(), &before);
            assert_eq!(resolver.find_completable_group(), None);
        }
        assert!(resolver.drain_events().iter().all(|e| matches!(
            e,
            GameEvent::SwapRejected {
                reason: SwapRejection::Busy,
                ..
            }
        )));

        resolver.phase = Phase::Idle;
        assert_eq!(
            resolver.request_swap(GridPos::new(1, 0), GridPos::new(1, 1)),
            SwapOutcome::Accepted { rows_cleared: 2 }
        );
    }

    #[test]
    fn test_level_complete_fires_once() {
        let mut resolver = scripted(2, 1, &[3, 3], 1);
        resolver.populate();
        assert!(resolver.is_level_complete());
        assert!(!resolver.check_level_complete());
        assert!(!resolver.check_level_complete());

        let fired = resolver
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::LevelComplete)
            .count();
        assert_eq!(fired, 1);
        assert_eq!(
            resolver.request_swap(GridPos::new(0, 0), GridPos::new(1, 0)),
            SwapOutcome::Rejected(SwapRejection::LevelComplete)
        );
    }

    #[test]
    fn test_empty_level_completes_on_populate() {
        let mut resolver = Resolver::new(&Level::default(), &EngineConfig::default(), false);
        resolver.populate();
        assert_eq!(resolver.drain_events(), vec![GameEvent::LevelComplete]);
    }

    #[test]
    fn test_arrivals_count_per_slot() {
        let mut resolver = scripted(2, 1, &[1, 1], 1);
        resolver.populate();
        resolver.drain_events();

        assert_eq!(resolver.notify_arrived(0), Some(1));
        assert_eq!(resolver.notify_arrived(0), Some(2));
        assert_eq!(resolver.notify_arrived(5), None);
        assert_eq!(resolver.indicator_fill(0), Some(2));
        assert_eq!(
            resolver.drain_events(),
            vec![
                GameEvent::SlotFilled {
                    collection_index: 0,
                    arrivals: 1
                },
                GameEvent::SlotFilled {
                    collection_index: 0,
                    arrivals: 2
                },
            ]
        );
    }

    #[test]
    fn test_new_builds_board_from_config() {
        let level = Level::from_definition(&LevelDefinition {
            groups: vec![
                GroupDefinition::new("a", &["1", "2"]),
                GroupDefinition::new("b", &["3", "4"]),
                GroupDefinition::new("c", &["5", "6"]),
            ],
        });
        let config = EngineConfig {
            seed: 77,
            ..EngineConfig::default()
        };
        let mut resolver = Resolver::new(&level, &config, false);
        assert_eq!(resolver.board().width(), 4);
        assert_eq!(resolver.board().height(), 3);
        assert_eq!(resolver.queue().len(), 12);
        assert_eq!(resolver.total_groups(), 3);

        resolver.populate();
        resolver.board().debug_check_positions();
        assert_eq!(resolver.seed(), 77);
    }

    #[test]
    fn test_hint_answers_when_idle() {
        // row 0: A B, row 1: B A; both groups have one tile per column
        let mut resolver = scripted(2, 2, &[0, 1, 1, 0], 2);
        resolver.populate();
        let hint = resolver.find_completable_group();
        assert!(matches!(hint, Some(GroupId(0)) | Some(GroupId(1))));
    }
}
