//! Terminal player (default binary).
//!
//! Usage: `rowmatch [LEVEL.json | BOOK.json]`
//!
//! Without an argument a built-in level book is played: the tutorial first,
//! then the predefined levels, then random levels from its catalog. Drag a
//! tile onto another with the mouse to swap them; `h` shows a hint, `r`
//! restarts the level with the next seed, `n` moves on once the level is
//! complete, `q` quits.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use rowmatch::core::{EngineConfig, HintTracker, Level, LevelBook, LevelSource, Resolver, SimpleRng};
use rowmatch::input::{
    handle_key_event, handle_mouse_event, should_quit, AnimationTracker, DragMediator, DropOutcome,
    PlayerCommand, PointerEvent,
};
use rowmatch::logging;
use rowmatch::term::{BoardView, Hud, TerminalRenderer, Viewport};
use rowmatch::types::GameEvent;

const FRAME_MS: u64 = 50;
/// How long collected tiles are "in flight" before their slots count them.
const SETTLE_MS: u64 = 250;

const DEMO_BOOK: &str = r#"{
  "levels": [
    {"groups": [
      {"key": "fruit", "items": ["apple", "pear", "plum"]},
      {"key": "tools", "items": ["saw", "drill", "file"]},
      {"key": "birds", "items": ["crow", "wren", "owl"]}
    ]},
    {"groups": [
      {"key": "metals", "items": ["iron", "tin", "gold", "zinc"]},
      {"key": "trees", "items": ["oak", "elm", "ash", "yew"]},
      {"key": "fish", "items": ["cod", "eel", "carp", "pike"]},
      {"key": "dances", "items": ["waltz", "tango", "jig", "reel"]}
    ]}
  ],
  "catalog": [
    {"key": "planets", "items": ["mars", "venus", "earth", "saturn"]},
    {"key": "colors", "items": ["red", "teal", "gold", "plum"]},
    {"key": "cheese", "items": ["brie", "feta", "edam", "gouda"]},
    {"key": "boats", "items": ["canoe", "yacht", "barge", "raft"]},
    {"key": "herbs", "items": ["basil", "sage", "dill", "mint"]},
    {"key": "gems", "items": ["ruby", "opal", "jade", "onyx"]},
    {"key": "stars", "items": ["vega", "sirius", "rigel", "deneb"]},
    {"key": "rivers", "items": ["nile", "seine", "volga", "indus"]}
  ]
}"#;

enum Content {
    Single(Level),
    Book(LevelBook),
}

fn load_content(path: Option<&str>) -> Result<Content> {
    let Some(path) = path else {
        return Ok(Content::Book(LevelBook::from_json(DEMO_BOOK)?));
    };
    let json = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("reading {}", path))?;
    if let Ok(book) = LevelBook::from_json(&json) {
        if !book.levels.is_empty() || !book.catalog.is_empty() {
            return Ok(Content::Book(book));
        }
    }
    let level = Level::from_json(&json).with_context(|| format!("parsing level {}", path))?;
    Ok(Content::Single(level))
}

struct Player {
    content: Content,
    config: EngineConfig,
    progress: usize,
    attempt: u32,
    resolver: Resolver,
    title: String,
    status: String,
    mediator: DragMediator,
    animations: AnimationTracker,
    hints: HintTracker,
    settle_at: Option<Instant>,
}

impl Player {
    fn new(content: Content, config: EngineConfig) -> Result<Self> {
        let placeholder = Resolver::new(&Level::default(), &config, false);
        let mut player = Self {
            content,
            config,
            progress: 0,
            attempt: 0,
            resolver: placeholder,
            title: String::new(),
            status: String::new(),
            mediator: DragMediator::new(),
            animations: AnimationTracker::new(),
            hints: HintTracker::new(),
            settle_at: None,
        };
        player.start_level()?;
        Ok(player)
    }

    fn start_level(&mut self) -> Result<()> {
        let config = EngineConfig {
            seed: self.config.seed.wrapping_add(self.attempt),
            ..self.config.clone()
        };

        let (level, tutorial, title) = match &self.content {
            Content::Single(level) => (level.clone(), false, "Level".to_string()),
            Content::Book(book) => {
                let mut rng = SimpleRng::new(config.seed ^ self.progress as u32);
                let selected = book.select(self.progress, &config, &mut rng)?;
                let kind = match selected.source {
                    LevelSource::Predefined(_) if selected.tutorial => "tutorial",
                    LevelSource::Predefined(_) => "predefined",
                    LevelSource::Random => "random",
                };
                let title = format!("Level {} ({})", self.progress + 1, kind);
                (selected.level, selected.tutorial, title)
            }
        };

        self.resolver = Resolver::new(&level, &config, tutorial);
        self.title = title;
        self.status = "drag a tile onto another to swap  |  h hint  r restart  q quit".to_string();
        self.mediator.cancel();
        self.animations.complete_all();
        self.hints.clear();
        self.settle_at = None;

        self.resolver.populate();
        self.process_events();
        Ok(())
    }

    fn process_events(&mut self) {
        let events = self.resolver.drain_events();
        if self.animations.track(&events) > 0 {
            self.settle_at = Some(Instant::now() + Duration::from_millis(SETTLE_MS));
        }

        for event in events {
            match event {
                GameEvent::GroupCollected { group, .. } => {
                    self.hints.on_group_collected(group);
                    let key = self.resolver.level().group_key(group).unwrap_or("?");
                    self.status = format!("collected {}", key);
                }
                GameEvent::SwapRejected { reason, .. } => {
                    self.status = reason.message().to_string();
                }
                GameEvent::AllGroupsCollected => {
                    self.status = "all groups collected".to_string();
                }
                GameEvent::LevelComplete => {
                    self.status = "level complete! press n for the next level".to_string();
                }
                _ => {}
            }
        }
    }

    /// Let in-flight animations land once their time is up.
    fn settle(&mut self) {
        let Some(at) = self.settle_at else {
            return;
        };
        if Instant::now() < at {
            return;
        }
        self.settle_at = None;
        for slot in self.animations.complete_all() {
            self.resolver.notify_arrived(slot);
        }
        // Slot fills only matter for drawing.
        self.resolver.drain_events();
    }

    fn on_command(&mut self, command: PlayerCommand) -> Result<()> {
        match command {
            PlayerCommand::Hint => match self.hints.request(&mut self.resolver) {
                Some(group) => {
                    let key = self.resolver.level().group_key(group).unwrap_or("?");
                    self.status = format!("hint: {} can be completed", key);
                }
                None if self.hints.active().is_some() => {
                    self.status = "collect the hinted group first".to_string();
                }
                None => self.status = "no hint available".to_string(),
            },
            PlayerCommand::Restart => {
                self.attempt = self.attempt.wrapping_add(1);
                self.start_level()?;
            }
            PlayerCommand::NextLevel if self.resolver.is_level_complete() => {
                self.progress += 1;
                self.start_level()?;
            }
            PlayerCommand::NextLevel => {}
        }
        Ok(())
    }

    fn on_pointer(&mut self, pointer: PointerEvent) {
        match pointer {
            PointerEvent::Down(world) => {
                self.mediator.drag_start(world, &self.resolver, &self.animations);
            }
            PointerEvent::Drag(world) => {
                self.mediator.drag_move(world);
            }
            PointerEvent::Up(world) => {
                if let DropOutcome::Swapped { rows_cleared, .. } =
                    self.mediator.drag_end(world, &mut self.resolver)
                {
                    log::debug!("swap cleared {} rows", rows_cleared);
                }
                self.process_events();
            }
        }
    }
}

fn main() -> Result<()> {
    logging::init_from_env(false)?;
    let path = std::env::args().nth(1);
    let content = load_content(path.as_deref())?;
    let player = Player::new(content, EngineConfig::from_env())?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, player);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut player: Player) -> Result<()> {
    let view = BoardView::default();

    loop {
        player.settle();

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        let board = player.resolver.board();
        let screen = view.layout(board.width(), board.height(), viewport);
        let hud = Hud {
            title: &player.title,
            status: &player.status,
            hint: player.hints.active(),
            drag: player.mediator.active(),
        };
        term.draw(view.render(&player.resolver, &hud, viewport))?;

        if !event::poll(Duration::from_millis(FRAME_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(command) = handle_key_event(key) {
                    player.on_command(command)?;
                }
            }
            Event::Mouse(mouse) => {
                if let Some(pointer) = handle_mouse_event(mouse, &screen, player.resolver.geometry()) {
                    player.on_pointer(pointer);
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
