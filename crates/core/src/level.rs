//! Level module - level content, board shape, random assembly and selection
//!
//! Levels are authored as JSON (`LevelDefinition`, string keys) and interned
//! into a [`Level`] whose groups and items are addressed by small ids. Only the
//! contract matters to the engine: an ordered list of groups, each an ordered
//! list of distinct items.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, WidthPolicy};
use crate::error::LevelError;
use crate::rng::SimpleRng;
use crate::types::{GroupId, ItemId, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub key: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl GroupDefinition {
    pub fn new(key: &str, items: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub groups: Vec<GroupDefinition>,
}

/// A required group with interned items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub key: String,
    pub items: Vec<ItemId>,
}

/// An interned level: ordered required groups plus the item key catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Level {
    groups: Vec<Group>,
    item_keys: Vec<String>,
}

impl Level {
    pub fn from_definition(def: &LevelDefinition) -> Self {
        let mut item_ids: HashMap<&str, ItemId> = HashMap::new();
        let mut item_keys: Vec<String> = Vec::new();
        let mut groups = Vec::with_capacity(def.groups.len());

        for (index, group_def) in def.groups.iter().enumerate() {
            let mut items = Vec::with_capacity(group_def.items.len());
            for key in &group_def.items {
                let id = *item_ids.entry(key.as_str()).or_insert_with(|| {
                    item_keys.push(key.clone());
                    ItemId((item_keys.len() - 1) as u16)
                });
                if items.contains(&id) {
                    log::warn!("group '{}': dropping duplicate item '{}'", group_def.key, key);
                    continue;
                }
                items.push(id);
            }
            if items.is_empty() {
                log::warn!("group '{}' has no items and can never be collected", group_def.key);
            }
            groups.push(Group {
                id: GroupId(index as u16),
                key: group_def.key.clone(),
                items,
            });
        }

        Self { groups, item_keys }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let def: LevelDefinition = serde_json::from_str(json)?;
        Ok(Self::from_definition(&def))
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0 as usize)
    }

    pub fn group_key(&self, id: GroupId) -> Option<&str> {
        self.group(id).map(|g| g.key.as_str())
    }

    pub fn item_key(&self, id: ItemId) -> Option<&str> {
        self.item_keys.get(id.0 as usize).map(String::as_str)
    }

    pub fn largest_group_size(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).max().unwrap_or(0)
    }
}

/// Board dimensions for one level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardShape {
    pub width: u8,
    pub height: u8,
}

impl BoardShape {
    /// Height = min(required groups, row cap); width from the tutorial width or
    /// the width policy.
    ///
    /// Widths are clamped to `1..=MAX_BOARD_WIDTH` and the row cap to
    /// `1..=MAX_BOARD_HEIGHT`, so a level with groups always gets a playable
    /// board. Only a level without groups yields height 0.
    pub fn for_level(level: &Level, config: &EngineConfig, tutorial: bool) -> Self {
        let width = if tutorial {
            config.tutorial_width
        } else {
            match config.width_policy {
                WidthPolicy::Fixed(n) => n,
                WidthPolicy::LargestGroup => {
                    level.largest_group_size().min(MAX_BOARD_WIDTH as usize) as u8
                }
            }
        };
        let cap = config.max_height.clamp(1, MAX_BOARD_HEIGHT as u8);
        let height = level.group_count().min(cap as usize) as u8;
        Self {
            width: width.clamp(1, MAX_BOARD_WIDTH),
            height,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Why an assembled random level differs from what was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyDiagnostic {
    /// The catalog holds fewer groups than the configured target.
    CatalogTooSmall { available: usize, wanted: usize },
    /// No conflict-free selection of the target size was found.
    ShortOfTarget { wanted: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomLevel {
    pub level: Level,
    pub diagnostics: Vec<AssemblyDiagnostic>,
}

/// Pick groups from `catalog` so that no two chosen groups share an item.
///
/// Each attempt shuffles the catalog and accepts groups greedily. Gives up after
/// `config.random_level_attempts` and returns the largest selection seen.
pub fn assemble_random_level(
    catalog: &[GroupDefinition],
    config: &EngineConfig,
    rng: &mut SimpleRng,
) -> RandomLevel {
    let mut diagnostics = Vec::new();
    if catalog.is_empty() {
        log::warn!("random level requested from an empty group catalog");
        return RandomLevel {
            level: Level::default(),
            diagnostics,
        };
    }

    let wanted = config.random_level_groups;
    let target = wanted.min(catalog.len());
    if catalog.len() < wanted {
        log::warn!(
            "catalog has {} groups, random level wants {}; using {}",
            catalog.len(),
            wanted,
            target
        );
        diagnostics.push(AssemblyDiagnostic::CatalogTooSmall {
            available: catalog.len(),
            wanted,
        });
    }

    let mut best: Vec<usize> = Vec::new();
    for _ in 0..config.random_level_attempts {
        let mut order: Vec<usize> = (0..catalog.len()).collect();
        rng.shuffle(&mut order);

        let mut used: HashSet<&str> = HashSet::new();
        let mut chosen = Vec::with_capacity(target);
        for idx in order {
            if chosen.len() == target {
                break;
            }
            let group = &catalog[idx];
            if group.items.iter().any(|item| used.contains(item.as_str())) {
                continue;
            }
            used.extend(group.items.iter().map(String::as_str));
            chosen.push(idx);
        }

        if chosen.len() == target {
            best = chosen;
            break;
        }
        if chosen.len() > best.len() {
            best = chosen;
        }
    }

    if best.len() < target {
        log::warn!(
            "could not assemble {} conflict-free groups in {} attempts; using {}",
            target,
            config.random_level_attempts,
            best.len()
        );
        diagnostics.push(AssemblyDiagnostic::ShortOfTarget {
            wanted: target,
            found: best.len(),
        });
    }

    let def = LevelDefinition {
        groups: best.into_iter().map(|idx| catalog[idx].clone()).collect(),
    };
    RandomLevel {
        level: Level::from_definition(&def),
        diagnostics,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    Predefined(usize),
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedLevel {
    pub level: Level,
    pub source: LevelSource,
    pub tutorial: bool,
    pub diagnostics: Vec<AssemblyDiagnostic>,
}

/// Predefined levels plus the group catalog random levels are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelBook {
    #[serde(default)]
    pub levels: Vec<LevelDefinition>,
    #[serde(default)]
    pub catalog: Vec<GroupDefinition>,
}

impl LevelBook {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Level for a player who has completed `progress_index` predefined levels.
    ///
    /// Predefined levels are played in order; past the end, random levels are
    /// assembled from the catalog. The first level is the tutorial.
    pub fn select(
        &self,
        progress_index: usize,
        config: &EngineConfig,
        rng: &mut SimpleRng,
    ) -> Result<SelectedLevel, LevelError> {
        if self.levels.is_empty() && self.catalog.is_empty() {
            return Err(LevelError::EmptyBook);
        }

        let tutorial = progress_index == 0;
        if let Some(def) = self.levels.get(progress_index) {
            log::info!("loading predefined level {}", progress_index + 1);
            return Ok(SelectedLevel {
                level: Level::from_definition(def),
                source: LevelSource::Predefined(progress_index),
                tutorial,
                diagnostics: Vec::new(),
            });
        }

        log::info!("assembling random level for level {}", progress_index + 1);
        let random = assemble_random_level(&self.catalog, config, rng);
        Ok(SelectedLevel {
            level: random.level,
            source: LevelSource::Random,
            tutorial,
            diagnostics: random.diagnostics,
        })
    }
}
