// src/dungeon/src/generator.rs

use combat::{Enemy, EnemyKind, Wall};
use error::{GameError, Result};
use items::{Food, FoodKind, StatItem, StatKind};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::entity::Entity;
use crate::level::Level;
use crate::rng::DungeonRng;

/// Largest board side a level may reach, however deep the run goes.
pub const MAX_BOARD_SIDE: i32 = 1024;

/// Upper bound for every `max_*` placement count.
pub const MAX_PLACEMENTS: i32 = 4096;

/// Knobs for procedural level population.
///
/// Every `min_*`/`max_*` pair is a half-open range that is shifted up by the
/// level index before rolling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_width: i32,
    pub base_height: i32,
    /// Cells added to both axes per level.
    pub level_scale_factor: i32,
    pub min_walls: i32,
    pub max_walls: i32,
    pub wall_max_health: i32,
    pub min_food: i32,
    pub max_food: i32,
    pub min_enemies: i32,
    pub max_enemies: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_width: 5,
            base_height: 5,
            level_scale_factor: 2,
            min_walls: 6,
            max_walls: 10,
            wall_max_health: combat::constants::WALL_MAX_HEALTH,
            min_food: 3,
            max_food: 7,
            min_enemies: 1,
            max_enemies: 5,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_width < 3 || self.base_height < 3 {
            return Err(GameError::InvalidConfig(format!(
                "board must be at least 3x3, got {}x{}",
                self.base_width, self.base_height
            )));
        }
        if self.base_width > MAX_BOARD_SIDE || self.base_height > MAX_BOARD_SIDE {
            return Err(GameError::InvalidConfig(format!(
                "board may be at most {MAX_BOARD_SIDE}x{MAX_BOARD_SIDE}, got {}x{}",
                self.base_width, self.base_height
            )));
        }
        if !(0..=MAX_BOARD_SIDE).contains(&self.level_scale_factor) {
            return Err(GameError::InvalidConfig(format!(
                "level_scale_factor must be within 0..={MAX_BOARD_SIDE}"
            )));
        }
        if self.wall_max_health < 1 {
            return Err(GameError::InvalidConfig(
                "wall_max_health must be at least 1".into(),
            ));
        }
        for (name, min, max) in [
            ("walls", self.min_walls, self.max_walls),
            ("food", self.min_food, self.max_food),
            ("enemies", self.min_enemies, self.max_enemies),
        ] {
            if min < 0 || max < min || max > MAX_PLACEMENTS {
                return Err(GameError::InvalidConfig(format!(
                    "{name} range {min}..{max} is invalid"
                )));
            }
        }
        Ok(())
    }

    /// Board size for a level; both axes grow by the same amount and stop
    /// at [`MAX_BOARD_SIDE`].
    pub fn dimensions(&self, level: i32) -> (i32, i32) {
        let grow = level.saturating_mul(self.level_scale_factor);
        let side = |base: i32| base.saturating_add(grow).min(MAX_BOARD_SIDE);
        (side(self.base_width), side(self.base_height))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCount {
    pub requested: usize,
    pub placed: usize,
}

impl PlacementCount {
    pub fn is_short(&self) -> bool {
        self.placed < self.requested
    }
}

/// What the generator managed to place, for callers that want to surface
/// degraded levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub exit_placed: bool,
    pub walls: PlacementCount,
    pub food: PlacementCount,
    pub enemies: PlacementCount,
    pub missing_stat_items: Vec<StatKind>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.exit_placed
            && !self.walls.is_short()
            && !self.food.is_short()
            && !self.enemies.is_short()
            && self.missing_stat_items.is_empty()
    }
}

/// Populates a fresh grid for one level.
pub struct LevelGenerator;

impl LevelGenerator {
    /// 生成指定层级的地牢
    ///
    /// Draw order is exit, walls, food, enemies, stat items. Every step pulls
    /// from the same empty-cell pool, which is the only coupling between them.
    pub fn generate(level: i32, config: &GenerationConfig, rng: &mut DungeonRng) -> Level {
        let (width, height) = config.dimensions(level);
        let mut lvl = Level::empty(level, width, height);
        lvl.grid.reserve(crate::coord::SPAWN);

        let mut report = GenerationReport::default();

        report.exit_placed = Self::place_sampled(&mut lvl, rng, "exit", |_| Entity::Exit);
        if !report.exit_placed {
            warn!(
                "{}",
                GameError::PoolExhausted {
                    what: format!("the exit on level {level}"),
                }
            );
        }

        report.walls.requested = Self::roll_count(
            rng,
            config.min_walls.saturating_add(level),
            config.max_walls.saturating_add(level),
        );
        for _ in 0..report.walls.requested {
            let max_health = config.wall_max_health;
            if Self::place_sampled(&mut lvl, rng, "wall", |_| {
                Entity::Wall(Wall::with_max_health(max_health))
            }) {
                report.walls.placed += 1;
            }
        }

        report.food.requested = Self::roll_count(
            rng,
            config.min_food.saturating_add(level),
            config.max_food.saturating_add(level),
        );
        let food_kinds = FoodKind::all();
        for _ in 0..report.food.requested {
            if Self::place_sampled(&mut lvl, rng, "food", |rng| {
                let kind = rng.choose(&food_kinds).copied().unwrap_or(FoodKind::Ration);
                Entity::Food(Food::new(kind))
            }) {
                report.food.placed += 1;
            }
        }

        report.enemies.requested = Self::roll_count(
            rng,
            config.min_enemies.saturating_add(level),
            config.max_enemies.saturating_add(level),
        );
        let enemy_kinds = EnemyKind::all();
        for _ in 0..report.enemies.requested {
            if Self::place_sampled(&mut lvl, rng, "enemy", |rng| {
                let kind = rng.choose(&enemy_kinds).copied().unwrap_or_default();
                Entity::Enemy(Enemy::new(kind))
            }) {
                report.enemies.placed += 1;
            }
        }

        for kind in StatKind::iter() {
            let placed = Self::place_sampled(&mut lvl, rng, "stat item", |_| {
                Entity::StatItem(StatItem::new(kind))
            });
            if !placed {
                warn!(
                    "{}",
                    GameError::PoolExhausted {
                        what: format!("the {kind} item on level {level}"),
                    }
                );
                report.missing_stat_items.push(kind);
            }
        }

        debug!(
            "generated level {level} ({width}x{height}): {} walls, {} food, {} enemies, {} cells left",
            report.walls.placed,
            report.food.placed,
            report.enemies.placed,
            lvl.grid.empty_cells().len()
        );

        lvl.report = report;
        lvl
    }

    /// Half-open roll over `[min, max)`; an empty range yields `min`.
    fn roll_count(rng: &mut DungeonRng, min: i32, max: i32) -> usize {
        let min = min.max(0);
        if max <= min {
            min as usize
        } else {
            rng.random_range(min..max) as usize
        }
    }

    /// Sample a coordinate, then build the entity (which may draw from the
    /// RNG itself) and place it. Returns false once the pool is empty.
    fn place_sampled(
        lvl: &mut Level,
        rng: &mut DungeonRng,
        what: &str,
        make: impl FnOnce(&mut DungeonRng) -> Entity,
    ) -> bool {
        let Some(coord) = lvl.grid.sample_empty(rng) else {
            return false;
        };
        let entity = make(rng);
        match lvl.entities.spawn(&mut lvl.grid, entity, coord) {
            Ok(_) => true,
            Err(e) => {
                warn!("skipped {what}: {e}");
                false
            }
        }
    }
}
