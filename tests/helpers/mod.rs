//! Builders for hand-made levels with scripted layouts.
//!
//! Generated levels are random; these put every entity exactly where a test
//! needs it and hand back a ready [`Game`].

#![allow(dead_code)]

use combat::{Enemy, EnemyKind, Wall};
use dungeon::{Coord, Entity, EntityId, Level, SPAWN};
use hero::{RunDefaults, RunState};
use items::{Food, FoodKind, StatItem, StatKind};
use pixel_crawl::{Game, GameConfig, GameEvent};

/// Builder for a single level with a player on it
pub struct TestLevelBuilder {
    level: Level,
    player_at: Coord,
    config: GameConfig,
    run: RunDefaults,
}

impl TestLevelBuilder {
    /// Open board of the given size, player on the spawn cell
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            level: Level::empty(1, width, height),
            player_at: SPAWN,
            config: GameConfig {
                seed: Some(7),
                ..GameConfig::default()
            },
            run: RunDefaults::default(),
        }
    }

    pub fn with_player_at(mut self, x: i32, y: i32) -> Self {
        self.player_at = Coord::new(x, y);
        self
    }

    pub fn with_run(mut self, run: RunDefaults) -> Self {
        self.run = run;
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_wall(self, x: i32, y: i32) -> Self {
        self.with(Entity::Wall(Wall::new()), x, y)
    }

    pub fn with_enemy(self, kind: EnemyKind, x: i32, y: i32) -> Self {
        self.with(Entity::Enemy(Enemy::new(kind)), x, y)
    }

    pub fn with_food(self, kind: FoodKind, x: i32, y: i32) -> Self {
        self.with(Entity::Food(Food::new(kind)), x, y)
    }

    pub fn with_stat(self, kind: StatKind, x: i32, y: i32) -> Self {
        self.with(Entity::StatItem(StatItem::new(kind)), x, y)
    }

    pub fn with_exit(self, x: i32, y: i32) -> Self {
        self.with(Entity::Exit, x, y)
    }

    fn with(mut self, entity: Entity, x: i32, y: i32) -> Self {
        self.level
            .entities
            .spawn(&mut self.level.grid, entity, Coord::new(x, y))
            .expect("test layout places every entity on a free cell");
        self
    }

    pub fn build(mut self) -> Game {
        self.level
            .spawn_player(self.player_at)
            .expect("player cell is free");
        // new-game requests restart from the same defaults
        self.config.run = self.run;
        let run = RunState::new(&self.config.run);
        Game::from_level(self.config, self.level, run)
    }
}

/// Enemy ids of the current level in creation order
pub fn enemy_ids(game: &Game) -> Vec<EntityId> {
    game.level().enemies()
}

pub fn enemy_coord(game: &Game, id: EntityId) -> Option<Coord> {
    game.level().entities.coord_of(id)
}

/// Events drained from the game, reduced to their type names
pub fn drain_event_types(game: &mut Game) -> Vec<&'static str> {
    game.drain_events().iter().map(GameEvent::event_type).collect()
}
