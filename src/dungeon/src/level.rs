// src/dungeon/src/level.rs

use combat::Enemy;
use error::{GameError, Result};
use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::entity::{Entity, EntityId, EntityKind, EntityRecord, EntityStore};
use crate::generator::GenerationReport;
use crate::grid::Grid;

/// One generated floor: the board, everything standing on it, and the
/// player handle once the player has been placed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    pub depth: i32,
    pub grid: Grid,
    pub entities: EntityStore,
    pub player: Option<EntityId>,
    pub report: GenerationReport,
}

impl Level {
    /// Bare board with no entities.
    pub fn empty(depth: i32, width: i32, height: i32) -> Self {
        Self {
            depth,
            grid: Grid::new(width, height),
            entities: EntityStore::new(),
            player: None,
            report: GenerationReport::default(),
        }
    }

    /// 在指定位置放置玩家
    ///
    /// Fails if a player already exists or the cell is not walkable.
    pub fn spawn_player(&mut self, at: Coord) -> Result<EntityId> {
        if self.player.is_some() {
            return Err(GameError::invalid_placement(
                at.x,
                at.y,
                "level already has a player",
            ));
        }
        let id = self.entities.spawn(&mut self.grid, Entity::Player, at)?;
        self.player = Some(id);
        Ok(id)
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player_coord(&self) -> Option<Coord> {
        self.player.and_then(|id| self.entities.coord_of(id))
    }

    /// Coordinate of the exit, if one was placed.
    pub fn exit(&self) -> Option<Coord> {
        self.entities
            .iter()
            .find(|r| r.entity.kind() == EntityKind::Exit)
            .map(|r| r.coord)
    }

    /// Enemy ids in creation order.
    pub fn enemies(&self) -> Vec<EntityId> {
        self.entities.ids_of(EntityKind::Enemy)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        match self.entities.get(id).map(|r| &r.entity) {
            Some(Entity::Enemy(enemy)) => Some(enemy),
            _ => None,
        }
    }

    pub fn entity_at(&self, coord: Coord) -> Option<&EntityRecord> {
        self.entities.at(&self.grid, coord)
    }

    /// ASCII rows, top row first.
    pub fn render_rows(&self) -> Vec<String> {
        let (width, height) = self.grid.dimensions();
        (0..height)
            .rev()
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let c = Coord::new(x, y);
                        match self.entity_at(c) {
                            Some(record) => record.entity.symbol(),
                            None if self.grid.is_passable(c) => '.',
                            None => '#',
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
