// src/dungeon/src/entity.rs

use combat::{Enemy, Wall};
use error::{GameError, Result};
use items::{Food, StatItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;

use crate::coord::Coord;
use crate::grid::Grid;

/// Stable handle for an entity within one level.
///
/// Ids grow monotonically, so ordering by id is creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// 格子对象（封闭的标签枚举）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Wall(Wall),
    Food(Food),
    StatItem(StatItem),
    Exit,
    Enemy(Enemy),
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EntityKind {
    Wall,
    Food,
    StatItem,
    Exit,
    Enemy,
    Player,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Wall(_) => EntityKind::Wall,
            Entity::Food(_) => EntityKind::Food,
            Entity::StatItem(_) => EntityKind::StatItem,
            Entity::Exit => EntityKind::Exit,
            Entity::Enemy(_) => EntityKind::Enemy,
            Entity::Player => EntityKind::Player,
        }
    }

    /// The player may step onto these; stepping in fires their effect.
    pub fn is_pickup(&self) -> bool {
        matches!(self, Entity::Food(_) | Entity::StatItem(_) | Entity::Exit)
    }

    /// Walls turn their cell impassable while they stand.
    pub fn blocks_cell(&self) -> bool {
        matches!(self, Entity::Wall(_))
    }

    /// ASCII glyph for text front-ends.
    pub fn symbol(&self) -> char {
        match self {
            Entity::Wall(wall) if wall.is_damaged() => '%',
            Entity::Wall(_) => '#',
            Entity::Food(_) => 'f',
            Entity::StatItem(item) => match item.kind {
                items::StatKind::Strength => 'S',
                items::StatKind::Defense => 'D',
                items::StatKind::Speed => 'V',
            },
            Entity::Exit => '>',
            Entity::Enemy(enemy) => enemy.kind.symbol(),
            Entity::Player => '@',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub coord: Coord,
    pub entity: Entity,
}

/// Owns every entity of a level and keeps each record's coordinate in sync
/// with the grid cell that points back at it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EntityStore {
    records: BTreeMap<EntityId, EntityRecord>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new entity. Nothing is recorded if the grid rejects the cell.
    pub fn spawn(&mut self, grid: &mut Grid, entity: Entity, coord: Coord) -> Result<EntityId> {
        let id = EntityId(self.next_id);
        grid.place(id, coord)?;
        if entity.blocks_cell() {
            if let Err(e) = grid.set_passable(coord, false) {
                grid.vacate(coord);
                return Err(e);
            }
        }
        self.next_id += 1;
        self.records.insert(id, EntityRecord { id, coord, entity });
        Ok(id)
    }

    /// Remove an entity and clear its cell. Walls leave a passable cell behind.
    pub fn despawn(&mut self, grid: &mut Grid, id: EntityId) -> Option<Entity> {
        let record = self.records.remove(&id)?;
        if grid.occupant(record.coord) == Some(id) {
            grid.vacate(record.coord);
        }
        if record.entity.blocks_cell() {
            if let Err(e) = grid.set_passable(record.coord, true) {
                log::warn!("could not reopen cell {}: {e}", record.coord);
            }
        }
        Some(record.entity)
    }

    /// Move an entity onto `to`. The old cell is only released once the new
    /// one has accepted the entity.
    pub fn relocate(&mut self, grid: &mut Grid, id: EntityId, to: Coord) -> Result<Coord> {
        let from = self
            .records
            .get(&id)
            .map(|r| r.coord)
            .ok_or_else(|| GameError::invalid_placement(to.x, to.y, format!("unknown entity {}", id.0)))?;
        grid.place(id, to)?;
        grid.vacate(from);
        if let Some(record) = self.records.get_mut(&id) {
            record.coord = to;
        }
        Ok(from)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.records.get_mut(&id).map(|r| &mut r.entity)
    }

    pub fn coord_of(&self, id: EntityId) -> Option<Coord> {
        self.records.get(&id).map(|r| r.coord)
    }

    /// Entity standing on `coord`, resolved through the grid.
    pub fn at(&self, grid: &Grid, coord: Coord) -> Option<&EntityRecord> {
        grid.occupant(coord).and_then(|id| self.records.get(&id))
    }

    /// Ids of one kind in creation order.
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.records
            .values()
            .filter(|r| r.entity.kind() == kind)
            .map(|r| r.id)
            .collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.records
            .values()
            .filter(|r| r.entity.kind() == kind)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
