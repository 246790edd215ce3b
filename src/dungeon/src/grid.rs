// src/dungeon/src/grid.rs

use error::{GameError, Result};
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, SPAWN};
use crate::entity::EntityId;
use crate::rng::DungeonRng;

/// 表示游戏中的一个地图格子
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// 基础通行性(边界和墙壁为 false)
    pub passable: bool,
    /// 占据该格子的实体
    pub occupant: Option<EntityId>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Passable and unoccupied.
    pub fn is_walkable(&self) -> bool {
        self.passable && self.occupant.is_none()
    }
}

/// Rectangular board owning passability, occupancy and the empty-cell pool.
///
/// The pool only feeds procedural placement: coordinates leave it when they
/// are sampled or occupied and never come back, even if the cell is vacated
/// later in the level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    empty_cells: Vec<Coord>,
}

impl Grid {
    /// Border cells impassable, interior passable, pool = interior minus spawn.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        let mut empty_cells = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                cells.push(Cell {
                    passable: !border,
                    occupant: None,
                });
                let coord = Coord::new(x, y);
                if !border && coord != SPAWN {
                    empty_cells.push(coord);
                }
            }
        }

        Self {
            width,
            height,
            cells,
            empty_cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    /// 获取指定位置的格子；越界返回 None
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    pub fn is_border(&self, coord: Coord) -> bool {
        self.in_bounds(coord)
            && (coord.x == 0
                || coord.y == 0
                || coord.x == self.width - 1
                || coord.y == self.height - 1)
    }

    pub fn is_passable(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|cell| cell.passable)
    }

    /// Passable and unoccupied; false out of bounds.
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(Cell::is_walkable)
    }

    pub fn occupant(&self, coord: Coord) -> Option<EntityId> {
        self.cell(coord).and_then(|cell| cell.occupant)
    }

    /// Bind `id` to `coord`.
    ///
    /// The coordinate leaves the empty-cell pool in the same step, so no
    /// coordinate can be handed out twice.
    pub fn place(&mut self, id: EntityId, coord: Coord) -> Result<()> {
        let idx = self
            .index(coord)
            .ok_or_else(|| GameError::invalid_placement(coord.x, coord.y, "out of bounds"))?;
        let cell = &mut self.cells[idx];
        if !cell.passable {
            return Err(GameError::invalid_placement(
                coord.x,
                coord.y,
                "cell is impassable",
            ));
        }
        if let Some(other) = cell.occupant {
            return Err(GameError::invalid_placement(
                coord.x,
                coord.y,
                format!("cell already holds entity {}", other.0),
            ));
        }
        cell.occupant = Some(id);
        self.reserve(coord);
        Ok(())
    }

    /// Clear the occupant. The coordinate is not returned to the pool.
    pub fn vacate(&mut self, coord: Coord) -> Option<EntityId> {
        let idx = self.index(coord)?;
        self.cells[idx].occupant.take()
    }

    /// Toggle passability of an interior cell (walls going up or down).
    pub fn set_passable(&mut self, coord: Coord, passable: bool) -> Result<()> {
        if self.is_border(coord) {
            return Err(GameError::invalid_placement(
                coord.x,
                coord.y,
                "border cells stay impassable",
            ));
        }
        let idx = self.index(coord).ok_or(GameError::OutOfBounds {
            x: coord.x,
            y: coord.y,
        })?;
        self.cells[idx].passable = passable;
        Ok(())
    }

    /// Drop `coord` from the pool without occupying it.
    pub fn reserve(&mut self, coord: Coord) -> bool {
        if let Some(pos) = self.empty_cells.iter().position(|c| *c == coord) {
            self.empty_cells.remove(pos);
            true
        } else {
            false
        }
    }

    /// Uniform pick over the pool, removing the chosen coordinate.
    pub fn sample_empty(&mut self, rng: &mut DungeonRng) -> Option<Coord> {
        let idx = rng.index(self.empty_cells.len())?;
        Some(self.empty_cells.remove(idx))
    }

    pub fn empty_cells(&self) -> &[Coord] {
        &self.empty_cells
    }

    /// Every coordinate, row by row from the bottom.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }
}
