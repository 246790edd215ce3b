// src/combat/src/wall.rs

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::constants::WALL_MAX_HEALTH;

/// Destructible obstacle. Blocks its cell until worn down by strikes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub health: i32,
    pub max_health: i32,
}

impl Wall {
    pub fn new() -> Self {
        Self::with_max_health(WALL_MAX_HEALTH)
    }

    pub fn with_max_health(max_health: i32) -> Self {
        Self {
            health: max_health,
            max_health,
        }
    }

    /// One hit from crumbling; the presentation layer swaps to a cracked tile.
    pub fn is_damaged(&self) -> bool {
        self.health == 1 && self.max_health > 1
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}

impl Combatant for Wall {
    fn health(&self) -> i32 {
        self.health
    }

    fn max_health(&self) -> i32 {
        self.max_health
    }

    fn name(&self) -> &str {
        "Wall"
    }

    fn set_health(&mut self, health: i32) {
        self.health = health;
    }
}
