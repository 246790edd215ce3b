// src/combat/src/enemy.rs

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::combatant::Combatant;

/// 敌人实体。位置由网格记录，这里只保存战斗属性
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
}

/// 敌人种类，只影响初始生命值
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum EnemyKind {
    Rat,
    Snake,
    Gnoll,
}

impl Default for EnemyKind {
    fn default() -> Self {
        EnemyKind::Rat
    }
}

impl EnemyKind {
    /// Every kind, in the order the level generator indexes them.
    pub fn all() -> Vec<EnemyKind> {
        EnemyKind::iter().collect()
    }

    pub fn base_health(self) -> i32 {
        match self {
            EnemyKind::Rat => 3,
            EnemyKind::Snake => 2,
            EnemyKind::Gnoll => 4,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            EnemyKind::Rat => 'r',
            EnemyKind::Snake => 's',
            EnemyKind::Gnoll => 'g',
        }
    }
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        let health = kind.base_health();
        Self {
            kind,
            health,
            max_health: health,
        }
    }
}

impl Combatant for Enemy {
    fn health(&self) -> i32 {
        self.health
    }

    fn max_health(&self) -> i32 {
        self.max_health
    }

    fn name(&self) -> &str {
        match self.kind {
            EnemyKind::Rat => "Rat",
            EnemyKind::Snake => "Snake",
            EnemyKind::Gnoll => "Gnoll",
        }
    }

    fn set_health(&mut self, health: i32) {
        self.health = health;
    }
}
