// src/hero/src/core.rs
use items::{Food, Pickup, StatItem, StatKind};
use log::info;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeroError {
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        min: i32,
        value: i32,
    },
}

/// Starting values for a fresh run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunDefaults {
    pub starting_level: i32,
    pub hunger: i32,
    pub health: i32,
    pub strength: i32,
    pub defense: i32,
    pub speed: i32,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            starting_level: 1,
            hunger: 20,
            health: 10,
            strength: 1,
            defense: 1,
            speed: 1,
        }
    }
}

impl RunDefaults {
    pub fn validate(&self) -> Result<(), HeroError> {
        let checks = [
            ("starting_level", 0, self.starting_level),
            ("hunger", 1, self.hunger),
            ("health", 1, self.health),
            ("strength", 0, self.strength),
            ("defense", 0, self.defense),
            ("speed", 1, self.speed),
        ];
        for (field, min, value) in checks {
            if value < min {
                return Err(HeroError::BelowMinimum { field, min, value });
            }
        }
        Ok(())
    }
}

/// 游戏结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum GameOverReason {
    Starved,
    Slain,
}

/// Counters that survive level transitions and reset on a new run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    level: i32,
    hunger: i32,
    strength: i32,
    defense: i32,
    speed: i32,
    health: i32,
    has_temporary_defense: bool,
    turn_count: u32,
    game_over: Option<GameOverReason>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(&RunDefaults::default())
    }
}

impl RunState {
    pub fn new(defaults: &RunDefaults) -> Self {
        Self {
            level: defaults.starting_level,
            hunger: defaults.hunger,
            strength: defaults.strength,
            defense: defaults.defense,
            speed: defaults.speed,
            health: defaults.health,
            has_temporary_defense: false,
            turn_count: 0,
            game_over: None,
        }
    }

    /// 回合结束：计数加一，饥饿减一
    pub fn complete_turn(&mut self) {
        self.turn_count += 1;
        self.hunger -= 1;
    }

    pub fn eat(&mut self, amount: i32) {
        self.hunger += amount;
    }

    /// Permanent stat bonus. Defense also raises the temporary shield.
    pub fn apply_stat_item(&mut self, item: &StatItem) {
        match item.kind {
            StatKind::Strength => self.strength += item.amount,
            StatKind::Defense => self.defense += item.amount,
            StatKind::Speed => self.speed += item.amount,
        }
        if item.grants_shield() {
            self.has_temporary_defense = true;
        }
    }

    /// Apply the entry effect of a collectible.
    pub fn consume(&mut self, pickup: &Pickup) {
        match pickup {
            Pickup::Food(Food { amount, .. }) => self.eat(*amount),
            Pickup::Stat(item) => self.apply_stat_item(item),
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    /// Next level; the shield does not carry over.
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.has_temporary_defense = false;
    }

    /// Latch game over once hunger or health runs out. Starvation is
    /// reported first when both hit zero together.
    pub fn check_game_over(&mut self) -> Option<GameOverReason> {
        if self.game_over.is_some() {
            return self.game_over;
        }
        let reason = if self.hunger <= 0 {
            GameOverReason::Starved
        } else if self.health <= 0 {
            GameOverReason::Slain
        } else {
            return None;
        };
        info!(
            "run over on level {} after {} turns: {reason}",
            self.level, self.turn_count
        );
        self.game_over = Some(reason);
        self.game_over
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn has_temporary_defense(&self) -> bool {
        self.has_temporary_defense
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over
    }

    /// Level the run ended on, once it has ended.
    pub fn level_reached(&self) -> Option<i32> {
        self.game_over.map(|_| self.level)
    }
}
