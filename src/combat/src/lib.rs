// src/combat/src/lib.rs

pub mod combatant;
pub mod enemy;
pub mod wall;


pub use crate::combatant::{Combatant, HitOutcome};
pub use crate::enemy::{Enemy, EnemyKind};
pub use crate::wall::Wall;

/// Handles combat interactions between the player, enemies and walls
pub struct Combat;

/// Combat configuration constants
pub mod constants {
    /// Damage an enemy deals per strike before mitigation.
    pub const ENEMY_BASE_DAMAGE: i32 = 1;
    /// A melee strike on a wall always removes this much, whatever the strength.
    pub const WALL_STRIKE_DAMAGE: i32 = 1;
    /// Health of a freshly placed wall.
    pub const WALL_MAX_HEALTH: i32 = 3;
}

impl Combat {
    /// Player strikes a wall it tried to walk into.
    pub fn strike_wall(wall: &mut Wall) -> HitOutcome {
        wall.take_damage(constants::WALL_STRIKE_DAMAGE)
    }

    /// Player's explicit attack; damage equals the strength stat.
    pub fn strike_enemy(enemy: &mut Enemy, strength: i32) -> HitOutcome {
        enemy.take_damage(strength)
    }

    /// Damage an enemy strike inflicts on the player.
    ///
    /// The temporary shield is all-or-nothing: while it is up nothing gets
    /// through, otherwise the full base damage lands. The defense stat is not
    /// consulted.
    pub fn enemy_strike_damage(shielded: bool) -> i32 {
        if shielded {
            0
        } else {
            constants::ENEMY_BASE_DAMAGE
        }
    }
}
