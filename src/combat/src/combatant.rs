// src/combat/src/combatant.rs

use serde::{Deserialize, Serialize};

/// Result of landing a hit on something with health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// Target survived with this much health left.
    Damaged { remaining: i32 },
    /// Target reached zero or below and must be removed from the grid.
    Destroyed,
}

/// 表示可以承受攻击的格子对象（敌人、墙壁）
pub trait Combatant {
    /// 获取当前生命值
    fn health(&self) -> i32;

    /// 获取最大生命值
    fn max_health(&self) -> i32;

    /// 获取名称
    fn name(&self) -> &str;

    /// 直接修改生命值
    fn set_health(&mut self, health: i32);

    /// 是否存活
    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    /// 造成伤害
    fn take_damage(&mut self, amount: i32) -> HitOutcome {
        let remaining = self.health() - amount;
        self.set_health(remaining);
        if remaining <= 0 {
            HitOutcome::Destroyed
        } else {
            HitOutcome::Damaged { remaining }
        }
    }
}
