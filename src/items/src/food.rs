//src/items/src/food.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// 食物：走入格子时恢复饱食度，随后被消耗
#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    /// 饱食度恢复量
    pub amount: i32,
}

#[derive(Copy, Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize, EnumIter)]
pub enum FoodKind {
    Ration, // 干粮 - 标准食物
    Apple,
}

impl FoodKind {
    /// Every kind, in the order the level generator indexes them.
    pub fn all() -> Vec<FoodKind> {
        FoodKind::iter().collect()
    }

    pub fn base_amount(self) -> i32 {
        match self {
            FoodKind::Ration => 10,
            FoodKind::Apple => 5,
        }
    }
}

impl Food {
    pub fn new(kind: FoodKind) -> Self {
        Self {
            kind,
            amount: kind.base_amount(),
        }
    }

    /// Food with an explicit amount, mostly for hand-built test levels.
    pub fn with_amount(kind: FoodKind, amount: i32) -> Self {
        Self { kind, amount }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            FoodKind::Ration => "Ration",
            FoodKind::Apple => "Apple",
        }
    }
}

impl Default for Food {
    fn default() -> Self {
        Food::new(FoodKind::Ration)
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{})", self.name(), self.amount)
    }
}
