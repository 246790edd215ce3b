//src/items/src/lib.rs

use serde::{Deserialize, Serialize};

pub use crate::food::{Food, FoodKind};
pub use crate::stat::{StatItem, StatKind};

pub mod food;
pub mod stat;

/// 可拾取物品（玩家走入格子时触发）
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub enum Pickup {
    Food(Food),
    Stat(StatItem),
}

impl Pickup {
    pub fn name(&self) -> String {
        match self {
            Pickup::Food(food) => food.name().to_string(),
            Pickup::Stat(item) => item.name(),
        }
    }
}

impl From<Food> for Pickup {
    fn from(food: Food) -> Self {
        Pickup::Food(food)
    }
}

impl From<StatItem> for Pickup {
    fn from(item: StatItem) -> Self {
        Pickup::Stat(item)
    }
}
