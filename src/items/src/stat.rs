//src/items/src/stat.rs
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Default bonus granted by every stat item.
pub const STAT_ITEM_AMOUNT: i32 = 1;

/// Which player stat an item raises.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum StatKind {
    Strength,
    Defense,
    Speed,
}

/// 属性道具：永久提升对应属性
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatItem {
    pub kind: StatKind,
    pub amount: i32,
}

impl StatItem {
    pub fn new(kind: StatKind) -> Self {
        Self {
            kind,
            amount: STAT_ITEM_AMOUNT,
        }
    }

    pub fn with_amount(kind: StatKind, amount: i32) -> Self {
        Self { kind, amount }
    }

    /// Defense items also raise the temporary shield.
    pub fn grants_shield(&self) -> bool {
        self.kind == StatKind::Defense
    }

    pub fn name(&self) -> String {
        format!("{} +{}", self.kind, self.amount)
    }
}
