// src/hero/src/lib.rs

mod core;

// 重新导出主要类型
pub use self::core::{GameOverReason, HeroError, RunDefaults, RunState};
