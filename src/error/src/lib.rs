//! Simulation error taxonomy.
//!
//! None of these are fatal to the process. Placement and pool errors are
//! reported and the level stays playable; path and bounds failures are
//! ordinary outcomes that callers map to "no move" or "no cell".

use thiserror::Error;

/// Errors raised by the dungeon simulation and its configuration layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Target cell is occupied, impassable or off the grid.
    #[error("invalid placement at ({x}, {y}): {reason}")]
    InvalidPlacement { x: i32, y: i32, reason: String },

    /// No empty cells remain for a requested placement.
    #[error("no empty cells left to place {what}")]
    PoolExhausted { what: String },

    /// No route between two cells.
    #[error("no path from ({}, {}) to ({}, {})", from.0, from.1, to.0, to.1)]
    PathNotFound { from: (i32, i32), to: (i32, i32) },

    /// Coordinate lies outside the grid.
    #[error("coordinate ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },

    /// Configuration values that cannot produce a playable level.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO操作错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件解析错误
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl GameError {
    /// Shorthand used by the grid when a placement is rejected.
    pub fn invalid_placement(x: i32, y: i32, reason: impl Into<String>) -> Self {
        GameError::InvalidPlacement {
            x,
            y,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// 处理游戏错误并转换为用户友好的消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::PoolExhausted { what } => {
            format!("The level ran out of room for {what}; it is still playable")
        }
        GameError::InvalidConfig(msg) => format!("Configuration rejected: {msg}"),
        GameError::Io(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Config file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => {
                "No permission to read the config file".to_string()
            }
            _ => format!("IO error: {e}"),
        },
        _ => error.to_string(),
    }
}
