//! 事件总线，把模拟结果推给表现层
//!
//! Resolution code publishes plain events; the front-end drains the queue
//! after each command. Subscribed handlers see every event the moment it is
//! published, and a bounded history is kept for debugging and tests. The
//! queue itself is bounded too: an undrained bus keeps only the newest
//! events.

use combat::EnemyKind;
use dungeon::{Coord, EntityId};
use hero::GameOverReason;
use items::Pickup;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 事件类别 - 用于事件分组和过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Movement,
    Combat,
    Items,
    Progress,
    System,
}

/// Everything the simulation reports outward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// 玩家移动了一格
    PlayerMoved { from: Coord, to: Coord },
    /// 玩家撞墙
    WallStruck { at: Coord, remaining: i32 },
    WallDestroyed { at: Coord },
    ItemPickedUp { at: Coord, item: Pickup },
    EnemyMoved {
        enemy: EntityId,
        from: Coord,
        to: Coord,
    },
    /// Player hit an enemy that survived.
    EnemyStruck {
        enemy: EntityId,
        damage: i32,
        remaining: i32,
    },
    EnemyDied {
        enemy: EntityId,
        kind: EnemyKind,
        at: Coord,
    },
    /// `damage` is zero when the shield absorbed the strike.
    PlayerDamaged {
        by: EntityId,
        damage: i32,
        health: i32,
    },
    TurnCompleted { turn: u32, hunger: i32 },
    LevelAdvanced { from: i32, to: i32 },
    GameOver {
        reason: GameOverReason,
        level_reached: i32,
    },
    GenerationWarning { level: i32, message: String },
}

impl GameEvent {
    /// 获取事件类型的字符串表示
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::PlayerMoved { .. } => "PlayerMoved",
            GameEvent::WallStruck { .. } => "WallStruck",
            GameEvent::WallDestroyed { .. } => "WallDestroyed",
            GameEvent::ItemPickedUp { .. } => "ItemPickedUp",
            GameEvent::EnemyMoved { .. } => "EnemyMoved",
            GameEvent::EnemyStruck { .. } => "EnemyStruck",
            GameEvent::EnemyDied { .. } => "EnemyDied",
            GameEvent::PlayerDamaged { .. } => "PlayerDamaged",
            GameEvent::TurnCompleted { .. } => "TurnCompleted",
            GameEvent::LevelAdvanced { .. } => "LevelAdvanced",
            GameEvent::GameOver { .. } => "GameOver",
            GameEvent::GenerationWarning { .. } => "GenerationWarning",
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            GameEvent::PlayerMoved { .. } | GameEvent::EnemyMoved { .. } => EventCategory::Movement,
            GameEvent::WallStruck { .. }
            | GameEvent::WallDestroyed { .. }
            | GameEvent::EnemyStruck { .. }
            | GameEvent::EnemyDied { .. }
            | GameEvent::PlayerDamaged { .. } => EventCategory::Combat,
            GameEvent::ItemPickedUp { .. } => EventCategory::Items,
            GameEvent::TurnCompleted { .. }
            | GameEvent::LevelAdvanced { .. }
            | GameEvent::GameOver { .. } => EventCategory::Progress,
            GameEvent::GenerationWarning { .. } => EventCategory::System,
        }
    }

    /// One-line description for text front-ends.
    pub fn describe(&self) -> String {
        match self {
            GameEvent::PlayerMoved { to, .. } => format!("You move to {to}"),
            GameEvent::WallStruck { remaining, .. } => {
                format!("You strike the wall ({remaining} left)")
            }
            GameEvent::WallDestroyed { at } => format!("The wall at {at} crumbles"),
            GameEvent::ItemPickedUp { item, .. } => format!("You pick up {}", item.name()),
            GameEvent::EnemyMoved { to, .. } => format!("Something moves to {to}"),
            GameEvent::EnemyStruck {
                damage, remaining, ..
            } => format!("You hit for {damage} ({remaining} left)"),
            GameEvent::EnemyDied { kind, .. } => format!("The {kind} dies"),
            GameEvent::PlayerDamaged { damage: 0, .. } => "Your shield absorbs the blow".into(),
            GameEvent::PlayerDamaged { damage, health, .. } => {
                format!("You take {damage} damage ({health} health)")
            }
            GameEvent::TurnCompleted { turn, hunger } => {
                format!("Turn {turn} ends, hunger {hunger}")
            }
            GameEvent::LevelAdvanced { to, .. } => format!("You descend to level {to}"),
            GameEvent::GameOver {
                reason,
                level_reached,
            } => format!("Game over on level {level_reached}: {reason}"),
            GameEvent::GenerationWarning { message, .. } => message.clone(),
        }
    }
}

/// 事件处理器 trait
pub trait EventHandler: Send {
    /// 处理事件
    fn handle(&mut self, event: &GameEvent);

    /// 事件处理器的名称（用于调试）
    fn name(&self) -> &str;

    /// 是否应该处理此事件（事件过滤）
    fn should_handle(&self, _event: &GameEvent) -> bool {
        true
    }
}

/// 未被取走的事件最多保留这么多条
pub const DEFAULT_QUEUE_LIMIT: usize = 1024;

/// Queue plus history plus subscribers.
pub struct EventBus {
    events: VecDeque<GameEvent>,
    max_queued: usize,
    /// 注册的事件处理器（按事件类型分组）
    handlers: Vec<(&'static str, Box<dyn EventHandler>)>,
    global_handlers: Vec<Box<dyn EventHandler>>,
    history: Vec<GameEvent>,
    max_history: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_size(100)
    }

    /// 创建一个指定历史记录大小的事件总线
    pub fn with_history_size(max_history: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_queued: DEFAULT_QUEUE_LIMIT,
            handlers: Vec::new(),
            global_handlers: Vec::new(),
            history: Vec::new(),
            max_history,
        }
    }

    /// Cap on undrained events. Zero keeps nothing queued; subscribers and
    /// history still see every event.
    pub fn with_queue_limit(mut self, max_queued: usize) -> Self {
        self.max_queued = max_queued;
        while self.events.len() > max_queued {
            self.events.pop_front();
        }
        self
    }

    /// 发布事件（添加到当前队列）
    pub fn publish(&mut self, event: GameEvent) {
        self.add_to_history(event.clone());
        self.dispatch_to_handlers(&event);
        if self.max_queued == 0 {
            return;
        }
        while self.events.len() >= self.max_queued {
            let Some(dropped) = self.events.pop_front() else {
                break;
            };
            log::trace!("event queue full, dropping {}", dropped.event_type());
        }
        self.events.push_back(event);
    }

    /// 获取所有待处理事件并清空队列
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop queued events; history is kept.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 注册事件处理器（处理特定类型的事件）
    pub fn subscribe(&mut self, event_type: &'static str, handler: Box<dyn EventHandler>) {
        self.handlers.push((event_type, handler));
    }

    /// 注册全局事件处理器（处理所有事件）
    pub fn subscribe_all(&mut self, handler: Box<dyn EventHandler>) {
        self.global_handlers.push(handler);
    }

    pub fn subscriber_count(&self) -> usize {
        self.global_handlers.len() + self.handlers.len()
    }

    fn dispatch_to_handlers(&mut self, event: &GameEvent) {
        for handler in &mut self.global_handlers {
            if handler.should_handle(event) {
                handler.handle(event);
            }
        }
        let event_type = event.event_type();
        for (wanted, handler) in &mut self.handlers {
            if *wanted == event_type && handler.should_handle(event) {
                handler.handle(event);
            }
        }
    }

    fn add_to_history(&mut self, event: GameEvent) {
        if self.max_history == 0 {
            return;
        }
        if self.history.len() >= self.max_history {
            self.history.remove(0);
        }
        self.history.push(event);
    }

    /// 获取事件历史（最近的 n 个事件）
    pub fn get_history(&self, count: usize) -> &[GameEvent] {
        let start = self.history.len().saturating_sub(count);
        &self.history[start..]
    }

    pub fn full_history(&self) -> &[GameEvent] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.events.len())
            .field("history", &self.history.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// ========== 内置事件处理器 ==========

/// 日志记录器 - 把事件描述写入共享消息列表
pub struct LoggingHandler {
    messages: Arc<Mutex<Vec<String>>>,
}

impl LoggingHandler {
    pub fn new(messages: Arc<Mutex<Vec<String>>>) -> Self {
        Self { messages }
    }
}

impl EventHandler for LoggingHandler {
    fn handle(&mut self, event: &GameEvent) {
        log::debug!("event: {event:?}");
        if let Ok(mut logs) = self.messages.lock() {
            logs.push(event.describe());
        }
    }

    fn name(&self) -> &str {
        "LoggingHandler"
    }

    // 回合结束太频繁，不记录
    fn should_handle(&self, event: &GameEvent) -> bool {
        !matches!(event, GameEvent::TurnCompleted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl EventHandler for Counter {
        fn handle(&mut self, event: &GameEvent) {
            self.seen.lock().unwrap().push(event.event_type());
        }

        fn name(&self) -> &str {
            "Counter"
        }
    }

    fn moved() -> GameEvent {
        GameEvent::PlayerMoved {
            from: Coord::new(1, 1),
            to: Coord::new(1, 2),
        }
    }

    #[test]
    fn test_event_bus_drain() {
        let mut bus = EventBus::new();
        bus.publish(moved());
        bus.publish(GameEvent::TurnCompleted { turn: 1, hunger: 19 });
        assert_eq!(bus.len(), 2);

        let events: Vec<_> = bus.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(bus.is_empty());
        assert_eq!(bus.full_history().len(), 2);
    }

    #[test]
    fn test_undrained_queue_keeps_newest() {
        let mut bus = EventBus::new().with_queue_limit(2);
        for turn in 1..=4 {
            bus.publish(GameEvent::TurnCompleted { turn, hunger: 20 });
        }
        assert_eq!(bus.len(), 2);
        let turns: Vec<_> = bus
            .drain()
            .map(|e| match e {
                GameEvent::TurnCompleted { turn, .. } => turn,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(turns, vec![3, 4]);
        // history is bounded separately
        assert_eq!(bus.full_history().len(), 4);
    }

    #[test]
    fn test_zero_queue_limit_still_notifies_subscribers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new().with_queue_limit(0);
        bus.subscribe_all(Box::new(Counter {
            seen: Arc::clone(&seen),
        }));
        bus.publish(moved());
        assert!(bus.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec!["PlayerMoved"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut bus = EventBus::with_history_size(3);
        for turn in 1..=5 {
            bus.publish(GameEvent::TurnCompleted { turn, hunger: 20 });
        }
        assert_eq!(bus.full_history().len(), 3);
        assert_eq!(
            bus.get_history(1),
            &[GameEvent::TurnCompleted { turn: 5, hunger: 20 }]
        );
        bus.clear_history();
        assert!(bus.full_history().is_empty());
        assert_eq!(bus.len(), 5);
    }

    #[test]
    fn test_typed_and_global_subscribers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(
            "WallDestroyed",
            Box::new(Counter {
                seen: Arc::clone(&seen),
            }),
        );
        let messages = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe_all(Box::new(LoggingHandler::new(Arc::clone(&messages))));

        bus.publish(moved());
        bus.publish(GameEvent::WallDestroyed {
            at: Coord::new(2, 2),
        });
        bus.publish(GameEvent::TurnCompleted { turn: 1, hunger: 19 });

        assert_eq!(*seen.lock().unwrap(), vec!["WallDestroyed"]);
        assert_eq!(
            *messages.lock().unwrap(),
            vec!["You move to (1, 2)", "The wall at (2, 2) crumbles"]
        );
    }

    #[test]
    fn test_event_category() {
        assert_eq!(moved().category(), EventCategory::Movement);
        assert_eq!(
            GameEvent::GameOver {
                reason: GameOverReason::Starved,
                level_reached: 3
            }
            .category(),
            EventCategory::Progress
        );
    }
}
