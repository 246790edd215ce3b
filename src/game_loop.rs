//! 游戏会话与文本循环
//!
//! [`Game`] owns the current level, the run counters, the seeded RNG and the
//! event bus, and is the only place levels are regenerated. [`GameLoop`]
//! feeds it from an [`InputSource`] and writes ASCII snapshots.

use dungeon::{Cell, Coord, DungeonRng, EntityRecord, Level, LevelGenerator, SPAWN};
use error::Result;
use hero::RunState;
use log::{info, warn};
use std::io::Write;

use crate::config::GameConfig;
use crate::event_bus::{EventBus, GameEvent};
use crate::input::{Command, InputEvent, InputSource};
use crate::turn_system::{TurnContext, TurnOutcome, TurnResolver, TurnState};

pub struct Game {
    config: GameConfig,
    rng: DungeonRng,
    level: Level,
    run: RunState,
    resolver: TurnResolver,
    bus: EventBus,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        let rng = config.rng();
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, rng: DungeonRng) -> Result<Self> {
        config.validate()?;
        let run = RunState::new(&config.run);
        let mut game = Self {
            level: Level::empty(run.level(), 0, 0),
            config,
            rng,
            run,
            resolver: TurnResolver::new(),
            bus: EventBus::new(),
        };
        info!("new run, seed {}", game.rng.seed());
        game.level = game.build_level(game.run.level());
        Ok(game)
    }

    /// Session around a prepared level. The player must already be placed.
    pub fn from_level(config: GameConfig, level: Level, run: RunState) -> Self {
        let rng = config.rng();
        Self {
            config,
            rng,
            level,
            run,
            resolver: TurnResolver::new(),
            bus: EventBus::new(),
        }
    }

    /// Resolve one command. New-game requests are honoured in every state.
    ///
    /// Events pile up on the bus until [`Game::drain_events`] is called. An
    /// embedder that never drains loses the oldest ones once the queue limit
    /// is reached.
    pub fn handle(&mut self, command: Command) -> TurnOutcome {
        let outcome = match command {
            Command::RequestNewGame => {
                self.start_new_game();
                return TurnOutcome::default();
            }
            Command::Move(dir) => {
                let mut ctx = TurnContext {
                    level: &mut self.level,
                    run: &mut self.run,
                    bus: &mut self.bus,
                };
                self.resolver.resolve_move(&mut ctx, dir)
            }
            Command::Attack => {
                let mut ctx = TurnContext {
                    level: &mut self.level,
                    run: &mut self.run,
                    bus: &mut self.bus,
                };
                self.resolver.resolve_attack(&mut ctx)
            }
        };

        if outcome.level_advance && outcome.game_over.is_none() {
            self.advance_level();
        }
        outcome
    }

    /// 重新开始：默认属性，重新生成第一层
    pub fn start_new_game(&mut self) {
        self.run = RunState::new(&self.config.run);
        self.resolver.reset();
        // 历史只记录当前这一局
        self.bus.clear_history();
        self.level = self.build_level(self.run.level());
        info!("new game started on level {}", self.run.level());
    }

    fn advance_level(&mut self) {
        let from = self.run.level();
        self.run.advance_level();
        let to = self.run.level();
        self.level = self.build_level(to);
        info!("advanced from level {from} to {to}");
        self.bus.publish(GameEvent::LevelAdvanced { from, to });
    }

    fn build_level(&mut self, depth: i32) -> Level {
        let mut level = LevelGenerator::generate(depth, &self.config.generation, &mut self.rng);
        if let Err(e) = level.spawn_player(SPAWN) {
            warn!("could not place the player on level {depth}: {e}");
        }

        let report = level.report.clone();
        let mut warnings = Vec::new();
        if !report.exit_placed {
            warnings.push("no room for the exit".to_string());
        }
        for (what, count) in [
            ("walls", report.walls),
            ("food", report.food),
            ("enemies", report.enemies),
        ] {
            if count.is_short() {
                warnings.push(format!(
                    "placed {} of {} {what}",
                    count.placed, count.requested
                ));
            }
        }
        for kind in &report.missing_stat_items {
            warnings.push(format!("no room for the {kind} item"));
        }
        for message in warnings {
            self.bus.publish(GameEvent::GenerationWarning {
                level: depth,
                message,
            });
        }
        level
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.level.grid.cell(coord)
    }

    pub fn dimensions(&self) -> (i32, i32) {
        self.level.grid.dimensions()
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player_coord(&self) -> Option<Coord> {
        self.level.player_coord()
    }

    pub fn entity_at(&self, coord: Coord) -> Option<&EntityRecord> {
        self.level.entity_at(coord)
    }

    pub fn state(&self) -> TurnState {
        self.resolver.state()
    }

    pub fn is_game_over(&self) -> bool {
        self.run.is_game_over()
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Bus access for subscribing handlers.
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.bus.drain().collect()
    }

    /// Status line followed by the board, top row first.
    pub fn snapshot(&self) -> Vec<String> {
        let run = &self.run;
        let mut lines = vec![format!(
            "Level {}  HP {}  Hunger {}  Str {}  Def {}{}  Spd {}  Turn {}",
            run.level(),
            run.health(),
            run.hunger(),
            run.strength(),
            run.defense(),
            if run.has_temporary_defense() { "*" } else { "" },
            run.speed(),
            run.turn_count()
        )];
        lines.extend(self.level.render_rows());
        lines
    }
}

const HELP: &str = "w/a/s/d move, f or space attack, n new game, q quit";

/// Text front-end: one command per input event, snapshot after each.
pub struct GameLoop<I, W> {
    pub game: Game,
    input: I,
    out: W,
}

impl<I, W> GameLoop<I, W>
where
    I: InputSource<Event = InputEvent>,
    W: Write,
{
    pub fn new(game: Game, input: I, out: W) -> Self {
        Self { game, input, out }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "{HELP}")?;
        self.flush_events()?;
        self.print_snapshot()?;

        while let Some(event) = self.input.poll()? {
            match event {
                InputEvent::Quit => break,
                InputEvent::Help => writeln!(self.out, "{HELP}")?,
                InputEvent::Unrecognized(text) => {
                    writeln!(self.out, "unknown command {text:?}; {HELP}")?
                }
                InputEvent::Command(command) => {
                    self.game.handle(command);
                    self.flush_events()?;
                    self.print_snapshot()?;
                    if self.game.is_game_over() {
                        writeln!(self.out, "press n for a new game or q to quit")?;
                    }
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn flush_events(&mut self) -> anyhow::Result<()> {
        for event in self.game.drain_events() {
            if matches!(event, GameEvent::TurnCompleted { .. }) {
                continue;
            }
            writeln!(self.out, "{}", event.describe())?;
        }
        Ok(())
    }

    fn print_snapshot(&mut self) -> anyhow::Result<()> {
        for line in self.game.snapshot() {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::LoggingHandler;
    use crate::input::LineInput;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    fn seeded(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    #[test]
    fn new_game_places_player_on_spawn() {
        let game = Game::new(seeded(3)).unwrap();
        assert_eq!(game.player_coord(), Some(SPAWN));
        assert_eq!(game.dimensions(), (7, 7));
        assert_eq!(game.run().level(), 1);
        assert_eq!(game.state(), TurnState::AwaitingPlayerInput);
    }

    #[test]
    fn same_seed_same_first_level() {
        let a = Game::new(seeded(9)).unwrap();
        let b = Game::new(seeded(9)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn new_game_request_resets_counters() {
        let mut game = Game::new(seeded(1)).unwrap();
        for _ in 0..3 {
            game.handle(Command::Move(dungeon::Direction::Up));
            game.handle(Command::Move(dungeon::Direction::Right));
        }
        game.handle(Command::RequestNewGame);
        assert_eq!(game.run(), &RunState::new(&game.config.run));
        assert_eq!(game.player_coord(), Some(SPAWN));
    }

    #[test]
    fn subscribed_handler_sees_moves() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let mut game = Game::new(seeded(4)).unwrap();
        let before = game.events().full_history().len();
        game.events()
            .subscribe_all(Box::new(LoggingHandler::new(Arc::clone(&messages))));

        game.handle(Command::Move(dungeon::Direction::Up));

        let logged = messages.lock().unwrap().clone();
        let expected: Vec<String> = game.events().full_history()[before..]
            .iter()
            .filter(|e| !matches!(e, GameEvent::TurnCompleted { .. }))
            .map(GameEvent::describe)
            .collect();
        assert_eq!(logged, expected);
    }

    #[test]
    fn new_game_starts_a_fresh_history() {
        let mut game = Game::new(seeded(2)).unwrap();
        game.handle(Command::Move(dungeon::Direction::Up));
        game.handle(Command::Move(dungeon::Direction::Right));
        game.handle(Command::RequestNewGame);

        assert!(
            game.events()
                .full_history()
                .iter()
                .all(|e| matches!(e, GameEvent::GenerationWarning { .. })),
            "old run leaked into history"
        );
    }

    #[test]
    fn loop_prints_snapshots_until_quit() {
        let game = Game::new(seeded(5)).unwrap();
        let input = LineInput::new(Cursor::new("?\nbogus\nq\nw\n"));
        let mut out = Vec::new();
        GameLoop::new(game, input, &mut out).run().unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Level 1  HP 10  Hunger 20"));
        assert!(text.contains("unknown command \"bogus\""));
        // nothing after quit is processed
        assert_eq!(text.matches("Level 1").count(), 1);
    }
}
