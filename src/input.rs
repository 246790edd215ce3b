//! Command surface and line-based input sources.

use dungeon::Direction;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// 玩家可以发出的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Attack,
    RequestNewGame,
}

/// Map one token to a command. Case-insensitive; surrounding whitespace is
/// ignored, except that a lone space means attack.
pub fn parse_command(input: &str) -> Option<Command> {
    if input == " " {
        return Some(Command::Attack);
    }
    let token = input.trim().to_ascii_lowercase();
    let command = match token.as_str() {
        "w" | "up" => Command::Move(Direction::Up),
        "s" | "down" => Command::Move(Direction::Down),
        "a" | "left" => Command::Move(Direction::Left),
        "d" | "right" => Command::Move(Direction::Right),
        "f" | "attack" | "space" => Command::Attack,
        "n" | "new" => Command::RequestNewGame,
        _ => return None,
    };
    Some(command)
}

/// What a front-end reads from its input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Command(Command),
    Help,
    Quit,
    Unrecognized(String),
}

impl InputEvent {
    pub fn parse(line: &str) -> Self {
        if let Some(command) = parse_command(line) {
            return InputEvent::Command(command);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => InputEvent::Quit,
            "?" | "h" | "help" => InputEvent::Help,
            other => InputEvent::Unrecognized(other.to_string()),
        }
    }
}

/// Trait for input sources
pub trait InputSource {
    type Event;

    /// Next event; `None` once the source is exhausted.
    fn poll(&mut self) -> anyhow::Result<Option<Self::Event>>;
}

/// One command per line from any buffered reader (stdin, a script file).
pub struct LineInput<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    type Event = InputEvent;

    fn poll(&mut self) -> anyhow::Result<Option<Self::Event>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            let line = self.buf.trim_end_matches(['\r', '\n']);
            // 空行跳过
            if line.is_empty() {
                continue;
            }
            return Ok(Some(InputEvent::parse(line)));
        }
    }
}
