use anyhow::{anyhow, Context};
use pixel_crawl::{Game, GameConfig, GameLoop, LineInput};
use std::io;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = GameConfig::from_env()
        .map_err(|e| anyhow!(error::handle_error(&e)))
        .context("Failed to load configuration")?;
    let game = Game::new(config).context("Failed to start a new game")?;
    println!("Seed: {}", game.seed());

    let stdin = io::stdin();
    let stdout = io::stdout();
    GameLoop::new(game, LineInput::new(stdin.lock()), stdout.lock())
        .run()
        .context("Game loop failed")?;
    Ok(())
}
