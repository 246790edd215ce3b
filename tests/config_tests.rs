//! Loading and validating JSON configuration files.

use error::{handle_error, GameError};
use pixel_crawl::config::{CONFIG_ENV, SEED_ENV};
use pixel_crawl::{Game, GameConfig};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_fills_in_defaults() {
    let file = write_config(r#"{ "seed": 5, "generation": { "base_width": 9 }, "run": { "hunger": 30 } }"#);
    let config = GameConfig::load(file.path()).unwrap();

    assert_eq!(config.seed, Some(5));
    assert_eq!(config.generation.base_width, 9);
    assert_eq!(config.generation.base_height, 5);
    assert_eq!(config.generation.max_walls, 10);
    assert_eq!(config.run.hunger, 30);
    assert_eq!(config.run.health, 10);
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crawl.json");
    let mut config = GameConfig::default();
    config.seed = Some(99);
    config.generation.min_enemies = 0;
    config.save(&path).unwrap();

    assert_eq!(GameConfig::load(&path).unwrap(), config);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let file = write_config("{ seed: ");
    let err = GameConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, GameError::ConfigParse(_)), "{err:?}");
}

#[test]
fn missing_file_is_reported_readably() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(handle_error(&err), "Config file not found");
}

#[test]
fn unplayable_values_are_rejected() {
    let file = write_config(r#"{ "generation": { "base_height": 2 } }"#);
    assert!(matches!(
        GameConfig::load(file.path()),
        Err(GameError::InvalidConfig(_))
    ));

    let file = write_config(r#"{ "generation": { "base_width": 70000 } }"#);
    assert!(matches!(
        GameConfig::load(file.path()),
        Err(GameError::InvalidConfig(_))
    ));

    let file = write_config(r#"{ "run": { "speed": 0 } }"#);
    let err = GameConfig::load(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: speed must be at least 1, got 0");
}

#[test]
fn env_lookup_reads_file_then_applies_seed() {
    let file = write_config(r#"{ "seed": 1, "generation": { "level_scale_factor": 1 } }"#);
    let path = file.path().to_string_lossy().into_owned();
    let config = GameConfig::from_lookup(|key| match key {
        k if k == CONFIG_ENV => Some(path.clone()),
        k if k == SEED_ENV => Some("4242".into()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.seed, Some(4242));
    assert_eq!(config.generation.level_scale_factor, 1);

    let game = Game::new(config).unwrap();
    assert_eq!(game.seed(), 4242);
    assert_eq!(game.dimensions(), (6, 6));
}
