//! Player commands and enemy reactions on hand-built levels.

mod helpers;

use combat::EnemyKind;
use dungeon::{find_path, Coord, Direction, Entity, SPAWN};
use helpers::{drain_event_types, enemy_coord, enemy_ids, TestLevelBuilder};
use hero::RunDefaults;
use items::{FoodKind, StatKind};
use pixel_crawl::{Command, GameEvent, TurnState};
use pretty_assertions::assert_eq;

fn wall_health(game: &pixel_crawl::Game, at: Coord) -> Option<i32> {
    match game.entity_at(at).map(|r| &r.entity) {
        Some(Entity::Wall(wall)) => Some(wall.health),
        _ => None,
    }
}

#[test]
fn fast_player_stops_at_adjacent_wall() {
    let mut game = TestLevelBuilder::new(6, 6)
        .with_run(RunDefaults {
            speed: 2,
            ..RunDefaults::default()
        })
        .with_wall(2, 1)
        .build();

    let outcome = game.handle(Command::Move(Direction::Right));

    assert!(outcome.struck_wall);
    assert_eq!(outcome.steps_taken, 0);
    assert_eq!(game.player_coord(), Some(SPAWN));
    assert_eq!(wall_health(&game, Coord::new(2, 1)), Some(2));
    assert_eq!(game.run().turn_count(), 1);
    assert_eq!(game.run().hunger(), 19);
}

#[test]
fn wall_falls_on_third_strike() {
    let mut game = TestLevelBuilder::new(6, 6).with_wall(2, 1).build();
    let wall_at = Coord::new(2, 1);

    game.handle(Command::Move(Direction::Right));
    game.handle(Command::Move(Direction::Right));
    assert_eq!(wall_health(&game, wall_at), Some(1));
    assert!(!game.cell(wall_at).unwrap().passable);

    game.handle(Command::Move(Direction::Right));
    assert_eq!(wall_health(&game, wall_at), None);
    let cell = game.cell(wall_at).unwrap();
    assert!(cell.passable);
    assert!(cell.occupant.is_none());
    assert_eq!(game.player_coord(), Some(SPAWN));

    // nothing left to strike: the fourth command walks in
    let outcome = game.handle(Command::Move(Direction::Right));
    assert!(!outcome.struck_wall);
    assert_eq!(game.player_coord(), Some(wall_at));
    assert_eq!(game.run().turn_count(), 4);
}

#[test]
fn wall_events_follow_strikes() {
    let mut game = TestLevelBuilder::new(6, 6).with_wall(1, 2).build();
    for _ in 0..3 {
        game.handle(Command::Move(Direction::Up));
    }
    assert_eq!(
        drain_event_types(&mut game),
        vec![
            "WallStruck",
            "TurnCompleted",
            "WallStruck",
            "TurnCompleted",
            "WallStruck",
            "WallDestroyed",
            "TurnCompleted",
        ]
    );
}

#[test]
fn speed_two_walks_two_cells_and_eats_on_the_way() {
    let mut game = TestLevelBuilder::new(6, 6)
        .with_run(RunDefaults {
            speed: 2,
            ..RunDefaults::default()
        })
        .with_food(FoodKind::Apple, 1, 2)
        .build();

    let outcome = game.handle(Command::Move(Direction::Up));

    assert_eq!(outcome.steps_taken, 2);
    assert_eq!(game.player_coord(), Some(Coord::new(1, 3)));
    // +5 from the apple, -1 for the turn
    assert_eq!(game.run().hunger(), 24);
    assert_eq!(game.run().turn_count(), 1);
    assert!(game.entity_at(Coord::new(1, 2)).is_none());
}

#[test]
fn defense_item_shields_against_the_next_strike() {
    let mut game = TestLevelBuilder::new(6, 7)
        .with_stat(StatKind::Defense, 1, 2)
        .with_enemy(EnemyKind::Rat, 1, 4)
        .build();

    game.handle(Command::Move(Direction::Up));

    assert_eq!(game.run().defense(), 2);
    assert!(game.run().has_temporary_defense());
    let rat = enemy_ids(&game)[0];
    assert_eq!(enemy_coord(&game, rat), Some(Coord::new(1, 3)));
    assert_eq!(game.run().health(), 10);

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::PlayerDamaged {
        by: rat,
        damage: 0,
        health: 10,
    }));
}

#[test]
fn enemy_closes_in_by_one_cell() {
    let mut game = TestLevelBuilder::new(8, 8)
        .with_wall(2, 1)
        .with_enemy(EnemyKind::Gnoll, 5, 5)
        .build();
    let gnoll = enemy_ids(&game)[0];
    let start = Coord::new(5, 5);

    let path = find_path(&game.level().grid, start, SPAWN).unwrap();
    assert_eq!(path.len() as i32, start.manhattan(SPAWN));

    // striking the wall spends the turn without moving the player
    game.handle(Command::Move(Direction::Right));

    let now = enemy_coord(&game, gnoll).unwrap();
    assert!(start.is_adjacent(now));
    assert_eq!(now.manhattan(SPAWN), start.manhattan(SPAWN) - 1);
}

#[test]
fn enemies_react_in_creation_order() {
    // the rear enemy only gets the front one's cell because the front one moved first
    let mut game = TestLevelBuilder::new(7, 4)
        .with_enemy(EnemyKind::Rat, 4, 1)
        .with_enemy(EnemyKind::Rat, 5, 1)
        .build();
    let ids = enemy_ids(&game);

    game.handle(Command::Move(Direction::Right));

    assert_eq!(game.player_coord(), Some(Coord::new(2, 1)));
    assert_eq!(enemy_coord(&game, ids[0]), Some(Coord::new(3, 1)));
    assert_eq!(enemy_coord(&game, ids[1]), Some(Coord::new(4, 1)));
    assert_eq!(game.run().health(), 9);
}

#[test]
fn turn_completes_after_enemies_react() {
    let mut game = TestLevelBuilder::new(8, 8)
        .with_enemy(EnemyKind::Rat, 5, 5)
        .build();

    game.handle(Command::Move(Direction::Up));

    assert_eq!(
        drain_event_types(&mut game),
        vec!["PlayerMoved", "EnemyMoved", "TurnCompleted"]
    );
}

#[test]
fn adjacent_enemy_strikes_without_moving() {
    let mut game = TestLevelBuilder::new(6, 6)
        .with_wall(1, 2)
        .with_enemy(EnemyKind::Snake, 2, 1)
        .build();
    let snake = enemy_ids(&game)[0];

    game.handle(Command::Move(Direction::Up));

    assert_eq!(enemy_coord(&game, snake), Some(Coord::new(2, 1)));
    assert_eq!(game.run().health(), 9);
}

#[test]
fn attack_hits_and_takes_a_counter_strike() {
    let mut game = TestLevelBuilder::new(6, 6)
        .with_enemy(EnemyKind::Gnoll, 2, 1)
        .build();
    let gnoll = enemy_ids(&game)[0];

    let outcome = game.handle(Command::Attack);

    assert!(!outcome.turn_consumed);
    assert_eq!(game.level().enemy(gnoll).map(|e| e.health), Some(3));
    assert_eq!(game.run().health(), 9);
    assert_eq!(game.run().turn_count(), 0);
    assert_eq!(game.run().hunger(), 20);
    assert_eq!(drain_event_types(&mut game), vec!["EnemyStruck", "PlayerDamaged"]);
}

#[test]
fn lethal_attack_removes_the_enemy() {
    let mut game = TestLevelBuilder::new(6, 6)
        .with_run(RunDefaults {
            strength: 4,
            ..RunDefaults::default()
        })
        .with_enemy(EnemyKind::Gnoll, 1, 2)
        .build();

    game.handle(Command::Attack);

    assert!(enemy_ids(&game).is_empty());
    assert!(game.entity_at(Coord::new(1, 2)).is_none());
    assert_eq!(game.run().health(), 10);
    assert_eq!(drain_event_types(&mut game), vec!["EnemyStruck", "EnemyDied"]);
}

#[test]
fn exit_advances_level_and_keeps_stats() {
    let mut game = TestLevelBuilder::new(6, 6)
        .with_stat(StatKind::Defense, 1, 2)
        .with_exit(2, 2)
        .build();

    game.handle(Command::Move(Direction::Up));
    assert!(game.run().has_temporary_defense());
    game.drain_events();

    let outcome = game.handle(Command::Move(Direction::Right));

    assert!(outcome.level_advance);
    assert_eq!(game.run().level(), 2);
    assert_eq!(game.run().turn_count(), 2);
    assert_eq!(game.run().hunger(), 18);
    assert_eq!(game.run().defense(), 2);
    assert!(!game.run().has_temporary_defense());
    assert_eq!(game.player_coord(), Some(SPAWN));
    assert_eq!(game.dimensions(), (9, 9));
    assert_eq!(game.state(), TurnState::AwaitingPlayerInput);

    let events = game.drain_events();
    let completed = events
        .iter()
        .position(|e| matches!(e, GameEvent::TurnCompleted { .. }));
    let advanced = events
        .iter()
        .position(|e| *e == GameEvent::LevelAdvanced { from: 1, to: 2 });
    assert!(completed.is_some() && advanced.is_some());
    assert!(completed < advanced, "turn closed after the advance: {events:?}");
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyMoved { .. } | GameEvent::PlayerDamaged { .. })),
        "new level enemies reacted: {events:?}"
    );
}
