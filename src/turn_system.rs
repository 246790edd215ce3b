//! Turn resolution: one player command, then enemy reactions in creation
//! order.
//!
//! The resolver owns no world state. Each call borrows the current level, the
//! run counters and the event bus through a [`TurnContext`], mutates them
//! synchronously and reports what happened in a [`TurnOutcome`]. Level
//! regeneration is left to the caller, which owns the generator settings and
//! the RNG.

use combat::{Combat, HitOutcome};
use dungeon::{find_path, Coord, Direction, Entity, EntityId, Level};
use error::GameError;
use hero::{GameOverReason, RunState};
use items::Pickup;
use log::{debug, warn};

use crate::event_bus::{EventBus, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Phases a turn passes through.
pub enum TurnState {
    AwaitingPlayerInput,
    ResolvingPlayerAction,
    ResolvingEnemyReactions,
    TurnComplete,
    /// Terminal until a new game is requested.
    GameOver,
}

/// Everything a resolution step may touch.
pub struct TurnContext<'a> {
    pub level: &'a mut Level,
    pub run: &'a mut RunState,
    pub bus: &'a mut EventBus,
}

/// Summary of one resolved command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Cells the player actually moved.
    pub steps_taken: u32,
    pub struck_wall: bool,
    /// Turn counter and hunger were updated.
    pub turn_consumed: bool,
    /// Player entered the exit; the caller must build the next level.
    pub level_advance: bool,
    pub game_over: Option<GameOverReason>,
}

impl TurnOutcome {
    fn idle() -> Self {
        Self::default()
    }
}

/// What the player would run into one step ahead.
enum StepTarget {
    Open,
    Pickup(EntityId),
    Wall(EntityId),
    Blocked,
}

pub struct TurnResolver {
    state: TurnState,
}

impl Default for TurnResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnResolver {
    pub fn new() -> Self {
        Self {
            state: TurnState::AwaitingPlayerInput,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Back to awaiting input, used when a new run starts.
    pub fn reset(&mut self) {
        self.state = TurnState::AwaitingPlayerInput;
    }

    /// 处理移动命令
    ///
    /// Up to `speed` single-cell steps. Walls absorb a strike and end the
    /// move; any other obstacle ends it silently. A command that neither moves
    /// nor strikes costs nothing.
    pub fn resolve_move(&mut self, ctx: &mut TurnContext<'_>, dir: Direction) -> TurnOutcome {
        if self.state == TurnState::GameOver {
            return TurnOutcome::idle();
        }
        self.state = TurnState::ResolvingPlayerAction;

        let Some(player) = ctx.level.player() else {
            warn!("move ignored: level {} has no player", ctx.level.depth);
            self.state = TurnState::AwaitingPlayerInput;
            return TurnOutcome::idle();
        };

        let mut outcome = TurnOutcome::idle();
        for _ in 0..ctx.run.speed().max(0) {
            let Some(from) = ctx.level.entities.coord_of(player) else {
                break;
            };
            let to = from.step(dir);
            match Self::classify(ctx.level, to) {
                StepTarget::Open => {
                    if !Self::move_player(ctx, player, from, to) {
                        break;
                    }
                    outcome.steps_taken += 1;
                }
                StepTarget::Pickup(id) => {
                    let Some(entity) = ctx.level.entities.despawn(&mut ctx.level.grid, id) else {
                        break;
                    };
                    if !Self::move_player(ctx, player, from, to) {
                        break;
                    }
                    outcome.steps_taken += 1;
                    if Self::apply_entry_effect(ctx, to, entity) {
                        outcome.level_advance = true;
                        break;
                    }
                }
                StepTarget::Wall(id) => {
                    Self::strike_wall(ctx, id, to);
                    outcome.struck_wall = true;
                    break;
                }
                StepTarget::Blocked => {
                    debug!("step {dir} from {from} blocked");
                    break;
                }
            }
        }

        if outcome.steps_taken == 0 && !outcome.struck_wall {
            self.state = TurnState::AwaitingPlayerInput;
            return outcome;
        }

        ctx.run.complete_turn();
        outcome.turn_consumed = true;

        if let Some(reason) = self.check_game_over(ctx) {
            outcome.game_over = Some(reason);
            return outcome;
        }

        // 新层的敌人本回合不行动
        if !outcome.level_advance {
            self.state = TurnState::ResolvingEnemyReactions;
            outcome.game_over = self.resolve_enemy_reactions(ctx);
            if outcome.game_over.is_some() {
                return outcome;
            }
        }

        // 敌人行动之后才算本回合结束
        ctx.bus.publish(GameEvent::TurnCompleted {
            turn: ctx.run.turn_count(),
            hunger: ctx.run.hunger(),
        });
        self.state = TurnState::TurnComplete;
        debug!(
            "turn {} complete: hunger {}, health {}",
            ctx.run.turn_count(),
            ctx.run.hunger(),
            ctx.run.health()
        );
        self.state = TurnState::AwaitingPlayerInput;
        outcome
    }

    /// 处理攻击命令
    ///
    /// Hits the first enemy found Up, Down, Left, Right of the player. A
    /// survivor strikes back at once. Attacks never advance the turn.
    pub fn resolve_attack(&mut self, ctx: &mut TurnContext<'_>) -> TurnOutcome {
        if self.state == TurnState::GameOver {
            return TurnOutcome::idle();
        }
        let Some(player_at) = ctx.level.player_coord() else {
            return TurnOutcome::idle();
        };

        let target = Direction::ALL.iter().find_map(|dir| {
            let at = player_at.step(*dir);
            match ctx.level.entity_at(at) {
                Some(record) if matches!(record.entity, Entity::Enemy(_)) => Some((record.id, at)),
                _ => None,
            }
        });
        let Some((enemy_id, enemy_at)) = target else {
            debug!("attack from {player_at}: nothing adjacent");
            return TurnOutcome::idle();
        };

        self.state = TurnState::ResolvingPlayerAction;
        let strength = ctx.run.strength();
        let (hit, kind) = match ctx.level.entities.entity_mut(enemy_id) {
            Some(Entity::Enemy(enemy)) => (Combat::strike_enemy(enemy, strength), enemy.kind),
            _ => {
                self.state = TurnState::AwaitingPlayerInput;
                return TurnOutcome::idle();
            }
        };

        let mut outcome = TurnOutcome::idle();
        match hit {
            HitOutcome::Destroyed => {
                ctx.bus.publish(GameEvent::EnemyStruck {
                    enemy: enemy_id,
                    damage: strength,
                    remaining: 0,
                });
                ctx.level.entities.despawn(&mut ctx.level.grid, enemy_id);
                ctx.bus.publish(GameEvent::EnemyDied {
                    enemy: enemy_id,
                    kind,
                    at: enemy_at,
                });
            }
            HitOutcome::Damaged { remaining } => {
                ctx.bus.publish(GameEvent::EnemyStruck {
                    enemy: enemy_id,
                    damage: strength,
                    remaining,
                });
                Self::enemy_strike(ctx, enemy_id);
                if let Some(reason) = self.check_game_over(ctx) {
                    outcome.game_over = Some(reason);
                    return outcome;
                }
            }
        }

        self.state = TurnState::AwaitingPlayerInput;
        outcome
    }

    /// Every enemy, in creation order, steps toward the player and strikes if
    /// adjacent. Stops at the first strike that ends the run.
    fn resolve_enemy_reactions(&mut self, ctx: &mut TurnContext<'_>) -> Option<GameOverReason> {
        for enemy_id in ctx.level.enemies() {
            let Some(player_at) = ctx.level.player_coord() else {
                return None;
            };
            let Some(from) = ctx.level.entities.coord_of(enemy_id) else {
                continue;
            };

            match find_path(&ctx.level.grid, from, player_at) {
                Some(path) => {
                    // path[0] is re-checked here: an earlier enemy may have taken it
                    if let Some(&next) = path.first() {
                        if ctx.level.grid.is_walkable(next) {
                            match ctx.level.entities.relocate(&mut ctx.level.grid, enemy_id, next) {
                                Ok(_) => ctx.bus.publish(GameEvent::EnemyMoved {
                                    enemy: enemy_id,
                                    from,
                                    to: next,
                                }),
                                Err(e) => warn!("enemy {} could not move: {e}", enemy_id.0),
                            }
                        }
                    }
                }
                None => {
                    let err = GameError::PathNotFound {
                        from: from.into(),
                        to: player_at.into(),
                    };
                    debug!("enemy {} holds position: {err}", enemy_id.0);
                }
            }

            let at = ctx.level.entities.coord_of(enemy_id).unwrap_or(from);
            if at.is_adjacent(player_at) {
                Self::enemy_strike(ctx, enemy_id);
                if let Some(reason) = self.check_game_over(ctx) {
                    return Some(reason);
                }
            }
        }
        None
    }

    fn classify(level: &Level, to: Coord) -> StepTarget {
        if !level.grid.in_bounds(to) {
            return StepTarget::Blocked;
        }
        match level.entity_at(to) {
            None if level.grid.is_walkable(to) => StepTarget::Open,
            None => StepTarget::Blocked,
            Some(record) if record.entity.is_pickup() => StepTarget::Pickup(record.id),
            Some(record) if record.entity.blocks_cell() => StepTarget::Wall(record.id),
            Some(_) => StepTarget::Blocked,
        }
    }

    fn move_player(ctx: &mut TurnContext<'_>, player: EntityId, from: Coord, to: Coord) -> bool {
        match ctx.level.entities.relocate(&mut ctx.level.grid, player, to) {
            Ok(_) => {
                ctx.bus.publish(GameEvent::PlayerMoved { from, to });
                true
            }
            Err(e) => {
                warn!("player could not step to {to}: {e}");
                false
            }
        }
    }

    /// Fire the effect of a consumed entity. Returns true for the exit.
    fn apply_entry_effect(ctx: &mut TurnContext<'_>, at: Coord, entity: Entity) -> bool {
        let pickup = match entity {
            Entity::Food(food) => Pickup::Food(food),
            Entity::StatItem(item) => Pickup::Stat(item),
            Entity::Exit => return true,
            Entity::Wall(_) | Entity::Enemy(_) | Entity::Player => {
                warn!("{:?} cannot be entered", entity.kind());
                return false;
            }
        };
        ctx.run.consume(&pickup);
        ctx.bus.publish(GameEvent::ItemPickedUp { at, item: pickup });
        false
    }

    fn strike_wall(ctx: &mut TurnContext<'_>, id: EntityId, at: Coord) {
        let hit = match ctx.level.entities.entity_mut(id) {
            Some(Entity::Wall(wall)) => Combat::strike_wall(wall),
            _ => return,
        };
        match hit {
            HitOutcome::Damaged { remaining } => {
                ctx.bus.publish(GameEvent::WallStruck { at, remaining });
            }
            HitOutcome::Destroyed => {
                ctx.bus.publish(GameEvent::WallStruck { at, remaining: 0 });
                ctx.level.entities.despawn(&mut ctx.level.grid, id);
                ctx.bus.publish(GameEvent::WallDestroyed { at });
            }
        }
    }

    fn enemy_strike(ctx: &mut TurnContext<'_>, enemy_id: EntityId) {
        let damage = Combat::enemy_strike_damage(ctx.run.has_temporary_defense());
        ctx.run.take_damage(damage);
        ctx.bus.publish(GameEvent::PlayerDamaged {
            by: enemy_id,
            damage,
            health: ctx.run.health(),
        });
    }

    fn check_game_over(&mut self, ctx: &mut TurnContext<'_>) -> Option<GameOverReason> {
        let reason = ctx.run.check_game_over()?;
        self.state = TurnState::GameOver;
        ctx.bus.publish(GameEvent::GameOver {
            reason,
            level_reached: ctx.run.level(),
        });
        Some(reason)
    }
}
