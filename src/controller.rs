use std::time::Duration;

use log::{debug, error, info, trace};
use rand::Rng;

use crate::cell::{Cell, Direction};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::PositionGrid;
use crate::snake::{SegmentId, SnakeState};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Running,
    GameOver,
    /// The field filled up and no food can be placed. Terminal like
    /// `GameOver`, but not the player's doing.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

/// Result of one movement step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub moved: bool,
    pub ate: bool,
    pub collision: Option<Collision>,
}

/// Notifications for the presentation side: renderer, audio, logging.
/// Every method defaults to doing nothing.
pub trait GameObserver {
    fn on_head_moved(&mut self, _cell: Cell) {}
    fn on_segment_added(&mut self, _segment: SegmentId, _cell: Cell) {}
    /// The tail handle was relocated to the front of the body.
    fn on_segment_moved(&mut self, _segment: SegmentId, _cell: Cell) {}
    fn on_food_moved(&mut self, _cell: Cell) {}
    fn on_food_eaten(&mut self) {}
    fn on_game_over(&mut self, _final_length: usize) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// One observer notification as a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    HeadMoved(Cell),
    SegmentAdded { segment: SegmentId, cell: Cell },
    SegmentMoved { segment: SegmentId, cell: Cell },
    FoodMoved(Cell),
    FoodEaten,
    GameOver { final_length: usize },
}

/// Records every notification in order.
impl GameObserver for Vec<Effect> {
    fn on_head_moved(&mut self, cell: Cell) {
        self.push(Effect::HeadMoved(cell));
    }

    fn on_segment_added(&mut self, segment: SegmentId, cell: Cell) {
        self.push(Effect::SegmentAdded { segment, cell });
    }

    fn on_segment_moved(&mut self, segment: SegmentId, cell: Cell) {
        self.push(Effect::SegmentMoved { segment, cell });
    }

    fn on_food_moved(&mut self, cell: Cell) {
        self.push(Effect::FoodMoved(cell));
    }

    fn on_food_eaten(&mut self) {
        self.push(Effect::FoodEaten);
    }

    fn on_game_over(&mut self, final_length: usize) {
        self.push(Effect::GameOver { final_length });
    }
}

/// One game session: the snake, the food, the clock and the rules tying them
/// together.
///
/// Movement and wall/self collision run once per tick. Food is checked against
/// the current head on every [`check_food`](Self::check_food) call, which the
/// host may run as often as it renders. Once the session leaves `Running`
/// nothing changes any more; start a new session for a new game.
pub struct GameController<R, O> {
    config: GameConfig,
    grid: PositionGrid,
    snake: SnakeState,
    food: Cell,
    status: GameStatus,
    final_length: Option<usize>,
    since_last_tick: Duration,
    rng: R,
    observer: O,
}

impl<R: Rng, O: GameObserver> GameController<R, O> {
    /// Fresh session: a length-one snake at a random cell, standing still,
    /// and food somewhere else.
    pub fn new(config: GameConfig, mut rng: R, observer: O) -> Result<Self, GameError> {
        config.validate()?;
        let grid = PositionGrid::new(config.field_size);
        let snake = SnakeState::new(grid.random_cell(&mut rng));
        Self::with_snake(config, snake, None, rng, observer)
    }

    /// Session starting from an explicit snake. With `food` unset the food
    /// goes to a random free cell.
    pub fn with_snake(
        config: GameConfig,
        snake: SnakeState,
        food: Option<Cell>,
        mut rng: R,
        mut observer: O,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let grid = PositionGrid::new(config.field_size);

        if !grid.is_in_bounds(snake.head()) {
            return Err(GameError::InvalidConfig(format!(
                "snake head {:?} is outside the field",
                snake.head()
            )));
        }

        let occupied = snake.occupied_cells();
        let food = match food {
            Some(cell) if occupied.contains(&cell) || !grid.is_in_bounds(cell) => {
                return Err(GameError::InvalidConfig(format!(
                    "food cannot start at {:?}",
                    cell
                )));
            }
            Some(cell) => cell,
            None => grid.random_free_cell(&occupied, &mut rng)?,
        };

        observer.on_head_moved(snake.head());
        for segment in snake.body() {
            observer.on_segment_added(segment.id, segment.cell);
        }
        observer.on_food_moved(food);

        info!(
            "Starting session on a {0}x{0} field, head at {1:?}, food at {2:?}",
            config.field_size,
            snake.head(),
            food
        );

        Ok(GameController {
            config,
            grid,
            snake,
            food,
            status: GameStatus::Running,
            final_length: None,
            since_last_tick: Duration::ZERO,
            rng,
            observer,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &PositionGrid {
        &self.grid
    }

    pub fn snake(&self) -> &SnakeState {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn length(&self) -> usize {
        self.snake.length()
    }

    /// Length at the moment the game ended or the field filled up.
    pub fn final_length(&self) -> Option<usize> {
        self.final_length
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Feeds player input. Returns whether it will take effect on the next
    /// tick.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        let accepted = self.snake.set_pending_direction(direction);
        trace!("Input {:?} accepted: {}", direction, accepted);
        accepted
    }

    /// Host adapter: advances the clock by `elapsed`, runs every tick that
    /// fell due, then checks for food. Returns the outcomes of the ticks run.
    pub fn update(&mut self, elapsed: Duration) -> Result<Vec<TickOutcome>, GameError> {
        let mut outcomes = Vec::new();
        if self.is_running() {
            self.since_last_tick += elapsed;
            while self.is_running() && self.since_last_tick >= self.config.tick_interval {
                self.since_last_tick -= self.config.tick_interval;
                outcomes.push(self.tick()?);
            }
        }
        self.check_food()?;
        Ok(outcomes)
    }

    /// One movement step, followed by the collision check and the food check.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        if !self.is_running() {
            return Ok(TickOutcome::default());
        }

        let step = self.snake.tick();
        if !step.moved() {
            return Ok(TickOutcome::default());
        }

        trace!("Head {:?} -> {:?}", step.previous_head, step.head);
        self.observer.on_head_moved(step.head);
        if let Some(segment) = step.relocated {
            self.observer.on_segment_moved(segment.id, segment.cell);
        }

        if let Some(collision) = self.detect_collision() {
            self.end_game(collision);
            return Ok(TickOutcome {
                moved: true,
                ate: false,
                collision: Some(collision),
            });
        }

        let ate = self.check_food()?;
        Ok(TickOutcome {
            moved: true,
            ate,
            collision: None,
        })
    }

    /// Eats the food if the head is on it: grows the snake by a segment at
    /// the food cell and moves the food to a free cell.
    ///
    /// When no free cell is left the meal is refused, the session moves to
    /// [`GameStatus::Exhausted`] and [`GameError::NoFreeCell`] is returned once;
    /// later calls are no-ops.
    pub fn check_food(&mut self) -> Result<bool, GameError> {
        if !self.is_running() || self.snake.head() != self.food {
            return Ok(false);
        }

        // The new segment lands on the head, so the occupied set is already
        // the post-growth one.
        let next_food = match self
            .grid
            .random_free_cell(&self.snake.occupied_cells(), &mut self.rng)
        {
            Ok(cell) => cell,
            Err(e) => {
                self.status = GameStatus::Exhausted;
                self.final_length = Some(self.snake.length());
                error!("Halting session at length {}: {}", self.snake.length(), e);
                return Err(e);
            }
        };

        self.observer.on_food_eaten();
        let segment = self.snake.grow(self.food);
        self.observer.on_segment_added(segment.id, segment.cell);

        self.food = next_food;
        self.observer.on_food_moved(self.food);

        debug!(
            "Food eaten, length now {}, food moved to {:?}",
            self.snake.length(),
            self.food
        );
        Ok(true)
    }

    fn detect_collision(&self) -> Option<Collision> {
        let head = self.snake.head();
        if !self.grid.is_in_bounds(head) {
            Some(Collision::Wall)
        } else if self.snake.collides_with_body(head) {
            Some(Collision::SelfCollision)
        } else {
            None
        }
    }

    fn end_game(&mut self, collision: Collision) {
        let final_length = self.snake.length();
        self.status = GameStatus::GameOver;
        self.final_length = Some(final_length);
        info!(
            "Game over ({:?}) at {:?}, snake was {} segments long",
            collision,
            self.snake.head(),
            final_length
        );
        self.observer.on_game_over(final_length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestGame = GameController<StdRng, Vec<Effect>>;

    fn game(snake: SnakeState, food: Cell) -> TestGame {
        GameController::with_snake(
            GameConfig::default(),
            snake,
            Some(food),
            StdRng::seed_from_u64(11),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_session() {
        let game: TestGame =
            GameController::new(GameConfig::default(), StdRng::seed_from_u64(5), Vec::new())
                .unwrap();

        assert!(game.is_running());
        assert_eq!(game.length(), 1);
        assert!(game.grid().is_in_bounds(game.snake().head()));
        assert!(game.grid().is_in_bounds(game.food()));
        assert_ne!(game.food(), game.snake().head());
        assert_eq!(
            game.observer(),
            &vec![
                Effect::HeadMoved(game.snake().head()),
                Effect::FoodMoved(game.food())
            ]
        );
    }

    #[test]
    fn test_rejects_bad_setup() {
        let snake = SnakeState::new(Cell::ORIGIN);
        let result = GameController::with_snake(
            GameConfig::with_field_size(0),
            snake.clone(),
            None,
            StdRng::seed_from_u64(1),
            NullObserver,
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));

        let result = GameController::with_snake(
            GameConfig::default(),
            snake,
            Some(Cell::ORIGIN),
            StdRng::seed_from_u64(1),
            NullObserver,
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));

        let result = GameController::with_snake(
            GameConfig::default(),
            SnakeState::new(Cell::new(7, 0)),
            None,
            StdRng::seed_from_u64(1),
            NullObserver,
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_no_room_for_food_at_start() {
        let snake = SnakeState::with_body(
            Cell::new(0, 0),
            [Cell::new(-1, 0), Cell::new(-1, -1), Cell::new(0, -1)],
            Direction::None,
        );
        let result = GameController::with_snake(
            GameConfig::with_field_size(2),
            snake,
            None,
            StdRng::seed_from_u64(1),
            NullObserver,
        );
        assert!(matches!(result, Err(GameError::NoFreeCell { .. })));
    }

    #[test]
    fn test_standing_still() {
        let mut game = game(SnakeState::new(Cell::ORIGIN), Cell::new(3, 3));
        game.observer_mut().clear();

        for _ in 0..10 {
            assert_eq!(game.tick().unwrap(), TickOutcome::default());
        }
        assert_eq!(game.snake().head(), Cell::ORIGIN);
        assert!(game.is_running());
        assert!(game.observer().is_empty());
    }

    #[test]
    fn test_tick_effects() {
        let mut game = game(
            SnakeState::with_body(Cell::new(0, 0), [Cell::new(-1, 0)], Direction::Right),
            Cell::new(3, 3),
        );
        let neck = game.snake().body().peek_front().unwrap().id;
        game.observer_mut().clear();

        let outcome = game.tick().unwrap();

        assert_eq!(
            outcome,
            TickOutcome {
                moved: true,
                ate: false,
                collision: None
            }
        );
        assert_eq!(
            game.observer(),
            &vec![
                Effect::HeadMoved(Cell::new(1, 0)),
                Effect::SegmentMoved {
                    segment: neck,
                    cell: Cell::new(0, 0)
                },
            ]
        );
    }

    #[test]
    fn test_wall_hit_ends_game() {
        let mut game = game(SnakeState::new(Cell::new(0, 2)), Cell::new(0, 0));
        game.set_pending_direction(Direction::Up);

        // Row 4 is the last one inside a size 10 field
        for _ in 0..2 {
            assert_eq!(game.tick().unwrap().collision, None);
        }
        let outcome = game.tick().unwrap();

        assert_eq!(outcome.collision, Some(Collision::Wall));
        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.final_length(), Some(1));
        assert_eq!(
            game.observer().last(),
            Some(&Effect::GameOver { final_length: 1 })
        );
    }

    #[test]
    fn test_no_ticks_after_game_over() {
        let mut game = game(SnakeState::new(Cell::new(-5, 0)), Cell::new(3, 3));
        game.set_pending_direction(Direction::Left);
        assert_eq!(game.tick().unwrap().collision, Some(Collision::Wall));
        let head = game.snake().head();
        let effects = game.observer().len();

        assert!(!game.set_pending_direction(Direction::Up));
        assert_eq!(game.tick().unwrap(), TickOutcome::default());
        assert!(game.update(Duration::from_secs(5)).unwrap().is_empty());

        assert_eq!(game.snake().head(), head);
        assert_eq!(game.observer().len(), effects);
    }

    #[test]
    fn test_eating_grows_and_moves_food() {
        let mut game = game(
            SnakeState::with_body(
                Cell::new(2, 0),
                [Cell::new(1, 0), Cell::new(0, 0)],
                Direction::Right,
            ),
            Cell::new(3, 0),
        );
        game.observer_mut().clear();

        let outcome = game.tick().unwrap();

        assert!(outcome.ate);
        assert_eq!(game.length(), 4);
        assert!(!game.snake().occupied_cells().contains(&game.food()));
        let effects = game.observer();
        assert_eq!(effects[2], Effect::FoodEaten);
        assert!(matches!(
            effects[3],
            Effect::SegmentAdded {
                cell: Cell { x: 3, y: 0 },
                ..
            }
        ));
        assert_eq!(effects[4], Effect::FoodMoved(game.food()));

        // The render pass does not eat twice
        assert!(!game.check_food().unwrap());
        assert_eq!(game.length(), 4);
    }

    #[test]
    fn test_self_collision() {
        let mut game = game(
            SnakeState::with_body(
                Cell::new(0, 0),
                [
                    Cell::new(0, -1),
                    Cell::new(1, -1),
                    Cell::new(1, 0),
                    Cell::new(1, 1),
                    Cell::new(0, 1),
                    Cell::new(-1, 1),
                ],
                Direction::Up,
            ),
            Cell::new(-4, -4),
        );

        let outcome = game.tick().unwrap();

        assert_eq!(outcome.collision, Some(Collision::SelfCollision));
        assert_eq!(game.final_length(), Some(7));
    }

    #[test]
    fn test_chasing_the_tail_is_safe() {
        let mut game = game(
            SnakeState::with_body(
                Cell::new(0, 0),
                [
                    Cell::new(0, -1),
                    Cell::new(1, -1),
                    Cell::new(1, 0),
                    Cell::new(1, 1),
                    Cell::new(0, 1),
                ],
                Direction::Up,
            ),
            Cell::new(-4, -4),
        );

        let outcome = game.tick().unwrap();

        assert_eq!(outcome.collision, None);
        assert!(game.is_running());
        assert_eq!(game.snake().head(), Cell::new(0, 1));
    }

    #[test]
    fn test_bottom_wall() {
        let mut game = game(SnakeState::new(Cell::new(1, -5)), Cell::new(3, 3));
        game.set_pending_direction(Direction::Down);

        let outcome = game.tick().unwrap();

        assert_eq!(game.snake().head(), Cell::new(1, -6));
        assert_eq!(outcome.collision, Some(Collision::Wall));
        assert_eq!(game.status(), GameStatus::GameOver);
    }

    fn eaten(game: &TestGame) -> usize {
        game.observer()
            .iter()
            .filter(|e| **e == Effect::FoodEaten)
            .count()
    }

    #[test]
    fn test_field_fills_up_during_play() {
        let mut game = GameController::with_snake(
            GameConfig::with_field_size(2),
            SnakeState::with_body(Cell::new(-1, -1), [Cell::new(-1, 0)], Direction::Right),
            Some(Cell::new(0, -1)),
            StdRng::seed_from_u64(0),
            Vec::<Effect>::new(),
        )
        .unwrap();

        // Chase the food; back-to-back meals stack new tails on the head
        let mut failure = None;
        for _ in 0..10 {
            let head = game.snake().head();
            let food = game.food();
            let towards = match (food.x - head.x, food.y - head.y) {
                (1, 0) => Direction::Right,
                (-1, 0) => Direction::Left,
                (0, -1) => Direction::Down,
                _ => Direction::Up,
            };
            game.set_pending_direction(towards);
            match game.tick() {
                Ok(outcome) => assert_eq!(outcome.collision, None),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        assert_eq!(
            failure,
            Some(GameError::NoFreeCell {
                field_size: 2,
                occupied: 4
            })
        );
        assert_eq!(game.status(), GameStatus::Exhausted);
        // The refused meal did not grow the snake
        assert_eq!(game.length(), 4);
        assert_eq!(game.final_length(), Some(4));
        assert_eq!(eaten(&game), 2);

        // Nothing moves or grows afterwards, and no game over is reported
        let head = game.snake().head();
        assert_eq!(game.check_food(), Ok(false));
        assert!(game.update(Duration::from_secs(1)).unwrap().is_empty());
        assert_eq!(game.tick(), Ok(TickOutcome::default()));
        assert!(!game.set_pending_direction(Direction::Left));
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.length(), 4);
        assert_eq!(eaten(&game), 2);
        assert!(!game
            .observer()
            .iter()
            .any(|e| matches!(e, Effect::GameOver { .. })));
    }

    #[test]
    fn test_update_runs_due_ticks() {
        let mut game = game(SnakeState::new(Cell::new(-4, 0)), Cell::new(3, 3));
        game.set_pending_direction(Direction::Right);

        assert!(game.update(Duration::from_millis(100)).unwrap().is_empty());
        assert_eq!(game.update(Duration::from_millis(200)).unwrap().len(), 1);
        assert_eq!(game.snake().head(), Cell::new(-3, 0));

        // 50 ms carried over plus 600 ms makes two more ticks
        assert_eq!(game.update(Duration::from_millis(600)).unwrap().len(), 2);
        assert_eq!(game.snake().head(), Cell::new(-1, 0));
    }

    #[test]
    fn test_update_stops_at_game_over() {
        let mut game = game(SnakeState::new(Cell::new(3, 0)), Cell::new(-3, -3));
        game.set_pending_direction(Direction::Right);

        let outcomes = game.update(Duration::from_secs(10)).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[1].collision, Some(Collision::Wall));
        assert_eq!(game.status(), GameStatus::GameOver);
    }
}
