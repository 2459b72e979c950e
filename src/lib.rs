//! Rule engine for a grid snake game.
//!
//! The engine owns the snake, the food and the movement clock. Rendering,
//! input and audio live outside and talk to it through [`GameObserver`] and
//! [`GameController::set_pending_direction`].

pub mod cell;
pub mod config;
pub mod controller;
pub mod deque;
pub mod error;
pub mod grid;
pub mod snake;

pub use cell::{Cell, Direction};
pub use config::GameConfig;
pub use controller::{
    Collision, Effect, GameController, GameObserver, GameStatus, NullObserver, TickOutcome,
};
pub use deque::Deque;
pub use error::GameError;
pub use grid::PositionGrid;
pub use snake::{Segment, SegmentId, SnakeState, TickStep};
