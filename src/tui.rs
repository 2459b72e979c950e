use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};
use snek3d::{Cell, Direction, GameConfig, GameController, GameError, GameObserver};

/// Sounds the host should play, in order. The terminal only has a bell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Food,
    GameOver,
}

#[derive(Debug, Default)]
pub struct Speaker {
    queue: Vec<Sound>,
}

impl Speaker {
    pub fn drain(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.queue)
    }
}

impl GameObserver for Speaker {
    fn on_food_eaten(&mut self) {
        self.queue.push(Sound::Food);
    }

    fn on_game_over(&mut self, final_length: usize) {
        info!("Snake was {} segments long", final_length);
        self.queue.push(Sound::GameOver);
    }
}

type Session = GameController<StdRng, Speaker>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Playing,
    Paused,
    GameOver,
    Exit,
}

pub struct App {
    seed: Option<u64>,
    sessions: u64,
    game: Session,
    screen: Screen,
}

impl App {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self, GameError> {
        let game = Self::new_session(config, seed, 0)?;
        Ok(App {
            seed,
            sessions: 1,
            game,
            screen: Screen::Playing,
        })
    }

    fn new_session(
        config: GameConfig,
        seed: Option<u64>,
        index: u64,
    ) -> Result<Session, GameError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_entropy(),
        };
        GameController::new(config, rng, Speaker::default())
    }

    fn restart(&mut self) -> Result<(), GameError> {
        let config = *self.game.config();
        self.game = Self::new_session(config, self.seed, self.sessions)?;
        self.sessions += 1;
        self.screen = Screen::Playing;
        Ok(())
    }

    pub fn should_exit(&self) -> bool {
        self.screen == Screen::Exit
    }

    pub fn sounds(&mut self) -> Vec<Sound> {
        self.game.observer_mut().drain()
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Result<(), GameError> {
        match (self.screen, key.code) {
            (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => self.screen = Screen::Exit,
            (Screen::Playing, KeyCode::Char(' ')) => self.screen = Screen::Paused,
            (Screen::Paused, KeyCode::Char(' ')) => self.screen = Screen::Playing,
            (Screen::GameOver, KeyCode::Char(' ')) => self.restart()?,
            (Screen::Playing, code) => {
                if let Some(direction) = direction_for(code) {
                    self.game.set_pending_direction(direction);
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn update(&mut self, elapsed: Duration) -> Result<(), GameError> {
        if self.screen != Screen::Playing {
            return Ok(());
        }
        if let Err(e) = self.game.update(elapsed) {
            error!("Stopping session: {}", e);
            return Err(e);
        }
        if !self.game.is_running() {
            self.screen = Screen::GameOver;
        }
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        let field_size = self.game.config().field_size;
        let status = format!(
            "SNEK 3D    Length: {}    Field: {}x{}",
            self.game.length(),
            field_size,
            field_size
        );

        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + length
                Constraint::Min(0),    // Board
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(status)
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        let title = match self.screen {
            Screen::Playing => "Arrows/WASD to steer, SPACE to pause",
            Screen::Paused => "Paused. Press SPACE to continue",
            Screen::GameOver | Screen::Exit => "Game over",
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner_area = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);
        frame.render_widget(Board { game: &self.game }, inner_area);

        if self.screen == Screen::GameOver {
            frame.render_widget(
                Paragraph::new(format!(
                    "GAME OVER\nYour snake was {} segments long\nPress SPACE to play again",
                    self.game.final_length().unwrap_or_else(|| self.game.length())
                ))
                .alignment(Alignment::Center)
                .style(Style::default().bold()),
                inner_area,
            );
        }
    }
}

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}

/// Each cell is two columns wide so the field looks square.
const CELL_WIDTH: u16 = 2;

struct Board<'a, R, O> {
    game: &'a GameController<R, O>,
}

impl<R: Rng, O: GameObserver> Board<'_, R, O> {
    /// Terminal position of `cell` inside `area`, +y drawn upward. `None`
    /// when the cell is off the field or past the edge of the area.
    fn screen_offset(&self, cell: Cell, area: Rect) -> Option<(u16, u16)> {
        let grid = self.game.grid();
        if !grid.is_in_bounds(cell) {
            return None;
        }
        let half = grid.size() as f32 / 2.0;
        let (x, y) = grid.to_world(cell);
        let column = u16::try_from((x + half).floor() as i64)
            .ok()?
            .checked_mul(CELL_WIDTH)?;
        let row = u16::try_from((half - y).floor() as i64).ok()?;
        if column.checked_add(CELL_WIDTH)? > area.width || row >= area.height {
            return None;
        }
        Some((area.x + column, area.y + row))
    }
}

impl<R: Rng, O: GameObserver> Widget for Board<'_, R, O> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let grid = self.game.grid();
        let paint = |buf: &mut Buffer, cell: Cell, symbol: &str, style: Style| {
            if let Some((x, y)) = self.screen_offset(cell, area) {
                buf.set_string(x, y, symbol, style);
            }
        };

        // Only the top-left corner of a field larger than the area is shown
        let columns = i32::from(area.width / CELL_WIDTH);
        let rows = i32::from(area.height);
        let last_x = grid.max().min(grid.min() + columns - 1);
        let first_y = grid.min().max(grid.max() - rows + 1);
        for y in first_y..=grid.max() {
            for x in grid.min()..=last_x {
                paint(buf, Cell::new(x, y), "· ", Style::default().fg(Color::DarkGray));
            }
        }

        paint(buf, self.game.food(), "● ", Style::default().fg(Color::LightRed));

        for cell in self.game.snake().body_cells() {
            paint(buf, cell, "  ", Style::default().bg(Color::Blue));
        }

        // A wall hit leaves the head outside the field; it is simply not drawn
        paint(
            buf,
            self.game.snake().head(),
            "  ",
            Style::default().bg(Color::Green),
        );
    }
}
