mod tui;

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use snek3d::config::{DEFAULT_FIELD_SIZE, DEFAULT_TICK_INTERVAL};
use snek3d::GameConfig;

use crate::tui::App;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "snek3d")]
#[command(version, about = "Grid snake played in the terminal")]
struct Cli {
    /// Side length of the square playing field, in cells
    #[arg(long, default_value_t = DEFAULT_FIELD_SIZE)]
    field_size: i32,

    /// Milliseconds between two movement steps
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
    tick_ms: u64,

    /// Seed for food and start placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log (the terminal is taken by the game)
    #[arg(long, default_value = "snek3d.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create(&cli.log_file)?,
    )?;

    info!("Starting snek3d");

    // Bad settings should fail before the terminal is taken over
    let config = GameConfig::new(cli.field_size, Duration::from_millis(cli.tick_ms));
    config.validate()?;
    let mut app = App::new(config, cli.seed)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting snek3d");
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let mut last_frame = Instant::now();

    while !app.should_exit() {
        terminal.draw(|f| app.render(f))?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key)?;
                }
            }
        }

        let now = Instant::now();
        app.update(now - last_frame)?;
        last_frame = now;

        // One bell per sound; the terminal has nothing better
        for _ in app.sounds() {
            terminal.backend_mut().write_all(b"\x07")?;
        }
        Write::flush(terminal.backend_mut())?;
    }

    Ok(())
}
