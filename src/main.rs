//! tonnetui - a terminal-based musical tile grid.
//!
//! An infinite lattice of tiles, each mapped to a pitch. Toggling a tile
//! sounds its note (with a microtonal pitch bend under the active tuning
//! system); Conway's Game of Life can evolve the selection over time.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --soundfont path/to/font.sf2   # with audio
//! cargo run                                   # silent mode
//! ```
//!
//! Press `?` for help with key bindings.

mod app;
mod audio;
mod config;
mod grid;
mod music;
mod ui;

use app::App;
use config::Config;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Command-line options for the application.
struct CliOptions {
    /// Path to a SoundFont file; without one the app runs silent.
    soundfont: Option<PathBuf>,
    /// Path to a JSON configuration file.
    config: Option<PathBuf>,
    /// Start in hexagon tiling instead of rectangles.
    hexagon: bool,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--soundfont <path>` or `-sf <path>`: SoundFont for audio output
    /// - `--config <path>` or `-c <path>`: JSON config overriding defaults
    /// - `--hexagon` or `-x`: start with the hexagonal tiling
    /// - `--help` or `-h`: print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut soundfont: Option<PathBuf> = None;
        let mut config: Option<PathBuf> = None;
        let mut hexagon = false;
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--soundfont" | "-sf" => {
                    i += 1;
                    if i >= args.len() {
                        eprintln!("Error: --soundfont requires a path argument");
                        std::process::exit(1);
                    }
                    soundfont = Some(PathBuf::from(&args[i]));
                }
                "--config" | "-c" => {
                    i += 1;
                    if i >= args.len() {
                        eprintln!("Error: --config requires a path argument");
                        std::process::exit(1);
                    }
                    config = Some(PathBuf::from(&args[i]));
                }
                "--hexagon" | "-x" => hexagon = true,
                "--help" | "-h" => {
                    eprintln!("tonnetui - terminal musical tile grid");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS]",
                        args.first().map(String::as_str).unwrap_or("tonnetui")
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -sf, --soundfont PATH  Load a SoundFont (.sf2) for audio output");
                    eprintln!("  -c,  --config PATH     Load a JSON configuration file");
                    eprintln!("  -x,  --hexagon         Start with the hexagonal tiling");
                    eprintln!("  -h,  --help            Print this help message");
                    eprintln!();
                    eprintln!("Without a soundfont the app runs silent.");
                    std::process::exit(0);
                }
                other => {
                    // A bare .sf2 path works as a positional argument.
                    if other.ends_with(".sf2") {
                        soundfont = Some(PathBuf::from(other));
                    } else {
                        eprintln!("Unknown option: {}", other);
                        eprintln!("Use --help for usage information");
                        std::process::exit(1);
                    }
                }
            }
            i += 1;
        }

        Ok(Self {
            soundfont,
            config,
            hexagon,
        })
    }
}

/// Main entry point.
fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;

    // Initialize logging (optional, for debugging)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let (width, height) = crossterm::terminal::size().context("Failed to query terminal size")?;
    let mut app =
        App::new(config, cli.soundfont, width, height).context("Failed to initialize application")?;
    if cli.hexagon {
        app.toggle_render_mode();
    }
    if !app.audio_enabled() {
        app.set_status("No soundfont loaded; running silent (see --help)");
    }

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// The cooperative event loop: one thread drives input, the life clock, and
/// drawing. Events are polled with a short timeout so due ticks never wait
/// on input.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.update(Instant::now());

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if app.show_help {
                        // Any of the usual closers dismisses the overlay.
                        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q'))
                        {
                            app.show_help = false;
                        }
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('?') => app.show_help = true,
                        KeyCode::Char('m') => app.toggle_render_mode(),
                        KeyCode::Char('e') => app.toggle_enharmonics(),
                        KeyCode::Char('t') => app.cycle_tuning(),
                        KeyCode::Char(' ') => app.life_toggle(),
                        KeyCode::Char('s') => app.life_step(),
                        KeyCode::Char('[') => app.life_adjust_interval(false),
                        KeyCode::Char(']') => app.life_adjust_interval(true),
                        KeyCode::Char('c') => app.clear_selection(),
                        KeyCode::Char('R') => app.clear_and_reset(),
                        KeyCode::Left | KeyCode::Char('h') => app.pan_by_key(1.0, 0.0),
                        KeyCode::Right | KeyCode::Char('l') => app.pan_by_key(-1.0, 0.0),
                        KeyCode::Up | KeyCode::Char('k') => app.pan_by_key(0.0, 1.0),
                        KeyCode::Down | KeyCode::Char('j') => app.pan_by_key(0.0, -1.0),
                        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_by_key(true),
                        KeyCode::Char('-') => app.zoom_by_key(false),
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        app.on_select_press(mouse.column, mouse.row);
                    }
                    MouseEventKind::Down(MouseButton::Right)
                    | MouseEventKind::Down(MouseButton::Middle) => {
                        app.on_pan_press(mouse.column, mouse.row);
                    }
                    MouseEventKind::Drag(_) => {
                        app.on_drag(mouse.column, mouse.row);
                    }
                    MouseEventKind::Up(_) => {
                        app.on_release(mouse.column, mouse.row);
                    }
                    MouseEventKind::ScrollUp => {
                        app.on_scroll(mouse.column, mouse.row, true);
                    }
                    MouseEventKind::ScrollDown => {
                        app.on_scroll(mouse.column, mouse.row, false);
                    }
                    _ => {}
                },
                Event::Resize(_, _) => {
                    // The next render pass picks up the new grid area and
                    // refreshes the zoom limits.
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
