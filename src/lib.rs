//! tonnetui - a terminal-based musical tile grid.
//!
//! This library provides the core functionality for the Tonnetz grid app:
//! coordinate geometry, pitch mapping, selection state, and the Game-of-Life
//! simulation, plus the terminal UI and audio adapters around them.

pub mod app;
pub mod audio;
pub mod config;
pub mod grid;
pub mod music;
pub mod ui;

// Re-export commonly used types
pub use app::App;
pub use config::Config;
pub use grid::{Coord, RenderMode, SelectionModel, Viewport};
pub use music::{PitchMapper, TuningSystem};
