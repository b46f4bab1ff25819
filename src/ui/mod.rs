//! Terminal user interface components.
//!
//! The screen is a status bar over the tile grid, with an optional help
//! overlay. All drawing is immediate-mode: every frame is rebuilt from the
//! model and viewport, nothing is cached between frames.

mod grid;
mod help;

pub use grid::render_grid;
pub use help::render_help;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Renders the whole frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(frame.area());

    render_status_bar(frame, chunks[0], app);
    render_grid(frame, chunks[1], app);

    if app.show_help {
        render_help(frame);
    }
}

/// Two-line header: session state on top, transient status or the standing
/// instructions below.
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let life = if app.life_running() {
        Span::styled(
            format!("life {}ms", app.life_interval().as_millis()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("life off", Style::default().fg(Color::DarkGray))
    };
    let audio = if app.audio_enabled() {
        Span::raw("audio on")
    } else {
        Span::styled("silent", Style::default().fg(Color::DarkGray))
    };

    let top = Line::from(vec![
        Span::styled(
            " tonnetui ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(format!(
            " {} | {} | {} | {} tiles | ",
            app.viewport().mode().label(),
            app.tuning().name,
            if app.use_sharps() { "♯" } else { "♭" },
            app.selection_count(),
        )),
        life,
        Span::raw(" | "),
        audio,
    ]);

    let bottom = match app.status() {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            " click/drag: toggle | right-drag: pan | scroll: zoom | space: life | ?: help",
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(vec![top, bottom]), area);
}

/// Returns a centered rect of the given size, clamped to `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
