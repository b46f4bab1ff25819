//! Help overlay rendering.
//!
//! Displays the key and mouse bindings in a modal overlay.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "click / left-drag",
        description: "Toggle tiles (drag toggles the whole path)",
    },
    KeyBinding {
        key: "right-drag",
        description: "Pan the view",
    },
    KeyBinding {
        key: "scroll",
        description: "Zoom at the cursor",
    },
    KeyBinding {
        key: "arrows / hjkl",
        description: "Pan by one tile",
    },
    KeyBinding {
        key: "+ / -",
        description: "Zoom at the center",
    },
    KeyBinding {
        key: "m",
        description: "Switch tiling (rectangle / hexagon)",
    },
    KeyBinding {
        key: "e",
        description: "Toggle sharps / flats",
    },
    KeyBinding {
        key: "t",
        description: "Cycle tuning system",
    },
    KeyBinding {
        key: "space",
        description: "Start / stop Game of Life",
    },
    KeyBinding {
        key: "s",
        description: "Step one generation (while stopped)",
    },
    KeyBinding {
        key: "[ / ]",
        description: "Slower / faster life ticks",
    },
    KeyBinding {
        key: "c",
        description: "Clear selection",
    },
    KeyBinding {
        key: "R",
        description: "Clear and reset the view",
    },
    KeyBinding {
        key: "?",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "q / Esc",
        description: "Quit",
    },
];

/// Renders the help overlay in the center of the screen.
pub fn render_help(frame: &mut Frame) {
    let width = 58;
    let height = BINDINGS.len() as u16 + 2;
    let area = centered_rect(width, height, frame.area());

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|binding| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<20}", binding.key),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(binding.description),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
