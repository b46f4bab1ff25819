//! The grid renderer.
//!
//! Paints the tile lattice by inverse-mapping every terminal cell through
//! the viewport, so the rectangular and hexagonal tilings share one code
//! path and the transform is always the viewport's current one. Note labels
//! are placed at tile centers via the forward projection once tiles are
//! large enough to hold them.

use crate::app::App;
use crate::grid::{Coord, SelectionModel, Viewport};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::Frame;

/// Renders the tile grid into `area`.
pub fn render_grid(frame: &mut Frame, area: Rect, app: &mut App) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    app.set_grid_area(area);

    let ceiling = app.config.view.render_tile_ceiling(area.width, area.height);
    let label_threshold = app.config.view.note_visibility_zoom_threshold;
    let (viewport, model) = app.grid_parts();

    let range = viewport.visible_range(area.width, area.height);
    if range.tile_count() > ceiling {
        // A tile count past the ceiling means pan/zoom state is corrupted;
        // skip the frame instead of enumerating an unbounded set.
        tracing::warn!(tiles = range.tile_count(), ceiling, "render aborted");
        return;
    }

    paint_tiles(frame, area, viewport, model);
    if viewport.zoom() > label_threshold {
        paint_labels(frame, area, viewport, model, &range);
    }
}

/// Style for a tile's interior.
fn tile_style(coord: Coord, selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::Blue)
    } else if (coord.q + coord.r).rem_euclid(2) == 0 {
        // Checkerboard parity shading so tile boundaries read without
        // drawn outlines.
        Style::default().bg(Color::Rgb(40, 40, 40))
    } else {
        Style::default().bg(Color::Rgb(25, 25, 25))
    }
}

fn paint_tiles(frame: &mut Frame, area: Rect, viewport: &Viewport, model: &SelectionModel) {
    let buf = frame.buffer_mut();
    for row in 0..area.height {
        for col in 0..area.width {
            // Sample at the cell center for a stable tile assignment.
            let coord =
                viewport.screen_to_world_int(f64::from(col) + 0.5, f64::from(row) + 0.5);
            let style = tile_style(coord, model.is_selected(coord));
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

fn paint_labels(
    frame: &mut Frame,
    area: Rect,
    viewport: &Viewport,
    model: &mut SelectionModel,
    range: &crate::grid::GridRect,
) {
    let buf = frame.buffer_mut();
    for coord in range.coords() {
        let (x, y) = viewport.world_to_screen(coord);
        // The rectangle projection yields the tile's lower-left corner (the
        // r axis is flipped); hex centers project directly.
        let (cx, cy) = match viewport.mode() {
            crate::grid::RenderMode::Rectangle => {
                (x + viewport.zoom() / 2.0, y - viewport.zoom() / 2.0)
            }
            crate::grid::RenderMode::Hexagon => (x, y),
        };

        let label = model.display_name(coord);
        let col = (cx - label.len() as f64 / 2.0).round();
        let row = cy.round();
        if row < 0.0 || row >= f64::from(area.height) {
            continue;
        }

        let selected = model.is_selected(coord);
        let style = if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        for (i, ch) in label.chars().enumerate() {
            let c = col + i as f64;
            if c < 0.0 || c >= f64::from(area.width) {
                continue;
            }
            let pos = (area.x + c as u16, area.y + row as u16);
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char(ch);
                cell.set_style(style);
            }
        }
    }
}
