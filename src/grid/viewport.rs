//! Viewport state: pan offset, zoom level, and visible-range queries.
//!
//! The viewport owns the mapping between screen pixels and lattice
//! coordinates. Renderers and input handlers must go through it for every
//! conversion rather than caching a transform of their own.

use super::geometry::{screen_to_world_float, screen_to_world_int, world_to_screen, RenderMode};
use super::Coord;

/// Extra cells added around the visible bounding box so tiles that only
/// partially overlap the viewport edge are still drawn. Hex tiles have a
/// non-axis-aligned footprint, so this must be at least 1.
const VISIBLE_MARGIN: i32 = 2;

/// Integer bounding box of lattice coordinates, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub min_q: i32,
    pub max_q: i32,
    pub min_r: i32,
    pub max_r: i32,
}

impl GridRect {
    /// Number of cells covered by the box.
    pub fn tile_count(&self) -> i64 {
        let w = i64::from(self.max_q - self.min_q) + 1;
        let h = i64::from(self.max_r - self.min_r) + 1;
        w * h
    }

    /// Iterates every coordinate in the box, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let (min_q, max_q) = (self.min_q, self.max_q);
        (self.min_r..=self.max_r)
            .flat_map(move |r| (min_q..=max_q).map(move |q| Coord::new(q, r)))
    }
}

/// Maps between screen pixels and lattice coordinates with pan and zoom.
///
/// Invariant: `zoom` stays within `[min_zoom, max_zoom]` after every
/// mutation, including zoom-limit updates on resize.
#[derive(Debug, Clone)]
pub struct Viewport {
    offset_x: f64,
    offset_y: f64,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    mode: RenderMode,
}

impl Viewport {
    /// Creates a viewport sized so roughly `initial_tiles` tiles span the
    /// short dimension, centered on the lattice origin.
    pub fn new(width: u16, height: u16, initial_tiles: u16, mode: RenderMode) -> Self {
        let mut vp = Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
            min_zoom: 1.0,
            max_zoom: 100.0,
            mode,
        };
        if width > 1 && height > 1 {
            let short = f64::from(width.min(height));
            vp.zoom = short / f64::from(initial_tiles.max(1));
            vp.offset_x = -f64::from(width) / 2.0;
            vp.offset_y = -f64::from(height) / 2.0;
        }
        vp
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switches the tiling geometry. Pan and zoom carry over unchanged.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Recomputes the zoom bounds from the viewport size and the configured
    /// tiles-on-screen range. Must be called on every resize.
    ///
    /// The current zoom is re-clamped into the new bounds so the zoom
    /// invariant survives a shrinking window.
    pub fn update_zoom_limits(&mut self, width: u16, height: u16, min_tiles: u16, max_tiles: u16) {
        if width <= 1 || height <= 1 {
            return;
        }
        let short = f64::from(width.min(height));
        self.min_zoom = short / f64::from(max_tiles.max(1));
        self.max_zoom = short / f64::from(min_tiles.max(1));
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Pans the view by a pixel delta. Never fails, never changes zoom.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x -= dx;
        self.offset_y -= dy;
    }

    /// Zooms by `scale`, keeping the lattice point under the pivot pixel
    /// stationary on screen.
    ///
    /// The requested zoom is clamped into the configured bounds. Returns
    /// `false` when clamping leaves the zoom unchanged, so callers can skip
    /// the redraw.
    pub fn zoom_at(&mut self, scale: f64, pivot_x: f64, pivot_y: f64) -> bool {
        let old_zoom = self.zoom;
        // Capture the point under the pivot before the zoom changes.
        let (wq, wr) = self.screen_to_world_float(pivot_x, pivot_y);

        let new_zoom = (self.zoom * scale).clamp(self.min_zoom, self.max_zoom);
        if new_zoom == old_zoom {
            return false;
        }
        self.zoom = new_zoom;

        // Re-anchor the offset so the captured point projects back onto the
        // pivot pixel at the new zoom.
        let (raw_x, raw_y) = super::geometry::project_fractional(wq, wr, self.zoom, self.mode);
        self.offset_x = raw_x - pivot_x;
        self.offset_y = raw_y - pivot_y;
        true
    }

    /// Lattice position of a screen pixel, in float precision.
    pub fn screen_to_world_float(&self, x: f64, y: f64) -> (f64, f64) {
        screen_to_world_float(x, y, self.zoom, (self.offset_x, self.offset_y), self.mode)
    }

    /// The lattice cell containing a screen pixel.
    pub fn screen_to_world_int(&self, x: f64, y: f64) -> Coord {
        screen_to_world_int(x, y, self.zoom, (self.offset_x, self.offset_y), self.mode)
    }

    /// Screen position of a lattice coordinate.
    pub fn world_to_screen(&self, coord: Coord) -> (f64, f64) {
        world_to_screen(coord, self.zoom, (self.offset_x, self.offset_y), self.mode)
    }

    /// Bounding box of lattice cells visible in a `width` x `height` pixel
    /// viewport, padded by a safety margin.
    ///
    /// All four corners are mapped because neither tiling keeps the lattice
    /// axes aligned with the screen axes at every mode.
    pub fn visible_range(&self, width: u16, height: u16) -> GridRect {
        let w = f64::from(width);
        let h = f64::from(height);
        let corners = [
            self.screen_to_world_float(0.0, 0.0),
            self.screen_to_world_float(w, 0.0),
            self.screen_to_world_float(0.0, h),
            self.screen_to_world_float(w, h),
        ];

        let mut min_q = f64::INFINITY;
        let mut max_q = f64::NEG_INFINITY;
        let mut min_r = f64::INFINITY;
        let mut max_r = f64::NEG_INFINITY;
        for (fq, fr) in corners {
            min_q = min_q.min(fq);
            max_q = max_q.max(fq);
            min_r = min_r.min(fr);
            max_r = max_r.max(fr);
        }

        GridRect {
            min_q: min_q.floor() as i32 - VISIBLE_MARGIN,
            max_q: max_q.ceil() as i32 + VISIBLE_MARGIN,
            min_r: min_r.floor() as i32 - VISIBLE_MARGIN,
            max_r: max_r.ceil() as i32 + VISIBLE_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(800, 600, 5, RenderMode::Rectangle);
        vp.update_zoom_limits(800, 600, 3, 18);
        vp
    }

    #[test]
    fn test_initial_zoom_from_tiles() {
        let vp = viewport();
        // Short dimension 600, 5 tiles across it.
        assert!((vp.zoom() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_world() {
        let mut vp = viewport();
        let before = vp.screen_to_world_float(100.0, 100.0);
        vp.pan(50.0, -30.0);
        let after = vp.screen_to_world_float(150.0, 70.0);
        // The same world point now lives under the shifted pixel.
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_at_is_fixed_point_at_pivot() {
        for mode in [RenderMode::Rectangle, RenderMode::Hexagon] {
            let mut vp = Viewport::new(800, 600, 5, mode);
            vp.update_zoom_limits(800, 600, 3, 18);
            let pivot = (237.0, 411.0);
            let before = vp.screen_to_world_float(pivot.0, pivot.1);
            assert!(vp.zoom_at(1.1, pivot.0, pivot.1));
            let after = vp.screen_to_world_float(pivot.0, pivot.1);
            assert!((before.0 - after.0).abs() < 1e-9, "{mode:?}");
            assert!((before.1 - after.1).abs() < 1e-9, "{mode:?}");
        }
    }

    #[test]
    fn test_zoom_clamped_reports_no_change() {
        let mut vp = viewport();
        // Zoom out far past the minimum; eventually clamping kicks in.
        for _ in 0..100 {
            vp.zoom_at(0.5, 400.0, 300.0);
        }
        assert!(!vp.zoom_at(0.5, 400.0, 300.0));
        assert!(vp.zoom() >= 600.0 / 18.0 - 1e-9);
    }

    #[test]
    fn test_resize_reclamps_zoom() {
        let mut vp = viewport();
        // Shrink the window so the old zoom exceeds the new maximum.
        vp.update_zoom_limits(90, 90, 3, 18);
        assert!(vp.zoom() <= 90.0 / 3.0 + 1e-9);
        assert!(vp.zoom() >= 90.0 / 18.0 - 1e-9);
    }

    #[test]
    fn test_visible_range_contains_screen_cells() {
        for mode in [RenderMode::Rectangle, RenderMode::Hexagon] {
            let vp = Viewport::new(200, 120, 5, mode);
            let range = vp.visible_range(200, 120);
            // Every cell actually under a screen pixel must be in the range.
            for x in [0.0, 50.0, 199.0] {
                for y in [0.0, 60.0, 119.0] {
                    let c = vp.screen_to_world_int(x, y);
                    assert!(c.q >= range.min_q && c.q <= range.max_q, "{mode:?} {c:?}");
                    assert!(c.r >= range.min_r && c.r <= range.max_r, "{mode:?} {c:?}");
                }
            }
        }
    }

    #[test]
    fn test_grid_rect_tile_count() {
        let rect = GridRect {
            min_q: -1,
            max_q: 2,
            min_r: 0,
            max_r: 2,
        };
        assert_eq!(rect.tile_count(), 12);
        assert_eq!(rect.coords().count(), 12);
    }
}
