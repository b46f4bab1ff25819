//! Pure coordinate transforms between the axial lattice and screen pixels.
//!
//! Two tilings are supported: unit squares and pointy-top hexagons. For both,
//! `world_to_screen` and `screen_to_world_float` are exact algebraic inverses;
//! `screen_to_world_int` adds the rounding step that picks the containing cell.

use super::Coord;

/// The active tiling geometry.
///
/// Changes both the projection formulas and the rounding algorithm used for
/// the inverse mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Rectangle,
    Hexagon,
}

impl RenderMode {
    /// Short display label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Rectangle => "rect",
            RenderMode::Hexagon => "hex",
        }
    }
}

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Projects a lattice coordinate to screen pixels.
///
/// Rectangle: `x = q*zoom - offset_x`, `y = -r*zoom - offset_y`. The vertical
/// axis is flipped so increasing `r` moves up on screen.
///
/// Hexagon (pointy-top, `size = zoom/2`):
/// `x = size*(√3*q + √3/2*r) - offset_x`, `y = size*(3/2*r) - offset_y`.
pub fn world_to_screen(
    coord: Coord,
    zoom: f64,
    offset: (f64, f64),
    mode: RenderMode,
) -> (f64, f64) {
    let (x, y) = project_fractional(coord.q as f64, coord.r as f64, zoom, mode);
    (x - offset.0, y - offset.1)
}

/// Projects fractional lattice coordinates at a given zoom, with no offset
/// applied. Shared by [`world_to_screen`] and the viewport's zoom anchoring.
pub(crate) fn project_fractional(fq: f64, fr: f64, zoom: f64, mode: RenderMode) -> (f64, f64) {
    match mode {
        RenderMode::Rectangle => (fq * zoom, -fr * zoom),
        RenderMode::Hexagon => {
            let size = zoom / 2.0;
            (
                size * (SQRT_3 * fq + SQRT_3 / 2.0 * fr),
                size * (3.0 / 2.0 * fr),
            )
        }
    }
}

/// Maps a screen pixel back to fractional lattice coordinates.
///
/// Exact inverse of [`world_to_screen`] for the same mode/zoom/offset.
pub fn screen_to_world_float(
    x: f64,
    y: f64,
    zoom: f64,
    offset: (f64, f64),
    mode: RenderMode,
) -> (f64, f64) {
    let px = x + offset.0;
    let py = y + offset.1;
    match mode {
        RenderMode::Rectangle => (px / zoom, -py / zoom),
        RenderMode::Hexagon => {
            let size = zoom / 2.0;
            let q = (SQRT_3 / 3.0 * px - 1.0 / 3.0 * py) / size;
            let r = (2.0 / 3.0 * py) / size;
            (q, r)
        }
    }
}

/// Maps a screen pixel to the integer lattice cell containing it.
///
/// Rectangle tiles take the floor of each component independently (the unit
/// cell whose corner projection is at or below the point). Hexagons require
/// axial rounding to pick the nearest hex center.
pub fn screen_to_world_int(
    x: f64,
    y: f64,
    zoom: f64,
    offset: (f64, f64),
    mode: RenderMode,
) -> Coord {
    let (fq, fr) = screen_to_world_float(x, y, zoom, offset, mode);
    match mode {
        RenderMode::Rectangle => Coord::new(fq.floor() as i32, fr.floor() as i32),
        RenderMode::Hexagon => axial_round(fq, fr),
    }
}

/// Rounds fractional axial coordinates to the nearest hex cell.
///
/// Works in cube coordinates `(q, r, s)` with `s = -q - r`: round each
/// component, then recompute the one with the largest rounding error from the
/// other two so that `q + r + s == 0` holds exactly. Tie-break order is
/// deterministic: `q` is only corrected on a strictly largest error, and
/// between `r` and `s`, `r` wins ties.
pub fn axial_round(fq: f64, fr: f64) -> Coord {
    let fs = -fq - fr;

    let mut q = fq.round();
    let mut r = fr.round();
    let s = fs.round();

    let dq = (q - fq).abs();
    let dr = (r - fr).abs();
    let ds = (s - fs).abs();

    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr >= ds {
        r = -q - s;
    }
    // Correcting s would not change the axial (q, r) result.

    Coord::new(q as i32, r as i32)
}
