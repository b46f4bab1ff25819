//! The musical tile grid: coordinates, geometry, selection, and simulation.
//!
//! Tiles live on an unbounded axial lattice. Everything here is sparse:
//! there is no fixed grid size, only sets and maps keyed by [`Coord`].

mod geometry;
mod life;
mod scheduler;
mod selection;
mod viewport;

pub use geometry::{screen_to_world_float, screen_to_world_int, world_to_screen, RenderMode};
pub use life::{neighbors, next_generation};
pub use scheduler::{LifeClock, MIN_TICK_INTERVAL};
pub use selection::{ModelEvent, SelectionModel};
pub use viewport::{GridRect, Viewport};

/// An axial lattice coordinate.
///
/// `q` and `r` address a cell in both tiling geometries; they are not pixel
/// rows/columns. The domain is unbounded in all directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub q: i32,
    pub r: i32,
}

impl Coord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

/// Iterator over all integer coordinates on the straight line between two
/// cells, endpoints included, using Bresenham's algorithm.
///
/// Used by drag-select to toggle every cell the pointer passed over, even
/// when pointer events skip cells between frames.
pub struct BresenhamLine {
    current: Coord,
    end: Coord,
    dq: i32,
    dr: i32,
    sq: i32,
    sr: i32,
    err: i32,
    done: bool,
}

impl Iterator for BresenhamLine {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.done {
            return None;
        }
        let out = self.current;
        if self.current == self.end {
            self.done = true;
            return Some(out);
        }
        let e2 = 2 * self.err;
        if e2 > -self.dr {
            self.err -= self.dr;
            self.current.q += self.sq;
        }
        if e2 < self.dq {
            self.err += self.dq;
            self.current.r += self.sr;
        }
        Some(out)
    }
}

/// Returns an iterator over the Bresenham line from `a` to `b` (inclusive).
pub fn bresenham_line(a: Coord, b: Coord) -> BresenhamLine {
    BresenhamLine {
        current: a,
        end: b,
        dq: (b.q - a.q).abs(),
        dr: (b.r - a.r).abs(),
        sq: if a.q < b.q { 1 } else { -1 },
        sr: if a.r < b.r { 1 } else { -1 },
        err: (b.q - a.q).abs() - (b.r - a.r).abs(),
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bresenham_single_point() {
        let cells: Vec<Coord> = bresenham_line(Coord::new(3, -2), Coord::new(3, -2)).collect();
        assert_eq!(cells, vec![Coord::new(3, -2)]);
    }

    #[test]
    fn test_bresenham_horizontal() {
        let cells: Vec<Coord> = bresenham_line(Coord::new(0, 0), Coord::new(3, 0)).collect();
        assert_eq!(
            cells,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(3, 0)
            ]
        );
    }

    #[test]
    fn test_bresenham_diagonal() {
        let cells: Vec<Coord> = bresenham_line(Coord::new(0, 0), Coord::new(-3, -3)).collect();
        assert_eq!(
            cells,
            vec![
                Coord::new(0, 0),
                Coord::new(-1, -1),
                Coord::new(-2, -2),
                Coord::new(-3, -3)
            ]
        );
    }

    #[test]
    fn test_bresenham_endpoints_present() {
        let a = Coord::new(-5, 2);
        let b = Coord::new(7, -4);
        let cells: Vec<Coord> = bresenham_line(a, b).collect();
        assert_eq!(cells.first(), Some(&a));
        assert_eq!(cells.last(), Some(&b));
        // Steps are unit steps in at most two axes, so consecutive cells
        // are always adjacent.
        for pair in cells.windows(2) {
            assert!((pair[1].q - pair[0].q).abs() <= 1);
            assert!((pair[1].r - pair[0].r).abs() <= 1);
        }
    }
}
