//! Conway's Game of Life over the sparse coordinate set.
//!
//! Adjacency treats (q, r) as a plain integer grid — eight rectangular
//! neighbors regardless of the active tiling geometry. This is a deliberate
//! simplification, not a hex-adjacency rule.

use super::Coord;
use std::collections::{HashMap, HashSet};

/// The eight rectangular-adjacency neighbors of a cell.
pub fn neighbors(coord: Coord) -> [Coord; 8] {
    let Coord { q, r } = coord;
    [
        Coord::new(q - 1, r - 1),
        Coord::new(q, r - 1),
        Coord::new(q + 1, r - 1),
        Coord::new(q - 1, r),
        Coord::new(q + 1, r),
        Coord::new(q - 1, r + 1),
        Coord::new(q, r + 1),
        Coord::new(q + 1, r + 1),
    ]
}

/// Computes the next generation under standard Conway rules.
///
/// Neighbor counts are accumulated over the live cells' neighborhoods, so
/// the cost scales with the live population, never with any grid area. The
/// empty set is a fixed point.
pub fn next_generation(live_cells: &HashSet<Coord>) -> HashSet<Coord> {
    if live_cells.is_empty() {
        return HashSet::new();
    }

    let mut counts: HashMap<Coord, u8> = HashMap::with_capacity(live_cells.len() * 4);
    for &cell in live_cells {
        for neighbor in neighbors(cell) {
            *counts.entry(neighbor).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|&(cell, count)| {
            if live_cells.contains(&cell) {
                count == 2 || count == 3
            } else {
                count == 3
            }
        })
        .map(|(cell, _)| cell)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(i32, i32)]) -> HashSet<Coord> {
        coords.iter().map(|&(q, r)| Coord::new(q, r)).collect()
    }

    #[test]
    fn test_empty_is_fixed_point() {
        assert!(next_generation(&HashSet::new()).is_empty());
    }

    #[test]
    fn test_lone_cell_dies() {
        let next = next_generation(&cells(&[(0, 0)]));
        assert!(next.is_empty());
    }

    #[test]
    fn test_block_is_still_life() {
        let block = cells(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(next_generation(&block), block);
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = cells(&[(-1, 0), (0, 0), (1, 0)]);
        let vertical = cells(&[(0, -1), (0, 0), (0, 1)]);
        assert_eq!(next_generation(&horizontal), vertical);
        assert_eq!(next_generation(&vertical), horizontal);
    }

    #[test]
    fn test_birth_on_exactly_three() {
        // An L-triomino grows a fourth cell into a block.
        let l = cells(&[(0, 0), (1, 0), (0, 1)]);
        let next = next_generation(&l);
        assert_eq!(next, cells(&[(0, 0), (1, 0), (0, 1), (1, 1)]));
    }

    #[test]
    fn test_neighbors_count_and_exclusion() {
        let n = neighbors(Coord::new(2, -3));
        assert_eq!(n.len(), 8);
        assert!(!n.contains(&Coord::new(2, -3)));
        let unique: HashSet<Coord> = n.into_iter().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_far_apart_cells_do_not_interact() {
        let sparse = cells(&[(0, 0), (1000, 1000), (-1000, 1000)]);
        assert!(next_generation(&sparse).is_empty());
    }
}
