#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chooses where the round's bonus items wait before they appear.

use std::{ops::RangeInclusive, sync::Arc};

use maze_sprint_core::{CellCoord, Maze, RoundSetup};
use rand::Rng;

/// Number of random draws attempted before falling back to a deterministic scan.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Pure system that places bonus items away from the start, the end and each other.
#[derive(Clone, Copy, Debug)]
pub struct BonusPlacement {
    max_attempts: usize,
}

impl Default for BonusPlacement {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl BonusPlacement {
    /// Creates a placement system that retries at most `max_attempts` random draws.
    #[must_use]
    pub const fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Packages `maze` with freshly chosen bonus locations.
    pub fn plan<R>(&self, maze: Arc<Maze>, rng: &mut R) -> RoundSetup
    where
        R: Rng + ?Sized,
    {
        let mut occupied = vec![maze.start(), maze.end()];
        let lollipop = self.choose(&maze, &occupied, rng);
        occupied.push(lollipop);
        let ice_cream = self.choose(&maze, &occupied, rng);

        RoundSetup {
            maze,
            lollipop,
            ice_cream,
        }
    }

    /// Draws a cell from the maze interior that is not listed in `occupied`.
    ///
    /// Grids too small to have an interior draw from every cell. When no free
    /// cell exists at all the last draw is returned.
    pub fn choose<R>(&self, maze: &Maze, occupied: &[CellCoord], rng: &mut R) -> CellCoord
    where
        R: Rng + ?Sized,
    {
        let (columns, rows) = candidate_ranges(maze);
        let mut drawn = CellCoord::new(*columns.start(), *rows.start());

        for _ in 0..self.max_attempts {
            drawn = CellCoord::new(rng.gen_range(columns.clone()), rng.gen_range(rows.clone()));
            if !occupied.contains(&drawn) {
                return drawn;
            }
        }

        nearest_free(drawn, columns, rows, occupied)
            .or_else(|| {
                let (columns, rows) = whole_grid(maze);
                nearest_free(drawn, columns, rows, occupied)
            })
            .unwrap_or(drawn)
    }
}

fn candidate_ranges(maze: &Maze) -> (RangeInclusive<u32>, RangeInclusive<u32>) {
    if maze.columns() >= 3 && maze.rows() >= 3 {
        (1..=maze.columns() - 2, 1..=maze.rows() - 2)
    } else {
        whole_grid(maze)
    }
}

fn whole_grid(maze: &Maze) -> (RangeInclusive<u32>, RangeInclusive<u32>) {
    (0..=maze.columns() - 1, 0..=maze.rows() - 1)
}

fn nearest_free(
    origin: CellCoord,
    columns: RangeInclusive<u32>,
    rows: RangeInclusive<u32>,
    occupied: &[CellCoord],
) -> Option<CellCoord> {
    rows.flat_map(|row| columns.clone().map(move |column| CellCoord::new(column, row)))
        .filter(|cell| !occupied.contains(cell))
        .min_by_key(|cell| (cell.manhattan_distance(origin), cell.row(), cell.column()))
}
