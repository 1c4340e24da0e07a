use std::collections::VecDeque;

use maze_sprint_core::{CellCoord, Direction, Maze};
use thiserror::Error;

/// Structural defects that disqualify a maze from being perfect.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeDefect {
    /// Two neighbours disagree about the wall between them.
    #[error("wall on the {direction:?} side of {cell:?} is not mirrored by its neighbour")]
    AsymmetricWall {
        /// Cell whose wall flag disagrees with its neighbour.
        cell: CellCoord,
        /// Side of `cell` facing the neighbour.
        direction: Direction,
    },
    /// A border side of the grid has no wall.
    #[error("border wall missing on the {direction:?} side of {cell:?}")]
    OpenBorder {
        /// Cell on the grid boundary.
        cell: CellCoord,
        /// Side that faces outside the grid.
        direction: Direction,
    },
    /// The number of open passages differs from `cells - 1`.
    #[error("expected {expected} open passages but found {actual}")]
    PassageCount {
        /// Passage count of a spanning tree over the grid.
        expected: u64,
        /// Passage count found in the maze.
        actual: u64,
    },
    /// Some cells cannot be reached from the start cell.
    #[error("only {reachable} of {total} cells are reachable from the start")]
    Disconnected {
        /// Cells reachable from the start.
        reachable: usize,
        /// Cells in the grid.
        total: usize,
    },
}

/// Checks that `maze` is a perfect maze: symmetric walls, a closed border,
/// and an open-passage graph that forms a spanning tree.
pub fn verify(maze: &Maze) -> Result<(), MazeDefect> {
    let mut passages: u64 = 0;

    for cell in maze.coordinates() {
        let Some(walls) = maze.walls(cell) else {
            continue;
        };

        for direction in Direction::ALL {
            let Some(neighbor) = maze.neighbor(cell, direction) else {
                if !walls.has(direction) {
                    return Err(MazeDefect::OpenBorder { cell, direction });
                }
                continue;
            };

            let mirrored = maze
                .walls(neighbor)
                .map(|other| other.has(direction.opposite()));
            if mirrored != Some(walls.has(direction)) {
                return Err(MazeDefect::AsymmetricWall { cell, direction });
            }

            if matches!(direction, Direction::East | Direction::South) && !walls.has(direction) {
                passages += 1;
            }
        }
    }

    let total = maze.cells().len();
    let expected = (total as u64).saturating_sub(1);
    if passages != expected {
        return Err(MazeDefect::PassageCount {
            expected,
            actual: passages,
        });
    }

    let reachable = reachable_from(maze, maze.start());
    if reachable != total {
        return Err(MazeDefect::Disconnected { reachable, total });
    }

    Ok(())
}

fn reachable_from(maze: &Maze, origin: CellCoord) -> usize {
    let mut seen = vec![false; maze.cells().len()];
    let mut queue = VecDeque::new();
    let mut count = 0;

    if let Some(index) = maze.index(origin) {
        seen[index] = true;
        queue.push_back(origin);
    }

    while let Some(cell) = queue.pop_front() {
        count += 1;
        for direction in Direction::ALL {
            let Some(next) = maze.passage(cell, direction) else {
                continue;
            };
            if let Some(index) = maze.index(next) {
                if !seen[index] {
                    seen[index] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    count
}
