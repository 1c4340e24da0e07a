#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised perfect-maze generation for Maze Sprint.
//!
//! Mazes are carved with an iterative depth-first backtracker. Randomness is
//! injected through any [`rand::Rng`], so seeding the source makes the output
//! fully reproducible.

mod verify;

pub use verify::{verify, MazeDefect};

use maze_sprint_core::{CellCoord, Direction, Maze, MazeBuilder};
use rand::{seq::SliceRandom, Rng};

/// Carves a perfect maze spanning a `columns` by `rows` grid.
///
/// Zero dimensions are treated as one, so the result is always a valid
/// spanning tree: a single cell, a corridor, or a full maze.
pub fn generate<R>(columns: u32, rows: u32, rng: &mut R) -> Maze
where
    R: Rng + ?Sized,
{
    let mut builder = MazeBuilder::new(columns, rows);
    let carved = carve(&mut builder, rng);
    let maze = builder.build();

    log::trace!(
        "carved {}x{} maze with {carved} passages",
        maze.columns(),
        maze.rows()
    );
    debug_assert_eq!(verify(&maze), Ok(()));
    maze
}

fn carve<R>(builder: &mut MazeBuilder, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let columns = builder.columns();
    let rows = builder.rows();
    let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    let mut visited = vec![false; capacity];
    let mut stack: Vec<CellCoord> = Vec::with_capacity(capacity);
    let mut candidates: Vec<Direction> = Vec::with_capacity(Direction::ALL.len());
    let mut carved = 0;

    let start = CellCoord::new(0, 0);
    mark_visited(builder, &mut visited, start);
    stack.push(start);

    while let Some(&current) = stack.last() {
        candidates.clear();
        for direction in Direction::ALL {
            let Some(neighbor) = current.step(direction, columns, rows) else {
                continue;
            };
            let unvisited = builder
                .index(neighbor)
                .map_or(false, |index| !visited[index]);
            if unvisited {
                candidates.push(direction);
            }
        }

        let Some(&direction) = candidates.choose(rng) else {
            let _ = stack.pop();
            continue;
        };

        if let Some(next) = builder.carve(current, direction) {
            mark_visited(builder, &mut visited, next);
            stack.push(next);
            carved += 1;
        }
    }

    carved
}

fn mark_visited(builder: &MazeBuilder, visited: &mut [bool], cell: CellCoord) {
    if let Some(slot) = builder.index(cell).and_then(|index| visited.get_mut(index)) {
        *slot = true;
    }
}
