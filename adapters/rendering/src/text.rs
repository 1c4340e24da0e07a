//! Plain-text rendering of mazes for terminals and logs.

use maze_sprint_core::{CellCoord, Direction, Maze};

/// Renders `maze` as ASCII art with `+`, `-` and `|` walls.
///
/// The start and end cells are labelled `S` and `E`. Each entry of `markers`
/// overrides the glyph of its cell; later entries win.
#[must_use]
pub fn maze_to_text(maze: &Maze, markers: &[(CellCoord, char)]) -> String {
    let columns = maze.columns();
    let mut out = String::new();

    for row in 0..maze.rows() {
        for column in 0..columns {
            let closed = has_wall(maze, CellCoord::new(column, row), Direction::North);
            out.push('+');
            out.push_str(if closed { "---" } else { "   " });
        }
        out.push_str("+\n");

        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            out.push(if has_wall(maze, cell, Direction::West) {
                '|'
            } else {
                ' '
            });
            out.push(' ');
            out.push(glyph(maze, cell, markers));
            out.push(' ');
        }
        let last = CellCoord::new(columns - 1, row);
        out.push(if has_wall(maze, last, Direction::East) {
            '|'
        } else {
            ' '
        });
        out.push('\n');
    }

    let bottom = maze.rows() - 1;
    for column in 0..columns {
        let closed = has_wall(maze, CellCoord::new(column, bottom), Direction::South);
        out.push('+');
        out.push_str(if closed { "---" } else { "   " });
    }
    out.push_str("+\n");
    out
}

fn has_wall(maze: &Maze, cell: CellCoord, direction: Direction) -> bool {
    maze.walls(cell).map_or(true, |walls| walls.has(direction))
}

fn glyph(maze: &Maze, cell: CellCoord, markers: &[(CellCoord, char)]) -> char {
    if let Some((_, marker)) = markers.iter().rev().find(|(at, _)| *at == cell) {
        return *marker;
    }
    if cell == maze.start() {
        'S'
    } else if cell == maze.end() {
        'E'
    } else {
        ' '
    }
}
