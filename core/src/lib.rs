#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Sprint engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters translate player input
//! into [`Intent`] values, the owner of the session turns those into
//! [`Command`] values, the world executes commands through its pure `apply`
//! entry point, and then broadcasts [`Event`] values for systems, renderers
//! and audio sinks to react to. Nothing in this crate performs I/O.

use std::{error::Error, fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Sprint.";

/// Number of maze columns used for gameplay.
pub const GRID_COLUMNS: u32 = 33;

/// Number of maze rows used for gameplay.
pub const GRID_ROWS: u32 = 17;

/// Seconds on the clock when a round starts.
pub const ROUND_TIME_SECONDS: u32 = 60;

/// Points awarded for every successful step.
pub const MOVE_POINTS: u64 = 10;

/// Multiplier applied to `round * time_remaining` when a round ends.
pub const FINAL_SCORE_MULTIPLIER: u64 = 100;

/// Period of the countdown timer while a round is running.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cardinal movement directions, listed in wall-side order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices; the top side of a cell.
    North,
    /// Movement toward increasing column indices; the right side of a cell.
    East,
    /// Movement toward increasing row indices; the bottom side of a cell.
    South,
    /// Movement toward decreasing column indices; the left side of a cell.
    West,
}

impl Direction {
    /// All directions in wall-side order `{top, right, bottom, left}`.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Position of the matching side inside a [`WallSet`].
    #[must_use]
    pub const fn side_index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Direction pointing back toward the origin of a step.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the adjacent cell in `direction` when it lies inside a
    /// `columns` by `rows` grid.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);
        if column < columns && row < rows {
            Some(Self::new(column, row))
        } else {
            None
        }
    }
}

/// Four-flag boundary record for one cell in `{top, right, bottom, left}` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallSet([bool; 4]);

impl WallSet {
    /// Wall set with every side standing.
    pub const CLOSED: WallSet = WallSet([true; 4]);

    /// Wall set without any standing side.
    pub const OPEN: WallSet = WallSet([false; 4]);

    /// Creates a wall set from flags in `{top, right, bottom, left}` order.
    #[must_use]
    pub const fn from_flags(flags: [bool; 4]) -> Self {
        Self(flags)
    }

    /// Reports whether a wall stands on the side facing `direction`.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        self.0[direction.side_index()]
    }

    /// Knocks down the wall on the side facing `direction`.
    pub fn remove(&mut self, direction: Direction) {
        self.0[direction.side_index()] = false;
    }

    /// Flags in `{top, right, bottom, left}` order.
    #[must_use]
    pub const fn flags(&self) -> [bool; 4] {
        self.0
    }

    /// Number of sides without a wall.
    #[must_use]
    pub fn open_sides(&self) -> usize {
        self.0.iter().filter(|standing| !**standing).count()
    }
}

/// Immutable maze topology produced by the generator.
///
/// Cells are stored row-major; [`Maze::index`] is the single place the linear
/// index formula lives and every lookup goes through it. Deserialized mazes
/// pass through [`Maze::from_cells`] and must keep their corner landmarks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMaze")]
pub struct Maze {
    columns: u32,
    rows: u32,
    cells: Vec<WallSet>,
    start: CellCoord,
    end: CellCoord,
}

impl Maze {
    /// Assembles a maze from row-major wall sets.
    ///
    /// The start cell is the upper-left corner and the end cell the lower-right
    /// corner. Structural properties beyond the cell count are not checked here.
    pub fn from_cells(columns: u32, rows: u32, cells: Vec<WallSet>) -> Result<Self, MazeShapeError> {
        if columns == 0 || rows == 0 {
            return Err(MazeShapeError::EmptyGrid { columns, rows });
        }

        let expected = u64::from(columns) * u64::from(rows);
        if cells.len() as u64 != expected {
            return Err(MazeShapeError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
            start: CellCoord::new(0, 0),
            end: CellCoord::new(columns - 1, rows - 1),
        })
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell where every round begins.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the player must reach to win the round.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    /// Row-major wall sets.
    #[must_use]
    pub fn cells(&self) -> &[WallSet] {
        &self.cells
    }

    /// Reports whether the cell lies inside the maze bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Linear index of `cell`, computed as `row * columns + column`.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Cell stored at the provided linear index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Wall set of the provided cell.
    #[must_use]
    pub fn walls(&self, cell: CellCoord) -> Option<WallSet> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// In-bounds neighbour of `cell` in `direction`, ignoring walls.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(cell) {
            return None;
        }
        cell.step(direction, self.columns, self.rows)
    }

    /// Cell reached by stepping from `cell` toward `direction`, if no wall or
    /// border blocks the way.
    #[must_use]
    pub fn passage(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let walls = self.walls(cell)?;
        if walls.has(direction) {
            return None;
        }
        self.neighbor(cell, direction)
    }

    /// Iterator over every cell coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Unchecked wire form of a [`Maze`].
#[derive(Deserialize)]
struct RawMaze {
    columns: u32,
    rows: u32,
    cells: Vec<WallSet>,
    start: CellCoord,
    end: CellCoord,
}

impl TryFrom<RawMaze> for Maze {
    type Error = MazeShapeError;

    fn try_from(raw: RawMaze) -> Result<Self, Self::Error> {
        let maze = Self::from_cells(raw.columns, raw.rows, raw.cells)?;
        if raw.start != maze.start || raw.end != maze.end {
            return Err(MazeShapeError::MisplacedLandmarks {
                start: raw.start,
                end: raw.end,
            });
        }
        Ok(maze)
    }
}

/// Mutable staging area used while carving a maze.
///
/// Walls are only ever removed in pairs, so a builder can never produce an
/// asymmetric wall set.
#[derive(Clone, Debug)]
pub struct MazeBuilder {
    columns: u32,
    rows: u32,
    cells: Vec<WallSet>,
}

impl MazeBuilder {
    /// Creates a fully walled grid. Zero dimensions are clamped to one.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![WallSet::CLOSED; capacity],
        }
    }

    /// Number of columns being carved.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows being carved.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Linear index of `cell`, using the same formula as [`Maze::index`].
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Opens the passage between `cell` and its neighbour in `direction`,
    /// returning the neighbour. Steps across the border are refused.
    pub fn carve(&mut self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let neighbor = cell.step(direction, self.columns, self.rows)?;
        let from = self.index(cell)?;
        let to = self.index(neighbor)?;
        self.cells[from].remove(direction);
        self.cells[to].remove(direction.opposite());
        Some(neighbor)
    }

    /// Freezes the carved grid into an immutable maze.
    #[must_use]
    pub fn build(self) -> Maze {
        Maze {
            start: CellCoord::new(0, 0),
            end: CellCoord::new(self.columns - 1, self.rows - 1),
            columns: self.columns,
            rows: self.rows,
            cells: self.cells,
        }
    }
}

/// Reasons raw cells cannot be assembled into a [`Maze`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeShapeError {
    /// Grids need at least one column and one row.
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The number of wall sets does not match `columns * rows`.
    CellCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: u64,
        /// Number of wall sets supplied.
        actual: usize,
    },
    /// Start and end must sit on the upper-left and lower-right corners.
    MisplacedLandmarks {
        /// Start cell that was supplied.
        start: CellCoord,
        /// End cell that was supplied.
        end: CellCoord,
    },
}

impl fmt::Display for MazeShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { columns, rows } => {
                write!(f, "maze grid must not be empty (received {columns}x{rows})")
            }
            Self::CellCountMismatch { expected, actual } => {
                write!(f, "expected {expected} wall sets but received {actual}")
            }
            Self::MisplacedLandmarks { start, end } => write!(
                f,
                "start {start:?} and end {end:?} are not the maze corners"
            ),
        }
    }
}

impl Error for MazeShapeError {}

/// Kinds of collectible bonus items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BonusKind {
    /// Appears halfway through the round.
    Lollipop,
    /// Appears with a quarter of the round left.
    IceCream,
}

impl BonusKind {
    /// Both bonus kinds in threshold evaluation order.
    pub const ALL: [BonusKind; 2] = [Self::Lollipop, Self::IceCream];

    /// Points granted when the item is collected.
    #[must_use]
    pub const fn score_award(self) -> u64 {
        match self {
            Self::Lollipop => 5_000,
            Self::IceCream => 10_000,
        }
    }

    /// Seconds added to the clock when the item is collected.
    #[must_use]
    pub const fn time_award(self) -> u32 {
        match self {
            Self::Lollipop => 15,
            Self::IceCream => 30,
        }
    }

    /// Remaining time at which the item appears.
    #[must_use]
    pub const fn spawn_threshold(self) -> u32 {
        match self {
            Self::Lollipop => 30,
            Self::IceCream => 15,
        }
    }
}

/// State of a single bonus item within the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BonusItem {
    /// Cell the item occupies for the whole round.
    pub location: CellCoord,
    /// Whether the item is currently collectible.
    pub visible: bool,
    /// Set briefly after collection so presenters can show the award.
    pub just_collected: bool,
}

impl BonusItem {
    /// Creates an item waiting at `location` that has not appeared yet.
    #[must_use]
    pub const fn hidden_at(location: CellCoord) -> Self {
        Self {
            location,
            visible: false,
            just_collected: false,
        }
    }
}

/// Everything required to begin a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSetup {
    /// Freshly generated maze for the round.
    pub maze: Arc<Maze>,
    /// Location chosen for the lollipop.
    pub lollipop: CellCoord,
    /// Location chosen for the ice-cream.
    pub ice_cream: CellCoord,
}

impl RoundSetup {
    /// Location chosen for the provided bonus kind.
    #[must_use]
    pub const fn location(&self, kind: BonusKind) -> CellCoord {
        match kind {
            BonusKind::Lollipop => self.lollipop,
            BonusKind::IceCream => self.ice_cream,
        }
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Begins a new round with the supplied maze and bonus locations.
    StartRound {
        /// Maze and bonus placement for the round.
        setup: RoundSetup,
    },
    /// Advances the countdown by one period.
    Tick,
    /// Requests that the player step one cell in `direction`.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests collection of the bonus item of `kind` at the player's cell.
    Collect {
        /// Bonus item being collected.
        kind: BonusKind,
    },
    /// Clears the presentation flag raised by a collection in `round`.
    ClearCollectedFlag {
        /// Bonus item whose flag should be cleared.
        kind: BonusKind,
        /// Round the collection happened in.
        round: u32,
    },
}

/// Lifecycle phases of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No round has been played yet.
    Idle,
    /// A round is in progress and the countdown is active.
    Running,
    /// The latest round finished and its score was finalised.
    RoundEnd,
}

/// How a round finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The player reached the end cell.
    Won,
    /// The countdown reached zero.
    TimedOut,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new round began.
    RoundStarted {
        /// One-based index of the round.
        round: u32,
    },
    /// The countdown advanced by one period.
    TimeAdvanced {
        /// Seconds left after the decrement.
        remaining: u32,
    },
    /// The player moved between two adjacent cells.
    PlayerMoved {
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// A bonus item became visible.
    BonusSpawned {
        /// Kind of the item that appeared.
        kind: BonusKind,
        /// Cell the item occupies.
        cell: CellCoord,
    },
    /// The player collected a bonus item.
    BonusCollected {
        /// Kind of the collected item.
        kind: BonusKind,
        /// Cell the item occupied.
        cell: CellCoord,
        /// Round the collection happened in.
        round: u32,
    },
    /// The post-collection presentation flag was cleared.
    CollectedFlagCleared {
        /// Kind of the item whose flag was cleared.
        kind: BonusKind,
    },
    /// The round finished and its score was finalised.
    RoundEnded {
        /// Round that finished.
        round: u32,
        /// Whether the player won or ran out of time.
        outcome: RoundOutcome,
        /// Score assigned by the finalisation formula.
        final_score: u64,
        /// High score after folding in the pre-finalisation score.
        high_score: u64,
    },
}

impl Event {
    /// Audio notification associated with the event, if any.
    #[must_use]
    pub const fn audio_cue(&self) -> Option<AudioCue> {
        match self {
            Self::RoundStarted { .. } => Some(AudioCue::RoundStarted),
            Self::RoundEnded { .. } => Some(AudioCue::RoundEnded),
            _ => None,
        }
    }
}

/// Fire-and-forget notifications for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Start the looping round music.
    RoundStarted,
    /// Stop the music and play the round-end jingle.
    RoundEnded,
}

/// Discrete player intents delivered by input adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step toward the top of the maze.
    MoveUp,
    /// Step toward the bottom of the maze.
    MoveDown,
    /// Step toward the left of the maze.
    MoveLeft,
    /// Step toward the right of the maze.
    MoveRight,
    /// Start a round when none is running.
    ConfirmStart,
}

impl Intent {
    /// Direction requested by a movement intent.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveUp => Some(Direction::North),
            Self::MoveDown => Some(Direction::South),
            Self::MoveLeft => Some(Direction::West),
            Self::MoveRight => Some(Direction::East),
            Self::ConfirmStart => None,
        }
    }
}

/// Read-only view of the session published after every transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Maze of the current or most recent round.
    pub maze: Option<Arc<Maze>>,
    /// Cell occupied by the player.
    pub current_cell: Option<CellCoord>,
    /// Score accumulated so far.
    pub score: u64,
    /// Best pre-finalisation score seen during this process.
    pub high_score: u64,
    /// Number of rounds started.
    pub round: u32,
    /// Seconds left on the clock; `None` before the first round.
    pub time_remaining: Option<u32>,
    /// Lollipop state for the current round.
    pub lollipop: Option<BonusItem>,
    /// Ice-cream state for the current round.
    pub ice_cream: Option<BonusItem>,
}

impl SessionSnapshot {
    /// State of the bonus item of `kind`.
    #[must_use]
    pub const fn bonus(&self, kind: BonusKind) -> Option<BonusItem> {
        match kind {
            BonusKind::Lollipop => self.lollipop,
            BonusKind::IceCream => self.ice_cream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Maze {
        let mut cells = vec![WallSet::CLOSED; 3];
        cells[0].remove(Direction::East);
        cells[1].remove(Direction::West);
        cells[1].remove(Direction::East);
        cells[2].remove(Direction::West);
        Maze::from_cells(3, 1, cells).expect("valid corridor")
    }

    #[test]
    fn index_is_row_major() {
        let maze = Maze::from_cells(4, 3, vec![WallSet::CLOSED; 12]).expect("valid grid");
        assert_eq!(maze.index(CellCoord::new(0, 0)), Some(0));
        assert_eq!(maze.index(CellCoord::new(3, 0)), Some(3));
        assert_eq!(maze.index(CellCoord::new(1, 2)), Some(9));
        assert_eq!(maze.index(CellCoord::new(4, 0)), None);
        assert_eq!(maze.cell_at(9), Some(CellCoord::new(1, 2)));
        assert_eq!(maze.cell_at(12), None);
    }

    #[test]
    fn start_and_end_occupy_opposite_corners() {
        let maze = Maze::from_cells(5, 2, vec![WallSet::CLOSED; 10]).expect("valid grid");
        assert_eq!(maze.start(), CellCoord::new(0, 0));
        assert_eq!(maze.end(), CellCoord::new(4, 1));
    }

    #[test]
    fn from_cells_rejects_wrong_shapes() {
        assert_eq!(
            Maze::from_cells(0, 3, Vec::new()),
            Err(MazeShapeError::EmptyGrid { columns: 0, rows: 3 })
        );
        assert_eq!(
            Maze::from_cells(2, 2, vec![WallSet::CLOSED; 3]),
            Err(MazeShapeError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn passage_respects_walls_and_borders() {
        let maze = corridor();
        let middle = CellCoord::new(1, 0);
        assert_eq!(maze.passage(middle, Direction::East), Some(CellCoord::new(2, 0)));
        assert_eq!(maze.passage(middle, Direction::West), Some(CellCoord::new(0, 0)));
        assert_eq!(maze.passage(middle, Direction::North), None);
        assert_eq!(maze.passage(CellCoord::new(2, 0), Direction::East), None);
    }

    #[test]
    fn builder_removes_walls_in_pairs() {
        let mut builder = MazeBuilder::new(2, 2);
        let carved = builder.carve(CellCoord::new(0, 0), Direction::South);
        assert_eq!(carved, Some(CellCoord::new(0, 1)));
        assert_eq!(builder.carve(CellCoord::new(1, 1), Direction::East), None);

        let maze = builder.build();
        let top = maze.walls(CellCoord::new(0, 0)).expect("in bounds");
        let bottom = maze.walls(CellCoord::new(0, 1)).expect("in bounds");
        assert!(!top.has(Direction::South));
        assert!(!bottom.has(Direction::North));
        assert_eq!(top.open_sides() + bottom.open_sides(), 2);
    }

    #[test]
    fn builder_clamps_empty_dimensions() {
        let maze = MazeBuilder::new(0, 0).build();
        assert_eq!((maze.columns(), maze.rows()), (1, 1));
        assert_eq!(maze.start(), maze.end());
    }

    #[test]
    fn step_stays_inside_grid() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::North, 3, 3), None);
        assert_eq!(origin.step(Direction::West, 3, 3), None);
        assert_eq!(origin.step(Direction::South, 3, 3), Some(CellCoord::new(0, 1)));
        assert_eq!(CellCoord::new(2, 2).step(Direction::East, 3, 3), None);
    }

    #[test]
    fn opposite_directions_pair_up() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn only_round_boundaries_produce_audio_cues() {
        assert_eq!(
            Event::RoundStarted { round: 1 }.audio_cue(),
            Some(AudioCue::RoundStarted)
        );
        assert_eq!(Event::TimeAdvanced { remaining: 3 }.audio_cue(), None);
        assert_eq!(
            Event::RoundEnded {
                round: 1,
                outcome: RoundOutcome::TimedOut,
                final_score: 0,
                high_score: 40,
            }
            .audio_cue(),
            Some(AudioCue::RoundEnded)
        );
    }

    #[test]
    fn maze_round_trips_through_bincode() {
        let maze = corridor();
        let bytes = bincode::serialize(&maze).expect("serialize");
        let restored: Maze = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, maze);
    }

    #[derive(Serialize)]
    struct ForgedMaze {
        columns: u32,
        rows: u32,
        cells: Vec<WallSet>,
        start: CellCoord,
        end: CellCoord,
    }

    fn decode(forged: &ForgedMaze) -> Result<Maze, bincode::Error> {
        let bytes = bincode::serialize(forged).expect("serialize");
        bincode::deserialize(&bytes)
    }

    #[test]
    fn malformed_maze_bytes_are_rejected() {
        let empty = ForgedMaze {
            columns: 0,
            rows: 0,
            cells: Vec::new(),
            start: CellCoord::new(0, 0),
            end: CellCoord::new(9, 9),
        };
        assert!(decode(&empty).is_err());

        let short = ForgedMaze {
            columns: 3,
            rows: 2,
            cells: vec![WallSet::CLOSED; 5],
            start: CellCoord::new(0, 0),
            end: CellCoord::new(2, 1),
        };
        assert!(decode(&short).is_err());

        let moved_end = ForgedMaze {
            columns: 3,
            rows: 1,
            cells: corridor().cells().to_vec(),
            start: CellCoord::new(0, 0),
            end: CellCoord::new(1, 0),
        };
        assert!(decode(&moved_end).is_err());

        let faithful = ForgedMaze {
            end: CellCoord::new(2, 0),
            ..moved_end
        };
        assert_eq!(decode(&faithful).expect("corner landmarks"), corridor());
    }
}
