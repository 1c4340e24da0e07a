#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Sprint adapters.

pub mod text;

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_sprint_core::{
    BonusKind, CellCoord, Direction, Intent, Maze, Phase, SessionSnapshot, GRID_COLUMNS, GRID_ROWS,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors shared by every backend.
pub mod palette {
    use super::Color;

    /// Frame background.
    pub const BACKGROUND: Color = Color::from_rgb_u8(18, 18, 24);
    /// Maze walls.
    pub const WALL: Color = Color::from_rgb_u8(220, 220, 230);
    /// Player avatar.
    pub const AVATAR: Color = Color::from_rgb_u8(80, 170, 255);
    /// Goal marker on the end cell.
    pub const GOAL: Color = Color::from_rgb_u8(90, 220, 120);
    /// Lollipop bonus.
    pub const LOLLIPOP: Color = Color::from_rgb_u8(255, 105, 180);
    /// Ice-cream bonus.
    pub const ICE_CREAM: Color = Color::from_rgb_u8(255, 240, 200);
    /// Heads-up display and banner text.
    pub const TEXT: Color = Color::from_rgb_u8(255, 255, 255);
    /// Floating award text.
    pub const AWARD: Color = Color::from_rgb_u8(255, 215, 0);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Intents detected on this frame, in the order they were pressed.
    pub intents: Vec<Intent>,
}

/// Pixel geometry of the maze board inside a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    /// Top-left corner of the board in screen space.
    pub origin: Vec2,
    /// Size of a single cell in whole pixels.
    pub cell_size: Vec2,
    columns: u32,
    rows: u32,
}

impl BoardLayout {
    /// Fits a `columns` by `rows` board into a `width` by `height` viewport.
    ///
    /// Cell sizes are truncated to whole pixels and the board is centred
    /// horizontally.
    pub fn fit(columns: u32, rows: u32, width: f32, height: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyBoard { columns, rows });
        }

        let cell_size = Vec2::new(
            (width / columns as f32).floor(),
            (height / rows as f32).floor(),
        );
        if cell_size.x < 1.0 || cell_size.y < 1.0 {
            return Err(RenderingError::ViewportTooSmall { width, height });
        }

        let board_width = cell_size.x * columns as f32;
        Ok(Self {
            origin: Vec2::new(((width - board_width) / 2.0).floor(), 0.0),
            cell_size,
            columns,
            rows,
        })
    }

    /// Size of the whole board in pixels.
    #[must_use]
    pub fn board_size(&self) -> Vec2 {
        self.cell_size * Vec2::new(self.columns as f32, self.rows as f32)
    }

    /// Maps a point expressed in cell units to screen space.
    #[must_use]
    pub fn to_screen(&self, grid_point: Vec2) -> Vec2 {
        self.origin + grid_point * self.cell_size
    }

    /// Screen-space centre of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.to_screen(Vec2::new(
            cell.column() as f32 + 0.5,
            cell.row() as f32 + 0.5,
        ))
    }
}

/// Wall edge expressed in cell units, where `(c, r)` is the top-left corner of cell `(c, r)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Start of the edge.
    pub from: Vec2,
    /// End of the edge.
    pub to: Vec2,
}

/// Collects the wall edges of `maze` without drawing any edge twice.
///
/// Top edges come only from the first row and left edges only from the first
/// column; every other edge is the right or bottom side of some cell.
#[must_use]
pub fn wall_segments(maze: &Maze) -> Vec<WallSegment> {
    let mut segments = Vec::new();

    for cell in maze.coordinates() {
        let Some(walls) = maze.walls(cell) else {
            continue;
        };
        let left = cell.column() as f32;
        let top = cell.row() as f32;
        let right = left + 1.0;
        let bottom = top + 1.0;

        if cell.row() == 0 && walls.has(Direction::North) {
            segments.push(segment((left, top), (right, top)));
        }
        if cell.column() == 0 && walls.has(Direction::West) {
            segments.push(segment((left, top), (left, bottom)));
        }
        if walls.has(Direction::East) {
            segments.push(segment((right, top), (right, bottom)));
        }
        if walls.has(Direction::South) {
            segments.push(segment((left, bottom), (right, bottom)));
        }
    }

    segments
}

fn segment(from: (f32, f32), to: (f32, f32)) -> WallSegment {
    WallSegment {
        from: Vec2::new(from.0, from.1),
        to: Vec2::new(to.0, to.1),
    }
}

/// Visible bonus item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BonusSprite {
    /// Kind of the item.
    pub kind: BonusKind,
    /// Cell the item occupies.
    pub cell: CellCoord,
    /// Fill color of the item.
    pub color: Color,
}

/// Award text shown above a freshly collected item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatingText {
    /// Text to draw, such as `+5000`.
    pub text: String,
    /// Cell the text hovers over.
    pub cell: CellCoord,
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Current score.
    pub score: u64,
    /// Best score of the process.
    pub high_score: u64,
    /// Rounds started.
    pub round: u32,
    /// Seconds left on the clock.
    pub time_remaining: u32,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {}   High: {}   Round: {}   Time: {}",
            self.score, self.high_score, self.round, self.time_remaining
        )
    }
}

/// Full-screen message shown outside a running round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// No round has been played yet.
    PressEnterToStart,
    /// A round just finished.
    GameOver,
}

impl Banner {
    /// Text drawn for the banner.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::PressEnterToStart => "Press Enter to start",
            Self::GameOver => "Game over",
        }
    }
}

/// Scene description derived from a session snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Columns of the board.
    pub columns: u32,
    /// Rows of the board.
    pub rows: u32,
    /// Wall edges in cell units.
    pub walls: Vec<WallSegment>,
    /// Cell occupied by the player.
    pub avatar: Option<CellCoord>,
    /// Goal marker, present only on frames where it is lit.
    pub goal: Option<CellCoord>,
    /// Bonus items currently visible.
    pub bonuses: Vec<BonusSprite>,
    /// Award texts for recently collected items.
    pub floating_texts: Vec<FloatingText>,
    /// Heads-up display values.
    pub hud: Hud,
    /// Banner shown outside a running round.
    pub banner: Option<Banner>,
}

impl Scene {
    /// Scene shown before the first round: an empty board with the start banner.
    #[must_use]
    pub fn empty(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            walls: Vec::new(),
            avatar: None,
            goal: None,
            bonuses: Vec::new(),
            floating_texts: Vec::new(),
            hud: Hud::default(),
            banner: Some(Banner::PressEnterToStart),
        }
    }

    /// Builds the scene for `snapshot`, sized to its maze, or an empty gameplay-sized
    /// board before the first round.
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let time_remaining = snapshot.time_remaining.unwrap_or(0);
        let mut scene = match snapshot.maze.as_deref() {
            Some(maze) => Self {
                columns: maze.columns(),
                rows: maze.rows(),
                walls: wall_segments(maze),
                avatar: snapshot.current_cell,
                goal: (time_remaining % 2 == 0).then(|| maze.end()),
                ..Self::empty(maze.columns(), maze.rows())
            },
            None => Self::empty(GRID_COLUMNS, GRID_ROWS),
        };

        for kind in BonusKind::ALL {
            let Some(item) = snapshot.bonus(kind) else {
                continue;
            };
            if item.visible {
                scene.bonuses.push(BonusSprite {
                    kind,
                    cell: item.location,
                    color: bonus_color(kind),
                });
            }
            if item.just_collected {
                scene.floating_texts.push(FloatingText {
                    text: format!("+{}", kind.score_award()),
                    cell: item.location,
                });
            }
        }

        scene.hud = Hud {
            score: snapshot.score,
            high_score: snapshot.high_score,
            round: snapshot.round,
            time_remaining,
        };
        scene.banner = match snapshot.phase {
            Phase::Idle => Some(Banner::PressEnterToStart),
            Phase::Running => None,
            Phase::RoundEnd => Some(Banner::GameOver),
        };
        scene
    }
}

/// Fill color of a bonus item.
#[must_use]
pub const fn bonus_color(kind: BonusKind) -> Color {
    match kind {
        BonusKind::Lollipop => palette::LOLLIPOP,
        BonusKind::IceCream => palette::ICE_CREAM,
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window width in pixels.
    pub window_width: u32,
    /// Initial window height in pixels.
    pub window_height: u32,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, window_width: u32, window_height: u32, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_width,
            window_height,
            clear_color: palette::BACKGROUND,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Sprint scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// intents captured by the adapter, and replaces the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The board has no cells to lay out.
    EmptyBoard {
        /// Requested columns.
        columns: u32,
        /// Requested rows.
        rows: u32,
    },
    /// The viewport cannot fit one pixel per cell.
    ViewportTooSmall {
        /// Viewport width in pixels.
        width: f32,
        /// Viewport height in pixels.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard { columns, rows } => {
                write!(f, "board must have cells (received {columns}x{rows})")
            }
            Self::ViewportTooSmall { width, height } => {
                write!(f, "viewport {width}x{height} is too small for the board")
            }
        }
    }
}

impl Error for RenderingError {}
