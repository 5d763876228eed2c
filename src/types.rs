//! Shared types and tuning constants
//!
//! Pure data definitions used by every layer of the rules engine. Nothing in
//! here depends on the board or the session, so rendering/input collaborators
//! can consume these types without pulling in game logic.
//!
//! # Coordinates
//!
//! Board coordinates are `(row, col)` with row 0 at the top of the *visible*
//! field. Two hidden rows sit above it at rows -1 and -2, used as spawn and
//! rotation headroom, so row indices are signed.
//!
//! # Timing constants
//!
//! All durations are in seconds; the session advances them by a fixed
//! timestep per `update` call.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TIME_STEP_SECS` | 0.005 | Fixed update interval (200 Hz driver) |
//! | `DAS_DELAY_SECS` | 0.15 | Held direction: delay before auto-repeat |
//! | `ARR_INTERVAL_SECS` | 0.05 | Held direction: interval between repeats |
//! | `LOCK_DELAY_SECS` | 0.4 | Grounded piece: grace period before lock |
//! | `LINE_CLEAR_PAUSE_SECS` | 0.3 | Pause while cleared rows resolve |

/// Visible board height in rows (default match size).
pub const BOARD_ROWS: i32 = 20;

/// Visible board width in columns (default match size).
pub const BOARD_COLS: i32 = 10;

/// Hidden rows above the visible field (rows -1 and -2).
pub const HIDDEN_ROWS: i32 = 2;

/// Default fixed timestep handed to [`update`](crate::core::GameSession::update),
/// in seconds.
pub const DEFAULT_TIME_STEP_SECS: f64 = 0.005;

/// DAS: how long a direction must be held before auto-repeat kicks in.
pub const DAS_DELAY_SECS: f64 = 0.15;

/// ARR: interval between auto-repeated shifts once DAS has elapsed.
pub const ARR_INTERVAL_SECS: f64 = 0.05;

/// Gravity divisor while soft drop is held (20x normal fall speed).
pub const SOFT_DROP_SPEED_FACTOR: f64 = 20.0;

/// How long a grounded piece may sit before it locks.
pub const LOCK_DELAY_SECS: f64 = 0.4;

/// Maximum successful moves/rotations while grounded before a forced lock.
///
/// Prevents stalling a grounded piece forever with repeated taps.
pub const LOCK_MOVE_LIMIT: u32 = 15;

/// Pause between detecting full rows and compacting them away.
pub const LINE_CLEAR_PAUSE_SECS: f64 = 0.3;

/// Cumulative lines needed per level step (level N ends at `10 * N` lines).
pub const LINES_PER_LEVEL: u32 = 10;

/// Lowest valid starting level.
pub const MIN_LEVEL: u32 = 1;

/// Level cap; gravity stops accelerating here.
pub const MAX_LEVEL: u32 = 15;

/// Color of a single board tile or piece cell.
///
/// Doubles as the occupancy marker: a cell is filled iff it is not `Empty`.
/// The seven piece colors map 1:1 onto [`PieceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Empty,
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

impl TileColor {
    /// True for the unfilled marker.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == TileColor::Empty
    }
}

/// The seven tetromino kinds.
///
/// Absence of an active piece is modeled as `Option<Piece>` on the board,
/// not as a sentinel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in canonical order; the bag starts from this arrangement.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Fill color of this kind.
    ///
    /// ```
    /// use quadfall::types::{PieceKind, TileColor};
    ///
    /// assert_eq!(PieceKind::I.color(), TileColor::Cyan);
    /// assert_eq!(PieceKind::T.color(), TileColor::Purple);
    /// ```
    pub fn color(self) -> TileColor {
        match self {
            PieceKind::I => TileColor::Cyan,
            PieceKind::J => TileColor::Blue,
            PieceKind::L => TileColor::Orange,
            PieceKind::O => TileColor::Yellow,
            PieceKind::S => TileColor::Green,
            PieceKind::T => TileColor::Purple,
            PieceKind::Z => TileColor::Red,
        }
    }
}

/// Rotation states of a piece.
///
/// - `North`: spawn orientation (state 0)
/// - `East`: one clockwise quarter turn (state 1)
/// - `South`: half turn (state 2)
/// - `West`: three clockwise quarter turns (state 3)
///
/// The cycle wraps in both directions: North -> East -> South -> West -> North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Next state clockwise.
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Next state counter-clockwise.
    pub fn rotate_ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Numeric state 0..=3, used to index kick tables by pre-rotation state.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Ongoing horizontal motion, for DAS/ARR bookkeeping and conflict
/// resolution when both directions are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    None,
    Left,
    Right,
}

/// Discrete action events a collaborator can feed into the session.
///
/// Continuous inputs (soft drop, move left/right) travel as booleans on
/// [`update`](crate::core::GameSession::update) instead, since they need
/// per-tick held/released tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Rotate the active piece a quarter turn clockwise.
    RotateCw,
    /// Rotate the active piece a quarter turn counter-clockwise.
    RotateCcw,
    /// Drop the active piece to its ghost row and lock immediately.
    HardDrop,
    /// Swap the active piece with the held piece.
    Hold,
}
