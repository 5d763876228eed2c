//! Piece geometry - tetromino shapes, quarter-turn transforms, wall kicks
//!
//! A [`Piece`] is a cheap value: kind, rotation state, and a materialized
//! square occupancy grid. Rotating transforms the grid in place and steps
//! the rotation state, keeping the two consistent by construction.
//! Kick offsets live in four static tables (I family and J/L/S/T/Z family,
//! one per direction), indexed by the pre-rotation state.

use crate::types::{PieceKind, Rotation, TileColor};

/// Largest bounding-box side across all kinds (the I piece).
pub const MAX_BOX_SIDE: usize = 4;

const MAX_BOX_AREA: usize = MAX_BOX_SIDE * MAX_BOX_SIDE;

/// A single kick candidate: (row offset, col offset) applied to the anchor.
pub type KickOffset = (i32, i32);

/// Five kick candidates per pre-rotation state, identity first.
pub type KickSequence = [KickOffset; 5];

type KickTable = [KickSequence; 4];

/// I piece, clockwise, indexed by pre-rotation state.
const I_KICKS_CW: KickTable = [
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
    [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
];

/// I piece, counter-clockwise: the clockwise table advanced by one state.
const I_KICKS_CCW: KickTable = [
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
    [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
];

/// J/L/S/T/Z shared table, clockwise.
const JLSTZ_KICKS_CW: KickTable = [
    [(0, 0), (0, 1), (-1, -1), (2, 0), (2, -1)],
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
];

/// J/L/S/T/Z shared table, counter-clockwise.
const JLSTZ_KICKS_CCW: KickTable = [
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
    [(0, 0), (0, -1), (1, 1), (-2, 0), (-2, 1)],
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
];

/// O never rotates; its lookup degenerates to identity candidates.
const O_KICKS: KickSequence = [(0, 0); 5];

/// Spawn layout per kind: box side, tight footprint (rows, cols), and the
/// four filled cells inside the box, row-major from the top-left.
fn spawn_layout(kind: PieceKind) -> (usize, (usize, usize), [(usize, usize); 4]) {
    match kind {
        PieceKind::I => (4, (1, 4), [(1, 0), (1, 1), (1, 2), (1, 3)]),
        PieceKind::J => (3, (2, 3), [(0, 0), (1, 0), (1, 1), (1, 2)]),
        PieceKind::L => (3, (2, 3), [(0, 2), (1, 0), (1, 1), (1, 2)]),
        PieceKind::O => (2, (2, 2), [(0, 0), (0, 1), (1, 0), (1, 1)]),
        PieceKind::S => (3, (2, 3), [(0, 1), (0, 2), (1, 0), (1, 1)]),
        PieceKind::T => (3, (2, 3), [(0, 1), (1, 0), (1, 1), (1, 2)]),
        PieceKind::Z => (3, (2, 3), [(0, 0), (0, 1), (1, 1), (1, 2)]),
    }
}

/// A tetromino with its current rotation state and occupancy grid.
///
/// Pieces are plain values: spawning, rotation trials, and preview queries
/// all copy them freely. The board owns the active one and its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    box_side: usize,
    spawn_rows: usize,
    spawn_cols: usize,
    cells: [TileColor; MAX_BOX_AREA],
}

impl Piece {
    /// A fresh piece of `kind` in its spawn orientation.
    pub fn new(kind: PieceKind) -> Self {
        let (box_side, (spawn_rows, spawn_cols), minos) = spawn_layout(kind);
        let mut cells = [TileColor::Empty; MAX_BOX_AREA];
        for &(row, col) in &minos {
            cells[row * box_side + col] = kind.color();
        }
        Piece {
            kind,
            rotation: Rotation::North,
            box_side,
            spawn_rows,
            spawn_cols,
            cells,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> TileColor {
        self.kind.color()
    }

    /// Current rotation state.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Side length of the square bounding box (4 for I, 3 for J/L/S/T/Z, 2 for O).
    pub fn box_side(&self) -> usize {
        self.box_side
    }

    /// Rows of the tight spawn footprint (1 for I, 2 otherwise).
    ///
    /// Preview renderers center next/held pieces on the tight footprint
    /// rather than the bounding box.
    pub fn spawn_rows(&self) -> usize {
        self.spawn_rows
    }

    /// Columns of the tight spawn footprint (4 for I, 2 for O, 3 otherwise).
    pub fn spawn_cols(&self) -> usize {
        self.spawn_cols
    }

    /// Cell of the current occupancy grid at `(row, col)` within the box.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> TileColor {
        debug_assert!(row < self.box_side && col < self.box_side);
        self.cells[row * self.box_side + col]
    }

    /// Rotate the grid a quarter turn and step the rotation state.
    ///
    /// Clockwise maps `new[r][c] = old[side-1-c][r]`; counter-clockwise is
    /// the inverse, `new[r][c] = old[c][side-1-r]`. O pieces ignore the call.
    pub fn rotate(&mut self, clockwise: bool) {
        if self.kind == PieceKind::O {
            return;
        }

        let side = self.box_side;
        let old = self.cells;
        for row in 0..side {
            for col in 0..side {
                let src = if clockwise {
                    (side - 1 - col) * side + row
                } else {
                    col * side + (side - 1 - row)
                };
                self.cells[row * side + col] = old[src];
            }
        }

        self.rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
    }

    /// Kick candidates for rotating from the current (pre-rotation) state.
    ///
    /// The board tries these anchor offsets in order and commits the first
    /// collision-free one.
    pub fn kicks(&self, clockwise: bool) -> &'static KickSequence {
        match (self.kind, clockwise) {
            (PieceKind::O, _) => &O_KICKS,
            (PieceKind::I, true) => &I_KICKS_CW[self.rotation.index()],
            (PieceKind::I, false) => &I_KICKS_CCW[self.rotation.index()],
            (_, true) => &JLSTZ_KICKS_CW[self.rotation.index()],
            (_, false) => &JLSTZ_KICKS_CCW[self.rotation.index()],
        }
    }

    /// Filled cells as board-space offsets from the anchor, for callers that
    /// want to walk the shape without the empty padding.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let side = self.box_side;
        (0..side).flat_map(move |row| {
            (0..side).filter_map(move |col| {
                if self.cell(row, col).is_empty() {
                    None
                } else {
                    Some((row, col))
                }
            })
        })
    }
}
