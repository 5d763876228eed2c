//! Board module - grid storage, collision, movement, and line clearing
//!
//! The grid is a flat `Vec<TileColor>` in row-major order with 2 hidden rows
//! above the visible field, so row indices run from -2 to `n_rows - 1` and
//! the flat index is `(row + 2) * n_cols + col`. The board owns the active
//! piece and its anchor; all mutating operations are boolean: they either
//! apply fully or leave the board untouched.
//!
//! Out-of-range coordinates count as filled on all four sides, which is what
//! confines pieces to the field without any special-cased wall logic.

use arrayvec::ArrayVec;

use crate::core::pieces::Piece;
use crate::types::{PieceKind, TileColor, BOARD_COLS, BOARD_ROWS, HIDDEN_ROWS};

/// The playfield: visible rows plus a 2-row hidden spawn buffer on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    n_rows: i32,
    n_cols: i32,
    tiles: Vec<TileColor>,
    /// Grid as it will look after the pending rows are removed, built
    /// eagerly by the line scan so the clear can be applied atomically.
    tiles_after_clear: Vec<TileColor>,
    /// Full rows found by the last freeze, bottommost first. One freeze can
    /// complete at most 4 rows, and the session clears them before the next
    /// piece can lock.
    lines_to_clear: ArrayVec<i32, 4>,
    piece: Option<Piece>,
    row: i32,
    col: i32,
    ghost_row: i32,
}

impl Board {
    /// An empty board with the given visible dimensions.
    pub fn new(n_rows: i32, n_cols: i32) -> Self {
        assert!(n_rows > 0 && n_cols > 0, "board dimensions must be positive");
        let size = ((n_rows + HIDDEN_ROWS) * n_cols) as usize;
        Board {
            n_rows,
            n_cols,
            tiles: vec![TileColor::Empty; size],
            tiles_after_clear: vec![TileColor::Empty; size],
            lines_to_clear: ArrayVec::new(),
            piece: None,
            row: 0,
            col: 0,
            ghost_row: 0,
        }
    }

    /// Visible rows.
    pub fn n_rows(&self) -> i32 {
        self.n_rows
    }

    /// Columns.
    pub fn n_cols(&self) -> i32 {
        self.n_cols
    }

    /// Tile at `(row, col)`; row may reach into the hidden buffer (-2..0).
    ///
    /// Panics on out-of-range coordinates - querying outside the grid is a
    /// caller bug, not a runtime condition.
    pub fn tile_at(&self, row: i32, col: i32) -> TileColor {
        self.tiles[self.tile_index(row, col)]
    }

    /// The active piece, if one is in play.
    pub fn active(&self) -> Option<Piece> {
        self.piece
    }

    /// Anchor row of the active piece. Meaningful while [`active`](Self::active)
    /// is `Some`.
    pub fn piece_row(&self) -> i32 {
        self.row
    }

    /// Anchor column of the active piece.
    pub fn piece_col(&self) -> i32 {
        self.col
    }

    /// Lowest anchor row the active piece can reach by falling straight
    /// down from its current column.
    pub fn ghost_row(&self) -> i32 {
        self.ghost_row
    }

    /// Rows pending clearance since the last freeze, bottommost first.
    pub fn lines_to_clear(&self) -> &[i32] {
        &self.lines_to_clear
    }

    /// Reset every cell to empty and drop any pending clear.
    ///
    /// The ghost row is recomputed if a piece is active, since the stack
    /// under it just vanished.
    pub fn clear(&mut self) {
        self.tiles.fill(TileColor::Empty);
        self.tiles_after_clear.fill(TileColor::Empty);
        self.lines_to_clear.clear();
        self.update_ghost_row();
    }

    /// Replace the active piece with a fresh `kind` at the spawn position:
    /// horizontally centered, anchored at the top of the hidden buffer, then
    /// nudged down up to 1 row (I) or 2 rows (others) while space allows, so
    /// pieces appear just above the stack instead of fully off-screen.
    ///
    /// Returns false if even the initial position collides (topped out). The
    /// colliding piece is left in place so a renderer can show the overlap;
    /// the ghost row is pinned to the spawn row.
    pub fn spawn_piece(&mut self, kind: PieceKind) -> bool {
        let piece = Piece::new(kind);
        self.row = -HIDDEN_ROWS;
        self.col = (self.n_cols - piece.box_side() as i32) / 2;

        if !self.is_position_possible(self.row, self.col, &piece) {
            self.piece = Some(piece);
            self.ghost_row = self.row;
            return false;
        }

        let max_nudge = if kind == PieceKind::I { 1 } else { 2 };
        for _ in 0..max_nudge {
            if !self.is_position_possible(self.row + 1, self.col, &piece) {
                break;
            }
            self.row += 1;
        }

        self.piece = Some(piece);
        self.update_ghost_row();
        true
    }

    /// Shift the active piece horizontally; false if blocked or no piece.
    pub fn move_horizontal(&mut self, d_col: i32) -> bool {
        let Some(piece) = self.piece else {
            return false;
        };
        if !self.is_position_possible(self.row, self.col + d_col, &piece) {
            return false;
        }
        self.col += d_col;
        self.update_ghost_row();
        true
    }

    /// Shift the active piece vertically; false if blocked or no piece.
    ///
    /// No ghost recompute: a vertical move does not change the column.
    pub fn move_vertical(&mut self, d_row: i32) -> bool {
        let Some(piece) = self.piece else {
            return false;
        };
        if !self.is_position_possible(self.row + d_row, self.col, &piece) {
            return false;
        }
        self.row += d_row;
        true
    }

    /// Rotate the active piece a quarter turn, trying the kick offsets of
    /// its pre-rotation state in order and committing the first anchor that
    /// fits. False (no state change) if every kick collides, the piece is O,
    /// or there is no piece.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        let Some(current) = self.piece else {
            return false;
        };
        if current.kind() == PieceKind::O {
            return false;
        }

        let mut rotated = current;
        rotated.rotate(clockwise);

        for &(d_row, d_col) in current.kicks(clockwise) {
            if self.is_position_possible(self.row + d_row, self.col + d_col, &rotated) {
                self.piece = Some(rotated);
                self.row += d_row;
                self.col += d_col;
                self.update_ghost_row();
                return true;
            }
        }

        false
    }

    /// Teleport the active piece to its ghost row; returns rows traversed.
    pub fn hard_drop(&mut self) -> i32 {
        if self.piece.is_none() {
            return 0;
        }
        let rows_passed = self.ghost_row - self.row;
        self.row = self.ghost_row;
        rows_passed
    }

    /// True iff moving the active piece one row down would collide.
    ///
    /// With no active piece this is false: nothing can be grounded, so lock
    /// evaluation during the line-clear pause stays inert.
    pub fn is_on_ground(&self) -> bool {
        match self.piece {
            Some(piece) => !self.is_position_possible(self.row + 1, self.col, &piece),
            None => false,
        }
    }

    /// Commit the active piece into the grid, scan for full rows, and drop
    /// the piece. Returns false if no committed cell reached the visible
    /// field - the piece froze entirely in the hidden buffer, which the
    /// session treats as game over.
    pub fn freeze_piece(&mut self) -> bool {
        let Some(piece) = self.piece.take() else {
            return false;
        };

        let mut below_skyline = false;
        for (cell_row, cell_col) in piece.filled_cells() {
            let row = self.row + cell_row as i32;
            let col = self.col + cell_col as i32;
            if row >= 0 {
                below_skyline = true;
            }
            self.set_tile(row, col, piece.color());
        }

        self.find_lines_to_clear();
        below_skyline
    }

    /// Apply the post-clear snapshot prepared by the last freeze. No-op when
    /// nothing is pending.
    pub fn clear_lines(&mut self) {
        if self.lines_to_clear.is_empty() {
            return;
        }
        self.lines_to_clear.clear();
        self.tiles.copy_from_slice(&self.tiles_after_clear);
    }

    /// Collision predicate: every filled cell of `piece`, anchored at
    /// `(row, col)`, must land on an unfilled in-range cell. Coordinates
    /// outside the grid (including above the hidden buffer) count as filled.
    pub fn is_position_possible(&self, row: i32, col: i32, piece: &Piece) -> bool {
        for (cell_row, cell_col) in piece.filled_cells() {
            if self.is_tile_filled(row + cell_row as i32, col + cell_col as i32) {
                return false;
            }
        }
        true
    }

    #[inline]
    fn tile_index(&self, row: i32, col: i32) -> usize {
        debug_assert!(
            (-HIDDEN_ROWS..self.n_rows).contains(&row) && (0..self.n_cols).contains(&col),
            "tile index out of range: ({row}, {col})"
        );
        ((row + HIDDEN_ROWS) * self.n_cols + col) as usize
    }

    #[inline]
    fn is_tile_filled(&self, row: i32, col: i32) -> bool {
        if col < 0 || col >= self.n_cols || row < -HIDDEN_ROWS || row >= self.n_rows {
            return true;
        }
        !self.tile_at(row, col).is_empty()
    }

    fn set_tile(&mut self, row: i32, col: i32, color: TileColor) {
        let index = self.tile_index(row, col);
        self.tiles[index] = color;
    }

    fn update_ghost_row(&mut self) {
        let Some(piece) = self.piece else {
            return;
        };
        let mut ghost = self.row;
        while self.is_position_possible(ghost + 1, self.col, &piece) {
            ghost += 1;
        }
        self.ghost_row = ghost;
    }

    /// Bottom-up scan for full rows. Records them bottommost-first and
    /// builds `tiles_after_clear`: each surviving row shifts down by the
    /// number of full rows below it, and the top fills with empty rows.
    fn find_lines_to_clear(&mut self) {
        self.lines_to_clear.clear();
        self.tiles_after_clear.copy_from_slice(&self.tiles);

        let n_cols = self.n_cols as usize;
        let mut lines_cleared = 0usize;

        for row in (-HIDDEN_ROWS..self.n_rows).rev() {
            let full = (0..self.n_cols).all(|col| self.is_tile_filled(row, col));
            if full {
                self.lines_to_clear.push(row);
                lines_cleared += 1;
            } else if lines_cleared > 0 {
                let src = self.tile_index(row, 0);
                let dst = src + lines_cleared * n_cols;
                self.tiles_after_clear[dst..dst + n_cols]
                    .copy_from_slice(&self.tiles[src..src + n_cols]);
            }
        }

        for tile in &mut self.tiles_after_clear[..lines_cleared * n_cols] {
            *tile = TileColor::Empty;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_ROWS, BOARD_COLS)
    }
}

#[cfg(test)]
impl Board {
    /// Write a tile directly, bypassing piece placement.
    pub fn set_tile_raw(&mut self, row: i32, col: i32, color: TileColor) {
        self.set_tile(row, col, color);
    }

    /// Fill a whole row except the listed columns.
    pub fn fill_row_except(&mut self, row: i32, open_cols: &[i32], color: TileColor) {
        for col in 0..self.n_cols {
            if !open_cols.contains(&col) {
                self.set_tile(row, col, color);
            }
        }
    }
}
