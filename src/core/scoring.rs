//! Scoring module - line clear scores, drop bonuses, and the gravity curve
//!
//! All scores scale with the current level (1-based). Levels advance every
//! 10 cleared lines up to level 15; the session owns that counter, this
//! module owns the pure tables and the fall-speed formula.

/// Score for clearing `lines` rows with one lock, scaled by level:
/// 100 / 300 / 400 / 800 for 1..=4 lines.
///
/// One piece completes at most 4 rows and a lock with no full rows never
/// reaches the scorer, so any other count is a caller bug.
pub fn line_clear_score(lines: u32, level: u32) -> u32 {
    let base = match lines {
        1 => 100,
        2 => 300,
        3 => 400,
        4 => 800,
        _ => panic!("invalid line clear count: {lines}"),
    };
    base * level
}

/// Bonus per row descended under soft drop.
pub fn soft_drop_score(level: u32) -> u32 {
    level
}

/// Bonus for a hard drop across `rows` rows.
pub fn hard_drop_score(level: u32, rows: i32) -> u32 {
    2 * level * rows as u32
}

/// Seconds a piece takes to fall one row at the given level:
/// `(0.8 - (level - 1) * 0.007) ^ (level - 1)`.
///
/// Level 1 is exactly 1 second per row; level 15 is around 7 ms.
pub fn seconds_per_line(level: u32) -> f64 {
    (0.8 - (level - 1) as f64 * 0.007).powi(level as i32 - 1)
}
