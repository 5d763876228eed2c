//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomizer: every window of 7 draws aligned to a
//! bag boundary contains each piece kind exactly once. The bag holds two
//! halves of 7 so the next half is already shuffled while the current one
//! drains, which keeps [`PieceBag::peek`] valid at every point.
//!
//! Also provides a simple LCG so the whole game is deterministic per seed.

use crate::types::PieceKind;

/// Kinds per bag half.
const BAG_SIZE: usize = PieceKind::ALL.len();

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Double-bag piece generator: 14 slots, the active half in front and a
/// pre-shuffled half on deck behind it.
#[derive(Debug, Clone)]
pub struct PieceBag {
    kinds: [PieceKind; 2 * BAG_SIZE],
    /// Cursor into the active half; stays in 0..7 between calls.
    next: usize,
    rng: SimpleRng,
}

impl PieceBag {
    /// Create a new bag with both halves shuffled from the given seed.
    pub fn new(seed: u32) -> Self {
        let mut kinds = [PieceKind::I; 2 * BAG_SIZE];
        kinds[..BAG_SIZE].copy_from_slice(&PieceKind::ALL);
        kinds[BAG_SIZE..].copy_from_slice(&PieceKind::ALL);
        let mut bag = Self {
            kinds,
            next: 0,
            rng: SimpleRng::new(seed),
        };
        bag.reshuffle();
        bag
    }

    /// Take the next kind. When the active half drains, the on-deck half
    /// slides forward and a freshly shuffled half takes its place, so the
    /// cursor never points past slot 6.
    pub fn draw(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next += 1;
        if self.next == BAG_SIZE {
            self.kinds.copy_within(BAG_SIZE.., 0);
            self.rng.shuffle(&mut self.kinds[BAG_SIZE..]);
            self.next = 0;
        }
        kind
    }

    /// The kind the next [`draw`](Self::draw) will return.
    pub fn peek(&self) -> PieceKind {
        self.kinds[self.next]
    }

    /// Re-shuffle both halves in place without moving the cursor.
    ///
    /// Used on restart: the sequence changes but leftover slots before the
    /// cursor are simply never revisited.
    pub fn reshuffle(&mut self) {
        let (first, second) = self.kinds.split_at_mut(BAG_SIZE);
        self.rng.shuffle(first);
        self.rng.shuffle(second);
    }

    /// A uniformly random kind out of the active half, independent of the
    /// cursor. Does not consume a draw.
    pub fn random_kind(&mut self) -> PieceKind {
        self.kinds[self.rng.next_range(BAG_SIZE as u32) as usize]
    }
}
