//! Deterministic RNG service.
//!
//! One explicitly seeded ChaCha8 stream per draw concern, advanced in a
//! fixed order. Every peer seeds the same streams from the netgame seed
//! and replays the same draw sequence; any divergence desynchronizes the
//! match, so nothing else in the engine is allowed to own an RNG.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixed seed for the free-play equal-weight draw, so repeated
/// activations in that mode produce visually identical reels.
pub const FREE_PLAY_SEED: u64 = 0x4B41_5254_5245_454C;

/// Stream identifiers. Item draws and ring-box draws consume from
/// separate streams so adding one never shifts the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngStream {
    Items,
    RingBox,
}

pub struct RouletteRng {
    items: ChaCha8Rng,
    ringbox: ChaCha8Rng,
}

impl RouletteRng {
    /// Seed both streams from the shared netgame seed. Stream domains are
    /// separated by a constant so they never overlap.
    pub fn new(seed: u64) -> Self {
        Self {
            items: ChaCha8Rng::seed_from_u64(seed),
            ringbox: ChaCha8Rng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
        }
    }

    /// Uniform draw in `0..bound`. `bound` of 0 or 1 returns 0 without
    /// consuming from the stream, matching the original key semantics.
    pub fn draw(&mut self, stream: RngStream, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        let rng = match stream {
            RngStream::Items => &mut self.items,
            RngStream::RingBox => &mut self.ringbox,
        };
        rng.gen_range(0..bound)
    }
}
