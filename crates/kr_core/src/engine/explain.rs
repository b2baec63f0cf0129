//! Reel build explanation.
//!
//! Serializable trace of one reel build: what the scoring saw, which
//! adjustments fired, and the per-item counts before the reel was laid
//! out. Debug/HUD surface only; nothing in the engine reads it back.

use serde::{Deserialize, Serialize};

use crate::engine::types::fixed::Fixed;
use crate::models::item::Item;

/// Final score of one candidate after all adjustments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandidateScore {
    pub item: Item,
    /// |ideal - target| after loneliness, breakaway and dupe penalties.
    pub delta: Fixed,
    /// Entries this item received in the reel.
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelExplain {
    /// The power band the build aimed for.
    pub target_power: Fixed,
    /// Loneliness bias applied (no attackable racer in range).
    pub lonely: bool,
    /// Multiplier applied to interaction-item deltas when lonely.
    pub lonely_mult: Fixed,
    /// Breakaway punisher unlocked (1st-to-2nd gap over threshold).
    pub breakaway: bool,
    /// Catch-up currency stack size, 0 when out of ring range.
    pub popcorn: u8,
    /// Items the weak-item filter removed after counting.
    pub weak_filtered: Vec<Item>,
    /// Fallback paths that fired instead of normal scoring.
    pub path: BuildPath,
    /// Per-item scores and final counts, scoring order.
    pub candidates: Vec<CandidateScore>,
}

/// Which construction path produced the reel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPath {
    /// Full dynamic scoring.
    #[default]
    Scored,
    /// Solo session, fixed hand for the mode.
    SoloHand,
    /// Free-play equal-weight draw.
    FreePlay,
    /// Debug forced item.
    Forced,
    /// Everything filtered out; sentinel fallback.
    Fallback,
}

impl ReelExplain {
    pub fn count_of(&self, item: Item) -> u32 {
        self.candidates
            .iter()
            .find(|c| c.item == item)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}
