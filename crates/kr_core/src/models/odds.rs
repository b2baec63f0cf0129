//! Static per-mode odds tables.
//!
//! Each entry pairs a catalog item with an `ideal_power` (the fixed-point
//! distance band the item is tuned for) and a `dupe_tolerance` controlling
//! how harshly repeated picks are penalized (1 = rare, 5 = common).
//! Pure data, loaded once, read-only afterwards.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::engine::types::fixed::{fixed_int, Fixed};
use crate::models::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Standard circuit race.
    Race,
    /// Elimination battle. Table is score-based, not power-ordered.
    Battle,
    /// Special / retro stages: tiny utility-only table.
    SpecialRetro,
}

impl GameMode {
    /// Whether the mode's table is ordered by power, which the weak-item
    /// filter requires to be meaningful.
    pub fn power_ordered(self) -> bool {
        !matches!(self, GameMode::Battle)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OddsEntry {
    pub item: Item,
    /// Distance band (fixed-point units) this item is tuned for.
    pub ideal_power: Fixed,
    /// 1..=5. Harsh repeat penalty at 1, mild at 5.
    pub dupe_tolerance: u8,
}

const fn entry(item: Item, ideal_units: i32, dupe_tolerance: u8) -> OddsEntry {
    OddsEntry { item, ideal_power: fixed_int(ideal_units), dupe_tolerance }
}

static RACE_ODDS: Lazy<Vec<OddsEntry>> = Lazy::new(|| {
    vec![
        entry(Item::LandMine, 600, 3),
        entry(Item::OilSlick, 1200, 5),
        entry(Item::FakeItem, 1600, 3),
        entry(Item::Orbital, 2000, 5),
        entry(Item::TripleOilSlick, 2400, 3),
        entry(Item::GachaBloom, 2600, 3),
        entry(Item::Seeker, 3000, 4),
        entry(Item::Mine, 3200, 2),
        entry(Item::Boost, 3500, 5),
        entry(Item::BubbleShield, 3800, 1),
        entry(Item::TripleOrbital, 4000, 3),
        entry(Item::LightningShield, 4200, 1),
        entry(Item::Bombard, 4400, 2),
        entry(Item::FlameShield, 4600, 1),
        entry(Item::DualSeeker, 4800, 3),
        entry(Item::Ghost, 5000, 2),
        entry(Item::TripleGachaBloom, 5200, 2),
        entry(Item::TripleBoost, 5500, 4),
        entry(Item::TenOilSlick, 6000, 1),
        entry(Item::SixOrbital, 6500, 2),
        entry(Item::RocketBoost, 7000, 2),
        entry(Item::Grow, 7500, 1),
        entry(Item::Shrink, 8000, 1),
        entry(Item::Invincibility, 9000, 1),
        entry(Item::HomingDart, 9900, 1),
        // Out-of-band catch-up currency; ideal is unused for scoring.
        entry(Item::SuperRing, 0, 5),
    ]
});

static BATTLE_ODDS: Lazy<Vec<OddsEntry>> = Lazy::new(|| {
    // Battle ideals are score-difference bands; the table is deliberately
    // NOT power-ordered and the weak-item filter must skip it.
    vec![
        entry(Item::Orbital, 1000, 5),
        entry(Item::Invincibility, 4500, 1),
        entry(Item::OilSlick, 800, 5),
        entry(Item::Mine, 2200, 3),
        entry(Item::TripleOrbital, 2600, 3),
        entry(Item::Seeker, 1800, 4),
        entry(Item::Grow, 4000, 1),
        entry(Item::Bombard, 3000, 2),
        entry(Item::TripleOilSlick, 1400, 4),
        entry(Item::LightningShield, 3400, 1),
        entry(Item::BubbleShield, 3200, 1),
        entry(Item::FlameShield, 3600, 1),
        entry(Item::GachaBloom, 1200, 4),
    ]
});

static SPECIAL_ODDS: Lazy<Vec<OddsEntry>> = Lazy::new(|| {
    vec![
        entry(Item::SuperRing, 0, 5),
        entry(Item::Boost, 2000, 5),
        entry(Item::TripleBoost, 4000, 3),
        entry(Item::RocketBoost, 6000, 2),
    ]
});

/// Odds table for a mode. Process-wide, immutable after first access.
pub fn odds_table(mode: GameMode) -> &'static [OddsEntry] {
    match mode {
        GameMode::Race => &RACE_ODDS,
        GameMode::Battle => &BATTLE_ODDS,
        GameMode::SpecialRetro => &SPECIAL_ODDS,
    }
}

/// Table lookup by item. `None` when the item is structurally unavailable
/// for the mode.
pub fn odds_for(mode: GameMode, item: Item) -> Option<OddsEntry> {
    odds_table(mode).iter().copied().find(|e| e.item == item)
}

/// Clamp a 1-based position rank to what a mode's lobby can hold.
/// Out-of-range ranks are a caller bug in debug builds and are clamped in
/// release so a table lookup can never index out of bounds.
pub fn clamp_position(position: u8, playing: u8) -> u8 {
    let max = playing.max(1);
    debug_assert!(
        position >= 1 && position <= max,
        "position {} out of range for {} players",
        position,
        max
    );
    position.clamp(1, max)
}
