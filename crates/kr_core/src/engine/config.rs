//! Roulette tuning configuration.
//!
//! Every empirically-tuned constant of the dynamic-odds model lives here
//! as a field with a documented default, so balance passes never touch
//! the algorithm. Only the *shape* of the scaling (monotonic, bounded) is
//! a contract; the numbers are knobs.

use serde::{Deserialize, Serialize};

use crate::engine::types::fixed::{fixed_int, Fixed, FRACUNIT};
use crate::models::item::{Item, ItemKind};

/// Simulation ticks per second.
pub const TICRATE: u32 = 35;

/// All tuning knobs for the dynamic odds model and the spin state machine.
/// Partial JSON overlays are fine; omitted fields keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteTuning {
    // === Reel building ===
    /// Number of entries drawn into a reel (default: 15)
    pub reel_size: usize,
    /// Lobby size the distance spread is normalized to (default: 8)
    pub nominal_lobby: u8,
    /// How strongly a high experience grade narrows the effective gap
    /// (fixed fraction of FRACUNIT, default: 0.35)
    pub grade_narrowing: Fixed,
    /// Captured distances are clamped to this ceiling (default: 15000 units)
    pub max_dist: Fixed,
    /// Frantic mode: widen every effective gap so outcomes swing harder
    /// (default: off)
    pub frantic: bool,
    /// Gap multiplier applied in frantic mode (default: 1.5x)
    pub frantic_mult: Fixed,
    /// Target power ceiling after scaling (default: 12000 units)
    pub power_ceiling: Fixed,
    /// Delta ceiling after every adjustment (default: 12000 units)
    pub delta_ceiling: Fixed,

    // === Loneliness bias ===
    /// Gap to nearest attacker/victim beyond which a racer counts as
    /// lonely (default: 1800 units)
    pub lonely_range: Fixed,
    /// Maximum delta inflation applied to interaction items when lonely
    /// (default: 2.5x)
    pub lonely_mult_max: Fixed,
    /// Within this gap to the leader no loneliness applies
    /// (default: 750 units)
    pub near_leader_dist: Fixed,

    // === Breakaway punisher ===
    /// 1st-to-2nd gap beyond which the breakaway item unlocks
    /// (default: 3000 units)
    pub breakaway_gap: Fixed,

    // === Duplicate penalties ===
    /// Base delta penalty per repeated pick, divided by the item's
    /// dupe tolerance (default: 2400 units)
    pub dupe_penalty: Fixed,

    // === Weak-item filter ===
    /// Items whose ideal power sits this far below the candidate mean are
    /// rejected (default: 1200 units)
    pub weak_margin: Fixed,

    // === Catch-up currency ===
    /// SuperRing is only offered within this distance of the leader's pace
    /// (default: 4000 units)
    pub ring_ceiling: Fixed,
    /// One extra ring per this much distance behind (default: 800 units)
    pub ring_step: Fixed,
    /// Hard cap on the currency stack (default: 8)
    pub popcorn_max: u8,

    // === Eligibility timing windows ===
    /// Trap items are barred while race time is under this (default: 5s)
    pub trap_start_window: u32,
    /// Disruptive items are barred once the leader is within this distance
    /// of the finish (default: 1500 units)
    pub finish_cutoff: Fixed,
    /// Expert-gated items require a grade at or below this (default: 0.5)
    pub expert_grade_max: Fixed,

    // === Spin state machine ===
    /// Minimum ticks before any confirm is honored (default: 20)
    pub confirm_min: u32,
    /// Absolute forced-confirm tick count (default: 10s)
    pub confirm_timeout: u32,
    /// Autoroulette accessibility confirm tick (default: 70)
    pub auto_confirm: u32,
    /// Fastest spin period in ticks (default: 2)
    pub speed_fastest: u32,
    /// Slowest spin period in ticks (default: 8)
    pub speed_slowest: u32,
    /// Distance units per one period step toward fastest (default: 2000)
    pub speed_band: i32,
    /// HUD "just got an item" flash duration (default: 1s)
    pub flash_ticks: u8,
    /// Delay before a confirmed fake item detonates (default: 2s)
    pub fake_detonate_ticks: u32,

    // === Singularity cooldowns ===
    /// Cooldown after a Homing Dart commits (default: 20s)
    pub homing_dart_cooldown: u32,
    /// Cooldown after a Shrink commits (default: 30s)
    pub shrink_cooldown: u32,
    /// Cooldown after any shield commits (default: 10s)
    pub shield_cooldown: u32,
}

impl Default for RouletteTuning {
    fn default() -> Self {
        Self {
            reel_size: 15,
            nominal_lobby: 8,
            grade_narrowing: (FRACUNIT * 35) / 100,
            max_dist: fixed_int(15_000),
            frantic: false,
            frantic_mult: (FRACUNIT * 3) / 2,
            power_ceiling: fixed_int(12_000),
            delta_ceiling: fixed_int(12_000),

            lonely_range: fixed_int(1_800),
            lonely_mult_max: (FRACUNIT * 5) / 2,
            near_leader_dist: fixed_int(750),

            breakaway_gap: fixed_int(3_000),

            dupe_penalty: fixed_int(2_400),

            weak_margin: fixed_int(1_200),

            ring_ceiling: fixed_int(4_000),
            ring_step: fixed_int(800),
            popcorn_max: 8,

            trap_start_window: 5 * TICRATE,
            finish_cutoff: fixed_int(1_500),
            expert_grade_max: FRACUNIT / 2,

            confirm_min: 20,
            confirm_timeout: 10 * TICRATE,
            auto_confirm: 70,
            speed_fastest: 2,
            speed_slowest: 8,
            speed_band: 2_000,
            flash_ticks: TICRATE as u8,
            fake_detonate_ticks: 2 * TICRATE,

            homing_dart_cooldown: 20 * TICRATE,
            shrink_cooldown: 30 * TICRATE,
            shield_cooldown: 10 * TICRATE,
        }
    }
}

impl RouletteTuning {
    /// Load a tuning overlay from JSON and reject unusable values.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::RouletteError;
        if self.reel_size == 0 {
            return Err(RouletteError::InvalidParameter("reel_size must be nonzero".into()));
        }
        if self.speed_fastest == 0 || self.speed_fastest > self.speed_slowest {
            return Err(RouletteError::InvalidParameter(format!(
                "spin periods out of order: fastest {} slowest {}",
                self.speed_fastest, self.speed_slowest
            )));
        }
        if self.max_dist <= 0 || self.ring_step <= 0 {
            return Err(RouletteError::InvalidParameter(
                "distance knobs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Cooldown registered when a singular item commits. Zero for items
    /// without singularity semantics.
    pub fn cooldown_for(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::HomingDart => self.homing_dart_cooldown,
            ItemKind::Shrink => self.shrink_cooldown,
            ItemKind::LightningShield | ItemKind::BubbleShield | ItemKind::FlameShield => {
                self.shield_cooldown
            }
            _ => 0,
        }
    }
}

/// Per-item enable/disable switches plus the developer override surface.
/// Consumed as plain read-only values; never part of the core invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemToggles {
    /// Items the host has switched off.
    #[serde(default)]
    pub disabled: Vec<Item>,
    /// Debug override: every draw yields exactly this item.
    #[serde(default)]
    pub forced_item: Option<Item>,
}

impl ItemToggles {
    pub fn enabled(&self, item: Item) -> bool {
        !self.disabled.contains(&item)
    }

    pub fn disable(&mut self, item: Item) {
        if !self.disabled.contains(&item) {
            self.disabled.push(item);
        }
    }
}
