//! Race-state snapshot.
//!
//! Captured exactly once per roulette activation. The spin never re-reads
//! the world: every peer that agrees on the snapshot and the RNG stream
//! position builds the same reel and commits the same result.

use serde::{Deserialize, Serialize};

use crate::engine::config::RouletteTuning;
use crate::engine::types::fixed::{fixed_clamp, fixed_mul, Fixed, FRACUNIT};
use crate::models::odds::{clamp_position, GameMode};

/// What the world simulation reports about one racer at activation time.
/// All distances are fixed-point track units, measured to the finish line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacerView {
    pub mode: GameMode,
    /// This racer's distance to the finish.
    pub dist_to_finish: Fixed,
    /// 1-based position rank.
    pub position: u8,
    /// Racers still in the session.
    pub playing: u8,
    /// Racers that already crossed the finish.
    pub exiting: u8,
    /// 1st place's distance to the finish, if a 1st place exists.
    pub first_dist_to_finish: Option<Fixed>,
    /// 2nd place's distance to the finish, if a 2nd place exists.
    pub second_dist_to_finish: Option<Fixed>,
    /// Experience grade in [0, FRACUNIT]; high = performing well lately.
    pub grade: Fixed,
    /// AI-controlled racer.
    pub bot: bool,
    /// Designated rival (harder-to-catch-fairly knob).
    pub rival: bool,
    /// Gap to the nearest attackable racer ahead, if any.
    pub ahead_gap: Option<Fixed>,
    /// Gap to the nearest victim behind, if any.
    pub behind_gap: Option<Fixed>,
    /// Race time in ticks at activation.
    pub time_elapsed: u32,
}

/// The inputs the scoring math actually consumes, captured and normalized
/// once. Invariant: every distance field is non-negative and clamped to
/// `tuning.max_dist`; `second_to_first` is 0 when inputs are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouletteState {
    pub mode: GameMode,
    /// Gap to the leader after grade narrowing.
    pub dist: Fixed,
    /// Gap to the leader before grade narrowing.
    pub preexp_dist: Fixed,
    pub first_dist: Fixed,
    pub second_dist: Fixed,
    /// Gap between 2nd and 1st; 0 when either is missing.
    pub second_to_first: Fixed,
    pub position: u8,
    pub playing: u8,
    pub exiting: u8,
    pub grade: Fixed,
    pub bot: bool,
    pub rival: bool,
    pub ahead_gap: Option<Fixed>,
    pub behind_gap: Option<Fixed>,
    pub time_elapsed: u32,
}

impl RouletteState {
    pub fn capture(view: &RacerView, tuning: &RouletteTuning) -> Self {
        let position = clamp_position(view.position, view.playing);
        let clamp = |d: Fixed| fixed_clamp(d, 0, tuning.max_dist);

        let own = clamp(view.dist_to_finish);
        let first = clamp(view.first_dist_to_finish.unwrap_or(own));
        let second = clamp(view.second_dist_to_finish.unwrap_or(first));

        // Unscaled gap to the leader; the leader itself is at gap 0.
        let preexp_dist = (own - first).max(0);

        // Grade narrowing: a racer performing well lately is scored as if
        // closer to the front than they are. Monotone and bounded.
        let grade = fixed_clamp(view.grade, 0, FRACUNIT);
        let narrowing = FRACUNIT - fixed_mul(grade, tuning.grade_narrowing);
        let mut dist = fixed_mul(preexp_dist, narrowing);
        if tuning.frantic {
            dist = fixed_clamp(fixed_mul(dist, tuning.frantic_mult), 0, tuning.max_dist);
        }

        let second_to_first = match (view.first_dist_to_finish, view.second_dist_to_finish) {
            (Some(f), Some(s)) => (clamp(s) - clamp(f)).max(0),
            _ => 0,
        };

        Self {
            mode: view.mode,
            dist,
            preexp_dist,
            first_dist: first,
            second_dist: second,
            second_to_first,
            position,
            playing: view.playing.max(1),
            exiting: view.exiting.min(view.playing),
            grade,
            bot: view.bot,
            rival: view.rival,
            ahead_gap: view.ahead_gap.map(clamp),
            behind_gap: view.behind_gap.map(clamp),
            time_elapsed: view.time_elapsed,
        }
    }

    /// Racers actually still racing each other.
    pub fn active_racers(&self) -> u8 {
        self.playing.saturating_sub(self.exiting).max(1)
    }

    pub fn is_leader(&self) -> bool {
        self.position == 1
    }
}
