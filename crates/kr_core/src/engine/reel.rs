//! Reel builder.
//!
//! Turns a captured state into the list of items the spin cycles through.
//! All scoring is integer fixed-point and every random draw goes through
//! the shared [`RouletteRng`], so peers that agree on the snapshot and
//! stream position produce byte-identical reels.
//!
//! Build order: override paths first (forced item, solo hand, free play),
//! then the scored path: target power, per-candidate deltas with
//! loneliness and breakaway adjustments, count selection under duplicate
//! penalties, the weak-item filter, the out-of-band catch-up currency,
//! and finally a seeded shuffle into reel order.

use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::engine::config::{ItemToggles, RouletteTuning};
use crate::engine::cooldown::CooldownTracker;
use crate::engine::eligibility::item_permitted;
use crate::engine::explain::{BuildPath, CandidateScore, ReelExplain};
use crate::engine::rng::{RngStream, RouletteRng, FREE_PLAY_SEED};
use crate::engine::state::RouletteState;
use crate::engine::types::fixed::{fixed_abs, fixed_clamp, fixed_div, fixed_mul, Fixed, FRACUNIT};
use crate::models::item::Item;
use crate::models::odds::odds_table;

/// Delta scaled by a fixed multiplier, widened through i64 and clamped
/// so a lonely multiplier can never wrap a large delta.
fn scaled_delta(delta: Fixed, mult: Fixed, ceiling: Fixed) -> Fixed {
    let v = (delta as i64 * mult as i64) >> 16;
    v.min(ceiling as i64).max(0) as Fixed
}

struct Candidate {
    item: Item,
    ideal: Fixed,
    tolerance: u32,
    delta: Fixed,
    /// Penalty added per pick already taken.
    penalty_step: Fixed,
    count: u32,
}

pub struct ReelBuilder<'a> {
    state: &'a RouletteState,
    tuning: &'a RouletteTuning,
    toggles: &'a ItemToggles,
    cooldowns: &'a CooldownTracker,
    free_play: bool,
}

impl<'a> ReelBuilder<'a> {
    pub fn new(
        state: &'a RouletteState,
        tuning: &'a RouletteTuning,
        toggles: &'a ItemToggles,
        cooldowns: &'a CooldownTracker,
    ) -> Self {
        Self { state, tuning, toggles, cooldowns, free_play: false }
    }

    /// Casual sessions: every eligible item at equal weight, same reel
    /// every activation.
    pub fn free_play(mut self, on: bool) -> Self {
        self.free_play = on;
        self
    }

    /// The power band this racer's reel should aim for. Zero for the
    /// leader (and anyone tied with them), rising monotonically with the
    /// grade-narrowed gap, scaled for lobby size and capped.
    pub fn target_power(&self) -> Fixed {
        let racers = self.state.active_racers() as i32;
        let lobby_scale = fixed_clamp(
            fixed_div(
                (self.tuning.nominal_lobby as i32) * FRACUNIT,
                racers * FRACUNIT,
            ),
            FRACUNIT / 2,
            2 * FRACUNIT,
        );
        fixed_clamp(
            fixed_mul(self.state.dist, lobby_scale),
            0,
            self.tuning.power_ceiling,
        )
    }

    pub fn build(&self, rng: &mut RouletteRng) -> (Vec<Item>, ReelExplain) {
        let mut explain = ReelExplain::default();

        if let Some(forced) = self.toggles.forced_item {
            explain.path = BuildPath::Forced;
            explain.candidates.push(CandidateScore { item: forced, delta: 0, count: 1 });
            return (vec![forced], explain);
        }

        // Free play replaces both the dynamic model and the solo hand:
        // it is the alternative draw for single-racer sessions.
        if self.free_play {
            return self.free_play_reel(explain);
        }

        if self.state.active_racers() <= 1 {
            return self.solo_hand(explain);
        }

        self.scored_reel(rng, explain)
    }

    /// Fixed utility hand for sessions with nobody left to race against.
    fn solo_hand(&self, mut explain: ReelExplain) -> (Vec<Item>, ReelExplain) {
        use crate::models::odds::GameMode;
        explain.path = BuildPath::SoloHand;
        let hand: &[Item] = match self.state.mode {
            GameMode::Race => &[Item::Boost, Item::TripleBoost, Item::RocketBoost],
            GameMode::SpecialRetro => &[Item::SuperRing, Item::Boost],
            GameMode::Battle => &[Item::Orbital, Item::OilSlick, Item::Mine],
        };
        let reel: Vec<Item> =
            hand.iter().copied().filter(|&i| self.toggles.enabled(i)).collect();
        if reel.is_empty() {
            return self.fallback(explain);
        }
        for &item in &reel {
            explain.candidates.push(CandidateScore { item, delta: 0, count: 1 });
        }
        (reel, explain)
    }

    /// Equal-weight draw over every enabled entry in the mode's table,
    /// from a private fixed seed so repeated activations look identical.
    /// Position and timing gates do not apply here; only host disables
    /// shrink the pool.
    fn free_play_reel(&self, mut explain: ReelExplain) -> (Vec<Item>, ReelExplain) {
        explain.path = BuildPath::FreePlay;
        let pool: Vec<Item> = odds_table(self.state.mode)
            .iter()
            .map(|e| e.item)
            .filter(|&i| self.toggles.enabled(i))
            .collect();
        if pool.is_empty() {
            return self.fallback(explain);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(FREE_PLAY_SEED);
        let reel: Vec<Item> = (0..self.tuning.reel_size)
            .map(|_| pool[rng.gen_range(0..pool.len())])
            .collect();
        for &item in &pool {
            let count = reel.iter().filter(|&&r| r == item).count() as u32;
            explain.candidates.push(CandidateScore { item, delta: 0, count });
        }
        (reel, explain)
    }

    fn fallback(&self, mut explain: ReelExplain) -> (Vec<Item>, ReelExplain) {
        explain.path = BuildPath::Fallback;
        // Bots still need something actionable; humans see the dud.
        let item = if self.state.bot { Item::SuperRing } else { Item::None };
        explain.candidates.push(CandidateScore { item, delta: 0, count: 1 });
        (vec![item], explain)
    }

    fn scored_reel(
        &self,
        rng: &mut RouletteRng,
        mut explain: ReelExplain,
    ) -> (Vec<Item>, ReelExplain) {
        let tuning = self.tuning;
        let state = self.state;
        let target = self.target_power();
        explain.target_power = target;

        let lonely_mult = self.loneliness_multiplier();
        explain.lonely = lonely_mult > FRACUNIT;
        explain.lonely_mult = lonely_mult;

        let breakaway =
            !state.is_leader() && state.second_to_first > tuning.breakaway_gap;
        explain.breakaway = breakaway;

        let mut candidates = self.score_candidates(target, lonely_mult, breakaway);
        if candidates.is_empty() {
            // SuperRing may still be in band even when everything else
            // is filtered out.
            if let Some((item, count, popcorn)) = self.catch_up_entry() {
                explain.popcorn = popcorn;
                explain.candidates.push(CandidateScore { item, delta: 0, count });
                return (self.lay_out(rng, &mut [(item, count)][..]), explain);
            }
            warn!("reel build: no eligible candidates, falling back");
            return self.fallback(explain);
        }

        self.select_counts(&mut candidates);
        self.weak_filter(&mut candidates, &mut explain);

        // A breakaway leader must stay catchable: when the punisher is
        // eligible it gets at least one entry regardless of its delta.
        if breakaway {
            self.force_punisher(&mut candidates);
        }

        if let Some((item, count, popcorn)) = self.catch_up_entry() {
            explain.popcorn = popcorn;
            candidates.push(Candidate {
                item,
                ideal: 0,
                tolerance: count,
                delta: 0,
                penalty_step: 0,
                count,
            });
        }

        let mut weighted: Vec<(Item, u32)> = candidates
            .iter()
            .filter(|c| c.count > 0)
            .map(|c| (c.item, c.count))
            .collect();

        for c in &candidates {
            explain.candidates.push(CandidateScore {
                item: c.item,
                delta: c.delta,
                count: c.count,
            });
        }

        if weighted.is_empty() {
            warn!("reel build: every count filtered to zero, falling back");
            return self.fallback(explain);
        }

        (self.lay_out(rng, &mut weighted), explain)
    }

    /// FRACUNIT when racers are in interaction range; ramps toward
    /// `lonely_mult_max` as the nearest attackable racer recedes.
    fn loneliness_multiplier(&self) -> Fixed {
        let state = self.state;
        let tuning = self.tuning;
        if state.is_leader() || state.dist <= tuning.near_leader_dist {
            return FRACUNIT;
        }
        let min_gap = match (state.ahead_gap, state.behind_gap) {
            (Some(a), Some(b)) => a.min(b),
            (Some(g), None) | (None, Some(g)) => g,
            (None, None) => tuning.max_dist,
        };
        if min_gap <= tuning.lonely_range {
            return FRACUNIT;
        }
        let ramp = fixed_clamp(
            fixed_div(min_gap - tuning.lonely_range, tuning.lonely_range),
            0,
            FRACUNIT,
        );
        FRACUNIT + fixed_mul(tuning.lonely_mult_max - FRACUNIT, ramp)
    }

    fn score_candidates(
        &self,
        target: Fixed,
        lonely_mult: Fixed,
        breakaway: bool,
    ) -> Vec<Candidate> {
        let state = self.state;
        let tuning = self.tuning;
        odds_table(state.mode)
            .iter()
            .filter(|e| e.item != Item::SuperRing)
            .filter(|e| {
                item_permitted(e.item, state, tuning, self.toggles, self.cooldowns)
            })
            .map(|e| {
                let base = fixed_abs(e.ideal_power - target);
                let mut delta = if e.item.is_speed_item() {
                    fixed_clamp(base, 0, tuning.delta_ceiling)
                } else {
                    // Interaction items drift away when nobody is in range.
                    scaled_delta(base, lonely_mult, tuning.delta_ceiling)
                };
                if breakaway && e.item == Item::HomingDart {
                    // The further 1st runs away, the better the punisher
                    // scores. second_to_first > breakaway_gap here, so the
                    // ratio is a proper fraction.
                    let soften = fixed_div(tuning.breakaway_gap, state.second_to_first);
                    delta = fixed_mul(delta, soften);
                }
                let mut penalty_step = tuning.dupe_penalty / e.dupe_tolerance as Fixed;
                if (state.rival || state.bot) && e.item.is_power_item() {
                    penalty_step /= 2;
                }
                Candidate {
                    item: e.item,
                    ideal: e.ideal_power,
                    tolerance: e.dupe_tolerance as u32,
                    delta,
                    penalty_step,
                    count: 0,
                }
            })
            .collect()
    }

    /// Fill `reel_size` picks, each going to the candidate whose adjusted
    /// delta is currently lowest. A pick raises that candidate's cost by
    /// its penalty step; the tolerance is a hard per-reel cap.
    fn select_counts(&self, candidates: &mut [Candidate]) {
        for _ in 0..self.tuning.reel_size {
            let mut best: Option<usize> = None;
            let mut best_cost = Fixed::MAX;
            for (i, c) in candidates.iter().enumerate() {
                if c.count >= c.tolerance {
                    continue;
                }
                let cost = c
                    .delta
                    .saturating_add(c.penalty_step.saturating_mul(c.count as Fixed));
                if cost < best_cost {
                    best_cost = cost;
                    best = Some(i);
                }
            }
            match best {
                Some(i) => candidates[i].count += 1,
                None => break,
            }
        }
    }

    /// Drop counted items whose ideal power sits well below the weighted
    /// mean of what was selected. Only meaningful on power-ordered tables
    /// and never applied to the leader, whose whole table is low-power.
    fn weak_filter(&self, candidates: &mut [Candidate], explain: &mut ReelExplain) {
        if !self.state.mode.power_ordered() || self.state.is_leader() {
            return;
        }
        let mut total: i64 = 0;
        let mut weight: i64 = 0;
        for c in candidates.iter() {
            total += c.ideal as i64 * c.count as i64;
            weight += c.count as i64;
        }
        if weight == 0 {
            return;
        }
        let mean = (total / weight) as Fixed;
        let threshold = mean - self.tuning.weak_margin;

        let saved: Vec<u32> = candidates.iter().map(|c| c.count).collect();
        let mut removed = Vec::new();
        for c in candidates.iter_mut() {
            if c.count > 0 && c.ideal < threshold {
                removed.push(c.item);
                c.count = 0;
            }
        }
        if candidates.iter().all(|c| c.count == 0) {
            // The filter must never empty the reel; undo it.
            for (c, saved) in candidates.iter_mut().zip(saved) {
                c.count = saved;
            }
            return;
        }
        explain.weak_filtered = removed;
    }

    /// Guarantee at least one punisher entry during a breakaway, taking
    /// the slot from the most duplicated item so the reel size holds.
    fn force_punisher(&self, candidates: &mut [Candidate]) {
        let dart = match candidates.iter().position(|c| c.item == Item::HomingDart) {
            Some(i) => i,
            None => return,
        };
        if candidates[dart].count > 0 {
            return;
        }
        let donor = candidates
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != dart && c.count > 1)
            .max_by_key(|(_, c)| c.count)
            .map(|(i, _)| i);
        if let Some(donor) = donor {
            candidates[donor].count -= 1;
        }
        candidates[dart].count = 1;
    }

    /// Out-of-band catch-up currency: `(item, reel entries, stack size)`,
    /// or `None` when the racer is outside the ring band.
    fn catch_up_entry(&self) -> Option<(Item, u32, u8)> {
        let state = self.state;
        let tuning = self.tuning;
        if !item_permitted(Item::SuperRing, state, tuning, self.toggles, self.cooldowns) {
            return None;
        }
        if state.dist > tuning.ring_ceiling {
            return None;
        }
        let steps = if tuning.ring_step > 0 { state.dist / tuning.ring_step } else { 0 };
        let popcorn = (1 + steps).clamp(1, tuning.popcorn_max as i32) as u8;
        let count = (1 + popcorn as u32 / 2).clamp(1, 3);
        Some((Item::SuperRing, count, popcorn))
    }

    /// Seeded shuffle: repeatedly draw from the remaining weight mass so
    /// duplicates spread through the reel instead of clustering.
    fn lay_out(&self, rng: &mut RouletteRng, weighted: &mut [(Item, u32)]) -> Vec<Item> {
        let mut reel = Vec::with_capacity(self.tuning.reel_size);
        loop {
            let total: u32 = weighted.iter().map(|(_, n)| n).sum();
            if total == 0 {
                break;
            }
            let mut r = rng.draw(RngStream::Items, total);
            for slot in weighted.iter_mut() {
                if r < slot.1 {
                    reel.push(slot.0);
                    slot.1 -= 1;
                    break;
                }
                r -= slot.1;
            }
        }
        reel
    }
}
