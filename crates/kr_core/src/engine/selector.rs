//! Spin state machine.
//!
//! One `Roulette` per racer. Activation captures nothing itself; the
//! caller hands in the already-captured [`RouletteState`] plus the shared
//! RNG, and from there the machine is pure tick arithmetic. The visible
//! cycling is cosmetic ordering over an already-decided weight mass; what
//! matters for fairness was fixed at reel-build time.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::config::{ItemToggles, RouletteTuning};
use crate::engine::cooldown::CooldownTracker;
use crate::engine::explain::ReelExplain;
use crate::engine::reel::ReelBuilder;
use crate::engine::rng::{RngStream, RouletteRng};
use crate::engine::state::RouletteState;
use crate::engine::types::fixed::fixed_to_int;
use crate::models::item::{Item, SlotSymbol};

/// One reel entry: a real item, or a ring-box payout symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelSlot {
    Item(Item),
    Symbol(SlotSymbol),
}

/// Per-tick player input, as replicated to every peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteInput {
    /// Item button went down this tick.
    pub confirm_edge: bool,
    /// This player's input delay in ticks; confirms rewind by this much.
    pub latency: u32,
    /// Item slot already occupied.
    pub holding_item: bool,
    /// A fake-box detonation is pending on this racer.
    pub holding_fake: bool,
    /// Ring-box payout still being counted out.
    pub using_rings: bool,
}

impl RouletteInput {
    /// Whether the slot can accept a commit at all this tick.
    fn slot_free(&self) -> bool {
        !self.holding_item && !self.holding_fake && !self.using_rings
    }
}

/// What the racer is actually holding, written only by commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub item: Item,
    pub amount: u8,
    /// Rings still to be counted out from a ring-box payout.
    pub rings_pending: u16,
    /// Ticks until a committed fake box detonates; 0 = none pending.
    pub fake_pending: u32,
    /// HUD flash ticks remaining after a commit.
    pub flash: u8,
}

impl Default for Inventory {
    fn default() -> Self {
        Self { item: Item::None, amount: 0, rings_pending: 0, fake_pending: 0, flash: 0 }
    }
}

impl Inventory {
    /// Per-tick decay. Returns true on the tick a pending fake box
    /// detonates.
    pub fn tick(&mut self) -> bool {
        self.flash = self.flash.saturating_sub(1);
        if self.fake_pending > 0 {
            self.fake_pending -= 1;
            return self.fake_pending == 0;
        }
        false
    }

    pub fn consume_one(&mut self) {
        self.amount = self.amount.saturating_sub(1);
        if self.amount == 0 {
            self.item = Item::None;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActivateOptions {
    /// The box was a disguised trap: the commit arms a detonation
    /// instead of granting the shown item.
    pub fake_box: bool,
    /// Accessibility: confirm automatically at a fixed early tick.
    pub auto_confirm: bool,
    /// Casual equal-odds mode.
    pub free_play: bool,
}

/// Outcome of one `tick` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    /// Machine inactive, nothing happened.
    Idle,
    /// Still cycling.
    Spinning,
    /// A slot was committed this tick.
    Committed(Commit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub slot: ReelSlot,
    /// Stack amount granted (0 for symbol commits and fake boxes).
    pub amount: u8,
    /// Ring payout (0 for item commits).
    pub rings: u16,
}

#[derive(Debug, Clone, Default)]
pub struct Roulette {
    reel: Vec<ReelSlot>,
    index: usize,
    /// Ticks until the next advance; always in 1..=speed while active.
    tics: u32,
    /// Spin period in ticks; smaller is faster.
    speed: u32,
    /// Ticks since activation.
    elapsed: u32,
    active: bool,
    fake_box: bool,
    auto_confirm: bool,
    /// Catch-up currency stack committed with a SuperRing slot.
    popcorn: u8,
    explain: Option<ReelExplain>,
}

impl Roulette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an item-box spin from a captured state.
    pub fn activate(
        &mut self,
        state: &RouletteState,
        tuning: &RouletteTuning,
        toggles: &ItemToggles,
        cooldowns: &CooldownTracker,
        rng: &mut RouletteRng,
        opts: ActivateOptions,
    ) {
        let (items, explain) = ReelBuilder::new(state, tuning, toggles, cooldowns)
            .free_play(opts.free_play)
            .build(rng);
        self.reel = items.into_iter().map(ReelSlot::Item).collect();
        self.popcorn = explain.popcorn;
        self.explain = Some(explain);
        self.fake_box = opts.fake_box;
        self.auto_confirm = opts.auto_confirm;
        self.start(state, tuning);
    }

    /// Start a ring-box spin: fixed symbol multiset in a seeded shuffle.
    pub fn activate_ring_box(
        &mut self,
        state: &RouletteState,
        tuning: &RouletteTuning,
        rng: &mut RouletteRng,
    ) {
        let mut symbols: Vec<SlotSymbol> = SlotSymbol::REEL_POOL
            .iter()
            .flat_map(|&(sym, n)| std::iter::repeat(sym).take(n as usize))
            .collect();
        // Fisher-Yates on the ring-box stream.
        for i in (1..symbols.len()).rev() {
            let j = rng.draw(RngStream::RingBox, (i + 1) as u32) as usize;
            symbols.swap(i, j);
        }
        self.reel = symbols.into_iter().map(ReelSlot::Symbol).collect();
        self.popcorn = 0;
        self.explain = None;
        self.fake_box = false;
        self.auto_confirm = false;
        self.start(state, tuning);
    }

    fn start(&mut self, state: &RouletteState, tuning: &RouletteTuning) {
        // Farther behind spins faster: harder to aim, quicker to resolve.
        let steps = if tuning.speed_band > 0 {
            (fixed_to_int(state.dist) / tuning.speed_band) as u32
        } else {
            0
        };
        self.speed = tuning
            .speed_slowest
            .saturating_sub(steps)
            .clamp(tuning.speed_fastest, tuning.speed_slowest);
        self.index = 0;
        self.tics = self.speed;
        self.elapsed = 0;
        self.active = true;
    }

    /// Stop cycling without committing. The reel stays visible but inert.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Advance one simulation tick.
    pub fn tick(
        &mut self,
        input: &RouletteInput,
        inventory: &mut Inventory,
        tuning: &RouletteTuning,
        cooldowns: &mut CooldownTracker,
    ) -> TickResult {
        if !self.active {
            return TickResult::Idle;
        }
        if self.reel.is_empty() {
            warn!("roulette ticked with an empty reel");
            self.active = false;
            return TickResult::Idle;
        }

        self.elapsed += 1;

        self.tics -= 1;
        if self.tics == 0 {
            self.index = (self.index + 1) % self.reel.len();
            self.tics = self.speed;
        }

        // Forced confirms ignore latency: nobody aimed them.
        if self.elapsed >= tuning.confirm_timeout {
            return self.commit(0, inventory, tuning, cooldowns);
        }
        if self.auto_confirm && self.elapsed >= tuning.auto_confirm {
            return self.commit(0, inventory, tuning, cooldowns);
        }
        // Player presses only land on a free slot.
        if input.confirm_edge && input.slot_free() && self.elapsed >= tuning.confirm_min {
            // Rewind to where the reel stood when the player actually
            // pressed, bounded by how long the spin has existed.
            let rewind = input.latency.min(self.elapsed.saturating_sub(1));
            return self.commit(rewind, inventory, tuning, cooldowns);
        }

        TickResult::Spinning
    }

    fn commit(
        &mut self,
        rewind: u32,
        inventory: &mut Inventory,
        tuning: &RouletteTuning,
        cooldowns: &mut CooldownTracker,
    ) -> TickResult {
        let (index, tics) = self.rewound(rewind);
        let slot = self.reel[index];
        self.index = index;
        // Left where the rewind put it; the HUD animates the settle
        // from this offset.
        self.tics = tics;
        self.active = false;
        inventory.flash = tuning.flash_ticks;

        let commit = match slot {
            ReelSlot::Item(item) => {
                if self.fake_box {
                    // The shown item was bait; arm the detonation instead.
                    inventory.fake_pending = tuning.fake_detonate_ticks;
                    Commit { slot, amount: 0, rings: 0 }
                } else {
                    let amount = if item == Item::SuperRing {
                        self.popcorn.max(1)
                    } else {
                        item.amount()
                    };
                    inventory.item = item;
                    inventory.amount = amount;
                    if item.is_singular() {
                        cooldowns.set(item.kind(), tuning.cooldown_for(item.kind()));
                    }
                    Commit { slot, amount, rings: 0 }
                }
            }
            ReelSlot::Symbol(sym) => {
                let rings = sym.ring_payout();
                inventory.rings_pending = inventory.rings_pending.saturating_add(rings);
                Commit { slot, amount: 0, rings }
            }
        };
        TickResult::Committed(commit)
    }

    /// Run the spin backwards `rewind` ticks from the current position.
    /// Exact inverse of the per-tick advance.
    fn rewound(&self, rewind: u32) -> (usize, u32) {
        let len = self.reel.len();
        let mut index = self.index;
        let mut tics = self.tics;
        for _ in 0..rewind {
            if tics >= self.speed {
                index = (index + len - 1) % len;
                tics = 1;
            } else {
                tics += 1;
            }
        }
        (index, tics)
    }

    // === HUD accessors ===

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_slot(&self) -> Option<ReelSlot> {
        self.reel.get(self.index).copied()
    }

    pub fn reel(&self) -> &[ReelSlot] {
        &self.reel
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Ticks left before the next visible advance.
    pub fn tics(&self) -> u32 {
        self.tics
    }

    /// Settle offset after a commit, for the HUD's final snap animation.
    /// Only meaningful once the machine has gone inactive.
    pub fn final_offset(&self) -> u32 {
        self.tics
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Trace of the build that produced the current reel, when it came
    /// from the item path.
    pub fn last_explain(&self) -> Option<&ReelExplain> {
        self.explain.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::RacerView;
    use crate::engine::types::fixed::fixed_int;
    use crate::models::item::ItemKind;
    use crate::models::odds::GameMode;

    fn state_behind(units: i32) -> RouletteState {
        let view = RacerView {
            mode: GameMode::Race,
            dist_to_finish: fixed_int(4_000 + units),
            position: if units == 0 { 1 } else { 4 },
            playing: 8,
            exiting: 0,
            first_dist_to_finish: Some(fixed_int(4_000)),
            second_dist_to_finish: Some(fixed_int(4_600)),
            grade: 0,
            bot: false,
            rival: false,
            ahead_gap: Some(fixed_int(400)),
            behind_gap: Some(fixed_int(300)),
            time_elapsed: 60 * 35,
        };
        RouletteState::capture(&view, &RouletteTuning::default())
    }

    fn spin_up(state: &RouletteState, seed: u64) -> (Roulette, RouletteTuning, CooldownTracker) {
        let tuning = RouletteTuning::default();
        let toggles = ItemToggles::default();
        let cooldowns = CooldownTracker::new();
        let mut rng = RouletteRng::new(seed);
        let mut roulette = Roulette::new();
        roulette.activate(
            state,
            &tuning,
            &toggles,
            &cooldowns,
            &mut rng,
            ActivateOptions::default(),
        );
        (roulette, tuning, cooldowns)
    }

    #[test]
    fn test_inactive_machine_is_idle() {
        let mut roulette = Roulette::new();
        let mut inv = Inventory::default();
        let tuning = RouletteTuning::default();
        let mut cooldowns = CooldownTracker::new();
        let result = roulette.tick(&RouletteInput::default(), &mut inv, &tuning, &mut cooldowns);
        assert_eq!(result, TickResult::Idle);
    }

    #[test]
    fn test_speed_scales_with_distance() {
        let tuning = RouletteTuning::default();
        let (near, ..) = spin_up(&state_behind(0), 1);
        let (far, ..) = spin_up(&state_behind(14_000), 1);
        assert_eq!(near.speed(), tuning.speed_slowest);
        assert_eq!(far.speed(), tuning.speed_fastest);
        assert!(far.speed() < near.speed());
    }

    #[test]
    fn test_confirm_before_minimum_is_ignored() {
        let state = state_behind(3_000);
        let (mut roulette, tuning, mut cooldowns) = spin_up(&state, 2);
        let mut inv = Inventory::default();
        let input = RouletteInput { confirm_edge: true, ..Default::default() };
        for _ in 0..tuning.confirm_min - 1 {
            let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
            assert_eq!(r, TickResult::Spinning);
        }
        let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
        assert!(matches!(r, TickResult::Committed(_)));
        assert!(!roulette.is_active());
    }

    #[test]
    fn test_timeout_commits_without_input() {
        let state = state_behind(3_000);
        let (mut roulette, tuning, mut cooldowns) = spin_up(&state, 3);
        let mut inv = Inventory::default();
        let input = RouletteInput::default();
        let mut committed = None;
        for tick in 1..=tuning.confirm_timeout {
            if let TickResult::Committed(c) =
                roulette.tick(&input, &mut inv, &tuning, &mut cooldowns)
            {
                committed = Some((tick, c));
                break;
            }
        }
        let (tick, _) = committed.expect("timeout never fired");
        assert_eq!(tick, tuning.confirm_timeout);
        assert_ne!(inv.item, Item::None);
    }

    #[test]
    fn test_auto_confirm_fires_early() {
        let state = state_behind(3_000);
        let tuning = RouletteTuning::default();
        let toggles = ItemToggles::default();
        let mut cooldowns = CooldownTracker::new();
        let mut rng = RouletteRng::new(4);
        let mut roulette = Roulette::new();
        roulette.activate(
            &state,
            &tuning,
            &toggles,
            &cooldowns,
            &mut rng,
            ActivateOptions { auto_confirm: true, ..Default::default() },
        );
        let mut inv = Inventory::default();
        let input = RouletteInput::default();
        for tick in 1..tuning.auto_confirm {
            let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
            assert_eq!(r, TickResult::Spinning, "committed early at tick {}", tick);
        }
        let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
        assert!(matches!(r, TickResult::Committed(_)));
    }

    #[test]
    fn test_occupied_slot_suppresses_presses_but_not_timeout() {
        let state = state_behind(3_000);
        let (mut roulette, tuning, mut cooldowns) = spin_up(&state, 5);
        let mut inv = Inventory::default();
        let input = RouletteInput {
            confirm_edge: true,
            holding_item: true,
            ..Default::default()
        };
        for _ in 1..tuning.confirm_timeout {
            let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
            assert_eq!(r, TickResult::Spinning);
        }
        // The absolute timeout still terminates the spin.
        let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
        assert!(matches!(r, TickResult::Committed(_)));
    }

    #[test]
    fn test_latency_rewind_hits_the_slot_the_player_saw() {
        // Period 4: slowest(8) - 8000/2000 = 4.
        let state = state_behind(8_000);
        let (mut roulette, tuning, mut cooldowns) = spin_up(&state, 6);
        assert_eq!(roulette.speed(), 4);
        let mut inv = Inventory::default();
        let idle = RouletteInput::default();

        let latency = 6u32;
        let press_tick = 30u32;
        let mut index_history = Vec::new();
        for _ in 1..press_tick {
            roulette.tick(&idle, &mut inv, &tuning, &mut cooldowns);
            index_history.push(roulette.index());
        }
        let seen_index = index_history[(press_tick - latency - 1) as usize];

        let press = RouletteInput { confirm_edge: true, latency, ..Default::default() };
        let r = roulette.tick(&press, &mut inv, &tuning, &mut cooldowns);
        match r {
            TickResult::Committed(c) => {
                assert_eq!(roulette.index(), seen_index);
                assert_eq!(c.slot, roulette.reel()[seen_index]);
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_singular_commit_registers_cooldown() {
        let state = state_behind(3_000);
        let tuning = RouletteTuning::default();
        let toggles = ItemToggles {
            disabled: Vec::new(),
            forced_item: Some(Item::HomingDart),
        };
        let mut cooldowns = CooldownTracker::new();
        let mut rng = RouletteRng::new(7);
        let mut roulette = Roulette::new();
        roulette.activate(
            &state,
            &tuning,
            &toggles,
            &cooldowns,
            &mut rng,
            ActivateOptions::default(),
        );
        let mut inv = Inventory::default();
        let input = RouletteInput { confirm_edge: true, ..Default::default() };
        loop {
            if let TickResult::Committed(c) =
                roulette.tick(&input, &mut inv, &tuning, &mut cooldowns)
            {
                assert_eq!(c.slot, ReelSlot::Item(Item::HomingDart));
                break;
            }
        }
        assert_eq!(cooldowns.get(ItemKind::HomingDart), tuning.homing_dart_cooldown);
        assert_eq!(inv.item, Item::HomingDart);
    }

    #[test]
    fn test_fake_box_arms_detonation_instead_of_granting() {
        let state = state_behind(3_000);
        let tuning = RouletteTuning::default();
        let toggles = ItemToggles::default();
        let mut cooldowns = CooldownTracker::new();
        let mut rng = RouletteRng::new(8);
        let mut roulette = Roulette::new();
        roulette.activate(
            &state,
            &tuning,
            &toggles,
            &cooldowns,
            &mut rng,
            ActivateOptions { fake_box: true, ..Default::default() },
        );
        let mut inv = Inventory::default();
        let input = RouletteInput { confirm_edge: true, ..Default::default() };
        loop {
            if let TickResult::Committed(c) =
                roulette.tick(&input, &mut inv, &tuning, &mut cooldowns)
            {
                assert_eq!(c.amount, 0);
                break;
            }
        }
        assert_eq!(inv.item, Item::None);
        assert_eq!(inv.fake_pending, tuning.fake_detonate_ticks);
        // Detonates exactly when the timer runs out.
        for _ in 0..tuning.fake_detonate_ticks - 1 {
            assert!(!inv.tick());
        }
        assert!(inv.tick());
    }

    #[test]
    fn test_ring_box_pays_rings() {
        let state = state_behind(1_000);
        let tuning = RouletteTuning::default();
        let mut cooldowns = CooldownTracker::new();
        let mut rng = RouletteRng::new(9);
        let mut roulette = Roulette::new();
        roulette.activate_ring_box(&state, &tuning, &mut rng);
        assert_eq!(roulette.reel().len(), 15);
        let mut inv = Inventory::default();
        let input = RouletteInput { confirm_edge: true, ..Default::default() };
        loop {
            if let TickResult::Committed(c) =
                roulette.tick(&input, &mut inv, &tuning, &mut cooldowns)
            {
                assert!(c.rings >= 2);
                assert_eq!(c.rings, inv.rings_pending);
                assert_eq!(inv.item, Item::None);
                break;
            }
        }
    }

    #[test]
    fn test_ring_box_shuffle_is_seeded() {
        let state = state_behind(1_000);
        let tuning = RouletteTuning::default();
        let mut a = Roulette::new();
        let mut b = Roulette::new();
        let mut rng_a = RouletteRng::new(11);
        let mut rng_b = RouletteRng::new(11);
        a.activate_ring_box(&state, &tuning, &mut rng_a);
        b.activate_ring_box(&state, &tuning, &mut rng_b);
        assert_eq!(a.reel(), b.reel());
    }

    #[test]
    fn test_cancel_leaves_reel_inert() {
        let state = state_behind(3_000);
        let (mut roulette, tuning, mut cooldowns) = spin_up(&state, 12);
        roulette.cancel();
        assert!(!roulette.is_active());
        assert!(!roulette.reel().is_empty());
        let mut inv = Inventory::default();
        let input = RouletteInput { confirm_edge: true, ..Default::default() };
        let r = roulette.tick(&input, &mut inv, &tuning, &mut cooldowns);
        assert_eq!(r, TickResult::Idle);
    }

    #[test]
    fn test_inventory_consume() {
        let mut inv = Inventory { item: Item::TripleBoost, amount: 3, ..Default::default() };
        inv.consume_one();
        inv.consume_one();
        assert_eq!(inv.item, Item::TripleBoost);
        inv.consume_one();
        assert_eq!(inv.item, Item::None);
        assert_eq!(inv.amount, 0);
    }
}
