//! Cooldown & singularity tracker.
//!
//! Process-wide mutable bookkeeping for items with "only one instance at
//! a time" semantics. Written only by the selector's commit step, read by
//! the eligibility filter for every racer, decremented once per
//! simulation tick by the host. No per-racer partition: a nonzero
//! cooldown bars the item for everyone.

use fxhash::FxHashMap;

use crate::models::item::ItemKind;

#[derive(Debug, Default, Clone)]
pub struct CooldownTracker {
    ticks: FxHashMap<ItemKind, u32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: ItemKind, ticks: u32) {
        if ticks == 0 {
            self.ticks.remove(&kind);
        } else {
            self.ticks.insert(kind, ticks);
        }
    }

    pub fn get(&self, kind: ItemKind) -> u32 {
        self.ticks.get(&kind).copied().unwrap_or(0)
    }

    /// Host calls this once per simulation tick, before any racer's
    /// roulette is advanced, so all peers observe the same values.
    pub fn tick_down(&mut self) {
        self.ticks.retain(|_, t| {
            *t = t.saturating_sub(1);
            *t > 0
        });
    }
}
