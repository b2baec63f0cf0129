//! Item eligibility filter.
//!
//! Pure predicate deciding whether a catalog entry may appear in a reel
//! for a given captured state. Checks run cheapest-first; the reel
//! builder calls this once per table entry per activation.

use crate::engine::config::{ItemToggles, RouletteTuning};
use crate::engine::cooldown::CooldownTracker;
use crate::engine::state::RouletteState;
use crate::models::item::Item;
use crate::models::odds::odds_for;

/// May `item` appear in this racer's reel right now?
pub fn item_permitted(
    item: Item,
    state: &RouletteState,
    tuning: &RouletteTuning,
    toggles: &ItemToggles,
    cooldowns: &CooldownTracker,
) -> bool {
    // The sentinel is a fallback, never a draw candidate.
    if item == Item::None {
        return false;
    }
    if !toggles.enabled(item) {
        return false;
    }
    // Structurally absent from the mode's table.
    if odds_for(state.mode, item).is_none() {
        return false;
    }

    // Timing windows. Nobody lays traps or turtles up before the pack
    // has spread out.
    if (item.is_trap() || item.is_shield()) && state.time_elapsed < tuning.trap_start_window {
        return false;
    }
    if item.is_disruptive() && state.first_dist < tuning.finish_cutoff {
        return false;
    }

    // Position gates.
    if item.first_place_only() && !state.is_leader() {
        return false;
    }
    if state.is_leader() && !item.first_place_permitted() {
        return false;
    }
    if item.is_expert_gated() && state.grade > tuning.expert_grade_max {
        return false;
    }

    // Singularity: a live instance anywhere bars the item for everyone.
    if cooldowns.get(item.kind()) > 0 {
        return false;
    }

    true
}
