//! String-in / string-out JSON API.
//!
//! Thin serialization layer for host engines that cannot link the crate
//! types directly. Errors come back as plain strings so bindings never
//! have to share an error enum.

use serde::{Deserialize, Serialize};

use crate::engine::config::{ItemToggles, RouletteTuning};
use crate::engine::cooldown::CooldownTracker;
use crate::engine::explain::ReelExplain;
use crate::engine::reel::ReelBuilder;
use crate::engine::rng::RouletteRng;
use crate::engine::selector::{
    ActivateOptions, Commit, ReelSlot, Roulette, RouletteInput, TickResult,
};
use crate::engine::state::{RacerView, RouletteState};
use crate::models::item::{Item, ItemKind};

const SCHEMA_VERSION: u8 = 1;

/// Cooldowns as the host last observed them, replayed into the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownEntry {
    pub kind: ItemKind,
    pub ticks: u32,
}

#[derive(Debug, Deserialize)]
pub struct ReelRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub racer: RacerView,
    #[serde(default)]
    pub tuning: Option<RouletteTuning>,
    #[serde(default)]
    pub toggles: ItemToggles,
    #[serde(default)]
    pub cooldowns: Vec<CooldownEntry>,
    #[serde(default)]
    pub free_play: bool,
}

#[derive(Debug, Serialize)]
pub struct ReelResponse {
    pub reel: Vec<Item>,
    pub explain: ReelExplain,
}

/// Build one reel from a snapshot and return it with its build trace.
pub fn build_reel_json(request_json: &str) -> Result<String, String> {
    let request: ReelRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let tuning = request.tuning.unwrap_or_default();
    let state = RouletteState::capture(&request.racer, &tuning);
    let mut cooldowns = CooldownTracker::new();
    for entry in &request.cooldowns {
        cooldowns.set(entry.kind, entry.ticks);
    }
    let mut rng = RouletteRng::new(request.seed);

    let (reel, explain) = ReelBuilder::new(&state, &tuning, &request.toggles, &cooldowns)
        .free_play(request.free_play)
        .build(&mut rng);

    serde_json::to_string(&ReelResponse { reel, explain })
        .map_err(|e| format!("Failed to serialize response: {}", e))
}

#[derive(Debug, Deserialize)]
pub struct SpinRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub racer: RacerView,
    #[serde(default)]
    pub tuning: Option<RouletteTuning>,
    #[serde(default)]
    pub toggles: ItemToggles,
    #[serde(default)]
    pub cooldowns: Vec<CooldownEntry>,
    #[serde(default)]
    pub fake_box: bool,
    #[serde(default)]
    pub auto_confirm: bool,
    #[serde(default)]
    pub free_play: bool,
    /// Tick at which the player presses confirm; absent = ride the
    /// timeout.
    #[serde(default)]
    pub confirm_tick: Option<u32>,
    /// Input delay applied to the confirm press.
    #[serde(default)]
    pub latency: u32,
}

#[derive(Debug, Serialize)]
pub struct SpinResponse {
    /// Committed slot.
    pub slot: ReelSlot,
    pub amount: u8,
    pub rings: u16,
    /// Tick the commit landed on.
    pub committed_at: u32,
    /// Reel index the spin stopped on.
    pub index: usize,
    pub reel: Vec<ReelSlot>,
    pub explain: Option<ReelExplain>,
}

/// Run one full spin to commit and report what landed.
pub fn simulate_spin_json(request_json: &str) -> Result<String, String> {
    let request: SpinRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let tuning = request.tuning.unwrap_or_default();
    let state = RouletteState::capture(&request.racer, &tuning);
    let mut cooldowns = CooldownTracker::new();
    for entry in &request.cooldowns {
        cooldowns.set(entry.kind, entry.ticks);
    }
    let mut rng = RouletteRng::new(request.seed);

    let mut roulette = Roulette::new();
    roulette.activate(
        &state,
        &tuning,
        &request.toggles,
        &cooldowns,
        &mut rng,
        ActivateOptions {
            fake_box: request.fake_box,
            auto_confirm: request.auto_confirm,
            free_play: request.free_play,
        },
    );
    let explain = roulette.last_explain().cloned();

    let mut inventory = Default::default();
    let commit: Option<(u32, Commit)> = (1..=tuning.confirm_timeout).find_map(|tick| {
        let input = RouletteInput {
            confirm_edge: request.confirm_tick == Some(tick),
            latency: request.latency,
            ..Default::default()
        };
        match roulette.tick(&input, &mut inventory, &tuning, &mut cooldowns) {
            TickResult::Committed(c) => Some((tick, c)),
            _ => None,
        }
    });

    let (committed_at, commit) =
        commit.ok_or_else(|| "Spin never committed within the timeout".to_string())?;

    serde_json::to_string(&SpinResponse {
        slot: commit.slot,
        amount: commit.amount,
        rings: commit.rings,
        committed_at,
        index: roulette.index(),
        reel: roulette.reel().to_vec(),
        explain,
    })
    .map_err(|e| format!("Failed to serialize response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn racer_json() -> serde_json::Value {
        serde_json::json!({
            "mode": "race",
            "dist_to_finish": 8_000 * 65_536i64,
            "position": 4,
            "playing": 8,
            "exiting": 0,
            "first_dist_to_finish": 4_000 * 65_536i64,
            "second_dist_to_finish": 4_600 * 65_536i64,
            "grade": 0,
            "bot": false,
            "rival": false,
            "ahead_gap": 400 * 65_536i64,
            "behind_gap": 300 * 65_536i64,
            "time_elapsed": 2_100
        })
    }

    #[test]
    fn test_build_reel_json_round_trip() {
        let request = serde_json::json!({
            "schema_version": 1,
            "seed": 42,
            "racer": racer_json(),
        });
        let response = build_reel_json(&request.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(!parsed["reel"].as_array().unwrap().is_empty());
        assert!(parsed["explain"]["target_power"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_build_reel_json_is_deterministic() {
        let request = serde_json::json!({
            "schema_version": 1,
            "seed": 7,
            "racer": racer_json(),
        })
        .to_string();
        assert_eq!(build_reel_json(&request).unwrap(), build_reel_json(&request).unwrap());
    }

    #[test]
    fn test_schema_version_rejected() {
        let request = serde_json::json!({
            "schema_version": 9,
            "seed": 1,
            "racer": racer_json(),
        });
        let err = build_reel_json(&request.to_string()).unwrap_err();
        assert!(err.contains("schema version"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(build_reel_json("not json").is_err());
    }

    #[test]
    fn test_simulate_spin_json_commits() {
        let request = serde_json::json!({
            "schema_version": 1,
            "seed": 3,
            "racer": racer_json(),
            "confirm_tick": 40,
            "latency": 2,
        });
        let response = simulate_spin_json(&request.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["committed_at"].as_u64().unwrap(), 40);
        assert!(parsed["slot"].get("item").is_some());
    }

    #[test]
    fn test_simulate_spin_json_timeout_path() {
        let request = serde_json::json!({
            "schema_version": 1,
            "seed": 3,
            "racer": racer_json(),
        });
        let response = simulate_spin_json(&request.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        let tuning = RouletteTuning::default();
        assert_eq!(parsed["committed_at"].as_u64().unwrap(), tuning.confirm_timeout as u64);
    }
}
