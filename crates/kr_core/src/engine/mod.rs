//! The roulette engine proper: fixed-point math, captured state, the
//! scored reel builder, the spin state machine and its shared services.

pub mod config;
pub mod cooldown;
pub mod eligibility;
pub mod explain;
pub mod reel;
pub mod rng;
pub mod selector;
pub mod state;
pub mod types;

pub use config::{ItemToggles, RouletteTuning, TICRATE};
pub use cooldown::CooldownTracker;
pub use eligibility::item_permitted;
pub use explain::{BuildPath, CandidateScore, ReelExplain};
pub use reel::ReelBuilder;
pub use rng::{RngStream, RouletteRng, FREE_PLAY_SEED};
pub use selector::{
    ActivateOptions, Commit, Inventory, ReelSlot, Roulette, RouletteInput, TickResult,
};
pub use state::{RacerView, RouletteState};
