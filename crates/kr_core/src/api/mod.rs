pub mod json_api;

pub use json_api::{
    build_reel_json, simulate_spin_json, ReelRequest, ReelResponse, SpinRequest, SpinResponse,
};
