pub mod fixed;

pub use fixed::{Fixed, FRACBITS, FRACUNIT};
