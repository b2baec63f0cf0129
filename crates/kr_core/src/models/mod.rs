pub mod item;
pub mod odds;

pub use item::{Item, ItemKind, SlotSymbol};
pub use odds::{odds_for, odds_table, GameMode, OddsEntry};
