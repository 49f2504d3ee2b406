// src/aggregation/mod.rs

//! Multi-row reconciliation: grouped attacks, galaxy slots and paginated
//! message lists.

pub mod attacks;
pub mod galaxy;
pub mod messages;

pub use attacks::{AttackRow, merge};
pub use galaxy::{GalaxyContext, GalaxyEntry, GalaxyRow, PlanetEntry, RawSystem, reconcile};
pub use messages::{Message, collate, page_count};
