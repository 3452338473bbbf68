//! # Campaign Model
//!
//! The campaign document crate - NPCs, locations, factions, world state and
//! story progression for one tabletop campaign, plus the session-state
//! snapshot and the whole-document store seam.
//! This crate holds data only and does not contain any rules logic.

pub mod document;
pub mod entities;
pub mod progression;
pub mod session;
pub mod store;
pub mod world_state;

pub use document::*;
pub use entities::*;
pub use progression::*;
pub use session::*;
pub use store::*;
pub use world_state::*;
