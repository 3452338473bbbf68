//! # Campaign Events
//!
//! A small rules engine that keeps a campaign document in step with what
//! happens at the table. Producers queue events; once per processing pass the
//! engine matches each event against declarative triggers, gates them on
//! cooldowns and conditions, and applies their actions to the document.
//!
//! ## Core Components
//!
//! - **events**: The event shape producers hand to the engine
//! - **triggers**: Trigger, condition and action definitions plus the registry
//! - **engine**: Queue, matcher, evaluator, executor and the orchestrating engine
//! - **config**: TOML-backed engine settings
//! - **clock**: Wall-clock seam for cooldowns and timestamps
//!
//! ## Design Philosophy
//!
//! - **Per-session**: Every engine instance owns its queue and cooldown state
//! - **Best-effort**: Nothing inside a processing pass interrupts the session
//! - **Declarative**: Rules are data and can be loaded from configuration

pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod triggers;

pub use clock::*;
pub use config::*;
pub use engine::*;
pub use events::*;
pub use triggers::*;
