//! Guildhall - turn-based guild management simulation
//!
//! The simulation core of an adventurers' guild game: an entity store of
//! adventurers and quests, quest generation and party acceptance, the quest
//! resolution engine, the weekly tick, and a versioned save format.

pub mod campaign;
pub mod core;
pub mod entity;
pub mod persistence;
