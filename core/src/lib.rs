//! Deterministic simulation core for a two-player arcade soccer match.
//!
//! The engine is advanced one frame at a time by an external loop and
//! never renders or reads devices itself.

pub mod action_subsystem;
pub mod ball_subsystem;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod goal_subsystem;
pub mod input;
pub mod movement_subsystem;
pub mod phase_subsystem;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod subsystem;
pub mod types;
