//! Rock Wedge - a wrap-around asteroids simulation
//!
//! Core modules:
//! - `types`, `entities`: integer kinematics on a six-step heading wheel
//! - `collision`: circle overlap tests
//! - `registry`: live asteroids and bullets
//! - `game`: the per-tick simulation step and session bookkeeping
//! - `rendering`, `terminal_io`: crossterm render and input hooks

pub mod collision;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod game;
pub mod registry;
pub mod rendering;
pub mod terminal_io;
pub mod types;

pub use config::GameConfig;
pub use error::GameError;
pub use game::{Game, PlayerAction, RenderView, SessionState, TickReport};
