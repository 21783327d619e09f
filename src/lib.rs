//! Starship Commander: a single-screen arcade shooter.
//!
//! Game logic lives in this library; `main.rs` drives it in a terminal.

pub mod assets;
pub mod audio;
pub mod bus;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod handlers;
pub mod session;
pub mod starfield;
pub mod surface;
pub mod timers;
