//! # hostwatch-server
//!
//! The HTTP adapter: routing, request parsing, error mapping and logging setup.
//! The binary in `main.rs` only parses flags, wires [`state::AppState`] and serves
//! [`api::router`].

pub mod api;
pub mod cli;
pub mod error;
pub mod logging;
pub mod state;
