//! # hostwatch-common
//!
//! Models and pure policy shared by the `hostwatch` crates.
//!
//! * **[`config`]**: Runtime configuration (file, environment, defaults).
//! * **[`network`]**: Scan-target validation, port validation and the private-network allow list.
//!
//! Nothing in this crate performs network I/O.

pub mod config;
pub mod network;
