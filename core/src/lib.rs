//! # hostwatch-core
//!
//! The I/O side of the service.
//!
//! * **[`probe`]**: Single-attempt TCP connect checks.
//! * **[`scanner`]**: Bounded execution of the external scan tool and helper scripts.
//! * **[`checks`]**: The connectivity use cases that tie validation to probing.
//! * **[`services`]**: Loading the configured services catalogue.
//! * **[`system`]**: Host telemetry and container detection.
//! * **[`cloud`]**: Cloud instance metadata lookups.
//!
//! Policy (what may be probed) lives in `hostwatch-common`; this crate only performs it.

pub mod checks;
pub mod cloud;
pub mod probe;
pub mod scanner;
pub mod services;
pub mod system;
