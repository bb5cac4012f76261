//! # Network Models
//!
//! Value objects describing what the service is allowed to touch on the network.
//!
//! * [`target`]: Validation of user supplied scan targets.
//! * [`port`]: Validation of port numbers.
//! * [`range`]: The fixed allow list of private IPv4 networks.
//! * [`interface`]: Helpers over the host's network interfaces.

pub mod interface;
pub mod port;
pub mod range;
pub mod target;
