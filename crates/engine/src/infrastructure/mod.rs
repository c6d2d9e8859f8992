//! Infrastructure implementations.
//!
//! Contains port trait implementations for the host services the rules use.

pub mod announcer;
pub mod authorization;
pub mod clock;
pub mod config;
pub mod memory;
pub mod ports;
pub mod targeting;
