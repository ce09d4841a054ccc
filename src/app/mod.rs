//! Application layer — ports, events, and the monitor service.
//!
//! The hexagonal core: everything in here is hardware-agnostic and runs on
//! the host under test.

pub mod events;
pub mod ports;
pub mod service;
