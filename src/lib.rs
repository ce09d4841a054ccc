//! AirSentry firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alert;
pub mod app;
pub mod config;
pub mod indicators;
pub mod pms;

pub mod error;
pub mod pins;

// Adapters and sensor drivers compile on the host too; the hardware-facing
// paths inside are guarded by cfg attributes.
pub mod adapters;
pub mod sensors;
