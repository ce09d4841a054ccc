//! Adapters — the outer ring of the hexagon.
//!
//! Each adapter binds a port trait from [`crate::app::ports`] to a real
//! transport: GPIO and UART on the device, the GSM modem for outbound
//! comms, the serial log for events. Everything except `hardware` is
//! host-testable.

pub mod gsm;
pub mod log_sink;

#[cfg(target_os = "espidf")]
pub mod hardware;
