//! GPIO / peripheral pin assignments for the monitor main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors — digital
// ---------------------------------------------------------------------------

/// DHT22 single-wire data line.
pub const DHT_GPIO: i32 = 4;
/// PMS5003 hardware reset line (active LOW).
pub const PMS_RESET_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Sensors — analog (ADC1, oneshot)
// ---------------------------------------------------------------------------

/// MQ-135 air quality — ADC1 channel 6 (GPIO 7 on ESP32-S3).
pub const MQ135_ADC_CHANNEL: u32 = 6;
/// MQ-2 combustible gas — ADC1 channel 7 (GPIO 8).
pub const MQ2_ADC_CHANNEL: u32 = 7;
/// MQ-4 methane — ADC1 channel 8 (GPIO 9).
pub const MQ4_ADC_CHANNEL: u32 = 8;
/// MQ-9 CO / combustible gas — ADC1 channel 9 (GPIO 10).
pub const MQ9_ADC_CHANNEL: u32 = 9;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Green LED — steady when severity is NORMAL.
pub const GREEN_LED_GPIO: i32 = 47;
/// Yellow LED — blinks at WARNING.
pub const YELLOW_LED_GPIO: i32 = 48;
/// Red LED — blinks at CRITICAL.
pub const RED_LED_GPIO: i32 = 21;
/// Piezo buzzer (active HIGH).
pub const BUZZER_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Serial links
// ---------------------------------------------------------------------------

/// PMS5003 on UART1. The sensor only transmits; TX is wired for the
/// optional passive-mode commands.
pub const PMS_UART_RX_GPIO: i32 = 18;
pub const PMS_UART_TX_GPIO: i32 = 17;
pub const PMS_UART_BAUD: u32 = 9600;

/// GSM modem on UART2.
pub const GSM_UART_RX_GPIO: i32 = 16;
pub const GSM_UART_TX_GPIO: i32 = 15;
pub const GSM_UART_BAUD: u32 = 9600;
