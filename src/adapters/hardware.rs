//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Configures ADC channels, GPIO directions, and both UARTs using raw
//! ESP-IDF sys calls, then exposes the whole board through [`SensorPort`]
//! and [`IndicatorPort`]. This is the only module in the system that
//! touches actual hardware; everything above it runs on the host.

use esp_idf_hal::delay::FreeRtos;
use esp_idf_svc::sys::*;
use log::info;

use crate::app::ports::{IndicatorPort, SensorPort};
use crate::error::{Error, Result};
use crate::indicators::IndicatorCommand;
use crate::pins;
use crate::pms::sync::ByteSource;
use crate::sensors::gas::GasChannel;
use crate::sensors::particulate::ParticulateLink;
use crate::sensors::{SensorHub, SensorSnapshot};

// ── One-shot peripheral init ──────────────────────────────────

/// Configure ADC, GPIO, and both UARTs. Called once from `main()` before
/// the polling loop starts.
pub fn init_peripherals() -> Result<()> {
    // SAFETY: called once from main() before the loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
        init_uart(PMS_UART, pins::PMS_UART_TX_GPIO, pins::PMS_UART_RX_GPIO, pins::PMS_UART_BAUD)?;
        init_uart(GSM_UART, pins::GSM_UART_TX_GPIO, pins::GSM_UART_RX_GPIO, pins::GSM_UART_BAUD)?;
    }
    info!("hardware: all peripherals configured");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: written once during `init_adc()`; all later access is from the
/// single-threaded main loop.
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

const MQ_ADC_CHANNELS: [u32; 4] = [
    pins::MQ135_ADC_CHANNEL,
    pins::MQ2_ADC_CHANNEL,
    pins::MQ4_ADC_CHANNEL,
    pins::MQ9_ADC_CHANNEL,
];

unsafe fn init_adc() -> Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 unit init failed"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for &channel in &MQ_ADC_CHANNELS {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("ADC1 channel config failed"));
        }
    }
    info!("hardware: ADC1 configured for 4 MQ channels");
    Ok(())
}

/// Raw ADC counts for one gas channel. Errors read as zero — a dead ADC
/// must not trip gas alerts.
pub fn gas_adc_read(channel: GasChannel) -> u16 {
    let adc_channel = MQ_ADC_CHANNELS[channel as usize];
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), adc_channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO outputs ──────────────────────────────────────────────

unsafe fn init_gpio_outputs() -> Result<()> {
    let output_pins = [
        pins::GREEN_LED_GPIO,
        pins::YELLOW_LED_GPIO,
        pins::RED_LED_GPIO,
        pins::BUZZER_GPIO,
        pins::PMS_RESET_GPIO,
    ];
    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("GPIO output config failed"));
        }
    }
    // PMS reset is active LOW; hold it high so the sensor runs.
    unsafe { gpio_set_level(pins::PMS_RESET_GPIO, 1) };
    Ok(())
}

fn gpio_write(pin: i32, on: bool) {
    // SAFETY: pin configured as output during init_gpio_outputs().
    unsafe { gpio_set_level(pin, u32::from(on)) };
}

// ── DHT22 single-wire protocol ────────────────────────────────

/// Bit-bang one DHT22 transaction: 40 data bits, pulse-width encoded.
///
/// Returns `(temperature_c, humidity_pct)`, or `None` on a timing or
/// checksum failure. The caller enforces the 2-second minimum interval.
pub fn dht_read() -> Option<(f32, f32)> {
    let pin = pins::DHT_GPIO;
    let mut bytes = [0u8; 5];

    // SAFETY: single-threaded main-loop access to one GPIO.
    unsafe {
        // Host start signal: pull low >1ms, release, switch to input.
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
        gpio_set_level(pin, 0);
        esp_rom_delay_us(1100);
        gpio_set_level(pin, 1);
        esp_rom_delay_us(30);
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);

        // Sensor response: ~80us low then ~80us high.
        wait_level(pin, 0, 100)?;
        wait_level(pin, 1, 100)?;
        wait_level(pin, 0, 100)?;

        // 40 bits: 50us low preamble, then high 26-28us (0) or 70us (1).
        for bit in 0..40 {
            wait_level(pin, 1, 70)?;
            let width = pulse_width(pin, 1, 100)?;
            if width > 40 {
                bytes[bit / 8] |= 1 << (7 - bit % 8);
            }
        }

        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
        gpio_set_level(pin, 1);
    }

    let sum = bytes[0]
        .wrapping_add(bytes[1])
        .wrapping_add(bytes[2])
        .wrapping_add(bytes[3]);
    if sum != bytes[4] {
        return None;
    }

    let humidity = f32::from(u16::from_be_bytes([bytes[0], bytes[1]])) / 10.0;
    let raw_temp = u16::from_be_bytes([bytes[2], bytes[3]]);
    // Sign bit in the MSB, magnitude in the remaining 15 bits.
    let magnitude = f32::from(raw_temp & 0x7FFF) / 10.0;
    let temperature = if raw_temp & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    };
    Some((temperature, humidity))
}

/// Busy-wait until the pin reads `level`. `None` on timeout.
unsafe fn wait_level(pin: i32, level: i32, budget_us: u32) -> Option<()> {
    let mut waited = 0;
    // SAFETY: caller holds the single-threaded GPIO contract.
    while unsafe { gpio_get_level(pin) } != level {
        if waited >= budget_us {
            return None;
        }
        unsafe { esp_rom_delay_us(1) };
        waited += 1;
    }
    Some(())
}

/// Measure how long the pin stays at `level`, in microseconds.
unsafe fn pulse_width(pin: i32, level: i32, budget_us: u32) -> Option<u32> {
    let mut width = 0;
    // SAFETY: caller holds the single-threaded GPIO contract.
    while unsafe { gpio_get_level(pin) } == level {
        if width >= budget_us {
            return None;
        }
        unsafe { esp_rom_delay_us(1) };
        width += 1;
    }
    Some(width)
}

// ── UART plumbing ─────────────────────────────────────────────

const PMS_UART: uart_port_t = 1;
const GSM_UART: uart_port_t = 2;
const UART_RX_BUF: i32 = 512;

unsafe fn init_uart(port: uart_port_t, tx: i32, rx: i32, baud: u32) -> Result<()> {
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: called once per port during init.
    unsafe {
        if uart_driver_install(port, UART_RX_BUF, 0, 0, core::ptr::null_mut(), 0) != ESP_OK as i32
        {
            return Err(Error::Init("UART driver install failed"));
        }
        if uart_param_config(port, &cfg) != ESP_OK as i32 {
            return Err(Error::Init("UART param config failed"));
        }
        if uart_set_pin(port, tx, rx, -1, -1) != ESP_OK as i32 {
            return Err(Error::Init("UART pin config failed"));
        }
    }
    Ok(())
}

fn uart_buffered(port: uart_port_t) -> usize {
    let mut len: usize = 0;
    // SAFETY: driver installed during init_uart().
    unsafe { uart_get_buffered_data_len(port, &mut len) };
    len
}

fn uart_read_one(port: uart_port_t) -> Option<u8> {
    let mut byte = 0u8;
    // SAFETY: driver installed during init_uart(); zero timeout, non-blocking.
    let n = unsafe { uart_read_bytes(port, (&mut byte as *mut u8).cast(), 1, 0) };
    (n == 1).then_some(byte)
}

fn uart_write(port: uart_port_t, bytes: &[u8]) {
    // SAFETY: driver installed during init_uart().
    unsafe { uart_write_bytes(port, bytes.as_ptr().cast(), bytes.len()) };
}

// ── PMS5003 serial link ───────────────────────────────────────

/// UART1 link to the particulate sensor, with the RESET line attached.
///
/// The UART driver has no peek, so one byte of pushback covers the frame
/// scanner's lookahead.
pub struct PmsUartLink {
    pushback: Option<u8>,
}

impl PmsUartLink {
    pub fn new() -> Self {
        Self { pushback: None }
    }
}

impl Default for PmsUartLink {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for PmsUartLink {
    fn available(&self) -> usize {
        uart_buffered(PMS_UART) + usize::from(self.pushback.is_some())
    }

    fn peek(&mut self) -> Option<u8> {
        if self.pushback.is_none() {
            self.pushback = uart_read_one(PMS_UART);
        }
        self.pushback
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.pushback.take().or_else(|| uart_read_one(PMS_UART))
    }

    fn wait_for(&mut self, count: usize, budget_ms: u32) -> bool {
        let mut waited = 0;
        while self.available() < count {
            if waited >= budget_ms {
                return false;
            }
            FreeRtos::delay_ms(10);
            waited += 10;
        }
        true
    }
}

impl ParticulateLink for PmsUartLink {
    fn hardware_reset(&mut self) -> bool {
        gpio_write(pins::PMS_RESET_GPIO, false);
        FreeRtos::delay_ms(10);
        gpio_write(pins::PMS_RESET_GPIO, true);
        // Datasheet allows ~2s to resume frames after reset.
        FreeRtos::delay_ms(2000);
        true
    }

    fn drain(&mut self) {
        self.pushback = None;
        // SAFETY: driver installed during init_uart().
        unsafe { uart_flush_input(PMS_UART) };
    }
}

// ── GSM modem serial link ─────────────────────────────────────

use crate::adapters::gsm::{ModemLink, ModemResponse};

/// UART2 link to the GSM modem.
pub struct GsmUartLink;

impl ModemLink for GsmUartLink {
    fn write_line(&mut self, line: &str) {
        uart_write(GSM_UART, line.as_bytes());
        uart_write(GSM_UART, b"\r\n");
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        uart_write(GSM_UART, bytes);
    }

    fn read_response(&mut self, budget_ms: u32) -> ModemResponse {
        let mut response = ModemResponse::new();
        let mut waited = 0;
        // Wait for the first byte, then keep reading until the line idles.
        while uart_buffered(GSM_UART) == 0 {
            if waited >= budget_ms {
                return response;
            }
            FreeRtos::delay_ms(10);
            waited += 10;
        }
        FreeRtos::delay_ms(100);
        while let Some(byte) = uart_read_one(GSM_UART) {
            // Past capacity we keep draining but stop storing.
            let _ = response.push(byte as char);
        }
        response
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

// ── Port adapter ──────────────────────────────────────────────

/// Concrete adapter that combines all board hardware behind port traits.
pub struct HardwareAdapter {
    hub: SensorHub<PmsUartLink>,
}

impl HardwareAdapter {
    pub fn new(hub: SensorHub<PmsUartLink>) -> Self {
        Self { hub }
    }
}

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self, now_ms: u64) -> SensorSnapshot {
        self.hub.read_all(now_ms)
    }
}

impl IndicatorPort for HardwareAdapter {
    fn apply(&mut self, cmd: &IndicatorCommand) {
        gpio_write(pins::GREEN_LED_GPIO, cmd.green);
        gpio_write(pins::YELLOW_LED_GPIO, cmd.yellow);
        gpio_write(pins::RED_LED_GPIO, cmd.red);
        gpio_write(pins::BUZZER_GPIO, cmd.buzzer);
    }
}
