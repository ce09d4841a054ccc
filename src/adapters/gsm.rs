//! GSM modem adapter (SIM800-class, AT command set).
//!
//! Implements both outbound ports: [`AlertNotifier`] as SMS in text mode,
//! and [`TelemetryPublisher`] as an HTTP GET against the data platform
//! over GPRS. The modem is driven through the [`ModemLink`] trait so every
//! command sequence is testable against a scripted fake.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::TelemetryData;
use crate::app::ports::{AlertNotifier, TelemetryPublisher};
use crate::error::CommsError;

/// Longest modem response we care about. HTTPREAD payloads beyond this are
/// truncated by the link, which is fine — we only scan for result tokens.
pub const RESPONSE_CAP: usize = 256;

pub type ModemResponse = heapless::String<RESPONSE_CAP>;

/// Byte-level access to the modem's serial line plus a delay source.
///
/// `read_response` collects whatever the modem sends back within the
/// budget; an empty string means the modem stayed silent.
pub trait ModemLink {
    fn write_line(&mut self, line: &str);
    fn write_raw(&mut self, bytes: &[u8]);
    fn read_response(&mut self, budget_ms: u32) -> ModemResponse;
    fn delay_ms(&mut self, ms: u32);
}

/// Bounded retry for commands the modem answers with `ERROR`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u8,
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_ms: 1000,
        }
    }
}

const SMS_TERMINATOR: u8 = 0x1A; // Ctrl+Z ends the message body
const GPRS_ATTACH_ATTEMPTS: u8 = 3;
const HTTP_ACTION_BUDGET_MS: u32 = 15_000;
const SMS_PROMPT_BUDGET_MS: u32 = 5_000;

pub struct GsmModem<L: ModemLink> {
    link: L,
    apn: heapless::String<32>,
    api_key: heapless::String<32>,
    alert_phone: heapless::String<20>,
    retry: RetryPolicy,
}

impl<L: ModemLink> GsmModem<L> {
    pub fn new(link: L, apn: &str, api_key: &str, alert_phone: &str) -> Self {
        Self {
            link,
            apn: heapless::String::try_from(apn).unwrap_or_default(),
            api_key: heapless::String::try_from(api_key).unwrap_or_default(),
            alert_phone: heapless::String::try_from(alert_phone).unwrap_or_default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // ── Bring-up ──────────────────────────────────────────────

    /// Modem bring-up: sanity check, factory reset, echo off, SMS text
    /// mode, then GPRS attach. The modem needs a few seconds after power
    /// before it answers at all.
    pub fn init(&mut self) -> Result<(), CommsError> {
        info!("initializing GSM modem");
        self.link.delay_ms(3000);

        self.send_command("AT", 500)?;
        self.send_command("ATZ", 1000)?;
        self.send_command("ATE0", 500)?;
        self.send_command("AT+CMGF=1", 500)?;
        // Close any bearer left open from a previous boot.
        let _ = self.send_command("AT+SAPBR=0,1", 2000);

        self.attach_gprs()
    }

    fn attach_gprs(&mut self) -> Result<(), CommsError> {
        self.send_command("AT+SAPBR=3,1,\"CONTYPE\",\"GPRS\"", 1000)?;

        let mut apn_cmd: heapless::String<64> = heapless::String::new();
        let _ = write!(apn_cmd, "AT+SAPBR=3,1,\"APN\",\"{}\"", self.apn);
        self.send_command(&apn_cmd, 1000)?;

        for attempt in 1..=GPRS_ATTACH_ATTEMPTS {
            let _ = self.send_command("AT+SAPBR=1,1", 3000);
            if self.bearer_open() {
                info!("GPRS bearer open (attempt {attempt})");
                self.send_command("AT+HTTPINIT", 1000)?;
                self.send_command("AT+HTTPPARA=\"CID\",1", 1000)?;
                return Ok(());
            }
            warn!("GPRS attach failed, attempt {attempt}/{GPRS_ATTACH_ATTEMPTS}");
            self.link.delay_ms(2000);
        }
        Err(CommsError::NotifierUnreachable)
    }

    fn bearer_open(&mut self) -> bool {
        self.link.write_line("AT+SAPBR=2,1");
        let response = self.link.read_response(1000);
        response.contains("+SAPBR: 1,1")
    }

    // ── Command plumbing ──────────────────────────────────────

    /// Send one AT command and collect the response, retrying on `ERROR`
    /// per the retry policy.
    fn send_command(&mut self, command: &str, settle_ms: u32) -> Result<ModemResponse, CommsError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.link.write_line(command);
            self.link.delay_ms(settle_ms);
            let response = self.link.read_response(2000);

            if !response.contains("ERROR") {
                return Ok(response);
            }
            if attempt >= self.retry.max_attempts {
                warn!("modem rejected '{command}' after {attempt} attempts");
                return Err(CommsError::CommandRejected);
            }
            warn!("modem error on '{command}', retrying");
            self.link.delay_ms(self.retry.backoff_ms);
        }
    }

    // ── Telemetry URL ─────────────────────────────────────────

    /// Field positions 1-8 are fixed by the channel layout; particulate
    /// fields are omitted entirely when the last frame failed validation so
    /// the platform never charts garbage.
    fn build_update_url(&self, data: &TelemetryData) -> heapless::String<RESPONSE_CAP> {
        let mut url = heapless::String::new();
        let _ = write!(
            url,
            "http://api.thingspeak.com/update?api_key={}\
             &field1={:.2}&field2={:.2}&field3={}&field4={}&field5={}&field6={}",
            self.api_key, data.temperature_c, data.humidity_pct, data.mq135, data.mq2, data.mq4,
            data.mq9,
        );
        if data.pm_valid {
            let _ = write!(url, "&field7={}&field8={}", data.pm25, data.pm10);
        }
        url
    }
}

impl<L: ModemLink> AlertNotifier for GsmModem<L> {
    /// Send `text` as an SMS to the configured alert number.
    ///
    /// The modem must echo the `>` prompt before it will accept a body;
    /// a missing prompt aborts rather than spraying bytes at a confused
    /// modem.
    fn send_alert(&mut self, text: &str) -> Result<(), CommsError> {
        self.send_command("AT+CMGF=1", 500)?;

        let mut recipient: heapless::String<48> = heapless::String::new();
        let _ = write!(recipient, "AT+CMGS=\"{}\"", self.alert_phone);
        self.link.write_line(&recipient);

        let prompt = self.link.read_response(SMS_PROMPT_BUDGET_MS);
        if !prompt.contains('>') {
            warn!("SMS prompt not received, aborting send");
            return Err(CommsError::NotifierUnreachable);
        }

        self.link.write_raw(text.as_bytes());
        self.link.write_raw(&[SMS_TERMINATOR]);

        let confirm = self.link.read_response(5000);
        if confirm.contains("ERROR") {
            return Err(CommsError::CommandRejected);
        }
        info!("SMS alert sent ({} chars)", text.len());
        Ok(())
    }
}

impl<L: ModemLink> TelemetryPublisher for GsmModem<L> {
    fn publish(&mut self, data: &TelemetryData) -> Result<(), CommsError> {
        if !self.bearer_open() {
            warn!("GPRS bearer closed, re-attaching");
            self.attach_gprs()?;
        }

        let url = self.build_update_url(data);

        // Fresh HTTP session per upload. HTTPTERM errors when no session
        // exists, which is fine.
        let _ = self.send_command("AT+HTTPTERM", 1000);
        self.send_command("AT+HTTPINIT", 1000)?;
        self.send_command("AT+HTTPPARA=\"CID\",1", 1000)?;

        let mut url_cmd: heapless::String<{ RESPONSE_CAP + 32 }> = heapless::String::new();
        let _ = write!(url_cmd, "AT+HTTPPARA=\"URL\",\"{url}\"");
        self.send_command(&url_cmd, 2000)?;

        self.link.write_line("AT+HTTPACTION=0");
        let action = self.link.read_response(HTTP_ACTION_BUDGET_MS);

        // Drain the body and tear down regardless of status.
        let _ = self.send_command("AT+HTTPREAD", 500);
        let _ = self.send_command("AT+HTTPTERM", 500);

        if action.contains("+HTTPACTION: 0,200") {
            info!("telemetry uploaded");
            Ok(())
        } else {
            warn!("telemetry upload failed: {action}");
            Err(CommsError::PublishFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted modem: pops canned responses, records everything written.
    struct FakeModem {
        responses: VecDeque<&'static str>,
        lines: Vec<String>,
        raw: Vec<u8>,
    }

    impl FakeModem {
        fn new(responses: &[&'static str]) -> Self {
            Self {
                responses: responses.iter().copied().collect(),
                lines: Vec::new(),
                raw: Vec::new(),
            }
        }
    }

    impl ModemLink for FakeModem {
        fn write_line(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }

        fn write_raw(&mut self, bytes: &[u8]) {
            self.raw.extend_from_slice(bytes);
        }

        fn read_response(&mut self, _budget_ms: u32) -> ModemResponse {
            let text = self.responses.pop_front().unwrap_or("");
            heapless::String::try_from(text).unwrap()
        }

        fn delay_ms(&mut self, _ms: u32) {}
    }

    fn telemetry(pm_valid: bool) -> TelemetryData {
        TelemetryData {
            temperature_c: 24.5,
            humidity_pct: 61.0,
            mq135: 300,
            mq2: 120,
            mq4: 110,
            mq9: 90,
            pm25: 12,
            pm10: 20,
            pm_valid,
        }
    }

    #[test]
    fn sms_writes_body_and_terminator() {
        // CMGF ok, prompt, send confirmation.
        let link = FakeModem::new(&["OK", ">", "+CMGS: 3\r\nOK"]);
        let mut modem = GsmModem::new(link, "internet", "KEY", "+15551234567");
        modem.send_alert("ALERT: High temperature: 32.0C. ").unwrap();

        assert!(modem.link.lines.contains(&"AT+CMGS=\"+15551234567\"".to_string()));
        let body = String::from_utf8(modem.link.raw.clone()).unwrap();
        assert!(body.starts_with("ALERT: High temperature: 32.0C. "));
        assert_eq!(*modem.link.raw.last().unwrap(), SMS_TERMINATOR);
    }

    #[test]
    fn sms_aborts_without_prompt() {
        // CMGF ok, then silence instead of the '>' prompt.
        let link = FakeModem::new(&["OK", ""]);
        let mut modem = GsmModem::new(link, "internet", "KEY", "+15551234567");
        let err = modem.send_alert("ALERT: test").unwrap_err();
        assert_eq!(err, CommsError::NotifierUnreachable);
        // No body bytes went out.
        assert!(modem.link.raw.is_empty());
    }

    #[test]
    fn command_retries_once_on_error_then_succeeds() {
        let link = FakeModem::new(&["ERROR", "OK"]);
        let mut modem = GsmModem::new(link, "internet", "KEY", "+1");
        let response = modem.send_command("AT+CMGF=1", 0).unwrap();
        assert_eq!(response.as_str(), "OK");
        assert_eq!(modem.link.lines.len(), 2);
    }

    #[test]
    fn command_gives_up_after_max_attempts() {
        let link = FakeModem::new(&["ERROR", "ERROR"]);
        let mut modem = GsmModem::new(link, "internet", "KEY", "+1");
        let err = modem.send_command("AT+HTTPINIT", 0).unwrap_err();
        assert_eq!(err, CommsError::CommandRejected);
    }

    #[test]
    fn url_includes_pm_fields_only_when_valid() {
        let modem = GsmModem::new(FakeModem::new(&[]), "internet", "KEY", "+1");

        let with_pm = modem.build_update_url(&telemetry(true));
        assert!(with_pm.contains("field1=24.50"));
        assert!(with_pm.contains("field6=90"));
        assert!(with_pm.contains("field7=12"));
        assert!(with_pm.contains("field8=20"));

        let without_pm = modem.build_update_url(&telemetry(false));
        assert!(without_pm.contains("field6=90"));
        assert!(!without_pm.contains("field7"));
        assert!(!without_pm.contains("field8"));
    }

    #[test]
    fn publish_fails_without_http_200() {
        // Bearer query ok, HTTPTERM/HTTPINIT/CID/URL ok, action times out,
        // then HTTPREAD/HTTPTERM drains.
        let link = FakeModem::new(&[
            "+SAPBR: 1,1",
            "OK",
            "OK",
            "OK",
            "OK",
            "", // no +HTTPACTION status
            "OK",
            "OK",
        ]);
        let mut modem = GsmModem::new(link, "internet", "KEY", "+1");
        let err = modem.publish(&telemetry(true)).unwrap_err();
        assert_eq!(err, CommsError::PublishFailed);
    }

    #[test]
    fn publish_succeeds_on_http_200() {
        let link = FakeModem::new(&[
            "+SAPBR: 1,1",
            "OK",
            "OK",
            "OK",
            "OK",
            "+HTTPACTION: 0,200,4",
            "OK",
            "OK",
        ]);
        let mut modem = GsmModem::new(link, "internet", "KEY", "+1");
        modem.publish(&telemetry(true)).unwrap();
        assert!(modem
            .link
            .lines
            .iter()
            .any(|l| l.contains("AT+HTTPPARA=\"URL\"")));
    }
}
