//! Pipeline payloads and the NDJSON record format.
//!
//! Uses `heapless` types for no_std/no-alloc operation. Every record the
//! Logger emits is one JSON object terminated by a newline.
use heapless::{String, Vec};
use serde::Serialize;

use crate::config::{MAX_RECORD_LEN, MAX_SSID_LEN};

/// Bounded network identifier
pub type SsidString = String<MAX_SSID_LEN>;

/// One serialized record, trailing newline included
pub type LogRecord = Vec<u8, MAX_RECORD_LEN>;

/// Firmware version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One observed network, passed by value from Scanner to Checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEvent {
    pub ssid: SsidString,
}

impl NetworkEvent {
    /// Returns `None` if the identifier does not fit in `MAX_SSID_LEN` bytes.
    pub fn new(ssid: &str) -> Option<Self> {
        SsidString::try_from(ssid).ok().map(|ssid| Self { ssid })
    }

    pub fn ssid(&self) -> &str {
        self.ssid.as_str()
    }
}

/// Records produced by the monitor
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum MonitorMessage<'a> {
    /// Authorized network observed
    #[serde(rename = "ok")]
    Authorized {
        ssid: &'a str,
        /// Uptime in milliseconds when classified
        ts: u32,
    },
    /// Unauthorized network observed
    #[serde(rename = "alert")]
    Alert {
        ssid: &'a str,
        /// Running alert count for this generation
        count: u32,
        ts: u32,
    },
    /// Periodic supervisor report
    #[serde(rename = "status")]
    Status {
        /// Uptime in seconds
        uptime: u32,
        /// Events published to the checker
        seen: u32,
        alerts: u32,
        /// Events and records lost to backpressure
        dropped: u32,
    },
    /// First record of every generation
    #[serde(rename = "boot")]
    Boot {
        board: &'static str,
        version: &'static str,
        generation: u32,
    },
}

/// Serialize a message as one NDJSON line into `buf`.
/// Returns the number of bytes written, or None if it does not fit
/// (newline included).
pub fn serialize_message(msg: &MonitorMessage, buf: &mut [u8]) -> Option<usize> {
    let len = serde_json_core::to_slice(msg, buf).ok()?;
    if len < buf.len() {
        buf[len] = b'\n';
        Some(len + 1)
    } else {
        None
    }
}

/// Encode a message into a [`LogRecord`]. `None` means the record would have
/// been truncated; nothing partial is ever returned.
pub fn encode(msg: &MonitorMessage) -> Option<LogRecord> {
    let mut buf = LogRecord::new();
    buf.resize_default(MAX_RECORD_LEN).ok();
    let len = serialize_message(msg, &mut buf)?;
    buf.truncate(len);
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(record: &LogRecord) -> &str {
        core::str::from_utf8(record).unwrap()
    }

    // ── NetworkEvent ────────────────────────────────────────────────

    #[test]
    fn event_accepts_max_length_ssid() {
        let name = "s".repeat(MAX_SSID_LEN);
        let event = NetworkEvent::new(&name).unwrap();
        assert_eq!(event.ssid(), name);
    }

    #[test]
    fn event_rejects_over_long_ssid() {
        let name = "s".repeat(MAX_SSID_LEN + 1);
        assert!(NetworkEvent::new(&name).is_none());
    }

    // ── Record serialization ────────────────────────────────────────

    #[test]
    fn authorized_record_layout() {
        let record = encode(&MonitorMessage::Authorized {
            ssid: "IoT_Secure",
            ts: 1500,
        })
        .unwrap();
        assert_eq!(line(&record), "{\"type\":\"ok\",\"ssid\":\"IoT_Secure\",\"ts\":1500}\n");
    }

    #[test]
    fn alert_record_carries_count() {
        let record = encode(&MonitorMessage::Alert {
            ssid: "EvilTwin",
            count: 3,
            ts: 42,
        })
        .unwrap();
        let json = line(&record);
        assert!(json.starts_with(r#"{"type":"alert","ssid":"EvilTwin","count":3"#));
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn status_record_fits_with_max_counters() {
        let record = encode(&MonitorMessage::Status {
            uptime: u32::MAX,
            seen: u32::MAX,
            alerts: u32::MAX,
            dropped: u32::MAX,
        })
        .unwrap();
        let json = line(&record);
        assert!(json.contains(r#""type":"status""#));
        assert!(json.contains(r#""dropped":4294967295"#));
    }

    #[test]
    fn boot_record_reports_board_and_version() {
        let record = encode(&MonitorMessage::Boot {
            board: "xiao_esp32s3",
            version: VERSION,
            generation: 2,
        })
        .unwrap();
        let json = line(&record);
        assert!(json.contains(r#""type":"boot""#));
        assert!(json.contains(r#""board":"xiao_esp32s3""#));
        assert!(json.contains(r#""generation":2"#));
    }

    #[test]
    fn worst_case_alert_fits_in_record() {
        let ssid = "W".repeat(MAX_SSID_LEN);
        let record = encode(&MonitorMessage::Alert {
            ssid: &ssid,
            count: u32::MAX,
            ts: u32::MAX,
        });
        assert!(record.is_some());
    }

    #[test]
    fn escaped_ssid_still_fits() {
        // Quotes double in size once escaped
        let ssid = "\"".repeat(MAX_SSID_LEN);
        let record = encode(&MonitorMessage::Alert {
            ssid: &ssid,
            count: 1,
            ts: 1,
        })
        .unwrap();
        assert!(record.len() <= MAX_RECORD_LEN);
    }

    #[test]
    fn oversized_message_is_rejected_not_truncated() {
        let msg = MonitorMessage::Authorized {
            ssid: "IoT_Secure",
            ts: 0,
        };
        let mut small = [0u8; 16];
        assert_eq!(serialize_message(&msg, &mut small), None);
    }

    #[test]
    fn message_without_room_for_newline_is_rejected() {
        let msg = MonitorMessage::Authorized { ssid: "A", ts: 0 };
        // {"type":"ok","ssid":"A","ts":0} is 31 bytes
        let mut exact = [0u8; 31];
        assert_eq!(serialize_message(&msg, &mut exact), None);
        let mut roomy = [0u8; 32];
        assert_eq!(serialize_message(&msg, &mut roomy), Some(32));
        assert_eq!(roomy[31], b'\n');
    }

    // ── Version constant ────────────────────────────────────────────

    #[test]
    fn version_is_semver() {
        let parts: heapless::Vec<&str, 4> = VERSION.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "VERSION should be semver (major.minor.patch)"
        );
        for part in &parts {
            assert!(part.parse::<u32>().is_ok(), "'{part}' is not a number");
        }
    }
}
