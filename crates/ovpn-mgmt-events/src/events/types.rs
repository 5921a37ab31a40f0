//! Event enum, per-kind payloads, and the tag vocabulary.

use bstr::BString;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::events::state::{parse_unix_timestamp, ConnectionState};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tag vocabulary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Recognised event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `HOLD`
    Hold,
    /// `ECHO`
    Echo,
    /// `STATE`
    State,
    /// `BYTECOUNT`
    ByteCount,
    /// `BYTECOUNT_CLI`
    ByteCountClient,
    /// `PASSWORD`
    Password,
    /// `FATAL`
    Fatal,
}

/// Static tag table used for dispatch.
const TAGS: &[(&str, EventKind)] = &[
    ("HOLD", EventKind::Hold),
    ("ECHO", EventKind::Echo),
    ("STATE", EventKind::State),
    ("BYTECOUNT", EventKind::ByteCount),
    ("BYTECOUNT_CLI", EventKind::ByteCountClient),
    ("PASSWORD", EventKind::Password),
    ("FATAL", EventKind::Fatal),
];

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        Self::Hold,
        Self::Echo,
        Self::State,
        Self::ByteCount,
        Self::ByteCountClient,
        Self::Password,
        Self::Fatal,
    ];

    /// Look up a tag. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.iter().find(|(t, _)| *t == tag).map(|(_, k)| *k)
    }

    /// The wire tag for this kind.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Hold => "HOLD",
            Self::Echo => "ECHO",
            Self::State => "STATE",
            Self::ByteCount => "BYTECOUNT",
            Self::ByteCountClient => "BYTECOUNT_CLI",
            Self::Password => "PASSWORD",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Returned when a string is not one of the recognised tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised management event tag: {tag:?}")]
pub struct ParseKindError {
    pub tag: String,
}

impl FromStr for EventKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseKindError { tag: s.to_string() })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Event
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One classified management line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Line without a `TAG:` prefix.
    Malformed(MalformedEvent),
    /// Well-shaped line with a tag outside the vocabulary.
    Unknown(UnknownEvent),
    Hold(HoldEvent),
    Echo(EchoEvent),
    State(StateEvent),
    /// `BYTECOUNT` and `BYTECOUNT_CLI`.
    ByteCount(ByteCountEvent),
    Password(PasswordEvent),
    Fatal(FatalEvent),
}

impl Event {
    /// Recognised kind, `None` for Malformed and Unknown.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Malformed(_) | Self::Unknown(_) => None,
            Self::Hold(_) => Some(EventKind::Hold),
            Self::Echo(_) => Some(EventKind::Echo),
            Self::State(_) => Some(EventKind::State),
            Self::ByteCount(bc) if bc.per_client => Some(EventKind::ByteCountClient),
            Self::ByteCount(_) => Some(EventKind::ByteCount),
            Self::Password(_) => Some(EventKind::Password),
            Self::Fatal(_) => Some(EventKind::Fatal),
        }
    }

    /// Tag the line carried. `None` only for Malformed lines.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Malformed(_) => None,
            Self::Unknown(u) => Some(&u.tag),
            other => other.kind().map(|k| k.as_tag()),
        }
    }

    /// Unsplit body text, for kinds that keep it.
    ///
    /// Echo, State and ByteCount bodies are split into fields and are not
    /// retained, so they return `None` here.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Unknown(u) => Some(&u.body),
            Self::Hold(h) => Some(&h.reason),
            Self::Password(p) => Some(&p.message),
            Self::Fatal(f) => Some(&f.message),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => e.fmt(f),
            Self::Unknown(e) => e.fmt(f),
            Self::Hold(e) => e.fmt(f),
            Self::Echo(e) => e.fmt(f),
            Self::State(e) => e.fmt(f),
            Self::ByteCount(e) => e.fmt(f),
            Self::Password(e) => e.fmt(f),
            Self::Fatal(e) => e.fmt(f),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Payloads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The exact bytes of a line that failed the shape check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedEvent {
    pub raw: BString,
}

impl fmt::Display for MalformedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed Event {:?}", self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownEvent {
    pub tag: String,
    pub body: String,
}

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.body)
    }
}

/// `>HOLD:Waiting for hold release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldEvent {
    pub reason: String,
}

impl fmt::Display for HoldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hold: {}", self.reason)
    }
}

/// `>ECHO:timestamp,message`
///
/// A body with no comma yields two empty fields; the text is discarded
/// rather than being taken as the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoEvent {
    pub raw_timestamp: String,
    pub message: String,
}

impl EchoEvent {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_unix_timestamp(&self.raw_timestamp)
    }
}

impl fmt::Display for EchoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Echo [{}]: {}", self.raw_timestamp, self.message)
    }
}

/// `>STATE:timestamp,state,description,local_ip,remote_ip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvent {
    pub raw_timestamp: String,
    pub new_state: String,
    pub description: String,
    pub local_tunnel_addr: String,
    pub remote_addr: String,
}

impl StateEvent {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_unix_timestamp(&self.raw_timestamp)
    }

    /// Typed view of [`StateEvent::new_state`].
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_name(&self.new_state)
    }
}

impl fmt::Display for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State {}: {}", self.new_state, self.description)?;
        if !self.local_tunnel_addr.is_empty() || !self.remote_addr.is_empty() {
            write!(f, " ({} <-> {})", self.local_tunnel_addr, self.remote_addr)?;
        }
        Ok(())
    }
}

/// `>BYTECOUNT:in,out` or `>BYTECOUNT_CLI:cid,in,out`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteCountEvent {
    /// Set for `BYTECOUNT_CLI` lines.
    pub per_client: bool,
    /// Always empty for `BYTECOUNT`.
    pub client_id: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl ByteCountEvent {
    pub fn is_client(&self) -> bool {
        self.per_client
    }
}

impl fmt::Display for ByteCountEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.per_client {
            write!(f, "ByteCount client {}: ", self.client_id)?;
        } else {
            write!(f, "ByteCount: ")?;
        }
        write!(f, "{} in, {} out", self.bytes_in, self.bytes_out)
    }
}

/// `>PASSWORD:Need 'Auth' username/password`; the body is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEvent {
    pub message: String,
}

impl fmt::Display for PasswordEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password: {}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatalEvent {
    pub message: String,
}

impl fmt::Display for FatalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fatal: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── EventKind ────────────────────────────────────────────────

    #[test]
    fn kind_tag_table_round_trips() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_tag(kind.as_tag()), Some(kind));
            assert_eq!(kind.as_tag().parse::<EventKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_tag());
        }
    }

    #[test]
    fn kind_lookup_is_case_sensitive() {
        assert_eq!(EventKind::from_tag("state"), None);
        assert_eq!(EventKind::from_tag("INFO"), None);
        let err = "DUMMY".parse::<EventKind>().unwrap_err();
        assert_eq!(err.tag, "DUMMY");
        assert_eq!(
            err.to_string(),
            "unrecognised management event tag: \"DUMMY\""
        );
    }

    // ── Projections ──────────────────────────────────────────────

    #[test]
    fn byte_count_kind_follows_client_flag() {
        let plain = Event::ByteCount(ByteCountEvent {
            per_client: false,
            client_id: String::new(),
            bytes_in: 1,
            bytes_out: 2,
        });
        let cli = Event::ByteCount(ByteCountEvent {
            per_client: true,
            client_id: "7".into(),
            bytes_in: 1,
            bytes_out: 2,
        });
        assert_eq!(plain.kind(), Some(EventKind::ByteCount));
        assert_eq!(plain.tag(), Some("BYTECOUNT"));
        assert_eq!(cli.kind(), Some(EventKind::ByteCountClient));
        assert_eq!(cli.tag(), Some("BYTECOUNT_CLI"));
        assert_eq!(plain.body(), None);
    }

    #[test]
    fn malformed_has_no_tag_or_body() {
        let e = Event::Malformed(MalformedEvent { raw: BString::from("x") });
        assert!(e.is_malformed());
        assert_eq!(e.kind(), None);
        assert_eq!(e.tag(), None);
        assert_eq!(e.body(), None);
    }

    #[test]
    fn unknown_projects_tag_and_body() {
        let e = Event::Unknown(UnknownEvent {
            tag: "INFO".into(),
            body: "OpenVPN Management Interface".into(),
        });
        assert_eq!(e.kind(), None);
        assert_eq!(e.tag(), Some("INFO"));
        assert_eq!(e.body(), Some("OpenVPN Management Interface"));
        assert_eq!(e.to_string(), "INFO: OpenVPN Management Interface");
    }

    // ── Display ──────────────────────────────────────────────────

    #[test]
    fn display_diagnostics() {
        let st = StateEvent {
            raw_timestamp: "1".into(),
            new_state: "CONNECTED".into(),
            description: "SUCCESS".into(),
            local_tunnel_addr: "10.8.0.6".into(),
            remote_addr: "1.2.3.4".into(),
        };
        assert_eq!(st.to_string(), "State CONNECTED: SUCCESS (10.8.0.6 <-> 1.2.3.4)");

        let bc = ByteCountEvent {
            per_client: true,
            client_id: "abc".into(),
            bytes_in: 10,
            bytes_out: 20,
        };
        assert_eq!(bc.to_string(), "ByteCount client abc: 10 in, 20 out");

        let hold = HoldEvent { reason: String::new() };
        assert_eq!(hold.to_string(), "Hold: ");
    }

    #[test]
    fn malformed_display_escapes_bytes() {
        let e = MalformedEvent { raw: BString::from("HTTP/1.1 200 OK") };
        assert_eq!(e.to_string(), "Malformed Event \"HTTP/1.1 200 OK\"");
        let e = MalformedEvent { raw: BString::from(&b"a\xffb"[..]) };
        let shown = e.to_string();
        assert!(shown.starts_with("Malformed Event \"a"));
        assert!(shown.to_lowercase().contains("\\xff"));
        assert!(shown.ends_with("b\""));
    }

    // ── Serde ────────────────────────────────────────────────────

    #[test]
    fn serde_state_roundtrip() {
        let ev = Event::State(StateEvent {
            raw_timestamp: "123".into(),
            new_state: "CONNECTED".into(),
            description: "good".into(),
            local_tunnel_addr: "172.16.0.1".into(),
            remote_addr: "192.168.4.1".into(),
        });
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"state\""));
        assert!(json.contains("\"new_state\":\"CONNECTED\""));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn serde_byte_count_shape() {
        let ev = Event::ByteCount(ByteCountEvent {
            per_client: false,
            client_id: String::new(),
            bytes_in: 5,
            bytes_out: 6,
        });
        let v: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["type"], "byte_count");
        assert_eq!(v["bytes_in"], 5);
        assert_eq!(v["bytes_out"], 6);
    }

    #[test]
    fn serde_malformed_roundtrip() {
        let ev = crate::classify(b"\xff\x00 garbage");
        assert!(ev.is_malformed());

        let json = serde_json::to_string(&ev).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["type"], "malformed");
        let raw: Vec<u64> = v["raw"]
            .as_array()
            .expect("raw should be a number array")
            .iter()
            .map(|n| n.as_u64().unwrap())
            .collect();
        assert_eq!(raw[..3], [255u64, 0, 32]);
        assert_eq!(raw.len(), b"\xff\x00 garbage".len());

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
