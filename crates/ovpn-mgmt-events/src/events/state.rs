//! Typed view of `>STATE:` names and unix timestamp fields.
//!
//! The raw text on [`StateEvent`](crate::StateEvent) stays authoritative;
//! everything here is a lossless interpretation on top of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Connection state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Daemon connection state as reported in the second STATE field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial state.
    Connecting,
    /// Waiting for initial response from server (client only).
    Wait,
    /// Authenticating with server (client only).
    Auth,
    /// Waiting for an external authentication step.
    AuthPending,
    /// Downloading configuration options from server (client only).
    GetConfig,
    /// Assigning IP address to virtual network interface.
    AssignIp,
    /// Adding routes to system.
    AddRoutes,
    /// Initialization Sequence Completed.
    Connected,
    /// A restart has occurred.
    Reconnecting,
    /// A graceful exit is in progress.
    Exiting,
    /// DNS lookup (client only).
    Resolve,
    /// Connecting to TCP server (client only).
    TcpConnect,
    /// Anything else, kept verbatim.
    Other(String),
}

impl ConnectionState {
    /// Map a STATE name. Matching is exact; unknown or empty names become
    /// [`ConnectionState::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "CONNECTING" => Self::Connecting,
            "WAIT" => Self::Wait,
            "AUTH" => Self::Auth,
            "AUTH_PENDING" => Self::AuthPending,
            "GET_CONFIG" => Self::GetConfig,
            "ASSIGN_IP" => Self::AssignIp,
            "ADD_ROUTES" => Self::AddRoutes,
            "CONNECTED" => Self::Connected,
            "RECONNECTING" => Self::Reconnecting,
            "EXITING" => Self::Exiting,
            "RESOLVE" => Self::Resolve,
            "TCP_CONNECT" => Self::TcpConnect,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Connecting => "CONNECTING",
            Self::Wait => "WAIT",
            Self::Auth => "AUTH",
            Self::AuthPending => "AUTH_PENDING",
            Self::GetConfig => "GET_CONFIG",
            Self::AssignIp => "ASSIGN_IP",
            Self::AddRoutes => "ADD_ROUTES",
            Self::Connected => "CONNECTED",
            Self::Reconnecting => "RECONNECTING",
            Self::Exiting => "EXITING",
            Self::Resolve => "RESOLVE",
            Self::TcpConnect => "TCP_CONNECT",
            Self::Other(s) => s,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// No further states follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exiting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Timestamps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Interpret a raw field as unix seconds. `None` when empty, non-numeric or
/// out of chrono's range.
pub fn parse_unix_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}
