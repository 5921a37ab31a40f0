//! Management-line classifier.
//!
//! Turns one already-framed line into an [`Event`]. Classification is total:
//! malformed shapes become [`Event::Malformed`], unknown tags become
//! [`Event::Unknown`], and broken fields inside known kinds fall back to
//! empty strings or zero.

use bstr::BString;
use log::trace;

use crate::events::fields::*;
use crate::events::types::*;

/// Marker the daemon puts in front of asynchronous notifications.
const NOTIFICATION_PREFIX: u8 = b'>';

const STATE_FIELDS: usize = 5;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Entry points
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Classify a single management line (terminator already stripped).
pub fn classify(line: &[u8]) -> Event {
    let Some((tag, body)) = split_tag(line).filter(|(tag, _)| is_tag(tag)) else {
        trace!("malformed management line ({} bytes)", line.len());
        return Event::Malformed(MalformedEvent {
            raw: BString::from(line),
        });
    };

    // The tag grammar is ASCII, so this never substitutes anything.
    let tag = text(tag);
    let body = text(body);

    match EventKind::from_tag(&tag) {
        Some(kind) => extract(kind, &body),
        None => {
            trace!("unknown management event tag {:?}", tag);
            Event::Unknown(UnknownEvent {
                tag: tag.into_owned(),
                body: body.into_owned(),
            })
        }
    }
}

/// Classify a line that may carry the leading `>` notification marker.
///
/// One marker is stripped; lines without it go through [`classify`] as-is.
pub fn classify_notification(line: &[u8]) -> Event {
    match line.split_first() {
        Some((&NOTIFICATION_PREFIX, rest)) => classify(rest),
        _ => classify(line),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Per-kind extraction
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn extract(kind: EventKind, body: &str) -> Event {
    match kind {
        EventKind::Hold => Event::Hold(HoldEvent {
            reason: body.to_string(),
        }),
        EventKind::Echo => Event::Echo(extract_echo(body)),
        EventKind::State => Event::State(extract_state(body)),
        EventKind::ByteCount => Event::ByteCount(extract_byte_count(body)),
        EventKind::ByteCountClient => Event::ByteCount(extract_byte_count_cli(body)),
        EventKind::Password => Event::Password(PasswordEvent {
            message: body.to_string(),
        }),
        EventKind::Fatal => Event::Fatal(FatalEvent {
            message: body.to_string(),
        }),
    }
}

fn extract_echo(body: &str) -> EchoEvent {
    // No separator means no data: the bare body is dropped on purpose.
    let (raw_timestamp, message) = body.split_once(FIELD_SEP).unwrap_or(("", ""));
    EchoEvent {
        raw_timestamp: raw_timestamp.to_string(),
        message: message.to_string(),
    }
}

fn extract_state(body: &str) -> StateEvent {
    let fields = split_fields(body);
    note_surplus("STATE", fields.len(), STATE_FIELDS);
    StateEvent {
        raw_timestamp: field_or_empty(&fields, 0),
        new_state: field_or_empty(&fields, 1),
        description: field_or_empty(&fields, 2),
        local_tunnel_addr: field_or_empty(&fields, 3),
        remote_addr: field_or_empty(&fields, 4),
    }
}

fn extract_byte_count(body: &str) -> ByteCountEvent {
    let fields = split_fields(body);
    note_surplus("BYTECOUNT", fields.len(), 2);
    ByteCountEvent {
        per_client: false,
        client_id: String::new(),
        bytes_in: field_int_or_zero(&fields, 0),
        bytes_out: field_int_or_zero(&fields, 1),
    }
}

fn extract_byte_count_cli(body: &str) -> ByteCountEvent {
    let fields = split_fields(body);
    note_surplus("BYTECOUNT_CLI", fields.len(), 3);
    ByteCountEvent {
        per_client: true,
        client_id: field_or_empty(&fields, 0),
        bytes_in: field_int_or_zero(&fields, 1),
        bytes_out: field_int_or_zero(&fields, 2),
    }
}

/// Surplus fields are dropped silently; only a trace record is left.
fn note_surplus(tag: &str, got: usize, expected: usize) {
    if got > expected {
        trace!("{} carried {} fields, ignoring {}", tag, got, got - expected);
    }
}
