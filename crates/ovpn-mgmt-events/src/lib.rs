//! # ovpn-mgmt-events
//!
//! Classifier for the line-oriented OpenVPN management protocol. Every raw
//! line becomes exactly one [`Event`]; classification never fails.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | **types** | `Event` enum, per-kind payloads, `EventKind` tag table |
//! | **fields** | Defaulting field helpers shared by every extractor |
//! | **classify** | Shape check, tag dispatch, per-kind extraction |
//! | **state** | Typed view of STATE names, unix timestamp conversion |
//!
//! ```
//! use ovpn_mgmt_events::{classify, Event};
//!
//! match classify(b"BYTECOUNT:123,456") {
//!     Event::ByteCount(bc) => assert_eq!((bc.bytes_in, bc.bytes_out), (123, 456)),
//!     other => panic!("unexpected {other}"),
//! }
//! ```

pub mod events;

pub use events::*;
