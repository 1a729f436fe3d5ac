//! # ofactions — OpenFlow 1.5 action and OXM wire codec
//!
//! Binary encode/decode for the OpenFlow 1.5 action structures and the OXM
//! match-field TLVs embedded inside some of them, big-endian throughout.
//!
//! - **Actions**: every standard `ofp_action_type` (output, push/pop
//!   headers, set-field, copy-field, group, queue, meter, TTL handling)
//!   plus the Nicira experimenter namespace (encap/decap, stack push/pop).
//! - **Round-trip fidelity**: a decoded action re-encodes to bit-identical
//!   bytes; encoded lengths honor the protocol's 8-byte alignment rules.
//! - **Safety**: every decoder validates available length before indexing;
//!   malformed input yields a [`CodecError`], never a panic or an
//!   out-of-bounds read.
//!
//! The codec is purely functional: no shared state, no I/O, safe to call
//! concurrently. Message envelopes, instruction lists and session handling
//! live in the layers above; this crate only turns byte slices into typed
//! actions and back.
//!
//! ## Usage
//!
//! ```
//! use ofactions::{decode_sequence, Action, MatchField};
//!
//! let actions = vec![
//!     Action::output(5),
//!     Action::set_field(MatchField::in_port(2)),
//! ];
//! let wire: Vec<u8> = ofactions::encode_sequence(&actions);
//! assert_eq!(decode_sequence(&wire).unwrap(), actions);
//! ```

pub mod action;
pub mod error;
pub mod header;
pub mod nx;
pub mod oxm;

pub use action::{
    decode_sequence, encode_sequence, Action, ACTION_TYPE_EXPERIMENTER, OFPCML_MAX,
    OFPCML_NO_BUFFER,
};
pub use error::CodecError;
pub use header::{ActionHeader, HEADER_LEN};
pub use nx::{NxAction, VendorAction, NX_VENDOR_ID};
pub use oxm::{FieldValue, MatchField, OxmId};
