//! # scout-codec — Record Codec & SVG Carriers
//!
//! Turns a completed [`scout_core::MatchRecord`] into a compact transport
//! string and back, and stores that string inside an SVG image so the image
//! itself carries the data.
//!
//! ```text
//! MatchRecord + SchemaFingerprint
//!     │  serde_json {"schema": .., "data": {..}}
//!     ▼
//! raw DEFLATE (best) ──▶ base64  = TransportPayload
//!     │
//!     ▼
//! <svg ...><desc><![CDATA[payload]]></desc> ... </svg>
//! ```
//!
//! ## Crate Policy
//!
//! - Decoding never panics: every malformed input maps to
//!   [`CodecError::CorruptPayload`].
//! - Embedding only touches the `<desc>` element; visual content is left
//!   byte-for-byte intact.

pub mod carrier;
pub mod compress;
pub mod error;
pub mod payload;

pub use carrier::{embed, extract, try_embed, BLANK_CARRIER};
pub use compress::{Compressor, DeflateBase64, MAX_DECOMPRESSED_BYTES};
pub use error::CodecError;
pub use payload::{PayloadEnvelope, RecordCodec, TransportPayload};
