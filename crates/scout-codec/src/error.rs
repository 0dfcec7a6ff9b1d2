//! Errors raised by the record codec and carrier embedding.

use thiserror::Error;

/// Errors from encoding, decoding, or embedding a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The payload could not be decoded, decompressed, or parsed.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// A record could not be serialized or compressed.
    #[error("payload encoding failed: {0}")]
    Encoding(String),

    /// The carrier document has no `<svg` root element.
    #[error("carrier has no <svg> root element")]
    MissingRoot,

    /// A carrier pattern failed to compile.
    #[error("carrier pattern error: {0}")]
    Pattern(String),
}
