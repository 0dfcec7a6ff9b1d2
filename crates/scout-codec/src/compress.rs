//! # Compression Primitive
//!
//! Text in, text out: transport payloads must survive being placed in an
//! XML CDATA block and in an optical code, so the compressed bytes are
//! base64 encoded.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::CodecError;

/// Upper bound on decompressed payload size.
pub const MAX_DECOMPRESSED_BYTES: u64 = 1024 * 1024;

/// A lossless, deterministic text compressor.
pub trait Compressor {
    /// Compress text into a transport-safe string.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Encoding` if the backend fails.
    fn compress(&self, text: &str) -> Result<String, CodecError>;

    /// Invert [`compress`](Self::compress).
    ///
    /// # Errors
    ///
    /// Returns `CodecError::CorruptPayload` for any input `compress` could
    /// not have produced.
    fn decompress(&self, payload: &str) -> Result<String, CodecError>;
}

/// Raw DEFLATE at best compression, then standard base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateBase64;

impl Compressor for DeflateBase64 {
    fn compress(&self, text: &str) -> Result<String, CodecError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| CodecError::Encoding(e.to_string()))?;
        let bytes = encoder
            .finish()
            .map_err(|e| CodecError::Encoding(e.to_string()))?;
        Ok(BASE64.encode(bytes))
    }

    fn decompress(&self, payload: &str) -> Result<String, CodecError> {
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| CodecError::CorruptPayload(format!("base64: {e}")))?;
        let mut text = String::new();
        let read = DeflateDecoder::new(bytes.as_slice())
            .take(MAX_DECOMPRESSED_BYTES + 1)
            .read_to_string(&mut text)
            .map_err(|e| CodecError::CorruptPayload(format!("inflate: {e}")))?;
        if read as u64 > MAX_DECOMPRESSED_BYTES {
            return Err(CodecError::CorruptPayload(format!(
                "decompressed payload exceeds {MAX_DECOMPRESSED_BYTES} bytes"
            )));
        }
        Ok(text)
    }
}
