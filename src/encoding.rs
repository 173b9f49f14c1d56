//! Base64url helpers for the transport envelope and inline part data

use crate::error::DecodeError;
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD, URL_SAFE};
use base64::engine::DecodePaddingMode;

/// URL-safe engine accepting data with or without trailing padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as padded base64url, as expected in the `raw` field
#[must_use]
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE.encode(data)
}

/// Decode base64url data, tolerating missing padding
pub fn decode_base64url(data: &str, context: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_LENIENT
        .decode(data.trim())
        .map_err(|source| DecodeError::Base64 {
            context: context.to_string(),
            source,
        })
}

/// Decode base64url data into UTF-8 text
pub fn decode_base64url_text(data: &str, context: &str) -> Result<String, DecodeError> {
    let bytes = decode_base64url(data, context)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::Utf8 {
        context: context.to_string(),
    })
}
