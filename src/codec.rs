//! Wire codec for cache values
//!
//! Values travel as a URL query parameter, so they are serialized to JSON
//! and then wrapped in standard base64. Percent-encoding of the result is
//! the query builder's concern; the codec only guarantees byte safety.
//! Decoding applies the inverse steps in reverse order.

use crate::error::{ClientError, Result};
use crate::value::CacheValue;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Encode a value into its transport form
pub fn encode(value: &CacheValue) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|err| ClientError::Encode(err.to_string()))?;
    Ok(BASE64.encode(json))
}

/// Decode a transport-form string back into a value
pub fn decode(encoded: &str) -> Result<CacheValue> {
    let json = BASE64.decode(encoded)?;
    Ok(serde_json::from_slice(&json)?)
}
