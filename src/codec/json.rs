//! JSON codec using `serde_json`.

use serde_json::Value;

use crate::error::Result;
use crate::Lowstate;

/// JSON codec for lowstate payloads and results.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to JSON bytes.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode JSON bytes to a value.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode a JSON body into lowstate chunks.
    ///
    /// # Errors
    ///
    /// Returns error if the body is not JSON, or is neither a mapping nor a
    /// list of mappings.
    pub fn decode_lowstate(bytes: &[u8]) -> Result<Vec<Lowstate>> {
        let value: Value = Self::decode(bytes)?;
        Lowstate::chunks_from_value(value)
    }
}
