//! MsgPack codec using `rmp-serde`.
//!
//! Always encode with `to_vec_named`: the master reads structs as maps keyed
//! by field name, `to_vec` would emit positional arrays.
//!
//! # Example
//!
//! ```
//! use saltapi_client::codec::MsgPackCodec;
//! use saltapi_client::Lowstate;
//!
//! let low = Lowstate::new().with("fun", "test.ping").with("token", "abc");
//! let encoded = MsgPackCodec::encode(&low).unwrap();
//! let decoded: Lowstate = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, low);
//! ```

use serde_json::Value;

use crate::error::Result;
use crate::Lowstate;

/// MessagePack codec for lowstate payloads and results.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map format).
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Decode a MsgPack payload into lowstate chunks.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is not valid MsgPack, or is neither a map
    /// nor an array of maps.
    pub fn decode_lowstate(bytes: &[u8]) -> Result<Vec<Lowstate>> {
        let value: Value = Self::decode(bytes)?;
        Lowstate::chunks_from_value(value)
    }
}
