//! Codec module - decoding lowstate payloads and encoding results.
//!
//! Lowstate arrives either as JSON (HTTP front ends) or as MessagePack (the
//! master's native wire encoding):
//!
//! - [`JsonCodec`] - JSON using `serde_json`
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde` (`to_vec_named`, maps not arrays)
//!
//! Both accept a single lowstate mapping or a list of them.
//!
//! # Example
//!
//! ```
//! use saltapi_client::codec::{JsonCodec, MsgPackCodec};
//!
//! let chunks = JsonCodec::decode_lowstate(br#"{"fun": "test.ping", "eauth": "pam"}"#).unwrap();
//! assert_eq!(chunks.len(), 1);
//!
//! let packed = MsgPackCodec::encode(&chunks).unwrap();
//! let again = MsgPackCodec::decode_lowstate(&packed).unwrap();
//! assert_eq!(again, chunks);
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
