//! respio - RESP2/RESP3 protocol codec
//!
//! An incremental, zero-copy implementation of the Redis serialization
//! protocol. The crate provides:
//!
//! - [`RespDecoder`]: a resumable decoder for the full reply grammar,
//!   RESP2 and RESP3 alike, driven by arbitrarily-chunked input
//! - [`RequestDecoder`]: the restricted client-to-server grammar (arrays
//!   of bulk strings, plus optional legacy inline commands)
//! - [`RespEncoder`]: fragment-based encoding with pre-encoded constant
//!   replies in [`cached`]
//! - [`CommandMap`]: case-insensitive command-name lookup for dispatch
//!   tables
//!
//! Decoded payloads are [`bytes::Bytes`] views of the input buffer, so
//! large bulk strings travel from socket to value without copying.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use respio::{RespDecoder, RespEncoder, RespValue};
//!
//! let mut decoder = RespDecoder::new();
//! let mut buf = BytesMut::from(&b"*2\r\n$5\r\nhello\r\n:42\r\n"[..]);
//! let mut out = Vec::new();
//! decoder.decode(&mut buf, &mut out).unwrap();
//!
//! assert_eq!(
//!     out,
//!     vec![RespValue::Array(vec![
//!         RespValue::bulk_string("hello"),
//!         RespValue::Integer(42),
//!     ])]
//! );
//!
//! let wire = out[0].encode().unwrap();
//! assert_eq!(wire, &b"*2\r\n$5\r\nhello\r\n:42\r\n"[..]);
//! ```

pub mod cached;
mod command_map;
mod decoder;
mod encoder;
mod error;
mod request;
mod types;
mod utils;

pub use command_map::CommandMap;
pub use decoder::DecoderConfig;
pub use decoder::RespDecoder;
pub use decoder::parse;
pub use encoder::RespEncoder;
pub use encoder::encode;
pub use error::EncodeError;
pub use error::ParseError;
pub use error::RespError;
pub use request::Request;
pub use request::RequestDecoder;
pub use types::AggregateKind;
pub use types::RespValue;
