//! Fragment-based RESP encoder.
//!
//! Encoding produces a list of [`Bytes`] fragments instead of one contiguous
//! buffer: constant replies and payloads already held as `Bytes` are emitted
//! as shared views with no copying, and only the small length-prefixed
//! headers are freshly built. Callers with vectored I/O can write the
//! fragments directly; [`encode_to`](RespEncoder::encode_to) flattens them
//! for everyone else.

use bytes::Bytes;
use bytes::BytesMut;

use crate::cached;
use crate::error::EncodeError;
use crate::types::AggregateKind;
use crate::types::RespValue;
use crate::utils;

static CRLF: Bytes = Bytes::from_static(b"\r\n");

/// Serialization to RESP wire bytes.
pub trait RespEncoder {
	/// Append this value's wire form to `out` as zero or more fragments.
	///
	/// Concatenating the appended fragments in order yields exactly the
	/// bytes [`encode`](Self::encode) would return.
	fn encode_fragments(&self, out: &mut Vec<Bytes>) -> Result<(), EncodeError>;

	/// Append this value's wire form to a contiguous buffer.
	fn encode_to(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
		let mut fragments = Vec::new();
		self.encode_fragments(&mut fragments)?;
		for fragment in &fragments {
			buf.extend_from_slice(fragment);
		}
		Ok(())
	}

	/// Encode this value into one freshly-allocated buffer.
	fn encode(&self) -> Result<Bytes, EncodeError> {
		let mut buf = BytesMut::new();
		self.encode_to(&mut buf)?;
		Ok(buf.freeze())
	}
}

impl RespEncoder for RespValue {
	fn encode_fragments(&self, out: &mut Vec<Bytes>) -> Result<(), EncodeError> {
		match self {
			RespValue::SimpleString(s) => match &s[..] {
				b"OK" => out.push(cached::OK.clone()),
				b"PONG" => out.push(cached::PONG.clone()),
				_ => {
					let mut buf = BytesMut::with_capacity(s.len() + 3);
					buf.extend_from_slice(&[utils::SIMPLE_STRING]);
					buf.extend_from_slice(s);
					buf.extend_from_slice(utils::CRLF);
					out.push(buf.freeze());
				}
			},
			RespValue::Error { code, message } => {
				out.push(encode_error_line(utils::ERROR, code, message));
			}
			RespValue::Integer(i) => match cached::integer(*i) {
				Some(wire) => out.push(wire),
				None => out.push(Bytes::from(format!(":{i}\r\n"))),
			},
			RespValue::BulkString(content) => {
				if content.is_empty() {
					out.push(cached::EMPTY_BULK.clone());
				} else {
					out.push(Bytes::from(format!("${}\r\n", content.len())));
					out.push(content.clone());
					out.push(CRLF.clone());
				}
			}
			RespValue::Array(items) => {
				encode_bounded_aggregate(utils::ARRAY, items.len(), items, out)?;
			}
			RespValue::Null => out.push(cached::NULL.clone()),
			RespValue::Boolean(true) => out.push(cached::TRUE.clone()),
			RespValue::Boolean(false) => out.push(cached::FALSE.clone()),
			RespValue::Double(d) => {
				if d.is_nan() {
					return Err(EncodeError::InvalidValue(
						"NaN cannot be encoded as a RESP double".to_string(),
					));
				}
				if *d == f64::INFINITY {
					out.push(cached::POSITIVE_INFINITY.clone());
				} else if *d == f64::NEG_INFINITY {
					out.push(cached::NEGATIVE_INFINITY.clone());
				} else {
					out.push(Bytes::from(format!(",{d}\r\n")));
				}
			}
			RespValue::BigNumber(digits) => {
				utils::validate_big_number(digits)
					.map_err(|e| EncodeError::InvalidValue(e.to_string()))?;
				let mut buf = BytesMut::with_capacity(digits.len() + 3);
				buf.extend_from_slice(&[utils::BIG_NUMBER]);
				buf.extend_from_slice(digits);
				buf.extend_from_slice(utils::CRLF);
				out.push(buf.freeze());
			}
			RespValue::BlobError { code, message } => {
				let length = if message.is_empty() {
					code.len()
				} else {
					code.len() + 1 + message.len()
				};
				let mut buf = BytesMut::with_capacity(length + 16);
				buf.extend_from_slice(format!("!{length}\r\n").as_bytes());
				buf.extend_from_slice(code);
				if !message.is_empty() {
					buf.extend_from_slice(b" ");
					buf.extend_from_slice(message);
				}
				buf.extend_from_slice(utils::CRLF);
				out.push(buf.freeze());
			}
			RespValue::VerbatimString { format, data } => {
				if format.len() != 3 {
					return Err(EncodeError::InvalidValue(format!(
						"verbatim string format tag must be 3 bytes, got {}",
						format.len()
					)));
				}
				let mut header = BytesMut::with_capacity(16);
				header.extend_from_slice(format!("={}\r\n", data.len() + 4).as_bytes());
				header.extend_from_slice(format);
				header.extend_from_slice(b":");
				out.push(header.freeze());
				out.push(data.clone());
				out.push(CRLF.clone());
			}
			RespValue::Map(pairs) => {
				if pairs.is_empty() {
					out.push(cached::EMPTY_MAP.clone());
				} else {
					out.push(Bytes::from(format!("%{}\r\n", pairs.len())));
					encode_pairs(pairs, out)?;
				}
			}
			RespValue::Set(items) => {
				encode_bounded_aggregate(utils::SET, items.len(), items, out)?;
			}
			RespValue::Attribute(pairs) => {
				out.push(Bytes::from(format!("|{}\r\n", pairs.len())));
				encode_pairs(pairs, out)?;
			}
			RespValue::Push(items) => {
				encode_bounded_aggregate(utils::PUSH, items.len(), items, out)?;
			}
			RespValue::StreamedStringHeader => out.push(cached::STREAMED_STRING_HEADER.clone()),
			RespValue::StreamedStringPart(content) => {
				if content.is_empty() {
					out.push(cached::LAST_STREAMED_STRING_PART.clone());
				} else {
					out.push(Bytes::from(format!(";{}\r\n", content.len())));
					out.push(content.clone());
					out.push(CRLF.clone());
				}
			}
			RespValue::UnboundHeader(kind) => out.push(cached::unbound_header(*kind)),
			RespValue::End => out.push(cached::END.clone()),
		}
		Ok(())
	}
}

/// `-CODE message\r\n` / `-CODE\r\n` in one fragment; errors are cold and
/// short, splitting them buys nothing.
fn encode_error_line(marker: u8, code: &Bytes, message: &Bytes) -> Bytes {
	let mut buf = BytesMut::with_capacity(code.len() + message.len() + 4);
	buf.extend_from_slice(&[marker]);
	buf.extend_from_slice(code);
	if !message.is_empty() {
		buf.extend_from_slice(b" ");
		buf.extend_from_slice(message);
	}
	buf.extend_from_slice(utils::CRLF);
	buf.freeze()
}

fn encode_bounded_aggregate(
	marker: u8,
	size: usize,
	items: &[RespValue],
	out: &mut Vec<Bytes>,
) -> Result<(), EncodeError> {
	if size == 0 {
		match marker {
			utils::ARRAY => out.push(cached::EMPTY_ARRAY.clone()),
			utils::SET => out.push(cached::EMPTY_SET.clone()),
			_ => out.push(Bytes::from(format!("{}0\r\n", marker as char))),
		}
		return Ok(());
	}
	out.push(Bytes::from(format!("{}{}\r\n", marker as char, size)));
	for item in items {
		item.encode_fragments(out)?;
	}
	Ok(())
}

fn encode_pairs(
	pairs: &[(RespValue, RespValue)],
	out: &mut Vec<Bytes>,
) -> Result<(), EncodeError> {
	for (field, value) in pairs {
		field.encode_fragments(out)?;
		value.encode_fragments(out)?;
	}
	Ok(())
}

/// Encode a value of any [`RespEncoder`] type to its wire bytes.
pub fn encode(value: &impl RespEncoder) -> Result<Bytes, EncodeError> {
	value.encode()
}
