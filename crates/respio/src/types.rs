//! RESP data types and value representation.

use bytes::Bytes;

use crate::error::EncodeError;
use crate::utils;

/// Default error code used when none is given explicitly.
pub(crate) const DEFAULT_ERROR_CODE: Bytes = Bytes::from_static(b"ERR");

/// The aggregate kinds that can appear in headers and nest on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
	/// `*` array
	Array,
	/// `%` map (field-value pairs)
	Map,
	/// `~` set
	Set,
	/// `|` attribute (field-value pairs, side-channel)
	Attribute,
	/// `>` push (out-of-band)
	Push,
}

/// Represents a RESP protocol value.
///
/// Supports both RESP2 and RESP3 types. The RESP3 streamed and unbound forms
/// surface as standalone marker values ([`StreamedStringHeader`],
/// [`StreamedStringPart`], [`UnboundHeader`], [`End`]) because they frame a
/// sequence of follow-up messages rather than one self-contained value.
///
/// Buffer-carrying variants hold [`Bytes`] slices; when produced by a decoder
/// these are zero-copy, reference-counted views of the input buffer.
///
/// [`StreamedStringHeader`]: RespValue::StreamedStringHeader
/// [`StreamedStringPart`]: RespValue::StreamedStringPart
/// [`UnboundHeader`]: RespValue::UnboundHeader
/// [`End`]: RespValue::End
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
	// RESP2 types
	/// Simple string: `+OK\r\n`
	SimpleString(Bytes),

	/// Error: `-ERR message\r\n`
	///
	/// The code is the leading ASCII token (`ERR`, `WRONGTYPE`, ...); the
	/// message is everything after the first space.
	Error {
		/// Error code token, defaults to `ERR`.
		code: Bytes,
		/// Human-readable message, may be empty.
		message: Bytes,
	},

	/// Integer: `:1000\r\n`
	Integer(i64),

	/// Bulk string: `$6\r\nfoobar\r\n` (may be zero-length)
	BulkString(Bytes),

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
	Array(Vec<RespValue>),

	/// Null: `$-1\r\n` / `*-1\r\n` (RESP2) or `_\r\n` (RESP3)
	Null,

	// RESP3 types
	/// Boolean: `#t\r\n` or `#f\r\n`
	Boolean(bool),

	/// Double: `,3.14\r\n`, including `,inf\r\n` and `,-inf\r\n`
	Double(f64),

	/// Big number: `(3492890328409238509324850943850943825024385\r\n`
	///
	/// Held as validated ASCII decimal text (optional leading `-`).
	BigNumber(Bytes),

	/// Blob error: `!21\r\nSYNTAX invalid syntax\r\n`
	BlobError {
		/// Error code token, defaults to `ERR`.
		code: Bytes,
		/// Human-readable message, may be empty.
		message: Bytes,
	},

	/// Verbatim string: `=15\r\ntxt:Some string\r\n`
	VerbatimString {
		/// 3-byte format tag: `txt`, `mkd`, ...
		format: Bytes,
		/// Content after the `fmt:` prefix.
		data: Bytes,
	},

	/// Map: `%2\r\n+first\r\n:1\r\n+second\r\n:2\r\n`
	///
	/// Ordered field-value pairs; the wire element count is twice the pair
	/// count.
	Map(Vec<(RespValue, RespValue)>),

	/// Set: `~5\r\n+orange\r\n+apple\r\n...\r\n`
	Set(Vec<RespValue>),

	/// Attribute: `|1\r\n+ttl\r\n:100\r\n`
	///
	/// Same shape as a map; semantically a side-channel preceding another
	/// reply.
	Attribute(Vec<(RespValue, RespValue)>),

	/// Push: `>4\r\n+pubsub\r\n+message\r\n...\r\n`
	Push(Vec<RespValue>),

	// RESP3 streamed/unbound forms
	/// Streamed string header: `$?\r\n`
	///
	/// Announces a bulk string of unknown length; zero or more
	/// [`StreamedStringPart`](RespValue::StreamedStringPart) chunks follow.
	StreamedStringHeader,

	/// Streamed string part: `;4\r\nabcd\r\n`
	///
	/// An empty part (`;0\r\n`) is the stream terminator.
	StreamedStringPart(Bytes),

	/// Unbound aggregate header: `*?\r\n`, `%?\r\n`, `~?\r\n` or `>?\r\n`
	///
	/// Elements follow one by one until an [`End`](RespValue::End) marker;
	/// the decoder never materializes the aggregate itself. The `*?` form
	/// doubles as the streamed-strings announcement.
	UnboundHeader(AggregateKind),

	/// End of an unbound aggregate: `.\r\n`
	End,
}

impl RespValue {
	/// Check if the value is an error (simple or blob).
	pub fn is_error(&self) -> bool {
		matches!(self, RespValue::Error { .. } | RespValue::BlobError { .. })
	}

	/// Check if the value is null.
	pub fn is_null(&self) -> bool {
		matches!(self, RespValue::Null)
	}

	/// Check if the value is the terminator chunk of a streamed string.
	pub fn is_last_streamed_part(&self) -> bool {
		matches!(self, RespValue::StreamedStringPart(part) if part.is_empty())
	}

	/// Try to convert to a string slice.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			RespValue::SimpleString(s) | RespValue::BulkString(s) => std::str::from_utf8(s).ok(),
			_ => None,
		}
	}

	/// Try to convert to bytes.
	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			RespValue::SimpleString(b) | RespValue::BulkString(b) => Some(b),
			_ => None,
		}
	}

	/// Try to convert to integer.
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			RespValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Try to convert to boolean.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			RespValue::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	/// Try to convert to double.
	pub fn as_double(&self) -> Option<f64> {
		match self {
			RespValue::Double(d) => Some(*d),
			_ => None,
		}
	}

	/// Try to convert to array elements.
	pub fn as_array(&self) -> Option<&[RespValue]> {
		match self {
			RespValue::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Try to convert to map pairs.
	pub fn as_map(&self) -> Option<&[(RespValue, RespValue)]> {
		match self {
			RespValue::Map(m) | RespValue::Attribute(m) => Some(m),
			_ => None,
		}
	}

	/// Interpret the value as a signed 64-bit integer, parsing string
	/// payloads as ASCII decimal text.
	pub fn to_integer(&self) -> Option<i64> {
		match self {
			RespValue::Integer(i) => Some(*i),
			RespValue::SimpleString(s) | RespValue::BulkString(s) => {
				utils::parse_integer(s).ok()
			}
			_ => None,
		}
	}

	/// Interpret the value as a double, parsing string payloads as ASCII
	/// float text (`inf`/`-inf` included).
	pub fn to_double(&self) -> Option<f64> {
		match self {
			RespValue::Double(d) => Some(*d),
			RespValue::Integer(i) => Some(*i as f64),
			RespValue::SimpleString(s) | RespValue::BulkString(s) => {
				utils::parse_double(s).ok()
			}
			_ => None,
		}
	}

	/// Convert to String with lossy UTF-8 conversion.
	pub fn to_string_lossy(&self) -> Option<String> {
		match self {
			RespValue::SimpleString(s) | RespValue::BulkString(s) => {
				Some(String::from_utf8_lossy(s).into_owned())
			}
			_ => None,
		}
	}

	/// Try to consume and convert to the element vector.
	pub fn into_vec(self) -> Option<Vec<RespValue>> {
		match self {
			RespValue::Array(a) | RespValue::Push(a) | RespValue::Set(a) => Some(a),
			_ => None,
		}
	}

	// Convenience constructors

	/// Create a simple string value.
	pub fn simple_string(s: impl Into<Bytes>) -> Self {
		RespValue::SimpleString(s.into())
	}

	/// Create a bulk string value.
	pub fn bulk_string(s: impl Into<Bytes>) -> Self {
		RespValue::BulkString(s.into())
	}

	/// Create an error with the default `ERR` code.
	pub fn err(message: impl Into<Bytes>) -> Self {
		RespValue::Error {
			code: DEFAULT_ERROR_CODE,
			message: message.into(),
		}
	}

	/// Create an error with an explicit code.
	pub fn error_with_code(code: impl Into<Bytes>, message: impl Into<Bytes>) -> Self {
		RespValue::Error {
			code: code.into(),
			message: message.into(),
		}
	}

	/// Create an error from its full wire text (`CODE message`).
	pub fn error(text: impl Into<Bytes>) -> Self {
		let text = text.into();
		let (code, message) = utils::split_error_text(&text);
		RespValue::Error { code, message }
	}

	/// Create a blob error with the default `ERR` code.
	pub fn blob_err(message: impl Into<Bytes>) -> Self {
		RespValue::BlobError {
			code: DEFAULT_ERROR_CODE,
			message: message.into(),
		}
	}

	/// Create an integer value.
	pub fn integer(i: i64) -> Self {
		RespValue::Integer(i)
	}

	/// Create an array value from an iterator.
	pub fn array(items: impl IntoIterator<Item = RespValue>) -> Self {
		RespValue::Array(items.into_iter().collect())
	}

	/// Create a null value.
	pub fn null() -> Self {
		RespValue::Null
	}

	/// Create a double value. NaN is not representable on the wire.
	pub fn double(value: f64) -> Result<Self, EncodeError> {
		if value.is_nan() {
			return Err(EncodeError::InvalidValue(
				"NaN cannot be encoded as a RESP double".to_string(),
			));
		}
		Ok(RespValue::Double(value))
	}

	/// Create a big number from ASCII decimal text (optional leading `-`).
	pub fn big_number(value: impl Into<Bytes>) -> Result<Self, EncodeError> {
		let value = value.into();
		utils::validate_big_number(&value)
			.map_err(|e| EncodeError::InvalidValue(e.to_string()))?;
		Ok(RespValue::BigNumber(value))
	}

	/// Create a plain-text (`txt`) verbatim string.
	pub fn verbatim_txt(data: impl Into<Bytes>) -> Self {
		RespValue::VerbatimString {
			format: Bytes::from_static(b"txt"),
			data: data.into(),
		}
	}

	/// Create a markdown (`mkd`) verbatim string.
	pub fn verbatim_mkd(data: impl Into<Bytes>) -> Self {
		RespValue::VerbatimString {
			format: Bytes::from_static(b"mkd"),
			data: data.into(),
		}
	}

	/// Create a streamed string chunk. An empty chunk is rejected: the
	/// terminator is [`last_streamed_string_part`](Self::last_streamed_string_part).
	pub fn streamed_string_part(content: impl Into<Bytes>) -> Result<Self, EncodeError> {
		let content = content.into();
		if content.is_empty() {
			return Err(EncodeError::InvalidValue(
				"content must not be empty in a streamed string part".to_string(),
			));
		}
		Ok(RespValue::StreamedStringPart(content))
	}

	/// Create the terminator chunk of a streamed string (`;0\r\n`).
	pub fn last_streamed_string_part() -> Self {
		RespValue::StreamedStringPart(Bytes::new())
	}
}

// Convenient From implementations
impl From<&str> for RespValue {
	fn from(s: &str) -> Self {
		RespValue::BulkString(Bytes::copy_from_slice(s.as_bytes()))
	}
}

impl From<String> for RespValue {
	fn from(s: String) -> Self {
		RespValue::BulkString(Bytes::from(s))
	}
}

impl From<&[u8]> for RespValue {
	fn from(b: &[u8]) -> Self {
		RespValue::BulkString(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for RespValue {
	fn from(v: Vec<u8>) -> Self {
		RespValue::BulkString(Bytes::from(v))
	}
}

impl From<Bytes> for RespValue {
	fn from(b: Bytes) -> Self {
		RespValue::BulkString(b)
	}
}

impl From<i64> for RespValue {
	fn from(i: i64) -> Self {
		RespValue::Integer(i)
	}
}

impl From<i32> for RespValue {
	fn from(i: i32) -> Self {
		RespValue::Integer(i as i64)
	}
}

impl From<bool> for RespValue {
	fn from(b: bool) -> Self {
		RespValue::Boolean(b)
	}
}

impl<T: Into<RespValue>> From<Vec<T>> for RespValue {
	fn from(v: Vec<T>) -> Self {
		RespValue::Array(v.into_iter().map(|x| x.into()).collect())
	}
}

impl<T: Into<RespValue>> From<Option<T>> for RespValue {
	fn from(o: Option<T>) -> Self {
		match o {
			Some(v) => v.into(),
			None => RespValue::Null,
		}
	}
}
