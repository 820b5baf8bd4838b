//! Error types for RESP decoding and encoding.

use thiserror::Error;

/// Umbrella error type for RESP operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RespError {
	/// Error during decoding
	#[error("Parse error: {0}")]
	Parse(#[from] ParseError),

	/// Error during encoding
	#[error("Encode error: {0}")]
	Encode(#[from] EncodeError),
}

/// Errors that can occur while decoding the byte stream.
///
/// Every variant is fatal to the connection's framing: after a parse error
/// the stream cannot be resynchronized and must be torn down.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
	/// Unexpected end of input while parsing
	#[error("Unexpected end of input")]
	UnexpectedEOF,

	/// Invalid type marker encountered
	#[error("Invalid type marker: {0}")]
	InvalidTypeMarker(char),

	/// Invalid format for the current type
	#[error("Invalid format: {0}")]
	InvalidFormat(String),

	/// Invalid integer value
	#[error("Invalid integer: {0}")]
	InvalidInteger(String),

	/// Invalid double value
	#[error("Invalid double: {0}")]
	InvalidDouble(String),

	/// Invalid bulk string length
	#[error("Invalid bulk string length: {0}")]
	InvalidBulkStringLength(i64),

	/// Invalid array length
	#[error("Invalid array length: {0}")]
	InvalidArrayLength(i64),

	/// Inline line exceeds the configured maximum
	#[error("inline length: {length} (expected: <= {limit})")]
	InlineTooLong {
		/// Observed length
		length: usize,
		/// Configured maximum
		limit: usize,
	},

	/// Declared content length exceeds the configured maximum
	#[error("content length: {length} (expected: <= {limit})")]
	ContentTooLong {
		/// Declared length
		length: usize,
		/// Configured maximum
		limit: usize,
	},

	/// Unbound aggregate header nested inside a bounded aggregate
	#[error("unbound aggregate types must be at top level")]
	UnboundInsideAggregate,

	/// Bare command line received while inline commands are disabled
	#[error("decoding of inline commands is disabled")]
	InlineCommandsDisabled,

	/// Request array element with a type other than bulk string
	#[error("request elements only support bulk strings, found type marker: {0}")]
	InvalidRequestElement(char),

	/// UTF-8 conversion error
	#[error("UTF-8 error: {0}")]
	Utf8Error(String),
}

impl From<std::str::Utf8Error> for ParseError {
	fn from(e: std::str::Utf8Error) -> Self {
		ParseError::Utf8Error(e.to_string())
	}
}

impl From<std::num::ParseIntError> for ParseError {
	fn from(e: std::num::ParseIntError) -> Self {
		ParseError::InvalidInteger(e.to_string())
	}
}

impl From<std::num::ParseFloatError> for ParseError {
	fn from(e: std::num::ParseFloatError) -> Self {
		ParseError::InvalidDouble(e.to_string())
	}
}

/// Errors that can occur while constructing or encoding values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
	/// Value cannot be represented on the wire
	#[error("Invalid value: {0}")]
	InvalidValue(String),
}
