//! Utility functions and constants for the RESP wire format.

use bytes::Buf;
use bytes::Bytes;
use bytes::BytesMut;
use memchr::memchr;

use crate::error::ParseError;

/// CRLF line ending
pub const CRLF: &[u8] = b"\r\n";

/// Type markers for RESP2
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Type markers for RESP3
pub const NULL: u8 = b'_';
pub const BOOLEAN: u8 = b'#';
pub const DOUBLE: u8 = b',';
pub const BIG_NUMBER: u8 = b'(';
pub const BLOB_ERROR: u8 = b'!';
pub const VERBATIM_STRING: u8 = b'=';
pub const MAP: u8 = b'%';
pub const SET: u8 = b'~';
pub const ATTRIBUTE: u8 = b'|';
pub const PUSH: u8 = b'>';
pub const STREAMED_STRING_PART: u8 = b';';
pub const END: u8 = b'.';

/// Length field of unbound/streamed forms
pub const UNBOUND_SIZE: u8 = b'?';

/// Split one CRLF-terminated line off the front of `buf`.
///
/// Returns the line without its terminator, with the first `skip` bytes (the
/// type marker, if any) removed, as a zero-copy slice of the buffer. Returns
/// `Ok(None)` and leaves `buf` untouched when no full line is buffered yet.
/// A bare LF or a line longer than `max` is an error.
pub fn take_line(
	buf: &mut BytesMut,
	skip: usize,
	max: usize,
) -> Result<Option<Bytes>, ParseError> {
	let Some(lf) = memchr(b'\n', buf) else {
		// No terminator yet: the line so far may legally be `max` bytes plus
		// a pending CR, anything longer can never become valid.
		if buf.len() > skip + max + 1 {
			return Err(ParseError::InlineTooLong {
				length: buf.len() - skip,
				limit: max,
			});
		}
		return Ok(None);
	};
	if lf == 0 || buf[lf - 1] != b'\r' {
		return Err(ParseError::InvalidFormat(
			"line feed without preceding carriage return".to_string(),
		));
	}
	let end = lf - 1;
	if end < skip {
		return Err(ParseError::InvalidFormat(
			"line shorter than its type marker".to_string(),
		));
	}
	if end - skip > max {
		return Err(ParseError::InlineTooLong {
			length: end - skip,
			limit: max,
		});
	}
	let line = buf.split_to(lf + 1).freeze();
	Ok(Some(line.slice(skip..end)))
}

/// Consume and validate the CRLF trailing a content payload.
///
/// The caller must have checked that at least two bytes are buffered.
pub fn take_eol(buf: &mut BytesMut) -> Result<(), ParseError> {
	if &buf[..2] != CRLF {
		return Err(ParseError::InvalidFormat(format!(
			"delimiter: [{:#04x}, {:#04x}] (expected: \\r\\n)",
			buf[0], buf[1]
		)));
	}
	buf.advance(2);
	Ok(())
}

/// Parse a signed 64-bit integer from ASCII decimal text.
pub fn parse_integer(buf: &[u8]) -> Result<i64, ParseError> {
	let s = std::str::from_utf8(buf)?;
	s.parse::<i64>()
		.map_err(|e| ParseError::InvalidInteger(e.to_string()))
}

/// Parse an array/aggregate size field: `-1..=i32::MAX`.
pub fn parse_array_size(buf: &[u8]) -> Result<i64, ParseError> {
	let size = parse_integer(buf)?;
	if !(-1..=i32::MAX as i64).contains(&size) {
		return Err(ParseError::InvalidArrayLength(size));
	}
	Ok(size)
}

/// Parse a bulk/blob/verbatim/part length field: `-1..=i32::MAX`.
pub fn parse_bulk_length(buf: &[u8]) -> Result<i64, ParseError> {
	let length = parse_integer(buf)?;
	if !(-1..=i32::MAX as i64).contains(&length) {
		return Err(ParseError::InvalidBulkStringLength(length));
	}
	Ok(length)
}

/// Parse a double from ASCII text. `inf`/`-inf` are the RESP3 infinity
/// literals; NaN has no wire representation and is rejected.
pub fn parse_double(buf: &[u8]) -> Result<f64, ParseError> {
	let s = std::str::from_utf8(buf)?;
	match s {
		"inf" | "+inf" => Ok(f64::INFINITY),
		"-inf" => Ok(f64::NEG_INFINITY),
		_ => {
			let value = s
				.parse::<f64>()
				.map_err(|e| ParseError::InvalidDouble(e.to_string()))?;
			if value.is_nan() {
				return Err(ParseError::InvalidDouble("nan has no wire form".to_string()));
			}
			Ok(value)
		}
	}
}

/// Validate big number text: ASCII digits with an optional leading `-`.
pub fn validate_big_number(buf: &[u8]) -> Result<(), ParseError> {
	let digits = match buf.first() {
		Some(b'-') => &buf[1..],
		_ => buf,
	};
	if digits.is_empty() || !digits.iter().all(|b| b.is_ascii_digit()) {
		return Err(ParseError::InvalidInteger(
			String::from_utf8_lossy(buf).into_owned(),
		));
	}
	Ok(())
}

/// Split error text (`CODE message`) at the first space into code and
/// message slices. Without a space the whole text is the code.
pub fn split_error_text(text: &Bytes) -> (Bytes, Bytes) {
	match memchr(b' ', text) {
		Some(pos) => (text.slice(..pos), text.slice(pos + 1..)),
		None => (text.clone(), Bytes::new()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_take_line() {
		let mut buf = BytesMut::from(&b"+hello\r\nworld"[..]);
		let line = take_line(&mut buf, 1, 65536).unwrap().unwrap();
		assert_eq!(line, "hello");
		assert_eq!(&buf[..], b"world");
	}

	#[test]
	fn test_take_line_incomplete() {
		let mut buf = BytesMut::from(&b"+hel"[..]);
		assert_eq!(take_line(&mut buf, 1, 65536).unwrap(), None);
		assert_eq!(&buf[..], b"+hel");
	}

	#[test]
	fn test_take_line_bare_lf() {
		let mut buf = BytesMut::from(&b"+hello\nworld\r\n"[..]);
		assert!(take_line(&mut buf, 1, 65536).is_err());
	}

	#[test]
	fn test_take_line_too_long() {
		let mut buf = BytesMut::from(&b"+abcdef\r\n"[..]);
		assert!(matches!(
			take_line(&mut buf, 1, 4),
			Err(ParseError::InlineTooLong { length: 6, limit: 4 })
		));

		// an unterminated line past the limit fails early
		let mut buf = BytesMut::from(&b"+abcdefgh"[..]);
		assert!(take_line(&mut buf, 1, 4).is_err());
	}

	#[test]
	fn test_parse_integer() {
		assert_eq!(parse_integer(b"123").unwrap(), 123);
		assert_eq!(parse_integer(b"-456").unwrap(), -456);
		assert!(parse_integer(b"abc").is_err());
		assert!(parse_integer(b"99999999999999999999999").is_err());
	}

	#[test]
	fn test_parse_lengths() {
		assert_eq!(parse_bulk_length(b"0").unwrap(), 0);
		assert_eq!(parse_bulk_length(b"-1").unwrap(), -1);
		assert!(matches!(
			parse_bulk_length(b"-2"),
			Err(ParseError::InvalidBulkStringLength(-2))
		));
		// 32-bit overflow
		assert!(parse_bulk_length(b"4294967296").is_err());
		assert!(matches!(
			parse_array_size(b"-3"),
			Err(ParseError::InvalidArrayLength(-3))
		));
	}

	#[test]
	fn test_parse_double() {
		assert_eq!(parse_double(b"3.14").unwrap(), 3.14);
		assert_eq!(parse_double(b"-2.5").unwrap(), -2.5);
		assert_eq!(parse_double(b"inf").unwrap(), f64::INFINITY);
		assert_eq!(parse_double(b"-inf").unwrap(), f64::NEG_INFINITY);
		assert!(parse_double(b"nan").is_err());
	}

	#[test]
	fn test_split_error_text() {
		let (code, message) = split_error_text(&Bytes::from("ERR unknown command"));
		assert_eq!(code, "ERR");
		assert_eq!(message, "unknown command");

		let (code, message) = split_error_text(&Bytes::from("MOVED"));
		assert_eq!(code, "MOVED");
		assert!(message.is_empty());
	}
}
