//! Incremental RESP2/RESP3 decoder.
//!
//! The decoder is a two-state byte-stream machine: `Inline` expects one
//! CRLF-terminated header line whose first byte is the type marker, and
//! `Content` expects exactly the number of payload bytes a preceding header
//! declared, plus a trailing CRLF. Aggregate headers push builders onto an
//! explicit stack so nesting never consumes call stack proportional to the
//! peer-controlled depth.

use bytes::BytesMut;

use crate::error::ParseError;
use crate::types::AggregateKind;
use crate::types::RespValue;
use crate::utils::*;

/// Limits applied while decoding.
///
/// Both limits are enforced before any allocation proportional to a
/// peer-declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
	/// Maximum length of one inline (header) line, excluding the type marker
	/// and CRLF. Default 65536.
	pub max_inline_length: usize,
	/// Maximum declared length of bulk string, blob error, verbatim string
	/// and streamed-part content. Default 512 MiB.
	pub max_content_length: usize,
}

impl Default for DecoderConfig {
	fn default() -> Self {
		Self {
			max_inline_length: 64 * 1024,
			max_content_length: 512 * 1024 * 1024,
		}
	}
}

/// What the pending length-prefixed content will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentKind {
	BulkString,
	BlobError,
	VerbatimString,
	StreamedStringPart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeState {
	/// Expecting a CRLF-terminated header line.
	Inline,
	/// Expecting exactly `length` content bytes followed by CRLF.
	Content { kind: ContentKind, length: usize },
}

/// A partially-filled aggregate.
#[derive(Debug)]
struct AggregateBuilder {
	kind: AggregateKind,
	expect: usize,
	items: Vec<RespValue>,
}

impl AggregateBuilder {
	fn new(kind: AggregateKind, declared: usize) -> Self {
		// Map/Attribute headers declare pairs; the wire carries 2x elements.
		let expect = match kind {
			AggregateKind::Map | AggregateKind::Attribute => declared * 2,
			_ => declared,
		};
		// Capacity is capped: `expect` is peer-controlled and the elements
		// have not arrived yet.
		Self {
			kind,
			expect,
			items: Vec::with_capacity(expect.min(1024)),
		}
	}

	fn is_full(&self) -> bool {
		self.items.len() >= self.expect
	}

	fn finish(self) -> RespValue {
		match self.kind {
			AggregateKind::Array => RespValue::Array(self.items),
			AggregateKind::Set => RespValue::Set(self.items),
			AggregateKind::Push => RespValue::Push(self.items),
			AggregateKind::Map => RespValue::Map(pair_up(self.items)),
			AggregateKind::Attribute => RespValue::Attribute(pair_up(self.items)),
		}
	}
}

fn pair_up(items: Vec<RespValue>) -> Vec<(RespValue, RespValue)> {
	let mut pairs = Vec::with_capacity(items.len() / 2);
	let mut items = items.into_iter();
	while let (Some(field), Some(value)) = (items.next(), items.next()) {
		pairs.push((field, value));
	}
	pairs
}

/// A stateful, incremental RESP2/RESP3 decoder.
///
/// Feed arbitrarily-sized chunks of the inbound stream through
/// [`decode`](Self::decode); each call appends every message the buffered
/// bytes complete and returns once no further complete token is available.
/// Insufficient data is a normal return, not an error; decoder state
/// persists across calls, so partial reads at any byte boundary are fine.
///
/// One decoder instance belongs to one connection's inbound path. Dropping
/// it releases any in-flight aggregate state.
pub struct RespDecoder {
	config: DecoderConfig,
	state: DecodeState,
	nests: Vec<AggregateBuilder>,
}

impl Default for RespDecoder {
	fn default() -> Self {
		Self::new()
	}
}

impl RespDecoder {
	/// Create a decoder with the default limits.
	pub fn new() -> Self {
		Self::with_config(DecoderConfig::default())
	}

	/// Create a decoder with explicit limits.
	pub fn with_config(config: DecoderConfig) -> Self {
		Self {
			config,
			state: DecodeState::Inline,
			nests: Vec::new(),
		}
	}

	/// Decode as many complete messages as `buf` currently allows,
	/// appending them to `out`.
	///
	/// On error the decoder resets itself (state back to inline, every
	/// partially-built aggregate released) before propagating; the stream's
	/// framing is not recoverable and the connection should be closed.
	pub fn decode(
		&mut self,
		buf: &mut BytesMut,
		out: &mut Vec<RespValue>,
	) -> Result<(), ParseError> {
		match self.run(buf, out) {
			Ok(()) => Ok(()),
			Err(e) => {
				self.reset();
				Err(e)
			}
		}
	}

	/// Drop all partially-decoded state, returning to the initial inline
	/// state.
	pub fn reset(&mut self) {
		self.state = DecodeState::Inline;
		self.nests.clear();
	}

	fn run(&mut self, buf: &mut BytesMut, out: &mut Vec<RespValue>) -> Result<(), ParseError> {
		loop {
			let progressed = match self.state {
				DecodeState::Inline => {
					if buf.is_empty() {
						return Ok(());
					}
					self.decode_inline(buf, out)?
				}
				DecodeState::Content { kind, length } => {
					self.decode_content(kind, length, buf, out)?
				}
			};
			if !progressed {
				return Ok(());
			}
		}
	}

	fn decode_inline(
		&mut self,
		buf: &mut BytesMut,
		out: &mut Vec<RespValue>,
	) -> Result<bool, ParseError> {
		let marker = buf[0];
		let Some(line) = take_line(buf, 1, self.config.max_inline_length)? else {
			return Ok(false);
		};
		match marker {
			SIMPLE_STRING => self.emit(RespValue::SimpleString(line), out),
			ERROR => {
				let (code, message) = split_error_text(&line);
				self.emit(RespValue::Error { code, message }, out);
			}
			INTEGER => self.emit(RespValue::Integer(parse_integer(&line)?), out),
			BULK_STRING => self.decode_bulk_length(&line, out)?,
			ARRAY => self.decode_aggregate_header(AggregateKind::Array, &line, out)?,
			NULL => self.emit(RespValue::Null, out),
			DOUBLE => self.emit(RespValue::Double(parse_double(&line)?), out),
			BOOLEAN => match &line[..] {
				b"t" => self.emit(RespValue::Boolean(true), out),
				b"f" => self.emit(RespValue::Boolean(false), out),
				_ => {
					return Err(ParseError::InvalidFormat(
						"boolean must be 't' or 'f'".to_string(),
					));
				}
			},
			BIG_NUMBER => {
				validate_big_number(&line)?;
				self.emit(RespValue::BigNumber(line), out);
			}
			BLOB_ERROR => {
				let length = self.content_length(&line)?;
				self.state = DecodeState::Content {
					kind: ContentKind::BlobError,
					length,
				};
			}
			VERBATIM_STRING => {
				let length = self.content_length(&line)?;
				// the content starts with a 3-byte format tag plus ':'
				if length < 4 {
					return Err(ParseError::InvalidFormat(
						"length of verbatim string must be >= 4".to_string(),
					));
				}
				self.state = DecodeState::Content {
					kind: ContentKind::VerbatimString,
					length,
				};
			}
			MAP => self.decode_aggregate_header(AggregateKind::Map, &line, out)?,
			SET => self.decode_aggregate_header(AggregateKind::Set, &line, out)?,
			ATTRIBUTE => self.decode_aggregate_header(AggregateKind::Attribute, &line, out)?,
			PUSH => self.decode_aggregate_header(AggregateKind::Push, &line, out)?,
			STREAMED_STRING_PART => {
				let length = self.content_length(&line)?;
				if length == 0 {
					// the terminator carries no content bytes at all
					self.emit(RespValue::last_streamed_string_part(), out);
				} else {
					self.state = DecodeState::Content {
						kind: ContentKind::StreamedStringPart,
						length,
					};
				}
			}
			END => self.emit(RespValue::End, out),
			other => return Err(ParseError::InvalidTypeMarker(other as char)),
		}
		Ok(true)
	}

	/// Parse a content length field, rejecting negatives and lengths past
	/// the configured maximum.
	fn content_length(&self, line: &[u8]) -> Result<usize, ParseError> {
		let length = parse_bulk_length(line)?;
		if length < 0 {
			// only the bulk string has a null sentinel, handled separately
			return Err(ParseError::InvalidBulkStringLength(length));
		}
		let length = length as usize;
		if length > self.config.max_content_length {
			return Err(ParseError::ContentTooLong {
				length,
				limit: self.config.max_content_length,
			});
		}
		Ok(length)
	}

	fn decode_bulk_length(
		&mut self,
		line: &[u8],
		out: &mut Vec<RespValue>,
	) -> Result<(), ParseError> {
		if line == [UNBOUND_SIZE] {
			// `$?`: a streamed string follows as separate part messages
			if !self.nests.is_empty() {
				return Err(ParseError::UnboundInsideAggregate);
			}
			self.emit(RespValue::StreamedStringHeader, out);
			return Ok(());
		}
		let length = parse_bulk_length(line)?;
		if length == -1 {
			self.emit(RespValue::Null, out);
			return Ok(());
		}
		let length = length as usize;
		if length > self.config.max_content_length {
			return Err(ParseError::ContentTooLong {
				length,
				limit: self.config.max_content_length,
			});
		}
		self.state = DecodeState::Content {
			kind: ContentKind::BulkString,
			length,
		};
		Ok(())
	}

	fn decode_aggregate_header(
		&mut self,
		kind: AggregateKind,
		line: &[u8],
		out: &mut Vec<RespValue>,
	) -> Result<(), ParseError> {
		if line == [UNBOUND_SIZE] && kind != AggregateKind::Attribute {
			if !self.nests.is_empty() {
				return Err(ParseError::UnboundInsideAggregate);
			}
			self.emit(RespValue::UnboundHeader(kind), out);
			return Ok(());
		}
		let size = parse_array_size(line)?;
		match size {
			-1 => self.emit(RespValue::Null, out),
			0 => self.emit(empty_aggregate(kind), out),
			_ => self
				.nests
				.push(AggregateBuilder::new(kind, size as usize)),
		}
		Ok(())
	}

	fn decode_content(
		&mut self,
		kind: ContentKind,
		length: usize,
		buf: &mut BytesMut,
		out: &mut Vec<RespValue>,
	) -> Result<bool, ParseError> {
		if buf.len() < length + CRLF.len() {
			return Ok(false);
		}
		let content = buf.split_to(length).freeze();
		take_eol(buf)?;
		self.state = DecodeState::Inline;
		let msg = match kind {
			ContentKind::BulkString => RespValue::BulkString(content),
			ContentKind::BlobError => {
				let (code, message) = split_error_text(&content);
				RespValue::BlobError { code, message }
			}
			ContentKind::VerbatimString => {
				if content.len() < 4 || content[3] != b':' {
					return Err(ParseError::InvalidFormat(
						"verbatim string must carry a 3-byte format tag and ':'".to_string(),
					));
				}
				RespValue::VerbatimString {
					format: content.slice(..3),
					data: content.slice(4..),
				}
			}
			ContentKind::StreamedStringPart => RespValue::StreamedStringPart(content),
		};
		self.emit(msg, out);
		Ok(true)
	}

	/// Feed a completed value to the innermost builder, bubbling finished
	/// aggregates up the stack; values completing at top level go to `out`.
	///
	/// Expressed as a loop on purpose: nesting depth is peer-controlled and
	/// must not translate into call-stack depth.
	fn emit(&mut self, msg: RespValue, out: &mut Vec<RespValue>) {
		let mut msg = msg;
		while let Some(top) = self.nests.last_mut() {
			top.items.push(msg);
			if !top.is_full() {
				return;
			}
			msg = match self.nests.pop() {
				Some(builder) => builder.finish(),
				None => return,
			};
		}
		out.push(msg);
	}
}

fn empty_aggregate(kind: AggregateKind) -> RespValue {
	match kind {
		AggregateKind::Array => RespValue::Array(Vec::new()),
		AggregateKind::Map => RespValue::Map(Vec::new()),
		AggregateKind::Set => RespValue::Set(Vec::new()),
		AggregateKind::Attribute => RespValue::Attribute(Vec::new()),
		AggregateKind::Push => RespValue::Push(Vec::new()),
	}
}

/// Convenience function for one-off parsing of a single value.
///
/// For streaming input, use [`RespDecoder`] directly: it keeps its state
/// across calls, this helper treats an incomplete buffer as an error.
pub fn parse(buf: &mut BytesMut) -> Result<RespValue, ParseError> {
	let mut decoder = RespDecoder::new();
	let mut out = Vec::with_capacity(1);
	decoder.decode(buf, &mut out)?;
	out.into_iter().next().ok_or(ParseError::UnexpectedEOF)
}
