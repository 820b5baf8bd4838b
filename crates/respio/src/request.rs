//! Request-side decoder: the restricted client-to-server grammar.
//!
//! Clients speak a much narrower protocol than servers: every command is a
//! flat array of bulk strings (`*N` followed by N `$`-elements, no nesting),
//! or optionally a bare whitespace-separated line in the legacy inline form.
//! Rejecting everything else up front keeps the hot accept path small and
//! turns protocol abuse into an immediate connection error.

use bytes::Bytes;
use bytes::BytesMut;

use crate::decoder::DecoderConfig;
use crate::error::ParseError;
use crate::types::RespValue;
use crate::utils::*;

/// One decoded client command: a flat list of bulk-string arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
	args: Vec<RespValue>,
}

impl Request {
	pub(crate) fn new(args: Vec<RespValue>) -> Self {
		Self { args }
	}

	/// All arguments, command name first.
	pub fn args(&self) -> &[RespValue] {
		&self.args
	}

	/// Consume the request, yielding its arguments.
	pub fn into_args(self) -> Vec<RespValue> {
		self.args
	}

	/// The command name (first argument), if present.
	pub fn command(&self) -> Option<&Bytes> {
		match self.args.first() {
			Some(RespValue::BulkString(name)) => Some(name),
			_ => None,
		}
	}

	/// The argument at the given position, if present.
	pub fn argument(&self, index: usize) -> Option<&RespValue> {
		self.args.get(index)
	}

	/// Number of arguments including the command name.
	pub fn len(&self) -> usize {
		self.args.len()
	}

	/// True for the empty request (`*0\r\n`).
	pub fn is_empty(&self) -> bool {
		self.args.is_empty()
	}
}

impl std::fmt::Display for Request {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (i, arg) in self.args.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			match arg {
				RespValue::BulkString(b) => write!(f, "{}", String::from_utf8_lossy(b))?,
				RespValue::Null => f.write_str("(nil)")?,
				other => write!(f, "{other:?}")?,
			}
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
	/// Expecting a `*N` header or an inline command line.
	Inline,
	/// Expecting the `$len` header of the next argument.
	Element,
	/// Expecting `length` content bytes plus CRLF.
	Content { length: usize },
}

/// Incremental decoder for client commands.
///
/// Like [`RespDecoder`](crate::RespDecoder) this is a resumable state
/// machine: feed it chunks, collect complete [`Request`]s, and tear the
/// connection down on the first error. Inline commands are off by default;
/// enable them with [`allow_inline_commands`](Self::allow_inline_commands)
/// for telnet-style clients.
pub struct RequestDecoder {
	config: DecoderConfig,
	inline_commands: bool,
	state: RequestState,
	expect: usize,
	args: Vec<RespValue>,
}

impl Default for RequestDecoder {
	fn default() -> Self {
		Self::new()
	}
}

impl RequestDecoder {
	/// Create a request decoder with the default limits.
	pub fn new() -> Self {
		Self::with_config(DecoderConfig::default())
	}

	/// Create a request decoder with explicit limits.
	pub fn with_config(config: DecoderConfig) -> Self {
		Self {
			config,
			inline_commands: false,
			state: RequestState::Inline,
			expect: 0,
			args: Vec::new(),
		}
	}

	/// Also accept bare whitespace-separated command lines.
	pub fn allow_inline_commands(mut self) -> Self {
		self.inline_commands = true;
		self
	}

	/// Decode as many complete requests as `buf` currently allows, appending
	/// them to `out`.
	///
	/// On error the decoder resets itself before propagating.
	pub fn decode(
		&mut self,
		buf: &mut BytesMut,
		out: &mut Vec<Request>,
	) -> Result<(), ParseError> {
		match self.run(buf, out) {
			Ok(()) => Ok(()),
			Err(e) => {
				self.reset();
				Err(e)
			}
		}
	}

	/// Drop all partially-decoded state.
	pub fn reset(&mut self) {
		self.state = RequestState::Inline;
		self.expect = 0;
		self.args.clear();
	}

	fn run(&mut self, buf: &mut BytesMut, out: &mut Vec<Request>) -> Result<(), ParseError> {
		loop {
			let progressed = match self.state {
				RequestState::Inline => {
					if buf.is_empty() {
						return Ok(());
					}
					self.decode_header(buf, out)?
				}
				RequestState::Element => {
					if buf.is_empty() {
						return Ok(());
					}
					self.decode_element(buf, out)?
				}
				RequestState::Content { length } => self.decode_content(length, buf, out)?,
			};
			if !progressed {
				return Ok(());
			}
		}
	}

	fn decode_header(
		&mut self,
		buf: &mut BytesMut,
		out: &mut Vec<Request>,
	) -> Result<bool, ParseError> {
		if buf[0] != ARRAY {
			return self.decode_inline_command(buf, out);
		}
		let Some(line) = take_line(buf, 1, self.config.max_inline_length)? else {
			return Ok(false);
		};
		let size = parse_array_size(&line)?;
		if size < 0 {
			return Err(ParseError::InvalidArrayLength(size));
		}
		if size == 0 {
			out.push(Request::new(Vec::new()));
			return Ok(true);
		}
		self.expect = size as usize;
		self.args = Vec::with_capacity(self.expect.min(1024));
		self.state = RequestState::Element;
		Ok(true)
	}

	fn decode_element(
		&mut self,
		buf: &mut BytesMut,
		out: &mut Vec<Request>,
	) -> Result<bool, ParseError> {
		let marker = buf[0];
		if marker != BULK_STRING {
			return Err(ParseError::InvalidRequestElement(marker as char));
		}
		let Some(line) = take_line(buf, 1, self.config.max_inline_length)? else {
			return Ok(false);
		};
		let length = parse_bulk_length(&line)?;
		if length == -1 {
			self.args.push(RespValue::Null);
			self.finish_if_full(out);
			return Ok(true);
		}
		let length = length as usize;
		if length > self.config.max_content_length {
			return Err(ParseError::ContentTooLong {
				length,
				limit: self.config.max_content_length,
			});
		}
		self.state = RequestState::Content { length };
		Ok(true)
	}

	fn decode_content(
		&mut self,
		length: usize,
		buf: &mut BytesMut,
		out: &mut Vec<Request>,
	) -> Result<bool, ParseError> {
		if buf.len() < length + CRLF.len() {
			return Ok(false);
		}
		let content = buf.split_to(length).freeze();
		take_eol(buf)?;
		self.args.push(RespValue::BulkString(content));
		self.state = RequestState::Element;
		self.finish_if_full(out);
		Ok(true)
	}

	fn finish_if_full(&mut self, out: &mut Vec<Request>) {
		if self.args.len() >= self.expect {
			let args = std::mem::take(&mut self.args);
			out.push(Request::new(args));
			self.expect = 0;
			self.state = RequestState::Inline;
		}
	}

	/// Decode a legacy inline command: one line, arguments separated by runs
	/// of spaces or tabs. Empty and all-whitespace lines are skipped, which
	/// lets interactive clients send bare newlines as keep-alives.
	fn decode_inline_command(
		&mut self,
		buf: &mut BytesMut,
		out: &mut Vec<Request>,
	) -> Result<bool, ParseError> {
		if !self.inline_commands {
			return Err(ParseError::InlineCommandsDisabled);
		}
		let Some(line) = take_line(buf, 0, self.config.max_inline_length)? else {
			return Ok(false);
		};
		let mut args = Vec::new();
		let mut start = None;
		for (i, &b) in line.iter().enumerate() {
			match (b, start) {
				(b' ' | b'\t', Some(s)) => {
					args.push(RespValue::BulkString(line.slice(s..i)));
					start = None;
				}
				(b' ' | b'\t', None) => {}
				(_, None) => start = Some(i),
				(_, Some(_)) => {}
			}
		}
		if let Some(s) = start {
			args.push(RespValue::BulkString(line.slice(s..)));
		}
		if !args.is_empty() {
			out.push(Request::new(args));
		}
		Ok(true)
	}
}
