//! Pre-encoded wire bytes for constant replies.
//!
//! These back the encoder's fast path: a constant value encodes to a shared
//! view of a process-lifetime buffer, so repeated encodes of `+OK\r\n`,
//! `_\r\n`, small integers and friends never allocate or recompute. Cloning
//! a [`Bytes`] only bumps a reference count, every emitted fragment aliases
//! the same backing storage.

use std::sync::LazyLock;

use bytes::Bytes;

use crate::types::AggregateKind;

/// `+OK\r\n`
pub static OK: Bytes = Bytes::from_static(b"+OK\r\n");
/// `+PONG\r\n`
pub static PONG: Bytes = Bytes::from_static(b"+PONG\r\n");
/// RESP3 null: `_\r\n`
pub static NULL: Bytes = Bytes::from_static(b"_\r\n");
/// RESP2 null bulk string: `$-1\r\n`
pub static NULL_BULK: Bytes = Bytes::from_static(b"$-1\r\n");
/// RESP2 null array: `*-1\r\n`
pub static NULL_ARRAY: Bytes = Bytes::from_static(b"*-1\r\n");
/// `$0\r\n\r\n`
pub static EMPTY_BULK: Bytes = Bytes::from_static(b"$0\r\n\r\n");
/// `*0\r\n`
pub static EMPTY_ARRAY: Bytes = Bytes::from_static(b"*0\r\n");
/// `%0\r\n`
pub static EMPTY_MAP: Bytes = Bytes::from_static(b"%0\r\n");
/// `~0\r\n`
pub static EMPTY_SET: Bytes = Bytes::from_static(b"~0\r\n");
/// `#t\r\n`
pub static TRUE: Bytes = Bytes::from_static(b"#t\r\n");
/// `#f\r\n`
pub static FALSE: Bytes = Bytes::from_static(b"#f\r\n");
/// `,inf\r\n`
pub static POSITIVE_INFINITY: Bytes = Bytes::from_static(b",inf\r\n");
/// `,-inf\r\n`
pub static NEGATIVE_INFINITY: Bytes = Bytes::from_static(b",-inf\r\n");
/// Streamed string header: `$?\r\n`
pub static STREAMED_STRING_HEADER: Bytes = Bytes::from_static(b"$?\r\n");
/// Terminator chunk of a streamed string: `;0\r\n`
pub static LAST_STREAMED_STRING_PART: Bytes = Bytes::from_static(b";0\r\n");
/// End of an unbound aggregate: `.\r\n`
pub static END: Bytes = Bytes::from_static(b".\r\n");

static UNBOUND_ARRAY: Bytes = Bytes::from_static(b"*?\r\n");
static UNBOUND_MAP: Bytes = Bytes::from_static(b"%?\r\n");
static UNBOUND_SET: Bytes = Bytes::from_static(b"~?\r\n");
static UNBOUND_ATTRIBUTE: Bytes = Bytes::from_static(b"|?\r\n");
static UNBOUND_PUSH: Bytes = Bytes::from_static(b">?\r\n");

/// Header bytes of the given unbound aggregate kind.
pub fn unbound_header(kind: AggregateKind) -> Bytes {
	match kind {
		AggregateKind::Array => UNBOUND_ARRAY.clone(),
		AggregateKind::Map => UNBOUND_MAP.clone(),
		AggregateKind::Set => UNBOUND_SET.clone(),
		AggregateKind::Attribute => UNBOUND_ATTRIBUTE.clone(),
		AggregateKind::Push => UNBOUND_PUSH.clone(),
	}
}

/// Largest integer with a pre-encoded `:N\r\n` wire form.
pub const MAX_CACHED_INTEGER: i64 = 127;

static INTEGERS: LazyLock<Vec<Bytes>> = LazyLock::new(|| {
	(0..=MAX_CACHED_INTEGER)
		.map(|i| Bytes::from(format!(":{i}\r\n")))
		.collect()
});

/// Pre-encoded wire bytes for small non-negative integers.
pub fn integer(value: i64) -> Option<Bytes> {
	if (0..=MAX_CACHED_INTEGER).contains(&value) {
		Some(INTEGERS[value as usize].clone())
	} else {
		None
	}
}

/// Build the standard arity error reply for the given command name.
///
/// Both decoder families share this one builder; callers that answer many
/// malformed invocations of the same command may cache the result.
pub fn wrong_number_of_arguments(command: &str) -> Bytes {
	Bytes::from(format!(
		"-ERR wrong number of arguments for '{command}' command\r\n"
	))
}
