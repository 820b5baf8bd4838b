//! Case-insensitive command-name lookup.
//!
//! Command names arrive on the wire in whatever case the client chose, and
//! dispatch tables must treat `GET`, `get` and `GeT` as the same key without
//! allocating a normalized copy per lookup.

use std::collections::HashMap;

/// A map keyed by ASCII strings, ignoring case.
///
/// Keys are normalized to uppercase once at insertion; lookups normalize the
/// probe on the stack for short keys (command names in practice) and only
/// fall back to a heap copy for unusually long ones. Lookups longer than the
/// longest inserted key short-circuit to a miss.
#[derive(Debug, Clone, Default)]
pub struct CommandMap<V> {
	entries: HashMap<Vec<u8>, V>,
	max_key_length: usize,
}

const STACK_KEY_LEN: usize = 64;

fn uppercase_into(key: &[u8], buf: &mut [u8]) {
	for (dst, &b) in buf.iter_mut().zip(key) {
		*dst = b.to_ascii_uppercase();
	}
}

impl<V> CommandMap<V> {
	/// Create an empty map.
	pub fn new() -> Self {
		Self {
			entries: HashMap::new(),
			max_key_length: 0,
		}
	}

	/// Insert a value under the given name, returning the previous value
	/// stored under any casing of that name.
	pub fn insert(&mut self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
		let key = key.as_ref().to_ascii_uppercase();
		self.max_key_length = self.max_key_length.max(key.len());
		self.entries.insert(key, value)
	}

	/// Look up a value by name, ignoring ASCII case.
	pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
		let key = key.as_ref();
		if key.len() > self.max_key_length {
			return None;
		}
		if key.len() <= STACK_KEY_LEN {
			let mut buf = [0u8; STACK_KEY_LEN];
			uppercase_into(key, &mut buf);
			self.entries.get(&buf[..key.len()])
		} else {
			self.entries.get(key.to_ascii_uppercase().as_slice())
		}
	}

	/// Remove a value by name, ignoring ASCII case.
	pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
		self.entries.remove(&key.as_ref().to_ascii_uppercase())
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when no entries are present.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_ignores_case() {
		let mut map = CommandMap::new();
		map.insert("test", "test");
		map.insert("Hello", "hello");

		assert_eq!(map.get("TEST"), Some(&"test"));
		assert_eq!(map.get("test"), Some(&"test"));
		assert_eq!(map.get("TesT"), Some(&"test"));

		assert_eq!(map.get("Hello"), Some(&"hello"));
		assert_eq!(map.get("HELLO"), Some(&"hello"));
		assert_eq!(map.get("hELLo"), Some(&"hello"));

		assert_eq!(map.get("none"), None);
	}

	#[test]
	fn test_insert_replaces_any_casing() {
		let mut map = CommandMap::new();
		assert_eq!(map.insert("get", 1), None);
		assert_eq!(map.insert("GET", 2), Some(1));
		assert_eq!(map.get("Get"), Some(&2));
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn test_longer_than_any_key_misses_fast() {
		let mut map = CommandMap::new();
		map.insert("set", ());
		assert_eq!(map.get("setrange"), None);
	}

	#[test]
	fn test_long_keys_fall_back_to_heap() {
		let mut map = CommandMap::new();
		let key = "x".repeat(100);
		map.insert(&key, 7);
		assert_eq!(map.get(key.to_uppercase()), Some(&7));
	}

	#[test]
	fn test_remove() {
		let mut map = CommandMap::new();
		map.insert("del", 1);
		assert_eq!(map.remove("DEL"), Some(1));
		assert!(map.is_empty());
	}
}
