use bytes::BytesMut;
use respio::RespDecoder;

fn main() {
	println!("--- RESP Streaming Decode Example ---");

	// Simulate a TCP stream with fragmented data
	// We are sending:
	// - A Simple String: "+OK\r\n"
	// - An Integer: ":1000\r\n"
	// - A RESP3 Map: "%1\r\n+name\r\n$5\r\nredis\r\n"
	// - But split into random chunks.
	let data_chunks = vec![
		b"+O".as_slice(),
		b"K\r\n:1".as_slice(),
		b"00".as_slice(),
		b"0\r\n%1\r\n+na".as_slice(),
		b"me\r\n$5\r\nre".as_slice(),
		b"dis\r\n".as_slice(),
	];

	let mut decoder = RespDecoder::new();
	let mut buffer = BytesMut::new();

	for (i, chunk) in data_chunks.iter().enumerate() {
		println!(
			"\n[Stream] Received Chunk {}: {:?}",
			i,
			std::str::from_utf8(chunk).unwrap()
		);

		buffer.extend_from_slice(chunk);

		let mut out = Vec::new();
		match decoder.decode(&mut buffer, &mut out) {
			Ok(()) if out.is_empty() => {
				println!("[Decoder] Incomplete, waiting for more data...");
			}
			Ok(()) => {
				for value in out {
					println!("[Decoder] Complete: {:?}", value);
				}
			}
			Err(e) => {
				eprintln!("[Decoder] Error: {:?}", e);
				break;
			}
		}
	}
}
