//! Integration tests for the reply decoder

use bytes::Bytes;
use bytes::BytesMut;
use respio::AggregateKind;
use respio::DecoderConfig;
use respio::ParseError;
use respio::RespDecoder;
use respio::RespValue;
use rstest::rstest;

fn decode_all(input: &[u8]) -> Vec<RespValue> {
	let mut decoder = RespDecoder::new();
	let mut buf = BytesMut::from(input);
	let mut out = Vec::new();
	decoder.decode(&mut buf, &mut out).unwrap();
	assert!(buf.is_empty(), "undecoded bytes left: {:?}", &buf[..]);
	out
}

#[rstest]
#[case(b"+OK\r\n", RespValue::SimpleString(Bytes::from("OK")))]
#[case(b":1000\r\n", RespValue::Integer(1000))]
#[case(b"$6\r\nfoobar\r\n", RespValue::BulkString(Bytes::from("foobar")))]
#[case(b"$0\r\n\r\n", RespValue::BulkString(Bytes::new()))]
#[case(b"$-1\r\n", RespValue::Null)]
#[case(b"*-1\r\n", RespValue::Null)]
#[case(b"_\r\n", RespValue::Null)]
#[case(b"#t\r\n", RespValue::Boolean(true))]
#[case(b"#f\r\n", RespValue::Boolean(false))]
#[case(b",1.23\r\n", RespValue::Double(1.23))]
#[case(b",inf\r\n", RespValue::Double(f64::INFINITY))]
#[case(b",-inf\r\n", RespValue::Double(f64::NEG_INFINITY))]
#[case(b"(123456789009876543211234567890\r\n", RespValue::BigNumber(Bytes::from("123456789009876543211234567890")))]
fn test_decode_single_value(#[case] input: &'static [u8], #[case] expected: RespValue) {
	assert_eq!(decode_all(input), vec![expected]);
}

#[test]
fn test_decode_error_splits_code() {
	assert_eq!(
		decode_all(b"-WRONGTYPE Operation against a key\r\n"),
		vec![RespValue::Error {
			code: Bytes::from("WRONGTYPE"),
			message: Bytes::from("Operation against a key"),
		}]
	);
}

#[test]
fn test_decode_blob_error() {
	assert_eq!(
		decode_all(b"!21\r\nSYNTAX invalid syntax\r\n"),
		vec![RespValue::BlobError {
			code: Bytes::from("SYNTAX"),
			message: Bytes::from("invalid syntax"),
		}]
	);
}

#[test]
fn test_decode_verbatim_string() {
	assert_eq!(
		decode_all(b"=15\r\ntxt:Some string\r\n"),
		vec![RespValue::VerbatimString {
			format: Bytes::from("txt"),
			data: Bytes::from("Some string"),
		}]
	);
}

#[test]
fn test_decode_deeply_nested() {
	let values = decode_all(b"*3\r\n:1\r\n$2\r\nab\r\n*2\r\n:2\r\n*1\r\n:3\r\n");
	assert_eq!(
		values,
		vec![RespValue::Array(vec![
			RespValue::Integer(1),
			RespValue::BulkString(Bytes::from("ab")),
			RespValue::Array(vec![
				RespValue::Integer(2),
				RespValue::Array(vec![RespValue::Integer(3)]),
			]),
		])]
	);
}

#[test]
fn test_decode_map_inside_array() {
	let values = decode_all(b"*2\r\n%1\r\n+key\r\n:1\r\n~1\r\n+member\r\n");
	assert_eq!(
		values,
		vec![RespValue::Array(vec![
			RespValue::Map(vec![(
				RespValue::SimpleString(Bytes::from("key")),
				RespValue::Integer(1),
			)]),
			RespValue::Set(vec![RespValue::SimpleString(Bytes::from("member"))]),
		])]
	);
}

#[test]
fn test_decode_attribute_then_reply() {
	let values = decode_all(b"|1\r\n+ttl\r\n:3600\r\n+OK\r\n");
	assert_eq!(
		values,
		vec![
			RespValue::Attribute(vec![(
				RespValue::SimpleString(Bytes::from("ttl")),
				RespValue::Integer(3600),
			)]),
			RespValue::SimpleString(Bytes::from("OK")),
		]
	);
}

#[test]
fn test_decode_push() {
	let values = decode_all(b">3\r\n+message\r\n+chan\r\n$5\r\nhello\r\n");
	assert_eq!(
		values,
		vec![RespValue::Push(vec![
			RespValue::SimpleString(Bytes::from("message")),
			RespValue::SimpleString(Bytes::from("chan")),
			RespValue::BulkString(Bytes::from("hello")),
		])]
	);
}

#[test]
fn test_decode_unbound_aggregate_sequence() {
	let values = decode_all(b"*?\r\n:1\r\n:2\r\n.\r\n");
	assert_eq!(
		values,
		vec![
			RespValue::UnboundHeader(AggregateKind::Array),
			RespValue::Integer(1),
			RespValue::Integer(2),
			RespValue::End,
		]
	);
}

#[rstest]
#[case(b"%?\r\n", AggregateKind::Map)]
#[case(b"~?\r\n", AggregateKind::Set)]
#[case(b">?\r\n", AggregateKind::Push)]
fn test_decode_unbound_headers(#[case] input: &'static [u8], #[case] kind: AggregateKind) {
	assert_eq!(decode_all(input), vec![RespValue::UnboundHeader(kind)]);
}

#[test]
fn test_decode_streamed_string() {
	let values = decode_all(b"$?\r\n;4\r\nHell\r\n;5\r\no wor\r\n;2\r\nld\r\n;0\r\n");
	assert_eq!(values[0], RespValue::StreamedStringHeader);
	let text: Vec<u8> = values[1..4]
		.iter()
		.flat_map(|v| match v {
			RespValue::StreamedStringPart(part) => part.to_vec(),
			_ => panic!("expected StreamedStringPart, got {v:?}"),
		})
		.collect();
	assert_eq!(text, b"Hello world");
	assert!(values[4].is_last_streamed_part());
}

#[test]
fn test_byte_at_a_time_feeding() {
	let input = b"*2\r\n$5\r\nhello\r\n%1\r\n#t\r\n,2.5\r\n+OK\r\n";
	let mut decoder = RespDecoder::new();
	let mut buf = BytesMut::new();
	let mut out = Vec::new();
	for &b in input.iter() {
		buf.extend_from_slice(&[b]);
		decoder.decode(&mut buf, &mut out).unwrap();
	}
	assert_eq!(
		out,
		vec![
			RespValue::Array(vec![
				RespValue::BulkString(Bytes::from("hello")),
				RespValue::Map(vec![(RespValue::Boolean(true), RespValue::Double(2.5))]),
			]),
			RespValue::SimpleString(Bytes::from("OK")),
		]
	);
}

#[test]
fn test_chunked_matches_contiguous() {
	let input = b"$?\r\n;6\r\nfoobar\r\n;0\r\n*1\r\n(99999999999999999999\r\n";
	let contiguous = decode_all(input);

	for chunk in [3usize, 7, 11] {
		let mut decoder = RespDecoder::new();
		let mut buf = BytesMut::new();
		let mut out = Vec::new();
		for piece in input.chunks(chunk) {
			buf.extend_from_slice(piece);
			decoder.decode(&mut buf, &mut out).unwrap();
		}
		assert_eq!(out, contiguous, "chunk size {chunk}");
	}
}

#[rstest]
#[case(b"@bad\r\n")]
#[case(b"#maybe\r\n")]
#[case(b",not-a-number\r\n")]
#[case(b"(123abc\r\n")]
#[case(b":12.5\r\n")]
#[case(b"$abc\r\n")]
#[case(b"$-2\r\n")]
#[case(b"*-2\r\n")]
#[case(b"+partial\nline\r\n")]
#[case(b"=3\r\ntx:\r\n")]
#[case(b"$3\r\nfooXY")]
fn test_decode_malformed(#[case] input: &'static [u8]) {
	let mut decoder = RespDecoder::new();
	let mut buf = BytesMut::from(input);
	let mut out = Vec::new();
	assert!(decoder.decode(&mut buf, &mut out).is_err());
}

#[test]
fn test_unbound_only_at_top_level() {
	for input in [&b"*2\r\n:1\r\n*?\r\n"[..], b"*1\r\n$?\r\n", b"%1\r\n+k\r\n~?\r\n"] {
		let mut decoder = RespDecoder::new();
		let mut buf = BytesMut::from(input);
		let mut out = Vec::new();
		assert!(matches!(
			decoder.decode(&mut buf, &mut out),
			Err(ParseError::UnboundInsideAggregate)
		));
	}
}

#[test]
fn test_decoder_reusable_after_error() {
	let mut decoder = RespDecoder::new();
	let mut out = Vec::new();

	let mut buf = BytesMut::from(&b"*3\r\n:1\r\n@\r\n"[..]);
	assert!(decoder.decode(&mut buf, &mut out).is_err());
	assert!(out.is_empty());

	let mut buf = BytesMut::from(&b":7\r\n"[..]);
	decoder.decode(&mut buf, &mut out).unwrap();
	assert_eq!(out, vec![RespValue::Integer(7)]);
}

#[test]
fn test_payload_aliases_input_buffer() {
	let mut decoder = RespDecoder::new();
	let mut buf = BytesMut::from(&b"$11\r\nhello world\r\n"[..]);
	let content_ptr = buf[5..].as_ptr();
	let mut out = Vec::new();
	decoder.decode(&mut buf, &mut out).unwrap();
	let RespValue::BulkString(content) = &out[0] else {
		panic!("expected BulkString, got {:?}", out[0]);
	};
	assert_eq!(content.as_ptr(), content_ptr);
}

#[test]
fn test_content_limit_applies_to_all_length_prefixed_types() {
	let config = DecoderConfig {
		max_content_length: 10,
		..DecoderConfig::default()
	};
	for input in [&b"$11\r\n"[..], b"!11\r\n", b"=11\r\n", b";11\r\n"] {
		let mut decoder = RespDecoder::with_config(config);
		let mut buf = BytesMut::from(input);
		let mut out = Vec::new();
		assert!(matches!(
			decoder.decode(&mut buf, &mut out),
			Err(ParseError::ContentTooLong { length: 11, limit: 10 })
		));
	}
}

#[test]
fn test_one_shot_parse() {
	let mut buf = BytesMut::from(&b"+PONG\r\n"[..]);
	assert_eq!(
		respio::parse(&mut buf).unwrap(),
		RespValue::SimpleString(Bytes::from("PONG"))
	);

	let mut buf = BytesMut::from(&b"+PON"[..]);
	assert!(matches!(
		respio::parse(&mut buf),
		Err(ParseError::UnexpectedEOF)
	));
}
