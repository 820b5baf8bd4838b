//! Performance benchmarks for the RESP decoder and encoder

use bytes::{Bytes, BytesMut};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use respio::{RequestDecoder, RespDecoder, RespEncoder, RespValue};
use std::hint::black_box;

fn bench_parse_simple_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_simple_string");
    let data = b"+OK\r\n";

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("simple_string", |b| {
        b.iter(|| {
            let mut buf = BytesMut::from(&data[..]);
            respio::parse(black_box(&mut buf)).unwrap()
        })
    });
    group.finish();
}

fn bench_parse_bulk_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bulk_string");
    let data = b"$11\r\nhello world\r\n";

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("bulk_string", |b| {
        b.iter(|| {
            let mut buf = BytesMut::from(&data[..]);
            respio::parse(black_box(&mut buf)).unwrap()
        })
    });
    group.finish();
}

fn bench_parse_large_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_large_array");

    // Array with 100 bulk string elements
    let mut data = BytesMut::from("*100\r\n");
    for i in 0..100 {
        let item = format!("$3\r\n{:03}\r\n", i);
        data.extend_from_slice(item.as_bytes());
    }

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("array_100_items", |b| {
        b.iter(|| {
            let mut buf = data.clone();
            respio::parse(black_box(&mut buf)).unwrap()
        })
    });
    group.finish();
}

fn bench_parse_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_map");
    let data = b"%3\r\n+first\r\n:1\r\n+second\r\n:2\r\n+third\r\n:3\r\n";

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("map_3_pairs", |b| {
        b.iter(|| {
            let mut buf = BytesMut::from(&data[..]);
            respio::parse(black_box(&mut buf)).unwrap()
        })
    });
    group.finish();
}

fn bench_parse_streamed_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_streamed_string");
    let data = b"$?\r\n;5\r\nHello\r\n;6\r\n world\r\n;0\r\n";

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("streamed_string", |b| {
        b.iter(|| {
            let mut decoder = RespDecoder::new();
            let mut buf = BytesMut::from(&data[..]);
            let mut out = Vec::new();
            decoder.decode(black_box(&mut buf), &mut out).unwrap();
            out
        })
    });
    group.finish();
}

fn bench_decode_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_request");
    let data = b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n";

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("set_command", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut buf = BytesMut::from(&data[..]);
            let mut out = Vec::new();
            decoder.decode(black_box(&mut buf), &mut out).unwrap();
            out
        })
    });
    group.finish();
}

fn bench_encode_cached_reply(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_cached_reply");
    let value = RespValue::SimpleString(Bytes::from("OK"));

    group.bench_function("ok_reply", |b| {
        b.iter(|| black_box(&value).encode().unwrap())
    });
    group.finish();
}

fn bench_encode_bulk_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_bulk_string");
    let value = RespValue::BulkString(Bytes::from("hello world"));

    group.bench_function("bulk_string", |b| {
        b.iter(|| black_box(&value).encode().unwrap())
    });
    group.finish();
}

fn bench_encode_fragments(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_fragments");
    let value = RespValue::Array(vec![
        RespValue::BulkString(Bytes::from("SET")),
        RespValue::BulkString(Bytes::from("key")),
        RespValue::BulkString(Bytes::from("value")),
    ]);

    group.bench_function("array_set_command", |b| {
        b.iter(|| {
            let mut fragments = Vec::new();
            black_box(&value).encode_fragments(&mut fragments).unwrap();
            fragments
        })
    });
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    let value = RespValue::Array(vec![
        RespValue::BulkString(Bytes::from("SET")),
        RespValue::BulkString(Bytes::from("key")),
        RespValue::BulkString(Bytes::from("value")),
    ]);

    group.bench_function("encode_parse", |b| {
        b.iter(|| {
            let encoded = black_box(&value).encode().unwrap();
            let mut buf = BytesMut::from(&encoded[..]);
            respio::parse(&mut buf).unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_simple_string,
    bench_parse_bulk_string,
    bench_parse_large_array,
    bench_parse_map,
    bench_parse_streamed_string,
    bench_decode_request,
    bench_encode_cached_reply,
    bench_encode_bulk_string,
    bench_encode_fragments,
    bench_roundtrip,
);

criterion_main!(benches);
