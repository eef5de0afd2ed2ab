//! Decoder throughput benchmarks
//!
//! Measures block extraction for whole bodies and for small transport chunks.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use swapstream::sse::EventDecoder;

/// Progress body with `blocks` events, alternating LF and CRLF terminators
fn generate_body(blocks: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..blocks {
        if i % 2 == 0 {
            body.push_str(&format!(
                "event: progress\ndata: {{\"status\":\"processing\",\"pct\":{}}}\n\n",
                i % 100
            ));
        } else {
            body.push_str(&format!(
                "data: {{\"status\":\"processing\",\"step\":{},\"label\":\"teñido\"}}\r\n\r\n",
                i
            ));
        }
    }
    body.push_str("data: {\"status\":\"done\",\"result\":\"https://cdn.test/r.jpg\"}\n\n");
    body.into_bytes()
}

fn decode_all(body: &[u8], chunk_size: usize) -> usize {
    let mut decoder = EventDecoder::new();
    let mut count = 0;
    for chunk in body.chunks(chunk_size) {
        count += decoder.feed(chunk).len();
    }
    count
}

/// Whole body delivered in one chunk
fn bench_single_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_single_chunk");

    for blocks in [10, 100, 1000].iter() {
        let body = generate_body(*blocks);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &body, |b, body| {
            b.iter(|| decode_all(black_box(body), body.len()))
        });
    }

    group.finish();
}

/// Fixed body delivered in progressively smaller chunks
fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chunk_size");
    let body = generate_body(200);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for size in [1, 7, 64, 1024].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| decode_all(black_box(&body), size))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_chunk, bench_chunk_sizes);
criterion_main!(benches);
