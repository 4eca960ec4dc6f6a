//! Benchmarks for hwpdec decoding performance.
//!
//! Run with: cargo bench
//!
//! Section streams are synthesized record by record, so the numbers cover
//! framing, dispatch, lexing and the char shape overlay without container I/O.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hwpdec::hwp5::{bodytext::lexer, DocumentStreams, FileHeader, TagId, Version};
use hwpdec::ParseOptions;

fn push_record(buf: &mut Vec<u8>, tag: TagId, level: u16, payload: &[u8]) {
    let header = (tag as u32) | ((level as u32) << 10) | ((payload.len() as u32) << 20);
    buf.extend_from_slice(&header.to_le_bytes());
    buf.extend_from_slice(payload);
}

fn para_header(text_len: u32, char_shapes: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&text_len.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(&char_shapes.to_le_bytes());
    out.extend_from_slice(&[0; 10]);
    out
}

fn text_units(index: usize) -> Vec<u16> {
    let mut units: Vec<u16> = format!(
        "This is paragraph {index} with some test content. 한글 테스트 내용도 포함합니다."
    )
    .encode_utf16()
    .collect();
    // A tab control splits the text into two runs.
    units.splice(4..4, [9, 0, 0, 0, 0, 0, 0, 9]);
    units.push(13);
    units
}

/// Builds one section stream with `count` paragraphs of two char shapes each.
fn create_section(count: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    for index in 0..count {
        let units = text_units(index);
        let text: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
        let mut shapes = Vec::new();
        for (start, id) in [(0u32, 0u32), (20, 1)] {
            shapes.extend_from_slice(&start.to_le_bytes());
            shapes.extend_from_slice(&id.to_le_bytes());
        }
        push_record(&mut buf, TagId::ParaHeader, 0, &para_header(units.len() as u32, 2));
        push_record(&mut buf, TagId::ParaText, 1, &text);
        push_record(&mut buf, TagId::ParaCharShape, 1, &shapes);
    }
    buf
}

fn create_streams(sections: usize, paragraphs: usize) -> DocumentStreams {
    let mut doc_info = Vec::new();
    push_record(&mut doc_info, TagId::DocumentProperties, 0, &[0; 26]);
    DocumentStreams {
        header: FileHeader::new(Version::new(5, 0, 3, 2)),
        doc_info: Bytes::from(doc_info),
        sections: (0..sections)
            .map(|_| Bytes::from(create_section(paragraphs)))
            .collect(),
        bin_data: Vec::new(),
    }
}

/// Benchmark section decoding at various sizes.
fn bench_section_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_decoding");
    let options = ParseOptions::default().sequential();

    for para_count in [10, 100, 1000] {
        let streams = create_streams(1, para_count);
        group.throughput(Throughput::Bytes(streams.sections[0].len() as u64));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &streams,
            |b, streams| {
                b.iter(|| hwpdec::decode_streams(black_box(streams.clone()), &options).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark sequential against parallel section decoding.
fn bench_parallel_sections(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_sections");
    let streams = create_streams(16, 200);

    for (name, options) in [
        ("sequential", ParseOptions::default().sequential()),
        ("parallel", ParseOptions::default()),
    ] {
        group.bench_with_input(BenchmarkId::new(name, 16), &streams, |b, streams| {
            b.iter(|| hwpdec::decode_streams(black_box(streams.clone()), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the paragraph text lexer alone.
fn bench_lexer(c: &mut Criterion) {
    let units: Vec<u16> = (0..200).flat_map(text_units).collect();
    c.bench_function("lex_200_paragraphs", |b| {
        b.iter(|| lexer::lex(black_box(&units)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_section_decoding,
    bench_parallel_sections,
    bench_lexer,
);
criterion_main!(benches);
