use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uodecode_core::{ClientVersion, ProtocolEra};
use uodecode_protocol::decode;

fn update_object_body(items: u32) -> Vec<u8> {
    let mut body = vec![
        0x00, 0x00, 0x00, 0x01, 0x01, 0x90, 0x05, 0xA0, 0x06, 0x40, 0x0A, 0x02, 0x83, 0xEA, 0x00,
        0x01,
    ];
    for serial in 1..=items {
        body.extend_from_slice(&(0x4000_0000 | serial).to_be_bytes());
        body.extend_from_slice(&[0x0E, 0x75, (serial % 24) as u8, 0x00, 0x21]);
    }
    body.extend_from_slice(&[0, 0, 0, 0]);
    body
}

fn bench_decode(c: &mut Criterion) {
    let era = ProtocolEra::new(ClientVersion::CV_70331);

    let damage = [0x00, 0x00, 0x00, 0x07, 0x00, 0x05];
    c.bench_function("decode_damage", |b| {
        b.iter(|| decode(black_box(0x0B), black_box(&damage), &era))
    });

    let object = update_object_body(24);
    c.bench_function("decode_update_object_24_items", |b| {
        b.iter(|| decode(black_box(0x78), black_box(&object), &era))
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
