use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use specscan_core::{decode, power_spectrum, ATH10K_FIXED_SIZE, HT20_FIXED_SIZE};

fn tlv(
    kind: u8,
    payload: &[u8],
    buf: &mut Vec<u8>,
) {
    buf.push(kind);
    buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    buf.extend_from_slice(payload);
}

/// Поток из чередующихся HT20 и ath10k (128 бинов) записей.
fn stream(
    records: usize,
    rng: &mut StdRng,
) -> Vec<u8> {
    let mut buf = Vec::new();

    for i in 0..records {
        if i % 2 == 0 {
            let mut p = vec![0u8; HT20_FIXED_SIZE];
            p[0] = rng.gen_range(0..4);
            p[1..3].copy_from_slice(&2412u16.to_be_bytes());
            p.extend((0..56).map(|_| rng.gen::<u8>()));
            tlv(1, &p, &mut buf);
        } else {
            let mut p = vec![0u8; ATH10K_FIXED_SIZE];
            p[0] = 40;
            p[1..3].copy_from_slice(&5190u16.to_be_bytes());
            p.extend((0..128).map(|_| rng.gen::<u8>()));
            tlv(3, &p, &mut buf);
        }
    }

    buf
}

fn bench_decode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("decode");

    for records in [100usize, 10_000] {
        let buf = stream(records, &mut rng);
        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), &buf, |b, buf| {
            b.iter(|| decode(black_box(buf)))
        });
    }

    group.finish();
}

fn bench_spectrum(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let outcome = decode(&stream(1_000, &mut rng));

    c.bench_function("power_spectrum/1000", |b| {
        b.iter(|| {
            for record in &outcome.records {
                let _ = black_box(power_spectrum(record));
            }
        })
    });
}

criterion_group!(benches, bench_decode, bench_spectrum);
criterion_main!(benches);
