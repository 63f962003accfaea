use {
    criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main},
    puzzler::{
        Input, PersistContext, Registry,
        io::MemoryStream,
        persist::{from_bytes, to_bytes},
        puzzles::{Life, life::LifeInput},
    },
    rand::{SeedableRng, rngs::StdRng},
    std::hint::black_box,
};

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("Primitives");
    group.throughput(Throughput::Elements(1));

    let mut value = 0xDEADBEEFCAFEBABEu64;
    let bytes = to_bytes(&mut value).unwrap();

    group.bench_function("u64/encode", |b| {
        b.iter(|| to_bytes(black_box(&mut value)).unwrap());
    });

    group.bench_function("u64/decode", |b| {
        b.iter(|| from_bytes::<u64>(black_box(&bytes)).unwrap());
    });

    group.finish();
}

fn bench_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sequences");

    for size in [100, 1_000, 10_000] {
        let mut ints: Vec<u32> = (0..size).collect();
        let int_bytes = to_bytes(&mut ints).unwrap();
        group.throughput(Throughput::Bytes(int_bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("Vec<u32>/encode", size), &size, |b, _| {
            b.iter(|| to_bytes(black_box(&mut ints)).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("Vec<u32>/decode", size),
            &int_bytes,
            |b, s| b.iter(|| from_bytes::<Vec<u32>>(black_box(s)).unwrap()),
        );

        let mut bits: Vec<bool> = (0..size).map(|i| i % 3 == 0).collect();
        let bit_bytes = to_bytes(&mut bits).unwrap();
        group.bench_with_input(BenchmarkId::new("Vec<bool>/encode", size), &size, |b, _| {
            b.iter(|| to_bytes(black_box(&mut bits)).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("Vec<bool>/decode", size),
            &bit_bytes,
            |b, s| b.iter(|| from_bytes::<Vec<bool>>(black_box(s)).unwrap()),
        );
    }

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("Records");
    let registry = Registry::with_builtin_puzzles().unwrap();

    let mut rng = StdRng::seed_from_u64(1);
    let mut life = Input::<Life>::new(
        64,
        LifeInput {
            n: 64,
            steps: 8,
            state: (0..64 * 64).map(|_| rand::Rng::r#gen(&mut rng)).collect(),
        },
    );
    let bytes = to_bytes(&mut life).unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("life/typed_decode", |b| {
        b.iter(|| from_bytes::<Input<Life>>(black_box(&bytes)).unwrap());
    });

    group.bench_function("life/registry_load", |b| {
        b.iter(|| {
            let mut stream = MemoryStream::from_bytes(black_box(bytes.clone()));
            registry
                .load_input(&mut PersistContext::receiving(&mut stream))
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_primitives, bench_sequences, bench_records);

criterion_main!(benches);
