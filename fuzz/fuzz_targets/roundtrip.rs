#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    puzzler::{PersistContext, Registry, io::MemoryStream, record::ExecMode},
    rand::{SeedableRng, rngs::StdRng},
    std::sync::LazyLock,
};

const MAX_SCALE: u8 = 64;

static REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| Registry::with_builtin_puzzles().expect("builtin puzzles register"));

// Generated records survive the wire and both solvers agree on them.
fuzz_target!(|data: &[u8]| {
    let [pick, scale, seed @ ..] = data else {
        return;
    };
    let names: Vec<&str> = REGISTRY.names().collect();
    let name = names[usize::from(*pick) % names.len()];
    let mut seed_bytes = [0u8; 8];
    seed_bytes
        .iter_mut()
        .zip(seed)
        .for_each(|(dst, src)| *dst = *src);
    let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed_bytes));

    let mut input = REGISTRY
        .create_input(name, u32::from(*scale % MAX_SCALE), &mut rng)
        .expect("registered puzzle");
    let mut wire = MemoryStream::new();
    input
        .persist(&mut PersistContext::sending(&mut wire))
        .expect("encode input");
    let decoded = REGISTRY
        .load_input(&mut PersistContext::receiving(&mut wire))
        .expect("decode input");
    assert!(wire.remaining().is_empty());
    assert_eq!(format!("{decoded:?}"), format!("{input:?}"));

    let mut reference = decoded.execute(ExecMode::Reference);
    let candidate = decoded.execute(ExecMode::Candidate);
    assert!(
        reference.equals(candidate.as_ref()),
        "{name}: {reference:?} != {candidate:?}"
    );

    reference
        .persist(&mut PersistContext::sending(&mut wire))
        .expect("encode output");
    let back = REGISTRY
        .load_output(&mut PersistContext::receiving(&mut wire))
        .expect("decode output");
    assert!(reference.equals(back.as_ref()));
});
