use {
    puzzler::{PersistContext, Registry, io::MemoryStream, record::ExecMode},
    rand::{SeedableRng, rngs::StdRng},
    std::{fs, path::Path},
};

fn write_seed(corpus_dir: &Path, name: &str, data: &[u8]) {
    let path = corpus_dir.join(name);
    fs::write(&path, data).unwrap_or_else(|e| panic!("failed to write seed {name}: {e}"));
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let corpus_dir = Path::new(&manifest_dir).join("corpus").join("load_record");
    fs::create_dir_all(&corpus_dir).expect("failed to create corpus directory");

    let registry = Registry::with_builtin_puzzles().expect("failed to register puzzles");
    let mut rng = StdRng::seed_from_u64(0);
    for name in registry.names() {
        for scale in [0, 1, 5] {
            let mut input = registry
                .create_input(name, scale, &mut rng)
                .expect("registered puzzle");
            let mut stream = MemoryStream::new();
            input
                .persist(&mut PersistContext::sending(&mut stream))
                .unwrap_or_else(|e| panic!("failed to encode {name} input: {e}"));
            write_seed(&corpus_dir, &format!("seed-{name}-input-{scale}"), stream.as_slice());

            let mut output = input.execute(ExecMode::Reference);
            let mut stream = MemoryStream::new();
            output
                .persist(&mut PersistContext::sending(&mut stream))
                .unwrap_or_else(|e| panic!("failed to encode {name} output: {e}"));
            write_seed(&corpus_dir, &format!("seed-{name}-output-{scale}"), stream.as_slice());
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
