#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    puzzler::{PersistContext, Registry, config::ContextConfig, io::MemoryStream},
    std::sync::LazyLock,
};

const MAX_INPUT: usize = 16 * 1024;
const MAX_PREALLOCATION: usize = 1 << 20;

static REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| Registry::with_builtin_puzzles().expect("builtin puzzles register"));

fn receiving(stream: &mut MemoryStream) -> PersistContext<'_> {
    PersistContext::receiving(stream)
        .with_config(ContextConfig::new().with_preallocation_size_limit(MAX_PREALLOCATION))
}

// Decoding arbitrary bytes must fail cleanly or yield a record that re-encodes and decodes to
// itself. Padding bits in packed bool vectors are ignored, so the bytes themselves need not
// match.
fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT {
        return;
    }

    let mut stream = MemoryStream::from_bytes(data.to_vec());
    if let Ok(mut input) = REGISTRY.load_input(&mut receiving(&mut stream)) {
        let mut wire = MemoryStream::new();
        input
            .persist(&mut PersistContext::sending(&mut wire))
            .expect("decoded input re-encodes");
        let again = REGISTRY
            .load_input(&mut receiving(&mut wire))
            .expect("re-encoded input decodes");
        assert_eq!(format!("{again:?}"), format!("{input:?}"));
    }

    let mut stream = MemoryStream::from_bytes(data.to_vec());
    if let Ok(mut output) = REGISTRY.load_output(&mut receiving(&mut stream)) {
        let mut wire = MemoryStream::new();
        output
            .persist(&mut PersistContext::sending(&mut wire))
            .expect("decoded output re-encodes");
        let again = REGISTRY
            .load_output(&mut receiving(&mut wire))
            .expect("re-encoded output decodes");
        assert_eq!(format!("{again:?}"), format!("{output:?}"));
    }
});
