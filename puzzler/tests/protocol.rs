use {
    crate::proptest_config::proptest_cfg,
    proptest::prelude::*,
    puzzler::{
        Error, Input, Output, PersistContext, PersistError, Registry, RegistryError, Transcode,
        config::{INPUT_FORMAT, OUTPUT_FORMAT},
        io::{FileInStream, MemoryStream, ReadStream, Stream, StreamError, WriteStream},
        persist::{from_bytes, to_bytes},
        puzzles::{
            CircuitSim, Life, MedianBits, StringSearch,
            circuit_sim::CircuitSimInput,
            life::{LifeInput, LifeOutput},
            string_search::StringSearchInput,
        },
        record::ExecMode,
    },
    rand::{SeedableRng, rngs::StdRng},
    std::io::Write,
};

#[path = "../src/proptest_config.rs"]
mod proptest_config;

#[derive(Transcode, Debug, Default, Clone, PartialEq, proptest_derive::Arbitrary)]
struct Sample {
    id: u32,
    wide: u64,
    delta: i32,
    #[proptest(strategy = "any::<f64>().prop_filter(\"nan\", |x| !x.is_nan())")]
    ratio: f64,
    #[proptest(strategy = "\"[a-z]{0,12}\"")]
    label: String,
    #[proptest(strategy = "proptest::collection::vec(any::<bool>(), 0..=40)")]
    flags: Vec<bool>,
    #[proptest(strategy = "proptest::collection::vec(any::<(i32, i32)>(), 0..=8)")]
    edges: Vec<(i32, i32)>,
}

#[test]
fn big_endian_invariant() {
    assert_eq!(to_bytes(&mut 0x01020304u32).unwrap(), [0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn wide_value_is_two_words() {
    let mut halves = to_bytes(&mut 0x01020304u32).unwrap();
    halves.extend(to_bytes(&mut 0x05060708u32).unwrap());
    assert_eq!(to_bytes(&mut 0x0102030405060708u64).unwrap(), halves);
}

#[test]
fn bit_vector_packing() {
    let mut bits = vec![true, false, true, true, false, false, false, false, true];
    assert_eq!(
        to_bytes(&mut bits).unwrap(),
        [0, 0, 0, 9, 0b0000_1101, 0b0000_0001]
    );
}

#[test]
fn required_string_checks_both_directions() {
    let mut stream = MemoryStream::new();
    let mut value = String::from("B");
    let err = PersistContext::sending(&mut stream)
        .transcode_required(&mut value, "A")
        .unwrap_err();
    assert!(matches!(err, PersistError::ProtocolMismatch { .. }));
    assert_eq!(stream.send_offset(), 0);

    let mut bytes = to_bytes(&mut String::from("C")).unwrap();
    bytes.extend([0xAA, 0xBB]);
    let mut stream = MemoryStream::from_bytes(bytes);
    let mut value = String::new();
    let err = PersistContext::receiving(&mut stream)
        .transcode_required(&mut value, "A")
        .unwrap_err();
    assert!(matches!(
        err,
        PersistError::ProtocolMismatch { ref expected, ref actual } if expected == "A" && actual == "C"
    ));
    assert_eq!(stream.remaining(), [0xAA, 0xBB]);
}

#[test]
fn registry_rejects_second_registration_and_reports_absence() {
    let mut builder = Registry::builder();
    builder.register::<Life>().unwrap();
    assert!(matches!(
        builder.register::<Life>(),
        Err(RegistryError::DuplicateRegistration(_))
    ));
    let registry = builder.build();
    assert!(registry.lookup("life").is_some());
    assert!(registry.lookup("no_such_puzzle").is_none());
}

#[test]
fn empty_count_clears_destination() {
    let mut stream = MemoryStream::from_bytes(vec![0; 4]);
    let mut strings = vec![String::from("stale"); 3];
    PersistContext::receiving(&mut stream)
        .transcode(&mut strings)
        .unwrap();
    assert!(strings.is_empty());
}

#[test]
fn polymorphic_load_through_a_file() {
    let registry = Registry::with_builtin_puzzles().unwrap();
    let mut input = Input::<StringSearch>::new(
        4,
        StringSearchInput {
            seed: 11,
            patterns: vec!["AC".into(), "G.T".into()],
            string_length: 64,
        },
    );

    let mut file = tempfile::NamedTempFile::new().unwrap();
    {
        let mut stream = WriteStream::new(file.as_file_mut());
        PersistContext::sending(&mut stream)
            .transcode(&mut input)
            .unwrap()
            .finish()
            .unwrap();
    }
    file.flush().unwrap();

    let mut stream = FileInStream::open(file.path()).unwrap();
    let loaded = registry
        .load_input(&mut PersistContext::receiving(&mut stream))
        .unwrap();
    assert_eq!(loaded.puzzle_name(), "string_search");
    assert_eq!(format!("{loaded:?}"), format!("{input:?}"));
}

#[test]
fn reference_and_candidate_agree_for_every_puzzle() {
    let registry = Registry::with_builtin_puzzles().unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    for name in registry.names() {
        for scale in [1, 8, 40] {
            let input = registry.create_input(name, scale, &mut rng).unwrap();
            let reference = input.execute(ExecMode::Reference);
            let candidate = input.execute(ExecMode::Candidate);
            assert!(
                reference.equals(candidate.as_ref()),
                "{name} at scale {scale}: {reference:?} != {candidate:?}"
            );
        }
    }
}

#[test]
fn truncated_record_fails_without_a_partial_value() {
    let mut input = Input::<MedianBits>::default();
    let bytes = to_bytes(&mut input).unwrap();
    for len in 0..bytes.len() {
        let err = from_bytes::<Input<MedianBits>>(&bytes[..len]).unwrap_err();
        assert!(
            matches!(
                err,
                PersistError::Stream(StreamError::EndOfStream { .. })
            ),
            "prefix of {len} bytes: {err}"
        );
    }
}

#[test]
fn inconsistent_counts_fail_validation() {
    let mut input = Input::<CircuitSim>::new(
        1,
        CircuitSimInput {
            nand_gate_count: 2,
            flip_flop_count: 0,
            nand_gate_inputs: vec![(0, 0)],
            flip_flop_inputs: Vec::new(),
            input_state: Vec::new(),
            clock_cycles: 1,
        },
    );
    let bytes = to_bytes(&mut input).unwrap();
    let registry = Registry::with_builtin_puzzles().unwrap();
    let mut stream = MemoryStream::from_bytes(bytes);
    let err = registry
        .load_input(&mut PersistContext::receiving(&mut stream))
        .unwrap_err();
    assert!(matches!(err, Error::Persist(PersistError::Validation(_))));
}

#[test]
fn life_output_layout() {
    let mut output = Output::<Life>::new(LifeOutput {
        state: vec![true, true, false],
    });
    let bytes = to_bytes(&mut output).unwrap();
    let mut expected = to_bytes(&mut String::from(OUTPUT_FORMAT)).unwrap();
    expected.extend(to_bytes(&mut String::from("life")).unwrap());
    expected.extend([0, 0, 0, 3, 0b011]);
    assert_eq!(bytes, expected);
}

#[test]
fn input_read_through_a_trickling_reader() {
    struct OneByte<'a>(&'a [u8]);

    impl std::io::Read for OneByte<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let Some((first, rest)) = self.0.split_first() else {
                return Ok(0);
            };
            match buf.first_mut() {
                Some(slot) => {
                    *slot = *first;
                    self.0 = rest;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    let mut input = Input::<Life>::new(
        2,
        LifeInput {
            n: 2,
            steps: 1,
            state: vec![true, false, false, true],
        },
    );
    let bytes = to_bytes(&mut input).unwrap();
    assert!(bytes.starts_with(&to_bytes(&mut String::from(INPUT_FORMAT)).unwrap()));

    let mut stream = ReadStream::new(OneByte(&bytes));
    let loaded = Input::<Life>::load(&mut PersistContext::receiving(&mut stream)).unwrap();
    assert_eq!(loaded, input);
    assert_eq!(stream.recv_offset(), bytes.len() as u64);
}

proptest! {
    #![proptest_config(proptest_cfg())]

    #[test]
    fn derived_struct_round_trips(mut sample in any::<Sample>()) {
        let bytes = to_bytes(&mut sample).unwrap();
        prop_assert_eq!(from_bytes::<Sample>(&bytes).unwrap(), sample);
    }

    #[test]
    fn generated_records_round_trip_through_the_registry(seed in any::<u64>(), scale in 0u32..=24) {
        let registry = Registry::with_builtin_puzzles().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for name in registry.names() {
            let mut input = registry.create_input(name, scale, &mut rng).unwrap();
            let mut stream = MemoryStream::new();
            input.persist(&mut PersistContext::sending(&mut stream)).unwrap();
            let loaded = registry
                .load_input(&mut PersistContext::receiving(&mut stream))
                .unwrap();
            prop_assert_eq!(format!("{loaded:?}"), format!("{input:?}"));
            prop_assert!(stream.remaining().is_empty());
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..=256)) {
        let registry = Registry::with_builtin_puzzles().unwrap();
        let mut stream = MemoryStream::from_bytes(bytes);
        let _ = registry.load_input(&mut PersistContext::receiving(&mut stream));
    }
}
