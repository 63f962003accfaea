//! Count pattern occurrences in a pseudo-random DNA string.
//!
//! Pattern syntax: `.` matches any single base. Any other character matches a run of one or
//! more copies of itself, and the run must be followed by a different character.
use {
    crate::{
        Transcode,
        error::PersistResult,
        log::lazy,
        puzzle::Puzzle,
        record::{OutputPayload, Payload, check_working_set},
    },
    rand::{Rng, RngCore},
    tracing::{Level, debug, enabled, trace},
};

const BASES: [u8; 4] = *b"ACTG";
const PATTERN_CHARS: [u8; 5] = *b"ACTG.";

pub struct StringSearch;

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct StringSearchInput {
    pub seed: u32,
    pub patterns: Vec<String>,
    pub string_length: u32,
}

impl Payload for StringSearchInput {
    fn validate(&self) -> PersistResult<()> {
        // The string itself plus a run length per base.
        check_working_set(
            StringSearch::NAME,
            "string",
            self.string_length.into(),
            1 + size_of::<usize>(),
        )
    }
}

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct StringSearchOutput {
    /// One count per pattern, in pattern order.
    pub occurrences: Vec<u32>,
}

impl Payload for StringSearchOutput {}

impl OutputPayload for StringSearchOutput {
    fn equals(&self, other: &Self) -> bool {
        self.occurrences == other.occurrences
    }
}

#[inline]
fn step(x: u32) -> u32 {
    x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

fn make_string(length: u32, seed: u32) -> Vec<u8> {
    let mut s = seed;
    (0..length)
        .map(|_| {
            let base = BASES[(s.wrapping_add(s << 16) >> 30) as usize];
            s = step(s);
            base
        })
        .collect()
}

fn make_pattern(length: usize, rng: &mut dyn RngCore) -> String {
    let mut acc = String::with_capacity(length);
    let mut prev = None;
    for _ in 0..length {
        let c = loop {
            let c = PATTERN_CHARS[rng.gen_range(0..PATTERN_CHARS.len())];
            if prev != Some(c) {
                break c;
            }
        };
        acc.push(char::from(c));
        prev = Some(c);
    }
    acc
}

/// Length of the match of `pattern` starting at `offset`, or 0 if there is none.
fn matches(data: &[u8], offset: usize, pattern: &[u8]) -> usize {
    let mut pos = offset;
    let mut p = 0;
    let mut seen = 0;
    while p < pattern.len() {
        if pos >= data.len() {
            return 0;
        }
        if pattern[p] == b'.' {
            pos += 1;
            p += 1;
            seen = 0;
        } else if data[pos] == pattern[p] {
            seen += 1;
            pos += 1;
        } else if seen > 0 {
            p += 1;
            seen = 0;
        } else {
            return 0;
        }
    }
    pos - offset
}

/// [`matches`] with each literal run consumed in one jump. `runs[i]` is the number of equal
/// bytes starting at `data[i]`.
fn matches_runs(data: &[u8], runs: &[usize], offset: usize, pattern: &[u8]) -> usize {
    let mut pos = offset;
    for &c in pattern {
        if pos >= data.len() {
            return 0;
        }
        if c == b'.' {
            pos += 1;
            continue;
        }
        if data[pos] != c {
            return 0;
        }
        pos += runs[pos];
        if pos >= data.len() {
            return 0;
        }
    }
    pos - offset
}

fn run_lengths(data: &[u8]) -> Vec<usize> {
    let mut runs = vec![1; data.len()];
    for i in (0..data.len().saturating_sub(1)).rev() {
        if data[i] == data[i + 1] {
            runs[i] = runs[i + 1] + 1;
        }
    }
    runs
}

/// Scan left to right; at each offset the first matching pattern wins and the scan resumes
/// after the matched text.
fn search(
    data: &[u8],
    patterns: &[String],
    mut match_at: impl FnMut(usize, &[u8]) -> usize,
) -> Vec<u32> {
    let mut histogram = vec![0u32; patterns.len()];
    let mut i = 0;
    while i < data.len() {
        for (p, pattern) in patterns.iter().enumerate() {
            let len = match_at(i, pattern.as_bytes());
            if len > 0 {
                if enabled!(Level::TRACE) {
                    let found = String::from_utf8_lossy(&data[i..i + len]);
                    trace!(pattern = %pattern, offset = i, found = %found, "match");
                }
                histogram[p] += 1;
                i += len - 1;
                break;
            }
        }
        i += 1;
    }
    histogram
}

fn dump(patterns: &[String], histogram: &[u32]) {
    if enabled!(Level::DEBUG) {
        let table = lazy(|f| {
            patterns
                .iter()
                .zip(histogram)
                .try_for_each(|(pattern, count)| write!(f, "\n{pattern} : {count}"))
        });
        debug!(histogram = %table, "occurrences");
    }
}

impl Puzzle for StringSearch {
    const NAME: &'static str = "string_search";

    type Input = StringSearchInput;
    type Output = StringSearchOutput;

    fn create_input(scale: u32, rng: &mut dyn RngCore) -> StringSearchInput {
        let scale = scale.max(1);
        let count = f64::from(scale.saturating_add(2)).sqrt() as usize;
        let length = 1 + f64::from(scale).log10().floor() as usize;
        let patterns = (0..count).map(|_| make_pattern(length, rng)).collect();
        StringSearchInput {
            seed: rng.r#gen(),
            patterns,
            string_length: scale,
        }
    }

    fn reference_execute(input: &StringSearchInput) -> StringSearchOutput {
        let data = make_string(input.string_length, input.seed);
        let occurrences = search(&data, &input.patterns, |offset, pattern| {
            matches(&data, offset, pattern)
        });
        dump(&input.patterns, &occurrences);
        StringSearchOutput { occurrences }
    }

    fn execute(input: &StringSearchInput) -> StringSearchOutput {
        let data = make_string(input.string_length, input.seed);
        let runs = run_lengths(&data);
        let occurrences = search(&data, &input.patterns, |offset, pattern| {
            matches_runs(&data, &runs, offset, pattern)
        });
        StringSearchOutput { occurrences }
    }
}
