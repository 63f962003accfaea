//! Median of a batch of xorshift outputs.
use {
    crate::{
        Transcode,
        error::PersistResult,
        puzzle::Puzzle,
        record::{OutputPayload, Payload, check_working_set},
    },
    rand::{Rng, RngCore},
    tracing::{debug, info},
};

pub struct MedianBits;

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct MedianBitsInput {
    pub n: u32,
    pub seed: u32,
}

impl Payload for MedianBitsInput {
    fn validate(&self) -> PersistResult<()> {
        check_working_set(MedianBits::NAME, "samples", self.n.into(), size_of::<u32>())
    }
}

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct MedianBitsOutput {
    pub median: u32,
}

impl Payload for MedianBitsOutput {}

impl OutputPayload for MedianBitsOutput {
    fn equals(&self, other: &Self) -> bool {
        self.median == other.median
    }
}

/// Number of xorshift rounds applied to each of the `n` values.
fn rounds(n: u32) -> u32 {
    (f64::from(16u32.wrapping_add(n)).ln() / 1.1f64.ln()) as u32
}

fn generate(i: u32, seed: u32, rounds: u32) -> u32 {
    let mut x = i.wrapping_mul(seed.wrapping_add(7));
    let (mut y, mut z, mut w) = (0u32, 0u32, 0u32);
    for _ in 0..rounds {
        let t = x ^ (x << 11);
        x = y;
        y = z;
        z = w;
        w = w ^ (w >> 19) ^ t ^ (t >> 8);
    }
    w
}

impl Puzzle for MedianBits {
    const NAME: &'static str = "median_bits";

    type Input = MedianBitsInput;
    type Output = MedianBitsOutput;

    fn create_input(scale: u32, rng: &mut dyn RngCore) -> MedianBitsInput {
        MedianBitsInput {
            n: scale,
            seed: rng.r#gen(),
        }
    }

    fn reference_execute(input: &MedianBitsInput) -> MedianBitsOutput {
        info!(n = input.n, "generating bits");
        let mut temp: Vec<u32> = (0..input.n)
            .map(|i| generate(i, input.seed, rounds(input.n)))
            .collect();

        info!("finding median");
        temp.sort_unstable();
        let median = temp.get(temp.len() / 2).copied().unwrap_or(0);

        info!(median, fraction = f64::from(median) / 2f64.powi(32), "done");
        MedianBitsOutput { median }
    }

    fn execute(input: &MedianBitsInput) -> MedianBitsOutput {
        let rounds = rounds(input.n);
        debug!(n = input.n, rounds, "generating bits");
        let mut temp: Vec<u32> = (0..input.n)
            .map(|i| generate(i, input.seed, rounds))
            .collect();

        let mid = temp.len() / 2;
        let median = if temp.is_empty() {
            0
        } else {
            *temp.select_nth_unstable(mid).1
        };
        MedianBitsOutput { median }
    }
}
