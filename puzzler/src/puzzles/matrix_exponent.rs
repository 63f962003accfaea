//! Hashes of successive powers of a pseudo-random matrix over `Z / (2^31 - 1)`.
//!
//! The product used here multiplies row `r` of the left operand with column `r` (not column
//! `c`) of the right operand, and the element products and sums wrap at 32 bits before the
//! reduction. Both quirks are part of the expected output.
use {
    crate::{
        Transcode,
        error::PersistResult,
        puzzle::Puzzle,
        record::{OutputPayload, Payload, check_working_set},
    },
    rand::{Rng, RngCore},
    tracing::{debug, trace},
};

const MODULUS: u32 = 2_147_483_647;
const MULTIPLIER: u64 = 15_807;

pub struct MatrixExponent;

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct MatrixExponentInput {
    pub seed: u32,
    pub n: u32,
    pub steps: u32,
}

impl Payload for MatrixExponentInput {
    fn validate(&self) -> PersistResult<()> {
        let cells = u64::from(self.n) * u64::from(self.n);
        // Operand, accumulator and product.
        check_working_set(MatrixExponent::NAME, "matrices", cells, 3 * size_of::<u32>())?;
        check_working_set(MatrixExponent::NAME, "hashes", self.steps.into(), size_of::<u32>())
    }
}

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct MatrixExponentOutput {
    pub hashes: Vec<u32>,
}

impl Payload for MatrixExponentOutput {}

impl OutputPayload for MatrixExponentOutput {
    fn equals(&self, other: &Self) -> bool {
        self.hashes == other.hashes
    }
}

#[inline]
fn step(x: u32) -> u32 {
    ((MULTIPLIER * u64::from(x)) % u64::from(MODULUS)) as u32
}

#[inline]
fn mul(a: u32, b: u32) -> u32 {
    a.wrapping_mul(b) % MODULUS
}

#[inline]
fn add(a: u32, b: u32) -> u32 {
    a.wrapping_add(b) % MODULUS
}

/// Row-major `n x n` matrix filled from the [`step`] sequence starting at `seed`.
fn matrix_create(n: usize, mut seed: u32) -> Vec<u32> {
    (0..n * n)
        .map(|_| {
            let value = seed;
            seed = step(seed);
            value
        })
        .collect()
}

fn matrix_identity(n: usize) -> Vec<u32> {
    let mut res = vec![0; n * n];
    for i in 0..n {
        res[i * n + i] = 1;
    }
    res
}

fn matrix_mul(n: usize, a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut res = vec![0; n * n];
    for r in 0..n {
        for c in 0..n {
            for i in 0..n {
                res[r * n + c] = add(res[r * n + c], mul(a[r * n + i], b[i * n + r]));
            }
        }
    }
    res
}

impl Puzzle for MatrixExponent {
    const NAME: &'static str = "matrix_exponent";

    type Input = MatrixExponentInput;
    type Output = MatrixExponentOutput;

    fn create_input(scale: u32, rng: &mut dyn RngCore) -> MatrixExponentInput {
        MatrixExponentInput {
            seed: rng.r#gen(),
            n: scale,
            steps: scale,
        }
    }

    fn reference_execute(input: &MatrixExponentInput) -> MatrixExponentOutput {
        let n = input.n as usize;
        let mut hashes = vec![0; input.steps as usize];
        if hashes.is_empty() {
            return MatrixExponentOutput { hashes };
        }

        debug!(n, "setting up A and identity");
        let a = matrix_create(n, input.seed);
        let mut acc = matrix_identity(n);

        debug!(steps = input.steps, "beginning multiplication");
        hashes[0] = acc.first().copied().unwrap_or(0);
        for (i, hash) in hashes.iter_mut().enumerate().skip(1) {
            trace!(i, "iteration");
            acc = matrix_mul(n, &acc, &a);
            *hash = acc.first().copied().unwrap_or(0);
        }
        debug!("done");

        MatrixExponentOutput { hashes }
    }

    /// Only row 0 of the accumulator feeds the hash, and it only reads column 0 of `A`, so the
    /// power is tracked as a single row.
    fn execute(input: &MatrixExponentInput) -> MatrixExponentOutput {
        let n = input.n as usize;
        let steps = input.steps as usize;
        if steps == 0 {
            return MatrixExponentOutput { hashes: Vec::new() };
        }

        let mut seed = input.seed;
        let mut column = Vec::with_capacity(n);
        for k in 0..n * n {
            if k % n == 0 {
                column.push(seed);
            }
            seed = step(seed);
        }

        let mut row: Vec<u32> = (0..n).map(|i| u32::from(i == 0)).collect();
        let mut hashes = Vec::with_capacity(steps);
        hashes.push(row.first().copied().unwrap_or(0));
        for _ in 1..steps {
            let value = row
                .iter()
                .zip(&column)
                .fold(0, |sum, (&x, &y)| add(sum, mul(x, y)));
            row.fill(value);
            hashes.push(row.first().copied().unwrap_or(0));
        }
        MatrixExponentOutput { hashes }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{PersistError, proptest_config::proptest_cfg},
        proptest::prelude::*,
    };

    #[test]
    fn step_matches_park_miller() {
        assert_eq!(step(1), 15_807);
        assert_eq!(step(MODULUS), 0);
    }

    #[test]
    fn arithmetic_wraps_before_reducing() {
        assert_eq!(mul(0x1_0000, 0x1_0000), 0);
        assert_eq!(add(u32::MAX, 1), 0);
    }

    #[test]
    fn first_hash_is_identity_corner() {
        let input = MatrixExponentInput { seed: 5, n: 3, steps: 1 };
        assert_eq!(MatrixExponent::reference_execute(&input).hashes, [1]);
    }

    #[test]
    fn zero_steps_is_empty() {
        let input = MatrixExponentInput { seed: 5, n: 3, steps: 0 };
        assert!(MatrixExponent::reference_execute(&input).hashes.is_empty());
        assert!(MatrixExponent::execute(&input).hashes.is_empty());
    }

    #[test]
    fn zero_size_matrix_hashes_to_zero() {
        let input = MatrixExponentInput { seed: 5, n: 0, steps: 3 };
        assert_eq!(MatrixExponent::reference_execute(&input).hashes, [0, 0, 0]);
        assert_eq!(MatrixExponent::execute(&input).hashes, [0, 0, 0]);
    }

    #[test]
    fn oversized_inputs_are_rejected() {
        let input = |n, steps| MatrixExponentInput { seed: 1, n, steps };
        assert!(input(1024, 1024).validate().is_ok());
        for (n, steps) in [(u32::MAX, 1), (1 << 14, 1), (1, u32::MAX), (1, 1 << 27)] {
            assert!(matches!(input(n, steps).validate(), Err(PersistError::Validation(_))));
        }
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn candidate_matches_reference(seed in any::<u32>(), n in 0u32..=8, steps in 0u32..=8) {
            let input = MatrixExponentInput { seed, n, steps };
            prop_assert_eq!(
                MatrixExponent::reference_execute(&input),
                MatrixExponent::execute(&input)
            );
        }
    }
}
