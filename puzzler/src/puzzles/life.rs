//! Conway's game of life on an `n x n` torus.
use {
    crate::{
        Transcode,
        error::{PersistResult, validation},
        log::lazy,
        puzzle::Puzzle,
        record::{OutputPayload, Payload},
    },
    core::fmt,
    rand::{Rng, RngCore},
    tracing::{Level, debug, enabled, trace},
};

pub struct Life;

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct LifeInput {
    pub n: u32,
    pub steps: u32,
    /// Row-major, `n * n` cells.
    pub state: Vec<bool>,
}

impl Payload for LifeInput {
    fn validate(&self) -> PersistResult<()> {
        let cells = (self.n as usize).checked_mul(self.n as usize);
        if cells != Some(self.state.len()) {
            return Err(validation(format!(
                "life: state has {} cells, expected {}x{}",
                self.state.len(),
                self.n,
                self.n
            )));
        }
        Ok(())
    }
}

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct LifeOutput {
    pub state: Vec<bool>,
}

impl Payload for LifeOutput {}

impl OutputPayload for LifeOutput {
    fn equals(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

fn render(f: &mut fmt::Formatter<'_>, n: usize, state: &[bool]) -> fmt::Result {
    writeln!(f)?;
    for row in state.chunks(n.max(1)) {
        for &cell in row {
            f.write_str(if cell { "x" } else { " " })?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn dump(n: usize, state: &[bool]) {
    if enabled!(Level::TRACE) {
        trace!(grid = %lazy(|f| render(f, n, state)), "state");
    }
}

/// B3/S23 rule for the cell at `(x, y)`, wrapping at the edges.
fn update(n: usize, curr: &[bool], x: usize, y: usize) -> bool {
    let mut neighbours = 0;
    for dx in -1isize..=1 {
        for dy in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let ox = (n + x).wrapping_add_signed(dx) % n;
            let oy = (n + y).wrapping_add_signed(dy) % n;
            if curr[oy * n + ox] {
                neighbours += 1;
            }
        }
    }

    match (curr[y * n + x], neighbours) {
        (true, 2 | 3) => true,
        (false, 3) => true,
        _ => false,
    }
}

impl Puzzle for Life {
    const NAME: &'static str = "life";

    type Input = LifeInput;
    type Output = LifeOutput;

    fn create_input(scale: u32, rng: &mut dyn RngCore) -> LifeInput {
        let cells = scale as usize * scale as usize;
        LifeInput {
            n: scale,
            steps: scale,
            state: (0..cells).map(|_| rng.r#gen()).collect(),
        }
    }

    fn reference_execute(input: &LifeInput) -> LifeOutput {
        debug!(steps = input.steps, "about to start running iterations");
        let n = input.n as usize;
        let mut state = input.state.clone();
        dump(n, &state);

        for i in 0..input.steps {
            debug!(i, steps = input.steps, "starting iteration");
            let mut next = vec![false; n * n];
            for x in 0..n {
                for y in 0..n {
                    next[y * n + x] = update(n, &state, x, y);
                }
            }
            state = next;
            dump(n, &state);
        }

        debug!("finished steps");
        LifeOutput { state }
    }

    /// Row-wise sweep with neighbour rows resolved once per row and a reused buffer.
    fn execute(input: &LifeInput) -> LifeOutput {
        let n = input.n as usize;
        let mut state = input.state.clone();
        if n == 0 {
            return LifeOutput { state };
        }
        let mut next = vec![false; n * n];

        for _ in 0..input.steps {
            for y in 0..n {
                let up = &state[((y + n - 1) % n) * n..][..n];
                let mid = &state[y * n..][..n];
                let down = &state[((y + 1) % n) * n..][..n];
                for x in 0..n {
                    let left = (x + n - 1) % n;
                    let right = (x + 1) % n;
                    let count = [
                        up[left], up[x], up[right], mid[left], mid[right], down[left], down[x],
                        down[right],
                    ]
                    .into_iter()
                    .filter(|&alive| alive)
                    .count();
                    next[y * n + x] = matches!((mid[x], count), (true, 2 | 3) | (false, 3));
                }
            }
            core::mem::swap(&mut state, &mut next);
        }
        LifeOutput { state }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            PersistError,
            persist::{from_bytes, to_bytes},
            proptest_config::proptest_cfg,
        },
        proptest::prelude::*,
    };

    fn grid(rows: &[&str]) -> Vec<bool> {
        rows.iter().flat_map(|row| row.chars().map(|c| c == 'x')).collect()
    }

    #[test]
    fn blinker_oscillates() {
        let input = LifeInput {
            n: 5,
            steps: 1,
            state: grid(&["     ", "  x  ", "  x  ", "  x  ", "     "]),
        };
        let expected = grid(&["     ", "     ", " xxx ", "     ", "     "]);
        assert_eq!(Life::reference_execute(&input).state, expected);
        assert_eq!(Life::execute(&input).state, expected);
    }

    #[test]
    fn glider_wraps_around_the_torus() {
        let input = LifeInput {
            n: 8,
            steps: 32,
            state: grid(&[
                " x      ", "  x     ", "xxx     ", "        ", "        ", "        ", "        ",
                "        ",
            ]),
        };
        // A glider moves one cell diagonally every 4 generations.
        assert_eq!(Life::reference_execute(&input).state, input.state);
    }

    #[test]
    fn inconsistent_state_is_rejected() {
        let mut input = LifeInput {
            n: 3,
            steps: 1,
            state: vec![true; 8],
        };
        let bytes = to_bytes(&mut input).unwrap();
        // Payload decode alone does not validate.
        assert!(from_bytes::<LifeInput>(&bytes).is_ok());
        assert!(matches!(input.validate(), Err(PersistError::Validation(_))));
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn candidate_matches_reference(
            (n, state) in (0usize..=8)
                .prop_flat_map(|n| (Just(n), proptest::collection::vec(any::<bool>(), n * n))),
            steps in 0u32..=6,
        ) {
            let input = LifeInput { n: n as u32, steps, state };
            prop_assert!(Life::reference_execute(&input).equals(&Life::execute(&input)));
        }
    }
}
