//! American call option priced on an explicit trinomial lattice.
use {
    crate::{
        Transcode,
        error::{PersistResult, validation},
        puzzle::Puzzle,
        record::{OutputPayload, Payload, check_working_set},
    },
    rand::{Rng, RngCore},
    tracing::{debug, info},
};

pub struct OptionExplicit;

#[derive(Transcode, Debug, Default, Clone, PartialEq)]
#[puzzler(internal)]
pub struct OptionExplicitInput {
    /// Number of time steps, and the half-width of the price lattice.
    pub n: u32,
    pub sigma: f64,
    pub r: f64,
    pub s0: f64,
    pub k: f64,
    /// Barrier level. Carried on the wire but not used by the pricer.
    pub bu: f64,
    pub wu: f64,
    pub wm: f64,
    pub wd: f64,
    pub u: f64,
    pub d: f64,
}

impl OptionExplicitInput {
    /// `n` as the output's step count. Validated inputs always fit.
    fn steps(&self) -> i32 {
        i32::try_from(self.n).unwrap_or(i32::MAX)
    }
}

impl Payload for OptionExplicitInput {
    /// `n` must fit the output's signed step count, and the two lattice buffers must fit the
    /// working-set limit.
    fn validate(&self) -> PersistResult<()> {
        if i32::try_from(self.n).is_err() {
            return Err(validation(format!(
                "option_explicit: n = {} does not fit a step count",
                self.n
            )));
        }
        check_working_set(
            OptionExplicit::NAME,
            "lattice",
            2 * u64::from(self.n) + 1,
            2 * size_of::<f64>(),
        )
    }
}

#[derive(Transcode, Debug, Default, Clone, PartialEq)]
#[puzzler(internal)]
pub struct OptionExplicitOutput {
    pub steps: i32,
    pub value: f64,
}

impl Payload for OptionExplicitOutput {}

impl OutputPayload for OptionExplicitOutput {
    /// Relative error below `sqrt(steps) * 1e-8`, measured against `self`.
    fn equals(&self, other: &Self) -> bool {
        if self.value == other.value {
            return true;
        }
        ((self.value - other.value) / self.value).abs() < f64::from(self.steps).sqrt() * 1e-8
    }
}

/// Payoff at expiry over the `2n + 1` lattice nodes, centred on `s0`.
fn terminal_state(input: &OptionExplicitInput) -> Vec<f64> {
    let n = input.n as usize;
    let mut state = vec![0.0; 2 * n + 1];
    let (mut vu, mut vd) = (input.s0, input.s0);
    state[n] = (vu - input.k).max(0.0);
    for i in 1..=n {
        vu *= input.u;
        vd *= input.d;
        state[n + i] = (vu - input.k).max(0.0);
        state[n - i] = (vd - input.k).max(0.0);
    }
    state
}

impl Puzzle for OptionExplicit {
    const NAME: &'static str = "option_explicit";

    type Input = OptionExplicitInput;
    type Output = OptionExplicitOutput;

    fn create_input(scale: u32, rng: &mut dyn RngCore) -> OptionExplicitInput {
        let n = scale.max(1);
        let dt = 1.0 / f64::from(n);

        let s0 = rng.r#gen::<f64>() + 0.5;
        let k = s0 * (rng.r#gen::<f64>() * 0.25 + 0.825);
        let sigma = rng.r#gen::<f64>() * 0.9 + 0.1;
        let r = rng.r#gen::<f64>() * 0.1;

        let u = (sigma * (2.0 * dt).sqrt()).exp();
        let d = 1.0 / u;

        let t1 = (r * dt / 2.0).exp();
        let t2 = (sigma * (dt / 2.0).sqrt()).exp();
        let pu = ((t1 - 1.0 / t2) / (t2 - 1.0 / t2)).powi(2);
        let pd = ((t2 - t1) / (t2 - 1.0 / t2)).powi(2);
        let pm = 1.0 - pu - pd;

        let discount = (-r * dt).exp();

        OptionExplicitInput {
            n,
            sigma,
            r,
            s0,
            k,
            bu: 0.0,
            wu: pu * discount,
            wm: pm * discount,
            wd: pd * discount,
            u,
            d,
        }
    }

    fn reference_execute(input: &OptionExplicitInput) -> OptionExplicitOutput {
        let n = input.n as usize;
        info!(
            u = input.u,
            d = input.d,
            wu = input.wu,
            wm = input.wm,
            wd = input.wd,
            "params"
        );

        let mut state = terminal_state(input);
        for _ in (0..n).rev() {
            let mut tmp = state.clone();
            let (mut vu, mut vd) = (input.s0, input.s0);
            for i in 0..n {
                let vcu = input.wu * state[n + i + 1]
                    + input.wm * state[n + i]
                    + input.wd * state[n + i - 1];
                let vcd = input.wu * state[n - i + 1]
                    + input.wm * state[n - i]
                    + input.wd * state[n - i - 1];
                tmp[n + i] = vcu.max(vu - input.k);
                tmp[n - i] = vcd.max(vd - input.k);
                vu *= input.u;
                vd *= input.d;
            }
            state = tmp;
        }

        let value = state[n];
        debug!(
            n,
            s0 = input.s0,
            k = input.k,
            r = input.r,
            sigma = input.sigma,
            value,
            "priced"
        );
        OptionExplicitOutput {
            steps: input.steps(),
            value,
        }
    }

    /// Same lattice sweep over two buffers that swap roles each step. The outermost nodes
    /// never change, so they are shared by both buffers from the start.
    fn execute(input: &OptionExplicitInput) -> OptionExplicitOutput {
        let n = input.n as usize;
        let (wu, wm, wd) = (input.wu, input.wm, input.wd);
        let mut state = terminal_state(input);
        let mut next = state.clone();

        for _ in 0..n {
            let (mut vu, mut vd) = (input.s0, input.s0);
            for i in 0..n {
                let up = n + i;
                let down = n - i;
                next[up] =
                    (wu * state[up + 1] + wm * state[up] + wd * state[up - 1]).max(vu - input.k);
                next[down] = (wu * state[down + 1] + wm * state[down] + wd * state[down - 1])
                    .max(vd - input.k);
                vu *= input.u;
                vd *= input.d;
            }
            core::mem::swap(&mut state, &mut next);
        }

        OptionExplicitOutput {
            steps: input.steps(),
            value: state[n],
        }
    }
}
