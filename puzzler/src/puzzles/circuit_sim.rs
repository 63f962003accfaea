//! Clocked simulation of a circuit of NAND gates feeding D flip-flops.
//!
//! A source index below `flip_flop_count` reads that flip-flop's current state; any other index
//! `s` reads the output of NAND gate `s - flip_flop_count`.
use {
    crate::{
        Transcode,
        error::{PersistResult, validation},
        log::lazy,
        puzzle::Puzzle,
        record::{OutputPayload, Payload},
    },
    rand::{Rng, RngCore},
    tracing::{Level, debug, enabled, trace},
};

pub struct CircuitSim;

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct CircuitSimInput {
    pub nand_gate_count: u32,
    pub flip_flop_count: u32,
    /// Two sources per gate.
    pub nand_gate_inputs: Vec<(i32, i32)>,
    /// One source per flip-flop.
    pub flip_flop_inputs: Vec<i32>,
    pub input_state: Vec<bool>,
    pub clock_cycles: u32,
}

impl CircuitSimInput {
    fn sources(&self) -> impl Iterator<Item = i32> + '_ {
        self.nand_gate_inputs
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .chain(self.flip_flop_inputs.iter().copied())
    }

    /// NAND gates in an order where every gate comes after the gates it reads, or `None` if the
    /// gates form a cycle.
    fn topological_order(&self) -> Option<Vec<usize>> {
        let ff = self.flip_flop_count as usize;
        let gates = self.nand_gate_inputs.len();
        let gate_of = |src: i32| {
            usize::try_from(src)
                .ok()?
                .checked_sub(ff)
                .filter(|&gate| gate < gates)
        };

        let mut pending = vec![0u8; gates];
        let mut readers = vec![Vec::new(); gates];
        for (gate, &(a, b)) in self.nand_gate_inputs.iter().enumerate() {
            for src in [a, b] {
                if let Some(dep) = gate_of(src) {
                    pending[gate] += 1;
                    readers[dep].push(gate);
                }
            }
        }

        let mut order: Vec<usize> = (0..gates).filter(|&g| pending[g] == 0).collect();
        let mut next = 0;
        while let Some(&gate) = order.get(next) {
            next += 1;
            for &reader in &readers[gate] {
                pending[reader] -= 1;
                if pending[reader] == 0 {
                    order.push(reader);
                }
            }
        }
        (order.len() == gates).then_some(order)
    }
}

impl Payload for CircuitSimInput {
    fn validate(&self) -> PersistResult<()> {
        if self.nand_gate_count as usize != self.nand_gate_inputs.len() {
            return Err(validation("circuit_sim: nand_gate_count is inconsistent"));
        }
        if self.flip_flop_count as usize != self.flip_flop_inputs.len() {
            return Err(validation("circuit_sim: flip_flop_count is inconsistent"));
        }
        if self.input_state.len() != self.flip_flop_inputs.len() {
            return Err(validation("circuit_sim: state size is inconsistent"));
        }
        let limit = self.flip_flop_inputs.len() + self.nand_gate_inputs.len();
        if let Some(src) = self
            .sources()
            .find(|&src| src < 0 || src as usize >= limit)
        {
            return Err(validation(format!("circuit_sim: source {src} is out of range")));
        }
        if self.topological_order().is_none() {
            return Err(validation("circuit_sim: nand gates form a cycle"));
        }
        Ok(())
    }
}

#[derive(Transcode, Debug, Default, Clone, PartialEq, Eq)]
#[puzzler(internal)]
pub struct CircuitSimOutput {
    pub output_state: Vec<bool>,
}

impl Payload for CircuitSimOutput {}

impl OutputPayload for CircuitSimOutput {
    fn equals(&self, other: &Self) -> bool {
        self.output_state == other.output_state
    }
}

#[derive(Clone, Copy)]
enum GateValue {
    Unknown,
    Pending,
    Known(bool),
}

/// Value of `src` during one cycle.
///
/// Gate values are memoised in `gates` and resolved with an explicit stack, so the depth of the
/// circuit never turns into call depth. A gate that reads itself through a loop sees `false`.
fn calc_src(
    src: usize,
    state: &[bool],
    input: &CircuitSimInput,
    gates: &mut [GateValue],
) -> bool {
    let ff = input.flip_flop_count as usize;
    let slot = |src: usize, gates: &[GateValue]| {
        if src < ff { GateValue::Known(state[src]) } else { gates[src - ff] }
    };
    let high = |src: usize, gates: &[GateValue]| matches!(slot(src, gates), GateValue::Known(true));

    let mut stack = vec![src];
    while let Some(&top) = stack.last() {
        match slot(top, gates) {
            GateValue::Known(_) => {
                stack.pop();
            }
            GateValue::Unknown => {
                gates[top - ff] = GateValue::Pending;
                let (a, b) = input.nand_gate_inputs[top - ff];
                stack.extend(
                    [a as usize, b as usize]
                        .into_iter()
                        .filter(|&dep| matches!(slot(dep, gates), GateValue::Unknown)),
                );
            }
            GateValue::Pending => {
                let (a, b) = input.nand_gate_inputs[top - ff];
                let value = !(high(a as usize, gates) && high(b as usize, gates));
                gates[top - ff] = GateValue::Known(value);
                stack.pop();
            }
        }
    }
    high(src, gates)
}

fn next(state: &[bool], input: &CircuitSimInput) -> Vec<bool> {
    let mut gates = vec![GateValue::Unknown; input.nand_gate_inputs.len()];
    input
        .flip_flop_inputs
        .iter()
        .map(|&src| calc_src(src as usize, state, input, &mut gates))
        .collect()
}

fn dump(state: &[bool]) {
    if enabled!(Level::TRACE) {
        let bits = lazy(|f| {
            state
                .iter()
                .try_for_each(|&bit| f.write_str(if bit { "1" } else { "0" }))
        });
        trace!(state = %bits, "clock");
    }
}

impl Puzzle for CircuitSim {
    const NAME: &'static str = "circuit_sim";

    type Input = CircuitSimInput;
    type Output = CircuitSimOutput;

    /// Gates are wired one at a time in random order, each reading two already-wired sources,
    /// so the generated circuit is always acyclic.
    fn create_input(scale: u32, rng: &mut dyn RngCore) -> CircuitSimInput {
        let flip_flop_count = scale;
        let nand_gate_count = scale.saturating_mul(10);
        let ff = flip_flop_count as usize;
        let gates = nand_gate_count as usize;

        let mut done: Vec<i32> = (0..ff as i32).collect();
        let mut todo: Vec<i32> = (ff as i32..(ff + gates) as i32).collect();
        let mut nand_gate_inputs = vec![(0, 0); gates];
        while !todo.is_empty() {
            let curr = todo.remove(rng.gen_range(0..todo.len()));
            let src1 = done[rng.gen_range(0..done.len())];
            let src2 = done[rng.gen_range(0..done.len())];
            nand_gate_inputs[curr as usize - ff] = (src1, src2);
            done.push(curr);
        }

        let flip_flop_inputs = (0..ff)
            .map(|_| done[rng.gen_range(0..done.len())])
            .collect();
        let input_state = (0..ff).map(|_| rng.r#gen()).collect();

        CircuitSimInput {
            nand_gate_count,
            flip_flop_count,
            nand_gate_inputs,
            flip_flop_inputs,
            input_state,
            clock_cycles: scale,
        }
    }

    fn reference_execute(input: &CircuitSimInput) -> CircuitSimOutput {
        debug!(clock_cycles = input.clock_cycles, "about to start running clock cycles");
        let mut state = input.input_state.clone();
        for i in 0..input.clock_cycles {
            debug!(i, clock_cycles = input.clock_cycles, "starting iteration");
            state = next(&state, input);
            dump(&state);
        }
        debug!("finished clock cycles");
        CircuitSimOutput {
            output_state: state,
        }
    }

    /// Sorts the gates once, then sweeps them in dependency order every cycle with no search.
    fn execute(input: &CircuitSimInput) -> CircuitSimOutput {
        let ff = input.flip_flop_count as usize;
        let Some(order) = input.topological_order() else {
            return Self::reference_execute(input);
        };

        let mut state = input.input_state.clone();
        let mut gates = vec![false; input.nand_gate_inputs.len()];
        for _ in 0..input.clock_cycles {
            let read = |src: i32, gates: &[bool], state: &[bool]| {
                let src = src as usize;
                if src < ff { state[src] } else { gates[src - ff] }
            };
            for &gate in &order {
                let (a, b) = input.nand_gate_inputs[gate];
                gates[gate] = !(read(a, &gates, &state) && read(b, &gates, &state));
            }
            state = input
                .flip_flop_inputs
                .iter()
                .map(|&src| read(src, &gates, &state))
                .collect();
        }
        CircuitSimOutput {
            output_state: state,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{PersistError, proptest_config::proptest_cfg},
        proptest::prelude::*,
        rand::{SeedableRng, rngs::StdRng},
    };

    /// One flip-flop fed by a NAND of itself with itself: an inverter.
    fn toggle(cycles: u32) -> CircuitSimInput {
        CircuitSimInput {
            nand_gate_count: 1,
            flip_flop_count: 1,
            nand_gate_inputs: vec![(0, 0)],
            flip_flop_inputs: vec![1],
            input_state: vec![false],
            clock_cycles: cycles,
        }
    }

    #[test]
    fn inverter_toggles_every_cycle() {
        for cycles in 0..5 {
            let expected = vec![cycles % 2 == 1];
            assert_eq!(CircuitSim::reference_execute(&toggle(cycles)).output_state, expected);
            assert_eq!(CircuitSim::execute(&toggle(cycles)).output_state, expected);
        }
    }

    /// Flip-flop 0 feeds a chain of `len` inverters whose last gate feeds it back.
    fn inverter_chain(len: usize, cycles: u32) -> CircuitSimInput {
        let nand_gate_inputs = (0..len as i32).map(|g| (g, g)).collect();
        CircuitSimInput {
            nand_gate_count: len as u32,
            flip_flop_count: 1,
            nand_gate_inputs,
            flip_flop_inputs: vec![len as i32],
            input_state: vec![false],
            clock_cycles: cycles,
        }
    }

    #[test]
    fn long_gate_chains_do_not_recurse() {
        let input = inverter_chain(200_001, 3);
        input.validate().unwrap();
        assert_eq!(CircuitSim::reference_execute(&input).output_state, [true]);
        assert_eq!(CircuitSim::execute(&input).output_state, [true]);

        let input = inverter_chain(200_000, 2);
        assert_eq!(CircuitSim::reference_execute(&input).output_state, [false]);
        assert_eq!(CircuitSim::execute(&input).output_state, [false]);
    }

    #[test]
    fn gate_loop_terminates() {
        let mut input = toggle(1);
        input.nand_gate_inputs = vec![(1, 0)];
        assert_eq!(CircuitSim::reference_execute(&input).output_state, [true]);
        assert_eq!(CircuitSim::execute(&input).output_state, [true]);
    }

    #[test]
    fn generated_inputs_validate() {
        let mut rng = StdRng::seed_from_u64(11);
        let input = CircuitSim::create_input(20, &mut rng);
        assert_eq!(input.nand_gate_count, 200);
        assert_eq!(input.flip_flop_count, 20);
        assert_eq!(input.clock_cycles, 20);
        input.validate().unwrap();
    }

    #[test]
    fn inconsistent_counts_are_rejected() {
        let mut input = toggle(1);
        input.nand_gate_count = 2;
        assert!(matches!(input.validate(), Err(PersistError::Validation(_))));

        let mut input = toggle(1);
        input.input_state.push(true);
        assert!(matches!(input.validate(), Err(PersistError::Validation(_))));
    }

    #[test]
    fn out_of_range_and_cyclic_wiring_is_rejected() {
        let mut input = toggle(1);
        input.flip_flop_inputs = vec![2];
        assert!(matches!(input.validate(), Err(PersistError::Validation(_))));

        let mut input = toggle(1);
        input.nand_gate_inputs = vec![(-1, 0)];
        assert!(matches!(input.validate(), Err(PersistError::Validation(_))));

        let mut input = toggle(1);
        input.nand_gate_inputs = vec![(1, 0)];
        assert!(matches!(input.validate(), Err(PersistError::Validation(_))));
    }

    #[test]
    fn zero_scale_is_an_empty_circuit() {
        let mut rng = StdRng::seed_from_u64(0);
        let input = CircuitSim::create_input(0, &mut rng);
        input.validate().unwrap();
        assert!(CircuitSim::execute(&input).output_state.is_empty());
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn candidate_matches_reference(scale in 0u32..=12, seed in any::<u64>()) {
            let input = CircuitSim::create_input(scale, &mut StdRng::seed_from_u64(seed));
            prop_assert!(input.validate().is_ok());
            prop_assert_eq!(CircuitSim::reference_execute(&input), CircuitSim::execute(&input));
        }
    }
}
