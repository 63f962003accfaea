//! The [`Puzzle`] trait.
use {
    crate::record::{OutputPayload, Payload},
    rand::RngCore,
};

/// A named problem with a reference solver and a fast candidate solver.
///
/// Implementors are marker types; all state lives in the input and output payloads. The name is
/// written into every record of the puzzle and is the key it is registered under.
pub trait Puzzle: 'static {
    const NAME: &'static str;

    type Input: Payload;
    type Output: OutputPayload;

    /// Generate an input whose difficulty grows with `scale`.
    fn create_input(scale: u32, rng: &mut dyn RngCore) -> Self::Input;

    /// Straightforward solver whose output is taken as correct.
    fn reference_execute(input: &Self::Input) -> Self::Output;

    /// Optimised solver checked against [`Puzzle::reference_execute`].
    fn execute(input: &Self::Input) -> Self::Output;
}
