//! Built-in puzzles.
use crate::{error::RegistryError, registry::RegistryBuilder};

pub mod circuit_sim;
pub mod life;
pub mod matrix_exponent;
pub mod median_bits;
pub mod option_explicit;
pub mod string_search;

pub use {
    circuit_sim::CircuitSim, life::Life, matrix_exponent::MatrixExponent,
    median_bits::MedianBits, option_explicit::OptionExplicit, string_search::StringSearch,
};

/// Register every built-in puzzle with `builder`.
pub fn register_all(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register::<CircuitSim>()?
        .register::<Life>()?
        .register::<MatrixExponent>()?
        .register::<MedianBits>()?
        .register::<OptionExplicit>()?
        .register::<StringSearch>()?;
    Ok(())
}
