//! Derive macro for `Transcode`.
//!
//! Refer to the [`puzzler`](../puzzler/index.html) crate for the trait itself.
use {
    proc_macro::TokenStream,
    syn::{DeriveInput, parse_macro_input},
};

mod common;
mod transcode;

/// Implement `Transcode` for a struct.
///
/// Fields are transcoded in declaration order, so the wire layout of the struct is the
/// concatenation of its fields' layouts. Every type parameter gets a `Transcode` bound.
///
/// ```ignore
/// #[derive(Transcode, Default)]
/// struct LifeInput {
///     n: u32,
///     steps: u32,
///     state: Vec<bool>,
/// }
/// ```
#[proc_macro_derive(Transcode, attributes(puzzler))]
pub fn derive_transcode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match transcode::generate(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.write_errors().into(),
    }
}
