//! Codegen for the `puzzler` crate.
use std::{
    env,
    fs::File,
    io::{BufWriter, Error, Result},
    path::{Path, PathBuf},
};

mod tuple;

/// Highest tuple arity that gets a generated `Transcode` impl.
const MAX_TUPLE_ARITY: usize = 8;

fn generate_tuples(out_dir: &Path) -> Result<()> {
    let out_file = File::create(out_dir.join("tuples.rs"))?;
    let mut out = BufWriter::new(out_file);
    tuple::generate(MAX_TUPLE_ARITY, &mut out)
}

pub(crate) fn generate() -> Result<()> {
    let out_dir =
        PathBuf::from(env::var_os("OUT_DIR").ok_or_else(|| Error::other("OUT_DIR not set"))?);

    generate_tuples(&out_dir)?;
    Ok(())
}
