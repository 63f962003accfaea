//! Plumbing shared by the puzzle command-line tools.
//!
//! Every tool follows the same shape: build the registry, parse positional arguments, install
//! logging at the requested level, then move records between files, stdin and stdout. Any
//! error is printed with its full context chain and turns into exit status 1.
use {
    anyhow::{Context, Result},
    clap::{CommandFactory, FromArgMatches, Parser, error::ErrorKind},
    puzzler::{
        PersistContext, Registry,
        io::{FileInStream, MemoryStream, Stream},
        log::{self, LogLevel},
        record::{InputRecord, OutputRecord},
    },
    rand::{SeedableRng, rngs::StdRng},
    std::{path::Path, process::ExitCode},
};

pub fn builtin_registry() -> Result<Registry> {
    Registry::with_builtin_puzzles().context("registering built-in puzzles")
}

/// Human-readable list of registered puzzle names.
pub fn puzzle_list(registry: &Registry) -> String {
    registry
        .names()
        .fold(String::from("Puzzles:"), |mut acc, name| {
            acc.push_str("\n  ");
            acc.push_str(name);
            acc
        })
}

/// Parse `C` from the process arguments.
///
/// The registered puzzle names are appended to `--help` and printed after any usage error.
pub fn parse_args<C: Parser>(registry: &Registry) -> C {
    let list = puzzle_list(registry);
    let parsed = C::command()
        .after_help(list.clone())
        .try_get_matches()
        .and_then(|matches| C::from_arg_matches(&matches));
    match parsed {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            if !matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                eprintln!("\n{list}");
            }
            std::process::exit(err.exit_code());
        }
    }
}

pub fn init_logging(level: u32) {
    log::init(LogLevel::from(level));
}

/// Seeded generator when `seed` is given, otherwise one seeded from the OS.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Print `result`'s error chain, if any, and map it to an exit status.
pub fn report(result: Result<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|err| {
        eprintln!("error: {err:#}");
        ExitCode::FAILURE
    })
}

pub fn read_input(registry: &Registry, stream: &mut dyn Stream) -> Result<Box<dyn InputRecord>> {
    let kind = stream.kind();
    let input = registry
        .load_input(&mut PersistContext::receiving(stream))
        .with_context(|| format!("loading input record from {kind}"))?;
    Ok(input)
}

pub fn read_output(
    registry: &Registry,
    stream: &mut dyn Stream,
) -> Result<Box<dyn OutputRecord>> {
    let kind = stream.kind();
    let output = registry
        .load_output(&mut PersistContext::receiving(stream))
        .with_context(|| format!("loading output record from {kind}"))?;
    Ok(output)
}

pub fn read_output_file(registry: &Registry, path: &Path) -> Result<Box<dyn OutputRecord>> {
    let mut stream = FileInStream::open(path)?;
    read_output(registry, &mut stream).with_context(|| format!("reading {}", path.display()))
}

pub fn write_input(input: &mut dyn InputRecord, stream: &mut dyn Stream) -> Result<()> {
    let mut ctx = PersistContext::sending(stream);
    input
        .persist(&mut ctx)
        .with_context(|| format!("writing {} input record", input.puzzle_name()))?;
    ctx.finish().context("flushing input record")?;
    Ok(())
}

pub fn write_output(output: &mut dyn OutputRecord, stream: &mut dyn Stream) -> Result<()> {
    let mut ctx = PersistContext::sending(stream);
    output
        .persist(&mut ctx)
        .with_context(|| format!("writing {} output record", output.puzzle_name()))?;
    ctx.finish().context("flushing output record")?;
    Ok(())
}

/// Encode `output` and decode it again through the registry.
pub fn round_trip_output(
    registry: &Registry,
    output: &mut dyn OutputRecord,
) -> Result<Box<dyn OutputRecord>> {
    let mut stream = MemoryStream::new();
    write_output(output, &mut stream)?;
    read_output(registry, &mut stream)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        puzzler::{Input, puzzles::MedianBits, record::ExecMode},
    };

    #[test]
    fn puzzle_list_names_every_puzzle() {
        let registry = builtin_registry().unwrap();
        let list = puzzle_list(&registry);
        assert!(list.starts_with("Puzzles:"));
        for name in registry.names() {
            assert!(list.contains(&format!("\n  {name}")));
        }
    }

    #[test]
    fn seeded_rng_is_repeatable() {
        use rand::RngCore;
        assert_eq!(rng(Some(3)).next_u64(), rng(Some(3)).next_u64());
    }

    #[test]
    fn output_survives_the_round_trip() {
        let registry = builtin_registry().unwrap();
        let input: Box<dyn InputRecord> =
            Box::new(Input::<MedianBits>::create(16, &mut rng(Some(9))));
        let mut output = input.execute(ExecMode::Reference);
        let decoded = round_trip_output(&registry, output.as_mut()).unwrap();
        assert!(output.equals(decoded.as_ref()));
    }
}
