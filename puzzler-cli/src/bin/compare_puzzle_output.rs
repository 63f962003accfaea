use {
    anyhow::Result,
    clap::Parser,
    std::{path::PathBuf, process::ExitCode},
    tracing::{error, info},
};

/// Compare two output records with their puzzle's equality. Exits 1 if they differ.
#[derive(Parser)]
#[command(name = "compare_puzzle_output", version)]
struct Cli {
    /// Output of the reference solver.
    reference: PathBuf,
    /// Output under test.
    got: PathBuf,
    /// 0 fatal, 1 error, 2 info, 3 verbose, 4 debug.
    #[arg(default_value_t = 2)]
    log_level: u32,
}

fn main() -> ExitCode {
    puzzler_cli::report(run())
}

fn run() -> Result<ExitCode> {
    let registry = puzzler_cli::builtin_registry()?;
    let cli: Cli = puzzler_cli::parse_args(&registry);
    puzzler_cli::init_logging(cli.log_level);

    info!(path = %cli.reference.display(), "loading reference");
    let reference = puzzler_cli::read_output_file(&registry, &cli.reference)?;
    info!(path = %cli.got.display(), "loading got");
    let got = puzzler_cli::read_output_file(&registry, &cli.got)?;

    if !reference.equals(got.as_ref()) {
        error!(
            reference = reference.puzzle_name(),
            got = got.puzzle_name(),
            "outputs are different"
        );
        return Ok(ExitCode::FAILURE);
    }
    info!("outputs are equal");
    Ok(ExitCode::SUCCESS)
}
