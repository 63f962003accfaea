use {
    anyhow::Result,
    clap::Parser,
    puzzler::{
        io::{StdinStream, StdoutStream},
        record::ExecMode,
    },
    std::process::ExitCode,
    tracing::info,
};

/// Read an input record of any registered puzzle from stdin, solve it and write the output
/// record to stdout.
#[derive(Parser)]
#[command(name = "execute_puzzle", version)]
struct Cli {
    /// Non-zero runs the reference solver, zero the candidate.
    is_reference: u32,
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

    let input = puzzler_cli::read_input(&registry, &mut StdinStream::stdin())?;
    info!(puzzle = input.puzzle_name(), scale = input.scale(), "loaded input");

    let mode = if cli.is_reference != 0 {
        ExecMode::Reference
    } else {
        ExecMode::Candidate
    };
    let mut output = input.execute(mode);

    puzzler_cli::write_output(output.as_mut(), &mut StdoutStream::stdout())?;
    info!("output written");
    Ok(ExitCode::SUCCESS)
}
