use {
    anyhow::Result,
    clap::Parser,
    puzzler::io::StdoutStream,
    std::process::ExitCode,
    tracing::info,
};

/// Generate a random input for a registered puzzle and write it to stdout.
#[derive(Parser)]
#[command(name = "create_puzzle_input", version)]
struct Cli {
    /// Registered puzzle name.
    name: String,
    /// Problem size; larger is harder.
    scale: u32,
    /// 0 fatal, 1 error, 2 info, 3 verbose, 4 debug.
    #[arg(default_value_t = 2)]
    log_level: u32,
    /// Seed for the input generator. Drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    puzzler_cli::report(run())
}

fn run() -> Result<ExitCode> {
    let registry = puzzler_cli::builtin_registry()?;
    let cli: Cli = puzzler_cli::parse_args(&registry);
    puzzler_cli::init_logging(cli.log_level);

    info!(puzzle = %cli.name, scale = cli.scale, "creating input");
    let mut rng = puzzler_cli::rng(cli.seed);
    let mut input = registry.create_input(&cli.name, cli.scale, &mut rng)?;

    puzzler_cli::write_input(input.as_mut(), &mut StdoutStream::stdout())?;
    info!("input written");
    Ok(ExitCode::SUCCESS)
}
