use {
    anyhow::Result,
    clap::Parser,
    puzzler::{io::MemoryStream, record::ExecMode},
    std::process::ExitCode,
    tracing::{error, info},
};

/// Generate an input, run both solvers in-process and check that they agree.
///
/// The input and both outputs pass through the wire format on the way, so a codec fault shows
/// up here the same way it would between separate tools.
#[derive(Parser)]
#[command(name = "run_puzzle", version)]
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

    info!(puzzle = %cli.name, scale = cli.scale, "creating random input");
    let mut rng = puzzler_cli::rng(cli.seed);
    let mut created = registry.create_input(&cli.name, cli.scale, &mut rng)?;

    let mut stream = MemoryStream::new();
    puzzler_cli::write_input(created.as_mut(), &mut stream)?;
    info!(bytes = stream.as_slice().len(), "input encoded");
    let input = puzzler_cli::read_input(&registry, &mut stream)?;

    info!("executing puzzle");
    let mut got = input.execute(ExecMode::Candidate);
    info!("executing reference");
    let mut reference = input.execute(ExecMode::Reference);

    info!("checking output");
    let got = puzzler_cli::round_trip_output(&registry, got.as_mut())?;
    let reference = puzzler_cli::round_trip_output(&registry, reference.as_mut())?;
    if !reference.equals(got.as_ref()) {
        error!("output is not correct");
        return Ok(ExitCode::FAILURE);
    }
    info!("output is correct");
    Ok(ExitCode::SUCCESS)
}
