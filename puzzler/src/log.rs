//! Leveled diagnostics on top of `tracing`.
//!
//! Library code only emits events. Binaries call [`init`] once with the verbosity they were
//! given; `RUST_LOG` overrides it when set. Output goes to stderr so stdout stays free for
//! records.
use {
    core::fmt,
    tracing::level_filters::LevelFilter,
    tracing_subscriber::{
        EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt,
    },
};

/// Numeric verbosity accepted by the command-line tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Fatal = 0,
    Error = 1,
    #[default]
    Info = 2,
    Verbose = 3,
    Debug = 4,
}

impl LogLevel {
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Verbose => LevelFilter::DEBUG,
            LogLevel::Debug => LevelFilter::TRACE,
        }
    }
}

/// Values above 4 clamp to [`LogLevel::Debug`].
impl From<u32> for LogLevel {
    fn from(level: u32) -> Self {
        match level {
            0 => LogLevel::Fatal,
            1 => LogLevel::Error,
            2 => LogLevel::Info,
            3 => LogLevel::Verbose,
            _ => LogLevel::Debug,
        }
    }
}

/// Install the global subscriber: compact stderr output with uptime timestamps.
///
/// Reads `RUST_LOG` if set, otherwise filters at `level`. Calling this more than once keeps
/// the first subscriber.
///
/// # Example
/// ```bash
/// RUST_LOG=puzzler=trace execute_puzzle 1 < input.bin > output.bin
/// ```
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.level_filter().into()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(tracing_fmt::time::uptime())
                .compact(),
        )
        .try_init();
}

/// [`Display`](fmt::Display) adapter that runs `f` only when formatted.
///
/// Pass it as a `%` field so expensive renderings are skipped for disabled events:
///
/// ```
/// use puzzler::log::lazy;
///
/// let cells = [true, false, true];
/// tracing::trace!(
///     row = %lazy(|f| cells.iter().try_for_each(|&c| f.write_str(if c { "x" } else { " " }))),
///     "state"
/// );
/// ```
pub fn lazy<F>(f: F) -> Lazy<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    Lazy(f)
}

pub struct Lazy<F>(F);

impl<F> fmt::Display for Lazy<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, core::cell::Cell};

    #[test]
    fn numeric_levels_clamp() {
        assert_eq!(LogLevel::from(0), LogLevel::Fatal);
        assert_eq!(LogLevel::from(3), LogLevel::Verbose);
        assert_eq!(LogLevel::from(4), LogLevel::Debug);
        assert_eq!(LogLevel::from(99), LogLevel::Debug);
    }

    #[test]
    fn level_filters() {
        assert_eq!(LogLevel::Fatal.level_filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::Info.level_filter(), LevelFilter::INFO);
        assert_eq!(LogLevel::Debug.level_filter(), LevelFilter::TRACE);
    }

    #[test]
    fn lazy_runs_only_when_formatted() {
        let calls = Cell::new(0);
        let msg = lazy(|f| {
            calls.set(calls.get() + 1);
            f.write_str("grid")
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(msg.to_string(), "grid");
        assert_eq!(calls.get(), 1);
    }
}
