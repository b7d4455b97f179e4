use anyhow::Context;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Targets that receive log output: the library and this binary share the
/// crate name
const CRATE_TARGET: &str = "calheat";

/// Where log lines go while the plot is on screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Destination<'a> {
    File(&'a Path),
    Stderr,
    Discard,
}

impl<'a> Destination<'a> {
    /// Log to `log_file` if one was given.  Otherwise log to stderr, unless
    /// stderr is the terminal the plot is drawn on, in which case any log
    /// line would be painted over the plot.
    pub(crate) fn choose(log_file: Option<&'a Path>) -> Destination<'a> {
        match log_file {
            Some(path) => Destination::File(path),
            None if io::stderr().is_terminal() => Destination::Discard,
            None => Destination::Stderr,
        }
    }
}

/// Filter directive for the number of `-v` flags: warn, then info, debug,
/// and trace
fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{CRATE_TARGET}={level}")
}

/// Install the global subscriber.  `RUST_LOG` takes precedence over
/// `verbosity` when set.
pub(crate) fn init(verbosity: u8, dest: Destination<'_>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match dest {
        Destination::File(path) => {
            let fp = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(fp)).init();
        }
        Destination::Stderr => builder.with_writer(io::stderr).init(),
        Destination::Discard => (),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_wins() {
        let path = Path::new("calheat.log");
        assert_eq!(Destination::choose(Some(path)), Destination::File(path));
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "calheat=warn");
        assert_eq!(default_directive(2), "calheat=debug");
        assert_eq!(default_directive(9), "calheat=trace");
    }
}
