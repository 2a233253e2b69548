//! autotest CLI - re-run tests whenever source files change

use clap::Parser;
use std::ffi::OsString;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod watch;

/// autotest - Re-run the test command whenever a source file in the working directory changes
///
/// Behaviour is configured through AUTOTEST_PROGRAM, AUTOTEST_SUBCOMMAND,
/// AUTOTEST_SUFFIX and AUTOTEST_RECURSIVE.
#[derive(Parser, Debug)]
#[command(name = "autotest")]
#[command(author, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Arguments forwarded verbatim to the test command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

impl Cli {
    /// Collect the arguments to forward from a raw command line
    ///
    /// clap swallows a leading `--` as its end-of-options marker, so it is put
    /// back when the raw command line started with one.
    fn forwarded_args<I, T>(raw: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let raw: Vec<OsString> = raw.into_iter().map(Into::into).collect();
        let mut args = Self::parse_from(&raw).args;
        if raw.get(1).is_some_and(|first| first == "--") {
            args.insert(0, OsString::from("--"));
        }
        args
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Cli::forwarded_args(std::env::args_os());

    match watch::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarded(raw: &[&str]) -> Vec<OsString> {
        Cli::forwarded_args(raw.iter().copied())
    }

    #[test]
    fn test_flags_are_forwarded() {
        assert_eq!(
            forwarded(&["autotest", "-v", "-run", "TestFoo", "./..."]),
            vec!["-v", "-run", "TestFoo", "./..."]
        );
    }

    #[test]
    fn test_leading_double_dash_is_forwarded() {
        assert_eq!(forwarded(&["autotest", "--", "-run", "X"]), vec!["--", "-run", "X"]);
        assert_eq!(forwarded(&["autotest", "--"]), vec!["--"]);
        assert_eq!(forwarded(&["autotest", "--", "--"]), vec!["--", "--"]);
    }

    #[test]
    fn test_inner_double_dash_is_forwarded() {
        assert_eq!(forwarded(&["autotest", "-run", "--", "X"]), vec!["-run", "--", "X"]);
        assert_eq!(
            forwarded(&["autotest", "./...", "-args", "--", "-flag"]),
            vec!["./...", "-args", "--", "-flag"]
        );
    }

    #[test]
    fn test_help_and_version_are_forwarded() {
        assert_eq!(forwarded(&["autotest", "-h", "--version"]), vec!["-h", "--version"]);
    }

    #[test]
    fn test_no_args() {
        assert!(forwarded(&["autotest"]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_are_forwarded() {
        use std::os::unix::ffi::OsStringExt;

        let raw_arg = OsString::from_vec(vec![b'p', b'k', b'g', 0x80]);
        let args = Cli::forwarded_args([OsString::from("autotest"), raw_arg.clone()]);
        assert_eq!(args, vec![raw_arg]);
    }
}
