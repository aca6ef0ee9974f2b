//! Command line handling for `msd-layout`.
//!
//! [`run`] takes the arguments after the program name and returns what to
//! print and the exit status, so `main` only forwards them to the process.

use std::path::PathBuf;

use crate::config::Settings;
use crate::report::layout_report;

pub const USAGE: &str = "usage: msd-layout [wgsl|report] [SETTINGS.json]";

/// Exit status for a command that ran but failed.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for arguments that do not form a command.
pub const EXIT_USAGE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the WGSL prelude
    Wgsl,
    /// Print the layout report
    Report,
    /// Print usage
    Help,
}

impl Command {
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "wgsl" => Some(Command::Wgsl),
            "report" => Some(Command::Report),
            "-h" | "--help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub settings_path: Option<PathBuf>,
}

impl Invocation {
    /// Parse the arguments following the program name. The command defaults to `wgsl`.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let command = match args.next() {
            Some(arg) => Command::parse(&arg).ok_or_else(|| format!("Unknown command '{}'", arg))?,
            None => Command::Wgsl,
        };
        let settings_path = args.next().map(PathBuf::from);
        if let Some(extra) = args.next() {
            return Err(format!("Unexpected argument '{}'", extra));
        }
        Ok(Self {
            command,
            settings_path,
        })
    }
}

/// What a run printed and how it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub status: u8,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    fn success(stdout: String) -> Self {
        Self {
            stdout,
            ..Self::default()
        }
    }

    fn failure(status: u8, stderr: String) -> Self {
        Self {
            status,
            stderr,
            ..Self::default()
        }
    }
}

/// Run the tool. Arguments are checked before any settings file is read.
pub fn run<I, S>(args: I) -> Outcome
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let invocation = match Invocation::parse(args) {
        Ok(invocation) => invocation,
        Err(e) => return Outcome::failure(EXIT_USAGE, format!("{}\n{}\n", e, USAGE)),
    };
    if invocation.command == Command::Help {
        return Outcome::success(format!("{}\n", USAGE));
    }

    let settings = match &invocation.settings_path {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                return Outcome::failure(
                    EXIT_FAILURE,
                    format!("Failed to load {}: {}\n", path.display(), e),
                );
            }
        },
        None => Settings::default(),
    };

    #[cfg(not(target_arch = "wasm32"))]
    crate::init_logging(settings.log_level);
    log::debug!("Running {:?} with {:?}", invocation.command, settings);

    match invocation.command {
        Command::Wgsl => Outcome::success(msd_gpu::wgsl_prelude()),
        Command::Report => match layout_report(&settings.upload) {
            Ok(report) => Outcome::success(report),
            Err(e) => Outcome::failure(EXIT_FAILURE, format!("Layout error: {}\n", e)),
        },
        Command::Help => Outcome::success(format!("{}\n", USAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("msd-layout-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, json).unwrap();
        path
    }

    fn missing_path() -> String {
        std::env::temp_dir()
            .join("msd-layout-missing-settings.json")
            .display()
            .to_string()
    }

    #[test]
    fn test_parse() {
        let invocation = Invocation::parse(Vec::<String>::new()).unwrap();
        assert_eq!(invocation.command, Command::Wgsl);
        assert_eq!(invocation.settings_path, None);

        let invocation = Invocation::parse(["report", "a.json"]).unwrap();
        assert_eq!(invocation.command, Command::Report);
        assert_eq!(invocation.settings_path, Some(PathBuf::from("a.json")));

        assert!(Invocation::parse(["bogus"]).is_err());
        assert!(Invocation::parse(["wgsl", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_default_prints_prelude() {
        let outcome = run(Vec::<String>::new());
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.stdout, msd_gpu::wgsl_prelude());
        assert!(outcome.stderr.is_empty());

        assert_eq!(run(["wgsl"]), outcome);
    }

    #[test]
    fn test_report() {
        let outcome = run(["report"]);
        assert_eq!(outcome.status, 0);
        assert!(outcome.stdout.contains("uniform ring      3 x 256 = 768 bytes"));
    }

    #[test]
    fn test_help() {
        for flag in ["-h", "--help"] {
            let outcome = run([flag]);
            assert_eq!(outcome.status, 0);
            assert_eq!(outcome.stdout, format!("{}\n", USAGE));
        }
        // Help does not need a readable settings file
        assert_eq!(run(["--help".to_string(), missing_path()]).status, 0);
    }

    #[test]
    fn test_unknown_command_is_usage_error() {
        let outcome = run(["bogus"]);
        assert_eq!(outcome.status, EXIT_USAGE);
        assert!(outcome.stderr.contains("Unknown command 'bogus'"));
        assert!(outcome.stderr.contains(USAGE));
        assert!(outcome.stdout.is_empty());

        // Checked before the settings file is read
        let outcome = run(["bogus".to_string(), missing_path()]);
        assert_eq!(outcome.status, EXIT_USAGE);
        assert!(!outcome.stderr.contains("Failed to load"));

        assert_eq!(run(["wgsl", "a.json", "extra"]).status, EXIT_USAGE);
    }

    #[test]
    fn test_missing_settings_file_fails() {
        let outcome = run(["report".to_string(), missing_path()]);
        assert_eq!(outcome.status, EXIT_FAILURE);
        assert!(outcome.stderr.starts_with("Failed to load"));
        assert!(outcome.stdout.is_empty());
    }

    #[test]
    fn test_settings_file_is_used() {
        let path = temp_settings("frames", r#"{ "upload": { "frames_in_flight": 2 } }"#);
        let outcome = run(["report".to_string(), path.display().to_string()]);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(outcome.status, 0);
        assert!(outcome.stdout.contains("uniform ring      2 x 256 = 512 bytes"));
    }

    #[test]
    fn test_oversized_settings_fail() {
        let path = temp_settings("oversized", r#"{ "upload": { "pool_size": 18446744073709551615 } }"#);
        let outcome = run(["report".to_string(), path.display().to_string()]);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(outcome.status, EXIT_FAILURE);
        assert!(outcome.stderr.contains("Invalid upload configuration"));
    }
}
