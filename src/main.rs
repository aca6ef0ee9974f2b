#[cfg(not(target_arch = "wasm32"))]
use std::{
    io::{self, Write},
    process::ExitCode,
};

/// Binding layout tool entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    let outcome = msd::cli::run(std::env::args().skip(1));

    let written = io::stdout()
        .write_all(outcome.stdout.as_bytes())
        .and_then(|()| io::stderr().write_all(outcome.stderr.as_bytes()));
    match written {
        Ok(()) => ExitCode::from(outcome.status),
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
