use std::process::ExitCode;

use btor2dot::{Config, Error};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = main_err() {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn main_err() -> Result<(), Error> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    btor2dot::convert(stdin, stdout, Config::default())?;

    Ok(())
}
