use std::io;
use std::process::ExitCode;

use clap::Parser;
use fx_rate::{Cli, run};

fn main() -> ExitCode {
    let args = Cli::parse();

    match run(&args, &mut io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
