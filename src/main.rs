use std::process::ExitCode;

use clap::Parser;
use e2g::{init_logging, run, Args};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = init_logging(args.verbosity(), args.log_json) {
        eprintln!("{:#}", error);
    }

    ExitCode::from(run(&args))
}
