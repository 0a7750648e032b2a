use clap::Parser;
use ltsteps_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Err(error) = args.validate() {
        eprintln!("Error: {}", error);
        process::exit(2);
    }

    match commands::run(args) {
        Ok(_summary) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}
