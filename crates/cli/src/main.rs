use clap::Parser;
use stampindex_cli::args::Args;
use stampindex_cli::config::RunConfig;
use stampindex_cli::logging;
use stampindex_cli::options::Verbosity;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.log.verbose, args.log.suppress_messages);

    if let Err(e) = logging::init(verbosity) {
        eprintln!("{e}");
    }

    let config = match RunConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match stampindex_cli::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Application Error: {e}");
            ExitCode::FAILURE
        }
    }
}
