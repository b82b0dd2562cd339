use clap::Parser;

use curfew::cli::{Cli, Commands};
use curfew::{cmd, errors, tracing_init};

fn main() {
    let cli = Cli::parse();
    tracing_init::init_tracing();

    let result = match cli.command {
        Commands::Apply {
            root,
            config,
            dry_run,
            now,
        } => cmd::apply::run(root, config, dry_run, now),
        Commands::Check { root, config } => cmd::check::run(root, config),
        Commands::Explain {
            path,
            root,
            config,
            now,
        } => cmd::explain::run(path, root, config, now),
    };

    if let Err(err) = result {
        errors::display_error(&err, cli.verbose);
        std::process::exit(1);
    }
}
