//! pprotect - team secrets in a single reviewable file.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pocket_protector::cli::{self, output, Cli};
use pocket_protector::core::constants::ENV_LOG;

fn main() {
    let args = Cli::parse();

    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("pocket_protector=debug")
        } else {
            EnvFilter::new("pocket_protector=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = cli::execute(args) {
        output::error(&cli::message(&e));
        if let Some(hint) = cli::hint(&e) {
            output::hint(hint);
        }
        std::process::exit(cli::exit_code(&e));
    }
}
