mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::models::audit_entry::AuditFilter;
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    cli::context::init(args.dir.as_deref());
    cli::output::configure(args.verbose, args.quiet);
    init_tracing(args.verbose);

    let crypto = args.crypto_args();

    let result = match &args.command {
        Commands::Init { generate_key } => cli::commands::init::execute(*generate_key, &crypto),
        Commands::Keys { action } => cli::commands::keys::execute(action, &crypto),
        Commands::List => cli::commands::list::execute(),
        Commands::Set { index, key, value } => {
            cli::commands::edit::execute_set(*index, key, value.as_deref())
        }
        Commands::Add { key, value } => cli::commands::edit::execute_add(key, value.as_deref()),
        Commands::Remove { index } => cli::commands::remove::execute(*index),
        Commands::Discard => cli::commands::discard::execute(),
        Commands::Submit => cli::commands::submit::execute(&crypto),
        Commands::Import { file } => cli::commands::import::execute(file.as_deref()),
        Commands::Export { output } => cli::commands::export::execute(output.as_deref(), &crypto),
        Commands::Log {
            author,
            key,
            action,
            last,
            verify,
        } => {
            let filter = AuditFilter {
                author: author.clone(),
                key: key.clone(),
                action: action.clone(),
            };
            if *verify {
                cli::commands::log::verify()
            } else {
                cli::commands::log::execute(&filter, *last)
            }
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `KVAULT_LOG`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "kvault=debug" } else { "kvault=warn" };
    let filter = EnvFilter::try_from_env("KVAULT_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
