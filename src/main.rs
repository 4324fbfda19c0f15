mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_filter = if cli.verbose {
        "ffprofile=debug"
    } else {
        "ffprofile=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Create {
            browser,
            addon,
            prefs,
            config,
            dir,
            json,
        } => commands::create(commands::CreateArgs {
            browser,
            addon,
            prefs,
            config,
            dir,
            json,
        }),
        Commands::Defaults {
            browser,
            query,
            sources,
        } => commands::show_defaults(browser, &query, sources),
        Commands::Show { profile, query } => commands::show_profile(&profile, &query),
    }
}
