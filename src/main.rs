use clap::Parser;
use pfam_oma::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("pfam_oma=debug,info")
    } else {
        EnvFilter::new("pfam_oma=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Analyze(args) => {
            cli::analyze::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Groups(args) => {
            cli::groups::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
