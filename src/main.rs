use clap::Parser;

use voyage_rs::cli::{self, Cli};
use voyage_rs::config::Environment;
use voyage_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(msg) = cli.validate() {
        eprintln!("Error: {}", msg);
        eprintln!("{}", Cli::get_validation_help());
        std::process::exit(2);
    }

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    cli::execute_command(&cli, settings.clone()).await?;

    let runs_server = matches!(
        cli.command,
        None | Some(cli::Commands::Serve { dry_run: false, .. })
    );
    if runs_server {
        let environment = cli
            .env
            .map(Environment::from)
            .unwrap_or_else(Environment::from_env);
        Server::new(settings, environment).run().await?;
    }

    Ok(())
}
