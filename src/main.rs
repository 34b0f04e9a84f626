use clap::Parser;
use std::process::ExitCode;

use chatpoll::cli::{self, Cli, Command, ConfigCommand};
use chatpoll::{config, logging, polls, server};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => run_server(None).await,
        Some(Command::Start { port }) => run_server(port).await,
        Some(Command::Config(ConfigCommand::Show)) => cli::handle_config_show(),
        Some(Command::Config(ConfigCommand::Get { key })) => cli::handle_config_get(&key),
        Some(Command::Config(ConfigCommand::Path)) => {
            cli::handle_config_path();
            Ok(())
        }
        Some(Command::Version) => {
            cli::handle_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_server(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::load_config()?;
    if let Some(port) = port {
        cfg.server.port = port;
    }
    logging::init_logging(&cfg.logging)?;

    let store = polls::create_store();
    server::serve(&cfg.server, store).await?;
    Ok(())
}
