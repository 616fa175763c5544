use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;

use budget_tracker::storage::GlobalConfigRepository;
use budget_tracker::{Backend, CsvConnection, CsvStore};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => CsvConnection::default_data_directory()?,
    };
    let connection = CsvConnection::new(&data_dir)?;
    let global_config = GlobalConfigRepository::new(connection.clone());
    info!("Using data directory {}", data_dir.display());

    if let Commands::UseUser { name } = &cli.command {
        global_config.set_active_user(Some(name.as_str()))?;
        println!("Now acting as {}", name);
        return Ok(());
    }

    let user = match cli.user {
        Some(user) => user,
        None => global_config
            .active_user()?
            .ok_or_else(|| anyhow!("No user selected. Pass --user or run `use-user` first."))?,
    };
    let command = cli
        .command
        .into_budget_command()
        .ok_or_else(|| anyhow!("Command is not a budget command"))?;

    let backend = Backend::init(CsvStore::new(connection))?;
    let outcome = backend.execute(&user, command);
    backend.teardown()?;
    let response = outcome?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.message);
    }
    Ok(())
}
