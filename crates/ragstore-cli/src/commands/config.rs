use std::path::Path;

use anyhow::Result;
use console::style;

use ragstore_core::config::{Config, CONFIG_KEYS};

use super::ConfigCommands;

/// Handle the config subcommands against ~/.ragstore/config.toml
pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    let path = Config::get_config_path()?;
    run_config_command(command, &path)
}

fn run_config_command(command: ConfigCommands, path: &Path) -> Result<()> {
    let mut config = Config::load_from(path)?;

    match command {
        ConfigCommands::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("Config key '{key}' is not set"),
        },
        ConfigCommands::Set { key, value } => {
            config.set(&key, value)?;
            config.save_to(path)?;
            println!(
                "{} {} = {}",
                style("✓").green(),
                style(&key).cyan(),
                config.get(&key).unwrap_or_default()
            );
        }
        ConfigCommands::Unset { key } => {
            config.unset(&key)?;
            config.save_to(path)?;
            println!("{} {} removed", style("✓").green(), style(&key).cyan());
        }
        ConfigCommands::List => print_config(&config, path),
    }

    Ok(())
}

fn print_config(config: &Config, path: &Path) {
    let items = config.list();

    if items.is_empty() {
        println!("{}", style("No configuration set. Known keys:").dim());
        for key in CONFIG_KEYS {
            println!("  {}", style(key).cyan());
        }
        return;
    }

    for (key, value) in items {
        println!("{} = {}", style(key).cyan(), value);
    }
    println!("{}", style(format!("# {}", path.display())).dim());
}
