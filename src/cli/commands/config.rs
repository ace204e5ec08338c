use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::validation::Ruleset;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// List all configuration entries
    List,
    /// Show one configuration value
    Get {
        key: String,
    },
    /// Set a configuration value. Rule-bearing keys (phone pattern,
    /// transition table, deletion window) are parsed before being stored.
    Set {
        key: String,
        value: String,
    },
}

pub async fn config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::List => {
            for entry in config.list_config().await? {
                println!("{} = {}", entry.key, entry.value);
                if let Some(description) = &entry.description {
                    println!("    {}", description);
                }
            }
        }
        ConfigSubcommands::Get { key } => match config.get_config(&key).await? {
            Some(value) => println!("{}", value),
            None => println!("(not set)"),
        },
        ConfigSubcommands::Set { key, value } => {
            // Reject a value the rule engine could not load back
            Ruleset::check_value(&key, &value)?;
            config.set_config(&key, &value).await?;
            println!("✓ {} = {}", key, value);
        }
    }

    Ok(())
}
