use anyhow::Result;
use clap::Parser;
use log::info;

use student_cli::cli::app::Commands;
use student_cli::cli::{Cli, commands};
use student_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("student-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let args = Cli::parse();
    info!("Starting student-cli");

    let config = Config::load().await?;

    match args.command {
        Commands::Student(student_args) => {
            commands::student_command(student_args, &config).await?;
        }
        Commands::Category(category_args) => {
            commands::category_command(category_args, &config).await?;
        }
        Commands::Config(config_args) => {
            commands::config_command(config_args, &config).await?;
        }
    }

    Ok(())
}
