use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;

#[derive(Args)]
pub struct CategoryCommands {
    #[command(subcommand)]
    pub command: CategorySubcommands,
}

#[derive(Subcommand)]
pub enum CategorySubcommands {
    /// List the values of one category, or of all of them
    List {
        category: Option<String>,
    },
    /// Add a value to a category
    Add {
        category: String,
        value: String,
    },
    /// Remove a value from a category. Refused while any student record
    /// still references the value.
    Remove {
        category: String,
        value: String,
    },
}

const CATEGORIES: &[&str] = &["faculty", "status", "program"];

pub async fn category_command(args: CategoryCommands, config: &Config) -> Result<()> {
    match args.command {
        CategorySubcommands::List { category } => {
            let categories: Vec<&str> = match &category {
                Some(c) => vec![c.as_str()],
                None => CATEGORIES.to_vec(),
            };
            for category in categories {
                println!("{}:", category);
                for value in config.list_options(category).await? {
                    println!("  {}", value);
                }
            }
        }
        CategorySubcommands::Add { category, value } => {
            config.add_option(&category, &value).await?;
            println!("✓ Đã thêm '{}' vào {}", value, category);
        }
        CategorySubcommands::Remove { category, value } => {
            config.remove_option(&category, &value).await?;
            println!("✓ Đã xóa '{}' khỏi {}", value, category);
        }
    }

    Ok(())
}
