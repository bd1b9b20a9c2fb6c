use anyhow::Result;
use colored::Colorize;
use plainwiki_core::{WikiConfig, WikiService};
use std::path::PathBuf;

pub fn run(config: &WikiConfig, title: &str, file: Option<PathBuf>) -> Result<()> {
    let title = super::parse_title(title)?;
    let content = super::read_input(file)?;
    let wiki = WikiService::from_config(config)?;

    match wiki.save(title.as_str(), &content)? {
        Some(entry) => {
            println!("{}", format!("✓ Saved {}", title).green().bold());
            println!("  {}: {}", "Date".bold(), entry.formatted_timestamp());
            println!("  {}: {}", "Hunks".bold(), entry.diff.hunks.len());
        }
        None => {
            println!("{}", "No changes to save".yellow());
        }
    }

    Ok(())
}
