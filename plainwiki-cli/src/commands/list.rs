use anyhow::Result;
use colored::Colorize;
use plainwiki_core::{WikiConfig, WikiService};

pub fn run(config: &WikiConfig) -> Result<()> {
    let wiki = WikiService::from_config(config)?;
    let titles = wiki.repository().titles()?;

    if titles.is_empty() {
        println!("{}", "No pages yet".yellow());
        return Ok(());
    }

    for title in titles {
        let revisions = wiki.history(&title)?.entries().count();
        println!("{} {}", title.bold(), format!("({} revisions)", revisions).dimmed());
    }

    Ok(())
}
