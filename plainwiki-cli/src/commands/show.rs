use anyhow::Result;
use colored::Colorize;
use plainwiki_core::{WikiConfig, WikiService};

pub fn run(config: &WikiConfig, title: &str, raw: bool) -> Result<()> {
    let title = super::parse_title(title)?;
    let wiki = WikiService::from_config(config)?;

    let Some(page) = wiki.load(title.as_str())? else {
        println!("{} {}", "No page named".yellow(), title.to_string().bold());
        println!("Create it with {}", format!("plainwiki save {title}").cyan());
        return Ok(());
    };

    if raw {
        print!("{}", page.content);
    } else {
        print!("{}", page.render());
    }

    Ok(())
}
