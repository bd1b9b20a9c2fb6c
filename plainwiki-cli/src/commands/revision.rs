use anyhow::Result;
use plainwiki_core::{WikiConfig, WikiService};

pub fn run(config: &WikiConfig, title: &str, index: usize) -> Result<()> {
    let title = super::parse_title(title)?;
    let wiki = WikiService::from_config(config)?;

    let content = wiki.revision_content(title.as_str(), index)?;
    print!("{}", content);

    Ok(())
}
