use anyhow::Result;
use std::path::PathBuf;

pub fn run(file: Option<PathBuf>) -> Result<()> {
    let text = super::read_input(file)?;
    print!("{}", plainwiki_core::render(&text));
    Ok(())
}
