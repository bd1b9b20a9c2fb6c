use anyhow::Result;
use colored::Colorize;
use plainwiki_core::WikiConfig;
use plainwiki_server::WikiServer;

pub async fn run(config: WikiConfig, bind: Option<String>) -> Result<()> {
    let config = match bind {
        Some(bind) => config.with_bind(bind),
        None => config,
    };

    println!("{}", "Starting plainwiki server...".bold().cyan());
    println!("   {}: {:?}", "Pages".bold(), config.pages_path());
    println!("   {}: {:?}", "Assets".bold(), config.assets_path());

    let server = WikiServer::new(config)?;
    let addr = server.bind_addr()?;

    println!(
        "   {}: {}",
        "Listening".bold(),
        format!("http://{}", addr).green()
    );
    println!();
    println!("{}", "Press Ctrl+C to stop".dimmed());
    println!();

    server.serve().await?;

    Ok(())
}
