use anyhow::Result;
use colored::Colorize;
use plainwiki_core::{LineClass, WikiConfig, WikiService};

pub fn run(config: &WikiConfig, title: &str, limit: Option<usize>) -> Result<()> {
    let title = super::parse_title(title)?;
    let wiki = WikiService::from_config(config)?;
    let history = wiki.history(title.as_str())?;

    let total = history.entries().count();
    if total == 0 {
        println!("{}", "No history yet".yellow());
        return Ok(());
    }

    println!("{}", format!("History of {}", title).bold().cyan());
    println!();

    let to_show = limit.unwrap_or(total).min(total);
    let skip = total - to_show;

    for (i, entry) in history.entries().enumerate().skip(skip) {
        println!(
            "{} {}",
            format!("revision {}", i + 1).yellow().bold(),
            entry.formatted_timestamp().dimmed()
        );

        for hunk in &entry.diff.hunks {
            println!("{}", hunk.header().bright_black());
            let sections = [
                (hunk.has_removals(), &hunk.old),
                (hunk.has_additions(), &hunk.new),
            ];
            for (shown, lines) in sections {
                if !shown {
                    continue;
                }
                for line in lines {
                    let text = format!(
                        "{}{}",
                        line.tag.marker(),
                        line.text.trim_end_matches(['\n', '\r'])
                    );
                    let text = match LineClass::from(line.tag) {
                        LineClass::Add => text.green(),
                        LineClass::Del => text.red(),
                        LineClass::Mod => text.yellow(),
                        LineClass::Context => text.normal(),
                    };
                    println!("{}", text);
                }
            }
        }
        println!();
    }

    if skip > 0 {
        println!(
            "{}",
            format!("... {} earlier revision(s) not shown", skip).dimmed()
        );
    }

    Ok(())
}
