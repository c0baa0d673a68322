use colored::Colorize;

use crate::config::Config;
use crate::links::DemoLinkTable;

pub fn run(json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let table = DemoLinkTable::new(config.link_settings());
    let entries = table.entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let settings = table.settings();
    let origin_note = if settings.is_development() {
        " (development)".yellow().to_string()
    } else {
        String::new()
    };
    println!("{}", "Demo links".bold());
    println!("  {} {}", "API base URL:".dimmed(), settings.api_base_url);
    println!("  {} {}{origin_note}", "Origin:".dimmed(), settings.origin);
    println!();

    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    for entry in &entries {
        println!("  {}  {}", format!("{:width$}", entry.key).cyan(), entry.url);
        if let Some(description) = &entry.description {
            println!("  {:width$}  {}", "", description.dimmed());
        }
    }
    Ok(())
}
