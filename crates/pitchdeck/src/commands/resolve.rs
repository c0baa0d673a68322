use colored::Colorize;

use crate::config::Config;
use crate::links::{self, DemoLinkTable};

/// Print the URL a demo key resolves to. Unknown keys print `#`.
pub fn run(key: &str, fallback: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let table = DemoLinkTable::new(config.link_settings());
    let url = table.resolve_key(key, fallback);

    println!("{url}");
    if !links::is_resolved(&url) {
        eprintln!("{} no demo link registered for {key}", "warning:".yellow());
    } else if let Some(description) = table.describe_key(key) {
        eprintln!("{}", description.dimmed());
    }
    Ok(())
}
