use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{API_BASE_URL_ENV, Config, ORIGIN_ENV, WEB_API_BASE_URL_ENV};

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".dimmed(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let yaml = serde_yaml::to_string(&config)?;
    if yaml.trim() == "{}" {
        println!("{}", "# empty".dimmed());
    } else {
        print!("{yaml}");
    }
    println!();

    let settings = config.link_settings();
    let qr = config.qr();
    println!("{}", "Effective settings".bold());
    let base_url_note = match env_note(API_BASE_URL_ENV) {
        note if note.is_empty() => env_note(WEB_API_BASE_URL_ENV),
        note => note,
    };
    println!("  api_base_url  {}{base_url_note}", settings.api_base_url);
    println!("  origin        {}{}", settings.origin, env_note(ORIGIN_ENV));
    println!(
        "  theme         {}",
        config.theme_name().unwrap_or("dark")
    );
    println!(
        "  qr            {} ({}, {})",
        qr.url(),
        qr.size(),
        if qr.enabled() { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn env_note(name: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => format!("  {}", format!("(from {name})").yellow()),
        _ => String::new(),
    }
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let path = Config::path()?;
    // A broken file is reported rather than overwritten
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };
    config.set(key, value)?;
    config.save_to(&path)?;
    println!("{} {key} = {value}", "✓".green());
    println!("  {}", path.display().to_string().dimmed());
    Ok(())
}
