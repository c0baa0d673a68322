use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use regex::Regex;

use crate::config::Config;
use crate::links::API_BASE_URL_PLACEHOLDER;

/// Substitute every API base URL placeholder. Returns the new content and
/// the number of replacements made.
///
/// Also covers the `NEXT_PUBLIC_API_BASE_URL: '${API_BASE_URL}'` form, whose
/// placeholder is the same token.
pub fn substitute(content: &str, api_base_url: &str) -> anyhow::Result<(String, usize)> {
    let re = Regex::new(&regex::escape(API_BASE_URL_PLACEHOLDER))?;
    let count = re.find_iter(content).count();
    let replaced = re
        .replace_all(content, regex::NoExpand(api_base_url))
        .into_owned();
    Ok((replaced, count))
}

fn prepare_file(path: &Path, api_base_url: &str) -> anyhow::Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (replaced, count) = substitute(&content, api_base_url)?;
    if count > 0 {
        std::fs::write(path, replaced)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(count)
}

pub fn run(files: &[PathBuf]) -> anyhow::Result<()> {
    let settings = Config::load_or_default().link_settings();
    println!("{} {}", "API base URL:".dimmed(), settings.api_base_url);

    let mut failed = 0;
    for path in files {
        if !path.exists() {
            println!("{} File not found: {}", "!".yellow(), path.display());
            continue;
        }
        match prepare_file(path, &settings.api_base_url) {
            Ok(0) => println!("{} {} (no placeholders)", "-".dimmed(), path.display()),
            Ok(n) => println!("{} Updated {} ({n} replaced)", "✓".green(), path.display()),
            Err(e) => {
                log::error!("{e:#}");
                println!("{} {}", "✗".red(), path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} file(s) could not be prepared");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_all_occurrences() {
        let html = r#"<script>
  window.ENV = { NEXT_PUBLIC_API_BASE_URL: '${API_BASE_URL}' };
  fetch("${API_BASE_URL}/chat");
</script>"#;
        let (out, count) = substitute(html, "https://api.example.com").unwrap();
        assert_eq!(count, 2);
        assert!(out.contains("NEXT_PUBLIC_API_BASE_URL: 'https://api.example.com'"));
        assert!(out.contains("fetch(\"https://api.example.com/chat\")"));
        assert!(!out.contains(API_BASE_URL_PLACEHOLDER));
    }

    #[test]
    fn test_substitute_does_not_expand_dollar_groups() {
        let (out, count) = substitute("x=${API_BASE_URL}", "http://host/$1").unwrap();
        assert_eq!(count, 1);
        assert_eq!(out, "x=http://host/$1");
    }

    #[test]
    fn test_prepare_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat-mvp-demo.html");
        std::fs::write(&path, "<a href=\"${API_BASE_URL}/docs\">docs</a>").unwrap();

        let count = prepare_file(&path, "http://localhost:8000").unwrap();
        assert_eq!(count, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "<a href=\"http://localhost:8000/docs\">docs</a>");

        // Second pass finds nothing left to replace
        assert_eq!(prepare_file(&path, "http://localhost:8000").unwrap(), 0);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.html");
        assert!(run(&[missing]).is_ok());
    }
}
