use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::links::{DEFAULT_API_BASE_URL, DEFAULT_ORIGIN, LinkSettings};
use crate::qr::{DEFAULT_QR_URL, PRESENTATION_QR_SIZE, QrSize};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "pitchdeck";

pub const API_BASE_URL_ENV: &str = "PITCHDECK_API_BASE_URL";
/// Variable existing web deployments set in `.env.local`; read after
/// [`API_BASE_URL_ENV`].
pub const WEB_API_BASE_URL_ENV: &str = "NEXT_PUBLIC_API_BASE_URL";
pub const ORIGIN_ENV: &str = "PITCHDECK_ORIGIN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr: Option<QrConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Base URL of the demo API. `PITCHDECK_API_BASE_URL` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Origin that relative demo paths are served from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QrConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<QrSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl QrConfig {
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_QR_URL)
    }

    /// Overlay size; the presenter shows the large code unless configured.
    pub fn size(&self) -> QrSize {
        self.size.unwrap_or(PRESENTATION_QR_SIZE)
    }

    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Load `.env.local` and `.env` from the working directory. Values already in
/// the environment win.
pub fn load_env_files() {
    for name in [".env.local", ".env"] {
        match dotenvy::from_filename(name) {
            Ok(path) => log::debug!("loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Failed to load {name}: {e}"),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pick the first non-empty value: environment, config file, default.
fn resolve_setting(env: Option<String>, file: Option<&str>, default: &str) -> String {
    non_blank(env)
        .or_else(|| {
            file.filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `pitchdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# pitchdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the link settings once for this process.
    pub fn link_settings(&self) -> LinkSettings {
        self.link_settings_with(|name| std::env::var(name).ok())
    }

    fn link_settings_with(&self, env: impl Fn(&str) -> Option<String>) -> LinkSettings {
        let links = self.links.clone().unwrap_or_default();
        let api_base_url = resolve_setting(
            non_blank(env(API_BASE_URL_ENV)).or_else(|| env(WEB_API_BASE_URL_ENV)),
            links.api_base_url.as_deref(),
            DEFAULT_API_BASE_URL,
        );
        let origin = resolve_setting(env(ORIGIN_ENV), links.origin.as_deref(), DEFAULT_ORIGIN);
        log::debug!("api base url: {api_base_url}, origin: {origin}");

        let mut settings = LinkSettings::new(&api_base_url, &origin);
        settings.extra = links.extra;
        settings
    }

    pub fn qr(&self) -> QrConfig {
        self.qr.clone().unwrap_or_default()
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let slide = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid start_slide: {value}. Must be a slide number (1-based).")
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(slide);
            }
            "links.api_base_url" | "links.origin" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    anyhow::bail!("Invalid URL: {value}. Must start with http:// or https://.");
                }
                let links = self.links.get_or_insert_with(LinksConfig::default);
                if key == "links.origin" {
                    links.origin = Some(value.to_string());
                } else {
                    links.api_base_url = Some(value.to_string());
                }
            }
            "qr.url" => {
                self.qr.get_or_insert_with(QrConfig::default).url = Some(value.to_string());
            }
            "qr.size" => {
                let size = QrSize::from_name(value).ok_or_else(|| {
                    anyhow::anyhow!("Invalid QR size: {value}. Must be 'sm', 'md', 'lg', or 'xl'.")
                })?;
                self.qr.get_or_insert_with(QrConfig::default).size = Some(size);
            }
            "qr.enabled" => {
                let enabled = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid value for qr.enabled: {value}. Must be 'true' or 'false'."),
                };
                self.qr.get_or_insert_with(QrConfig::default).enabled = Some(enabled);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.theme, defaults.start_slide, links.api_base_url, links.origin, qr.url, qr.size, qr.enabled"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Config::default().link_settings_with(no_env);
        assert_eq!(settings.api_base_url, "http://localhost:8000");
        assert_eq!(settings.origin, "http://localhost:3000");
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_config_file_overrides_default() {
        let mut config = Config::default();
        config.set("links.api_base_url", "https://api.example.com").unwrap();
        let settings = config.link_settings_with(no_env);
        assert_eq!(settings.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_env_overrides_config_file() {
        let mut config = Config::default();
        config.set("links.api_base_url", "https://file.example.com").unwrap();
        config.set("links.origin", "https://deck.example.com").unwrap();
        let settings = config.link_settings_with(|name| {
            (name == API_BASE_URL_ENV).then(|| "https://env.example.com/".to_string())
        });
        assert_eq!(settings.api_base_url, "https://env.example.com");
        assert_eq!(settings.origin, "https://deck.example.com");

        // The web deployment variable also beats the config file
        let settings = config.link_settings_with(|name| {
            (name == WEB_API_BASE_URL_ENV).then(|| "https://web.example.com".to_string())
        });
        assert_eq!(settings.api_base_url, "https://web.example.com");

        // but yields to the pitchdeck variable when both are set
        let settings = config.link_settings_with(|name| match name {
            API_BASE_URL_ENV => Some("https://env.example.com".to_string()),
            WEB_API_BASE_URL_ENV => Some("https://web.example.com".to_string()),
            _ => None,
        });
        assert_eq!(settings.api_base_url, "https://env.example.com");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let settings = Config::default().link_settings_with(|_| Some("  ".to_string()));
        assert_eq!(settings.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_set_validation() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "sepia").is_err());
        assert!(config.set("defaults.start_slide", "0").is_err());
        assert!(config.set("links.origin", "deck.example.com").is_err());
        assert!(config.set("qr.size", "huge").is_err());
        assert!(config.set("qr.enabled", "maybe").is_err());
        assert!(config.set("nope", "1").is_err());

        config.set("defaults.start_slide", "4").unwrap();
        config.set("qr.size", "xl").unwrap();
        config.set("qr.enabled", "off").unwrap();
        assert_eq!(config.defaults.as_ref().unwrap().start_slide, Some(4));
        assert_eq!(config.qr().size(), QrSize::Xl);
        assert!(!config.qr().enabled());
        assert_eq!(config.qr().url(), DEFAULT_QR_URL);
    }

    #[test]
    fn test_presenter_qr_defaults_to_large() {
        let qr = Config::default().qr();
        assert_eq!(qr.size(), QrSize::Xl);
        assert_eq!(qr.size().pixels(), 300);
        assert!(qr.enabled());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("links.api_base_url", "https://api.example.com").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme_name(), Some("dark"));
        assert_eq!(
            loaded.links.unwrap().api_base_url.as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn test_extra_links_from_yaml() {
        let yaml = "links:\n  extra:\n    PRICING: ${API_BASE_URL}/pricing\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let settings = config.link_settings_with(no_env);
        assert_eq!(
            settings.extra.get("PRICING").map(String::as_str),
            Some("${API_BASE_URL}/pricing")
        );
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
