//! Demo deep links.
//!
//! Every demo button names a [`DemoLink`]; the table turns it into an absolute
//! URL using the configured API base URL and page origin. Resolution never
//! fails: an unknown key degrades to [`UNRESOLVED`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub const API_BASE_URL_PLACEHOLDER: &str = "${API_BASE_URL}";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Sentinel for "no link available". Buttons pointing here are disabled.
pub const UNRESOLVED: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DemoLink {
    CompetitorAnalysisReport,
    ChatDemo,
    PolicyReport,
    VideoDemo,
    ApiDocs,
    GithubRepo,
}

impl DemoLink {
    pub const ALL: [DemoLink; 6] = [
        DemoLink::CompetitorAnalysisReport,
        DemoLink::ChatDemo,
        DemoLink::PolicyReport,
        DemoLink::VideoDemo,
        DemoLink::ApiDocs,
        DemoLink::GithubRepo,
    ];

    /// Symbolic name used in deck files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::CompetitorAnalysisReport => "COMPETITOR_ANALYSIS_REPORT",
            Self::ChatDemo => "CHAT_DEMO",
            Self::PolicyReport => "POLICY_REPORT",
            Self::VideoDemo => "VIDEO_DEMO",
            Self::ApiDocs => "API_DOCS",
            Self::GithubRepo => "GITHUB_REPO",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::CompetitorAnalysisReport => {
                "${API_BASE_URL}/report/task/177e59a6-c960-4b31-9740-231b91be231f"
            }
            Self::ChatDemo => "/chat-mvp-demo.html",
            Self::PolicyReport => {
                "${API_BASE_URL}/report/policy/41f4074c-dc14-4266-bdaf-2b7edd8abac5"
            }
            Self::VideoDemo => {
                "https://cdn.shotstack.io/au/v1/qhwk4yr1p3/ef204875-40d5-43d0-bc98-adaa56778d7b.mp4"
            }
            Self::ApiDocs => "${API_BASE_URL}/docs",
            Self::GithubRepo => "https://github.com/creators/creatorflow-ai",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::CompetitorAnalysisReport => {
                "Interactive HTML report with competitor analysis, strategies and insights"
            }
            Self::ChatDemo => {
                "Static chat with ready-made AI recommendations and the final generation prompt"
            }
            Self::PolicyReport => "Detailed policy report with recommendations and action items",
            Self::VideoDemo => "Sample generated video creative with TTS voice-over and editing",
            Self::ApiDocs => "Full API documentation with live endpoint testing",
            Self::GithubRepo => "CreatorFlow AI source code on GitHub",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|link| link.key() == key)
    }
}

impl fmt::Display for DemoLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Addresses the link templates are resolved against. Resolved once at
/// startup (see `Config::link_settings`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub api_base_url: String,
    pub origin: String,
    /// Configuration-supplied keys beyond the built-in set.
    pub extra: BTreeMap<String, String>,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_ORIGIN)
    }
}

impl LinkSettings {
    pub fn new(api_base_url: &str, origin: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim().trim_end_matches('/').to_string(),
            origin: origin.trim().trim_end_matches('/').to_string(),
            extra: BTreeMap::new(),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_extra(mut self, key: &str, template: &str) -> Self {
        self.extra.insert(key.to_string(), template.to_string());
        self
    }

    /// True when the deck is served from a local development host.
    pub fn is_development(&self) -> bool {
        matches!(host_of(&self.origin), "localhost" | "127.0.0.1")
    }
}

fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or(rest);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    host_port.split(':').next().unwrap_or(host_port)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub key: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DemoLinkTable {
    settings: LinkSettings,
}

impl DemoLinkTable {
    pub fn new(settings: LinkSettings) -> Self {
        for key in settings.extra.keys() {
            if DemoLink::from_key(key).is_some() {
                log::warn!("extra link {key} shadows a built-in link and will be ignored");
            }
        }
        Self { settings }
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    pub fn resolve(&self, link: DemoLink) -> String {
        self.expand(link.template())
    }

    /// Resolve a symbolic key from the open key set. Unknown keys fall back to
    /// `fallback`, or to [`UNRESOLVED`] when none is given.
    pub fn resolve_key(&self, key: &str, fallback: Option<&str>) -> String {
        if let Some(link) = DemoLink::from_key(key) {
            return self.resolve(link);
        }
        if let Some(template) = self.settings.extra.get(key) {
            return self.expand(template);
        }
        log::debug!("no demo link registered for {key}");
        match fallback {
            Some(url) if !url.is_empty() && url != UNRESOLVED => self.expand(url),
            _ => UNRESOLVED.to_string(),
        }
    }

    pub fn describe(&self, link: DemoLink) -> Option<&'static str> {
        Some(link.description())
    }

    pub fn describe_key(&self, key: &str) -> Option<&'static str> {
        DemoLink::from_key(key).and_then(|link| self.describe(link))
    }

    /// Every registered link, built-ins first, resolved.
    pub fn entries(&self) -> Vec<ResolvedLink> {
        let builtin = DemoLink::ALL.into_iter().map(|link| ResolvedLink {
            key: link.key().to_string(),
            url: self.resolve(link),
            description: self.describe(link).map(str::to_string),
        });
        let extra = self
            .settings
            .extra
            .iter()
            .filter(|(key, _)| DemoLink::from_key(key).is_none())
            .map(|(key, template)| ResolvedLink {
                key: key.clone(),
                url: self.expand(template),
                description: None,
            });
        builtin.chain(extra).collect()
    }

    fn expand(&self, template: &str) -> String {
        let url = template.replace(API_BASE_URL_PLACEHOLDER, &self.settings.api_base_url);
        if url.starts_with('/') {
            format!("{}{url}", self.settings.origin)
        } else {
            url
        }
    }
}

pub fn is_resolved(url: &str) -> bool {
    url != UNRESOLVED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DemoLinkTable {
        DemoLinkTable::new(LinkSettings::new(
            "https://api.example.com",
            "https://deck.example.com",
        ))
    }

    #[test]
    fn test_templated_links_use_base_url() {
        let table = table();
        for link in [
            DemoLink::CompetitorAnalysisReport,
            DemoLink::PolicyReport,
            DemoLink::ApiDocs,
        ] {
            let url = table.resolve(link);
            assert!(url.starts_with("https://api.example.com/"), "{url}");
            assert!(!url.contains("${"), "{url}");
        }
        assert_eq!(
            table.resolve(DemoLink::ApiDocs),
            "https://api.example.com/docs"
        );
    }

    #[test]
    fn test_relative_link_uses_origin() {
        assert_eq!(
            table().resolve(DemoLink::ChatDemo),
            "https://deck.example.com/chat-mvp-demo.html"
        );
    }

    #[test]
    fn test_absolute_link_is_untouched() {
        assert_eq!(
            table().resolve(DemoLink::VideoDemo),
            DemoLink::VideoDemo.template()
        );
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let table = table();
        assert_eq!(table.resolve_key("NONEXISTENT_KEY", None), "#");
        assert_eq!(
            table.resolve_key("NONEXISTENT_KEY", Some("https://fallback.example.com")),
            "https://fallback.example.com"
        );
        assert_eq!(
            table.resolve_key("NONEXISTENT_KEY", Some("/offline.html")),
            "https://deck.example.com/offline.html"
        );
        assert_eq!(table.resolve_key("NONEXISTENT_KEY", Some("")), "#");
    }

    #[test]
    fn test_known_key_ignores_fallback() {
        assert_eq!(
            table().resolve_key("API_DOCS", Some("https://fallback.example.com")),
            "https://api.example.com/docs"
        );
    }

    #[test]
    fn test_extra_keys() {
        let settings = LinkSettings::new("https://api.example.com", "https://deck.example.com")
            .with_extra("PRICING", "${API_BASE_URL}/pricing")
            .with_extra("API_DOCS", "https://shadowed.example.com");
        let table = DemoLinkTable::new(settings);
        assert_eq!(
            table.resolve_key("PRICING", None),
            "https://api.example.com/pricing"
        );
        assert_eq!(
            table.resolve_key("API_DOCS", None),
            "https://api.example.com/docs"
        );
        assert_eq!(table.describe_key("PRICING"), None);

        let keys: Vec<String> = table.entries().into_iter().map(|e| e.key).collect();
        assert_eq!(keys.len(), DemoLink::ALL.len() + 1);
        assert_eq!(keys.last().map(String::as_str), Some("PRICING"));
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let table = DemoLinkTable::new(LinkSettings::new(
            "https://api.example.com/",
            "https://deck.example.com//",
        ));
        assert_eq!(
            table.resolve(DemoLink::ApiDocs),
            "https://api.example.com/docs"
        );
        assert_eq!(
            table.resolve(DemoLink::ChatDemo),
            "https://deck.example.com/chat-mvp-demo.html"
        );
    }

    #[test]
    fn test_key_round_trip() {
        for link in DemoLink::ALL {
            assert_eq!(DemoLink::from_key(link.key()), Some(link));
        }
        assert_eq!(DemoLink::from_key("chat_demo"), None);
    }

    #[test]
    fn test_describe() {
        let table = table();
        assert!(table.describe_key("CHAT_DEMO").is_some());
        assert_eq!(table.describe_key("NONEXISTENT_KEY"), None);
    }

    #[test]
    fn test_development_origin() {
        assert!(LinkSettings::default().is_development());
        assert!(LinkSettings::new(DEFAULT_API_BASE_URL, "http://127.0.0.1:8080").is_development());
        assert!(!LinkSettings::new(DEFAULT_API_BASE_URL, "https://deck.example.com").is_development());
    }

    #[test]
    fn test_is_resolved() {
        assert!(!is_resolved(UNRESOLVED));
        assert!(is_resolved("https://example.com"));
    }
}
