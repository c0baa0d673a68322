pub mod blocks;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::deck::{DeckError, SlideDeck, SlideDescriptor};

pub use blocks::{Block, SlideContent, StatCard, Step};

const BUILTIN_DECK: &str = include_str!("../../decks/creatorflow.yaml");

/// Background token used when a slide does not name one.
pub const DEFAULT_BACKGROUND: &str = "plain";

#[derive(Debug, Clone)]
pub struct Presentation {
    pub meta: PresentationMeta,
    pub slides: Vec<SlideDescriptor<SlideContent>>,
}

#[derive(Debug, Clone, Default)]
pub struct PresentationMeta {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    footer: Option<String>,
    #[serde(default)]
    slides: Vec<SlideEntry>,
}

#[derive(Debug, Deserialize)]
struct SlideEntry {
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    blocks: Vec<Block>,
}

pub fn parse(content: &str) -> Result<Presentation> {
    let file: DeckFile = serde_yaml::from_str(content).context("Invalid deck file")?;
    let slides = file
        .slides
        .into_iter()
        .map(|entry| {
            SlideDescriptor::new(
                entry.title,
                entry
                    .background
                    .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
                SlideContent {
                    subtitle: entry.subtitle,
                    blocks: entry.blocks,
                },
            )
        })
        .collect();
    Ok(Presentation {
        meta: PresentationMeta {
            title: file.title,
            theme: file.theme,
            footer: file.footer,
        },
        slides,
    })
}

pub fn load(path: &Path) -> Result<Presentation> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to load deck {}", path.display()))
}

/// The CreatorFlow pitch deck compiled into the binary.
pub fn builtin() -> Result<Presentation> {
    parse(BUILTIN_DECK).context("Built-in deck is invalid")
}

pub fn load_or_builtin(path: Option<&Path>) -> Result<Presentation> {
    match path {
        Some(path) => load(path),
        None => builtin(),
    }
}

impl Presentation {
    /// Hand the slides to a navigation controller. Fails for an empty deck.
    pub fn into_deck(self) -> Result<(PresentationMeta, SlideDeck<SlideContent>), DeckError> {
        let deck = SlideDeck::new(self.slides)?;
        Ok((self.meta, deck))
    }

    /// Every demo link key referenced by the slides, in order of appearance.
    pub fn demo_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for slide in &self.slides {
            for block in &slide.content.blocks {
                if let Block::Demo { link, .. } = block {
                    if !keys.contains(&link.as_str()) {
                        keys.push(link);
                    }
                }
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::DemoLink;
    use std::io::Write;

    #[test]
    fn test_builtin_deck_parses() {
        let pres = builtin().unwrap();
        assert_eq!(pres.slides.len(), 18);
        assert_eq!(pres.meta.theme.as_deref(), Some("dark"));
        assert_eq!(pres.slides[0].title, "AI Growth Strategist");
        assert_eq!(pres.slides[17].title, "Conclusion");
    }

    #[test]
    fn test_builtin_demo_keys_are_known() {
        let pres = builtin().unwrap();
        let keys = pres.demo_keys();
        assert!(!keys.is_empty());
        for key in keys {
            assert!(DemoLink::from_key(key).is_some(), "unknown key {key}");
        }
    }

    #[test]
    fn test_block_kinds() {
        let content = r#"
slides:
  - title: Mixed
    blocks:
      - type: heading
        text: Hello
        level: 2
      - type: text
        text: Body
      - type: stats
        cards:
          - value: 10x
            label: faster
      - type: table
        headers: [A, B]
        rows:
          - [one, two]
      - type: demo
        link: CHAT_DEMO
"#;
        let pres = parse(content).unwrap();
        let blocks = &pres.slides[0].content.blocks;
        assert_eq!(blocks.len(), 5);
        assert!(matches!(blocks[0], Block::Heading { level: 2, .. }));
        assert!(matches!(blocks[1], Block::Text { muted: false, .. }));
        assert!(matches!(&blocks[4], Block::Demo { label: None, .. }));
        assert_eq!(pres.slides[0].background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_demo_show_description() {
        let content = r#"
slides:
  - title: Demos
    blocks:
      - type: demo
        link: CHAT_DEMO
        show_description: true
      - type: demo
        link: API_DOCS
"#;
        let pres = parse(content).unwrap();
        let blocks = &pres.slides[0].content.blocks;
        assert!(matches!(
            &blocks[0],
            Block::Demo { show_description: true, .. }
        ));
        assert!(matches!(
            &blocks[1],
            Block::Demo { show_description: false, .. }
        ));
    }

    #[test]
    fn test_unknown_block_type_is_an_error() {
        let content = "slides:\n  - title: Bad\n    blocks:\n      - type: video\n";
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_empty_deck_cannot_be_presented() {
        let pres = parse("title: Nothing here\n").unwrap();
        assert!(matches!(
            pres.into_deck(),
            Err(DeckError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "slides:\n  - title: One\n    background: red-gray\n  - title: Two"
        )
        .unwrap();
        let pres = load(file.path()).unwrap();
        let (_, deck) = pres.into_deck().unwrap();
        assert_eq!(deck.count(), 2);
        assert_eq!(deck.current().background, "red-gray");
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
