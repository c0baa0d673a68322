use serde::{Deserialize, Serialize};

/// Content of one slide: everything the deck controller treats as opaque.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Text {
        text: String,
        #[serde(default)]
        muted: bool,
    },
    Bullets {
        items: Vec<String>,
    },
    Stats {
        cards: Vec<StatCard>,
    },
    Table {
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
    },
    Steps {
        items: Vec<Step>,
    },
    Demo {
        link: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
        /// Print the link description under the button.
        #[serde(default)]
        show_description: bool,
    },
    Callout {
        text: String,
    },
}

fn default_heading_level() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatCard {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
