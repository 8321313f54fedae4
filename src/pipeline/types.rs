//! Pipeline data model

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Heading level used when the provider gives none we recognise
pub const DEFAULT_HEADING_LEVEL: &str = "h2";

static HEADING_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bh([1-6])\b").expect("valid heading level pattern"));

/// Topic, title and word lists shared by the content-generation steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub title: Option<String>,
    pub keywords: Vec<String>,
    pub exclusions: Vec<String>,
}

/// A structural marker in the post
///
/// Serialized as `{"kind":"heading","level":"h2","text":...}` or
/// `{"kind":"image","description":...}`. The provider's own shape
/// (`{"type":"h2","content":...}` / `{"type":"image","image_description":...}`)
/// is accepted on input as well.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Heading {
    Heading { level: String, text: String },
    Image { description: String },
}

impl Heading {
    pub fn heading(level: impl Into<String>, text: impl Into<String>) -> Self {
        Heading::Heading {
            level: level.into(),
            text: text.into(),
        }
    }

    pub fn image(description: impl Into<String>) -> Self {
        Heading::Image {
            description: description.into(),
        }
    }

    /// Text shown for the heading: its title or the image description
    pub fn label(&self) -> &str {
        match self {
            Heading::Heading { text, .. } => text,
            Heading::Image { description } => description,
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TaggedHeading {
    Heading {
        #[serde(default)]
        level: Option<String>,
        text: String,
    },
    Image {
        description: String,
    },
}

#[derive(Deserialize)]
struct ProviderHeading {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    image_description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeadingRepr {
    Tagged(TaggedHeading),
    Provider(ProviderHeading),
}

fn normalize_level(raw: Option<&str>) -> String {
    raw.and_then(|s| HEADING_LEVEL.captures(s))
        .map(|c| format!("h{}", &c[1]))
        .unwrap_or_else(|| DEFAULT_HEADING_LEVEL.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<HeadingRepr> for Heading {
    type Error = String;

    fn try_from(repr: HeadingRepr) -> Result<Self, Self::Error> {
        match repr {
            HeadingRepr::Tagged(TaggedHeading::Heading { level, text }) => {
                let text = non_empty(Some(text)).ok_or("heading without text")?;
                Ok(Heading::Heading {
                    level: normalize_level(level.as_deref()),
                    text,
                })
            }
            HeadingRepr::Tagged(TaggedHeading::Image { description }) => {
                let description =
                    non_empty(Some(description)).ok_or("image without description")?;
                Ok(Heading::Image { description })
            }
            HeadingRepr::Provider(raw) => {
                if raw.kind.to_ascii_lowercase().contains("image") {
                    let description = non_empty(raw.image_description)
                        .or_else(|| non_empty(raw.content))
                        .ok_or("image without description")?;
                    Ok(Heading::Image { description })
                } else {
                    let text = non_empty(raw.content)
                        .or_else(|| non_empty(raw.image_description))
                        .ok_or("heading without text")?;
                    Ok(Heading::Heading {
                        level: normalize_level(Some(&raw.kind)),
                        text,
                    })
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Heading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = HeadingRepr::deserialize(deserializer)?;
        Heading::try_from(repr).map_err(de::Error::custom)
    }
}

/// One entry of the assembled post, in reading order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlogContentItem {
    Title { value: String },
    Heading { level: String, value: String },
    /// Marker emitted for an image heading, holding its description
    Caption { value: String },
    Paragraph { value: String },
    /// Resolved image URL
    Image { value: String },
}

impl BlogContentItem {
    pub fn value(&self) -> &str {
        match self {
            BlogContentItem::Title { value }
            | BlogContentItem::Heading { value, .. }
            | BlogContentItem::Caption { value }
            | BlogContentItem::Paragraph { value }
            | BlogContentItem::Image { value } => value,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BlogContentItem::Title { .. } => "title",
            BlogContentItem::Heading { .. } => "heading",
            BlogContentItem::Caption { .. } => "caption",
            BlogContentItem::Paragraph { .. } => "paragraph",
            BlogContentItem::Image { .. } => "image",
        }
    }
}

/// Assembled post body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogContent {
    #[serde(rename = "blogContent")]
    pub blog_content: Vec<BlogContentItem>,
}

/// An HTML meta tag suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    pub title: String,
    pub meta: Vec<MetaTag>,
    pub content: BlogContent,
    pub keywords: Vec<String>,
    pub topic: String,
    pub outline: String,
}
