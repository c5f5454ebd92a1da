use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }
}

/// A single downloadable link extracted from an upstream response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkDescriptor {
    pub url: String,
    pub label: String,
    pub media_kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
    /// Lower-cased extension the kind was classified from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

/// Residual top-level scalar field, shown in the details panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    pub key: String,
    pub label: String,
    pub value: Value,
}

impl MetadataEntry {
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub title: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub summary: Summary,
    pub links: Vec<LinkDescriptor>,
    pub metadata: Vec<MetadataEntry>,
}

impl NormalizedResponse {
    pub fn links_of_kind(&self, kind: MediaKind) -> impl Iterator<Item = &LinkDescriptor> {
        self.links.iter().filter(move |link| link.media_kind == kind)
    }
}
