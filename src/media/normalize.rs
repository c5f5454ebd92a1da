use super::kind::{classify, Classification};
use super::types::{LinkDescriptor, MetadataEntry, NormalizedResponse, Summary};
use crate::utils::{capitalize, format_key_label, format_size_mb, is_empty_or_zero_or_null};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Top-level keys that are either consumed elsewhere or envelope noise.
const CONSUMED_KEYS: &[&str] = &[
    "status", "code", "success", "message", "medias", "url", "thumbnail", "title", "author",
];

/// Where the candidate links of a response come from. Resolved once per response.
#[derive(Debug)]
enum LinkSource<'a> {
    Medias(&'a [Value]),
    UrlList(&'a [Value]),
    SingleUrl(&'a str),
    Empty,
}

impl<'a> LinkSource<'a> {
    fn resolve(obj: &'a Map<String, Value>) -> Self {
        if let Some(Value::Array(medias)) = obj.get("medias") {
            return LinkSource::Medias(medias);
        }

        match obj.get("url") {
            Some(Value::Array(items)) => LinkSource::UrlList(items),
            Some(Value::String(url)) => LinkSource::SingleUrl(url),
            _ => LinkSource::Empty,
        }
    }

    fn candidates(&self) -> Vec<LinkDescriptor> {
        match self {
            LinkSource::Medias(items) => items.iter().filter_map(media_candidate).collect(),
            LinkSource::UrlList(items) => items.iter().filter_map(url_item_candidate).collect(),
            LinkSource::SingleUrl(url) => vec![build_link(url, None, None, None, None, None)],
            LinkSource::Empty => Vec::new(),
        }
    }
}

/// Normalizes a raw upstream response into renderable links and details.
///
/// Never fails: anything unrecognized simply produces empty collections.
pub fn normalize(response: &Value) -> NormalizedResponse {
    let Some(obj) = response.as_object() else {
        debug!("Response is not a JSON object, nothing to normalize");
        return NormalizedResponse::default();
    };

    let source = LinkSource::resolve(obj);
    debug!("Resolved link source: {}", source_name(&source));

    NormalizedResponse {
        summary: extract_summary(obj),
        links: dedup_links(source.candidates()),
        metadata: extract_metadata(obj),
    }
}

fn source_name(source: &LinkSource<'_>) -> &'static str {
    match source {
        LinkSource::Medias(_) => "medias",
        LinkSource::UrlList(_) => "url list",
        LinkSource::SingleUrl(_) => "single url",
        LinkSource::Empty => "none",
    }
}

fn non_empty_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn media_candidate(item: &Value) -> Option<LinkDescriptor> {
    let Some(url) = item.get("url").and_then(Value::as_str) else {
        debug!("Skipping media entry without a url: {}", item);
        return None;
    };

    Some(build_link(
        url,
        item.get("extension").and_then(Value::as_str),
        item.get("audioAvailable").and_then(Value::as_bool),
        non_empty_str(item, "quality"),
        non_empty_str(item, "formattedSize"),
        item.get("size").and_then(Value::as_f64),
    ))
}

fn url_item_candidate(item: &Value) -> Option<LinkDescriptor> {
    let Some(url) = item.get("url").and_then(Value::as_str) else {
        debug!("Skipping url entry without a url: {}", item);
        return None;
    };

    Some(build_link(
        url,
        item.get("ext").and_then(Value::as_str),
        None,
        non_empty_str(item, "quality"),
        None,
        None,
    ))
}

fn build_link(
    url: &str,
    declared_ext: Option<&str>,
    audio_available: Option<bool>,
    quality: Option<&str>,
    formatted_size: Option<&str>,
    size_bytes: Option<f64>,
) -> LinkDescriptor {
    let classification = classify(url, declared_ext, audio_available);

    let label = match quality {
        Some(q) => q.to_string(),
        None => default_label(&classification),
    };

    let size_label = formatted_size
        .map(str::to_string)
        .or_else(|| size_bytes.map(format_size_mb));

    LinkDescriptor {
        url: url.to_string(),
        label,
        media_kind: classification.kind,
        size_label,
        extension: classification.extension,
    }
}

fn default_label(classification: &Classification) -> String {
    let kind = if classification.fallback {
        "File".to_string()
    } else {
        capitalize(classification.kind.as_str())
    };

    match &classification.extension {
        Some(ext) => format!("Download {} .{}", kind, ext),
        None => format!("Download {}", kind),
    }
}

fn dedup_links(links: Vec<LinkDescriptor>) -> Vec<LinkDescriptor> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.url.clone()))
        .collect()
}

fn extract_summary(obj: &Map<String, Value>) -> Summary {
    let field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    Summary {
        title: field("title"),
        author: field("author"),
        thumbnail: field("thumbnail"),
        duration: field("duration"),
    }
}

fn extract_metadata(obj: &Map<String, Value>) -> Vec<MetadataEntry> {
    obj.iter()
        .filter(|(key, _)| !CONSUMED_KEYS.contains(&key.as_str()))
        .filter(|(_, value)| !value.is_object() && !value.is_array())
        .filter(|(_, value)| !is_empty_or_zero_or_null(value))
        .map(|(key, value)| MetadataEntry {
            key: key.clone(),
            label: format_key_label(key),
            value: value.clone(),
        })
        .collect()
}
