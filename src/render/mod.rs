use crate::media::{MediaKind, NormalizedResponse};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(response: &NormalizedResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(response)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(response).context("Failed to serialize result")
        }
    }
}

pub fn render_text(response: &NormalizedResponse) -> String {
    let mut out = String::new();
    let summary = &response.summary;

    let _ = writeln!(out, "{}", summary.title.as_deref().unwrap_or("Download Ready"));
    if let Some(author) = &summary.author {
        let _ = writeln!(out, "by {}", author);
    }
    if let Some(thumbnail) = &summary.thumbnail {
        let _ = writeln!(out, "Thumbnail: {}", thumbnail);
    }

    let _ = writeln!(out);
    if response.links.is_empty() {
        let _ = writeln!(out, "No direct download links found. Try checking the source.");
    } else {
        let _ = writeln!(out, "Available formats ({}):", kind_counts(response));
        for (i, link) in response.links.iter().enumerate() {
            let size = link
                .size_label
                .as_ref()
                .map(|s| format!(" ({})", s))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {}. [{}] {}{}\n     {}",
                i + 1,
                link.media_kind.as_str(),
                link.label,
                size,
                link.url
            );
        }
    }

    if !response.metadata.is_empty() {
        let _ = writeln!(out, "\nDetails:");
        for entry in &response.metadata {
            let _ = writeln!(out, "  {}: {}", entry.label, entry.display_value());
        }
    }

    out
}

fn kind_counts(response: &NormalizedResponse) -> String {
    [MediaKind::Video, MediaKind::Audio, MediaKind::Image]
        .into_iter()
        .filter_map(|kind| match response.links_of_kind(kind).count() {
            0 => None,
            n => Some(format!("{} {}", n, kind.as_str())),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
