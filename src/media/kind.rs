use super::types::MediaKind;
use url::Url;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "wav", "aac", "ogg"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "heic"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "avi", "flv"];

/// Result of classifying one candidate link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: MediaKind,
    /// Lower-cased extension used for the decision, if one was found.
    pub extension: Option<String>,
    /// True when no known extension decided the kind and it fell back to video.
    pub fallback: bool,
}

/// Returns the last path segment of `url` without query string or fragment.
///
/// Absolute URLs go through [`Url`] so a host is never mistaken for a path;
/// relative ones such as `a.mp4` are split by hand.
pub fn last_path_segment(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string();
    }

    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Extension of the URL's last path segment, e.g. `MP4` for
/// `https://cdn.test/v/clip.MP4?sig=1`. Not lower-cased.
pub fn extension_from_url(url: &str) -> Option<String> {
    let segment = last_path_segment(url);
    match segment.rfind('.') {
        Some(idx) if idx + 1 < segment.len() => Some(segment[idx + 1..].to_string()),
        _ => None,
    }
}

pub fn kind_for_extension(ext: &str) -> Option<MediaKind> {
    if AUDIO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Audio)
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Classifies a candidate from its declared extension, the `audioAvailable`
/// flag and its URL.
///
/// A declared `mp3` extension or an explicit `audioAvailable: false` always
/// wins. Otherwise the declared extension (or the one derived from the URL)
/// is matched against the known sets, defaulting to video.
pub fn classify(
    url: &str,
    declared_ext: Option<&str>,
    audio_available: Option<bool>,
) -> Classification {
    let declared_ext = declared_ext.filter(|e| !e.is_empty());
    let extension = match declared_ext {
        Some(ext) => Some(ext.to_lowercase()),
        None => extension_from_url(url).map(|e| e.to_lowercase()),
    };

    if declared_ext == Some("mp3") || audio_available == Some(false) {
        return Classification {
            kind: MediaKind::Audio,
            extension,
            fallback: false,
        };
    }

    match extension.as_deref().and_then(kind_for_extension) {
        Some(kind) => Classification {
            kind,
            extension,
            fallback: false,
        },
        None => Classification {
            kind: MediaKind::Video,
            extension,
            fallback: true,
        },
    }
}
