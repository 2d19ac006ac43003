//! Local filename derivation for downloaded media.
//!
//! Nitter media URLs carry the upstream path percent-encoded in a single
//! segment (`/pic/media%2FabcXYZ.jpg`), so the basename is taken after
//! decoding. Extensionless names borrow one from the response Content-Type.

use std::path::{Component, Path};

use tracing::debug;
use url::Url;

/// Derives the local filename for `url`, using `content_type` only when the
/// URL basename has no extension.
///
/// # Examples
///
/// ```
/// use nitter_dl::download::resolve_filename;
///
/// assert_eq!(
///     resolve_filename("https://nitter.net/pic/media%2FabcXYZ.jpg?name=orig", "image/png"),
///     "abcXYZ.jpg"
/// );
/// assert_eq!(
///     resolve_filename("https://nitter.net/pic/media%2FabcXYZ", "image/png;charset=binary"),
///     "abcXYZ.png"
/// );
/// ```
#[must_use]
pub fn resolve_filename(url: &str, content_type: &str) -> String {
    let name = sanitize_filename(&decoded_basename(url));
    if name.contains('.') {
        return name;
    }
    match extension_from_content_type(content_type) {
        Some(ext) => format!("{name}{ext}"),
        None => name,
    }
}

/// Maps the image content types Nitter serves to a file extension.
///
/// Parameters after `;` are ignored and matching is case-insensitive.
#[must_use]
pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        _ => None,
    }
}

/// Last path segment, percent-decoded, trimmed to what follows its last `/`.
fn decoded_basename(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segment = path.rsplit('/').next().unwrap_or_default();
    let decoded = urlencoding::decode(segment).map_or_else(
        |e| {
            debug!(segment, error = %e, "URL decoding failed, using raw segment");
            segment.to_string()
        },
        std::borrow::Cow::into_owned,
    );
    decoded
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
