use url::Url;

use crate::error::CueRipError;

/// Resolves a possibly-relative URI against the playlist base URL.
pub fn resolve(raw: &str, base: &Url) -> Result<Url, CueRipError> {
    if raw.is_empty() {
        return Err(CueRipError::InvalidUri("Empty URI".to_string()));
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Url::parse(raw).map_err(|e| CueRipError::InvalidUri(format!("{raw}: {e}")));
    }
    base.join(raw).map_err(|e| {
        CueRipError::InvalidUri(format!("Could not join base URL {base} with {raw}: {e}"))
    })
}

/// Derives the local filename for a resolved URL: its final path segment.
///
/// Query and fragment are not part of the URL path and never leak into the
/// name. A URL whose path ends in `/` has no usable filename.
pub fn local_name(url: &Url) -> Result<String, CueRipError> {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    if name.is_empty() {
        return Err(CueRipError::InvalidUri(format!("No filename in URL {url}")));
    }
    Ok(name.to_string())
}
