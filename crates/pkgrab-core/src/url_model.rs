//! Archive file name derivation from the discovered download URL.

use crate::error::InstallError;

const NAME_MAX: usize = 255;

/// Extracts the last non-empty path segment of `url` (query and fragment ignored).
///
/// Returns `None` if the URL cannot be parsed or its path is empty/root.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Makes `name` safe to use as a single file name.
///
/// Path separators, NUL and control characters become `_` (runs collapsed);
/// leading/trailing dots, spaces and underscores are trimmed; the result is
/// capped at 255 bytes on a char boundary.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let bad = c == '/' || c == '\\' || c == '\0' || c.is_control();
        let c = if bad { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Local file name for the archive behind `url`.
pub fn archive_file_name(url: &str) -> Result<String, InstallError> {
    last_path_segment(url)
        .map(|s| sanitize_file_name(&s))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| InstallError::NoFileName(url.to_string()))
}
