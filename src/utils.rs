//! Utility functions for HTTP response handling

use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};

/// Extract a server-chosen filename from a `Content-Disposition` header
///
/// Handles both the plain form (`attachment; filename="clip.mp4"`) and the RFC 5987 form
/// (`filename*=UTF-8''clip%20one.mp4`). Plain filenames are percent-decoded as well, since
/// the dashboard backend percent-encodes non-ASCII names inside the quotes.
///
/// # Examples
///
/// ```
/// use creator_dl::utils::filename_from_disposition;
///
/// assert_eq!(
///     filename_from_disposition("attachment; filename=\"IG%20-%201.2K%20-%20set.mp4\""),
///     Some("IG - 1.2K - set.mp4".to_string())
/// );
/// assert_eq!(filename_from_disposition("inline"), None);
/// ```
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;

    for part in value.split(';') {
        let part = part.trim();
        if let Some(encoded) = part.strip_prefix("filename*=") {
            // Format is: charset'lang'encoded-filename
            let encoded = encoded.rsplit('\'').next().unwrap_or(encoded);
            if let Ok(decoded) = urlencoding::decode(encoded.trim_matches('"'))
                && !decoded.trim().is_empty()
            {
                return Some(decoded.into_owned());
            }
        } else if let Some(raw) = part.strip_prefix("filename=") {
            let raw = raw.trim_matches('"');
            if !raw.is_empty() {
                let decoded = urlencoding::decode(raw)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                plain = Some(decoded);
            }
        }
    }

    plain
}

/// Pick the filename to save a transfer under: the server's choice, else the advisory one
pub fn resolve_filename(headers: &HeaderMap, advisory: &str) -> String {
    headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| advisory.to_string())
}
