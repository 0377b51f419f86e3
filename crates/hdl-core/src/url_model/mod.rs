//! Destination filename policy.
//!
//! The name comes from the Content-Disposition hint, else the last URL path segment,
//! else a fixed fallback. It is decided once, before the first byte is written.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use path::filename_from_url_path;
pub use sanitize::{last_path_component, sanitize_filename_for_linux};

/// Name used when neither the header nor the URL yields anything usable.
pub const DEFAULT_FILENAME: &str = "downloaded_file";

/// Derives the local filename for a download.
///
/// With `sanitize` set the candidate goes through `sanitize_filename_for_linux`;
/// otherwise only its final path component is kept. Either way the result is a
/// single path component, never `.` or `..`.
///
/// # Examples
///
/// - `derive_filename("https://example.com/files/data.csv?token=abc", None, true)` → `"data.csv"`
/// - `derive_filename("https://example.com/", Some("attachment; filename=\"report.pdf\""), true)` → `"report.pdf"`
pub fn derive_filename(url: &str, content_disposition: Option<&str>, sanitize: bool) -> String {
    let candidate = content_disposition
        .and_then(parse_content_disposition_filename)
        .or_else(|| filename_from_url_path(url));

    let Some(raw) = candidate else {
        return DEFAULT_FILENAME.to_string();
    };

    let cleaned = if sanitize {
        sanitize_filename_for_linux(&raw)
    } else {
        last_path_component(&raw)
    };
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        tracing::debug!(raw = %raw, "filename hint unusable, using fallback");
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_filename_from_url_path() {
        assert_eq!(
            derive_filename("https://example.com/archive.zip", None, true),
            "archive.zip"
        );
        assert_eq!(
            derive_filename("https://example.com/files/data.csv?token=abc", None, true),
            "data.csv"
        );
    }

    #[test]
    fn derive_filename_from_content_disposition() {
        assert_eq!(
            derive_filename(
                "https://example.com/",
                Some("attachment; filename=\"report.pdf\""),
                true
            ),
            "report.pdf"
        );
        assert_eq!(
            derive_filename(
                "https://example.com/x",
                Some("attachment; filename=simple.bin"),
                true
            ),
            "simple.bin"
        );
    }

    #[test]
    fn derive_filename_content_disposition_overrides_url() {
        assert_eq!(
            derive_filename(
                "https://example.com/archive.zip",
                Some("attachment; filename=\"report.pdf\""),
                true
            ),
            "report.pdf"
        );
    }

    #[test]
    fn quoted_semicolon_survives_into_name() {
        assert_eq!(
            derive_filename(
                "https://example.com/dl",
                Some("attachment; filename=\"a;b.pdf\""),
                true
            ),
            "a;b.pdf"
        );
    }

    #[test]
    fn header_without_hint_falls_through_to_url() {
        assert_eq!(
            derive_filename("https://example.com/a/image.png", Some("inline"), true),
            "image.png"
        );
    }

    #[test]
    fn derive_filename_empty_url_path_fallback() {
        assert_eq!(derive_filename("https://example.com/", None, true), "downloaded_file");
        assert_eq!(derive_filename("https://example.com", None, true), "downloaded_file");
        assert_eq!(
            derive_filename("https://example.com/dir/", None, false),
            "downloaded_file"
        );
    }

    #[test]
    fn derive_filename_reserved_names_fallback() {
        assert_eq!(derive_filename("https://example.com/.", None, true), "downloaded_file");
        assert_eq!(
            derive_filename("https://example.com/", Some("attachment; filename=\"..\""), false),
            "downloaded_file"
        );
    }

    #[test]
    fn traversal_hint_stays_in_output_dir() {
        let hint = Some("attachment; filename=\"../../etc/passwd\"");
        assert_eq!(derive_filename("https://example.com/", hint, true), "etc_passwd");
        assert_eq!(derive_filename("https://example.com/", hint, false), "passwd");
    }
}
