//! Filename extraction from URL path.

/// Extracts the last path segment of `url` (query string and fragment removed) as a
/// filename hint.
///
/// A path ending in `/` has an empty last segment and yields `None`, as do `.` and `..`.
/// Unparseable input is handled textually so a hint is still produced for odd URLs.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().rsplit('/').next().map(str::to_string),
        Err(_) => {
            let without_query = url.split(['?', '#']).next().unwrap_or("");
            let path = without_query
                .split_once("://")
                .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
                .unwrap_or(without_query);
            path.rsplit('/').next().map(str::to_string)
        }
    }?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}
