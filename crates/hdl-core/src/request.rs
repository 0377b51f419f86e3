//! The immutable GET request: target URL plus the fixed browser-like header set.

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// One download request. Built once per operation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    headers: Vec<(String, String)>,
}

impl DownloadRequest {
    /// Request for `url` carrying User-Agent, Accept, Accept-Language and a Referer
    /// pointing at `url` itself.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let headers = vec![
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
            ("Referer".to_string(), url.clone()),
        ];
        Self { url, headers }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Outgoing headers in send order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Headers as `Name: value` lines for `curl::easy::List`.
    pub(crate) fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.headers
            .iter()
            .map(|(k, v)| format!("{}: {}", k.trim(), v.trim()))
    }
}
