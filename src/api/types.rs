use serde::Deserialize;

/// One entry of the shorts feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    /// Playable video resource.
    pub url: String,
}

impl FeedItem {
    /// Host part of the video URL, used as a compact source label.
    pub fn host(&self) -> &str {
        self.url
            .split("://")
            .nth(1)
            .and_then(|s| s.split('/').next())
            .map(|s| s.strip_prefix("www.").unwrap_or(s))
            .filter(|s| !s.is_empty())
            .unwrap_or("local")
    }
}

/// Response body of `GET /shorts/feed`. Only `content` is consulted; paging
/// metadata the server may add alongside it is ignored.
#[derive(Debug, Deserialize)]
pub struct FeedPage {
    pub content: Vec<FeedItem>,
}

/// Parameters of a single page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}
