//! Shareable letter locators.

use std::fmt;
use url::Url;

/// Route segment letters are served under by default.
pub const DEFAULT_ROUTE_PREFIX: &str = "l";

/// URL a recipient opens to view a letter: `<origin>/<prefix>/<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    url: Url,
    id: String,
}

impl ShareLink {
    /// Build a link. Returns `None` if the origin is not a valid base URL.
    pub fn new(origin: &str, prefix: &str, id: &str) -> Option<Self> {
        let mut url = Url::parse(origin).ok()?;
        if url.cannot_be_a_base() {
            return None;
        }
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            let prefix = prefix.trim_matches('/');
            if !prefix.is_empty() {
                segments.extend(prefix.split('/'));
            }
            segments.push(id);
        }
        Some(Self {
            url,
            id: id.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Recover the letter id from a link built with `prefix`.
    pub fn parse_id(link: &str, prefix: &str) -> Option<String> {
        let url = Url::parse(link).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let prefix: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
        let (id, head) = segments.split_last()?;
        if !head.ends_with(&prefix) {
            return None;
        }
        Some((*id).to_string())
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
