//! Incoming-content normalization.
//!
//! Raw strings arrive from the OS share sheet or a deep link. Structured
//! share links carry the text in a `text` query parameter; everything else
//! is literal content. Parsing failure is never an error — it degrades to
//! the plain-text fallback.

use url::Url;

use notarium_core::defaults;

/// Normalized incoming content with an optional title hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedContent {
    pub content: String,
    pub title: Option<String>,
}

impl SharedContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Normalize a raw shared string.
///
/// Recognized share links (`notarium://share?...`, `http(s)://...`, or any
/// URI carrying a `text` query parameter) have their percent-decoded `text`
/// and `title` parameters extracted; anything else — including strings that
/// fail to parse as a URL — becomes literal content with no title.
pub fn normalize(raw: &str) -> SharedContent {
    match Url::parse(raw) {
        Ok(url) if is_share_link(&url) => {
            let mut content = String::new();
            let mut title = None;
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "text" => content = value.into_owned(),
                    "title" if !value.is_empty() => title = Some(value.into_owned()),
                    _ => {}
                }
            }
            SharedContent { content, title }
        }
        _ => SharedContent::text(raw),
    }
}

fn is_share_link(url: &Url) -> bool {
    if url.scheme() == defaults::SHARE_SCHEME {
        return url.host_str() == Some(defaults::SHARE_HOST);
    }
    if matches!(url.scheme(), "http" | "https") {
        return true;
    }
    // Platform URIs (content://, file://) sometimes carry the text inline.
    url.query_pairs().any(|(key, _)| key == "text")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_scheme_share_link() {
        let shared = normalize("notarium://share?text=hello%20world&title=Greeting");
        assert_eq!(shared.content, "hello world");
        assert_eq!(shared.title.as_deref(), Some("Greeting"));
    }

    #[test]
    fn test_app_scheme_without_title() {
        let shared = normalize("notarium://share?text=just%20text");
        assert_eq!(shared.content, "just text");
        assert_eq!(shared.title, None);
    }

    #[test]
    fn test_app_scheme_unknown_host_is_literal() {
        let raw = "notarium://settings?text=nope";
        let shared = normalize(raw);
        assert_eq!(shared.content, raw);
        assert_eq!(shared.title, None);
    }

    #[test]
    fn test_https_link_with_text_param() {
        let shared = normalize("https://notes.example.com/share?text=clipped&title=Web");
        assert_eq!(shared.content, "clipped");
        assert_eq!(shared.title.as_deref(), Some("Web"));
    }

    #[test]
    fn test_https_link_without_text_param_yields_blank() {
        // The router drops blank content, so a bare article URL is ignored
        // rather than saved as an empty note.
        let shared = normalize("https://example.com/article/42");
        assert!(shared.is_blank());
    }

    #[test]
    fn test_content_uri_with_text_param() {
        let shared = normalize("content://shared/item?text=from%20android");
        assert_eq!(shared.content, "from android");
    }

    #[test]
    fn test_plain_text_is_literal() {
        let shared = normalize("remember to water the plants");
        assert_eq!(shared.content, "remember to water the plants");
        assert_eq!(shared.title, None);
    }

    #[test]
    fn test_unparseable_input_falls_back_to_literal() {
        let raw = "http://[not-a-host/";
        let shared = normalize(raw);
        assert_eq!(shared.content, raw);
    }

    #[test]
    fn test_empty_title_param_is_dropped() {
        let shared = normalize("notarium://share?text=x&title=");
        assert_eq!(shared.title, None);
    }

    #[test]
    fn test_percent_decoding() {
        let shared = normalize("notarium://share?text=a%26b%3Dc");
        assert_eq!(shared.content, "a&b=c");
    }
}
