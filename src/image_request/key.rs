//! # 请求标识
//!
//! `RequestKey` 由 URI 与完整的有序请求头列表共同决定：
//! 同一 URI 携带不同鉴权头的两个请求必须得到不同的 key，否则缓存会串图。
//! URI 不做任何校验，原样参与比较。

use std::fmt;

use super::source::{HeaderList, ImageSource};

/// 缓存/去重标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    uri: String,
    headers: Vec<(String, String)>,
}

impl RequestKey {
    pub fn builder(uri: impl Into<String>) -> RequestKeyBuilder {
        RequestKeyBuilder::new(uri)
    }

    pub fn from_source(source: &ImageSource) -> Self {
        let mut builder = RequestKeyBuilder::new(source.uri());
        if let Some(headers) = source.headers() {
            builder = builder.headers(headers);
        }
        builder.build()
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }
}

/// 日志友好输出：不打印请求头的值。
impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.headers.is_empty() {
            write!(f, "{}", self.uri)
        } else {
            write!(f, "{} [+{} headers]", self.uri, self.headers.len())
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestKeyBuilder {
    uri: String,
    headers: Vec<(String, String)>,
}

impl RequestKeyBuilder {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: &HeaderList) -> Self {
        self.headers
            .extend(headers.iter().map(|(name, value)| (name.to_string(), value.to_string())));
        self
    }

    pub fn build(self) -> RequestKey {
        RequestKey {
            uri: self.uri,
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_only_keys_compare_by_uri() {
        let a = RequestKey::builder("https://x/a.png").build();
        let b = RequestKey::from_source(&ImageSource::new("https://x/a.png"));
        assert_eq!(a, b);
    }

    #[test]
    fn different_auth_headers_do_not_collide() {
        let alice = RequestKey::builder("https://x/a.png")
            .header("Authorization", "Bearer alice")
            .build();
        let bob = RequestKey::builder("https://x/a.png")
            .header("Authorization", "Bearer bob")
            .build();
        let bare = RequestKey::builder("https://x/a.png").build();

        assert_ne!(alice, bob);
        assert_ne!(alice, bare);
    }

    #[test]
    fn header_order_is_part_of_identity() {
        let ab = RequestKey::builder("u").header("A", "1").header("B", "2").build();
        let ba = RequestKey::builder("u").header("B", "2").header("A", "1").build();
        assert_ne!(ab, ba);
    }

    #[test]
    fn malformed_uri_passes_through() {
        let key = RequestKey::builder("not a uri at all").build();
        assert_eq!(key.uri(), "not a uri at all");
    }

    #[test]
    fn display_hides_header_values() {
        let key = RequestKey::builder("https://x/a.png")
            .header("Authorization", "Bearer secret")
            .build();
        let shown = key.to_string();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("+1 headers"));
    }
}
