//! # 请求来源与中间模型
//!
//! - `ImageSource`：一次绑定所要加载的内容（URI + 有序请求头 + 优先级），构造后不可变
//! - `HeaderList`：保持宿主传入顺序的请求头列表
//! - `RawImageData`：已加载但未解码的字节
//! - `LoadedImage`：解码完成、可直接展示的 RGBA 数据

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::key::RequestKey;
use super::Priority;

/// 有序请求头列表。
///
/// 从 JSON 对象反序列化时按文档顺序保留键值对。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderList
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'de> Deserialize<'de> for HeaderList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeaderListVisitor;

        impl<'de> Visitor<'de> for HeaderListVisitor {
            type Value = HeaderList;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of header names to string values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    pairs.push((name, value));
                }
                Ok(HeaderList(pairs))
            }
        }

        deserializer.deserialize_map(HeaderListVisitor)
    }
}

/// 图片请求来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    uri: String,
    headers: Option<HeaderList>,
    priority: Priority,
}

impl ImageSource {
    /// 仅以 URI 构造，优先级为 `normal`。
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: None,
            priority: Priority::Normal,
        }
    }

    /// 附加请求头。空列表视为“无请求头”。
    pub fn with_headers(mut self, headers: HeaderList) -> Self {
        self.headers = if headers.is_empty() { None } else { Some(headers) };
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> Option<&HeaderList> {
        self.headers.as_ref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// 该来源的缓存/去重标识。
    pub fn key(&self) -> RequestKey {
        RequestKey::from_source(self)
    }
}

/// 图片数据来源，用于诊断日志与宿主侧统计。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// 网络下载
    Remote,
    /// 内存缓存命中
    MemoryCache,
    /// `data:` URI 内联数据
    Inline,
    /// 本地文件
    Local,
}

/// 加载阶段输出：原始字节与来源。
pub(crate) struct RawImageData {
    pub(crate) bytes: Vec<u8>,
    pub(crate) data_source: DataSource,
}

/// 解码完成的图片。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    key: RequestKey,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    data_source: DataSource,
}

impl LoadedImage {
    pub fn new(key: RequestKey, width: u32, height: u32, rgba: Vec<u8>, data_source: DataSource) -> Self {
        Self {
            key,
            width,
            height,
            rgba,
            data_source,
        }
    }

    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    /// 同一图片换一个来源标记（缓存命中时使用）。
    pub(crate) fn with_data_source(&self, data_source: DataSource) -> Self {
        Self {
            data_source,
            ..self.clone()
        }
    }
}
