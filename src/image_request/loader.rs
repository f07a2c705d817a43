//! # 默认取图引擎（加载与校验）
//!
//! ## 设计思路
//!
//! `HttpImageFetcher` 是 `ImageFetcher` 的默认实现，只做“组装”，不重造轮子：
//! - 传输交给 `reqwest`
//! - 图片签名识别交给 `infer`
//! - 解码交给 `image`（见 `pipeline`）
//! - 内存缓存交给 `lru`，以 `RequestKey` 为键，请求头不同的同一 URI 不会串图
//!
//! ## 实现思路
//!
//! - URI 分派：`http(s)://` 网络下载、`data:` 内联 Base64、`file://` 与绝对路径读本地文件。
//! - 下载：流式读取 + 首包/分块超时 + 体积上限 + 签名探测，分块之间检查取消令牌。
//! - 失败不重试：一次请求只产生一次结果，重试与否由宿主决定。

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use lru::LruCache;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;

use super::fetcher::{FetchRequest, ImageFetcher};
use super::key::RequestKey;
use super::pipeline;
use super::source::{DataSource, LoadedImage, RawImageData};
use super::{FetchError, ImageRequestConfig};

const STREAM_SIGNATURE_PROBE_BYTES: usize = 4096;
const BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;
const DEFAULT_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// 默认取图引擎。
pub struct HttpImageFetcher {
    config: ImageRequestConfig,
    client: reqwest::Client,
    memory_cache: Option<Mutex<LruCache<RequestKey, Arc<LoadedImage>>>>,
}

impl HttpImageFetcher {
    /// 校验配置并构建复用型 HTTP 客户端。
    pub fn new(config: ImageRequestConfig) -> Result<Self, FetchError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(concat!("fast-image-view/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

        let memory_cache =
            NonZeroUsize::new(config.memory_cache_entries).map(|cap| Mutex::new(LruCache::new(cap)));

        Ok(Self {
            config,
            client,
            memory_cache,
        })
    }

    pub fn config(&self) -> &ImageRequestConfig {
        &self.config
    }

    /// 内存缓存当前条目数。
    pub fn cached_len(&self) -> usize {
        self.memory_cache
            .as_ref()
            .and_then(|cache| cache.lock().ok().map(|cache| cache.len()))
            .unwrap_or(0)
    }

    fn cache_get(&self, key: &RequestKey) -> Option<Arc<LoadedImage>> {
        let mut cache = self.memory_cache.as_ref()?.lock().ok()?;
        cache.get(key).cloned()
    }

    fn cache_put(&self, image: &Arc<LoadedImage>) {
        let Some(cache) = self.memory_cache.as_ref() else {
            return;
        };
        match cache.lock() {
            Ok(mut cache) => {
                cache.put(image.key().clone(), Arc::clone(image));
            }
            Err(_) => log::warn!("⚠️ 内存缓存锁已中毒，跳过写入"),
        }
    }

    async fn load_raw(&self, request: &FetchRequest, cancel: &CancellationToken) -> Result<RawImageData, FetchError> {
        let uri = request.key.uri().trim();

        if uri.is_empty() {
            return Err(FetchError::InvalidFormat("source 缺少 uri".to_string()));
        }

        if uri.starts_with("http://") || uri.starts_with("https://") {
            let bytes = self.download(uri, &request.key, cancel).await?;
            return Ok(RawImageData {
                bytes,
                data_source: DataSource::Remote,
            });
        }

        if uri.starts_with("data:") {
            let bytes = Self::parse_data_uri(uri, self.config.max_file_size)?;
            Self::validate_image_signature(&bytes)?;
            return Ok(RawImageData {
                bytes,
                data_source: DataSource::Inline,
            });
        }

        if let Some(path) = uri.strip_prefix("file://") {
            return self.load_from_file(path).await;
        }

        if uri.starts_with('/') {
            return self.load_from_file(uri).await;
        }

        Err(FetchError::InvalidFormat(format!(
            "不支持的 URI：{}",
            Self::redact_url_for_log(uri)
        )))
    }

    async fn load_from_file(&self, path: &str) -> Result<RawImageData, FetchError> {
        log::debug!("📁 读取本地图片 - 路径: {}", path);

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| FetchError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > self.config.max_file_size {
            return Err(FetchError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            data_source: DataSource::Local,
        })
    }

    /// 请求头：默认 Accept 在前，宿主传入的同名头覆盖默认值，重复名按顺序追加。
    fn build_headers(key: &RequestKey) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

        let mut overridden: Vec<HeaderName> = Vec::new();
        for (name, value) in key.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::InvalidFormat(format!("请求头名称无效：{}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::InvalidFormat(format!("请求头 {} 的值无效：{}", name, e)))?;

            if overridden.contains(&name) {
                headers.append(name, value);
            } else {
                headers.insert(name.clone(), value);
                overridden.push(name);
            }
        }

        Ok(headers)
    }

    async fn download(&self, url: &str, key: &RequestKey, cancel: &CancellationToken) -> Result<Vec<u8>, FetchError> {
        log::info!("🌐 开始下载图片 - URL: {}", Self::redact_url_for_log(url));

        let parsed = reqwest::Url::parse(url)
            .map_err(|e| FetchError::InvalidFormat(format!("URL 格式错误：{}", e)))?;
        let headers = Self::build_headers(key)?;

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let mut response = self
            .client
            .get(parsed)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "HTTP {}: {}",
                response.status().as_u16(),
                Self::status_message(response.status().as_u16())
            )));
        }

        if let Some(ct) = response.headers().get(reqwest::header::CONTENT_TYPE) {
            if let Ok(ct_str) = ct.to_str() {
                if !Self::is_acceptable_content_type(ct_str) {
                    return Err(FetchError::InvalidFormat(format!("不是图片类型：{}", ct_str)));
                }
            }
        }

        let total_len = response.content_length();
        if let Some(size) = total_len {
            if size > self.config.max_file_size {
                return Err(FetchError::ResourceLimit(format!(
                    "文件过大：{:.2} MB（限制：{:.2} MB）",
                    size as f64 / 1024.0 / 1024.0,
                    self.config.max_file_size as f64 / 1024.0 / 1024.0
                )));
            }
        }

        let initial_capacity = total_len
            .map(|len| len.min(self.config.max_file_size) as usize)
            .filter(|len| *len > 0)
            .unwrap_or(BUFFER_INITIAL_CAPACITY);
        let mut buffer = Vec::with_capacity(initial_capacity);
        let mut total: u64 = 0;
        let mut signature_validated = false;
        let mut received_first_chunk = false;

        loop {
            let read_timeout = if received_first_chunk {
                Duration::from_millis(self.config.stream_chunk_timeout_ms)
            } else {
                Duration::from_millis(self.config.stream_first_byte_timeout_ms)
            };

            let next_chunk = tokio::time::timeout(read_timeout, response.chunk())
                .await
                .map_err(|_| {
                    if received_first_chunk {
                        FetchError::Timeout("下载数据流读取超时".to_string())
                    } else {
                        FetchError::Timeout("下载首包超时".to_string())
                    }
                })?
                .map_err(|e| FetchError::Network(format!("下载失败：{}", e)))?;

            let Some(chunk) = next_chunk else {
                break;
            };
            received_first_chunk = true;

            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            total = total.saturating_add(chunk.len() as u64);
            if total > self.config.max_file_size {
                return Err(FetchError::ResourceLimit("下载后文件超过大小限制".to_string()));
            }
            buffer.extend_from_slice(&chunk);

            if !signature_validated {
                signature_validated =
                    Self::validate_stream_signature_probe(&buffer, STREAM_SIGNATURE_PROBE_BYTES)?;
            }
        }

        if !signature_validated {
            Self::validate_image_signature(&buffer)?;
        }

        log::debug!("✅ 下载完成 - {} bytes", total);
        Ok(buffer)
    }

    /// 解析 `data:` URI（仅支持 base64 编码）。
    fn parse_data_uri(uri: &str, max_file_size: u64) -> Result<Vec<u8>, FetchError> {
        let marker = uri
            .find(";base64,")
            .ok_or_else(|| FetchError::InvalidFormat("data URI 缺少 base64 标记".to_string()))?;
        let payload = uri[marker + 8..].trim();

        let estimated_len = (payload.len() as u64).saturating_add(3) / 4 * 3;
        if estimated_len > max_file_size {
            return Err(FetchError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| FetchError::Decode(format!("Base64 解码失败：{}", e)))
    }

    fn map_reqwest_error(&self, e: reqwest::Error, url: &str) -> FetchError {
        let err_msg = e.to_string().replace(url, &Self::redact_url_for_log(url));

        if e.is_timeout() {
            FetchError::Timeout(format!("下载超时（{}秒）", self.config.download_timeout))
        } else if e.is_connect() {
            FetchError::Network(format!("无法连接：{}", err_msg))
        } else if e.is_redirect() {
            FetchError::Network(format!("重定向次数超过限制（{}）", self.config.max_redirects))
        } else {
            FetchError::Network(format!("请求失败：{}", err_msg))
        }
    }

    /// 文本类响应（常见为 HTML 错误页）直接拒绝；其余交给签名探测判断。
    fn is_acceptable_content_type(content_type: &str) -> bool {
        let base = content_type
            .split(';')
            .next()
            .map(|base| base.trim().to_ascii_lowercase())
            .unwrap_or_default();

        base.starts_with("image/") || base == "application/octet-stream" || base.is_empty()
    }

    /// 去掉 query 与 fragment，避免把签名/令牌写进日志。
    pub(crate) fn redact_url_for_log(url: &str) -> String {
        if url.starts_with("data:") {
            return "data:<inline>".to_string();
        }

        let Ok(parsed) = reqwest::Url::parse(url) else {
            return "<invalid-url>".to_string();
        };

        let host = parsed.host_str().unwrap_or("");
        let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

        format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
    }

    fn status_message(code: u16) -> &'static str {
        match code {
            404 => "未找到",
            401 | 403 => "访问被拒绝",
            500..=599 => "服务器错误",
            _ => "请求失败",
        }
    }

    /// 通过文件签名（magic bytes）校验内容是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), FetchError> {
        if bytes.is_empty() {
            return Err(FetchError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| FetchError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(FetchError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }

    /// 流式签名探测：
    /// - `Ok(true)`：已识别为图片
    /// - `Ok(false)`：字节不足，继续下载
    /// - `Err(...)`：已识别为非图片，或到达探测上限仍无法识别
    fn validate_stream_signature_probe(bytes: &[u8], probe_limit: usize) -> Result<bool, FetchError> {
        if bytes.is_empty() {
            return Ok(false);
        }

        if let Some(kind) = infer::get(bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(FetchError::InvalidFormat(format!(
                    "下载内容不是图片类型：{}",
                    kind.mime_type()
                )));
            }
            return Ok(true);
        }

        if bytes.len() >= probe_limit {
            return Err(FetchError::InvalidFormat(format!(
                "下载前 {} 字节内无法识别图片类型",
                probe_limit
            )));
        }

        Ok(false)
    }
}

impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, request: &FetchRequest, cancel: &CancellationToken) -> Result<Arc<LoadedImage>, FetchError> {
        if let Some(hit) = self.cache_get(&request.key) {
            log::debug!("♻️ 命中内存缓存 - {}", Self::redact_url_for_log(request.key.uri()));
            return Ok(Arc::new(hit.with_data_source(DataSource::MemoryCache)));
        }

        let raw = self.load_raw(request, cancel).await?;
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let key = request.key.clone();
        let config = self.config.clone();
        let image = tokio::task::spawn_blocking(move || pipeline::decode_image(raw, key, &config))
            .await
            .map_err(|e| FetchError::Decode(format!("解码任务异常退出：{}", e)))??;

        let image = Arc::new(image);
        self.cache_put(&image);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_request::pipeline::tests::create_png_bytes;
    use crate::image_request::source::ImageSource;
    use crate::image_request::RequestTicket;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    fn request(source: ImageSource) -> FetchRequest {
        FetchRequest::new(RequestTicket(1), source)
    }

    fn data_uri(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(bytes))
    }

    /// 单连接测试服务器：返回收到的请求文本。
    fn serve_once(status_line: &'static str, content_type: &'static str, body: Vec<u8>) -> (u16, mpsc::Receiver<String>, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let port = listener.local_addr().expect("read local addr failed").port();
        let (tx, rx) = mpsc::channel();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");
            let mut req_buf = [0u8; 4096];
            let n = stream.read(&mut req_buf).unwrap_or(0);
            let _ = tx.send(String::from_utf8_lossy(&req_buf[..n]).to_string());

            let head = format!(
                "{}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                content_type,
                body.len()
            );
            let mut response = head.into_bytes();
            response.extend_from_slice(&body);
            // 客户端可能在读完响应头后就断开
            let _ = stream.write_all(&response);
            let _ = stream.flush();
        });

        (port, rx, server)
    }

    #[tokio::test]
    async fn fetch_sends_source_headers_and_decodes_png() {
        let (port, requests, server) = serve_once("HTTP/1.1 200 OK", "image/png", create_png_bytes(4, 3));

        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let source = ImageSource::new(format!("http://127.0.0.1:{}/a.png?token=abc", port))
            .with_headers([("Authorization", "Bearer alice"), ("X-Trace", "42")].into_iter().collect());

        let image = fetcher
            .fetch(&request(source), &CancellationToken::new())
            .await
            .expect("fetch should succeed");
        server.join().expect("server thread failed");

        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.data_source(), DataSource::Remote);

        let raw_request = requests.recv().expect("request should be captured").to_lowercase();
        assert!(raw_request.contains("authorization: bearer alice"));
        assert!(raw_request.contains("x-trace: 42"));
    }

    #[tokio::test]
    async fn fetch_rejects_non_image_body_even_when_content_type_is_image() {
        let (port, _requests, server) =
            serve_once("HTTP/1.1 200 OK", "image/png", b"hello world".to_vec());

        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let source = ImageSource::new(format!("http://127.0.0.1:{}/fake.png", port));
        let result = fetcher.fetch(&request(source), &CancellationToken::new()).await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(FetchError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn fetch_rejects_html_error_page() {
        let (port, _requests, server) = serve_once(
            "HTTP/1.1 200 OK",
            "text/html; charset=utf-8",
            b"<html>nope</html>".to_vec(),
        );

        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let source = ImageSource::new(format!("http://127.0.0.1:{}/a.png", port));
        let result = fetcher.fetch(&request(source), &CancellationToken::new()).await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(FetchError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn fetch_maps_http_404_to_network_error() {
        let (port, _requests, server) = serve_once("HTTP/1.1 404 Not Found", "text/plain", Vec::new());

        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let source = ImageSource::new(format!("http://127.0.0.1:{}/missing.png", port));
        let result = fetcher.fetch(&request(source), &CancellationToken::new()).await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(FetchError::Network(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn data_uri_is_decoded_and_then_served_from_memory_cache() {
        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let source = ImageSource::new(data_uri(&create_png_bytes(2, 2)));

        let first = fetcher
            .fetch(&request(source.clone()), &CancellationToken::new())
            .await
            .expect("first fetch should succeed");
        assert_eq!(first.data_source(), DataSource::Inline);
        assert_eq!(fetcher.cached_len(), 1);

        let second = fetcher
            .fetch(&request(source), &CancellationToken::new())
            .await
            .expect("second fetch should succeed");
        assert_eq!(second.data_source(), DataSource::MemoryCache);
        assert_eq!(second.dimensions(), (2, 2));
    }

    #[tokio::test]
    async fn cache_does_not_mix_requests_with_different_headers() {
        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let uri = data_uri(&create_png_bytes(2, 2));

        let alice = ImageSource::new(uri.clone()).with_headers([("Authorization", "alice")].into_iter().collect());
        let bob = ImageSource::new(uri).with_headers([("Authorization", "bob")].into_iter().collect());

        fetcher
            .fetch(&request(alice), &CancellationToken::new())
            .await
            .expect("fetch should succeed");
        let second = fetcher
            .fetch(&request(bob), &CancellationToken::new())
            .await
            .expect("fetch should succeed");

        assert_eq!(second.data_source(), DataSource::Inline);
        assert_eq!(fetcher.cached_len(), 2);
    }

    #[tokio::test]
    async fn disabled_cache_never_hits() {
        let config = ImageRequestConfig {
            memory_cache_entries: 0,
            ..ImageRequestConfig::default()
        };
        let fetcher = HttpImageFetcher::new(config).expect("fetcher init failed");
        let source = ImageSource::new(data_uri(&create_png_bytes(1, 1)));

        for _ in 0..2 {
            let image = fetcher
                .fetch(&request(source.clone()), &CancellationToken::new())
                .await
                .expect("fetch should succeed");
            assert_eq!(image.data_source(), DataSource::Inline);
        }
        assert_eq!(fetcher.cached_len(), 0);
    }

    #[tokio::test]
    async fn local_file_path_is_loaded() {
        let path = std::env::temp_dir().join(format!("fast-image-view-test-{}.png", std::process::id()));
        std::fs::write(&path, create_png_bytes(5, 5)).expect("write temp image failed");

        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let uri = format!("file://{}", path.display());
        let image = fetcher
            .fetch(&request(ImageSource::new(uri)), &CancellationToken::new())
            .await
            .expect("file fetch should succeed");
        let _ = std::fs::remove_file(&path);

        assert_eq!(image.dimensions(), (5, 5));
        assert_eq!(image.data_source(), DataSource::Local);
    }

    #[tokio::test]
    async fn empty_and_unsupported_uris_fail() {
        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");

        let empty = fetcher.fetch(&request(ImageSource::new("")), &CancellationToken::new()).await;
        assert!(matches!(empty, Err(FetchError::InvalidFormat(_))));

        let ftp = fetcher
            .fetch(&request(ImageSource::new("ftp://x/a.png")), &CancellationToken::new())
            .await;
        assert!(matches!(ftp, Err(FetchError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn cancelled_before_download_returns_cancelled() {
        let fetcher = HttpImageFetcher::new(ImageRequestConfig::default()).expect("fetcher init failed");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fetcher
            .fetch(&request(ImageSource::new("http://127.0.0.1:9/a.png")), &cancel)
            .await;
        assert_eq!(result, Err(FetchError::Cancelled));
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let key = RequestKey::builder("https://x/a.png").header("bad header", "v").build();
        assert!(matches!(
            HttpImageFetcher::build_headers(&key),
            Err(FetchError::InvalidFormat(_))
        ));
    }

    #[test]
    fn source_headers_override_default_accept() {
        let key = RequestKey::builder("https://x/a.png")
            .header("Accept", "image/png")
            .header("X-Multi", "1")
            .header("X-Multi", "2")
            .build();
        let headers = HttpImageFetcher::build_headers(&key).expect("headers should build");

        assert_eq!(headers.get_all(reqwest::header::ACCEPT).iter().count(), 1);
        assert_eq!(headers.get(reqwest::header::ACCEPT).map(|v| v.as_bytes()), Some(&b"image/png"[..]));
        assert_eq!(headers.get_all("x-multi").iter().count(), 2);
    }

    #[test]
    fn redact_url_for_log_removes_query_and_fragment() {
        let redacted = HttpImageFetcher::redact_url_for_log("https://example.com:8443/path/img.png?token=abc123#hash");
        assert_eq!(redacted, "https://example.com:8443/path/img.png");
        assert_eq!(HttpImageFetcher::redact_url_for_log("data:image/png;base64,AAAA"), "data:<inline>");
    }

    #[test]
    fn content_type_filter_rejects_text() {
        assert!(HttpImageFetcher::is_acceptable_content_type("image/png; charset=utf-8"));
        assert!(HttpImageFetcher::is_acceptable_content_type("application/octet-stream"));
        assert!(!HttpImageFetcher::is_acceptable_content_type("text/html; charset=utf-8"));
    }

    #[test]
    fn stream_signature_probe_recognizes_png_header() {
        let png_signature = [137_u8, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];
        assert!(matches!(
            HttpImageFetcher::validate_stream_signature_probe(&png_signature, 64),
            Ok(true)
        ));
    }
}
