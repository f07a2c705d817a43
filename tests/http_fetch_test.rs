// End-to-end tests: view manager + HttpImageFetcher against a local HTTP server
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use fast_image_view::image_request::{DataSource, HttpImageFetcher, ImageRequestConfig};
use fast_image_view::view::{
    BindingId, BindingState, ChannelEventSink, CompletionOutcome, Displayed, FastImageViewManager, LoadEvent,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use serde_json::json;
use tokio::sync::mpsc;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

/// 接受 `connections` 个连接，依次返回相同响应，并回传原始请求文本。
fn serve(
    connections: usize,
    status_line: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (u16, std_mpsc::Receiver<String>, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let port = listener.local_addr().expect("read local addr failed").port();
    let (tx, rx) = std_mpsc::channel();

    let server = thread::spawn(move || {
        for _ in 0..connections {
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
        }
    });

    (port, rx, server)
}

type Manager = FastImageViewManager<HttpImageFetcher, ChannelEventSink>;

fn manager() -> (Manager, mpsc::UnboundedReceiver<LoadEvent>) {
    let config = ImageRequestConfig::default();
    let fetcher = HttpImageFetcher::new(config.clone()).expect("fetcher init failed");
    let (tx, rx) = mpsc::unbounded_channel();
    (FastImageViewManager::new(fetcher, ChannelEventSink::new(tx), &config), rx)
}

async fn next_outcome(manager: &mut Manager) -> CompletionOutcome {
    tokio::time::timeout(Duration::from_secs(5), manager.next_completion())
        .await
        .expect("completion should arrive")
        .expect("completion channel should be open")
}

#[tokio::test]
async fn headers_reach_the_server_and_image_loads() {
    let (port, requests, server) = serve(1, "HTTP/1.1 200 OK", "image/png", png_bytes(6, 4));
    let (mut manager, mut events) = manager();
    let id = BindingId(1);
    manager.create_view(id);

    manager
        .update_props(
            id,
            &json!({
                "source": {
                    "uri": format!("http://127.0.0.1:{}/a.png", port),
                    "headers": { "Authorization": "Bearer token-1", "X-Client": "fast-image" },
                    "priority": "high"
                }
            }),
        )
        .expect("update should succeed");

    assert_eq!(
        next_outcome(&mut manager).await,
        CompletionOutcome::Delivered(LoadEvent::Loaded(id))
    );
    server.join().expect("server thread failed");

    let raw_request = requests.recv().expect("request should be captured").to_lowercase();
    assert!(raw_request.contains("authorization: bearer token-1"));
    assert!(raw_request.contains("x-client: fast-image"));

    match manager.controller().displayed(id) {
        Some(Displayed::Image(image)) => {
            assert_eq!(image.dimensions(), (6, 4));
            assert_eq!(image.data_source(), DataSource::Remote);
        }
        other => panic!("expected loaded image, got {:?}", other),
    }
    assert_eq!(events.try_recv().ok(), Some(LoadEvent::Loaded(id)));
}

#[tokio::test]
async fn second_view_with_same_source_is_served_from_memory() {
    let (port, _requests, server) = serve(1, "HTTP/1.1 200 OK", "image/png", png_bytes(3, 3));
    let (mut manager, _events) = manager();
    let uri = format!("http://127.0.0.1:{}/shared.png", port);

    manager.create_view(BindingId(1));
    manager
        .update_props(BindingId(1), &json!({ "source": { "uri": uri } }))
        .expect("update should succeed");
    next_outcome(&mut manager).await;
    server.join().expect("server thread failed");

    manager.create_view(BindingId(2));
    manager
        .update_props(BindingId(2), &json!({ "source": { "uri": uri } }))
        .expect("update should succeed");
    assert_eq!(
        next_outcome(&mut manager).await,
        CompletionOutcome::Delivered(LoadEvent::Loaded(BindingId(2)))
    );

    match manager.controller().displayed(BindingId(2)) {
        Some(Displayed::Image(image)) => assert_eq!(image.data_source(), DataSource::MemoryCache),
        other => panic!("expected cached image, got {:?}", other),
    }
}

#[tokio::test]
async fn http_error_becomes_error_event() {
    let (port, _requests, server) = serve(1, "HTTP/1.1 404 Not Found", "text/plain", b"missing".to_vec());
    let (mut manager, mut events) = manager();
    let id = BindingId(3);
    manager.create_view(id);

    manager
        .update_props(
            id,
            &json!({ "source": { "uri": format!("http://127.0.0.1:{}/missing.png", port) } }),
        )
        .expect("update should succeed");

    assert_eq!(
        next_outcome(&mut manager).await,
        CompletionOutcome::Delivered(LoadEvent::Failed(id))
    );
    server.join().expect("server thread failed");

    assert_eq!(manager.controller().state(id), Some(BindingState::Failed));
    assert_eq!(manager.controller().displayed(id), Some(&Displayed::Placeholder));
    assert_eq!(events.try_recv().ok(), Some(LoadEvent::Failed(id)));
}

#[tokio::test]
async fn missing_uri_is_reported_as_error() {
    let (mut manager, mut events) = manager();
    let id = BindingId(4);
    manager.create_view(id);

    manager
        .update_props(id, &json!({ "source": {} }))
        .expect("update should succeed");

    assert_eq!(
        next_outcome(&mut manager).await,
        CompletionOutcome::Delivered(LoadEvent::Failed(id))
    );
    assert_eq!(events.try_recv().ok(), Some(LoadEvent::Failed(id)));
}

#[tokio::test]
async fn null_uri_is_reported_as_error() {
    let (mut manager, mut events) = manager();
    let id = BindingId(5);
    manager.create_view(id);

    manager
        .update_props(id, &json!({ "source": { "uri": null } }))
        .expect("update should succeed");
    assert_eq!(manager.controller().state(id), Some(BindingState::Pending));

    assert_eq!(
        next_outcome(&mut manager).await,
        CompletionOutcome::Delivered(LoadEvent::Failed(id))
    );
    assert_eq!(manager.controller().state(id), Some(BindingState::Failed));
    assert_eq!(events.try_recv().ok(), Some(LoadEvent::Failed(id)));
}
