//! # FastImageView：stdio 宿主
//!
//! 以 JSON 行协议驱动视图管理器，便于在任意宿主进程中嵌入或调试：
//!
//! - stdin 每行一条命令：`{"op":"create","tag":1}`、
//!   `{"op":"update","tag":1,"props":{"source":{"uri":"..."}}}`、`{"op":"drop","tag":1}`
//! - stdout 首行输出组件注册信息，之后每行一个事件：`{"event":"onFastImageLoad","target":1}`
//! - 日志写 stderr，级别由 `RUST_LOG` 控制（默认 info）
//!
//! 可选参数 `--config <path>` 指定 JSON 配置文件。

use fast_image_view::error::AppError;
use fast_image_view::image_request::{HttpImageFetcher, ImageRequestConfig};
use fast_image_view::view::{
    exported_direct_event_types, ChannelEventSink, FastImageViewManager, HostCommand, LoadEvent, VIEW_NAME,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            log::error!("❌ 配置加载失败: {}", err);
            std::process::exit(2);
        }
    };

    let fetcher = match HttpImageFetcher::new(config.clone()) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            log::error!("❌ 取图引擎初始化失败: {}", err);
            std::process::exit(2);
        }
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(write_events(event_rx));
    tokio::spawn(read_commands(command_tx));

    let manager = FastImageViewManager::new(fetcher, ChannelEventSink::new(event_tx), &config);
    manager.run(command_rx).await;

    if let Err(err) = writer.await {
        log::warn!("事件输出任务异常退出: {}", err);
    }
}

/// 解析 `--config <path>`；未指定时使用默认配置。
fn load_config(mut args: impl Iterator<Item = String>) -> Result<ImageRequestConfig, AppError> {
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                path = Some(
                    args.next()
                        .ok_or_else(|| AppError::Config("--config 缺少文件路径".to_string()))?,
                );
            }
            other => log::warn!("⚠️ 忽略未知参数: {}", other),
        }
    }

    let Some(path) = path else {
        return Ok(ImageRequestConfig::default());
    };

    let text = std::fs::read_to_string(&path)?;
    let config: ImageRequestConfig =
        serde_json::from_str(&text).map_err(|e| AppError::Config(format!("{}: {}", path, e)))?;
    config.validate()?;
    log::info!("⚙️ 已加载配置文件: {}", path);
    Ok(config)
}

async fn read_commands(commands: UnboundedSender<HostCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("❌ 读取 stdin 失败: {}", err);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<HostCommand>(line) {
            Ok(command) => {
                if commands.send(command).is_err() {
                    break;
                }
            }
            Err(err) => log::warn!("⚠️ 无法解析宿主命令: {}", err),
        }
    }
}

async fn write_events(mut events: UnboundedReceiver<LoadEvent>) {
    let mut stdout = tokio::io::stdout();

    let registration = serde_json::json!({
        "view": VIEW_NAME,
        "events": exported_direct_event_types(),
    });
    if write_line(&mut stdout, &registration.to_string()).await.is_err() {
        return;
    }

    while let Some(event) = events.recv().await {
        let line = match serde_json::to_string(&event.payload()) {
            Ok(line) => line,
            Err(err) => {
                log::warn!("事件序列化失败: {}", err);
                continue;
            }
        };
        if let Err(err) = write_line(&mut stdout, &line).await {
            log::error!("❌ 写入 stdout 失败: {}", err);
            return;
        }
    }
}

async fn write_line(stdout: &mut tokio::io::Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
