//! # 解码流水线模块
//!
//! ## 设计思路
//!
//! 解码本身交给 `image` crate，这里只负责在关键节点加资源上限：
//! 先只读图片头拿到尺寸并按像素上限快速拒绝，再完整解码，避免恶意输入撑爆内存。
//!
//! 该函数是同步 CPU 密集型操作，调用方应在 `spawn_blocking` 中执行。

use std::io::Cursor;

use image::{GenericImageView, ImageReader};

use super::key::RequestKey;
use super::source::{LoadedImage, RawImageData};
use super::{FetchError, ImageRequestConfig};

/// 将原始字节解码为 RGBA 图片。
pub(crate) fn decode_image(
    raw: RawImageData,
    key: RequestKey,
    config: &ImageRequestConfig,
) -> Result<LoadedImage, FetchError> {
    let (header_width, header_height) = inspect_dimensions(&raw.bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&raw.bytes)
        .map_err(|e| FetchError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    validate_pixel_limits(config, width, height)?;

    let rgba = decoded.to_rgba8().into_raw();
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| FetchError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

    if rgba.len() != expected_len {
        return Err(FetchError::Decode("解码后像素数据长度异常".to_string()));
    }

    log::debug!(
        "✅ 图片解码成功 - 来源: {:?} 尺寸: {}x{}",
        raw.data_source,
        width,
        height
    );

    Ok(LoadedImage::new(key, width, height, rgba, raw.data_source))
}

/// 仅通过图片头读取宽高。
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), FetchError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FetchError::InvalidFormat(format!("无法识别图片格式：{}", e)))?
        .into_dimensions()
        .map_err(|e| FetchError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &ImageRequestConfig, width: u32, height: u32) -> Result<(), FetchError> {
    if width == 0 || height == 0 {
        return Err(FetchError::InvalidFormat("图片尺寸为 0".to_string()));
    }

    let pixels = (width as u64).saturating_mul(height as u64);
    if pixels > config.max_decoded_pixels {
        return Err(FetchError::ResourceLimit(format!(
            "图片像素过大：{}x{}（上限 {} 像素）",
            width, height, config.max_decoded_pixels
        )));
    }

    Ok(())
}
