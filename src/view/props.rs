//! # 宿主属性解析
//!
//! 宿主通过 `source` 与 `resizeMode` 两个属性驱动视图：
//! - `source`：`{ uri, headers?, priority? }`，为 null 时取消并清空
//! - `resizeMode`：`contain | cover | stretch | center`，缺省或无法识别时按 `contain`
//!
//! 两张映射表都是不可变常量，不存在运行期可变的全局状态。

use serde::Deserialize;

use crate::image_request::{HeaderList, ImageSource, Priority};

/// `source` 属性的原始形态。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceProp {
    /// 缺省与显式 null 都按空字符串处理，交由取图引擎报告失败。
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub headers: Option<HeaderList>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl SourceProp {
    /// 转换为不可变的请求来源；无法识别的优先级回退为 `normal`。
    pub fn into_source(self) -> ImageSource {
        let priority = Priority::from_tag_or_default(self.priority.as_deref());
        let source = ImageSource::new(self.uri.unwrap_or_default()).with_priority(priority);
        match self.headers {
            Some(headers) => source.with_headers(headers),
            None => source,
        }
    }
}

/// 缩放模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeMode {
    #[default]
    Contain,
    Cover,
    Stretch,
    Center,
}

/// 宿主侧的缩放策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleType {
    FitCenter,
    CenterCrop,
    FitXy,
    Center,
}

const RESIZE_MODE_TABLE: [(&str, ResizeMode, ScaleType); 4] = [
    ("contain", ResizeMode::Contain, ScaleType::FitCenter),
    ("cover", ResizeMode::Cover, ScaleType::CenterCrop),
    ("stretch", ResizeMode::Stretch, ScaleType::FitXy),
    ("center", ResizeMode::Center, ScaleType::Center),
];

impl ResizeMode {
    /// 宽松解析，不报错。
    pub fn from_tag_or_default(tag: Option<&str>) -> Self {
        tag.and_then(|tag| {
            RESIZE_MODE_TABLE
                .iter()
                .find(|(name, _, _)| *name == tag)
                .map(|(_, mode, _)| *mode)
        })
        .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        RESIZE_MODE_TABLE
            .iter()
            .find(|(_, mode, _)| *mode == self)
            .map(|(name, _, _)| *name)
            .unwrap_or("contain")
    }

    pub fn scale_type(self) -> ScaleType {
        RESIZE_MODE_TABLE
            .iter()
            .find(|(_, mode, _)| *mode == self)
            .map(|(_, _, scale)| *scale)
            .unwrap_or(ScaleType::FitCenter)
    }
}
