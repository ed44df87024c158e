//! 错误定义模块

use thiserror::Error;

/// DCMGen系统统一错误类型
#[derive(Error, Debug)]
pub enum DcmGenError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("参数无效: {0}")]
    InvalidParameter(String),

    #[error("编码错误: VR {vr} 的值长度 {length} 超过长度字段最大可表示值 {max}")]
    ValueTooLong {
        vr: String,
        length: usize,
        max: u64,
    },

    #[error("DICOM处理错误: {0}")]
    Dicom(String),

    #[error("像素数据错误: {0}")]
    Pixel(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("系统内部错误: {0}")]
    Internal(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// DCMGen系统统一结果类型
pub type Result<T> = std::result::Result<T, DcmGenError>;
