//! 通用工具函数

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::DcmGenError;
use crate::Result;

/// DICOM UID 企业根标识符
pub const UID_ROOT: &str = "1.2.826.0.1.3680043.8.498";

/// 生成随机的DICOM标识符
///
/// 用于未指定种子时的退路，每次调用产生不同的UID。
pub fn generate_dicom_uid() -> String {
    format!(
        "{}.{}.{}.{}",
        UID_ROOT,
        Uuid::new_v4().simple(),
        Utc::now().timestamp(),
        std::process::id()
    )
}

/// 从种子字符串生成确定性DICOM UID
///
/// 基于SHA256哈希，相同的种子总是产生相同的UID。
/// 结果是合法的DICOM UID：长度不超过64字符，各段无前导零。
pub fn generate_deterministic_uid(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    let hash_hex = hex_string(&digest);

    // 取前30个十六进制字符（120位），转换为十进制数字串
    let numeric = u128::from_str_radix(&hash_hex[..30], 16)
        .expect("SHA256十六进制输出必然可解析")
        .to_string();

    // 切分为最多3段、每段10位，段内去除前导零
    let mut segments: Vec<String> = Vec::new();
    let bytes = numeric.as_bytes();
    let mut i = 0;
    while i < bytes.len() && segments.len() < 3 {
        let end = (i + 10).min(bytes.len());
        let mut segment = numeric[i..end].trim_start_matches('0').to_string();
        if segment.is_empty() {
            segment = "1".to_string();
        }
        segments.push(segment);
        i = end;
    }

    let mut uid = format!("{}.{}", UID_ROOT, segments.join("."));

    // UID 最长64字符
    if uid.len() > 64 {
        uid.truncate(63);
        while uid.ends_with('.') {
            uid.pop();
        }
    }

    uid
}

/// 从种子字符串派生确定性随机数种子
///
/// 取SHA256哈希的前8个字节，与UID派生共用同一哈希原语。
pub fn deterministic_seed(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("SHA256输出至少8字节"))
}

/// 验证DICOM UID格式
pub fn is_valid_dicom_uid(uid: &str) -> bool {
    // 简单的DICOM UID验证逻辑
    !uid.is_empty() && uid.len() <= 64 && uid.chars().all(|c| c.is_numeric() || c == '.')
}

/// 解析大小字符串（如 "100MB"、"4.5GB"）为字节数
///
/// 支持单位：KB、MB、GB。
pub fn parse_size(size_str: &str) -> Result<u64> {
    let s = size_str.trim();

    let (value_str, multiplier) = if let Some(v) = s.strip_suffix("KB") {
        (v, 1024_u64)
    } else if let Some(v) = s.strip_suffix("MB") {
        (v, 1024 * 1024)
    } else if let Some(v) = s.strip_suffix("GB") {
        (v, 1024 * 1024 * 1024)
    } else {
        return Err(DcmGenError::InvalidParameter(format!(
            "大小格式无效: '{}'，请使用类似 '100MB'、'4.5GB' 的格式",
            size_str
        )));
    };

    let value: f64 = value_str.parse().map_err(|_| {
        DcmGenError::InvalidParameter(format!("大小数值无效: '{}'", value_str))
    })?;

    if !value.is_finite() || value <= 0.0 {
        return Err(DcmGenError::InvalidParameter(format!(
            "大小必须为正数: '{}'",
            size_str
        )));
    }

    Ok((value * multiplier as f64) as u64)
}

/// 将浮点数格式化为DICOM DS（十进制字符串）值
pub fn format_ds(value: f64) -> String {
    format!("{:.6}", value)
}

/// 将整数格式化为DICOM IS（整数字符串）值
pub fn format_is(value: i64) -> String {
    value.to_string()
}

fn hex_string(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
