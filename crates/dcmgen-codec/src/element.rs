//! 数据元素的二进制编码与解码
//!
//! 实现显式VR Little Endian下单个元素的磁盘字节布局：
//!
//! ```text
//! 短格式: [group:2][element:2][VR:2][length:2][value...]
//! 长格式: [group:2][element:2][VR:2][reserved:2][length:4][value...]
//! ```
//!
//! 所有多字节整数均为小端序。长度字段恒等于值载荷的字节数，
//! 编码器本身从不产生不一致的输出（不一致由破坏引擎在编码后注入）。

use std::fmt;

use dcmgen_core::{DcmGenError, Result};

use crate::vr::{is_long_form, MAX_LONG_LENGTH, MAX_SHORT_LENGTH};

/// DICOM标签：(group, element) 16位无符号对
///
/// 按 (group, element) 精确相等比较，不支持范围或通配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub group: u16,
    pub element: u16,
}

impl Tag {
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }

    /// 标签在小端序下的4字节磁盘表示
    pub fn to_le_bytes(self) -> [u8; 4] {
        let g = self.group.to_le_bytes();
        let e = self.element.to_le_bytes();
        [g[0], g[1], e[0], e[1]]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group, self.element)
    }
}

/// 一个待编码（或已解码）的数据元素：(标签, VR, 原始值字节)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub tag: Tag,
    pub vr: String,
    pub value: Vec<u8>,
}

impl RawElement {
    pub fn new(tag: Tag, vr: &str, value: Vec<u8>) -> Self {
        Self {
            tag,
            vr: vr.to_string(),
            value,
        }
    }

    /// 编码为磁盘字节布局
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_element(self.tag, &self.vr, &self.value)
    }
}

/// 将 (标签, VR, 值字节) 编码为显式VR Little Endian布局
///
/// VR属于长格式集合时使用4字节长度字段，否则使用2字节长度字段。
/// 值长度超过对应长度字段可表示的最大值时返回编码错误，绝不静默截断。
pub fn encode_element(tag: Tag, vr: &str, value: &[u8]) -> Result<Vec<u8>> {
    if vr.len() != 2 || !vr.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(DcmGenError::InvalidParameter(format!(
            "VR代码无效: {:?}，应为2个ASCII大写字母",
            vr
        )));
    }

    let long_form = is_long_form(vr);
    let max = if long_form {
        MAX_LONG_LENGTH
    } else {
        MAX_SHORT_LENGTH
    };
    if value.len() as u64 > max {
        return Err(DcmGenError::ValueTooLong {
            vr: vr.to_string(),
            length: value.len(),
            max,
        });
    }

    let header_len = if long_form {
        crate::vr::LONG_HEADER_LEN
    } else {
        crate::vr::SHORT_HEADER_LEN
    };
    let mut out = Vec::with_capacity(header_len + value.len());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(vr.as_bytes());

    if long_form {
        // 2字节保留区 + 4字节长度
        out.extend_from_slice(&[0u8, 0u8]);
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    } else {
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    }

    out.extend_from_slice(value);
    Ok(out)
}

/// 从缓冲区起始处解码一个元素，返回元素和消耗的字节数
///
/// 主要供测试与校验使用；生成管线只使用编码方向。
pub fn decode_element(buf: &[u8]) -> Result<(RawElement, usize)> {
    if buf.len() < 8 {
        return Err(DcmGenError::Dicom(format!(
            "元素缓冲区截断: 至少需要8字节，实际 {} 字节",
            buf.len()
        )));
    }

    let group = u16::from_le_bytes([buf[0], buf[1]]);
    let element = u16::from_le_bytes([buf[2], buf[3]]);
    let vr = std::str::from_utf8(&buf[4..6])
        .map_err(|_| DcmGenError::Dicom("VR字段不是有效的ASCII".to_string()))?
        .to_string();

    let (length, header_len): (usize, usize) = if is_long_form(&vr) {
        if buf.len() < 12 {
            return Err(DcmGenError::Dicom(
                "元素缓冲区截断: 长格式头不完整".to_string(),
            ));
        }
        (
            u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]) as usize,
            12,
        )
    } else {
        (u16::from_le_bytes([buf[6], buf[7]]) as usize, 8)
    };

    let end = header_len
        .checked_add(length)
        .ok_or_else(|| DcmGenError::Dicom("声明长度导致溢出".to_string()))?;
    if end > buf.len() {
        return Err(DcmGenError::Dicom(format!(
            "元素缓冲区截断: 声明长度 {} 超出剩余 {} 字节",
            length,
            buf.len() - header_len
        )));
    }

    Ok((
        RawElement {
            tag: Tag::new(group, element),
            vr,
            value: buf[header_len..end].to_vec(),
        },
        end,
    ))
}
