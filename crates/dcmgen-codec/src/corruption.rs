//! 破坏引擎：定向改写已编码元素的声明长度字段
//!
//! 在原始字节缓冲区中按字节模式定位目标标签，并就地改写其长度字段，
//! 使声明长度与真实值载荷不一致，用于验证下游解析器对畸形文件的
//! 容错能力。
//!
//! 定位刻意采用字节级扫描而非结构化解析：本引擎的输入往往本身就是
//! 畸形数据，结构化解析恰恰会在这类输入上失败。值载荷中偶然出现
//! 目标标签字节模式的误匹配是已接受的风险，调用方应在测试夹具中
//! 使用足够独特的标签。

use tracing::debug;

use crate::element::{RawElement, Tag};
use crate::vr::{is_long_form, LONG_HEADER_LEN, LONG_LENGTH_OFFSET, SHORT_HEADER_LEN, SHORT_LENGTH_OFFSET};

/// 生成畸形测试占位元素
///
/// 固定返回两个使用厂商保留组的合成元素，顺序与内容是契约的一部分：
/// 1. (0069,0010)，VR "OW"（长格式），空值载荷；
/// 2. (0071,0010)，VR "FL"（短格式），空值载荷。
pub fn generate_malformed_placeholders() -> Vec<RawElement> {
    vec![
        RawElement::new(Tag::new(0x0069, 0x0010), "OW", Vec::new()),
        RawElement::new(Tag::new(0x0071, 0x0010), "FL", Vec::new()),
    ]
}

/// 在缓冲区中定位目标标签并改写其声明长度字段
///
/// 从头扫描缓冲区，寻找 (group, element) 的4字节小端模式。命中后读取
/// 紧随的VR代码，按与编码器相同的分类表判定长度字段为2字节（短格式）
/// 还是4字节（长格式），并以对应宽度的小端编码就地写入 `new_length`。
/// 值载荷字节保持不动，由此产生声明长度与真实长度的不一致。
///
/// 命中并改写返回 `true`；缓冲区中不存在该标签（或所有候选位置的
/// 元素头均不完整）时返回 `false` 且缓冲区保持原样。候选位置距缓冲区
/// 末尾过近、容不下完整的VR+长度头时按未命中处理，继续向后扫描。
pub fn patch_tag_value_length(
    buf: &mut [u8],
    group: u16,
    element: u16,
    new_length: u32,
) -> bool {
    let pattern = Tag::new(group, element).to_le_bytes();

    let mut offset = 0;
    while offset + pattern.len() <= buf.len() {
        if buf[offset..offset + pattern.len()] != pattern {
            offset += 1;
            continue;
        }

        if try_patch_at(buf, offset, new_length) {
            debug!(
                "已在偏移 {} 处改写标签 {} 的长度字段为 {}",
                offset,
                Tag::new(group, element),
                new_length
            );
            return true;
        }

        // 候选位置头部不完整，按未命中处理，继续向后扫描
        offset += 1;
    }

    debug!("缓冲区中未找到标签 {}", Tag::new(group, element));
    false
}

/// 尝试在给定偏移处改写长度字段，头部不完整时返回 false
fn try_patch_at(buf: &mut [u8], offset: usize, new_length: u32) -> bool {
    // VR代码位于标签之后2字节处
    let vr_start = offset + 4;
    let vr_end = vr_start + 2;
    if vr_end > buf.len() {
        return false;
    }

    let long_form = std::str::from_utf8(&buf[vr_start..vr_end])
        .map(is_long_form)
        .unwrap_or(false);

    if long_form {
        if offset + LONG_HEADER_LEN > buf.len() {
            return false;
        }
        let field = &mut buf[offset + LONG_LENGTH_OFFSET..offset + LONG_LENGTH_OFFSET + 4];
        field.copy_from_slice(&new_length.to_le_bytes());
    } else {
        if offset + SHORT_HEADER_LEN > buf.len() {
            return false;
        }
        let field = &mut buf[offset + SHORT_LENGTH_OFFSET..offset + SHORT_LENGTH_OFFSET + 2];
        field.copy_from_slice(&(new_length as u16).to_le_bytes());
    }

    true
}
