//! 文件级破坏入口
//!
//! 将底层破坏引擎（`dcmgen-codec`）接到已写出的DICOM文件上：
//! 向文件追加畸形占位元素，或改写目标标签的声明长度。两种操作
//! 都直接作用于原始文件字节，不经过数据集对象模型。

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use dcmgen_codec::{generate_malformed_placeholders, patch_tag_value_length};
use dcmgen_core::{DcmGenError, Result};

/// 向文件末尾追加畸形占位元素
///
/// 占位元素使用厂商保留组标签，顺序与内容固定，用于触发下游
/// 解析器对非常规标签的处理路径。
pub fn append_malformed_placeholders(path: &Path) -> Result<()> {
    let mut bytes = fs::read(path)?;

    for element in generate_malformed_placeholders() {
        bytes.extend(element.encode()?);
    }

    fs::write(path, &bytes)?;
    info!("已向 {:?} 追加畸形占位元素", path);
    Ok(())
}

/// 改写文件中目标标签的声明长度字段
///
/// 找到并改写时返回true；文件中不存在该标签时返回false且文件
/// 保持原样——未命中是扫描操作的预期结果，不视为错误。
pub fn corrupt_declared_length(
    path: &Path,
    group: u16,
    element: u16,
    new_length: u32,
) -> Result<bool> {
    let mut bytes = fs::read(path)?;

    let found = patch_tag_value_length(&mut bytes, group, element, new_length);
    if found {
        fs::write(path, &bytes)?;
        info!(
            "已将 {:?} 中标签 ({:04X},{:04X}) 的声明长度改写为 {}",
            path, group, element, new_length
        );
    } else {
        warn!(
            "未找到目标标签 ({:04X},{:04X})，文件 {:?} 保持原样",
            group, element, path
        );
    }

    Ok(found)
}

/// 解析 "GGGG,EEEE" 形式的十六进制标签说明
pub fn parse_tag_spec(spec: &str) -> Result<(u16, u16)> {
    let (group_str, element_str) = spec.split_once(',').ok_or_else(|| {
        DcmGenError::Config(format!(
            "标签格式无效: '{}'，应为十六进制 'GGGG,EEEE'",
            spec
        ))
    })?;

    let group = u16::from_str_radix(group_str.trim(), 16).map_err(|_| {
        DcmGenError::Config(format!("标签组号无效: '{}'", group_str))
    })?;
    let element = u16::from_str_radix(element_str.trim(), 16).map_err(|_| {
        DcmGenError::Config(format!("标签元素号无效: '{}'", element_str))
    })?;

    Ok((group, element))
}
