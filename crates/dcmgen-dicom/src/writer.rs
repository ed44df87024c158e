//! DICOM文件写出与校验

use std::path::Path;

use dicom::dictionary_std::tags;
use dicom::object::{open_file, FileMetaTableBuilder, InMemDicomObject};
use tracing::{debug, warn};

use dcmgen_core::{DcmGenError, Result};

/// 本实现的Implementation Class UID
pub const IMPLEMENTATION_CLASS_UID: &str = "1.2.826.0.1.3680043.8.498";

/// 显式VR Little Endian传输语法
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// 将数据集以Explicit VR Little Endian写出为DICOM Part 10文件
///
/// 文件元信息中的Media Storage SOP Class/Instance UID取自数据集内的
/// SOP Class UID与SOP Instance UID元素。
pub fn write_instance(path: &Path, obj: InMemDicomObject) -> Result<()> {
    let file_obj = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
                .implementation_class_uid(IMPLEMENTATION_CLASS_UID),
        )
        .map_err(|e| DcmGenError::Dicom(format!("构建文件元信息失败: {:?}", e)))?;

    file_obj
        .write_to_file(path)
        .map_err(|e| DcmGenError::Dicom(format!("写出DICOM文件 {:?} 失败: {:?}", path, e)))?;

    debug!("已写出DICOM文件: {:?}", path);
    Ok(())
}

/// 校验DICOM文件完整性
///
/// 重新解析文件并检查必要标签是否齐全；解析失败或缺失标签时返回false。
pub fn verify_instance<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<bool> {
    let path = path.as_ref();
    debug!("校验DICOM文件完整性: {:?}", path);

    match open_file(path) {
        Ok(obj) => {
            // 检查必要的DICOM标签
            let required_tags = [
                tags::SOP_CLASS_UID,
                tags::SOP_INSTANCE_UID,
                tags::STUDY_INSTANCE_UID,
                tags::SERIES_INSTANCE_UID,
            ];

            for tag in &required_tags {
                if obj.element(*tag).is_err() {
                    warn!("DICOM文件缺少必要标签: {:?}", tag);
                    return Ok(false);
                }
            }

            Ok(true)
        }
        Err(e) => {
            warn!("DICOM文件校验失败: {:?}, 错误: {:?}", path, e);
            Ok(false)
        }
    }
}
