//! DICOMDIR层级组织与索引构建
//!
//! 把生成的平铺文件整理为 PT*/ST*/SE*/IM* 标准层级，并写出带
//! PATIENT/STUDY/SERIES/IMAGE目录记录序列的DICOMDIR索引文件。

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use dicom::core::value::{DataSetSequence, Value};
use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, Tag, VR};
use dicom::dictionary_std::tags;
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use tracing::{debug, info};

use dcmgen_core::{DcmGenError, GeneratedFile, Result};

use crate::writer::{EXPLICIT_VR_LITTLE_ENDIAN, IMPLEMENTATION_CLASS_UID};

/// Media Storage Directory Storage SOP Class
const MEDIA_STORAGE_DIRECTORY_STORAGE: &str = "1.2.840.10008.1.3.10";

/// DICOMDIR实例UID
const DICOMDIR_SOP_INSTANCE_UID: &str = "1.2.826.0.1.3680043.8.498.1";

// 目录记录相关标签（组0004）
const FILE_SET_ID: Tag = Tag(0x0004, 0x1130);
const OFFSET_FIRST_ROOT_RECORD: Tag = Tag(0x0004, 0x1200);
const OFFSET_LAST_ROOT_RECORD: Tag = Tag(0x0004, 0x1202);
const DIRECTORY_RECORD_SEQUENCE: Tag = Tag(0x0004, 0x1220);
const OFFSET_NEXT_RECORD: Tag = Tag(0x0004, 0x1400);
const OFFSET_LOWER_LEVEL_ENTITY: Tag = Tag(0x0004, 0x1420);
const DIRECTORY_RECORD_TYPE: Tag = Tag(0x0004, 0x1430);
const REFERENCED_FILE_ID: Tag = Tag(0x0004, 0x1500);
const REFERENCED_SOP_CLASS_UID_IN_FILE: Tag = Tag(0x0004, 0x1510);
const REFERENCED_SOP_INSTANCE_UID_IN_FILE: Tag = Tag(0x0004, 0x1511);
const REFERENCED_TRANSFER_SYNTAX_UID_IN_FILE: Tag = Tag(0x0004, 0x1512);

/// 把生成的文件组织为PT/ST/SE层级并创建DICOMDIR
///
/// 文件按患者→检查→序列分组后移动到层级目录内，`files` 中的路径
/// 更新为层级内的相对路径，随后写出DICOMDIR并清理残留的临时文件。
pub fn organize_into_dicomdir(output_dir: &Path, files: &mut [GeneratedFile]) -> Result<()> {
    if files.is_empty() {
        return Err(DcmGenError::InvalidParameter(
            "没有可组织的文件".to_string(),
        ));
    }

    info!("开始组织PT/ST/SE层级并创建DICOMDIR...");

    // 按患者 -> 检查 -> 序列分组（BTreeMap保证稳定顺序）
    let mut patients: BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<usize>>>> =
        BTreeMap::new();
    for (idx, file) in files.iter().enumerate() {
        patients
            .entry(file.patient_id.clone())
            .or_default()
            .entry(file.study_uid.clone())
            .or_default()
            .entry(file.series_uid.clone())
            .or_default()
            .push(idx);
    }

    // 创建层级目录并移动文件
    let mut total_moved = 0;
    for (patient_idx, studies) in patients.values().enumerate() {
        let patient_dir = format!("PT{:06}", patient_idx);

        for (study_idx, series_map) in studies.values().enumerate() {
            let study_dir = format!("ST{:06}", study_idx);

            for (series_idx, indices) in series_map.values().enumerate() {
                let series_dir = format!("SE{:06}", series_idx);
                let series_path = output_dir
                    .join(&patient_dir)
                    .join(&study_dir)
                    .join(&series_dir);
                fs::create_dir_all(&series_path)?;

                // 按实例号排序后移动
                let mut sorted = indices.clone();
                sorted.sort_by_key(|&i| files[i].instance_number);

                for (image_idx, &file_idx) in sorted.iter().enumerate() {
                    let image_name = format!("IM{:06}", image_idx + 1);
                    let dest = series_path.join(&image_name);

                    fs::rename(&files[file_idx].path, &dest)?;

                    // 相对路径统一使用正斜杠
                    files[file_idx].path = format!(
                        "{}/{}/{}/{}",
                        patient_dir, study_dir, series_dir, image_name
                    );
                    total_moved += 1;
                }
            }
        }
    }

    info!("已将 {} 个文件组织为PT*/ST*/SE*结构", total_moved);

    create_dicomdir_file(output_dir, files)?;

    // 清理残留的IMG*.dcm临时文件
    let mut removed = 0;
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with("IMG") && name.ends_with(".dcm") && fs::remove_file(entry.path()).is_ok()
        {
            removed += 1;
        }
    }
    if removed > 0 {
        debug!("已清理 {} 个临时文件", removed);
    }

    info!("DICOMDIR已创建，目录可整体导入");
    Ok(())
}

/// 写出带目录记录序列的DICOMDIR文件
///
/// 记录间的字节偏移字段写0，构建时不回填真实偏移。
fn create_dicomdir_file(output_dir: &Path, files: &[GeneratedFile]) -> Result<()> {
    let dicomdir_path = output_dir.join("DICOMDIR");

    // 与组织阶段相同的分组
    let mut patients: BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<&GeneratedFile>>>> =
        BTreeMap::new();
    for file in files {
        patients
            .entry(file.patient_id.clone())
            .or_default()
            .entry(file.study_uid.clone())
            .or_default()
            .entry(file.series_uid.clone())
            .or_default()
            .push(file);
    }

    // 构建目录记录序列
    let mut records: Vec<InMemDicomObject> = Vec::new();

    for studies in patients.values() {
        // 任一文件都携带患者信息
        let first = studies
            .values()
            .next()
            .and_then(|s| s.values().next())
            .and_then(|f| f.first())
            .expect("分组不可能为空");

        let mut patient_record = new_record("PATIENT");
        patient_record.put(DataElement::new(
            tags::PATIENT_ID,
            VR::LO,
            PrimitiveValue::from(first.patient_id.as_str()),
        ));
        patient_record.put(DataElement::new(
            tags::PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from(first.patient_name.as_str()),
        ));
        records.push(patient_record);

        for series_map in studies.values() {
            let study_first = series_map
                .values()
                .next()
                .and_then(|f| f.first())
                .expect("检查分组不可能为空");

            let mut study_record = new_record("STUDY");
            study_record.put(DataElement::new(
                tags::STUDY_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from(study_first.study_uid.as_str()),
            ));
            study_record.put(DataElement::new(
                tags::STUDY_ID,
                VR::SH,
                PrimitiveValue::from(study_first.study_id.as_str()),
            ));
            study_record.put(DataElement::new(
                tags::STUDY_DATE,
                VR::DA,
                PrimitiveValue::from(study_first.study_date.as_str()),
            ));
            study_record.put(DataElement::new(
                tags::STUDY_TIME,
                VR::TM,
                PrimitiveValue::from(study_first.study_time.as_str()),
            ));
            records.push(study_record);

            for series_files in series_map.values() {
                let series_first = series_files.first().expect("序列分组不可能为空");

                let mut series_record = new_record("SERIES");
                series_record.put(DataElement::new(
                    tags::MODALITY,
                    VR::CS,
                    PrimitiveValue::from(series_first.modality.as_str()),
                ));
                series_record.put(DataElement::new(
                    tags::SERIES_INSTANCE_UID,
                    VR::UI,
                    PrimitiveValue::from(series_first.series_uid.as_str()),
                ));
                series_record.put(DataElement::new(
                    tags::SERIES_NUMBER,
                    VR::IS,
                    PrimitiveValue::from(series_first.series_number.to_string()),
                ));
                records.push(series_record);

                for image in series_files {
                    let path_parts: Vec<String> =
                        image.path.split('/').map(|s| s.to_string()).collect();

                    let mut image_record = new_record("IMAGE");
                    image_record.put(DataElement::new(
                        REFERENCED_FILE_ID,
                        VR::CS,
                        PrimitiveValue::Strs(path_parts.into()),
                    ));
                    image_record.put(DataElement::new(
                        REFERENCED_SOP_CLASS_UID_IN_FILE,
                        VR::UI,
                        PrimitiveValue::from(image.sop_class_uid.as_str()),
                    ));
                    image_record.put(DataElement::new(
                        REFERENCED_SOP_INSTANCE_UID_IN_FILE,
                        VR::UI,
                        PrimitiveValue::from(image.sop_instance_uid.as_str()),
                    ));
                    image_record.put(DataElement::new(
                        REFERENCED_TRANSFER_SYNTAX_UID_IN_FILE,
                        VR::UI,
                        PrimitiveValue::from(EXPLICIT_VR_LITTLE_ENDIAN),
                    ));
                    records.push(image_record);
                }
            }
        }
    }

    // DICOMDIR数据集
    let mut ds = InMemDicomObject::new_empty();

    // 文件集标识（最长16字符）
    let mut fileset_id = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "DCMGEN".to_string());
    fileset_id.truncate(16);
    ds.put(DataElement::new(
        FILE_SET_ID,
        VR::CS,
        PrimitiveValue::from(fileset_id),
    ));

    // 根目录记录偏移——应为字节偏移，这里写0
    ds.put(DataElement::new(
        OFFSET_FIRST_ROOT_RECORD,
        VR::UL,
        PrimitiveValue::from(0_u32),
    ));
    ds.put(DataElement::new(
        OFFSET_LAST_ROOT_RECORD,
        VR::UL,
        PrimitiveValue::from(0_u32),
    ));

    if !records.is_empty() {
        ds.put(DataElement::new(
            DIRECTORY_RECORD_SEQUENCE,
            VR::SQ,
            Value::Sequence(DataSetSequence::from(records)),
        ));
    }

    let file_obj = ds
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(MEDIA_STORAGE_DIRECTORY_STORAGE)
                .media_storage_sop_instance_uid(DICOMDIR_SOP_INSTANCE_UID)
                .implementation_class_uid(IMPLEMENTATION_CLASS_UID),
        )
        .map_err(|e| DcmGenError::Dicom(format!("构建DICOMDIR元信息失败: {:?}", e)))?;

    file_obj
        .write_to_file(&dicomdir_path)
        .map_err(|e| DcmGenError::Dicom(format!("写出DICOMDIR失败: {:?}", e)))?;

    debug!("DICOMDIR已写出: {:?}", dicomdir_path);
    Ok(())
}

/// 创建一条目录记录，偏移字段置0
fn new_record(record_type: &str) -> InMemDicomObject {
    let mut record = InMemDicomObject::new_empty();
    record.put(DataElement::new(
        OFFSET_NEXT_RECORD,
        VR::UL,
        PrimitiveValue::from(0_u32),
    ));
    record.put(DataElement::new(
        OFFSET_LOWER_LEVEL_ENTITY,
        VR::UL,
        PrimitiveValue::from(0_u32),
    ));
    record.put(DataElement::new(
        DIRECTORY_RECORD_TYPE,
        VR::CS,
        PrimitiveValue::from(record_type),
    ));
    record
}
