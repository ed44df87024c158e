//! DICOM序列生成器
//!
//! 串起全部部件：尺寸推算、确定性种子、患者/检查/序列/实例的
//! 逐层生成、像素合成与文件写出。

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use dcmgen_core::utils::{deterministic_seed, generate_deterministic_uid, parse_size};
use dcmgen_core::{DcmGenError, GeneratedFile, Modality, Result, SeriesRange};
use dcmgen_image::{burn_instance_label, generate_pixels};
use dcmgen_modality::clinical::{generate_body_part, generate_clinical_indication, generate_protocol_name};
use dcmgen_modality::institutions::generate_institution;
use dcmgen_modality::names::generate_patient_name;
use dcmgen_modality::{default_series_count, get_generator, series_templates_for};

use crate::corruption::append_malformed_placeholders;
use crate::metadata::{
    append_pixel_data, append_position_info, append_sop_instance_uid, generate_metadata,
    MetadataOptions,
};
use crate::tag_overrides::{apply_overrides, ParsedTags};
use crate::writer::write_instance;

/// 生成一批DICOM序列所需的全部参数
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// 生成的图像总数
    pub num_images: usize,
    /// 目标总大小（如 "100MB"、"4.5GB"）
    pub total_size: String,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 随机种子；不指定时由输出目录名确定性派生
    pub seed: Option<u64>,
    /// 检查数量
    pub num_studies: usize,
    /// 成像模态
    pub modality: Modality,
    /// 每项检查的序列数范围；不指定时使用模态默认值
    pub series_range: Option<SeriesRange>,
    /// 检查部位；不指定时按模态随机
    pub body_part: Option<String>,
    /// 命名标签覆盖
    pub tag_overrides: ParsedTags,
    /// 是否向每个文件追加畸形占位元素
    pub malformed: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            num_images: 10,
            total_size: "50MB".to_string(),
            output_dir: PathBuf::from("./dicom_out"),
            seed: None,
            num_studies: 1,
            modality: Modality::MR,
            series_range: None,
            body_part: None,
            tag_overrides: ParsedTags::default(),
            malformed: false,
        }
    }
}

/// 元数据开销预估（字节）
const METADATA_OVERHEAD: u64 = 100 * 1024;

/// 根据目标总大小与图像数推算最优图像尺寸
///
/// 扣除元数据开销后按每像素字节数折算总像素量，取平方根并向下
/// 取整到256的倍数（小图取128），保证实际产出不超过目标大小。
pub fn calculate_dimensions(
    total_bytes: u64,
    num_images: usize,
    bytes_per_pixel: u64,
) -> Result<(usize, usize)> {
    if total_bytes == 0 {
        return Err(DcmGenError::InvalidParameter(
            "目标总大小必须 > 0".to_string(),
        ));
    }
    if num_images == 0 {
        return Err(DcmGenError::InvalidParameter(
            "图像数必须 > 0".to_string(),
        ));
    }

    if total_bytes <= METADATA_OVERHEAD {
        return Err(DcmGenError::InvalidParameter(
            "目标总大小过小（元数据至少需要100KB）".to_string(),
        ));
    }
    let mut available = total_bytes - METADATA_OVERHEAD;

    // 单文件大小上限（2^32 - 10MB）
    let max_dicom_size = (1_u64 << 32) - 10 * 1024 * 1024;
    if available > max_dicom_size {
        available = max_dicom_size;
    }

    let total_pixels = available / bytes_per_pixel.max(1);
    let pixels_per_frame = total_pixels / num_images as u64;
    let dimension = (pixels_per_frame as f64).sqrt() as usize;

    // 向下取整到256的倍数，避免超出目标大小
    let width = if dimension >= 256 {
        (dimension / 256) * 256
    } else {
        128
    };

    Ok((width, width))
}

/// 生成完整的DICOM序列
///
/// 返回每个写出实例的记录，供目录组织、DICOMDIR与清单输出使用。
pub fn generate_series(opts: &GeneratorOptions) -> Result<Vec<GeneratedFile>> {
    if opts.num_studies == 0 {
        return Err(DcmGenError::InvalidParameter(
            "检查数必须 >= 1".to_string(),
        ));
    }
    if opts.num_images < opts.num_studies {
        return Err(DcmGenError::InvalidParameter(format!(
            "图像数 ({}) 必须 >= 检查数 ({})",
            opts.num_images, opts.num_studies
        )));
    }

    let generator = get_generator(opts.modality);
    let pixel_config = generator.pixel_config();
    let bytes_per_pixel = (pixel_config.bits_allocated as u64 + 7) / 8;

    let total_bytes = parse_size(&opts.total_size)?;
    let (width, height) = calculate_dimensions(total_bytes, opts.num_images, bytes_per_pixel)?;
    info!("图像分辨率: {}x{} 像素", width, height);

    fs::create_dir_all(&opts.output_dir)?;

    let dir_str = opts.output_dir.to_string_lossy().to_string();
    let seed = match opts.seed {
        Some(seed) => {
            info!("使用指定种子: {}", seed);
            seed
        }
        None => {
            // 同一输出目录总是得到相同的患者/检查标识
            let seed = deterministic_seed(&dir_str);
            info!("由输出目录 '{}' 派生种子: {}", dir_str, seed);
            seed
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);

    // 全部检查共享的患者身份
    let patient_id = format!("PID{:06}", rng.gen_range(100_000..1_000_000));
    let patient_sex = if rng.gen_bool(0.5) { "M" } else { "F" };
    let patient_name = generate_patient_name(patient_sex, &mut rng);
    let patient_birth_date = format!(
        "{:04}{:02}{:02}",
        rng.gen_range(1950..2001),
        rng.gen_range(1..13),
        rng.gen_range(1..29),
    );

    let body_part = match &opts.body_part {
        Some(part) => part.clone(),
        None => generate_body_part(opts.modality, &mut rng).to_string(),
    };
    let institution = generate_institution(&mut rng);

    info!(
        "患者: {} (ID: {}, 出生: {}, 性别: {})",
        patient_name, patient_id, patient_birth_date, patient_sex
    );
    info!(
        "模态: {}，部位: {}，检查数: {}，图像总数: {}",
        opts.modality, body_part, opts.num_studies, opts.num_images
    );

    let scanners = generator.scanners();
    let images_per_study = opts.num_images / opts.num_studies;
    let remaining_images = opts.num_images % opts.num_studies;

    let now = Utc::now();
    let study_date = now.format("%Y%m%d").to_string();
    let study_time = now.format("%H%M%S").to_string();

    let mut generated_files = Vec::with_capacity(opts.num_images);
    let mut global_index: usize = 1;

    for study_num in 1..=opts.num_studies {
        let study_uid =
            generate_deterministic_uid(&format!("{}_study_{}", dir_str, study_num));
        let study_id = format!("STD{:04}", rng.gen_range(1000..10_000));
        let accession_number = format!("ACC{:06}", rng.gen_range(100_000..1_000_000));
        let protocol_name = generate_protocol_name(opts.modality, &body_part, &mut rng);
        let study_description = generate_clinical_indication(&body_part, &mut rng).to_string();

        let scanner = scanners
            .choose(&mut rng)
            .cloned()
            .ok_or_else(|| DcmGenError::Internal("设备表为空".to_string()))?;

        let series_count = match opts.series_range {
            Some(range) => range.pick(&mut rng),
            None => default_series_count(opts.modality),
        };
        let templates =
            series_templates_for(opts.modality, &body_part, series_count as usize, &mut rng);

        let mut images_this_study = images_per_study;
        if study_num <= remaining_images {
            images_this_study += 1;
        }

        info!(
            "检查 {}/{}: {} 幅图像，{} 个序列",
            study_num,
            opts.num_studies,
            images_this_study,
            templates.len()
        );
        info!(
            "  检查号: {}，协议: {}，设备: {} {}",
            study_id, protocol_name, scanner.manufacturer, scanner.model
        );

        let images_per_series = images_this_study / templates.len();
        let remaining_in_study = images_this_study % templates.len();

        for (series_idx, template) in templates.iter().enumerate() {
            let series_number = (series_idx + 1) as i32;
            let series_uid = generate_deterministic_uid(&format!(
                "{}_study_{}_series_{}",
                dir_str, study_num, series_number
            ));

            // 序列参数以模态生成器为基础，再套用模板覆盖
            let mut params = generator.generate_series_params(&scanner, &mut rng);
            if !template.sequence_name.is_empty() {
                params.sequence_name = template.sequence_name.to_string();
            }
            if template.window_width != 0.0 {
                params.window_center = template.window_center;
                params.window_width = template.window_width;
            }

            let mut images_this_series = images_per_series;
            if series_idx < remaining_in_study {
                images_this_series += 1;
            }

            debug!(
                "  序列 {}: \"{}\"，{} 幅图像",
                series_number, template.series_description, images_this_series
            );

            for instance_in_series in 1..=images_this_series {
                let sop_instance_uid = generate_deterministic_uid(&format!(
                    "{}_study_{}_series_{}_instance_{}",
                    dir_str, study_num, series_number, instance_in_series
                ));

                let metadata_opts = MetadataOptions {
                    width,
                    height,
                    instance_number: instance_in_series as i32,
                    study_uid: study_uid.clone(),
                    series_uid: series_uid.clone(),
                    patient_id: patient_id.clone(),
                    patient_name: patient_name.clone(),
                    patient_birth_date: patient_birth_date.clone(),
                    patient_sex: patient_sex.to_string(),
                    study_date: study_date.clone(),
                    study_time: study_time.clone(),
                    study_id: study_id.clone(),
                    study_description: study_description.clone(),
                    accession_number: accession_number.clone(),
                    series_number,
                    series_description: template.series_description.to_string(),
                    body_part: body_part.clone(),
                    protocol_name: protocol_name.clone(),
                    institution_name: institution.name.to_string(),
                    institution_address: institution.address.to_string(),
                    institution_department: institution.department.to_string(),
                    contrast_agent: if template.has_contrast {
                        template.contrast_agent.to_string()
                    } else {
                        String::new()
                    },
                    params: params.clone(),
                };

                let mut obj = generate_metadata(&metadata_opts)?;
                append_sop_instance_uid(&mut obj, &sop_instance_uid);

                // 层面位置信息
                let slice_position =
                    (instance_in_series as f64 - 1.0) * params.spacing_between_slices;
                append_position_info(
                    &mut obj,
                    &template.image_orientation_patient(),
                    slice_position,
                );

                // 合成像素并烧录实例标注
                let pixel_seed = seed.wrapping_add(global_index as u64 * 1000);
                let mut pixels = generate_pixels(width, height, pixel_seed, &pixel_config);
                burn_instance_label(
                    &mut pixels,
                    width,
                    height,
                    global_index,
                    opts.num_images,
                    &pixel_config,
                )?;
                append_pixel_data(&mut obj, pixels, pixel_config.bits_allocated);

                // 命名标签覆盖最后应用，保证覆盖生效
                apply_overrides(&mut obj, &opts.tag_overrides)?;

                let filename = format!("IMG{:04}.dcm", global_index);
                let file_path = opts.output_dir.join(&filename);
                write_instance(&file_path, obj)?;

                if opts.malformed {
                    append_malformed_placeholders(&file_path)?;
                }

                generated_files.push(GeneratedFile {
                    path: file_path.to_string_lossy().to_string(),
                    patient_id: patient_id.clone(),
                    patient_name: patient_name.clone(),
                    study_uid: study_uid.clone(),
                    study_id: study_id.clone(),
                    study_date: study_date.clone(),
                    study_time: study_time.clone(),
                    series_uid: series_uid.clone(),
                    series_number,
                    modality: opts.modality,
                    sop_class_uid: generator.sop_class_uid().to_string(),
                    sop_instance_uid,
                    instance_number: instance_in_series as i32,
                });

                if global_index % 10 == 0 || global_index == opts.num_images {
                    info!(
                        "  进度: {}/{} ({:.0}%)",
                        global_index,
                        opts.num_images,
                        global_index as f64 / opts.num_images as f64 * 100.0
                    );
                }

                global_index += 1;
            }
        }
    }

    info!(
        "已在 {:?} 生成 {} 个DICOM文件",
        opts.output_dir,
        generated_files.len()
    );

    Ok(generated_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::verify_instance;
    use std::collections::HashSet;

    #[test]
    fn test_calculate_dimensions_rounds_to_256() {
        // 100MB、10幅、2字节/像素 → 2048x2048
        let (w, h) = calculate_dimensions(100 * 1024 * 1024, 10, 2).unwrap();
        assert_eq!((w, h), (2048, 2048));
    }

    #[test]
    fn test_calculate_dimensions_minimum_128() {
        // 可用空间很小时取128的下限
        let (w, h) = calculate_dimensions(1024 * 1024, 100, 2).unwrap();
        assert_eq!((w, h), (128, 128));
    }

    #[test]
    fn test_calculate_dimensions_invalid_input() {
        assert!(calculate_dimensions(0, 10, 2).is_err());
        assert!(calculate_dimensions(100 * 1024 * 1024, 0, 2).is_err());
        // 小于元数据开销
        assert!(calculate_dimensions(50 * 1024, 10, 2).is_err());
    }

    #[test]
    fn test_generate_series_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let opts = GeneratorOptions {
            num_images: 4,
            total_size: "2MB".to_string(),
            output_dir: dir.path().to_path_buf(),
            seed: Some(42),
            num_studies: 2,
            modality: Modality::MR,
            ..Default::default()
        };

        let files = generate_series(&opts).unwrap();

        assert_eq!(files.len(), 4);
        for file in &files {
            assert!(std::path::Path::new(&file.path).exists());
            assert!(verify_instance(&file.path).unwrap());
            assert_eq!(file.modality, Modality::MR);
            assert_eq!(file.sop_class_uid, "1.2.840.10008.5.1.4.1.1.4");
        }

        // 两项检查各有独立的Study UID
        let study_uids: HashSet<_> = files.iter().map(|f| f.study_uid.clone()).collect();
        assert_eq!(study_uids.len(), 2);

        // 同一患者
        let patient_ids: HashSet<_> = files.iter().map(|f| f.patient_id.clone()).collect();
        assert_eq!(patient_ids.len(), 1);
    }

    #[test]
    fn test_generate_series_deterministic_uids_with_same_seed() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        // UID由输出目录派生：相同目录名（不同父目录）时由种子控制其余随机量
        let opts_a = GeneratorOptions {
            num_images: 1,
            total_size: "1MB".to_string(),
            output_dir: dir_a.path().join("case"),
            seed: Some(7),
            num_studies: 1,
            ..Default::default()
        };
        let opts_b = GeneratorOptions {
            output_dir: dir_b.path().join("case"),
            ..opts_a.clone()
        };

        let files_a = generate_series(&opts_a).unwrap();
        let files_b = generate_series(&opts_b).unwrap();

        // 相同种子下患者身份一致
        assert_eq!(files_a[0].patient_id, files_b[0].patient_id);
        assert_eq!(files_a[0].patient_name, files_b[0].patient_name);
    }

    #[test]
    fn test_generate_series_rejects_bad_options() {
        let dir = tempfile::tempdir().unwrap();

        let zero_studies = GeneratorOptions {
            num_studies: 0,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(generate_series(&zero_studies).is_err());

        let more_studies_than_images = GeneratorOptions {
            num_images: 2,
            num_studies: 5,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(generate_series(&more_studies_than_images).is_err());

        let bad_size = GeneratorOptions {
            total_size: "lots".to_string(),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(generate_series(&bad_size).is_err());
    }

    #[test]
    fn test_generate_series_malformed_appends_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let opts = GeneratorOptions {
            num_images: 1,
            total_size: "1MB".to_string(),
            output_dir: dir.path().to_path_buf(),
            seed: Some(1),
            malformed: true,
            ..Default::default()
        };

        let files = generate_series(&opts).unwrap();
        let bytes = std::fs::read(&files[0].path).unwrap();

        // 占位元素位于文件末尾：OW(12字节) + FL(8字节)
        let tail = &bytes[bytes.len() - 20..];
        assert_eq!(&tail[..6], &[0x69, 0x00, 0x10, 0x00, b'O', b'W']);
        assert_eq!(&tail[12..18], &[0x71, 0x00, 0x10, 0x00, b'F', b'L']);
    }
}
