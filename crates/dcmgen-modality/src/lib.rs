//! # DCMGen Modality
//!
//! 各成像模态的元数据生成器：扫描设备表、序列参数取值、像素配置
//! 和模态特有的DICOM元素。

pub mod clinical;
pub mod cr;
pub mod ct;
pub mod dx;
pub mod institutions;
pub mod mg;
pub mod mr;
pub mod names;
pub mod series_templates;
pub mod us;

use dicom::core::value::PrimitiveValue;
use dicom::object::InMemDicomObject;
use rand::rngs::StdRng;

use dcmgen_core::utils::{format_ds, format_is};
use dcmgen_core::{Modality, PixelConfig, Result, Scanner, SeriesParams, WindowPreset};

pub use series_templates::{default_series_count, series_templates_for, SeriesTemplate};

/// 模态元数据生成器接口
///
/// 每个模态实现一个生成器，负责该模态的SOP类、设备表、
/// 序列参数取值范围、像素配置与模态特有元素。
pub trait ModalityGenerator: Sync {
    /// 模态类型
    fn modality(&self) -> Modality;

    /// 该模态的SOP Class UID
    fn sop_class_uid(&self) -> &'static str;

    /// 可用的扫描设备配置
    fn scanners(&self) -> Vec<Scanner>;

    /// 为一个序列生成模态特有的采集参数
    fn generate_series_params(&self, scanner: &Scanner, rng: &mut StdRng) -> SeriesParams;

    /// 像素数据配置
    fn pixel_config(&self) -> PixelConfig;

    /// 向数据集追加模态特有的DICOM元素
    fn append_modality_elements(
        &self,
        obj: &mut InMemDicomObject,
        params: &SeriesParams,
    ) -> Result<()>;

    /// 窗宽窗位预设
    fn window_presets(&self) -> Vec<WindowPreset>;
}

static MR_GENERATOR: mr::MrGenerator = mr::MrGenerator;
static CT_GENERATOR: ct::CtGenerator = ct::CtGenerator;
static CR_GENERATOR: cr::CrGenerator = cr::CrGenerator;
static DX_GENERATOR: dx::DxGenerator = dx::DxGenerator;
static US_GENERATOR: us::UsGenerator = us::UsGenerator;
static MG_GENERATOR: mg::MgGenerator = mg::MgGenerator;

/// 按模态取得对应的生成器
pub fn get_generator(modality: Modality) -> &'static dyn ModalityGenerator {
    match modality {
        Modality::MR => &MR_GENERATOR,
        Modality::CT => &CT_GENERATOR,
        Modality::CR => &CR_GENERATOR,
        Modality::DX => &DX_GENERATOR,
        Modality::US => &US_GENERATOR,
        Modality::MG => &MG_GENERATOR,
    }
}

/// 单个DS值
pub fn ds_value(value: f64) -> PrimitiveValue {
    PrimitiveValue::from(format_ds(value))
}

/// 多值DS（如像素间距的行/列两个分量）
pub fn multi_ds(values: &[f64]) -> PrimitiveValue {
    let strings: Vec<String> = values.iter().map(|v| format_ds(*v)).collect();
    PrimitiveValue::Strs(strings.into())
}

/// 单个IS值
pub fn is_value(value: i64) -> PrimitiveValue {
    PrimitiveValue::from(format_is(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_get_generator_covers_all_modalities() {
        for modality in Modality::all() {
            let gen = get_generator(modality);
            assert_eq!(gen.modality(), modality);
            assert!(gen.sop_class_uid().starts_with("1.2.840.10008.5.1.4.1.1."));
        }
    }

    #[test]
    fn test_all_generators_have_scanners() {
        for modality in Modality::all() {
            let gen = get_generator(modality);
            let scanners = gen.scanners();
            assert!(!scanners.is_empty(), "{} 应至少有一个设备", modality);
            for (i, s) in scanners.iter().enumerate() {
                assert!(!s.manufacturer.is_empty(), "{} 设备 {} 缺少制造商", modality, i);
                assert!(!s.model.is_empty(), "{} 设备 {} 缺少型号", modality, i);
            }
        }
    }

    #[test]
    fn test_generated_params_carry_modality_and_window() {
        let mut rng = StdRng::seed_from_u64(42);
        for modality in Modality::all() {
            let gen = get_generator(modality);
            let scanner = &gen.scanners()[0];
            let params = gen.generate_series_params(scanner, &mut rng);

            assert_eq!(params.modality, modality);
            assert_eq!(&params.scanner, scanner);
            assert!(params.pixel_spacing > 0.0, "{} 像素间距无效", modality);
            assert!(params.window_width > 0.0, "{} 窗宽无效", modality);
        }
    }

    #[test]
    fn test_pixel_configs_are_consistent() {
        for modality in Modality::all() {
            let config = get_generator(modality).pixel_config();
            assert!(config.bits_stored <= config.bits_allocated);
            assert_eq!(config.high_bit, config.bits_stored - 1);
            assert!(config.min_value < config.max_value);
            assert!(config.base_value <= config.max_value);
            assert_eq!(config.max_value as u32, (1u32 << config.bits_stored) - 1);
        }
    }

    #[test]
    fn test_window_presets_non_empty() {
        for modality in Modality::all() {
            let presets = get_generator(modality).window_presets();
            assert!(!presets.is_empty());
            assert!(presets.iter().any(|p| p.name == "DEFAULT"));
        }
    }

    #[test]
    fn test_sop_class_uids() {
        assert_eq!(
            get_generator(Modality::MR).sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.4"
        );
        assert_eq!(
            get_generator(Modality::CT).sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.2"
        );
        assert_eq!(
            get_generator(Modality::CR).sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.1"
        );
        assert_eq!(
            get_generator(Modality::DX).sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.1.1"
        );
        assert_eq!(
            get_generator(Modality::US).sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.6.1"
        );
        assert_eq!(
            get_generator(Modality::MG).sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.1.2"
        );
    }

    #[test]
    fn test_append_modality_elements_succeeds() {
        let mut rng = StdRng::seed_from_u64(7);
        for modality in Modality::all() {
            let gen = get_generator(modality);
            let scanner = gen.scanners()[0].clone();
            let params = gen.generate_series_params(&scanner, &mut rng);

            let mut obj = InMemDicomObject::new_empty();
            gen.append_modality_elements(&mut obj, &params).unwrap();
        }
    }
}
