//! US（超声成像）模态生成器

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dcmgen_core::{Modality, PixelConfig, Result, Scanner, SeriesParams, WindowPreset};

use crate::ModalityGenerator;

/// 探头类型
const TRANSDUCER_TYPES: [&str; 3] = ["LINEAR", "CONVEX", "PHASED"];

pub struct UsGenerator;

impl ModalityGenerator for UsGenerator {
    fn modality(&self) -> Modality {
        Modality::US
    }

    /// Ultrasound Image Storage
    fn sop_class_uid(&self) -> &'static str {
        "1.2.840.10008.5.1.4.1.1.6.1"
    }

    fn scanners(&self) -> Vec<Scanner> {
        vec![
            Scanner::new("GE MEDICAL SYSTEMS", "LOGIQ E10"),
            Scanner::new("PHILIPS", "EPIQ Elite"),
            Scanner::new("SIEMENS", "ACUSON Sequoia"),
            Scanner::new("CANON", "Aplio i800"),
            Scanner::new("SAMSUNG", "RS85 Prestige"),
            Scanner::new("HITACHI", "ARIETTA 850"),
        ]
    }

    fn generate_series_params(&self, scanner: &Scanner, rng: &mut StdRng) -> SeriesParams {
        let transducer_type = *TRANSDUCER_TYPES.choose(rng).unwrap_or(&"LINEAR");

        // 探头频率取决于探头类型
        let transducer_frequency = match transducer_type {
            // 浅表
            "LINEAR" => rng.gen_range(7.0..15.0),
            // 腹部
            "CONVEX" => rng.gen_range(2.0..6.0),
            // 心脏
            _ => rng.gen_range(2.0..5.0),
        };

        SeriesParams {
            modality: Modality::US,
            scanner: scanner.clone(),
            // 随深度与频率变化
            pixel_spacing: rng.gen_range(0.2..0.5),
            transducer_type: transducer_type.to_string(),
            transducer_frequency,
            window_center: 128.0,
            window_width: 256.0,
            ..Default::default()
        }
    }

    fn pixel_config(&self) -> PixelConfig {
        PixelConfig {
            bits_allocated: 8,
            bits_stored: 8,
            high_bit: 7,
            pixel_representation: 0,
            min_value: 0,
            max_value: 255,
            base_value: 128,
        }
    }

    fn append_modality_elements(
        &self,
        obj: &mut InMemDicomObject,
        params: &SeriesParams,
    ) -> Result<()> {
        obj.put(DataElement::new(
            tags::TRANSDUCER_TYPE,
            VR::CS,
            PrimitiveValue::from(params.transducer_type.as_str()),
        ));
        // 探头频率以整数Hz存储
        let frequency_hz = (params.transducer_frequency * 1_000_000.0) as u32;
        obj.put(DataElement::new(
            tags::TRANSDUCER_FREQUENCY,
            VR::UL,
            PrimitiveValue::from(frequency_hz),
        ));
        // 单帧图像
        obj.put(DataElement::new(
            tags::NUMBER_OF_FRAMES,
            VR::IS,
            PrimitiveValue::from("1"),
        ));
        Ok(())
    }

    fn window_presets(&self) -> Vec<WindowPreset> {
        vec![
            WindowPreset {
                name: "DEFAULT",
                center: 128.0,
                width: 256.0,
            },
            WindowPreset {
                name: "BRIGHT",
                center: 100.0,
                width: 200.0,
            },
            WindowPreset {
                name: "CONTRAST",
                center: 150.0,
                width: 300.0,
            },
        ]
    }
}
