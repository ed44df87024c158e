//! CT（计算机断层扫描）模态生成器

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dcmgen_core::{Modality, PixelConfig, Result, Scanner, SeriesParams, WindowPreset};

use crate::{ds_value, is_value, ModalityGenerator};

/// 常见管电压档位（kVp）
const KVP_STEPS: [f64; 4] = [80.0, 100.0, 120.0, 140.0];

/// 重建卷积核
const CONVOLUTION_KERNELS: [&str; 6] = ["B30f", "B50f", "B70f", "STANDARD", "BONE", "LUNG"];

pub struct CtGenerator;

impl ModalityGenerator for CtGenerator {
    fn modality(&self) -> Modality {
        Modality::CT
    }

    /// CT Image Storage
    fn sop_class_uid(&self) -> &'static str {
        "1.2.840.10008.5.1.4.1.1.2"
    }

    fn scanners(&self) -> Vec<Scanner> {
        vec![
            Scanner::new("SIEMENS", "SOMATOM Definition AS"),
            Scanner::new("SIEMENS", "SOMATOM Force"),
            Scanner::new("GE MEDICAL SYSTEMS", "Revolution CT"),
            Scanner::new("GE MEDICAL SYSTEMS", "Optima CT660"),
            Scanner::new("PHILIPS", "Brilliance 64"),
            Scanner::new("CANON", "Aquilion ONE"),
        ]
    }

    fn generate_series_params(&self, scanner: &Scanner, rng: &mut StdRng) -> SeriesParams {
        let slice_thickness = rng.gen_range(0.5..5.0);

        SeriesParams {
            modality: Modality::CT,
            scanner: scanner.clone(),
            pixel_spacing: rng.gen_range(0.3..1.0),
            slice_thickness,
            spacing_between_slices: slice_thickness,
            kvp: *KVP_STEPS.choose(rng).unwrap_or(&120.0),
            exposure: rng.gen_range(100..400),
            tube_current: rng.gen_range(200..500),
            convolution_kernel: CONVOLUTION_KERNELS
                .choose(rng)
                .copied()
                .unwrap_or("STANDARD")
                .to_string(),
            window_center: 40.0,
            window_width: 400.0,
            ..Default::default()
        }
    }

    fn pixel_config(&self) -> PixelConfig {
        PixelConfig {
            bits_allocated: 16,
            bits_stored: 12,
            high_bit: 11,
            pixel_representation: 0,
            min_value: 0,
            max_value: 4095,
            base_value: 1024,
        }
    }

    fn append_modality_elements(
        &self,
        obj: &mut InMemDicomObject,
        params: &SeriesParams,
    ) -> Result<()> {
        obj.put(DataElement::new(tags::KVP, VR::DS, ds_value(params.kvp)));
        obj.put(DataElement::new(
            tags::EXPOSURE,
            VR::IS,
            is_value(params.exposure as i64),
        ));
        obj.put(DataElement::new(
            tags::X_RAY_TUBE_CURRENT,
            VR::IS,
            is_value(params.tube_current as i64),
        ));
        obj.put(DataElement::new(
            tags::CONVOLUTION_KERNEL,
            VR::SH,
            PrimitiveValue::from(params.convolution_kernel.as_str()),
        ));
        Ok(())
    }

    fn window_presets(&self) -> Vec<WindowPreset> {
        vec![
            WindowPreset {
                name: "DEFAULT",
                center: 40.0,
                width: 400.0,
            },
            WindowPreset {
                name: "BONE",
                center: 400.0,
                width: 2000.0,
            },
            WindowPreset {
                name: "LUNG",
                center: -600.0,
                width: 1500.0,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_ct_params_in_clinical_ranges() {
        let gen = CtGenerator;
        let scanner = Scanner::new("SIEMENS", "Test");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let p = gen.generate_series_params(&scanner, &mut rng);
            assert!(KVP_STEPS.contains(&p.kvp));
            assert!((100..400).contains(&p.exposure));
            assert!((200..500).contains(&p.tube_current));
            assert!(CONVOLUTION_KERNELS.contains(&p.convolution_kernel.as_str()));
            assert!((0.5..5.0).contains(&p.slice_thickness));
        }
    }
}
