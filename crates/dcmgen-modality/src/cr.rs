//! CR（计算机X线摄影）模态生成器

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dcmgen_core::{Modality, PixelConfig, Result, Scanner, SeriesParams, WindowPreset};

use crate::{ds_value, is_value, multi_ds, ModalityGenerator};

/// X线摄影投照体位
const VIEW_POSITIONS: [&str; 5] = ["AP", "PA", "LAT", "LL", "RL"];

pub struct CrGenerator;

impl ModalityGenerator for CrGenerator {
    fn modality(&self) -> Modality {
        Modality::CR
    }

    /// Computed Radiography Image Storage
    fn sop_class_uid(&self) -> &'static str {
        "1.2.840.10008.5.1.4.1.1.1"
    }

    fn scanners(&self) -> Vec<Scanner> {
        vec![
            Scanner::new("FUJIFILM", "FCR Profect CS"),
            Scanner::new("CARESTREAM", "DRX-Revolution"),
            Scanner::new("AGFA", "CR 30-X"),
            Scanner::new("KONICA MINOLTA", "Regius Model 110"),
            Scanner::new("PHILIPS", "PCR Eleva S"),
        ]
    }

    fn generate_series_params(&self, scanner: &Scanner, rng: &mut StdRng) -> SeriesParams {
        // 探测板分辨率
        let imager_pixel_spacing = rng.gen_range(0.1..0.2);

        SeriesParams {
            modality: Modality::CR,
            scanner: scanner.clone(),
            pixel_spacing: imager_pixel_spacing,
            view_position: VIEW_POSITIONS.choose(rng).copied().unwrap_or("AP").to_string(),
            imager_pixel_spacing,
            distance_source_to_detector: rng.gen_range(1000.0..1800.0),
            distance_source_to_patient: rng.gen_range(800.0..1500.0),
            exposure: rng.gen_range(1..50),
            window_center: rng.gen_range(2048.0..3048.0),
            window_width: rng.gen_range(4096.0..6096.0),
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
            base_value: 2048,
        }
    }

    fn append_modality_elements(
        &self,
        obj: &mut InMemDicomObject,
        params: &SeriesParams,
    ) -> Result<()> {
        obj.put(DataElement::new(
            tags::VIEW_POSITION,
            VR::CS,
            PrimitiveValue::from(params.view_position.as_str()),
        ));
        obj.put(DataElement::new(
            tags::IMAGER_PIXEL_SPACING,
            VR::DS,
            multi_ds(&[params.imager_pixel_spacing, params.imager_pixel_spacing]),
        ));
        obj.put(DataElement::new(
            tags::DISTANCE_SOURCE_TO_DETECTOR,
            VR::DS,
            ds_value(params.distance_source_to_detector),
        ));
        obj.put(DataElement::new(
            tags::DISTANCE_SOURCE_TO_PATIENT,
            VR::DS,
            ds_value(params.distance_source_to_patient),
        ));
        obj.put(DataElement::new(
            tags::EXPOSURE,
            VR::IS,
            is_value(params.exposure as i64),
        ));
        // CR成像板标识
        obj.put(DataElement::new(
            tags::PLATE_ID,
            VR::SH,
            PrimitiveValue::from("PLATE001"),
        ));
        Ok(())
    }

    fn window_presets(&self) -> Vec<WindowPreset> {
        vec![
            WindowPreset {
                name: "DEFAULT",
                center: 2048.0,
                width: 4096.0,
            },
            WindowPreset {
                name: "SOFT_TISSUE",
                center: 1500.0,
                width: 3000.0,
            },
            WindowPreset {
                name: "BONE",
                center: 3000.0,
                width: 2000.0,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_cr_params_in_clinical_ranges() {
        let gen = CrGenerator;
        let scanner = Scanner::new("FUJIFILM", "Test");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let p = gen.generate_series_params(&scanner, &mut rng);
            assert!(VIEW_POSITIONS.contains(&p.view_position.as_str()));
            assert!((0.1..0.2).contains(&p.imager_pixel_spacing));
            assert!((1000.0..1800.0).contains(&p.distance_source_to_detector));
            assert!((800.0..1500.0).contains(&p.distance_source_to_patient));
            assert!((1..50).contains(&p.exposure));
        }
    }
}
