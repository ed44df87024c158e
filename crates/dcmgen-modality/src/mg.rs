//! MG（乳腺X线摄影）模态生成器

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dcmgen_core::{Modality, PixelConfig, Result, Scanner, SeriesParams, WindowPreset};

use crate::{ds_value, is_value, ModalityGenerator};

/// 乳腺摄影标准投照体位
const VIEW_POSITIONS: [&str; 4] = ["CC", "MLO", "ML", "LM"];

/// 阳极靶材料
const ANODE_MATERIALS: [&str; 3] = ["MOLYBDENUM", "RHODIUM", "TUNGSTEN"];

/// 滤过材料
const FILTER_MATERIALS: [&str; 4] = ["MOLYBDENUM", "RHODIUM", "SILVER", "ALUMINUM"];

pub struct MgGenerator;

impl ModalityGenerator for MgGenerator {
    fn modality(&self) -> Modality {
        Modality::MG
    }

    /// Digital Mammography X-Ray Image Storage - For Presentation
    fn sop_class_uid(&self) -> &'static str {
        "1.2.840.10008.5.1.4.1.1.1.2"
    }

    fn scanners(&self) -> Vec<Scanner> {
        vec![
            Scanner::new("HOLOGIC", "Selenia Dimensions"),
            Scanner::new("GE MEDICAL SYSTEMS", "Senographe Pristina"),
            Scanner::new("SIEMENS", "MAMMOMAT Revelation"),
            Scanner::new("FUJIFILM", "AMULET Innovality"),
            Scanner::new("PHILIPS", "MicroDose SI"),
            Scanner::new("IMS GIOTTO", "Class"),
        ]
    }

    fn generate_series_params(&self, scanner: &Scanner, rng: &mut StdRng) -> SeriesParams {
        SeriesParams {
            modality: Modality::MG,
            scanner: scanner.clone(),
            // 极高分辨率
            pixel_spacing: rng.gen_range(0.05..0.1),
            image_laterality: ["L", "R"].choose(rng).copied().unwrap_or("L").to_string(),
            view_position: VIEW_POSITIONS.choose(rng).copied().unwrap_or("CC").to_string(),
            anode_target_material: ANODE_MATERIALS
                .choose(rng)
                .copied()
                .unwrap_or("MOLYBDENUM")
                .to_string(),
            filter_material: FILTER_MATERIALS
                .choose(rng)
                .copied()
                .unwrap_or("RHODIUM")
                .to_string(),
            // 压迫力通常80-200牛
            compression_force: rng.gen_range(80.0..200.0),
            // 器官剂量通常1-3 mGy
            organ_dose: rng.gen_range(1.0..3.0),
            // 乳腺摄影管电压低于普通X线
            kvp: rng.gen_range(25.0..34.0),
            exposure: rng.gen_range(50..200),
            window_center: rng.gen_range(3000.0..4000.0),
            window_width: rng.gen_range(6000.0..8000.0),
            ..Default::default()
        }
    }

    fn pixel_config(&self) -> PixelConfig {
        PixelConfig {
            bits_allocated: 16,
            bits_stored: 14,
            high_bit: 13,
            pixel_representation: 0,
            min_value: 0,
            max_value: 16383,
            base_value: 8192,
        }
    }

    fn append_modality_elements(
        &self,
        obj: &mut InMemDicomObject,
        params: &SeriesParams,
    ) -> Result<()> {
        obj.put(DataElement::new(
            tags::IMAGE_LATERALITY,
            VR::CS,
            PrimitiveValue::from(params.image_laterality.as_str()),
        ));
        obj.put(DataElement::new(
            tags::VIEW_POSITION,
            VR::CS,
            PrimitiveValue::from(params.view_position.as_str()),
        ));
        obj.put(DataElement::new(
            tags::ANODE_TARGET_MATERIAL,
            VR::CS,
            PrimitiveValue::from(params.anode_target_material.as_str()),
        ));
        obj.put(DataElement::new(
            tags::FILTER_MATERIAL,
            VR::CS,
            PrimitiveValue::from(params.filter_material.as_str()),
        ));
        obj.put(DataElement::new(
            tags::COMPRESSION_FORCE,
            VR::DS,
            ds_value(params.compression_force),
        ));
        obj.put(DataElement::new(
            tags::ORGAN_DOSE,
            VR::DS,
            ds_value(params.organ_dose),
        ));
        obj.put(DataElement::new(tags::KVP, VR::DS, ds_value(params.kvp)));
        obj.put(DataElement::new(
            tags::EXPOSURE,
            VR::IS,
            is_value(params.exposure as i64),
        ));
        Ok(())
    }

    fn window_presets(&self) -> Vec<WindowPreset> {
        vec![
            WindowPreset {
                name: "DEFAULT",
                center: 3500.0,
                width: 7000.0,
            },
            WindowPreset {
                name: "DENSE",
                center: 4500.0,
                width: 5000.0,
            },
            WindowPreset {
                name: "SKIN_LINE",
                center: 2000.0,
                width: 9000.0,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_mg_params_in_clinical_ranges() {
        let gen = MgGenerator;
        let scanner = Scanner::new("HOLOGIC", "Test");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let p = gen.generate_series_params(&scanner, &mut rng);
            assert!(["L", "R"].contains(&p.image_laterality.as_str()));
            assert!(VIEW_POSITIONS.contains(&p.view_position.as_str()));
            assert!(ANODE_MATERIALS.contains(&p.anode_target_material.as_str()));
            assert!(FILTER_MATERIALS.contains(&p.filter_material.as_str()));
            assert!((80.0..200.0).contains(&p.compression_force));
            assert!((1.0..3.0).contains(&p.organ_dose));
            assert!((25.0..34.0).contains(&p.kvp));
            assert!((0.05..0.1).contains(&p.pixel_spacing));
        }
    }
}
