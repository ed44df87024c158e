//! DX（数字X线摄影）模态生成器

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dcmgen_core::{Modality, PixelConfig, Result, Scanner, SeriesParams, WindowPreset};

use crate::{ds_value, is_value, multi_ds, ModalityGenerator};

const VIEW_POSITIONS: [&str; 5] = ["AP", "PA", "LAT", "LL", "RL"];

pub struct DxGenerator;

impl ModalityGenerator for DxGenerator {
    fn modality(&self) -> Modality {
        Modality::DX
    }

    /// Digital X-Ray Image Storage - For Presentation
    fn sop_class_uid(&self) -> &'static str {
        "1.2.840.10008.5.1.4.1.1.1.1"
    }

    fn scanners(&self) -> Vec<Scanner> {
        vec![
            Scanner::new("SIEMENS", "Ysio Max"),
            Scanner::new("GE MEDICAL SYSTEMS", "Discovery XR656"),
            Scanner::new("PHILIPS", "DigitalDiagnost C90"),
            Scanner::new("CANON", "CXDI-710C Wireless"),
            Scanner::new("FUJIFILM", "FDR D-EVO II"),
        ]
    }

    fn generate_series_params(&self, scanner: &Scanner, rng: &mut StdRng) -> SeriesParams {
        // 平板探测器分辨率高于CR
        let detector_pixel_spacing = rng.gen_range(0.1..0.15);

        SeriesParams {
            modality: Modality::DX,
            scanner: scanner.clone(),
            pixel_spacing: detector_pixel_spacing,
            view_position: VIEW_POSITIONS.choose(rng).copied().unwrap_or("PA").to_string(),
            imager_pixel_spacing: detector_pixel_spacing,
            distance_source_to_detector: rng.gen_range(1000.0..1800.0),
            distance_source_to_patient: rng.gen_range(800.0..1500.0),
            exposure: rng.gen_range(1..50),
            kvp: rng.gen_range(60.0..140.0),
            exposure_time: rng.gen_range(10..100),
            window_center: rng.gen_range(2048.0..3048.0),
            window_width: rng.gen_range(4096.0..6096.0),
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
        obj.put(DataElement::new(tags::KVP, VR::DS, ds_value(params.kvp)));
        obj.put(DataElement::new(
            tags::EXPOSURE_TIME,
            VR::IS,
            is_value(params.exposure_time as i64),
        ));
        Ok(())
    }

    fn window_presets(&self) -> Vec<WindowPreset> {
        vec![
            WindowPreset {
                name: "DEFAULT",
                center: 8192.0,
                width: 16384.0,
            },
            WindowPreset {
                name: "SOFT_TISSUE",
                center: 6000.0,
                width: 12000.0,
            },
            WindowPreset {
                name: "BONE",
                center: 12000.0,
                width: 8000.0,
            },
        ]
    }
}
