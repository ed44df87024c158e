//! DICOM数据集元数据生成
//!
//! 按患者/检查/序列/实例/图像像素各信息模块装配数据集，
//! 模态特有元素由对应的模态生成器追加。

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;

use dcmgen_core::{Result, SeriesParams};
use dcmgen_modality::{ds_value, get_generator, is_value, multi_ds};

/// 生成一份数据集所需的全部参数
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    pub width: usize,
    pub height: usize,
    pub instance_number: i32,

    // === 检查内共享 ===
    pub study_uid: String,
    pub series_uid: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_birth_date: String,
    pub patient_sex: String,
    pub study_date: String,
    pub study_time: String,
    pub study_id: String,
    pub study_description: String,
    pub accession_number: String,
    pub series_number: i32,
    pub series_description: String,

    // === 临床上下文 ===
    pub body_part: String,
    pub protocol_name: String,
    pub institution_name: String,
    pub institution_address: String,
    pub institution_department: String,
    pub contrast_agent: String,

    // === 序列采集参数（模态特有部分由生成器处理）===
    pub params: SeriesParams,
}

/// 生成带真实感元数据的DICOM数据集
///
/// SOP Instance UID与位置信息由调用方在生成后追加。
pub fn generate_metadata(opts: &MetadataOptions) -> Result<InMemDicomObject> {
    let mut obj = InMemDicomObject::new_empty();
    let generator = get_generator(opts.params.modality);
    let pixel_config = generator.pixel_config();

    // 患者信息模块
    obj.put(DataElement::new(
        tags::PATIENT_NAME,
        VR::PN,
        PrimitiveValue::from(opts.patient_name.as_str()),
    ));
    obj.put(DataElement::new(
        tags::PATIENT_ID,
        VR::LO,
        PrimitiveValue::from(opts.patient_id.as_str()),
    ));
    obj.put(DataElement::new(
        tags::PATIENT_BIRTH_DATE,
        VR::DA,
        PrimitiveValue::from(opts.patient_birth_date.as_str()),
    ));
    obj.put(DataElement::new(
        tags::PATIENT_SEX,
        VR::CS,
        PrimitiveValue::from(opts.patient_sex.as_str()),
    ));

    // 检查信息模块
    obj.put(DataElement::new(
        tags::STUDY_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(opts.study_uid.as_str()),
    ));
    obj.put(DataElement::new(
        tags::STUDY_DATE,
        VR::DA,
        PrimitiveValue::from(opts.study_date.as_str()),
    ));
    obj.put(DataElement::new(
        tags::STUDY_TIME,
        VR::TM,
        PrimitiveValue::from(opts.study_time.as_str()),
    ));
    obj.put(DataElement::new(
        tags::STUDY_ID,
        VR::SH,
        PrimitiveValue::from(opts.study_id.as_str()),
    ));
    obj.put(DataElement::new(
        tags::STUDY_DESCRIPTION,
        VR::LO,
        PrimitiveValue::from(opts.study_description.as_str()),
    ));
    obj.put(DataElement::new(
        tags::ACCESSION_NUMBER,
        VR::SH,
        PrimitiveValue::from(opts.accession_number.as_str()),
    ));

    // 序列信息模块
    obj.put(DataElement::new(
        tags::SERIES_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(opts.series_uid.as_str()),
    ));
    obj.put(DataElement::new(
        tags::SERIES_NUMBER,
        VR::IS,
        is_value(opts.series_number as i64),
    ));
    obj.put(DataElement::new(
        tags::SERIES_DESCRIPTION,
        VR::LO,
        PrimitiveValue::from(opts.series_description.as_str()),
    ));
    obj.put(DataElement::new(
        tags::MODALITY,
        VR::CS,
        PrimitiveValue::from(opts.params.modality.as_str()),
    ));

    // 实例信息模块
    obj.put(DataElement::new(
        tags::INSTANCE_NUMBER,
        VR::IS,
        is_value(opts.instance_number as i64),
    ));
    obj.put(DataElement::new(
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(generator.sop_class_uid()),
    ));

    // 图像像素模块
    obj.put(DataElement::new(
        tags::ROWS,
        VR::US,
        PrimitiveValue::from(opts.height as u16),
    ));
    obj.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(opts.width as u16),
    ));
    obj.put(DataElement::new(
        tags::BITS_ALLOCATED,
        VR::US,
        PrimitiveValue::from(pixel_config.bits_allocated),
    ));
    obj.put(DataElement::new(
        tags::BITS_STORED,
        VR::US,
        PrimitiveValue::from(pixel_config.bits_stored),
    ));
    obj.put(DataElement::new(
        tags::HIGH_BIT,
        VR::US,
        PrimitiveValue::from(pixel_config.high_bit),
    ));
    obj.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(pixel_config.pixel_representation),
    ));
    obj.put(DataElement::new(
        tags::SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(1_u16),
    ));
    obj.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));

    // 临床上下文
    if !opts.body_part.is_empty() {
        obj.put(DataElement::new(
            tags::BODY_PART_EXAMINED,
            VR::CS,
            PrimitiveValue::from(opts.body_part.as_str()),
        ));
    }
    if !opts.protocol_name.is_empty() {
        obj.put(DataElement::new(
            tags::PROTOCOL_NAME,
            VR::LO,
            PrimitiveValue::from(opts.protocol_name.as_str()),
        ));
    }
    if !opts.contrast_agent.is_empty() {
        obj.put(DataElement::new(
            tags::CONTRAST_BOLUS_AGENT,
            VR::LO,
            PrimitiveValue::from(opts.contrast_agent.as_str()),
        ));
    }

    // 机构信息
    if !opts.institution_name.is_empty() {
        obj.put(DataElement::new(
            tags::INSTITUTION_NAME,
            VR::LO,
            PrimitiveValue::from(opts.institution_name.as_str()),
        ));
    }
    if !opts.institution_address.is_empty() {
        obj.put(DataElement::new(
            tags::INSTITUTION_ADDRESS,
            VR::ST,
            PrimitiveValue::from(opts.institution_address.as_str()),
        ));
    }
    if !opts.institution_department.is_empty() {
        obj.put(DataElement::new(
            tags::INSTITUTIONAL_DEPARTMENT_NAME,
            VR::LO,
            PrimitiveValue::from(opts.institution_department.as_str()),
        ));
    }

    // 设备信息
    let scanner = &opts.params.scanner;
    if !scanner.manufacturer.is_empty() {
        obj.put(DataElement::new(
            tags::MANUFACTURER,
            VR::LO,
            PrimitiveValue::from(scanner.manufacturer.as_str()),
        ));
    }
    if !scanner.model.is_empty() {
        obj.put(DataElement::new(
            tags::MANUFACTURER_MODEL_NAME,
            VR::LO,
            PrimitiveValue::from(scanner.model.as_str()),
        ));
    }

    // 几何参数（临床意义显著）
    if opts.params.pixel_spacing != 0.0 {
        // PixelSpacing存储为[行间距, 列间距]
        obj.put(DataElement::new(
            tags::PIXEL_SPACING,
            VR::DS,
            multi_ds(&[opts.params.pixel_spacing, opts.params.pixel_spacing]),
        ));
    }
    if opts.params.slice_thickness != 0.0 {
        obj.put(DataElement::new(
            tags::SLICE_THICKNESS,
            VR::DS,
            ds_value(opts.params.slice_thickness),
        ));
    }
    if opts.params.spacing_between_slices != 0.0 {
        obj.put(DataElement::new(
            tags::SPACING_BETWEEN_SLICES,
            VR::DS,
            ds_value(opts.params.spacing_between_slices),
        ));
    }

    // 窗宽窗位
    if opts.params.window_width != 0.0 {
        obj.put(DataElement::new(
            tags::WINDOW_CENTER,
            VR::DS,
            ds_value(opts.params.window_center),
        ));
        obj.put(DataElement::new(
            tags::WINDOW_WIDTH,
            VR::DS,
            ds_value(opts.params.window_width),
        ));
    }

    // 模态特有元素
    generator.append_modality_elements(&mut obj, &opts.params)?;

    Ok(obj)
}

/// 追加SOP Instance UID
pub fn append_sop_instance_uid(obj: &mut InMemDicomObject, sop_instance_uid: &str) {
    obj.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(sop_instance_uid),
    ));
}

/// 追加层面位置信息（位置、方向余弦与层面定位）
pub fn append_position_info(
    obj: &mut InMemDicomObject,
    orientation: &[f64; 6],
    slice_position: f64,
) {
    obj.put(DataElement::new(
        tags::IMAGE_POSITION_PATIENT,
        VR::DS,
        multi_ds(&[0.0, 0.0, slice_position]),
    ));
    obj.put(DataElement::new(
        tags::IMAGE_ORIENTATION_PATIENT,
        VR::DS,
        multi_ds(orientation),
    ));
    obj.put(DataElement::new(
        tags::SLICE_LOCATION,
        VR::DS,
        ds_value(slice_position),
    ));
}

/// 追加像素数据元素
///
/// 8位模态以OB写入字节数据，其余模态以OW写入16位字数据。
pub fn append_pixel_data(obj: &mut InMemDicomObject, pixels: Vec<u16>, bits_allocated: u16) {
    use dicom::core::value::C;

    if bits_allocated <= 8 {
        let bytes: Vec<u8> = pixels.into_iter().map(|p| p as u8).collect();
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OB,
            PrimitiveValue::U8(C::from_vec(bytes)),
        ));
    } else {
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(C::from_vec(pixels)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmgen_core::{Modality, Scanner};
    use dcmgen_modality::get_generator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_options(modality: Modality) -> MetadataOptions {
        let generator = get_generator(modality);
        let scanner = generator.scanners()[0].clone();
        let mut rng = StdRng::seed_from_u64(42);
        let params = generator.generate_series_params(&scanner, &mut rng);

        MetadataOptions {
            width: 256,
            height: 256,
            instance_number: 3,
            study_uid: "1.2.826.0.1.3680043.8.498.1.2.3".to_string(),
            series_uid: "1.2.826.0.1.3680043.8.498.4.5.6".to_string(),
            patient_id: "PID123456".to_string(),
            patient_name: "MARTIN^JEAN".to_string(),
            patient_birth_date: "19700101".to_string(),
            patient_sex: "M".to_string(),
            study_date: "20260115".to_string(),
            study_time: "093000".to_string(),
            study_id: "STD1234".to_string(),
            study_description: "MR HEAD".to_string(),
            accession_number: "ACC123456".to_string(),
            series_number: 1,
            series_description: "T1 SAG".to_string(),
            body_part: "HEAD".to_string(),
            protocol_name: "BRAIN_ROUTINE".to_string(),
            institution_name: "CHU Bordeaux".to_string(),
            institution_address: "Place Amelie Raba-Leon, 33000 Bordeaux".to_string(),
            institution_department: "Radiologie".to_string(),
            contrast_agent: String::new(),
            params,
        }
    }

    #[test]
    fn test_required_modules_present() {
        let obj = generate_metadata(&sample_options(Modality::MR)).unwrap();

        for tag in [
            tags::PATIENT_NAME,
            tags::PATIENT_ID,
            tags::PATIENT_BIRTH_DATE,
            tags::PATIENT_SEX,
            tags::STUDY_INSTANCE_UID,
            tags::STUDY_DATE,
            tags::STUDY_ID,
            tags::ACCESSION_NUMBER,
            tags::SERIES_INSTANCE_UID,
            tags::SERIES_NUMBER,
            tags::MODALITY,
            tags::INSTANCE_NUMBER,
            tags::SOP_CLASS_UID,
            tags::ROWS,
            tags::COLUMNS,
            tags::BITS_ALLOCATED,
            tags::PHOTOMETRIC_INTERPRETATION,
            tags::PIXEL_SPACING,
        ] {
            assert!(obj.element(tag).is_ok(), "缺少标签 {:?}", tag);
        }
    }

    #[test]
    fn test_values_match_options() {
        let opts = sample_options(Modality::MR);
        let obj = generate_metadata(&opts).unwrap();

        assert_eq!(
            obj.element(tags::PATIENT_NAME).unwrap().to_str().unwrap(),
            "MARTIN^JEAN"
        );
        assert_eq!(
            obj.element(tags::STUDY_INSTANCE_UID)
                .unwrap()
                .to_str()
                .unwrap(),
            opts.study_uid.as_str()
        );
        assert_eq!(
            obj.element(tags::MODALITY).unwrap().to_str().unwrap(),
            "MR"
        );
        assert_eq!(
            obj.element(tags::SOP_CLASS_UID).unwrap().to_str().unwrap(),
            "1.2.840.10008.5.1.4.1.1.4"
        );
        assert_eq!(
            obj.element(tags::INSTANCE_NUMBER).unwrap().to_str().unwrap(),
            "3"
        );
    }

    #[test]
    fn test_us_dataset_is_8_bit() {
        let obj = generate_metadata(&sample_options(Modality::US)).unwrap();

        let bits: u16 = obj
            .element(tags::BITS_ALLOCATED)
            .unwrap()
            .to_int()
            .unwrap();
        assert_eq!(bits, 8);
        // US应带有探头信息
        assert!(obj.element(tags::TRANSDUCER_TYPE).is_ok());
    }

    #[test]
    fn test_position_info_appended() {
        let mut obj = generate_metadata(&sample_options(Modality::MR)).unwrap();
        append_position_info(&mut obj, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 12.5);

        assert!(obj.element(tags::IMAGE_POSITION_PATIENT).is_ok());
        assert!(obj.element(tags::IMAGE_ORIENTATION_PATIENT).is_ok());
        assert_eq!(
            obj.element(tags::SLICE_LOCATION).unwrap().to_str().unwrap(),
            "12.500000"
        );
    }

    #[test]
    fn test_pixel_data_vr_follows_bit_depth() {
        use dicom::core::header::Header;

        let mut obj16 = generate_metadata(&sample_options(Modality::MR)).unwrap();
        append_pixel_data(&mut obj16, vec![0, 1, 2, 3], 16);
        assert_eq!(obj16.element(tags::PIXEL_DATA).unwrap().vr(), VR::OW);

        let mut obj8 = generate_metadata(&sample_options(Modality::US)).unwrap();
        append_pixel_data(&mut obj8, vec![0, 1, 2, 3], 8);
        assert_eq!(obj8.element(tags::PIXEL_DATA).unwrap().vr(), VR::OB);
    }

    #[test]
    fn test_contrast_agent_only_when_set() {
        let mut opts = sample_options(Modality::CT);
        let without = generate_metadata(&opts).unwrap();
        assert!(without.element(tags::CONTRAST_BOLUS_AGENT).is_err());

        opts.contrast_agent = "IOMERON 400".to_string();
        let with = generate_metadata(&opts).unwrap();
        assert_eq!(
            with.element(tags::CONTRAST_BOLUS_AGENT)
                .unwrap()
                .to_str()
                .unwrap(),
            "IOMERON 400"
        );
    }
}
