//! 序列模板
//!
//! 按模态和检查部位定义一项检查内各序列的构成（序列名、描述、
//! 方位、对比剂与窗位覆盖）。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dcmgen_core::Modality;

/// 方位常量
pub const ORIENTATION_AXIAL: &str = "AX";
pub const ORIENTATION_SAGITTAL: &str = "SAG";
pub const ORIENTATION_CORONAL: &str = "COR";

/// 检查内单个序列的模板
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTemplate {
    /// MR序列名（如 "T1_SE"、"T2_FSE"），其它模态为空
    pub sequence_name: &'static str,
    /// 序列描述
    pub series_description: &'static str,
    /// 方位：SAG、AX、COR
    pub orientation: &'static str,
    /// 是否使用对比剂
    pub has_contrast: bool,
    /// 对比剂名称
    pub contrast_agent: &'static str,
    /// 序列级窗位覆盖（0表示使用模态默认）
    pub window_center: f64,
    /// 序列级窗宽覆盖（0表示使用模态默认）
    pub window_width: f64,
}

impl SeriesTemplate {
    const fn plain(sequence_name: &'static str, description: &'static str, orientation: &'static str) -> Self {
        Self {
            sequence_name,
            series_description: description,
            orientation,
            has_contrast: false,
            contrast_agent: "",
            window_center: 0.0,
            window_width: 0.0,
        }
    }

    const fn with_contrast(
        sequence_name: &'static str,
        description: &'static str,
        orientation: &'static str,
        agent: &'static str,
    ) -> Self {
        Self {
            sequence_name,
            series_description: description,
            orientation,
            has_contrast: true,
            contrast_agent: agent,
            window_center: 0.0,
            window_width: 0.0,
        }
    }

    const fn with_window(
        description: &'static str,
        orientation: &'static str,
        center: f64,
        width: f64,
    ) -> Self {
        Self {
            sequence_name: "",
            series_description: description,
            orientation,
            has_contrast: false,
            contrast_agent: "",
            window_center: center,
            window_width: width,
        }
    }

    /// DICOM ImageOrientationPatient方向余弦
    /// 格式：行方向余弦在前，列方向余弦在后
    pub fn image_orientation_patient(&self) -> [f64; 6] {
        match self.orientation {
            ORIENTATION_AXIAL => [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            ORIENTATION_SAGITTAL => [0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
            ORIENTATION_CORONAL => [1.0, 0.0, 0.0, 0.0, 0.0, -1.0],
            // 默认取轴位
            _ => [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }
}

/// MR颅脑序列模板
const MR_BRAIN_TEMPLATES: [SeriesTemplate; 6] = [
    SeriesTemplate::plain("T1_SE", "T1 SAG", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("T2_FSE", "T2 AX", ORIENTATION_AXIAL),
    SeriesTemplate::plain("T2_FLAIR", "FLAIR AX", ORIENTATION_AXIAL),
    SeriesTemplate::with_contrast("T1_MPRAGE", "T1 SAG +C", ORIENTATION_SAGITTAL, "GADOVIST"),
    SeriesTemplate::plain("DWI", "DWI AX", ORIENTATION_AXIAL),
    SeriesTemplate::plain("T2_STAR", "T2* GRE", ORIENTATION_AXIAL),
];

/// MR膝关节（及其它关节）序列模板
const MR_KNEE_TEMPLATES: [SeriesTemplate; 5] = [
    SeriesTemplate::plain("T1_SE", "T1 SAG", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("T2_FSE", "T2 SAG FAT-SAT", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("PD_FSE", "PD COR", ORIENTATION_CORONAL),
    SeriesTemplate::plain("T2_FSE", "T2 AX", ORIENTATION_AXIAL),
    SeriesTemplate::plain("T1_SE", "T1 COR", ORIENTATION_CORONAL),
];

/// MR脊柱序列模板
const MR_SPINE_TEMPLATES: [SeriesTemplate; 4] = [
    SeriesTemplate::plain("T1_SE", "T1 SAG", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("T2_FSE", "T2 SAG", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("STIR", "STIR SAG", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("T2_FSE", "T2 AX", ORIENTATION_AXIAL),
];

/// MR腹部序列模板
const MR_ABDOMEN_TEMPLATES: [SeriesTemplate; 5] = [
    SeriesTemplate::plain("T2_SSFSE", "T2 COR SSFSE", ORIENTATION_CORONAL),
    SeriesTemplate::plain("T2_FSE", "T2 AX FAT-SAT", ORIENTATION_AXIAL),
    SeriesTemplate::plain("T1_VIBE", "T1 AX PRE", ORIENTATION_AXIAL),
    SeriesTemplate::with_contrast("T1_VIBE", "T1 AX +C ART", ORIENTATION_AXIAL, "GADOVIST"),
    SeriesTemplate::with_contrast("T1_VIBE", "T1 AX +C PORT", ORIENTATION_AXIAL, "GADOVIST"),
];

/// CT增强扫描期相模板
const CT_WITH_CONTRAST_TEMPLATES: [SeriesTemplate; 4] = [
    SeriesTemplate::plain("", "Sans contraste", ORIENTATION_AXIAL),
    SeriesTemplate::with_contrast("", "Arteriel", ORIENTATION_AXIAL, "IOMERON 400"),
    SeriesTemplate::with_contrast("", "Portal", ORIENTATION_AXIAL, "IOMERON 400"),
    SeriesTemplate::with_contrast("", "Tardif", ORIENTATION_AXIAL, "IOMERON 400"),
];

/// CT平扫模板
const CT_WITHOUT_CONTRAST_TEMPLATES: [SeriesTemplate; 3] = [
    SeriesTemplate::plain("", "Acquisition standard", ORIENTATION_AXIAL),
    SeriesTemplate::with_window("Reconstruction os", ORIENTATION_AXIAL, 400.0, 2000.0),
    SeriesTemplate::with_window("Reconstruction poumon", ORIENTATION_AXIAL, -600.0, 1500.0),
];

/// CR/DX模板——通常单序列多体位
const CR_DX_TEMPLATES: [SeriesTemplate; 3] = [
    SeriesTemplate::plain("", "Face", ORIENTATION_CORONAL),
    SeriesTemplate::plain("", "Profil", ORIENTATION_SAGITTAL),
    SeriesTemplate::plain("", "Oblique", ORIENTATION_AXIAL),
];

/// US模板
const US_TEMPLATES: [SeriesTemplate; 3] = [
    SeriesTemplate::plain("", "Mode B", ORIENTATION_AXIAL),
    SeriesTemplate::plain("", "Doppler couleur", ORIENTATION_AXIAL),
    SeriesTemplate::plain("", "Mesures", ORIENTATION_AXIAL),
];

/// MG模板——标准乳腺摄影体位
const MG_TEMPLATES: [SeriesTemplate; 4] = [
    SeriesTemplate::plain("", "CC Droit", ORIENTATION_AXIAL),
    SeriesTemplate::plain("", "MLO Droit", ORIENTATION_AXIAL),
    SeriesTemplate::plain("", "CC Gauche", ORIENTATION_AXIAL),
    SeriesTemplate::plain("", "MLO Gauche", ORIENTATION_AXIAL),
];

/// 按模态与检查部位返回序列模板
///
/// 需要的数量超过模板池时返回整个池；否则随机洗牌后取前count个。
pub fn series_templates_for(
    modality: Modality,
    body_part: &str,
    count: usize,
    rng: &mut StdRng,
) -> Vec<SeriesTemplate> {
    let pool: &[SeriesTemplate] = match modality {
        Modality::MR => match body_part {
            "HEAD" | "BRAIN" => &MR_BRAIN_TEMPLATES,
            "KNEE" | "ANKLE" | "FOOT" | "SHOULDER" | "ELBOW" | "WRIST" | "HIP" => {
                &MR_KNEE_TEMPLATES
            }
            "CSPINE" | "TSPINE" | "LSPINE" | "SPINE" => &MR_SPINE_TEMPLATES,
            "ABDOMEN" | "PELVIS" | "LIVER" => &MR_ABDOMEN_TEMPLATES,
            // 默认取颅脑
            _ => &MR_BRAIN_TEMPLATES,
        },
        Modality::CT => {
            // 一半概率为增强检查
            if rng.gen_bool(0.5) {
                &CT_WITH_CONTRAST_TEMPLATES
            } else {
                &CT_WITHOUT_CONTRAST_TEMPLATES
            }
        }
        Modality::CR | Modality::DX => &CR_DX_TEMPLATES,
        Modality::US => &US_TEMPLATES,
        Modality::MG => &MG_TEMPLATES,
    };

    if count >= pool.len() {
        return pool.to_vec();
    }

    let mut selected = pool.to_vec();
    selected.shuffle(rng);
    selected.truncate(count);
    selected
}

/// 各模态默认的序列数
pub fn default_series_count(modality: Modality) -> u32 {
    match modality {
        Modality::MR => 4,
        Modality::CT => 3,
        Modality::CR | Modality::DX => 2,
        Modality::US => 2,
        Modality::MG => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_orientation_cosines() {
        let axial = SeriesTemplate::plain("", "AX", ORIENTATION_AXIAL);
        assert_eq!(
            axial.image_orientation_patient(),
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );

        let sagittal = SeriesTemplate::plain("", "SAG", ORIENTATION_SAGITTAL);
        assert_eq!(
            sagittal.image_orientation_patient(),
            [0.0, 1.0, 0.0, 0.0, 0.0, -1.0]
        );

        let coronal = SeriesTemplate::plain("", "COR", ORIENTATION_CORONAL);
        assert_eq!(
            coronal.image_orientation_patient(),
            [1.0, 0.0, 0.0, 0.0, 0.0, -1.0]
        );
    }

    #[test]
    fn test_templates_respect_requested_count() {
        let mut rng = StdRng::seed_from_u64(42);

        let two = series_templates_for(Modality::MR, "BRAIN", 2, &mut rng);
        assert_eq!(two.len(), 2);
        for t in &two {
            assert!(MR_BRAIN_TEMPLATES.contains(t));
        }

        // 超过池大小时返回整个池
        let many = series_templates_for(Modality::MR, "BRAIN", 100, &mut rng);
        assert_eq!(many.len(), MR_BRAIN_TEMPLATES.len());
    }

    #[test]
    fn test_body_part_selects_pool() {
        let mut rng = StdRng::seed_from_u64(42);

        let knee = series_templates_for(Modality::MR, "KNEE", 100, &mut rng);
        assert_eq!(knee.len(), MR_KNEE_TEMPLATES.len());

        let spine = series_templates_for(Modality::MR, "LSPINE", 100, &mut rng);
        assert_eq!(spine.len(), MR_SPINE_TEMPLATES.len());

        // 未知部位回落到颅脑
        let unknown = series_templates_for(Modality::MR, "XYZ", 100, &mut rng);
        assert_eq!(unknown.len(), MR_BRAIN_TEMPLATES.len());
    }

    #[test]
    fn test_mg_templates_cover_both_breasts() {
        let mut rng = StdRng::seed_from_u64(42);
        let templates = series_templates_for(Modality::MG, "BREAST", 4, &mut rng);
        assert_eq!(templates.len(), 4);
    }

    #[test]
    fn test_default_series_count() {
        assert_eq!(default_series_count(Modality::MR), 4);
        assert_eq!(default_series_count(Modality::CT), 3);
        assert_eq!(default_series_count(Modality::CR), 2);
        assert_eq!(default_series_count(Modality::DX), 2);
        assert_eq!(default_series_count(Modality::US), 2);
        assert_eq!(default_series_count(Modality::MG), 4);
    }
}
