//! 核心数据模型定义

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DcmGenError;

/// 成像模态类型
///
/// 支持六种模态，与DICOM Modality (0008,0060) 的取值一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    /// 磁共振成像
    MR,
    /// 计算机断层扫描
    CT,
    /// 计算机X线摄影
    CR,
    /// 数字X线摄影
    DX,
    /// 超声成像
    US,
    /// 乳腺X线摄影
    MG,
}

impl Modality {
    /// 返回全部支持的模态
    pub fn all() -> [Modality; 6] {
        [
            Modality::MR,
            Modality::CT,
            Modality::CR,
            Modality::DX,
            Modality::US,
            Modality::MG,
        ]
    }

    /// 检查字符串是否为有效的模态代码（区分大小写）
    pub fn is_valid(s: &str) -> bool {
        Modality::from_str(s).is_ok()
    }

    /// 返回模态代码
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::MR => "MR",
            Modality::CT => "CT",
            Modality::CR => "CR",
            Modality::DX => "DX",
            Modality::US => "US",
            Modality::MG => "MG",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = DcmGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MR" => Ok(Modality::MR),
            "CT" => Ok(Modality::CT),
            "CR" => Ok(Modality::CR),
            "DX" => Ok(Modality::DX),
            "US" => Ok(Modality::US),
            "MG" => Ok(Modality::MG),
            _ => Err(DcmGenError::InvalidParameter(format!(
                "不支持的模态: {}",
                s
            ))),
        }
    }
}

/// 扫描设备信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scanner {
    /// 制造商名称
    pub manufacturer: String,
    /// 设备型号
    pub model: String,
    /// 磁场强度（特斯拉，仅MR有效）
    pub field_strength: f64,
}

impl Scanner {
    pub fn new(manufacturer: &str, model: &str) -> Self {
        Self {
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            field_strength: 0.0,
        }
    }

    pub fn with_field_strength(manufacturer: &str, model: &str, field_strength: f64) -> Self {
        Self {
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            field_strength,
        }
    }
}

/// 序列级采集参数
///
/// 各模态共用的扁平参数结构，不适用的字段保持零值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesParams {
    pub modality: Modality,
    pub scanner: Scanner,

    /// 像素间距（毫米）
    pub pixel_spacing: f64,
    /// 层厚（毫米，断层模态）
    pub slice_thickness: f64,
    /// 层间距（毫米，断层模态）
    pub spacing_between_slices: f64,

    // === MR 参数 ===
    /// 回波时间（毫秒）
    pub echo_time: f64,
    /// 重复时间（毫秒）
    pub repetition_time: f64,
    /// 翻转角（度）
    pub flip_angle: f64,
    /// 序列名称
    pub sequence_name: String,

    // === CT / X线参数 ===
    /// 管电压（kVp）
    pub kvp: f64,
    /// 曝光量（mAs）
    pub exposure: i32,
    /// 曝光时间（毫秒）
    pub exposure_time: i32,
    /// 管电流（mA）
    pub tube_current: i32,
    /// 重建卷积核
    pub convolution_kernel: String,

    // === CR / DX / MG 参数 ===
    /// 投照体位
    pub view_position: String,
    /// 探测器像素间距（毫米）
    pub imager_pixel_spacing: f64,
    /// 射线源到探测器距离（毫米）
    pub distance_source_to_detector: f64,
    /// 射线源到患者距离（毫米）
    pub distance_source_to_patient: f64,

    // === MG 参数 ===
    /// 成像侧别（L/R）
    pub image_laterality: String,
    /// 阳极靶材料
    pub anode_target_material: String,
    /// 滤过材料
    pub filter_material: String,
    /// 压迫力（牛顿）
    pub compression_force: f64,
    /// 器官剂量（mGy）
    pub organ_dose: f64,

    // === US 参数 ===
    /// 探头类型
    pub transducer_type: String,
    /// 探头频率（MHz）
    pub transducer_frequency: f64,

    // === 窗宽窗位 ===
    pub window_center: f64,
    pub window_width: f64,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            modality: Modality::MR,
            scanner: Scanner::new("", ""),
            pixel_spacing: 0.0,
            slice_thickness: 0.0,
            spacing_between_slices: 0.0,
            echo_time: 0.0,
            repetition_time: 0.0,
            flip_angle: 0.0,
            sequence_name: String::new(),
            kvp: 0.0,
            exposure: 0,
            exposure_time: 0,
            tube_current: 0,
            convolution_kernel: String::new(),
            view_position: String::new(),
            imager_pixel_spacing: 0.0,
            distance_source_to_detector: 0.0,
            distance_source_to_patient: 0.0,
            image_laterality: String::new(),
            anode_target_material: String::new(),
            filter_material: String::new(),
            compression_force: 0.0,
            organ_dose: 0.0,
            transducer_type: String::new(),
            transducer_frequency: 0.0,
            window_center: 0.0,
            window_width: 0.0,
        }
    }
}

/// 像素数据配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelConfig {
    /// 分配位数
    pub bits_allocated: u16,
    /// 存储位数
    pub bits_stored: u16,
    /// 最高位
    pub high_bit: u16,
    /// 像素表示（0=无符号）
    pub pixel_representation: u16,
    /// 最小像素值
    pub min_value: u16,
    /// 最大像素值
    pub max_value: u16,
    /// 基准像素值（噪声中心）
    pub base_value: u16,
}

/// 窗宽窗位预设
#[derive(Debug, Clone, Serialize)]
pub struct WindowPreset {
    pub name: &'static str,
    pub center: f64,
    pub width: f64,
}

/// 已生成DICOM文件的记录
///
/// 生成器为每个写出的实例保留一条记录，供目录组织、
/// DICOMDIR构建和清单输出使用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// 文件路径（组织目录后更新为层级内路径）
    pub path: String,
    pub patient_id: String,
    pub patient_name: String,
    pub study_uid: String,
    pub study_id: String,
    pub study_date: String,
    pub study_time: String,
    pub series_uid: String,
    pub series_number: i32,
    pub modality: Modality,
    pub sop_class_uid: String,
    pub sop_instance_uid: String,
    pub instance_number: i32,
}

/// 每项检查的序列数范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesRange {
    pub min: u32,
    pub max: u32,
}

impl SeriesRange {
    /// 解析序列数范围，格式为 "N" 或 "N-M"，空串视为1
    pub fn parse(s: &str) -> crate::Result<SeriesRange> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(SeriesRange { min: 1, max: 1 });
        }

        if let Some((lo, hi)) = s.split_once('-') {
            let min: u32 = lo.trim().parse().map_err(|_| {
                DcmGenError::InvalidParameter(format!("序列范围下限无效: {}", lo))
            })?;
            let max: u32 = hi.trim().parse().map_err(|_| {
                DcmGenError::InvalidParameter(format!("序列范围上限无效: {}", hi))
            })?;

            if min < 1 {
                return Err(DcmGenError::InvalidParameter(format!(
                    "序列范围下限必须 >= 1，实际为 {}",
                    min
                )));
            }
            if max < min {
                return Err(DcmGenError::InvalidParameter(format!(
                    "序列范围上限 ({}) 必须 >= 下限 ({})",
                    max, min
                )));
            }

            return Ok(SeriesRange { min, max });
        }

        let n: u32 = s.parse().map_err(|_| {
            DcmGenError::InvalidParameter(format!("序列数无效: {}", s))
        })?;
        if n < 1 {
            return Err(DcmGenError::InvalidParameter(format!(
                "序列数必须 >= 1，实际为 {}",
                n
            )));
        }

        Ok(SeriesRange { min: n, max: n })
    }

    /// 在范围内随机取一个序列数
    pub fn pick<R: Rng>(&self, rng: &mut R) -> u32 {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    /// 范围是否可能产生多个序列
    pub fn is_multi_series(&self) -> bool {
        self.max > 1
    }
}

impl fmt::Display for SeriesRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}
