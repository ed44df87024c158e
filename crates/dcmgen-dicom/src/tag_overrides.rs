//! 命名标签覆盖
//!
//! 解析 "TagName=Value" 形式的覆盖说明，按注册表校验标签名并
//! 在数据集生成后应用。注册表只收录允许覆盖的常用标签。

use std::collections::HashMap;

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, Tag, VR};
use dicom::object::InMemDicomObject;

use dcmgen_core::{DcmGenError, Result};

/// 标签作用域：决定覆盖在哪一层级生效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    Patient,
    Study,
    Series,
    Equipment,
}

/// 注册表条目
#[derive(Debug, Clone, Copy)]
pub struct TagInfo {
    /// 规范标签名
    pub name: &'static str,
    pub tag: Tag,
    pub vr: VR,
    pub scope: TagScope,
}

/// 允许覆盖的标签注册表
static TAG_REGISTRY: [TagInfo; 16] = [
    TagInfo {
        name: "PatientName",
        tag: Tag(0x0010, 0x0010),
        vr: VR::PN,
        scope: TagScope::Patient,
    },
    TagInfo {
        name: "PatientID",
        tag: Tag(0x0010, 0x0020),
        vr: VR::LO,
        scope: TagScope::Patient,
    },
    TagInfo {
        name: "PatientBirthDate",
        tag: Tag(0x0010, 0x0030),
        vr: VR::DA,
        scope: TagScope::Patient,
    },
    TagInfo {
        name: "PatientSex",
        tag: Tag(0x0010, 0x0040),
        vr: VR::CS,
        scope: TagScope::Patient,
    },
    TagInfo {
        name: "StudyDescription",
        tag: Tag(0x0008, 0x1030),
        vr: VR::LO,
        scope: TagScope::Study,
    },
    TagInfo {
        name: "StudyID",
        tag: Tag(0x0020, 0x0010),
        vr: VR::SH,
        scope: TagScope::Study,
    },
    TagInfo {
        name: "AccessionNumber",
        tag: Tag(0x0008, 0x0050),
        vr: VR::SH,
        scope: TagScope::Study,
    },
    TagInfo {
        name: "ReferringPhysicianName",
        tag: Tag(0x0008, 0x0090),
        vr: VR::PN,
        scope: TagScope::Study,
    },
    TagInfo {
        name: "SeriesDescription",
        tag: Tag(0x0008, 0x103E),
        vr: VR::LO,
        scope: TagScope::Series,
    },
    TagInfo {
        name: "BodyPartExamined",
        tag: Tag(0x0018, 0x0015),
        vr: VR::CS,
        scope: TagScope::Series,
    },
    TagInfo {
        name: "ProtocolName",
        tag: Tag(0x0018, 0x1030),
        vr: VR::LO,
        scope: TagScope::Series,
    },
    TagInfo {
        name: "OperatorsName",
        tag: Tag(0x0008, 0x1070),
        vr: VR::PN,
        scope: TagScope::Series,
    },
    TagInfo {
        name: "InstitutionName",
        tag: Tag(0x0008, 0x0080),
        vr: VR::LO,
        scope: TagScope::Equipment,
    },
    TagInfo {
        name: "Manufacturer",
        tag: Tag(0x0008, 0x0070),
        vr: VR::LO,
        scope: TagScope::Equipment,
    },
    TagInfo {
        name: "ManufacturerModelName",
        tag: Tag(0x0008, 0x1090),
        vr: VR::LO,
        scope: TagScope::Equipment,
    },
    TagInfo {
        name: "StationName",
        tag: Tag(0x0008, 0x1010),
        vr: VR::SH,
        scope: TagScope::Equipment,
    },
];

/// 按名称查找注册表条目（不区分大小写）
pub fn get_tag_by_name(name: &str) -> Result<&'static TagInfo> {
    TAG_REGISTRY
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| DcmGenError::Config(format!("未知的标签名: '{}'", name)))
}

/// 解析后的标签覆盖集合，键为规范标签名
#[derive(Debug, Clone, Default)]
pub struct ParsedTags(HashMap<&'static str, String>);

impl ParsedTags {
    /// 覆盖集合中是否包含指定标签
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// 取指定标签的覆盖值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|v| v.as_str())
    }

    /// 返回仅包含指定作用域的子集
    pub fn with_scope(&self, scope: TagScope) -> ParsedTags {
        let filtered = self
            .0
            .iter()
            .filter(|(name, _)| {
                get_tag_by_name(name).map(|info| info.scope == scope).unwrap_or(false)
            })
            .map(|(name, value)| (*name, value.clone()))
            .collect();
        ParsedTags(filtered)
    }

    /// 全部规范标签名
    pub fn keys(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 解析 "TagName=Value" 形式的覆盖说明
///
/// 标签名按注册表校验，未知标签名报错；值可以为空且保留空白。
pub fn parse_tag_flags(flags: &[String]) -> Result<ParsedTags> {
    let mut result = HashMap::new();

    for flag in flags {
        let (name_part, value) = flag.split_once('=').ok_or_else(|| {
            DcmGenError::Config(format!(
                "标签覆盖格式无效 {:?}: 缺少'='（应为 TagName=Value）",
                flag
            ))
        })?;

        let name = name_part.trim();
        if name.is_empty() {
            return Err(DcmGenError::Config(format!(
                "标签覆盖格式无效 {:?}: 标签名为空",
                flag
            )));
        }

        let info = get_tag_by_name(name)?;
        result.insert(info.name, value.to_string());
    }

    Ok(ParsedTags(result))
}

/// 将覆盖应用到数据集
pub fn apply_overrides(obj: &mut InMemDicomObject, overrides: &ParsedTags) -> Result<()> {
    for (name, value) in &overrides.0 {
        let info = get_tag_by_name(name)?;
        obj.put(DataElement::new(
            info.tag,
            info.vr,
            PrimitiveValue::from(value.as_str()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_flags() {
        let flags = vec![
            "PatientName=DUPONT^MARIE".to_string(),
            "AccessionNumber=ACC999999".to_string(),
        ];
        let parsed = parse_tag_flags(&flags).unwrap();

        assert!(parsed.has("PatientName"));
        assert_eq!(parsed.get("PatientName"), Some("DUPONT^MARIE"));
        assert_eq!(parsed.get("AccessionNumber"), Some("ACC999999"));
    }

    #[test]
    fn test_parse_is_case_insensitive_with_canonical_keys() {
        let flags = vec!["patientname=TEST^NAME".to_string()];
        let parsed = parse_tag_flags(&flags).unwrap();

        // 键为规范名
        assert!(parsed.has("PatientName"));
        assert_eq!(parsed.keys(), vec!["PatientName"]);
    }

    #[test]
    fn test_parse_preserves_value_verbatim() {
        let flags = vec!["StudyDescription= avec espaces =et= signes".to_string()];
        let parsed = parse_tag_flags(&flags).unwrap();
        assert_eq!(
            parsed.get("StudyDescription"),
            Some(" avec espaces =et= signes")
        );
    }

    #[test]
    fn test_parse_empty_value_allowed() {
        let parsed = parse_tag_flags(&["PatientSex=".to_string()]).unwrap();
        assert_eq!(parsed.get("PatientSex"), Some(""));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_tag_flags(&["PatientName".to_string()]).is_err());
        assert!(parse_tag_flags(&["=VALUE".to_string()]).is_err());
        assert!(parse_tag_flags(&["NoSuchTag=1".to_string()]).is_err());
    }

    #[test]
    fn test_with_scope_filters() {
        let flags = vec![
            "PatientName=A".to_string(),
            "StudyID=B".to_string(),
            "Manufacturer=C".to_string(),
        ];
        let parsed = parse_tag_flags(&flags).unwrap();

        let patient = parsed.with_scope(TagScope::Patient);
        assert!(patient.has("PatientName"));
        assert!(!patient.has("StudyID"));
        assert!(!patient.has("Manufacturer"));
    }

    #[test]
    fn test_apply_overrides_to_dataset() {
        let mut obj = InMemDicomObject::new_empty();
        let parsed = parse_tag_flags(&["PatientName=DUPONT^MARIE".to_string()]).unwrap();

        apply_overrides(&mut obj, &parsed).unwrap();

        let name = obj.element(Tag(0x0010, 0x0010)).unwrap().to_str().unwrap();
        assert_eq!(name, "DUPONT^MARIE");
    }
}
