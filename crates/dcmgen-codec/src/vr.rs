//! VR（值表示）分类表
//!
//! 显式VR编码下，VR决定长度字段的宽度：长格式VR使用2字节保留区
//! 加4字节长度，其余VR使用紧随其后的2字节长度。编码器与破坏引擎
//! 共用此表，两者对同一VR的判定不可能出现分歧。

/// 长格式VR集合（PS3.5规定使用4字节长度字段的全部VR）
pub const LONG_FORM_VRS: [&str; 13] = [
    "OB", "OD", "OF", "OL", "OV", "OW", "SQ", "SV", "UC", "UN", "UR", "UT", "UV",
];

/// 判断VR是否为长格式
pub fn is_long_form(vr: &str) -> bool {
    LONG_FORM_VRS.contains(&vr)
}

/// 短格式元素头长度：group(2) + element(2) + VR(2) + length(2)
pub const SHORT_HEADER_LEN: usize = 8;

/// 长格式元素头长度：group(2) + element(2) + VR(2) + reserved(2) + length(4)
pub const LONG_HEADER_LEN: usize = 12;

/// 短格式长度字段相对元素起始的偏移
pub const SHORT_LENGTH_OFFSET: usize = 6;

/// 长格式长度字段相对元素起始的偏移
pub const LONG_LENGTH_OFFSET: usize = 8;

/// 短格式长度字段可表示的最大值
pub const MAX_SHORT_LENGTH: u64 = u16::MAX as u64;

/// 长格式长度字段可表示的最大值
pub const MAX_LONG_LENGTH: u64 = u32::MAX as u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_form_set() {
        for vr in [
            "OB", "OD", "OF", "OL", "OV", "OW", "SQ", "SV", "UC", "UN", "UR", "UT", "UV",
        ] {
            assert!(is_long_form(vr), "{} 应为长格式", vr);
        }
    }

    #[test]
    fn test_short_form_vrs_not_in_set() {
        for vr in [
            "AE", "AS", "AT", "CS", "DA", "DS", "DT", "FL", "FD", "IS", "LO", "LT", "PN", "SH",
            "SL", "SS", "ST", "TM", "UI", "UL", "US",
        ] {
            assert!(!is_long_form(vr), "{} 应为短格式", vr);
        }
    }
}
