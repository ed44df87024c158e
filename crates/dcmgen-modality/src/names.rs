//! 合成患者姓名生成

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const FAMILY_NAMES: [&str; 12] = [
    "MARTIN", "BERNARD", "DUBOIS", "THOMAS", "ROBERT", "RICHARD", "PETIT", "DURAND", "LEROY",
    "MOREAU", "GARCIA", "ROUX",
];

const MALE_GIVEN_NAMES: [&str; 10] = [
    "JEAN", "PIERRE", "MICHEL", "ANDRE", "PHILIPPE", "LOUIS", "NICOLAS", "FRANCOIS", "HENRI",
    "MARCEL",
];

const FEMALE_GIVEN_NAMES: [&str; 10] = [
    "MARIE", "JEANNE", "FRANCOISE", "MONIQUE", "CATHERINE", "NATHALIE", "ISABELLE",
    "JACQUELINE", "ANNE", "SYLVIE",
];

/// 按性别生成DICOM PN格式的患者姓名（"姓^名"）
pub fn generate_patient_name(sex: &str, rng: &mut StdRng) -> String {
    let family = FAMILY_NAMES.choose(rng).copied().unwrap_or("MARTIN");
    let given = if sex == "F" {
        FEMALE_GIVEN_NAMES.choose(rng).copied().unwrap_or("MARIE")
    } else {
        MALE_GIVEN_NAMES.choose(rng).copied().unwrap_or("JEAN")
    };

    format!("{}^{}", family, given)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_name_format() {
        let mut rng = StdRng::seed_from_u64(42);
        let name = generate_patient_name("M", &mut rng);
        let (family, given) = name.split_once('^').unwrap();
        assert!(FAMILY_NAMES.contains(&family));
        assert!(MALE_GIVEN_NAMES.contains(&given));
    }

    #[test]
    fn test_name_respects_sex() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let name = generate_patient_name("F", &mut rng);
            let given = name.split_once('^').unwrap().1;
            assert!(FEMALE_GIVEN_NAMES.contains(&given));
        }
    }
}
