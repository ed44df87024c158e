//! 医疗机构数据表

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// 生成的机构信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    pub name: &'static str,
    pub address: &'static str,
    pub department: &'static str,
}

/// 真实风格的医院名称与地址
const HOSPITALS: [(&str, &str); 15] = [
    ("CHU Bordeaux", "Place Amelie Raba-Leon, 33000 Bordeaux"),
    ("Hopital Saint-Louis", "1 Avenue Claude Vellefaux, 75010 Paris"),
    ("CHU Toulouse", "2 Rue Viguerie, 31000 Toulouse"),
    ("Clinique du Parc", "155 Boulevard Stalingrad, 69006 Lyon"),
    (
        "Hopital Europeen Georges-Pompidou",
        "20 Rue Leblanc, 75015 Paris",
    ),
    ("CHU Nantes", "1 Place Alexis-Ricordeau, 44000 Nantes"),
    ("CHU Lille", "2 Avenue Oscar Lambret, 59000 Lille"),
    (
        "Hopital de la Pitie-Salpetriere",
        "47-83 Boulevard de l'Hopital, 75013 Paris",
    ),
    (
        "CHU Montpellier",
        "191 Avenue du Doyen Gaston Giraud, 34090 Montpellier",
    ),
    (
        "Hopital Cochin",
        "27 Rue du Faubourg Saint-Jacques, 75014 Paris",
    ),
    (
        "Massachusetts General Hospital",
        "55 Fruit Street, Boston, MA 02114",
    ),
    (
        "Johns Hopkins Hospital",
        "1800 Orleans Street, Baltimore, MD 21287",
    ),
    (
        "Cleveland Clinic",
        "9500 Euclid Avenue, Cleveland, OH 44195",
    ),
    ("Mayo Clinic", "200 First Street SW, Rochester, MN 55905"),
    (
        "UCLA Medical Center",
        "757 Westwood Plaza, Los Angeles, CA 90095",
    ),
];

/// 医学科室
const DEPARTMENTS: [&str; 10] = [
    "Radiologie",
    "Imagerie Medicale",
    "Neuroradiologie",
    "Radiologie Interventionnelle",
    "Urgences",
    "Cardiologie",
    "Neurologie",
    "Oncologie",
    "Pediatrie",
    "Orthopedie",
];

/// 随机生成一个机构（名称、地址、科室）
pub fn generate_institution(rng: &mut StdRng) -> Institution {
    let (name, address) = HOSPITALS.choose(rng).copied().unwrap_or(HOSPITALS[0]);
    let department = DEPARTMENTS.choose(rng).copied().unwrap_or(DEPARTMENTS[0]);

    Institution {
        name,
        address,
        department,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_generate_institution_from_tables() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let inst = generate_institution(&mut rng);
            assert!(HOSPITALS
                .iter()
                .any(|(n, a)| *n == inst.name && *a == inst.address));
            assert!(DEPARTMENTS.contains(&inst.department));
        }
    }

    #[test]
    fn test_generate_institution_deterministic_with_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(generate_institution(&mut a), generate_institution(&mut b));
    }
}
