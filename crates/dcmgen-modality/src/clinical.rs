//! 临床数据表：检查部位、协议名与临床指征

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use dcmgen_core::Modality;

/// 未匹配到具体指征时的默认指征
const DEFAULT_INDICATIONS: [&str; 3] = ["Bilan diagnostique", "Controle", "Suivi"];

/// 返回模态适用的检查部位列表
pub fn body_parts_for_modality(modality: Modality) -> &'static [&'static str] {
    match modality {
        Modality::MR => &[
            "HEAD", "BRAIN", "CSPINE", "TSPINE", "LSPINE", "KNEE", "SHOULDER", "HIP", "ANKLE",
            "WRIST", "PELVIS", "ABDOMEN", "CHEST",
        ],
        Modality::CT => &[
            "HEAD", "CHEST", "ABDOMEN", "PELVIS", "CSPINE", "TSPINE", "LSPINE", "EXTREMITY",
        ],
        Modality::CR | Modality::DX => &[
            "CHEST", "HAND", "FOOT", "KNEE", "SHOULDER", "SKULL", "SPINE", "PELVIS", "RIBS",
        ],
        Modality::US => &[
            "ABDOMEN", "PELVIS", "BREAST", "THYROID", "HEART", "LIVER", "KIDNEY", "UTERUS",
        ],
        Modality::MG => &["BREAST"],
    }
}

/// 随机选取一个适用于该模态的检查部位
pub fn generate_body_part(modality: Modality, rng: &mut StdRng) -> &'static str {
    body_parts_for_modality(modality)
        .choose(rng)
        .copied()
        .unwrap_or("HEAD")
}

/// 按模态与部位返回协议名池；无专用协议时返回空
fn protocols_for(modality: Modality, body_part: &str) -> &'static [&'static str] {
    match (modality, body_part) {
        (Modality::MR, "HEAD" | "BRAIN") => &[
            "BRAIN_ROUTINE",
            "BRAIN_WITH_CONTRAST",
            "BRAIN_STROKE",
            "BRAIN_TUMOR",
            "BRAIN_MS",
        ],
        (Modality::MR, "CSPINE") => &["CSPINE_ROUTINE", "CSPINE_WITH_CONTRAST"],
        (Modality::MR, "TSPINE") => &["TSPINE_ROUTINE", "TSPINE_WITH_CONTRAST"],
        (Modality::MR, "LSPINE") => &["LSPINE_ROUTINE", "LSPINE_WITH_CONTRAST", "LSPINE_DISC"],
        (Modality::MR, "KNEE") => &["KNEE_ROUTINE", "KNEE_ACL", "KNEE_MENISCUS"],
        (Modality::MR, "SHOULDER") => &["SHOULDER_ROUTINE", "SHOULDER_ARTHROGRAM"],
        (Modality::MR, "HIP") => &["HIP_ROUTINE", "HIP_ARTHROGRAM"],
        (Modality::MR, "ABDOMEN") => &["ABDOMEN_ROUTINE", "MRCP", "LIVER_DYNAMIC"],
        (Modality::MR, "PELVIS") => &["PELVIS_ROUTINE", "PROSTATE_MP"],
        (Modality::CT, "HEAD") => &["HEAD_ROUTINE", "HEAD_TRAUMA", "HEAD_STROKE", "HEAD_SINUS"],
        (Modality::CT, "CHEST") => &["CHEST_ROUTINE", "CHEST_PE", "CHEST_HRCT", "CHEST_TRAUMA"],
        (Modality::CT, "ABDOMEN") => &[
            "ABDOMEN_ROUTINE",
            "ABDOMEN_TRIPLE_PHASE",
            "ABDOMEN_TRAUMA",
        ],
        (Modality::CT, "PELVIS") => &["PELVIS_ROUTINE", "PELVIS_WITH_CONTRAST"],
        (Modality::CT, "CSPINE") => &["CSPINE_TRAUMA", "CSPINE_ROUTINE"],
        _ => &[],
    }
}

/// 生成协议名；无专用协议时使用"模态_部位_ROUTINE"
pub fn generate_protocol_name(modality: Modality, body_part: &str, rng: &mut StdRng) -> String {
    let pool = protocols_for(modality, body_part);
    match pool.choose(rng) {
        Some(protocol) => (*protocol).to_string(),
        None => format!("{}_{}_ROUTINE", modality, body_part),
    }
}

/// 按部位返回常见临床指征池
fn indications_for(body_part: &str) -> &'static [&'static str] {
    match body_part {
        "HEAD" | "BRAIN" => &[
            "Cephalees persistantes",
            "Vertiges",
            "Trouble de la vision",
            "Suspicion AVC",
            "Bilan tumoral",
        ],
        "CHEST" => &[
            "Toux chronique",
            "Dyspnee",
            "Douleur thoracique",
            "Bilan infectieux",
            "Suspicion EP",
        ],
        "ABDOMEN" => &[
            "Douleur abdominale",
            "Bilan hepatique",
            "Masse abdominale",
            "Occlusion",
        ],
        "KNEE" => &[
            "Douleur genou",
            "Traumatisme",
            "Suspicion rupture LCA",
            "Blocage articulaire",
        ],
        "SHOULDER" => &["Douleur epaule", "Limitation mobilite", "Traumatisme"],
        "LSPINE" => &["Lombalgie", "Sciatique", "Bilan hernie discale"],
        "PELVIS" => &["Douleur pelvienne", "Bilan oncologique", "Trouble urinaire"],
        "BREAST" => &["Depistage", "Masse palpable", "Bilan extension"],
        _ => &[],
    }
}

/// 生成临床指征
pub fn generate_clinical_indication(body_part: &str, rng: &mut StdRng) -> &'static str {
    let pool = indications_for(body_part);
    if pool.is_empty() {
        DEFAULT_INDICATIONS.choose(rng).copied().unwrap_or("Controle")
    } else {
        pool.choose(rng).copied().unwrap_or("Controle")
    }
}
