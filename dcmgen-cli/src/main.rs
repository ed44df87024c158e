//! 合成DICOM数据生成器主程序

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};

use dcmgen_core::{Modality, SeriesRange};
use dcmgen_dicom::corruption::{corrupt_declared_length, parse_tag_spec};
use dcmgen_dicom::dicomdir::organize_into_dicomdir;
use dcmgen_dicom::writer::verify_instance;
use dcmgen_dicom::{generate_series, parse_tag_flags, GeneratorOptions};

/// 合成DICOM数据生成器命令行参数
#[derive(Parser, Debug)]
#[command(name = "dcmgen")]
#[command(about = "合成DICOM数据生成器——为PACS/阅片器压力测试生成标准DICOM文件")]
struct Args {
    /// 生成的图像总数
    #[arg(short = 'n', long)]
    images: Option<usize>,

    /// 目标总大小（如 100MB、4.5GB）
    #[arg(short, long)]
    size: Option<String>,

    /// 输出目录
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 随机种子（不指定时由输出目录名确定性派生）
    #[arg(long)]
    seed: Option<u64>,

    /// 检查数量
    #[arg(long)]
    studies: Option<usize>,

    /// 成像模态 (MR/CT/CR/DX/US/MG)
    #[arg(short, long)]
    modality: Option<String>,

    /// 每项检查的序列数（N 或 N-M）
    #[arg(long)]
    series: Option<String>,

    /// 检查部位（如 HEAD、CHEST；不指定时按模态随机）
    #[arg(long)]
    body_part: Option<String>,

    /// 标签覆盖（TagName=Value，可重复）
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// 组织PT/ST/SE层级并生成DICOMDIR索引
    #[arg(long)]
    dicomdir: bool,

    /// 写出manifest.json清单
    #[arg(long)]
    manifest: bool,

    /// 生成后重新解析并校验所有文件
    #[arg(long)]
    verify: bool,

    /// 向每个文件追加畸形占位元素（负面测试）
    #[arg(long)]
    malformed: bool,

    /// 破坏目标标签的声明长度（十六进制 GGGG,EEEE）
    #[arg(long)]
    corrupt_tag: Option<String>,

    /// 注入的声明长度（默认 0xFFFFFFFF）
    #[arg(long)]
    corrupt_length: Option<u32>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// 配置文件中可设置的默认值（命令行参数优先）
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    images: Option<usize>,
    size: Option<String>,
    output: Option<String>,
    studies: Option<usize>,
    modality: Option<String>,
    series: Option<String>,
    body_part: Option<String>,
}

fn load_file_config(path: &str) -> anyhow::Result<FileConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()
        .with_context(|| format!("读取配置文件失败: {}", path))?;

    settings
        .try_deserialize()
        .with_context(|| format!("解析配置文件失败: {}", path))
}

/// 合并命令行、配置文件与内置默认值
fn resolve_options(args: &Args, file: FileConfig) -> anyhow::Result<GeneratorOptions> {
    let defaults = GeneratorOptions::default();

    let modality_str = args
        .modality
        .clone()
        .or(file.modality)
        .unwrap_or_else(|| defaults.modality.to_string());
    let modality = Modality::from_str(&modality_str)?;

    let series_range = match args.series.clone().or(file.series) {
        Some(spec) => Some(SeriesRange::parse(&spec)?),
        None => None,
    };

    Ok(GeneratorOptions {
        num_images: args.images.or(file.images).unwrap_or(defaults.num_images),
        total_size: args
            .size
            .clone()
            .or(file.size)
            .unwrap_or(defaults.total_size),
        output_dir: args
            .output
            .clone()
            .or(file.output.map(PathBuf::from))
            .unwrap_or(defaults.output_dir),
        seed: args.seed,
        num_studies: args.studies.or(file.studies).unwrap_or(defaults.num_studies),
        modality,
        series_range,
        body_part: args.body_part.clone().or(file.body_part),
        tag_overrides: parse_tag_flags(&args.tags)?,
        malformed: args.malformed,
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&args.log_level))
        .init();

    info!("启动合成DICOM数据生成器...");

    let file_config = match &args.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    let opts = resolve_options(&args, file_config)?;

    info!("生成配置:");
    info!("  模态: {}", opts.modality);
    info!("  图像总数: {}", opts.num_images);
    info!("  目标大小: {}", opts.total_size);
    info!("  检查数: {}", opts.num_studies);
    info!("  输出目录: {:?}", opts.output_dir);

    // 生成DICOM序列
    let mut files = generate_series(&opts)?;

    // 定向破坏声明长度
    if let Some(spec) = &args.corrupt_tag {
        let (group, element) = parse_tag_spec(spec)?;
        let new_length = args.corrupt_length.unwrap_or(u32::MAX);

        let mut patched = 0;
        for file in &files {
            if corrupt_declared_length(
                std::path::Path::new(&file.path),
                group,
                element,
                new_length,
            )? {
                patched += 1;
            }
        }

        if patched == 0 {
            warn!(
                "目标标签 ({:04X},{:04X}) 在所有生成文件中均未找到",
                group, element
            );
        } else {
            info!(
                "已破坏 {}/{} 个文件中标签 ({:04X},{:04X}) 的声明长度",
                patched,
                files.len(),
                group,
                element
            );
        }
    }

    // 重新解析校验
    if args.verify {
        let mut valid = 0;
        for file in &files {
            if verify_instance(&file.path)? {
                valid += 1;
            }
        }
        info!("文件校验: {}/{} 通过", valid, files.len());
    }

    // 组织层级并生成DICOMDIR
    if args.dicomdir {
        organize_into_dicomdir(&opts.output_dir, &mut files)?;
    }

    // 清单输出
    if args.manifest {
        let manifest_path = opts.output_dir.join("manifest.json");
        let json = serde_json::to_string_pretty(&files)?;
        std::fs::write(&manifest_path, json)?;
        info!("清单已写出: {:?}", manifest_path);
    }

    info!("完成：{} 个DICOM文件已就绪", files.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_options_defaults() {
        let args = Args::parse_from(["dcmgen"]);
        let opts = resolve_options(&args, FileConfig::default()).unwrap();

        assert_eq!(opts.num_images, 10);
        assert_eq!(opts.total_size, "50MB");
        assert_eq!(opts.modality, Modality::MR);
        assert_eq!(opts.num_studies, 1);
        assert!(opts.series_range.is_none());
    }

    #[test]
    fn test_resolve_options_cli_wins_over_file() {
        let args = Args::parse_from(["dcmgen", "--images", "20", "--modality", "CT"]);
        let file = FileConfig {
            images: Some(5),
            modality: Some("US".to_string()),
            size: Some("200MB".to_string()),
            ..Default::default()
        };

        let opts = resolve_options(&args, file).unwrap();
        assert_eq!(opts.num_images, 20);
        assert_eq!(opts.modality, Modality::CT);
        // 命令行未指定时取配置文件值
        assert_eq!(opts.total_size, "200MB");
    }

    #[test]
    fn test_resolve_options_parses_series_range() {
        let args = Args::parse_from(["dcmgen", "--series", "2-5"]);
        let opts = resolve_options(&args, FileConfig::default()).unwrap();
        assert_eq!(opts.series_range, Some(SeriesRange { min: 2, max: 5 }));
    }

    #[test]
    fn test_resolve_options_rejects_bad_modality() {
        let args = Args::parse_from(["dcmgen", "--modality", "XX"]);
        assert!(resolve_options(&args, FileConfig::default()).is_err());
    }

    #[test]
    fn test_resolve_options_rejects_bad_tag_flag() {
        let args = Args::parse_from(["dcmgen", "--tag", "NoSuchTag=1"]);
        assert!(resolve_options(&args, FileConfig::default()).is_err());
    }
}
