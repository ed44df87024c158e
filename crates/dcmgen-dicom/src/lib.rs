//! # DCMGen DICOM
//!
//! 数据集装配与文件产出：元数据生成、Explicit VR LE文件写出、
//! PT/ST/SE层级组织与DICOMDIR索引、以及面向负面测试的文件级
//! 破坏入口。

pub mod corruption;
pub mod dicomdir;
pub mod generator;
pub mod metadata;
pub mod tag_overrides;
pub mod writer;

pub use generator::{calculate_dimensions, generate_series, GeneratorOptions};
pub use metadata::{generate_metadata, MetadataOptions};
pub use tag_overrides::{parse_tag_flags, ParsedTags, TagScope};
