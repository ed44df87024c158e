//! # DCMGen Codec
//!
//! 显式VR Little Endian数据元素的底层字节编码与破坏（corruption）支持。
//!
//! 本模块工作在数据集对象模型之下，直接操作原始字节：
//! - [`element`]：单个数据元素的TLV二进制编码/解码；
//! - [`corruption`]：按字节模式定位已编码元素并改写其声明长度字段，
//!   用于生成结构上不一致的畸形文件做负面测试。

pub mod corruption;
pub mod element;
pub mod vr;

pub use corruption::{generate_malformed_placeholders, patch_tag_value_length};
pub use element::{decode_element, encode_element, RawElement, Tag};
pub use vr::is_long_form;
