//! # DCMGen Image
//!
//! 合成像素数据的生成与实例标注的烧录。

pub mod overlay;
pub mod pixel;

pub use overlay::burn_instance_label;
pub use pixel::generate_pixels;
