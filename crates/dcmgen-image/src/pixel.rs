//! 合成像素数据生成

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dcmgen_core::PixelConfig;

/// 为单幅图像生成随机像素数据
///
/// 像素值均匀分布在模态像素配置的 [min_value, max_value] 区间内。
/// 相同的种子总是产生相同的像素序列。
pub fn generate_pixels(width: usize, height: usize, seed: u64, config: &PixelConfig) -> Vec<u16> {
    let mut rng = StdRng::seed_from_u64(seed);

    let size = width * height;
    let mut pixels = Vec::with_capacity(size);
    for _ in 0..size {
        pixels.push(rng.gen_range(config.min_value..=config.max_value));
    }

    pixels
}
