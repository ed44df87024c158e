//! 实例标注烧录
//!
//! 在像素数据上烧录 "File N/M" 文字，白色字体配深色描边以保证在
//! 随机背景上可读。字形来自内嵌的5x7点阵字表（与Go基础点阵字体
//! 同一做法），像素值始终保持在模态配置的取值区间内。

use dcmgen_core::{DcmGenError, PixelConfig, Result};

/// 字形宽度（位）
const GLYPH_WIDTH: usize = 5;
/// 字形高度（行）
const GLYPH_HEIGHT: usize = 7;
/// 字形间距（像素列）
const GLYPH_SPACING: usize = 1;

/// 5x7点阵字形，每行低5位有效
fn glyph_rows(c: char) -> [u8; GLYPH_HEIGHT] {
    match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '/' => [0x01, 0x02, 0x02, 0x04, 0x08, 0x08, 0x10],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        // 未收录的字符渲染为空白
        _ => [0x00; GLYPH_HEIGHT],
    }
}

/// 在像素数据上烧录 "File N/M" 标注
///
/// 文字水平居中、距顶部5%处绘制。先以最小像素值画描边，再以最大
/// 像素值画正文。像素切片长度与宽高不符时返回错误。
pub fn burn_instance_label(
    pixels: &mut [u16],
    width: usize,
    height: usize,
    instance_num: usize,
    total: usize,
    config: &PixelConfig,
) -> Result<()> {
    if pixels.len() != width * height {
        return Err(DcmGenError::Pixel(format!(
            "像素切片长度 {} 与尺寸 {}x{} 不符",
            pixels.len(),
            width,
            height
        )));
    }

    let text = format!("File {}/{}", instance_num, total);

    // 大图上按比例放大字形
    let scale = (height / 256).max(1);

    let text_width = text.chars().count() * (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    let x = width.saturating_sub(text_width) / 2;
    let y = (height as f64 * 0.05) as usize;

    // 深色描边保证可读性
    let outline = 2 * scale as isize;
    for dx in -outline..=outline {
        for dy in -outline..=outline {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text(
                pixels, width, height, &text, x as isize + dx, y as isize + dy, scale,
                config.min_value,
            );
        }
    }

    // 白色正文
    draw_text(
        pixels,
        width,
        height,
        &text,
        x as isize,
        y as isize,
        scale,
        config.max_value,
    );

    Ok(())
}

/// 以给定像素值绘制一行文字，越界部分静默裁剪
#[allow(clippy::too_many_arguments)]
fn draw_text(
    pixels: &mut [u16],
    width: usize,
    height: usize,
    text: &str,
    origin_x: isize,
    origin_y: isize,
    scale: usize,
    value: u16,
) {
    let mut pen_x = origin_x;

    for c in text.chars() {
        let rows = glyph_rows(c);
        for (row_idx, row) in rows.iter().enumerate() {
            for bit in 0..GLYPH_WIDTH {
                if row & (1 << (GLYPH_WIDTH - 1 - bit)) == 0 {
                    continue;
                }
                // 放大后的像素块
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = pen_x + (bit * scale + sx) as isize;
                        let py = origin_y + (row_idx * scale + sy) as isize;
                        if px < 0 || py < 0 {
                            continue;
                        }
                        let (px, py) = (px as usize, py as usize);
                        if px >= width || py >= height {
                            continue;
                        }
                        pixels[py * width + px] = value;
                    }
                }
            }
        }
        pen_x += ((GLYPH_WIDTH + GLYPH_SPACING) * scale) as isize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PixelConfig {
        PixelConfig {
            bits_allocated: 16,
            bits_stored: 12,
            high_bit: 11,
            pixel_representation: 0,
            min_value: 0,
            max_value: 4095,
            base_value: 2048,
        }
    }

    #[test]
    fn test_rejects_mismatched_dimensions() {
        let mut pixels = vec![0u16; 100];
        let err = burn_instance_label(&mut pixels, 128, 128, 1, 10, &test_config());
        assert!(err.is_err());
    }

    #[test]
    fn test_label_modifies_pixels() {
        let config = test_config();
        let mut pixels = vec![config.base_value; 128 * 128];
        let before = pixels.clone();

        burn_instance_label(&mut pixels, 128, 128, 3, 10, &config).unwrap();
        assert_ne!(pixels, before);

        // 正文与描边像素都应出现
        assert!(pixels.iter().any(|&p| p == config.max_value));
        assert!(pixels.iter().any(|&p| p == config.min_value));
    }

    #[test]
    fn test_label_keeps_values_in_range() {
        let config = PixelConfig {
            min_value: 0,
            max_value: 255,
            base_value: 128,
            bits_allocated: 8,
            bits_stored: 8,
            high_bit: 7,
            pixel_representation: 0,
        };
        let mut pixels = vec![128u16; 256 * 256];
        burn_instance_label(&mut pixels, 256, 256, 99, 100, &config).unwrap();
        assert!(pixels.iter().all(|&p| p <= 255));
    }

    #[test]
    fn test_label_is_deterministic() {
        let config = test_config();
        let mut a = vec![config.base_value; 128 * 128];
        let mut b = vec![config.base_value; 128 * 128];

        burn_instance_label(&mut a, 128, 128, 5, 20, &config).unwrap();
        burn_instance_label(&mut b, 128, 128, 5, 20, &config).unwrap();
        assert_eq!(a, b);
    }
}
