use crate::config::PipelineConfig;
use image::{Rgb, RgbImage};
use imageproc::filter::{gaussian_blur_f32, median_filter};

/// Normalize a frame so its tone statistics line up with the background
/// model: median blur, contrast stretch, Gaussian blur, brightness lift and
/// saturation boost, in that fixed order. Mutates the frame in place.
///
/// The live frame and the background model must both go through this with
/// the same config, otherwise the segmenter compares apples to oranges.
pub fn prepare_frame(frame: &mut RgbImage, config: &PipelineConfig) {
    let _span = tracing::debug_span!("prepare_frame").entered();

    let radius = config.median_blur_size / 2;
    if radius > 0 {
        *frame = median_filter(frame, radius, radius);
    }

    modify_contrast(frame, config.contrast_factor);

    if config.gaussian_blur_sigma > 0.0 {
        *frame = gaussian_blur_f32(frame, config.gaussian_blur_sigma);
    }

    modify_brightness(frame, config.brightness_offset);
    modify_saturation(frame, config.saturation_boost);
}

/// Clamp a computed channel value into the valid byte range, truncating
/// toward zero like the integer math it replaces.
fn clamp_channel(value: f64) -> u8 {
    value.trunc().clamp(0.0, 255.0) as u8
}

/// Stretch contrast linearly about the per-channel frame mean:
/// `new = mean - (mean - old) * factor`, clamped to [0, 255].
///
/// A factor above 1.0 pushes channel values away from the mean; below 1.0
/// pulls them toward it.
pub fn modify_contrast(frame: &mut RgbImage, factor: f64) {
    let total = frame.width() as f64 * frame.height() as f64;

    let mut mean = [0.0f64; 3];
    for Rgb(channels) in frame.pixels() {
        for (sum, &value) in mean.iter_mut().zip(channels.iter()) {
            *sum += value as f64;
        }
    }
    for sum in mean.iter_mut() {
        *sum /= total;
    }

    for Rgb(channels) in frame.pixels_mut() {
        for (c, value) in channels.iter_mut().enumerate() {
            let offset = mean[c] - *value as f64;
            *value = clamp_channel(mean[c] - offset * factor);
        }
    }
}

/// Add a uniform offset to every channel of every pixel.
pub fn modify_brightness(frame: &mut RgbImage, offset: i32) {
    for Rgb(channels) in frame.pixels_mut() {
        for value in channels.iter_mut() {
            *value = clamp_channel(*value as f64 + offset as f64);
        }
    }
}

/// Boost saturation by a fixed delta in HSV space, leaving hue and value
/// untouched.
pub fn modify_saturation(frame: &mut RgbImage, delta: i32) {
    for Rgb(channels) in frame.pixels_mut() {
        let (h, s, v) = rgb_to_hsv(channels[0], channels[1], channels[2]);
        let boosted = clamp_channel(s as f64 + delta as f64);
        *channels = hsv_to_rgb(h, boosted, v);
    }
}

/// Convert an RGB sample to hue in degrees plus byte-scaled saturation and
/// value.
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, u8, u8) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, (s * 255.0).round() as u8, (max * 255.0).round() as u8)
}

/// Inverse of `rgb_to_hsv`.
fn hsv_to_rgb(h: f32, s: u8, v: u8) -> [u8; 3] {
    let s = s as f32 / 255.0;
    let v = v as f32 / 255.0;

    let c = v * s;
    let hp = (h / 60.0) % 6.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match hp.floor() as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = v - c;
    [
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    ]
}
