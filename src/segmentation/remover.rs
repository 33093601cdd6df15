use crate::config::PipelineConfig;
use image::{GrayImage, Luma, RgbImage};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Segment a normalized live frame against the normalized background model
/// into a binary silhouette mask.
///
/// A pixel whose channels all sit within `background_threshold` of the
/// background is background. A differing pixel is kept as foreground only
/// when it looks skin-like: red at or above `red_color_threshold`, or red
/// below it but strictly dominating both green and blue. Differing pixels
/// that fail the color gate (shadows, non-skin motion) are suppressed to
/// background on purpose.
pub fn remove_background(
    live: &RgbImage,
    background: &RgbImage,
    config: &PipelineConfig,
) -> GrayImage {
    let _span = tracing::debug_span!("remove_background").entered();

    let threshold = config.background_threshold as i32;

    GrayImage::from_fn(live.width(), live.height(), |x, y| {
        let front = live.get_pixel(x, y);
        let back = background.get_pixel(x, y);

        let similar = front
            .0
            .iter()
            .zip(back.0.iter())
            .all(|(&f, &b)| (f as i32 - b as i32).abs() < threshold);
        if similar {
            return Luma([BACKGROUND]);
        }

        let [r, g, b] = front.0;
        let skin_like = r >= config.red_color_threshold
            || (r < config.red_color_threshold && r > g && r > b);

        if skin_like {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn segment_single_pixel(live: [u8; 3], back: [u8; 3]) -> u8 {
        let live = RgbImage::from_pixel(1, 1, Rgb(live));
        let back = RgbImage::from_pixel(1, 1, Rgb(back));
        let mask = remove_background(&live, &back, &PipelineConfig::default());
        mask.get_pixel(0, 0)[0]
    }

    #[test]
    fn near_identical_pixels_are_background() {
        assert_eq!(segment_single_pixel([100, 100, 100], [110, 95, 105]), BACKGROUND);
    }

    #[test]
    fn bright_red_difference_is_foreground() {
        assert_eq!(segment_single_pixel([200, 80, 60], [100, 100, 100]), FOREGROUND);
    }

    #[test]
    fn red_dominant_difference_below_threshold_is_foreground() {
        // Red under 190 but strictly above green and blue
        assert_eq!(segment_single_pixel([150, 100, 90], [50, 50, 50]), FOREGROUND);
    }

    #[test]
    fn non_skin_difference_is_suppressed() {
        // Differs from the background but green dominates red
        assert_eq!(segment_single_pixel([80, 180, 80], [100, 100, 100]), BACKGROUND);
    }

    #[test]
    fn one_channel_over_threshold_breaks_similarity() {
        // Only blue differs; the pixel no longer matches the background, and
        // the red-dominance gate then decides.
        assert_eq!(segment_single_pixel([100, 90, 180], [100, 100, 100]), BACKGROUND);
        assert_eq!(segment_single_pixel([120, 90, 60], [100, 100, 100]), FOREGROUND);
    }
}
