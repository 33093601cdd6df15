use crate::config::PipelineConfig;
use crate::video::{VideoError, VideoSource};
use image::{Rgb, RgbImage};
use ndarray::Array3;
use rand::Rng;

/// Estimate the empty-scene background by averaging randomly sampled frames.
///
/// Picks `background_sample_frames` distinct frame indices (capped at the
/// frame count, so short clips cannot stall the sampler), accumulates
/// per-pixel channel sums in a single decode pass, and averages with integer
/// truncation. The source is rewound afterwards so playback restarts at
/// frame 0.
pub fn estimate_background<S, R>(
    source: &mut S,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<RgbImage, VideoError>
where
    S: VideoSource + ?Sized,
    R: Rng + ?Sized,
{
    let (width, height) = source.dimensions();
    let frame_count = source.frame_count();
    let sampled = sample_frame_indices(rng, frame_count, config.background_sample_frames);

    tracing::info!(
        "Averaging {} of {} frames into the background model",
        sampled.len(),
        frame_count
    );

    let mut sums = Array3::<u64>::zeros((height as usize, width as usize, 3));
    let mut index = 0u32;
    while let Some(frame) = source.read_frame()? {
        if sampled.contains(&index) {
            for (x, y, pixel) in frame.enumerate_pixels() {
                for c in 0..3 {
                    sums[[y as usize, x as usize, c]] += pixel[c] as u64;
                }
            }
        }
        index += 1;
    }

    let divisor = sampled.len().max(1) as u64;
    let background = RgbImage::from_fn(width, height, |x, y| {
        let mut channels = [0u8; 3];
        for (c, value) in channels.iter_mut().enumerate() {
            *value = (sums[[y as usize, x as usize, c]] / divisor).min(255) as u8;
        }
        Rgb(channels)
    });

    source.rewind()?;
    Ok(background)
}

/// Pick `requested` distinct frame indices uniformly at random, capped at
/// `frame_count`.
pub fn sample_frame_indices<R>(rng: &mut R, frame_count: u32, requested: u32) -> Vec<u32>
where
    R: Rng + ?Sized,
{
    let amount = requested.min(frame_count) as usize;
    rand::seq::index::sample(rng, frame_count as usize, amount)
        .into_iter()
        .map(|i| i as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::MemorySource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampled_indices_are_distinct_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let indices = sample_frame_indices(&mut rng, 100, 30);
        assert_eq!(indices.len(), 30);
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 30);
        assert!(indices.iter().all(|&i| i < 100));
    }

    #[test]
    fn short_videos_cap_the_sample_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let indices = sample_frame_indices(&mut rng, 5, 30);
        assert_eq!(indices.len(), 5);
    }

    #[test]
    fn averaging_converges_to_the_dominant_color() {
        // Nine uniform frames plus one black outlier, all sampled: the
        // average stays within rounding of the uniform color.
        let mut frames = vec![RgbImage::from_pixel(6, 4, Rgb([100, 150, 200])); 9];
        frames.push(RgbImage::from_pixel(6, 4, Rgb([0, 0, 0])));
        let mut source = MemorySource::new(frames);

        let config = PipelineConfig {
            background_sample_frames: 30,
            ..PipelineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let background = estimate_background(&mut source, &config, &mut rng).unwrap();

        assert_eq!(background.dimensions(), (6, 4));
        // 9 * color / 10, truncated toward zero
        assert_eq!(background.get_pixel(0, 0), &Rgb([90, 135, 180]));
    }

    #[test]
    fn source_is_rewound_after_estimation() {
        let frames = vec![
            RgbImage::from_pixel(2, 2, Rgb([10, 10, 10])),
            RgbImage::from_pixel(2, 2, Rgb([20, 20, 20])),
        ];
        let mut source = MemorySource::new(frames);

        let config = PipelineConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        estimate_background(&mut source, &config, &mut rng).unwrap();

        let first = source.read_frame().unwrap().unwrap();
        assert_eq!(first.get_pixel(0, 0), &Rgb([10, 10, 10]));
    }

    #[test]
    fn subset_sampling_ignores_unsampled_frames() {
        // Ten uniform frames plus a pathological one; sample only two. With a
        // seeded RNG the result is deterministic, and whichever indices come
        // up, the average of any two uniform frames is the uniform color.
        let mut frames = vec![RgbImage::from_pixel(3, 3, Rgb([80, 80, 80])); 11];
        frames[10] = RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]));
        let mut source = MemorySource::new(frames);

        let config = PipelineConfig {
            background_sample_frames: 2,
            ..PipelineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let sampled = sample_frame_indices(&mut rng, 11, 2);

        let mut rng = StdRng::seed_from_u64(3);
        let background = estimate_background(&mut source, &config, &mut rng).unwrap();

        let expected = if sampled.contains(&10) {
            // (80 + 255) / 2, truncated
            Rgb([167, 167, 167])
        } else {
            Rgb([80, 80, 80])
        };
        assert_eq!(background.get_pixel(1, 1), &expected);
    }
}
