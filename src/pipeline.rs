use crate::config::PipelineConfig;
use crate::detection::types::{Direction, Hand};
use crate::detection::{classifier, contour, motion};
use crate::segmentation::{background, normalize, remover};
use crate::video::{VideoError, VideoSource};
use image::RgbImage;
use imageproc::rect::Rect;
use rand::Rng;

/// Results of analyzing a single frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameAnalysis {
    pub hand: Hand,
    pub bounding_box: Option<Rect>,
    pub direction: Direction,
}

/// The per-frame detection pipeline and its single-frame lookback.
///
/// Owns the normalized background model and the previous frame's hand;
/// every other buffer is local to one `analyze` call, so there is no shared
/// mutable state between frames.
pub struct HandPipeline {
    config: PipelineConfig,
    background: RgbImage,
    previous_hand: Hand,
}

impl HandPipeline {
    /// Build the background model from the source and normalize it the same
    /// way live frames are normalized. Leaves the source rewound to frame 0.
    pub fn bootstrap<S, R>(
        source: &mut S,
        config: PipelineConfig,
        rng: &mut R,
    ) -> Result<Self, VideoError>
    where
        S: VideoSource + ?Sized,
        R: Rng + ?Sized,
    {
        let mut model = background::estimate_background(source, &config, rng)?;
        normalize::prepare_frame(&mut model, &config);
        Ok(Self::with_background(model, config))
    }

    /// Wrap an already-normalized background model.
    pub fn with_background(background: RgbImage, config: PipelineConfig) -> Self {
        Self {
            config,
            background,
            previous_hand: Hand::NOT_FOUND,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run normalize, segment, rank, classify and track on one frame.
    ///
    /// A frame with no classifiable hand is not an error; it comes back as
    /// the sentinel hand with no bounding box.
    pub fn analyze(&mut self, frame: &RgbImage) -> FrameAnalysis {
        let _span = tracing::debug_span!("analyze").entered();

        let mut normalized = frame.clone();
        normalize::prepare_frame(&mut normalized, &self.config);

        let mask = remover::remove_background(&normalized, &self.background, &self.config);

        let mut contours = contour::find_mask_contours(&mask, &self.config);
        contour::sort_contours_by_area(&mut contours);

        let (hand, bounding_box) = classifier::search_for_hand(&mask, &contours, &self.config);
        let direction = motion::movement_direction(&hand, &self.previous_hand, &self.config);

        self.previous_hand = hand;

        FrameAnalysis {
            hand,
            bounding_box,
            direction,
        }
    }
}
