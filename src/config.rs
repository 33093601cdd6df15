/// Tunable parameters for every pipeline stage.
///
/// The defaults are fixed heuristics tuned for a single, mostly static
/// camera. Components take the config by reference so parameter sweeps and
/// tests can run the same code with different knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Median blur aperture in pixels (odd); 1 disables the filter
    pub median_blur_size: u32,
    /// Contrast stretch factor applied about the per-channel frame mean
    pub contrast_factor: f64,
    /// Gaussian blur sigma; 0.0 disables the filter
    pub gaussian_blur_sigma: f32,
    /// Uniform brightness offset added to every channel
    pub brightness_offset: i32,
    /// Saturation delta added in HSV space
    pub saturation_boost: i32,
    /// Number of random frames averaged into the background model
    pub background_sample_frames: u32,
    /// Per-channel absolute difference below which a pixel matches the background
    pub background_threshold: u8,
    /// Red level at or above which a differing pixel always counts as foreground.
    /// Below it, red must strictly dominate green and blue. This is a skin-tone
    /// policy, not a derived constant; tune it per deployment.
    pub red_color_threshold: u8,
    /// Binarization level applied before contour tracing
    pub contour_binarize_threshold: u8,
    /// Minimum contour area as a fraction of the frame area
    pub min_contour_area_percent: f64,
    /// Column stride used when tracing the silhouette top edge
    pub edge_column_stride: u32,
    /// Minimum dominant-axis displacement in pixels to count as movement
    pub movement_threshold: i32,
    /// Analyze every n-th frame; the rest replay the previous annotations
    pub skip_frames: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            median_blur_size: 7,
            contrast_factor: 1.1,
            gaussian_blur_sigma: 3.0,
            brightness_offset: 40,
            saturation_boost: 28,
            background_sample_frames: 30,
            background_threshold: 20,
            red_color_threshold: 190,
            contour_binarize_threshold: 90,
            min_contour_area_percent: 0.04,
            edge_column_stride: 5,
            movement_threshold: 11,
            skip_frames: 3,
        }
    }
}
