mod image_sequence;

pub use image_sequence::{ImageSequenceSink, ImageSequenceSource};

use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("no decodable frames found in {0}")]
    EmptySource(String),
    #[error("frame size {actual:?} does not match video size {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Trait for sequential frame sources
pub trait VideoSource {
    /// Frame dimensions, fixed for the whole sequence
    fn dimensions(&self) -> (u32, u32);

    /// Total number of frames in the sequence
    fn frame_count(&self) -> u32;

    /// Decode the next frame; `Ok(None)` signals end of stream
    fn read_frame(&mut self) -> Result<Option<RgbImage>, VideoError>;

    /// Seek back to the first frame
    fn rewind(&mut self) -> Result<(), VideoError>;
}

/// Trait for ordered frame consumers
pub trait VideoSink {
    /// Write a frame to the output
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoError>;
}

/// In-memory frame sequence used to drive the pipeline in tests.
#[cfg(test)]
pub(crate) struct MemorySource {
    frames: Vec<RgbImage>,
    cursor: usize,
}

#[cfg(test)]
impl MemorySource {
    pub(crate) fn new(frames: Vec<RgbImage>) -> Self {
        assert!(!frames.is_empty(), "a memory source needs at least one frame");
        Self { frames, cursor: 0 }
    }
}

#[cfg(test)]
impl VideoSource for MemorySource {
    fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }

    fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, VideoError> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> Result<(), VideoError> {
        self.cursor = 0;
        Ok(())
    }
}
