use super::{VideoError, VideoSink, VideoSource};
use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Video source backed by a directory of image files.
///
/// Frames play back in file-name order, so a `frame_000001.png` style naming
/// scheme keeps the original sequence. Every frame must share the dimensions
/// of the first one.
pub struct ImageSequenceSource {
    frames: Vec<PathBuf>,
    cursor: usize,
    width: u32,
    height: u32,
}

impl ImageSequenceSource {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, VideoError> {
        let dir = dir.as_ref();

        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if is_frame_file(&path) {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            return Err(VideoError::EmptySource(dir.display().to_string()));
        }

        // Probe dimensions from the first frame
        let first = ImageReader::open(&frames[0])?.decode()?.into_rgb8();
        let (width, height) = first.dimensions();

        tracing::info!(
            "Opened image sequence at {}: {} frames, {}x{}",
            dir.display(),
            frames.len(),
            width,
            height
        );

        Ok(Self {
            frames,
            cursor: 0,
            width,
            height,
        })
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl VideoSource for ImageSequenceSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, VideoError> {
        let Some(path) = self.frames.get(self.cursor) else {
            return Ok(None);
        };

        let frame = ImageReader::open(path)?.decode()?.into_rgb8();
        if frame.dimensions() != (self.width, self.height) {
            return Err(VideoError::FrameSizeMismatch {
                expected: (self.width, self.height),
                actual: frame.dimensions(),
            });
        }

        self.cursor += 1;
        Ok(Some(frame))
    }

    fn rewind(&mut self) -> Result<(), VideoError> {
        self.cursor = 0;
        Ok(())
    }
}

/// Video sink writing frames as numbered PNG files.
pub struct ImageSequenceSink {
    dir: PathBuf,
    next_index: u64,
}

impl ImageSequenceSink {
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self, VideoError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        tracing::info!("Writing output frames to {}", dir.display());

        Ok(Self { dir, next_index: 1 })
    }
}

impl VideoSink for ImageSequenceSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoError> {
        let path = self.dir.join(format!("frame_{:06}.png", self.next_index));
        frame.save(&path)?;
        self.next_index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("handtrack_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn recognizes_frame_files() {
        assert!(is_frame_file(Path::new("frames/frame_000001.png")));
        assert!(is_frame_file(Path::new("frames/photo.JPG")));
        assert!(!is_frame_file(Path::new("frames/notes.txt")));
        assert!(!is_frame_file(Path::new("frames/no_extension")));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = temp_dir("empty");
        let result = ImageSequenceSource::open(&dir);
        assert!(matches!(result, Err(VideoError::EmptySource(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn sink_and_source_round_trip_in_order() {
        let dir = temp_dir("roundtrip");

        let mut sink = ImageSequenceSink::create(&dir).unwrap();
        sink.write_frame(&RgbImage::from_pixel(8, 6, Rgb([10, 20, 30])))
            .unwrap();
        sink.write_frame(&RgbImage::from_pixel(8, 6, Rgb([40, 50, 60])))
            .unwrap();

        let mut source = ImageSequenceSource::open(&dir).unwrap();
        assert_eq!(source.dimensions(), (8, 6));
        assert_eq!(source.frame_count(), 2);

        let first = source.read_frame().unwrap().unwrap();
        assert_eq!(first.get_pixel(0, 0), &Rgb([10, 20, 30]));
        let second = source.read_frame().unwrap().unwrap();
        assert_eq!(second.get_pixel(0, 0), &Rgb([40, 50, 60]));
        assert!(source.read_frame().unwrap().is_none());

        source.rewind().unwrap();
        let again = source.read_frame().unwrap().unwrap();
        assert_eq!(again.get_pixel(0, 0), &Rgb([10, 20, 30]));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
