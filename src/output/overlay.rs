use crate::detection::types::{Direction, Hand};
use ab_glyph::{FontVec, PxScale};
use anyhow::{anyhow, Context, Result};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

const TEXT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const FONT_SIZE: f32 = 18.0;
const TEXT_MARGIN_X: i32 = 3;
// Top offsets of the two status lines, measured up from the bottom edge
const TYPE_LINE_FROM_BOTTOM: i32 = 48;
const LOCATION_LINE_FROM_BOTTOM: i32 = 24;

/// Renders detection results onto output frames: the two status text lines
/// near the bottom-left, the hand's bounding box, and a movement direction
/// icon composited into the top-left corner.
pub struct OverlayRenderer {
    font: FontVec,
    idle_icon: RgbImage,
    still_icon: RgbImage,
    arrow_icon: RgbImage,
}

impl OverlayRenderer {
    /// Load the overlay font and the three direction icons. A missing asset
    /// is a startup failure, not a per-frame one.
    pub fn load(font_path: &Path, assets_dir: &Path) -> Result<Self> {
        let font_data = std::fs::read(font_path)
            .with_context(|| format!("Failed to read overlay font at {}", font_path.display()))?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| anyhow!("Invalid font file at {}", font_path.display()))?;

        let load_icon = |name: &str| -> Result<RgbImage> {
            let path = assets_dir.join(name);
            let icon = image::open(&path)
                .with_context(|| format!("Failed to load overlay icon at {}", path.display()))?;
            Ok(icon.into_rgb8())
        };

        Ok(Self {
            font,
            idle_icon: load_icon("none.png")?,
            still_icon: load_icon("stay.png")?,
            arrow_icon: load_icon("arrow.png")?,
        })
    }

    /// Annotate a frame with the results of the latest analysis.
    pub fn annotate(
        &self,
        frame: &mut RgbImage,
        hand: &Hand,
        bbox: Option<Rect>,
        direction: Direction,
    ) {
        self.draw_text(frame, &format_hand_type(hand.fingers), TYPE_LINE_FROM_BOTTOM);
        self.draw_text(
            frame,
            &format_hand_location(hand.location),
            LOCATION_LINE_FROM_BOTTOM,
        );

        let icon = self.direction_icon(direction);
        imageops::replace(frame, &icon, 0, 0);

        if hand.is_detected() {
            if let Some(bbox) = bbox {
                draw_box(frame, bbox);
            }
        }
    }

    fn draw_text(&self, frame: &mut RgbImage, text: &str, from_bottom: i32) {
        let y = (frame.height() as i32 - from_bottom).max(0);
        draw_text_mut(
            frame,
            TEXT_COLOR,
            TEXT_MARGIN_X,
            y,
            PxScale::from(FONT_SIZE),
            &self.font,
            text,
        );
    }

    fn direction_icon(&self, direction: Direction) -> RgbImage {
        match direction {
            Direction::NoHand => self.idle_icon.clone(),
            Direction::Still => self.still_icon.clone(),
            _ => oriented_arrow(&self.arrow_icon, direction),
        }
    }
}

/// Rotate the right-pointing arrow icon to match the movement direction.
fn oriented_arrow(arrow: &RgbImage, direction: Direction) -> RgbImage {
    match direction {
        Direction::Down => imageops::rotate90(arrow),
        Direction::Up => imageops::rotate270(arrow),
        Direction::Left => imageops::rotate180(arrow),
        _ => arrow.clone(),
    }
}

/// Draw a 2-pixel hollow rectangle around the detected hand.
fn draw_box(frame: &mut RgbImage, bbox: Rect) {
    draw_hollow_rect_mut(frame, bbox, BOX_COLOR);
    if bbox.width() > 2 && bbox.height() > 2 {
        let inner =
            Rect::at(bbox.left() + 1, bbox.top() + 1).of_size(bbox.width() - 2, bbox.height() - 2);
        draw_hollow_rect_mut(frame, inner, BOX_COLOR);
    }
}

fn format_hand_type(fingers: i32) -> String {
    let label = match fingers {
        1 => "1 Finger Up".to_string(),
        2..=5 => format!("{} Fingers Up", fingers),
        _ => "No Hand Detected".to_string(),
    };
    format!("Hand Type: {}", label)
}

fn format_hand_location(location: (i32, i32)) -> String {
    format!("Hand Location: ({}, {})", location.0, location.1)
}
