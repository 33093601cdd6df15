use super::contour;
use super::types::Hand;
use crate::config::PipelineConfig;
use image::{imageops, GrayImage, Luma};
use imageproc::contours::Contour;
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Search the ranked contours for one whose silhouette classifies as a hand.
///
/// Candidates are tried largest first. Each is rendered as a filled solid
/// mask, cropped to its bounding box and classified by counting extrema on
/// its top-edge profile. The first success wins; exhaustion yields the
/// sentinel hand and no box.
pub fn search_for_hand(
    mask: &GrayImage,
    contours: &[Contour<i32>],
    config: &PipelineConfig,
) -> (Hand, Option<Rect>) {
    let _span = tracing::debug_span!("search_for_hand").entered();

    let frame_area = mask.width() * mask.height();
    for n in 1..=contours.len() {
        let Some((index, bbox)) = contour::nth_biggest_contour(contours, n, frame_area, config)
        else {
            // Candidates are area-ordered, so everything after this one is
            // under the floor too.
            break;
        };

        let cropped = render_candidate(mask.width(), mask.height(), &contours[index].points, bbox);
        let profile = trace_top_edge(&cropped, config.edge_column_stride);
        let middle = (cropped.height() / 2) as i32;

        if let Some(fingers) = count_raised_fingers(&profile, middle) {
            tracing::debug!(
                "contour {} at ({}, {}) classified as {} finger(s)",
                index,
                bbox.left(),
                bbox.top(),
                fingers
            );
            return (Hand::new((bbox.left(), bbox.top()), fingers as i32), Some(bbox));
        }
    }

    (Hand::NOT_FOUND, None)
}

/// Render a contour as a solid silhouette on a blank canvas and crop it to
/// its bounding box.
fn render_candidate(width: u32, height: u32, points: &[Point<i32>], bbox: Rect) -> GrayImage {
    let mut canvas = GrayImage::new(width, height);
    if points.len() > 2 {
        // draw_polygon_mut wants an open path
        let open = if points.first() == points.last() {
            &points[..points.len() - 1]
        } else {
            points
        };
        draw_polygon_mut(&mut canvas, open, Luma([255u8]));
    }
    imageops::crop_imm(
        &canvas,
        bbox.left().max(0) as u32,
        bbox.top().max(0) as u32,
        bbox.width(),
        bbox.height(),
    )
    .to_image()
}

/// Record the first foreground pixel in every `stride`-th column, scanning
/// top to bottom. Columns with no foreground pixel contribute nothing, so
/// the profile can come out shorter than the stride implies.
pub fn trace_top_edge(object: &GrayImage, stride: u32) -> Vec<Point<i32>> {
    let stride = stride.max(1);
    let mut points = Vec::new();

    let mut x = 0;
    while x < object.width() {
        for y in 0..object.height() {
            if object.get_pixel(x, y)[0] == 255 {
                points.push(Point::new(x as i32, y as i32));
                break;
            }
        }
        x += stride;
    }
    points
}

/// Neighbor lookups for one profile index, with single-point plateaus to
/// either side already stepped over.
#[derive(Debug, PartialEq, Eq)]
struct ExtremaWindow {
    prev: usize,
    next: usize,
    /// True when a plateau widened the window; the walk then advances an
    /// extra step so the flat segment is not counted twice.
    skip: bool,
}

/// Compute the comparison window for index `i`, widening it across a tie
/// with either immediate neighbor. Returns `None` when the right extension
/// would run off the end of the profile, which ends the walk.
fn extrema_window(points: &[Point<i32>], i: usize) -> Option<ExtremaWindow> {
    let mut prev = i - 1;
    let mut next = i + 1;
    let mut skip = false;

    if points[next].y == points[i].y {
        if next + 1 < points.len() {
            next += 1;
            skip = true;
        } else {
            return None;
        }
    }
    if points[prev].y == points[i].y && prev > 0 {
        prev -= 1;
        skip = true;
    }

    Some(ExtremaWindow { prev, next, skip })
}

/// Count raised fingers from a top-edge profile by finding alternating local
/// minima (upward spikes, in screen coordinates) and maxima over the
/// plateau-adjusted windows, keeping only extrema above the vertical
/// midpoint of the cropped region.
///
/// Decision table: exactly one qualifying minimum is one finger; otherwise
/// both counts must land in [1, 5], with equal counts meaning minima + 1
/// fingers and a one-extra-minimum pattern meaning minima fingers. Anything
/// else does not look like a hand and returns `None`.
pub fn count_raised_fingers(points: &[Point<i32>], middle: i32) -> Option<u32> {
    if points.len() < 3 {
        return None;
    }

    let mut minima: Vec<usize> = Vec::new();
    let mut maxima: Vec<usize> = Vec::new();

    let mut i = 1;
    while i + 1 < points.len() {
        let Some(window) = extrema_window(points, i) else {
            break;
        };

        let prev_y = points[window.prev].y;
        let here_y = points[i].y;
        let next_y = points[window.next].y;

        if prev_y > here_y && here_y < next_y {
            minima.push(i);
        } else if prev_y < here_y && here_y > next_y {
            maxima.push(i);
        }

        i += if window.skip { 2 } else { 1 };
    }

    // A flat pair at either end hides an extremum from the walk above;
    // classify it against the next point inward.
    let len = points.len();
    if points[len - 1].y == points[len - 2].y {
        if points[len - 2].y < points[len - 3].y {
            minima.push(len - 2);
        } else {
            maxima.push(len - 2);
        }
    }
    if points[0].y == points[1].y {
        if points[1].y < points[2].y {
            minima.push(1);
        } else {
            maxima.push(1);
        }
    }

    // Fingers live in the upper part of the crop; in screen coordinates
    // that means rows numerically under the midpoint value.
    let qualifying_minima = minima.iter().filter(|&&idx| points[idx].y < middle).count();
    let qualifying_maxima = maxima.iter().filter(|&&idx| points[idx].y < middle).count();

    if qualifying_minima == 1 {
        return Some(1);
    }
    if (1..=5).contains(&qualifying_minima) && (1..=5).contains(&qualifying_maxima) {
        if qualifying_minima == qualifying_maxima {
            return Some(qualifying_minima as u32 + 1);
        }
        if qualifying_minima == qualifying_maxima + 1 {
            return Some(qualifying_minima as u32);
        }
    }
    None
}
