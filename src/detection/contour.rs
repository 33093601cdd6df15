use crate::config::PipelineConfig;
use image::GrayImage;
use imageproc::contours::{find_contours_with_threshold, Contour};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Trace every closed contour in the segmented mask.
///
/// The mask is binarized at `contour_binarize_threshold` first so stray
/// mid-gray values cannot spawn phantom borders.
pub fn find_mask_contours(mask: &GrayImage, config: &PipelineConfig) -> Vec<Contour<i32>> {
    find_contours_with_threshold(mask, config.contour_binarize_threshold)
}

/// Enclosed area of a contour via the shoelace formula. Orientation does not
/// matter; the absolute value is taken.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut doubled = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        doubled += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    doubled.abs() as f64 / 2.0
}

/// Axis-aligned bounding box of a contour.
pub fn bounding_rect(points: &[Point<i32>]) -> Rect {
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32)
}

/// Sort contours ascending by enclosed area. The sort is stable, so equal
/// areas keep their trace order.
pub fn sort_contours_by_area(contours: &mut [Contour<i32>]) {
    contours.sort_by(|a, b| contour_area(&a.points).total_cmp(&contour_area(&b.points)));
}

/// Select the n-th biggest contour (n starts at 1) from an area-ascending
/// list, rejecting anything smaller than the scene-relative minimum.
///
/// Returns the contour index and its bounding box, or `None` once the
/// remaining candidates fall under the area floor.
pub fn nth_biggest_contour(
    contours: &[Contour<i32>],
    n: usize,
    frame_area: u32,
    config: &PipelineConfig,
) -> Option<(usize, Rect)> {
    if n == 0 || n > contours.len() {
        return None;
    }

    let index = contours.len() - n;
    let min_area = frame_area as f64 * config.min_contour_area_percent;
    let points = &contours[index].points;

    if contour_area(points) >= min_area {
        Some((index, bounding_rect(points)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;

    fn square(x0: i32, y0: i32, side: i32) -> Vec<Point<i32>> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ]
    }

    fn mask_with_squares(squares: &[(i32, i32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(100, 100);
        for &(x, y, side) in squares {
            draw_filled_rect_mut(
                &mut mask,
                Rect::at(x, y).of_size(side, side),
                Luma([255u8]),
            );
        }
        mask
    }

    #[test]
    fn shoelace_area_of_a_square() {
        assert_eq!(contour_area(&square(0, 0, 10)), 100.0);
        // Reversed orientation gives the same magnitude
        let mut reversed = square(0, 0, 10);
        reversed.reverse();
        assert_eq!(contour_area(&reversed), 100.0);
    }

    #[test]
    fn degenerate_contours_have_zero_area() {
        assert_eq!(contour_area(&[]), 0.0);
        assert_eq!(contour_area(&[Point::new(1, 1), Point::new(2, 2)]), 0.0);
    }

    #[test]
    fn bounding_rect_spans_the_extremes() {
        let rect = bounding_rect(&square(5, 8, 10));
        assert_eq!((rect.left(), rect.top()), (5, 8));
        assert_eq!((rect.width(), rect.height()), (11, 11));
    }

    #[test]
    fn nth_biggest_walks_down_from_the_largest() {
        let config = PipelineConfig::default();
        let mask = mask_with_squares(&[(10, 10, 40), (60, 60, 30)]);

        let mut contours = find_mask_contours(&mask, &config);
        assert_eq!(contours.len(), 2);
        sort_contours_by_area(&mut contours);

        // 100x100 frame, 4% floor = 400 px^2: both squares qualify.
        let (_, biggest) = nth_biggest_contour(&contours, 1, 100 * 100, &config).unwrap();
        assert_eq!((biggest.left(), biggest.top()), (10, 10));
        assert_eq!((biggest.width(), biggest.height()), (40, 40));

        let (_, second) = nth_biggest_contour(&contours, 2, 100 * 100, &config).unwrap();
        assert_eq!((second.left(), second.top()), (60, 60));

        assert!(nth_biggest_contour(&contours, 3, 100 * 100, &config).is_none());
    }

    #[test]
    fn contours_under_the_area_floor_are_rejected() {
        let config = PipelineConfig::default();
        let mask = mask_with_squares(&[(10, 10, 5)]);

        let mut contours = find_mask_contours(&mask, &config);
        sort_contours_by_area(&mut contours);

        // A 5x5 blob is nowhere near 4% of a 100x100 frame.
        assert!(nth_biggest_contour(&contours, 1, 100 * 100, &config).is_none());
    }

    #[test]
    fn out_of_range_n_is_rejected() {
        let config = PipelineConfig::default();
        let contours: Vec<Contour<i32>> = Vec::new();
        assert!(nth_biggest_contour(&contours, 1, 100, &config).is_none());
    }
}
