//! Freehand doodle strokes and the recorder that captures them.

use crate::input::clamp_to_bounds;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Default pencil width in layout pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Minimum number of points for a stroke to be kept.
pub const MIN_STROKE_POINTS: usize = 2;

/// One continuous freehand gesture, in container coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DoodleStroke {
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl DoodleStroke {
    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            color: None,
            width: None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the stroke leaves a visible mark.
    pub fn is_visible(&self) -> bool {
        self.points.len() >= MIN_STROKE_POINTS
    }

    /// Width to render with.
    pub fn effective_width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_STROKE_WIDTH)
    }

    /// Bounding box of all points.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }

    /// SVG path data (`M x y L x y ...`) with stable number formatting.
    pub fn svg_path_data(&self) -> String {
        let mut data = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                data.push(' ');
            }
            let _ = write!(data, "{} {} {}", cmd, p.x, p.y);
        }
        data
    }
}

/// Records a stroke while the pointer is down.
///
/// Every sample is clamped to the container so strokes never leave the page.
#[derive(Debug, Clone)]
pub struct DoodleRecorder {
    points: Vec<Point>,
    bounds: Size,
}

impl DoodleRecorder {
    /// Start a stroke at a container-relative point.
    pub fn begin(start: Point, bounds: Size) -> Self {
        Self {
            points: vec![clamp_to_bounds(start, bounds)],
            bounds,
        }
    }

    /// Append a sample.
    pub fn extend(&mut self, point: Point) {
        self.points.push(clamp_to_bounds(point, self.bounds));
    }

    /// In-progress points for live preview.
    pub fn preview(&self) -> &[Point] {
        &self.points
    }

    /// Finalize. Strokes with fewer than two points are discarded.
    pub fn finish(self, color: Option<String>, width: Option<f64>) -> Option<DoodleStroke> {
        if self.points.len() < MIN_STROKE_POINTS {
            log::debug!("discarding doodle with {} point(s)", self.points.len());
            return None;
        }
        Some(DoodleStroke {
            points: self.points,
            color,
            width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Size {
        Size::new(400.0, 600.0)
    }

    #[test]
    fn test_stroke_keeps_points_in_order() {
        let mut rec = DoodleRecorder::begin(Point::new(10.0, 10.0), page());
        rec.extend(Point::new(15.0, 12.0));
        rec.extend(Point::new(9.0, 40.0));
        let stroke = rec.finish(None, None).unwrap();
        assert_eq!(
            stroke.points,
            vec![Point::new(10.0, 10.0), Point::new(15.0, 12.0), Point::new(9.0, 40.0)]
        );
    }

    #[test]
    fn test_single_tap_is_discarded() {
        let rec = DoodleRecorder::begin(Point::new(10.0, 10.0), page());
        assert!(rec.finish(None, None).is_none());
    }

    #[test]
    fn test_samples_are_clamped() {
        let mut rec = DoodleRecorder::begin(Point::new(-10.0, 700.0), page());
        rec.extend(Point::new(500.0, -3.0));
        assert_eq!(rec.preview(), &[Point::new(0.0, 600.0), Point::new(400.0, 0.0)]);
    }

    #[test]
    fn test_bounds() {
        let stroke = DoodleStroke::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
        ]);
        assert_eq!(stroke.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(DoodleStroke::default().bounds(), Rect::ZERO);
    }

    #[test]
    fn test_svg_path_data() {
        let stroke = DoodleStroke::from_points(vec![Point::new(10.0, 10.0), Point::new(15.5, 12.0)]);
        assert_eq!(stroke.svg_path_data(), "M 10 10 L 15.5 12");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let stroke = DoodleStroke::from_points(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        let json = serde_json::to_string(&stroke).unwrap();
        assert_eq!(json, r#"{"points":[{"x":1.0,"y":2.0},{"x":3.0,"y":4.0}]}"#);
    }
}
