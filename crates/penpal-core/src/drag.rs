//! Pointer-driven drag engine for a single decoration.
//!
//! Every draggable element owns its own engine, so concurrent drags of
//! different elements never share state.

use crate::input::{Container, PointerEvent, PointerId};
use kurbo::{Point, Vec2};

/// How far (in layout pixels) an element may hang past the container edge.
pub const DRAG_OVERHANG: f64 = 20.0;

/// Tracks one drag gesture at a time for one element.
#[derive(Debug, Clone)]
pub struct DragEngine {
    /// Currently displayed top-left position (container-relative).
    position: Point,
    /// Pointer that owns the gesture (pointer capture).
    captured: Option<PointerId>,
    /// Offset between the pointer and the element's top-left at pointer-down.
    offset: Vec2,
}

impl DragEngine {
    /// Create an engine at the given container-relative position.
    pub fn new(initial: Point) -> Self {
        Self {
            position: initial,
            captured: None,
            offset: Vec2::ZERO,
        }
    }

    /// Current displayed position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.captured.is_some()
    }

    /// Reset the displayed position (e.g. after an external update).
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Begin a drag. Captures the pointer so later events route here even
    /// outside the element bounds. No-op when the container is not mounted.
    pub fn pointer_down(&mut self, pointer: PointerId, client: Point, container: &impl Container) -> bool {
        let Some(local) = container.to_local(client) else {
            return false;
        };
        self.offset = local - self.position;
        self.captured = Some(pointer);
        log::debug!("drag start at {:?} (pointer {})", self.position, pointer);
        true
    }

    /// Move the element while dragging, clamped to the overhang tolerance.
    ///
    /// Returns the new position when it changed.
    pub fn pointer_move(&mut self, pointer: PointerId, client: Point, container: &impl Container) -> Option<Point> {
        if self.captured != Some(pointer) {
            return None;
        }
        let rect = container.client_rect()?;
        let local = client - Vec2::new(rect.x0, rect.y0);
        let candidate = local - self.offset;
        self.position = clamp_drag(candidate, rect.size());
        Some(self.position)
    }

    /// Finish the drag and report the final position exactly once.
    pub fn pointer_up(&mut self, pointer: PointerId) -> Option<Point> {
        if self.captured != Some(pointer) {
            return None;
        }
        self.captured = None;
        log::debug!("drag end at {:?}", self.position);
        Some(self.position)
    }

    /// Dispatch a raw pointer event. Returns the final position on release.
    pub fn handle(&mut self, event: PointerEvent, container: &impl Container) -> Option<Point> {
        match event {
            PointerEvent::Down { pointer, position } => {
                self.pointer_down(pointer, position, container);
                None
            }
            PointerEvent::Move { pointer, position } => {
                self.pointer_move(pointer, position, container);
                None
            }
            // Leave is routed to the captured element and never ends a drag.
            PointerEvent::Leave { .. } => None,
            PointerEvent::Up { pointer, .. } | PointerEvent::Cancel { pointer, .. } => {
                self.pointer_up(pointer)
            }
        }
    }
}

/// Clamp a candidate top-left to `[-20, size - 20]` on each axis.
pub fn clamp_drag(candidate: Point, size: kurbo::Size) -> Point {
    Point::new(
        candidate.x.min(size.width - DRAG_OVERHANG).max(-DRAG_OVERHANG),
        candidate.y.min(size.height - DRAG_OVERHANG).max(-DRAG_OVERHANG),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn container() -> Rect {
        Rect::new(100.0, 100.0, 500.0, 400.0)
    }

    #[test]
    fn test_drag_preserves_grab_offset() {
        let mut drag = DragEngine::new(Point::new(50.0, 50.0));
        assert!(drag.pointer_down(1, Point::new(160.0, 155.0), &container()));
        assert!(drag.is_dragging());

        drag.pointer_move(1, Point::new(170.0, 175.0), &container());
        assert_eq!(drag.position(), Point::new(60.0, 70.0));

        assert_eq!(drag.pointer_up(1), Some(Point::new(60.0, 70.0)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_clamps_with_overhang() {
        let mut drag = DragEngine::new(Point::new(0.0, 0.0));
        drag.pointer_down(1, Point::new(100.0, 100.0), &container());

        drag.pointer_move(1, Point::new(-400.0, -400.0), &container());
        assert_eq!(drag.position(), Point::new(-20.0, -20.0));

        drag.pointer_move(1, Point::new(2000.0, 2000.0), &container());
        assert_eq!(drag.position(), Point::new(380.0, 280.0));
    }

    #[test]
    fn test_clamp_invariant_over_many_moves() {
        let mut drag = DragEngine::new(Point::new(10.0, 10.0));
        drag.pointer_down(3, Point::new(115.0, 115.0), &container());
        let size = container().size();
        for i in -50..50 {
            let p = Point::new(100.0 + i as f64 * 17.0, 100.0 - i as f64 * 13.0);
            if let Some(pos) = drag.pointer_move(3, p, &container()) {
                assert!(pos.x >= -DRAG_OVERHANG && pos.x <= size.width - DRAG_OVERHANG);
                assert!(pos.y >= -DRAG_OVERHANG && pos.y <= size.height - DRAG_OVERHANG);
            }
        }
    }

    #[test]
    fn test_unmounted_container_is_noop() {
        let mut drag = DragEngine::new(Point::new(5.0, 5.0));
        let unmounted: Option<Rect> = None;
        assert!(!drag.pointer_down(1, Point::new(10.0, 10.0), &unmounted));
        assert!(!drag.is_dragging());
        assert!(drag.pointer_move(1, Point::new(90.0, 90.0), &unmounted).is_none());
        assert!(drag.pointer_up(1).is_none());
        assert_eq!(drag.position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_other_pointer_is_ignored() {
        let mut drag = DragEngine::new(Point::new(0.0, 0.0));
        drag.pointer_down(1, Point::new(100.0, 100.0), &container());
        assert!(drag.pointer_move(2, Point::new(200.0, 200.0), &container()).is_none());
        assert!(drag.pointer_up(2).is_none());
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_release_reports_once() {
        let mut drag = DragEngine::new(Point::new(0.0, 0.0));
        drag.pointer_down(1, Point::new(100.0, 100.0), &container());
        assert!(drag.handle(PointerEvent::Up { pointer: 1, position: Point::ZERO }, &container()).is_some());
        assert!(drag.handle(PointerEvent::Up { pointer: 1, position: Point::ZERO }, &container()).is_none());
    }
}
