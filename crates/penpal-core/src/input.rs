//! Pointer input and container geometry.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Platform pointer identifier (mouse, pen or a single touch contact).
pub type PointerId = u32;

/// Pointer event type for unified mouse/touch/pen handling.
///
/// Positions are in client (viewport) coordinates; handlers convert them
/// into container-relative coordinates through a [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { pointer: PointerId, position: Point },
    Move { pointer: PointerId, position: Point },
    Up { pointer: PointerId, position: Point },
    /// Pointer left the element it was over.
    Leave { pointer: PointerId, position: Point },
    /// Platform aborted the gesture (lost capture, palm rejection, ...).
    Cancel { pointer: PointerId, position: Point },
}

impl PointerEvent {
    /// The pointer that produced this event.
    pub fn pointer(&self) -> PointerId {
        match *self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer, .. }
            | PointerEvent::Leave { pointer, .. }
            | PointerEvent::Cancel { pointer, .. } => pointer,
        }
    }

    /// Client-space position of the event.
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Leave { position, .. }
            | PointerEvent::Cancel { position, .. } => position,
        }
    }

    /// Whether this event ends a gesture (up, leave or cancel).
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } | PointerEvent::Cancel { .. }
        )
    }
}

/// Something laid out on screen whose bounding box can be queried.
///
/// Returns `None` while the element is not mounted; every geometry-dependent
/// handler treats that as a no-op.
pub trait Container {
    /// Bounding box in client coordinates.
    fn client_rect(&self) -> Option<Rect>;

    /// Convert a client-space point to container-relative coordinates.
    fn to_local(&self, client: Point) -> Option<Point> {
        self.client_rect()
            .map(|rect| client - Vec2::new(rect.x0, rect.y0))
    }

    /// Container size, if mounted.
    fn size(&self) -> Option<kurbo::Size> {
        self.client_rect().map(|rect| rect.size())
    }
}

impl Container for Rect {
    fn client_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl Container for Option<Rect> {
    fn client_rect(&self) -> Option<Rect> {
        *self
    }
}

impl<C: Container + ?Sized> Container for &C {
    fn client_rect(&self) -> Option<Rect> {
        (**self).client_rect()
    }
}

/// Clamp a container-relative point to `[0, width] x [0, height]`.
pub fn clamp_to_bounds(point: Point, size: kurbo::Size) -> Point {
    Point::new(
        point.x.clamp(0.0, size.width.max(0.0)),
        point.y.clamp(0.0, size.height.max(0.0)),
    )
}
