//! A decoratable surface: the letter paper or the envelope front.
//!
//! Owns the placed decorations (each with its own drag engine), the
//! committed doodles and the tool mode. Pointer events are fed in client
//! coordinates; the surface resolves hits, placements and strokes.

use crate::decoration::{Decoration, DecorationKind};
use crate::doodle::{DoodleRecorder, DoodleStroke};
use crate::drag::DragEngine;
use crate::input::{Container, PointerEvent, PointerId};
use crate::tools::{PendingDecoration, PlacementPolicy, ToolMode, ToolbarAction};
use kurbo::{Point, Rect};
use std::collections::BTreeMap;

/// What a pointer event did to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    None,
    /// A new decoration was placed.
    Placed { id: String },
    /// A drag on an existing decoration started.
    DragStarted { id: String },
    /// A drag finished and the decoration's position was committed.
    Moved { id: String, position: Point },
    /// A doodle stroke was appended.
    StrokeCommitted,
    /// A stroke too short to be visible was dropped.
    StrokeDiscarded,
}

/// Per-pointer gesture in progress.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    /// Pointer went down on a decoration.
    Dragging { id: String },
    /// Pointer went down on bare paper; releasing it is a click.
    Press,
    /// Pointer is drawing a doodle.
    Drawing,
}

#[derive(Debug, Clone)]
struct Placed {
    decoration: Decoration,
    drag: DragEngine,
}

impl Placed {
    fn new(decoration: Decoration) -> Self {
        let drag = DragEngine::new(decoration.position);
        Self { decoration, drag }
    }
}

/// Decorations, doodles and tool state for one container.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    container: Option<Rect>,
    placed: Vec<Placed>,
    doodles: Vec<DoodleStroke>,
    mode: ToolMode,
    policy: PlacementPolicy,
    gestures: BTreeMap<PointerId, Gesture>,
    doodle_color: Option<String>,
    doodle_width: Option<f64>,
}

impl Surface {
    /// Create an empty, unmounted surface.
    pub fn new(policy: PlacementPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Rebuild a surface from stored content.
    pub fn with_content(policy: PlacementPolicy, decorations: Vec<Decoration>, doodles: Vec<DoodleStroke>) -> Self {
        Self {
            policy,
            placed: decorations.into_iter().map(Placed::new).collect(),
            doodles,
            ..Default::default()
        }
    }

    /// Update the container's client rect (`None` while unmounted).
    pub fn set_container(&mut self, rect: Option<Rect>) {
        self.container = rect;
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PlacementPolicy) {
        self.policy = policy;
    }

    pub fn mode(&self) -> &ToolMode {
        &self.mode
    }

    /// Pending decoration, if a tool is armed.
    pub fn pending(&self) -> Option<&PendingDecoration> {
        self.mode.pending()
    }

    /// Placed decorations in stacking order (back to front), at their
    /// current displayed positions.
    pub fn decorations(&self) -> impl Iterator<Item = &Decoration> {
        self.placed.iter().map(|p| &p.decoration)
    }

    /// Displayed position of a decoration, including an in-progress drag.
    pub fn displayed_position(&self, id: &str) -> Option<Point> {
        self.placed
            .iter()
            .find(|p| p.decoration.id == id)
            .map(|p| p.drag.position())
    }

    /// Whether the given decoration is being dragged.
    pub fn is_dragging(&self, id: &str) -> bool {
        self.placed
            .iter()
            .any(|p| p.decoration.id == id && p.drag.is_dragging())
    }

    pub fn doodles(&self) -> &[DoodleStroke] {
        &self.doodles
    }

    /// Points of the stroke being drawn, for live preview.
    pub fn live_stroke(&self) -> Option<&[Point]> {
        match &self.mode {
            ToolMode::Doodle { stroke: Some(rec) } => Some(rec.preview()),
            _ => None,
        }
    }

    /// Color and width stamped onto new strokes.
    pub fn set_doodle_style(&mut self, color: Option<String>, width: Option<f64>) {
        self.doodle_color = color;
        self.doodle_width = width;
    }

    /// Arm a decoration tool. Leaves doodle mode, dropping any stroke in progress.
    pub fn arm(&mut self, kind: DecorationKind) {
        if self.mode.is_doodle() {
            self.gestures.retain(|_, g| *g != Gesture::Drawing);
        }
        log::debug!("armed {} placement", kind);
        self.mode = ToolMode::Placing(PendingDecoration::new(kind));
    }

    /// Return to idle without placing.
    pub fn disarm(&mut self) {
        if self.mode.pending().is_some() {
            self.mode = ToolMode::Idle;
        }
    }

    /// Enter or leave doodle mode. Entering cancels any pending decoration.
    pub fn set_doodle_mode(&mut self, enabled: bool) {
        match (enabled, self.mode.is_doodle()) {
            (true, false) => self.mode = ToolMode::Doodle { stroke: None },
            (false, true) => {
                self.gestures.retain(|_, g| *g != Gesture::Drawing);
                self.mode = ToolMode::Idle;
            }
            _ => {}
        }
    }

    /// Apply a toolbar action that targets the surface.
    pub fn apply(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Arm(pending) => self.arm(pending.kind),
            ToolbarAction::ToggleDoodle => {
                let enabled = !self.mode.is_doodle();
                self.set_doodle_mode(enabled);
            }
            ToolbarAction::None | ToolbarAction::SetInk(_) | ToolbarAction::SetFont(_) => {}
        }
    }

    /// Place the pending decoration at a client-space point.
    ///
    /// The position is the pointer minus the container origin, unclamped.
    /// Returns the new decoration's id.
    pub fn place_at(&mut self, client: Point) -> Option<String> {
        let pending = self.mode.pending()?.clone();
        let position = self.container.to_local(client)?;

        let mut decoration = Decoration::new(pending.kind, position);
        decoration.rotation = Some(decoration.kind.default_rotation());
        let id = decoration.id.clone();

        if !self.policy.keeps_armed(&decoration.kind) {
            self.mode = ToolMode::Idle;
        }
        log::debug!("placed {} at {:?}", id, position);
        self.placed.push(Placed::new(decoration));
        Some(id)
    }

    /// Remove a decoration by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.placed.len();
        self.placed.retain(|p| p.decoration.id != id);
        self.gestures
            .retain(|_, g| !matches!(g, Gesture::Dragging { id: dragged } if dragged == id));
        before != self.placed.len()
    }

    /// Move a decoration. Type, payload and rotation are untouched.
    pub fn move_decoration(&mut self, id: &str, position: Point) -> bool {
        match self.placed.iter_mut().find(|p| p.decoration.id == id) {
            Some(placed) => {
                placed.decoration.position = position;
                placed.drag.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Top-most decoration under a container-relative point.
    pub fn decoration_at(&self, local: Point) -> Option<&Decoration> {
        self.placed
            .iter()
            .rev()
            .map(|p| &p.decoration)
            .find(|d| d.hit_test(local))
    }

    /// Feed a pointer event (client coordinates).
    pub fn handle_pointer(&mut self, event: PointerEvent) -> SurfaceEvent {
        let pointer = event.pointer();
        let local = self.container.to_local(event.position());

        match event {
            PointerEvent::Down { position, .. } => self.pointer_down(pointer, position, local),
            PointerEvent::Move { position, .. } => self.pointer_move(pointer, position, local),
            PointerEvent::Up { position, .. } => match self.gestures.remove(&pointer) {
                Some(Gesture::Press) => self.click(position),
                Some(Gesture::Dragging { id }) => self.end_drag(pointer, id),
                Some(Gesture::Drawing) => self.finish_stroke(),
                None => SurfaceEvent::None,
            },
            PointerEvent::Leave { .. } => match self.gestures.get(&pointer).cloned() {
                // Captured drags keep receiving events outside the element.
                Some(Gesture::Dragging { .. }) | None => SurfaceEvent::None,
                Some(Gesture::Press) => {
                    self.gestures.remove(&pointer);
                    SurfaceEvent::None
                }
                Some(Gesture::Drawing) => {
                    self.gestures.remove(&pointer);
                    self.finish_stroke()
                }
            },
            PointerEvent::Cancel { .. } => match self.gestures.remove(&pointer) {
                Some(Gesture::Dragging { id }) => self.end_drag(pointer, id),
                Some(Gesture::Drawing) => self.finish_stroke(),
                Some(Gesture::Press) | None => SurfaceEvent::None,
            },
        }
    }

    fn pointer_down(&mut self, pointer: PointerId, client: Point, local: Option<Point>) -> SurfaceEvent {
        let Some(local) = local else {
            return SurfaceEvent::None;
        };
        if self.gestures.contains_key(&pointer) {
            return SurfaceEvent::None;
        }

        if let ToolMode::Doodle { stroke } = &mut self.mode {
            if stroke.is_some() {
                return SurfaceEvent::None;
            }
            let Some(size) = self.container.size() else {
                return SurfaceEvent::None;
            };
            *stroke = Some(DoodleRecorder::begin(local, size));
            self.gestures.insert(pointer, Gesture::Drawing);
            return SurfaceEvent::None;
        }

        // A press on a decoration drags it, never places a new one.
        let hit = self.decoration_at(local).map(|d| d.id.clone());
        if let Some(id) = hit {
            let container = self.container;
            if let Some(placed) = self.placed.iter_mut().find(|p| p.decoration.id == id) {
                if placed.drag.pointer_down(pointer, client, &container) {
                    self.gestures.insert(pointer, Gesture::Dragging { id: id.clone() });
                    return SurfaceEvent::DragStarted { id };
                }
            }
            return SurfaceEvent::None;
        }

        self.gestures.insert(pointer, Gesture::Press);
        SurfaceEvent::None
    }

    fn pointer_move(&mut self, pointer: PointerId, client: Point, local: Option<Point>) -> SurfaceEvent {
        match self.gestures.get(&pointer) {
            Some(Gesture::Drawing) => {
                if let (ToolMode::Doodle { stroke: Some(rec) }, Some(local)) = (&mut self.mode, local) {
                    rec.extend(local);
                }
            }
            Some(Gesture::Dragging { id }) => {
                let container = self.container;
                if let Some(placed) = self.placed.iter_mut().find(|p| &p.decoration.id == id) {
                    placed.drag.pointer_move(pointer, client, &container);
                }
            }
            Some(Gesture::Press) | None => {}
        }
        SurfaceEvent::None
    }

    fn click(&mut self, client: Point) -> SurfaceEvent {
        match self.place_at(client) {
            Some(id) => SurfaceEvent::Placed { id },
            None => SurfaceEvent::None,
        }
    }

    fn end_drag(&mut self, pointer: PointerId, id: String) -> SurfaceEvent {
        let Some(placed) = self.placed.iter_mut().find(|p| p.decoration.id == id) else {
            return SurfaceEvent::None;
        };
        match placed.drag.pointer_up(pointer) {
            Some(position) => {
                placed.decoration.position = position;
                SurfaceEvent::Moved { id, position }
            }
            None => SurfaceEvent::None,
        }
    }

    fn finish_stroke(&mut self) -> SurfaceEvent {
        let ToolMode::Doodle { stroke } = &mut self.mode else {
            return SurfaceEvent::None;
        };
        let Some(rec) = stroke.take() else {
            return SurfaceEvent::None;
        };
        match rec.finish(self.doodle_color.clone(), self.doodle_width) {
            Some(done) => {
                self.doodles.push(done);
                SurfaceEvent::StrokeCommitted
            }
            None => SurfaceEvent::StrokeDiscarded,
        }
    }

    /// Serializable snapshot of the decorations (transient drag state dropped).
    pub fn decoration_list(&self) -> Vec<Decoration> {
        self.placed.iter().map(|p| p.decoration.clone()).collect()
    }

    /// Snapshot of the committed doodles.
    pub fn doodle_list(&self) -> Vec<DoodleStroke> {
        self.doodles.clone()
    }
}
