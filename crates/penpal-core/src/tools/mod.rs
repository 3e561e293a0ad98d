//! Tool system for the letter and envelope surfaces.

use crate::decoration::{DecorationKind, StickerKind, WashiColor};
use crate::doodle::DoodleRecorder;
use crate::letter::{FontStyle, InkColor};
use serde::{Deserialize, Serialize};

/// A decoration the user has picked but not yet placed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecoration {
    pub kind: DecorationKind,
}

impl PendingDecoration {
    pub fn new(kind: DecorationKind) -> Self {
        Self { kind }
    }
}

/// Whether a placement keeps the tool armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Every placement returns to idle.
    #[default]
    OneShot,
    /// Stickers and washi stay armed for rapid placement; photos and wax
    /// seals always disarm.
    RepeatStickers,
}

impl PlacementPolicy {
    /// Whether the tool stays armed after placing `kind`.
    pub fn keeps_armed(&self, kind: &DecorationKind) -> bool {
        match self {
            PlacementPolicy::OneShot => false,
            PlacementPolicy::RepeatStickers => kind.is_repeatable(),
        }
    }
}

/// Interaction mode of one surface. Placement and doodling are exclusive.
#[derive(Debug, Clone, Default)]
pub enum ToolMode {
    /// Pointer drags existing decorations only.
    #[default]
    Idle,
    /// Next click on the bare surface places this decoration.
    Placing(PendingDecoration),
    /// Pointer draws; `stroke` is the gesture in progress.
    Doodle { stroke: Option<DoodleRecorder> },
}

impl ToolMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, ToolMode::Idle)
    }

    pub fn is_doodle(&self) -> bool {
        matches!(self, ToolMode::Doodle { .. })
    }

    pub fn pending(&self) -> Option<&PendingDecoration> {
        match self {
            ToolMode::Placing(pending) => Some(pending),
            _ => None,
        }
    }
}

/// Toolbar panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolbarPanel {
    Ink,
    Font,
    Washi,
    Stickers,
    Photo,
}

/// Toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolButton {
    Panel(ToolbarPanel),
    Doodle,
}

/// A choice made inside an open panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarChoice {
    Ink(InkColor),
    Font(FontStyle),
    Washi(WashiColor),
    Sticker(StickerKind),
    /// Photo as a data URI.
    Photo(String),
    WaxSeal,
}

/// Effect of a toolbar interaction on the owning surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    SetInk(InkColor),
    SetFont(FontStyle),
    Arm(PendingDecoration),
    ToggleDoodle,
}

/// Single owner of which toolbar panel is open.
#[derive(Debug, Clone, Default)]
pub struct Toolbar {
    open_panel: Option<ToolbarPanel>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_panel(&self) -> Option<ToolbarPanel> {
        self.open_panel
    }

    /// Click a toolbar button. Panel buttons toggle their panel; the doodle
    /// button closes any panel and toggles doodle mode.
    pub fn click(&mut self, button: ToolButton) -> ToolbarAction {
        match button {
            ToolButton::Panel(panel) => {
                self.open_panel = if self.open_panel == Some(panel) {
                    None
                } else {
                    Some(panel)
                };
                ToolbarAction::None
            }
            ToolButton::Doodle => {
                self.open_panel = None;
                ToolbarAction::ToggleDoodle
            }
        }
    }

    /// Make a choice in the open panel; the panel closes afterwards.
    pub fn choose(&mut self, choice: ToolbarChoice) -> ToolbarAction {
        self.open_panel = None;
        match choice {
            ToolbarChoice::Ink(ink) => ToolbarAction::SetInk(ink),
            ToolbarChoice::Font(font) => ToolbarAction::SetFont(font),
            ToolbarChoice::Washi(color) => {
                ToolbarAction::Arm(PendingDecoration::new(DecorationKind::Washi { color }))
            }
            ToolbarChoice::Sticker(sticker) => {
                ToolbarAction::Arm(PendingDecoration::new(DecorationKind::Sticker { sticker }))
            }
            ToolbarChoice::Photo(src) => {
                ToolbarAction::Arm(PendingDecoration::new(DecorationKind::Photo { src }))
            }
            ToolbarChoice::WaxSeal => ToolbarAction::Arm(PendingDecoration::new(DecorationKind::WaxSeal)),
        }
    }

    pub fn close(&mut self) {
        self.open_panel = None;
    }
}
