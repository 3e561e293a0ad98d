//! PenPal Core Library
//!
//! Platform-agnostic letter composition: the decoration and doodle engine,
//! the sealed letter schema, persistence stores and the standalone HTML export.

pub mod app;
pub mod canvas;
pub mod config;
pub mod decoration;
pub mod doodle;
pub mod drag;
pub mod export;
pub mod input;
pub mod letter;
pub mod link;
pub mod outbox;
pub mod photo;
pub mod storage;
pub mod surface;
pub mod tools;
pub mod viewer;

pub use app::{AppView, PenPalApp};
pub use canvas::{EnvelopeStage, LetterComposer};
pub use config::{ConfigError, PenPalConfig, StoreConfig};
pub use decoration::{Decoration, DecorationKind, StickerKind, WashiColor};
pub use doodle::{DoodleRecorder, DoodleStroke};
pub use drag::DragEngine;
pub use export::{build_interactive_letter_html, escape_html, export_filename};
pub use input::{Container, PointerEvent, PointerId};
pub use letter::{FontStyle, HexColor, InkColor, LetterError, LetterPage, SavedLetterState};
pub use link::ShareLink;
pub use outbox::{Outbox, SendError};
pub use photo::{PhotoData, PhotoError};
pub use storage::{
    FileStore, LetterRow, MemoryStore, NewLetterRow, RemoteStore, Store, StorageError,
    StorageResult, open_store,
};
pub use surface::{Surface, SurfaceEvent};
pub use tools::{
    PendingDecoration, PlacementPolicy, ToolButton, ToolMode, Toolbar, ToolbarAction, ToolbarChoice,
    ToolbarPanel,
};
pub use viewer::{EnvelopeAnimation, FetchTicket, LetterViewer, ViewerState};
