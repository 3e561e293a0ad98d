//! Letter composition session and the envelope stage that follows sealing.

use crate::doodle::DEFAULT_STROKE_WIDTH;
use crate::input::PointerEvent;
use crate::letter::{FontStyle, HexColor, InkColor, LetterError, LetterPage, SavedLetterState};
use crate::surface::{Surface, SurfaceEvent};
use crate::tools::{PlacementPolicy, ToolButton, Toolbar, ToolbarAction, ToolbarChoice};

/// Greeting used when neither a greeting nor a recipient was given.
pub const DEFAULT_GREETING: &str = "Dear friend";

/// Date format stamped on new letters, e.g. `October 17, 2026`.
pub const DATE_FORMAT: &str = "%B %-d, %Y";

/// Today's date in the letter format.
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Mutable letter being written.
#[derive(Debug, Clone)]
pub struct LetterComposer {
    /// Page-1 body.
    pub text: String,
    pub greeting: String,
    pub signature: String,
    pub recipient_name: Option<String>,
    pub ink_color: InkColor,
    pub font_style: FontStyle,
    date: String,
    pages: Vec<LetterPage>,
    surface: Surface,
    toolbar: Toolbar,
}

impl LetterComposer {
    /// Start a blank letter dated today.
    pub fn new(policy: PlacementPolicy) -> Self {
        Self::with_date(policy, today())
    }

    /// Start a blank letter with a fixed date.
    pub fn with_date(policy: PlacementPolicy, date: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            greeting: String::new(),
            signature: String::new(),
            recipient_name: None,
            ink_color: InkColor::default(),
            font_style: FontStyle::default(),
            date: date.into(),
            pages: Vec::new(),
            surface: Surface::new(policy),
            toolbar: Toolbar::new(),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable surface. New strokes pick up the current ink.
    pub fn surface_mut(&mut self) -> &mut Surface {
        self.stamp_doodle_style();
        &mut self.surface
    }

    /// Feed a pointer event to the letter surface.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> SurfaceEvent {
        self.surface_mut().handle_pointer(event)
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    fn stamp_doodle_style(&mut self) {
        self.surface
            .set_doodle_style(Some(self.ink_color.hex().to_string()), Some(DEFAULT_STROKE_WIDTH));
    }

    /// Click a toolbar button.
    pub fn click_tool(&mut self, button: ToolButton) {
        let action = self.toolbar.click(button);
        self.apply(action);
    }

    /// Pick an option from the open toolbar panel.
    pub fn choose(&mut self, choice: ToolbarChoice) {
        let action = self.toolbar.choose(choice);
        self.apply(action);
    }

    fn apply(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::SetInk(ink) => self.ink_color = ink,
            ToolbarAction::SetFont(font) => self.font_style = font,
            other => self.surface.apply(other),
        }
        self.stamp_doodle_style();
    }

    /// Continuation pages in order.
    pub fn pages(&self) -> &[LetterPage] {
        &self.pages
    }

    /// Append an empty continuation page and return its id.
    pub fn add_page(&mut self) -> String {
        let page = LetterPage::new();
        let id = page.id.clone();
        self.pages.push(page);
        id
    }

    pub fn set_page_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.pages.iter_mut().find(|p| p.id == id) {
            Some(page) => {
                page.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_page(&mut self, id: &str) -> bool {
        let before = self.pages.len();
        self.pages.retain(|p| p.id != id);
        before != self.pages.len()
    }

    /// Sealing requires a non-blank body.
    pub fn can_seal(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Freeze the composition into a letter. Returns `None` when the body is
    /// blank; the composer is left untouched either way.
    pub fn seal(&self) -> Option<SavedLetterState> {
        if !self.can_seal() {
            log::debug!("seal refused: empty letter body");
            return None;
        }
        Some(SavedLetterState {
            text: self.text.clone(),
            date: self.date.clone(),
            greeting: self.derived_greeting(),
            signature: self.signature.clone(),
            recipient_name: self.recipient().map(str::to_string),
            ink_color: self.ink_color,
            font_style: self.font_style,
            decorations: self.surface.decoration_list(),
            additional_pages: self.pages.clone(),
            letter_doodles: self.surface.doodle_list(),
            envelope_color: None,
            envelope_decorations: Vec::new(),
            envelope_doodles: Vec::new(),
        })
    }

    fn recipient(&self) -> Option<&str> {
        self.recipient_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    fn derived_greeting(&self) -> String {
        if !self.greeting.trim().is_empty() {
            return self.greeting.clone();
        }
        match self.recipient() {
            Some(name) => format!("Dear {}", name),
            None => DEFAULT_GREETING.to_string(),
        }
    }
}

/// Post-seal step where only the envelope's appearance may change.
#[derive(Debug, Clone)]
pub struct EnvelopeStage {
    letter: SavedLetterState,
    color: Option<HexColor>,
    surface: Surface,
    toolbar: Toolbar,
}

impl EnvelopeStage {
    /// Stage a sealed letter. Existing envelope content is carried over.
    pub fn new(letter: SavedLetterState, policy: PlacementPolicy) -> Self {
        let color = letter.envelope_color();
        let mut surface = Surface::with_content(
            policy,
            letter.envelope_decorations.clone(),
            letter.envelope_doodles.clone(),
        );
        // Envelope strokes use the sealed letter's ink.
        surface.set_doodle_style(Some(letter.ink_color.hex().to_string()), Some(DEFAULT_STROKE_WIDTH));
        Self {
            letter,
            color,
            surface,
            toolbar: Toolbar::new(),
        }
    }

    /// The sealed letter (read-only).
    pub fn letter(&self) -> &SavedLetterState {
        &self.letter
    }

    pub fn color(&self) -> Option<HexColor> {
        self.color
    }

    /// Set the envelope color from `#rgb` / `#rrggbb`.
    pub fn set_color(&mut self, hex: &str) -> Result<(), LetterError> {
        self.color = Some(hex.parse()?);
        Ok(())
    }

    pub fn clear_color(&mut self) {
        self.color = None;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> SurfaceEvent {
        self.surface.handle_pointer(event)
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn click_tool(&mut self, button: ToolButton) {
        let action = self.toolbar.click(button);
        self.surface.apply(action);
    }

    /// Ink and font choices are ignored here; the letter is sealed.
    pub fn choose(&mut self, choice: ToolbarChoice) {
        let action = self.toolbar.choose(choice);
        self.surface.apply(action);
    }

    /// Letter with the envelope appearance attached.
    pub fn finish(&self) -> SavedLetterState {
        SavedLetterState {
            envelope_color: self.color.map(|c| c.to_string()),
            envelope_decorations: self.surface.decoration_list(),
            envelope_doodles: self.surface.doodle_list(),
            ..self.letter.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{DecorationKind, StickerKind};
    use crate::tools::ToolbarPanel;
    use kurbo::{Point, Rect};

    fn composer() -> LetterComposer {
        let mut c = LetterComposer::with_date(PlacementPolicy::OneShot, "October 17, 2026");
        c.surface_mut().set_container(Some(Rect::new(0.0, 0.0, 600.0, 620.0)));
        c
    }

    #[test]
    fn test_seal_scenario() {
        let mut c = composer();
        c.text = "Hello".to_string();
        c.greeting = "Dear Sam".to_string();
        c.signature = "Alex".to_string();
        c.ink_color = InkColor::Navy;
        c.font_style = FontStyle::Serif;

        let letter = c.seal().unwrap();
        assert_eq!(letter.text, "Hello");
        assert_eq!(letter.greeting, "Dear Sam");
        assert_eq!(letter.signature, "Alex");
        assert_eq!(letter.ink_color, InkColor::Navy);
        assert_eq!(letter.font_style, FontStyle::Serif);
        assert!(letter.decorations.is_empty());
        assert_eq!(letter.date, "October 17, 2026");
    }

    #[test]
    fn test_whitespace_body_is_refused() {
        let mut c = composer();
        c.text = "   \n  ".to_string();
        assert!(!c.can_seal());
        assert!(c.seal().is_none());
        assert_eq!(c.text, "   \n  ");
    }

    #[test]
    fn test_greeting_derivation() {
        let mut c = composer();
        c.text = "x".to_string();
        assert_eq!(c.seal().unwrap().greeting, DEFAULT_GREETING);

        c.recipient_name = Some("Robin".to_string());
        let letter = c.seal().unwrap();
        assert_eq!(letter.greeting, "Dear Robin");
        assert_eq!(letter.recipient_name.as_deref(), Some("Robin"));

        c.recipient_name = Some("  ".to_string());
        assert_eq!(c.seal().unwrap().recipient_name, None);
    }

    #[test]
    fn test_seal_captures_decorations_pages_and_doodles() {
        let mut c = composer();
        c.text = "Body".to_string();
        c.click_tool(ToolButton::Panel(ToolbarPanel::Stickers));
        c.choose(ToolbarChoice::Sticker(StickerKind::Butterfly));
        assert_eq!(c.toolbar().open_panel(), None);
        c.surface_mut().place_at(Point::new(50.0, 60.0));

        let page = c.add_page();
        assert!(c.set_page_text(&page, "Second page"));
        let dropped = c.add_page();
        assert!(c.remove_page(&dropped));

        c.click_tool(ToolButton::Doodle);
        let s = c.surface_mut();
        s.handle_pointer(PointerEvent::Down { pointer: 1, position: Point::new(1.0, 1.0) });
        s.handle_pointer(PointerEvent::Move { pointer: 1, position: Point::new(5.0, 5.0) });
        s.handle_pointer(PointerEvent::Up { pointer: 1, position: Point::new(5.0, 5.0) });

        let letter = c.seal().unwrap();
        assert_eq!(letter.decorations.len(), 1);
        assert_eq!(letter.decorations[0].kind, DecorationKind::Sticker { sticker: StickerKind::Butterfly });
        assert_eq!(letter.additional_pages.len(), 1);
        assert_eq!(letter.additional_pages[0].text, "Second page");
        assert_eq!(letter.letter_doodles.len(), 1);
    }

    fn scribble(mut feed: impl FnMut(PointerEvent) -> SurfaceEvent, from: Point, to: Point) -> SurfaceEvent {
        feed(PointerEvent::Down { pointer: 1, position: from });
        feed(PointerEvent::Move { pointer: 1, position: to });
        feed(PointerEvent::Up { pointer: 1, position: to })
    }

    #[test]
    fn test_strokes_take_current_ink() {
        let mut c = composer();
        c.text = "Hello".to_string();
        c.ink_color = InkColor::Navy;
        c.click_tool(ToolButton::Doodle);
        let first = scribble(|e| c.handle_pointer(e), Point::new(1.0, 1.0), Point::new(5.0, 5.0));
        assert_eq!(first, SurfaceEvent::StrokeCommitted);

        c.click_tool(ToolButton::Panel(ToolbarPanel::Ink));
        c.choose(ToolbarChoice::Ink(InkColor::Black));
        let second = scribble(|e| c.handle_pointer(e), Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert_eq!(second, SurfaceEvent::StrokeCommitted);

        let letter = c.seal().unwrap();
        assert_eq!(letter.letter_doodles.len(), 2);
        assert_eq!(letter.letter_doodles[0].color.as_deref(), Some(InkColor::Navy.hex()));
        assert_eq!(letter.letter_doodles[0].width, Some(DEFAULT_STROKE_WIDTH));
        assert_eq!(letter.letter_doodles[1].color.as_deref(), Some(InkColor::Black.hex()));
    }

    #[test]
    fn test_envelope_strokes_take_letter_ink() {
        let mut c = composer();
        c.text = "Hello".to_string();
        c.ink_color = InkColor::Navy;
        let mut stage = EnvelopeStage::new(c.seal().unwrap(), PlacementPolicy::OneShot);
        stage.surface_mut().set_container(Some(Rect::new(0.0, 0.0, 400.0, 300.0)));
        stage.click_tool(ToolButton::Doodle);
        let event = scribble(|e| stage.handle_pointer(e), Point::new(1.0, 1.0), Point::new(5.0, 5.0));
        assert_eq!(event, SurfaceEvent::StrokeCommitted);

        let finished = stage.finish();
        assert_eq!(finished.envelope_doodles.len(), 1);
        assert_eq!(finished.envelope_doodles[0].color.as_deref(), Some(InkColor::Navy.hex()));
        assert_eq!(finished.envelope_doodles[0].width, Some(DEFAULT_STROKE_WIDTH));
    }

    #[test]
    fn test_ink_choice() {
        let mut c = composer();
        c.click_tool(ToolButton::Panel(ToolbarPanel::Ink));
        c.choose(ToolbarChoice::Ink(InkColor::Black));
        assert_eq!(c.ink_color, InkColor::Black);
    }

    #[test]
    fn test_envelope_stage_is_appearance_only() {
        let mut c = composer();
        c.text = "Hello".to_string();
        let sealed = c.seal().unwrap();

        let mut stage = EnvelopeStage::new(sealed.clone(), PlacementPolicy::OneShot);
        stage.surface_mut().set_container(Some(Rect::new(0.0, 0.0, 400.0, 300.0)));
        assert!(stage.set_color("#f9e8dd").is_ok());
        assert!(stage.set_color("blue").is_err());
        stage.choose(ToolbarChoice::WaxSeal);
        stage.surface_mut().place_at(Point::new(176.0, 200.0));

        let finished = stage.finish();
        assert_eq!(finished.envelope_color.as_deref(), Some("#f9e8dd"));
        assert_eq!(finished.envelope_decorations.len(), 1);
        assert_eq!(finished.envelope_decorations[0].kind, DecorationKind::WaxSeal);
        assert!(finished.envelope_doodles.is_empty());

        let mut body_only = finished.clone();
        body_only.envelope_color = None;
        body_only.envelope_decorations.clear();
        assert_eq!(body_only, sealed);
    }

    #[test]
    fn test_envelope_surface_is_separate() {
        let mut c = composer();
        c.text = "Hello".to_string();
        c.choose(ToolbarChoice::Sticker(StickerKind::Heart));

        let stage = EnvelopeStage::new(c.seal().unwrap(), PlacementPolicy::OneShot);
        assert!(stage.surface().pending().is_none());
        assert!(c.surface().pending().is_some());
    }
}
