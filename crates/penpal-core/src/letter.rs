//! The sealed letter document.

use crate::decoration::Decoration;
use crate::doodle::DoodleStroke;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors decoding a stored letter.
#[derive(Debug, Error)]
pub enum LetterError {
    #[error("Malformed letter content: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Ink color for all letter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkColor {
    #[default]
    Brown,
    Navy,
    Black,
}

impl InkColor {
    pub fn hex(&self) -> &'static str {
        match self {
            InkColor::Brown => "#4a3728",
            InkColor::Navy => "#2a3a5c",
            InkColor::Black => "#3a3330",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InkColor::Brown => "Dark Brown",
            InkColor::Navy => "Navy",
            InkColor::Black => "Charcoal",
        }
    }
}

/// Letter typeface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Handwriting,
    Serif,
}

/// An opaque sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexColor(Color);

impl HexColor {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(Color::from_rgba8(r, g, b, 255))
    }

    pub fn color(&self) -> Color {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = LetterError;

    /// Accepts `#rgb` and `#rrggbb`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LetterError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rgba = self.0.to_rgba8();
        write!(f, "#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }
}

/// A continuation page after the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterPage {
    pub id: String,
    pub text: String,
}

impl LetterPage {
    /// Create an empty page with a fresh id.
    pub fn new() -> Self {
        static SEQUENCE: AtomicU64 = AtomicU64::new(1);
        Self {
            id: format!("page-{}", SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            text: String::new(),
        }
    }
}

impl Default for LetterPage {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete letter as sealed, sent and viewed.
///
/// Optional collections are omitted from the serialized form when empty and
/// read back as empty when absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLetterState {
    /// Page-1 body.
    pub text: String,
    /// Formatted at creation time.
    pub date: String,
    pub greeting: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    pub ink_color: InkColor,
    pub font_style: FontStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorations: Vec<Decoration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_pages: Vec<LetterPage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub letter_doodles: Vec<DoodleStroke>,
    /// Envelope front color (hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub envelope_decorations: Vec<Decoration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub envelope_doodles: Vec<DoodleStroke>,
}

impl SavedLetterState {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, LetterError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode stored JSON.
    pub fn from_json(json: &str) -> Result<Self, LetterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the letter has a non-blank body and may be sealed.
    pub fn has_body(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Parsed envelope color, ignoring invalid values.
    pub fn envelope_color(&self) -> Option<HexColor> {
        self.envelope_color.as_deref().and_then(|c| c.parse().ok())
    }

    /// Check that decoration ids are unique within each list.
    pub fn has_unique_decoration_ids(&self) -> bool {
        fn unique(list: &[Decoration]) -> bool {
            let mut seen = std::collections::HashSet::new();
            list.iter().all(|d| seen.insert(d.id.as_str()))
        }
        unique(&self.decorations) && unique(&self.envelope_decorations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{DecorationKind, StickerKind};
    use kurbo::Point;

    fn sample() -> SavedLetterState {
        SavedLetterState {
            text: "Hello".to_string(),
            date: "October 17, 2026".to_string(),
            greeting: "Dear Sam".to_string(),
            signature: "Alex".to_string(),
            ink_color: InkColor::Navy,
            font_style: FontStyle::Serif,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let json = sample().to_json().unwrap();
        assert!(!json.contains("additionalPages"));
        assert!(!json.contains("letterDoodles"));
        assert!(!json.contains("envelopeDecorations"));
        assert!(!json.contains("envelopeDoodles"));
        assert!(!json.contains("recipientName"));
        assert!(!json.contains("decorations"));
        assert!(json.contains(r#""inkColor":"navy""#));
        assert!(json.contains(r#""fontStyle":"serif""#));
    }

    #[test]
    fn test_absent_and_empty_read_the_same() {
        let absent = SavedLetterState::from_json(
            r#"{"text":"Hi","date":"d","greeting":"g","signature":"s","inkColor":"brown","fontStyle":"handwriting"}"#,
        )
        .unwrap();
        let empty = SavedLetterState::from_json(
            r#"{"text":"Hi","date":"d","greeting":"g","signature":"s","inkColor":"brown","fontStyle":"handwriting",
               "decorations":[],"additionalPages":[],"letterDoodles":[],"envelopeDecorations":[],"envelopeDoodles":[]}"#,
        )
        .unwrap();
        assert_eq!(absent, empty);
    }

    #[test]
    fn test_json_round_trip() {
        let mut letter = sample();
        letter.recipient_name = Some("Sam".to_string());
        letter.decorations.push(Decoration {
            id: "sticker-1".to_string(),
            kind: DecorationKind::Sticker { sticker: StickerKind::Sun },
            position: Point::new(12.5, 40.0),
            rotation: Some(0.0),
        });
        letter.additional_pages.push(LetterPage {
            id: "page-1".to_string(),
            text: "More".to_string(),
        });
        letter.letter_doodles.push(DoodleStroke::from_points(vec![
            Point::new(1.0, 1.0),
            Point::new(2.0, 3.0),
        ]));
        letter.envelope_color = Some("#aabbcc".to_string());

        let back = SavedLetterState::from_json(&letter.to_json().unwrap()).unwrap();
        assert_eq!(back, letter);
    }

    #[test]
    fn test_malformed_content() {
        assert!(matches!(
            SavedLetterState::from_json("{not json"),
            Err(LetterError::Malformed(_))
        ));
        assert!(SavedLetterState::from_json(r#"{"text":"x"}"#).is_err());
    }

    #[test]
    fn test_has_body() {
        let mut letter = sample();
        assert!(letter.has_body());
        letter.text = " \n\t ".to_string();
        assert!(!letter.has_body());
    }

    #[test]
    fn test_hex_color() {
        assert_eq!("#AbC".parse::<HexColor>().unwrap().to_string(), "#aabbcc");
        assert_eq!("#fef3ed".parse::<HexColor>().unwrap().to_string(), "#fef3ed");
        assert!("fef3ed".parse::<HexColor>().is_err());
        assert!("#fef3e".parse::<HexColor>().is_err());
        assert!("#red;}x".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let mut letter = sample();
        let deco = Decoration::new(DecorationKind::WaxSeal, Point::ZERO);
        letter.decorations.push(deco.clone());
        assert!(letter.has_unique_decoration_ids());
        letter.decorations.push(deco);
        assert!(!letter.has_unique_decoration_ids());
    }
}
