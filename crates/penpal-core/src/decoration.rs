//! Decorations: washi tape, stickers, photos and wax seals.
//!
//! Each kind carries its own statically known payload. The wire form keeps
//! the flat `{id, type, data, x, y, rotation}` shape so stored letters stay
//! readable by other clients.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Sticker artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerKind {
    #[default]
    Heart,
    Star,
    Flower,
    Butterfly,
    Sun,
}

impl StickerKind {
    pub const ALL: [StickerKind; 5] = [
        StickerKind::Heart,
        StickerKind::Star,
        StickerKind::Flower,
        StickerKind::Butterfly,
        StickerKind::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StickerKind::Heart => "heart",
            StickerKind::Star => "star",
            StickerKind::Flower => "flower",
            StickerKind::Butterfly => "butterfly",
            StickerKind::Sun => "sun",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Washi tape color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WashiColor {
    #[default]
    Pink,
    Green,
    Yellow,
    Blue,
}

impl WashiColor {
    pub const ALL: [WashiColor; 4] = [
        WashiColor::Pink,
        WashiColor::Green,
        WashiColor::Yellow,
        WashiColor::Blue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WashiColor::Pink => "pink",
            WashiColor::Green => "green",
            WashiColor::Yellow => "yellow",
            WashiColor::Blue => "blue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == name)
    }

    /// Swatch color as CSS hex.
    pub fn hex(&self) -> &'static str {
        match self {
            WashiColor::Pink => "#f5cdd2",
            WashiColor::Green => "#c2dcc8",
            WashiColor::Yellow => "#f5e5a8",
            WashiColor::Blue => "#c0d4e8",
        }
    }
}

/// What a decoration is, with its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationKind {
    Washi { color: WashiColor },
    Sticker { sticker: StickerKind },
    /// Photo embedded as a data URI.
    Photo { src: String },
    WaxSeal,
}

impl DecorationKind {
    /// Wire name of the kind (`type` field).
    pub fn type_name(&self) -> &'static str {
        match self {
            DecorationKind::Washi { .. } => "washi",
            DecorationKind::Sticker { .. } => "sticker",
            DecorationKind::Photo { .. } => "photo",
            DecorationKind::WaxSeal => "waxSeal",
        }
    }

    /// Rotation applied when a decoration has none of its own.
    pub fn default_rotation(&self) -> f64 {
        match self {
            DecorationKind::Washi { .. } => -6.0,
            DecorationKind::Sticker { .. } => 0.0,
            DecorationKind::Photo { .. } => -3.0,
            DecorationKind::WaxSeal => 0.0,
        }
    }

    /// Nominal rendered size, used for hit testing.
    pub fn footprint(&self) -> Size {
        match self {
            DecorationKind::Washi { .. } => Size::new(112.0, 28.0),
            DecorationKind::Sticker { .. } => Size::new(40.0, 40.0),
            DecorationKind::Photo { .. } => Size::new(128.0, 160.0),
            DecorationKind::WaxSeal => Size::new(48.0, 48.0),
        }
    }

    /// Sticker and washi can be placed many times in a row.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, DecorationKind::Washi { .. } | DecorationKind::Sticker { .. })
    }

    fn to_data(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        match self {
            DecorationKind::Washi { color } => {
                data.insert("color".to_string(), color.as_str().to_string());
            }
            DecorationKind::Sticker { sticker } => {
                data.insert("stickerType".to_string(), sticker.as_str().to_string());
            }
            DecorationKind::Photo { src } => {
                data.insert("src".to_string(), src.clone());
            }
            DecorationKind::WaxSeal => {}
        }
        data
    }

    fn from_wire(type_name: &str, data: &BTreeMap<String, String>) -> Result<Self, String> {
        match type_name {
            "washi" => {
                let name = data.get("color").map(String::as_str).unwrap_or_default();
                let color = WashiColor::from_name(name).unwrap_or_else(|| {
                    log::debug!("unknown washi color {:?}, using default", name);
                    WashiColor::default()
                });
                Ok(DecorationKind::Washi { color })
            }
            "sticker" => {
                let name = data.get("stickerType").map(String::as_str).unwrap_or_default();
                let sticker = StickerKind::from_name(name).unwrap_or_else(|| {
                    log::debug!("unknown sticker {:?}, using default", name);
                    StickerKind::default()
                });
                Ok(DecorationKind::Sticker { sticker })
            }
            "photo" => Ok(DecorationKind::Photo {
                src: data.get("src").cloned().unwrap_or_default(),
            }),
            "waxSeal" => Ok(DecorationKind::WaxSeal),
            other => Err(format!("unknown decoration type: {}", other)),
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A positioned, rotatable decoration on a letter or envelope surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireDecoration", into = "WireDecoration")]
pub struct Decoration {
    /// Unique within its owning list.
    pub id: String,
    pub kind: DecorationKind,
    /// Top-left corner, container-relative.
    pub position: Point,
    /// Rotation in degrees; `None` means the kind's default.
    pub rotation: Option<f64>,
}

impl Decoration {
    /// Create a decoration with a fresh id and no explicit rotation.
    pub fn new(kind: DecorationKind, position: Point) -> Self {
        Self {
            id: generate_decoration_id(&kind),
            kind,
            position,
            rotation: None,
        }
    }

    /// Rotation to render with.
    pub fn effective_rotation(&self) -> f64 {
        self.rotation.unwrap_or_else(|| self.kind.default_rotation())
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.kind.footprint())
    }

    /// Check whether a container-relative point lands on the decoration,
    /// honoring its rotation about the center.
    pub fn hit_test(&self, point: Point) -> bool {
        let bounds = self.bounds();
        let rotation = self.effective_rotation();
        if rotation == 0.0 {
            return bounds.contains(point);
        }
        let unrotate = Affine::rotate_about(-rotation.to_radians(), bounds.center());
        bounds.contains(unrotate * point)
    }
}

/// Flat wire representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireDecoration {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    data: BTreeMap<String, String>,
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<f64>,
}

impl TryFrom<WireDecoration> for Decoration {
    type Error = String;

    fn try_from(wire: WireDecoration) -> Result<Self, Self::Error> {
        let kind = DecorationKind::from_wire(&wire.type_name, &wire.data)?;
        Ok(Self {
            id: wire.id,
            kind,
            position: Point::new(wire.x, wire.y),
            rotation: wire.rotation,
        })
    }
}

impl From<Decoration> for WireDecoration {
    fn from(deco: Decoration) -> Self {
        Self {
            id: deco.id,
            type_name: deco.kind.type_name().to_string(),
            data: deco.kind.to_data(),
            x: deco.position.x,
            y: deco.position.y,
            rotation: deco.rotation,
        }
    }
}

/// Generate an id of the form `<type>-<unix millis>-<sequence>`.
pub fn generate_decoration_id(kind: &DecorationKind) -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(1);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", kind.type_name(), millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_rotations() {
        assert_eq!(DecorationKind::Washi { color: WashiColor::Pink }.default_rotation(), -6.0);
        assert_eq!(DecorationKind::Sticker { sticker: StickerKind::Star }.default_rotation(), 0.0);
        assert_eq!(DecorationKind::Photo { src: String::new() }.default_rotation(), -3.0);
        assert_eq!(DecorationKind::WaxSeal.default_rotation(), 0.0);
    }

    #[test]
    fn test_effective_rotation_prefers_own_value() {
        let mut deco = Decoration::new(DecorationKind::Washi { color: WashiColor::Blue }, Point::ZERO);
        assert_eq!(deco.effective_rotation(), -6.0);
        deco.rotation = Some(12.0);
        assert_eq!(deco.effective_rotation(), 12.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let kind = DecorationKind::Sticker { sticker: StickerKind::Heart };
        let ids: HashSet<String> = (0..500).map(|_| generate_decoration_id(&kind)).collect();
        assert_eq!(ids.len(), 500);
        assert!(ids.iter().all(|id| id.starts_with("sticker-")));
    }

    #[test]
    fn test_wire_format() {
        let deco = Decoration {
            id: "sticker-1".to_string(),
            kind: DecorationKind::Sticker { sticker: StickerKind::Star },
            position: Point::new(120.0, 80.0),
            rotation: Some(0.0),
        };
        let json = serde_json::to_value(&deco).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "sticker-1",
                "type": "sticker",
                "data": { "stickerType": "star" },
                "x": 120.0,
                "y": 80.0,
                "rotation": 0.0
            })
        );
        let back: Decoration = serde_json::from_value(json).unwrap();
        assert_eq!(back, deco);
    }

    #[test]
    fn test_unknown_payload_falls_back() {
        let deco: Decoration = serde_json::from_str(
            r#"{"id":"washi-1","type":"washi","data":{"color":"plaid"},"x":1,"y":2}"#,
        )
        .unwrap();
        assert_eq!(deco.kind, DecorationKind::Washi { color: WashiColor::Pink });
        assert_eq!(deco.rotation, None);

        let deco: Decoration =
            serde_json::from_str(r#"{"id":"s","type":"sticker","x":0,"y":0}"#).unwrap();
        assert_eq!(deco.kind, DecorationKind::Sticker { sticker: StickerKind::Heart });
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<Decoration, _> =
            serde_json::from_str(r#"{"id":"r","type":"ribbon","data":{},"x":0,"y":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hit_test_with_rotation() {
        let mut seal = Decoration::new(DecorationKind::WaxSeal, Point::new(100.0, 100.0));
        assert!(seal.hit_test(Point::new(124.0, 124.0)));
        assert!(!seal.hit_test(Point::new(99.0, 124.0)));

        // A long strip rotated 90 degrees covers its center column instead of its row.
        let mut tape = Decoration::new(DecorationKind::Washi { color: WashiColor::Green }, Point::new(0.0, 100.0));
        tape.rotation = Some(90.0);
        let center = tape.bounds().center();
        assert!(tape.hit_test(Point::new(center.x, center.y + 40.0)));
        assert!(!tape.hit_test(Point::new(center.x + 40.0, center.y)));

        seal.rotation = Some(45.0);
        assert!(seal.hit_test(Point::new(124.0, 124.0)));
    }
}
