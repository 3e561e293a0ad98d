//! Inline SVG artwork for stickers, wax seals and doodles.

use crate::decoration::StickerKind;
use crate::doodle::DoodleStroke;
use crate::letter::HexColor;

/// Sticker shapes, drawn in a 40x40 view box.
pub fn sticker_svg(sticker: StickerKind) -> &'static str {
    match sticker {
        StickerKind::Heart => {
            r##"<path d="M20 35 C10 25 2 18 2 12 C2 6 7 2 12 2 C16 2 19 5 20 7 C21 5 24 2 28 2 C33 2 38 6 38 12 C38 18 30 25 20 35Z" fill="#e8a0a0" stroke="#d48080" stroke-width="0.5" opacity="0.85"/>"##
        }
        StickerKind::Star => {
            r##"<path d="M20 3 L24 15 L37 15 L27 23 L30 36 L20 28 L10 36 L13 23 L3 15 L16 15Z" fill="#f0d080" stroke="#d4b060" stroke-width="0.5" opacity="0.85"/>"##
        }
        StickerKind::Flower => concat!(
            r##"<circle cx="20" cy="12" r="6" fill="#f0c4c8" opacity="0.8"/>"##,
            r##"<circle cx="28" cy="18" r="6" fill="#f0c4c8" opacity="0.8"/>"##,
            r##"<circle cx="26" cy="28" r="6" fill="#f0c4c8" opacity="0.8"/>"##,
            r##"<circle cx="14" cy="28" r="6" fill="#f0c4c8" opacity="0.8"/>"##,
            r##"<circle cx="12" cy="18" r="6" fill="#f0c4c8" opacity="0.8"/>"##,
            r##"<circle cx="20" cy="20" r="5" fill="#f0e0a0"/>"##,
        ),
        StickerKind::Butterfly => concat!(
            r##"<ellipse cx="13" cy="15" rx="10" ry="8" fill="#b8d4c0" opacity="0.8" transform="rotate(-20 13 15)"/>"##,
            r##"<ellipse cx="27" cy="15" rx="10" ry="8" fill="#b8d4c0" opacity="0.8" transform="rotate(20 27 15)"/>"##,
            r##"<line x1="20" y1="10" x2="20" y2="34" stroke="#7a6b5d" stroke-width="1"/>"##,
        ),
        StickerKind::Sun => concat!(
            r##"<circle cx="20" cy="20" r="8" fill="#f0d890" opacity="0.85"/>"##,
            r##"<g stroke="#e8c060" stroke-width="2" stroke-linecap="round" opacity="0.7">"##,
            r##"<line x1="20" y1="20" x2="20" y2="6"/><line x1="20" y1="20" x2="20" y2="34"/>"##,
            r##"<line x1="20" y1="20" x2="6" y2="20"/><line x1="20" y1="20" x2="34" y2="20"/>"##,
            r##"<line x1="20" y1="20" x2="8" y2="8"/><line x1="20" y1="20" x2="32" y2="32"/>"##,
            r##"<line x1="20" y1="20" x2="8" y2="32"/><line x1="20" y1="20" x2="32" y2="8"/>"##,
            "</g>",
        ),
    }
}

/// Emblem pressed into the wax seal, drawn in a 24x24 view box.
pub const WAX_SEAL_EMBLEM: &str = concat!(
    r##"<svg viewBox="0 0 24 24" width="24" height="24" fill="none" stroke="rgba(255,255,255,0.9)">"##,
    r##"<circle cx="12" cy="12" r="10" stroke-width="1.2"/>"##,
    r##"<path d="M12 6v4l2 6 2-6 2 4" stroke-width="1" stroke-linecap="round" stroke-linejoin="round"/>"##,
    "</svg>",
);

/// Overlay with one path per visible stroke. Strokes without a valid color
/// use `default_color`. Returns an empty string when nothing is visible.
pub fn doodle_overlay(strokes: &[DoodleStroke], default_color: &str) -> String {
    let paths: Vec<String> = strokes
        .iter()
        .filter(|s| s.is_visible())
        .map(|stroke| {
            let color = stroke
                .color
                .as_deref()
                .and_then(|c| c.parse::<HexColor>().ok())
                .map(|c| c.to_string())
                .unwrap_or_else(|| default_color.to_string());
            format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                stroke.svg_path_data(),
                color,
                stroke.effective_width()
            )
        })
        .collect();
    if paths.is_empty() {
        return String::new();
    }
    format!(
        r#"<svg class="doodles" xmlns="http://www.w3.org/2000/svg" aria-hidden="true">{}</svg>"#,
        paths.concat()
    )
}
