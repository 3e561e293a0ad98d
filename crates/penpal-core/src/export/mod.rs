//! Standalone interactive letter document.
//!
//! The output is a single HTML file with inline styles and a tiny inline
//! script: a closed envelope that opens once on click or Enter/Space and
//! reveals the letter. No external resources are referenced.

mod art;

pub use art::{WAX_SEAL_EMBLEM, doodle_overlay, sticker_svg};

use crate::decoration::{Decoration, DecorationKind};
use crate::letter::{FontStyle, SavedLetterState};

/// Envelope front color when the letter does not set one.
pub const DEFAULT_ENVELOPE_COLOR: &str = "#fef3ed";

/// Document title.
pub const DOCUMENT_TITLE: &str = "Your Letter";

/// Escape text for element content and double- or single-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape body text and turn line breaks into `<br/>`.
pub fn text_to_html(s: &str) -> String {
    let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
    escape_html(&normalized).replace('\n', "<br/>")
}

/// Filename for a downloaded letter: `letter-<stamp>.html`, where the stamp
/// is a `YYYY-MM-DD` date or a stored id.
pub fn export_filename(stamp: &str) -> String {
    let stamp: String = stamp
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if stamp.is_empty() {
        "letter.html".to_string()
    } else {
        format!("letter-{}.html", stamp)
    }
}

/// Filename stamped with today's local date.
pub fn dated_export_filename() -> String {
    export_filename(&chrono::Local::now().format("%Y-%m-%d").to_string())
}

/// Render a decoration as an absolutely positioned element.
///
/// Photos are only embedded from `data:image/` sources; anything else
/// renders nothing.
pub fn decoration_html(deco: &Decoration) -> String {
    let style = format!(
        "position:absolute;left:{}px;top:{}px;transform:rotate({}deg);",
        deco.position.x,
        deco.position.y,
        deco.effective_rotation()
    );
    match &deco.kind {
        DecorationKind::Washi { color } => format!(
            r#"<div class="deco-washi" style="{}background:{};width:112px;height:28px;border-radius:4px;opacity:0.85;box-shadow:0 1px 4px rgba(0,0,0,0.08);"></div>"#,
            style,
            color.hex()
        ),
        DecorationKind::Sticker { sticker } => format!(
            r#"<div class="deco-sticker" style="{}"><svg viewBox="0 0 40 40" width="40" height="40">{}</svg></div>"#,
            style,
            sticker_svg(*sticker)
        ),
        DecorationKind::Photo { src } if src.starts_with("data:image/") => format!(
            r#"<div class="deco-photo" style="{}"><div class="polaroid-wrap"><img src="{}" alt="Photo"/></div></div>"#,
            style,
            escape_html(src)
        ),
        DecorationKind::Photo { .. } => {
            log::warn!("skipping photo {} without an embedded image", deco.id);
            String::new()
        }
        DecorationKind::WaxSeal => format!(
            r#"<div class="deco-seal" style="{}">{}</div>"#,
            style, WAX_SEAL_EMBLEM
        ),
    }
}

struct PageBlock<'a> {
    date: &'a str,
    greeting: &'a str,
    text: &'a str,
    signature: &'a str,
}

fn page_html(page: &PageBlock<'_>, font_class: &str, ink: &str) -> String {
    let mut html = format!(r#"<div class="letter-page {}">"#, font_class);
    if !page.date.is_empty() {
        html.push_str(&format!(
            r#"<div class="letter-date" style="color:{}">{}</div>"#,
            ink,
            escape_html(page.date)
        ));
    }
    if !page.greeting.is_empty() {
        html.push_str(&format!(
            r#"<div class="letter-greeting" style="color:{}">{}</div>"#,
            ink,
            escape_html(page.greeting)
        ));
    }
    html.push_str(&format!(
        r#"<div class="letter-body" style="color:{}">{}</div>"#,
        ink,
        text_to_html(page.text)
    ));
    if !page.signature.is_empty() {
        html.push_str(&format!(
            r#"<div class="letter-signature" style="color:{}">{}</div>"#,
            ink,
            escape_html(page.signature)
        ));
    }
    html.push_str("</div>");
    html
}

fn letter_paper_html(letter: &SavedLetterState) -> String {
    let ink = letter.ink_color.hex();
    let font_class = match letter.font_style {
        FontStyle::Handwriting => "letter-handwriting",
        FontStyle::Serif => "letter-serif",
    };

    let first = PageBlock {
        date: &letter.date,
        greeting: &letter.greeting,
        text: &letter.text,
        signature: &letter.signature,
    };
    let pages = std::iter::once(first).chain(letter.additional_pages.iter().map(|p| PageBlock {
        date: "",
        greeting: "",
        text: &p.text,
        signature: "",
    }));
    let pages_html: String = pages.map(|p| page_html(&p, font_class, ink)).collect();
    let decos_html: String = letter.decorations.iter().map(decoration_html).collect();

    format!(
        r#"<div class="letter-paper"><div class="letter-pages-wrap">{}</div><div class="letter-decorations">{}{}</div></div>"#,
        pages_html,
        doodle_overlay(&letter.letter_doodles, ink),
        decos_html
    )
}

fn envelope_html(letter: &SavedLetterState) -> String {
    let color = letter
        .envelope_color()
        .map(|c| c.to_string())
        .unwrap_or_else(|| DEFAULT_ENVELOPE_COLOR.to_string());
    let recipient = letter
        .recipient_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!(r#"<div class="envelope-to">To: {}</div>"#, escape_html(name)))
        .unwrap_or_default();
    let decos_html: String = letter.envelope_decorations.iter().map(decoration_html).collect();

    format!(
        r#"<div class="envelope" style="background:{color}"><div class="envelope-body" style="background:{color}">{recipient}</div><div class="envelope-flap"></div><div class="envelope-decorations">{doodles}{decos}</div></div>"#,
        color = color,
        recipient = recipient,
        doodles = doodle_overlay(&letter.envelope_doodles, letter.ink_color.hex()),
        decos = decos_html,
    )
}

/// Build the standalone interactive document for a letter.
///
/// The same letter always produces byte-identical output.
pub fn build_interactive_letter_html(letter: &SavedLetterState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{title}</title>
{css}
</head>
<body>
<div class="stage" id="stage" data-state="closed" role="button" tabindex="0" aria-label="Click to open envelope">
<div class="envelope-wrap">{envelope}</div>
<div class="letter-reveal"><div class="letter-folded">{paper}</div></div>
</div>
<p class="hint">Click the envelope to open your letter</p>
{script}
</body>
</html>
"#,
        title = DOCUMENT_TITLE,
        css = CSS_STYLES,
        envelope = envelope_html(letter),
        paper = letter_paper_html(letter),
        script = OPEN_SCRIPT,
    )
}

/// Adds `opened` once; the listeners are removed so it never closes again.
const OPEN_SCRIPT: &str = r#"<script>
(function () {
  var stage = document.getElementById('stage');
  function open() {
    if (stage.getAttribute('data-state') === 'opened') return;
    stage.classList.add('opened');
    stage.setAttribute('data-state', 'opened');
    stage.removeEventListener('click', open);
    stage.removeEventListener('keydown', onKey);
    stage.removeAttribute('tabindex');
  }
  function onKey(e) {
    if (e.key === 'Enter' || e.key === ' ') { e.preventDefault(); open(); }
  }
  stage.addEventListener('click', open);
  stage.addEventListener('keydown', onKey);
})();
</script>"#;

const CSS_STYLES: &str = r#"<style>
* { box-sizing: border-box; }
body { margin: 0; min-height: 100vh; background: #faf7f5; font-family: Georgia, serif; color: #3a3330; display: flex; flex-direction: column; align-items: center; justify-content: center; padding: 24px; }
.stage { position: relative; width: 100%; max-width: 420px; min-height: 320px; cursor: pointer; perspective: 900px; }
.envelope-wrap { position: relative; width: 100%; transition: transform 0.4s ease; transform-style: preserve-3d; }
.stage.opened .envelope-wrap { transform: scale(0.92); opacity: 0; pointer-events: none; transition: transform 0.5s ease, opacity 0.4s ease; }
.envelope { position: relative; width: 100%; aspect-ratio: 4/3; max-height: 280px; border-radius: 12px; box-shadow: 0 8px 32px rgba(58,51,48,0.12); overflow: hidden; transform-style: preserve-3d; }
.envelope-flap { position: absolute; top: 0; left: 0; right: 0; height: 50%; background: linear-gradient(180deg, #f9e8dd 0%, #f0ddd0 100%); clip-path: polygon(0 0, 50% 85%, 100% 0); transform-origin: top center; transition: transform 0.65s ease; border-bottom: 1px solid #e5ddd8; backface-visibility: hidden; }
.stage.opened .envelope-flap { transform: rotateX(-150deg); }
.envelope-body { position: absolute; bottom: 0; left: 0; right: 0; height: 55%; border: 1px solid #e5ddd8; border-bottom: none; border-radius: 0 0 12px 12px; display: flex; align-items: center; justify-content: center; }
.envelope-to { font-size: 18px; font-style: italic; color: #5a4d45; }
.envelope-decorations { position: absolute; inset: 0; pointer-events: none; }
.letter-reveal { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; opacity: 0; pointer-events: none; transition: opacity 0.25s ease 0.4s; }
.stage.opened .letter-reveal { opacity: 1; pointer-events: auto; }
.letter-folded { position: relative; width: 92%; max-width: 380px; border-radius: 8px; overflow: hidden; transform-origin: center top; transform: scaleY(0.08); opacity: 0; transition: transform 0.8s cubic-bezier(0.22, 1, 0.36, 1) 0.5s, opacity 0.35s ease 0.5s; box-shadow: 0 4px 24px rgba(58,51,48,0.1); }
.stage.opened .letter-folded { transform: scaleY(1); opacity: 1; }
.letter-paper { position: relative; width: 100%; min-height: 400px; padding: 24px 32px 32px; background: #fef9f6; border-radius: 8px; }
.letter-pages-wrap { position: relative; z-index: 2; }
.letter-page { margin-bottom: 24px; }
.letter-page:last-child { margin-bottom: 0; }
.letter-date { text-align: right; font-size: 14px; opacity: 0.7; margin-bottom: 8px; }
.letter-greeting { font-size: 18px; margin-bottom: 12px; }
.letter-body { font-size: 16px; line-height: 1.7; }
.letter-serif .letter-body { font-style: italic; }
.letter-handwriting { font-family: cursive, serif; letter-spacing: 0.02em; }
.letter-signature { text-align: right; font-size: 18px; margin-top: 16px; }
.letter-decorations { position: absolute; inset: 0; pointer-events: none; z-index: 5; }
.doodles { position: absolute; left: 0; top: 0; width: 100%; height: 100%; overflow: visible; }
.deco-sticker svg { filter: drop-shadow(0 1px 3px rgba(0,0,0,0.1)); }
.deco-seal { width: 48px; height: 48px; border-radius: 50%; display: flex; align-items: center; justify-content: center; background: radial-gradient(circle at 30% 30%, #c45c5c, #8b2a2a 60%, #6b2020); box-shadow: inset 0 2px 4px rgba(255,255,255,0.2), inset 0 -2px 4px rgba(0,0,0,0.3), 0 2px 8px rgba(0,0,0,0.2); border: 1px solid rgba(139,42,42,0.5); }
.polaroid-wrap { width: 128px; padding: 8px 8px 32px 8px; background: #fff; box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
.polaroid-wrap img { width: 100%; height: auto; display: block; object-fit: cover; }
.hint { text-align: center; margin-top: 16px; font-size: 14px; color: #8a817c; }
.stage.opened + .hint { visibility: hidden; }
</style>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{StickerKind, WashiColor};
    use crate::doodle::DoodleStroke;
    use crate::letter::{InkColor, LetterPage};
    use kurbo::Point;
    use pretty_assertions::assert_eq;

    fn letter() -> SavedLetterState {
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

    fn deco(kind: DecorationKind, x: f64, y: f64, rotation: Option<f64>) -> Decoration {
        Decoration {
            id: format!("{}-1", kind.type_name()),
            kind,
            position: Point::new(x, y),
            rotation,
        }
    }

    #[test]
    fn test_starts_closed_with_body_text() {
        let html = build_interactive_letter_html(&letter());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="stage" id="stage" data-state="closed""#));
        assert!(!html.contains(r#"class="stage opened""#));
        assert!(html.contains(">Hello</div>"));
        assert!(html.contains("<title>Your Letter</title>"));
        assert!(html.contains("color:#2a3a5c"));
        assert!(html.contains("letter-serif"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut l = letter();
        l.decorations.push(deco(DecorationKind::Sticker { sticker: StickerKind::Star }, 120.0, 80.0, Some(0.0)));
        l.letter_doodles.push(DoodleStroke::from_points(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]));
        assert_eq!(build_interactive_letter_html(&l), build_interactive_letter_html(&l.clone()));
    }

    #[test]
    fn test_no_external_resources() {
        let mut l = letter();
        l.decorations.push(deco(DecorationKind::WaxSeal, 0.0, 0.0, None));
        let html = build_interactive_letter_html(&l);
        assert!(!html.contains("<script src"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("src=\"http"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn test_script_text_is_escaped() {
        let mut l = letter();
        l.text = "<script>alert(1)</script>".to_string();
        l.signature = "\"Al\" & 'Ex'".to_string();
        let html = build_interactive_letter_html(&l);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&quot;Al&quot; &amp; &#39;Ex&#39;"));
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(text_to_html("a\nb\r\nc\rd"), "a<br/>b<br/>c<br/>d");
        assert_eq!(text_to_html("x < y"), "x &lt; y");
    }

    #[test]
    fn test_pages_in_order() {
        let mut l = letter();
        for text in ["second", "third"] {
            l.additional_pages.push(LetterPage {
                id: format!("page-{}", text),
                text: text.to_string(),
            });
        }
        let html = build_interactive_letter_html(&l);
        let first = html.find(">Hello<").unwrap();
        let second = html.find(">second<").unwrap();
        let third = html.find(">third<").unwrap();
        assert!(first < second && second < third);
        assert_eq!(html.matches("letter-date").count(), 2); // one page + css rule
        assert_eq!(html.matches(r#"<div class="letter-page "#).count(), 3);
    }

    #[test]
    fn test_decoration_rendering() {
        let star = deco(DecorationKind::Sticker { sticker: StickerKind::Star }, 120.0, 80.0, Some(0.0));
        assert_eq!(
            decoration_html(&star),
            format!(
                r#"<div class="deco-sticker" style="position:absolute;left:120px;top:80px;transform:rotate(0deg);"><svg viewBox="0 0 40 40" width="40" height="40">{}</svg></div>"#,
                sticker_svg(StickerKind::Star)
            )
        );

        let washi = deco(DecorationKind::Washi { color: WashiColor::Green }, 10.5, 20.0, None);
        let html = decoration_html(&washi);
        assert!(html.contains("transform:rotate(-6deg)"));
        assert!(html.contains("background:#c2dcc8"));
        assert!(html.contains("left:10.5px"));

        let seal = decoration_html(&deco(DecorationKind::WaxSeal, 5.0, 5.0, None));
        assert!(seal.contains(r#"class="deco-seal""#));
    }

    #[test]
    fn test_photos_only_from_data_uris() {
        let embedded = deco(
            DecorationKind::Photo { src: "data:image/png;base64,AAAA".to_string() },
            0.0,
            0.0,
            None,
        );
        let html = decoration_html(&embedded);
        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA""#));
        assert!(html.contains("rotate(-3deg)"));

        let remote = deco(
            DecorationKind::Photo { src: "https://example.com/cat.png".to_string() },
            0.0,
            0.0,
            None,
        );
        assert_eq!(decoration_html(&remote), "");
    }

    #[test]
    fn test_envelope_face() {
        let mut l = letter();
        assert!(build_interactive_letter_html(&l).contains("background:#fef3ed"));

        l.envelope_color = Some("#C0D4E8".to_string());
        l.recipient_name = Some("Sam <3".to_string());
        l.envelope_decorations.push(deco(DecorationKind::WaxSeal, 176.0, 200.0, Some(0.0)));
        l.envelope_doodles.push(DoodleStroke::from_points(vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)]));
        let html = build_interactive_letter_html(&l);
        assert!(html.contains(r#"<div class="envelope" style="background:#c0d4e8">"#));
        assert!(html.contains("To: Sam &lt;3"));
        assert!(html.contains("left:176px;top:200px"));
        assert!(html.contains(r#"d="M 0 0 L 9 9""#));
    }

    #[test]
    fn test_invalid_envelope_color_falls_back() {
        let mut l = letter();
        l.envelope_color = Some("red;}body{display:none".to_string());
        let html = build_interactive_letter_html(&l);
        assert!(html.contains(r#"style="background:#fef3ed""#));
        assert!(!html.contains("display:none"));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("2026-10-17"), "letter-2026-10-17.html");
        assert_eq!(export_filename("abc123"), "letter-abc123.html");
        assert_eq!(export_filename("../x"), "letter-x.html");
        assert_eq!(export_filename(""), "letter.html");
        assert!(dated_export_filename().starts_with("letter-20"));
    }
}
