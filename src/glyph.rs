//! Glyph normalization for the WinAnsi-only renderer. Symbols the base fonts
//! can name get a bracketed text stand-in; anything else outside the
//! encodable range is dropped.

/// Known symbol → bracketed equivalent. Replacements are plain ASCII, so a
/// second pass over already-normalized text finds nothing left to touch.
fn substitution(c: char) -> Option<&'static str> {
    Some(match c {
        '\u{2705}' | '\u{2714}' | '\u{2713}' => "[Check]",
        '\u{274C}' | '\u{2716}' => "[X]",
        '\u{26A0}' => "[Warning]",
        '\u{2757}' | '\u{203C}' => "[!]",
        '\u{2753}' => "[?]",
        '\u{1F4C8}' => "[Trend Up]",
        '\u{1F4C9}' => "[Trend Down]",
        '\u{1F4CA}' => "[Chart]",
        '\u{1F4C5}' | '\u{1F4C6}' => "[Date]",
        '\u{1F4A1}' => "[Idea]",
        '\u{1F50D}' | '\u{1F50E}' => "[Search]",
        '\u{2B50}' | '\u{2605}' => "[Star]",
        '\u{1F525}' => "[Hot]",
        '\u{1F3AF}' => "[Target]",
        '\u{1F4CC}' => "[Pin]",
        '\u{1F4B0}' | '\u{1F4B5}' => "[Money]",
        '\u{27A1}' | '\u{2192}' => "->",
        '\u{2B06}' | '\u{2191}' => "^",
        '\u{2B07}' | '\u{2193}' => "v",
        _ => return None,
    })
}

/// Ranges the Type1/WinAnsi fonts cannot draw: miscellaneous symbols and
/// dingbats, symbols-and-arrows, private use, the pictograph planes, plus the
/// joiners and selectors emoji sequences are built from.
fn unsupported(c: char) -> bool {
    matches!(c as u32,
        0x2190..=0x21FF
        | 0x2600..=0x27BF
        | 0x2B00..=0x2BFF
        | 0xE000..=0xF8FF
        | 0xFE00..=0xFE0F
        | 0x1F000..=0x1FAFF
        | 0x200D
    )
}

/// Replace every mapped glyph with its bracketed text equivalent, then strip
/// whatever unmapped glyphs remain in the unsupported ranges. Idempotent and
/// total: normalizing normalized text is a no-op, and any input yields a
/// valid (possibly empty) string.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(replacement) = substitution(c) {
            out.push_str(replacement);
        } else if !unsupported(c) {
            out.push(c);
        }
    }
    out
}
